//! Configuration management for the dashboard.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3400`.
//! - `ROADMAP_PATH` - Optional. The roadmap checklist file. Defaults to `ROADMAP.md`.
//! - `ACTIVITY_LOG_PATH` - Optional. The activity JSONL log. Defaults to
//!   `.claude/logs/activity.jsonl`.
//! - `PROJECTS_ROOT` - Optional. Root directory for cross-project scanning.
//!   Falls back to the `project_os.dashboard.projects_root` key of
//!   `.claude/settings.json` if present, then to `~/projects`.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::expand_tilde;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Dashboard configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Path of the roadmap checklist document
    pub roadmap_path: PathBuf,

    /// Path of the activity JSONL log
    pub activity_log_path: PathBuf,

    /// Root directory for future cross-project scanning; resolved but not
    /// otherwise used yet.
    pub projects_root: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `PORT` is not a valid port
    /// number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3400".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;
        if port == 0 {
            return Err(ConfigError::InvalidValue(
                "PORT".to_string(),
                "must be between 1 and 65535".to_string(),
            ));
        }

        let roadmap_path = std::env::var("ROADMAP_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("ROADMAP.md"));

        let activity_log_path = std::env::var("ACTIVITY_LOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".claude/logs/activity.jsonl"));

        let projects_root = match std::env::var("PROJECTS_ROOT") {
            Ok(raw) => expand_tilde(&raw),
            Err(_) => expand_tilde(&projects_root_from_settings(PathBuf::from(
                ".claude/settings.json",
            ))),
        };

        Ok(Self {
            host,
            port,
            roadmap_path,
            activity_log_path,
            projects_root,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(roadmap_path: PathBuf, activity_log_path: PathBuf) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3400,
            roadmap_path,
            activity_log_path,
            projects_root: expand_tilde("~/projects"),
        }
    }
}

/// Read the projects root from the settings file, defaulting to
/// `~/projects` when the file is absent, unreadable, or missing the key.
fn projects_root_from_settings(settings_path: PathBuf) -> String {
    let fallback = "~/projects".to_string();
    let Ok(text) = std::fs::read_to_string(&settings_path) else {
        return fallback;
    };
    let Ok(settings) = serde_json::from_str::<serde_json::Value>(&text) else {
        return fallback;
    };
    settings
        .pointer("/project_os/dashboard/projects_root")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn settings_file_supplies_projects_root() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"project_os":{{"dashboard":{{"projects_root":"/srv/projects"}}}}}}"#
        )
        .unwrap();
        assert_eq!(
            projects_root_from_settings(file.path().to_path_buf()),
            "/srv/projects"
        );
    }

    #[test]
    fn missing_settings_file_falls_back() {
        assert_eq!(
            projects_root_from_settings(PathBuf::from("/nonexistent/settings.json")),
            "~/projects"
        );
    }

    #[test]
    fn malformed_settings_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert_eq!(
            projects_root_from_settings(file.path().to_path_buf()),
            "~/projects"
        );
    }

    #[test]
    fn settings_without_key_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"unrelated":true}}"#).unwrap();
        assert_eq!(
            projects_root_from_settings(file.path().to_path_buf()),
            "~/projects"
        );
    }
}
