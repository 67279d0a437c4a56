//! Roadmap parsing: markdown checklist lines become typed task records.
//!
//! A roadmap is a plain markdown file where checklist items carry a status
//! marker, an optional dependency annotation, and a trailing task id:
//!
//! ```text
//! - [x] Build API #T1
//! - [ ] Write docs (depends: #T1) #T2
//! ```
//!
//! Anything that does not match the item grammar (headers, prose, blank
//! lines) is ignored, so narrative text can live alongside the checklist.
//! The roadmap is recomputed from the file on every access; nothing is
//! cached between parses.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Closed status-marker vocabulary: `(marker, label, css class)`, in the
/// order the status table displays them.
pub const STATUS_MARKERS: [(char, &'static str, &'static str); 7] = [
    ('?', "Draft", "draft"),
    (' ', "Todo", "todo"),
    ('-', "WIP", "wip"),
    ('~', "Review", "review"),
    ('x', "Done", "done"),
    ('!', "Blocked", "blocked"),
    ('>', "Racing", "racing"),
];

#[derive(Debug, Error)]
pub enum RoadmapError {
    #[error("failed to read roadmap: {0}")]
    Read(#[from] std::io::Error),
}

/// A single checklist item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task id as written in the document (e.g. `T12`), without the `#`.
    pub id: String,
    /// Title with the dependency annotation stripped and HTML-escaped.
    pub title: String,
    /// Status marker character. Markers outside [`STATUS_MARKERS`] are kept
    /// on the task but excluded from totals.
    pub marker: char,
    /// Ids of tasks this one depends on, in annotation order. May reference
    /// ids that appear nowhere else in the document.
    pub deps: Vec<String>,
}

/// Parsed roadmap: tasks in document order plus per-marker counts.
///
/// Derived data only; a fresh `Roadmap` is produced for every request.
#[derive(Debug, Clone)]
pub struct Roadmap {
    /// Tasks in document order. A repeated id overwrites the earlier task
    /// in place (last write wins, first position kept).
    pub tasks: Vec<Task>,
    /// Count per vocabulary marker, all seven keys always present.
    pub totals: BTreeMap<char, u32>,
}

impl Roadmap {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            totals: STATUS_MARKERS.iter().map(|&(m, _, _)| (m, 0)).collect(),
        }
    }

    /// Insert a task, overwriting any earlier task with the same id while
    /// keeping its position in document order.
    pub fn insert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }
}

impl Default for Roadmap {
    fn default() -> Self {
        Self::new()
    }
}

/// Replace the five markup-unsafe characters with character references.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Checklist item grammar. The id format (`T` + digits) is part of the
/// on-disk contract shared with existing roadmap files.
fn task_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*-\s*\[(.)\]\s+(.+)\s+#(T\d+)\s*$").unwrap())
}

fn depends_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(depends:\s*(#T\d+(?:,\s*#T\d+)*)\)").unwrap())
}

fn dep_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#T\d+").unwrap())
}

fn strip_depends_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\(depends:.*?\)").unwrap())
}

/// Parse roadmap text line by line. Unparsable lines are skipped.
pub fn parse_roadmap_text(text: &str) -> Roadmap {
    let mut roadmap = Roadmap::new();
    for line in text.lines() {
        let Some(caps) = task_line_re().captures(line) else {
            continue;
        };
        let marker = caps[1].chars().next().unwrap_or(' ');
        let raw_title = &caps[2];
        let id = caps[3].to_string();

        let deps: Vec<String> = match depends_re().captures(raw_title) {
            Some(dep_caps) => dep_id_re()
                .find_iter(&dep_caps[1])
                .map(|m| m.as_str()[1..].to_string())
                .collect(),
            None => Vec::new(),
        };
        let title = strip_depends_re().replace(raw_title, "");
        let title = escape_html(title.trim());

        roadmap.insert(Task {
            id,
            title,
            marker,
            deps,
        });
        if let Some(count) = roadmap.totals.get_mut(&marker) {
            *count += 1;
        }
    }
    roadmap
}

/// Parse the roadmap file at `path`.
///
/// A missing file is not an error: the dashboard simply has no tasks yet, so
/// this returns an empty roadmap. Read failures (permissions, invalid UTF-8)
/// are returned to the caller, which is expected to degrade to an empty
/// roadmap rather than surface the failure to viewers.
pub fn parse_roadmap(path: &Path) -> Result<Roadmap, RoadmapError> {
    if !path.exists() {
        return Ok(Roadmap::new());
    }
    let text = std::fs::read_to_string(path)?;
    Ok(parse_roadmap_text(&text))
}
