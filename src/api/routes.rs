//! HTTP route handlers.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, Json,
    },
    routing::get,
    Router,
};
use futures::stream::Stream;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::activity::{tail_activity, ActivityEvent};
use crate::config::Config;
use crate::dag::render_dag;
use crate::roadmap::{self, escape_html, Roadmap, STATUS_MARKERS};
use crate::watch::ChangeWatcher;

use super::live::{LiveChannel, Subscription, MAX_SUBSCRIPTION_LIFETIME};
use super::page;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Live viewer channel, shared with the change watcher
    pub live: Arc<LiveChannel>,
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let live = LiveChannel::new();

    // The watcher holds the OS watches; keep it alive for the whole serve.
    let watch_paths = [
        config.roadmap_path.clone(),
        config.activity_log_path.clone(),
    ];
    let _watcher = ChangeWatcher::spawn(&watch_paths, Arc::clone(&live))?;

    let state = Arc::new(AppState {
        config: config.clone(),
        live,
    });

    let app = Router::new()
        .route("/", get(index))
        .route("/api/status", get(get_status))
        .route("/api/dag", get(get_dag))
        .route("/api/activity", get(get_activity))
        .route("/api/status.json", get(get_status_json))
        .route("/events", get(events))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Dashboard running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Parse the roadmap, degrading any failure to an empty roadmap so the
/// dashboard stays available.
fn load_roadmap(state: &AppState) -> Roadmap {
    roadmap::parse_roadmap(&state.config.roadmap_path).unwrap_or_else(|err| {
        tracing::warn!("roadmap parse failed, serving empty roadmap: {err}");
        Roadmap::new()
    })
}

/// Dashboard page shell.
async fn index() -> Html<&'static str> {
    Html(page::dashboard_page())
}

/// Status table fragment.
async fn get_status(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_status(&load_roadmap(&state)))
}

/// Mermaid dependency graph fragment.
async fn get_dag(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_dag(&load_roadmap(&state).tasks))
}

/// Activity feed fragment.
async fn get_activity(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_activity(&tail_activity(
        &state.config.activity_log_path,
    )))
}

/// Machine-readable status counts.
async fn get_status_json(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let roadmap = load_roadmap(&state);
    Json(serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "totals": roadmap.totals,
    }))
}

/// SSE refresh stream for live viewers.
///
/// Sends a one-time `connected` payload, then a `refresh` payload whenever
/// the watcher reports a change. The stream ends when the channel prunes
/// the subscription or its maximum lifetime elapses; either way the
/// subscription leaves the set when the stream is dropped.
async fn events(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, String)> {
    let subscription = state.live.subscribe().map_err(|err| {
        tracing::debug!("viewer rejected: {err}");
        (StatusCode::TOO_MANY_REQUESTS, "Too many clients".to_string())
    })?;

    Ok(Sse::new(subscription_stream(subscription)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    ))
}

/// Turn a subscription into its SSE event stream.
///
/// The stream ends (and the subscription leaves the set) when the channel
/// prunes the subscription or the lifetime deadline fires, whichever comes
/// first.
fn subscription_stream(
    mut subscription: Subscription,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        yield Ok(Event::default().data("connected"));

        let deadline = tokio::time::Instant::now() + MAX_SUBSCRIPTION_LIFETIME;
        loop {
            tokio::select! {
                payload = subscription.recv() => match payload {
                    Some(payload) => yield Ok(Event::default().data(payload)),
                    None => break,
                },
                _ = tokio::time::sleep_until(deadline) => break,
            }
        }
    }
}

/// Render the status table fragment, one row per vocabulary marker.
fn render_status(roadmap: &Roadmap) -> String {
    let mut html = String::from("<table><tr><th>Status</th><th>Count</th></tr>");
    for (marker, label, class) in STATUS_MARKERS {
        let count = roadmap.totals.get(&marker).copied().unwrap_or(0);
        html.push_str(&format!(
            "<tr><td><span class=\"m {}\">{}</span></td><td>{}</td></tr>",
            class, label, count
        ));
    }
    html.push_str("</table>");
    html
}

/// Render the activity feed fragment, newest event first.
fn render_activity(events: &[ActivityEvent]) -> String {
    if events.is_empty() {
        return r#"<p style="color:#999">No activity yet</p>"#.to_string();
    }
    events
        .iter()
        .rev()
        .map(|event| {
            format!(
                "<div class=\"item\"><strong>{}</strong> {} {}</div>",
                escape_html(&field_str(&event.timestamp)),
                escape_html(&field_str(&event.event)),
                escape_html(&field_str(&event.detail)),
            )
        })
        .collect()
}

/// Stringify one field of an activity event; a null (or absent) field
/// renders as empty text rather than being an error.
fn field_str(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::live::MAX_SUBSCRIBERS;
    use tokio_test::assert_ok;
    use crate::roadmap::parse_roadmap_text;
    use std::io::Write;
    use std::path::PathBuf;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            config: Config::new(
                PathBuf::from("/nonexistent/ROADMAP.md"),
                PathBuf::from("/nonexistent/activity.jsonl"),
            ),
            live: LiveChannel::new(),
        })
    }

    #[test]
    fn status_table_has_one_row_per_marker() {
        let roadmap = parse_roadmap_text("- [x] Done thing #T1\n");
        let html = render_status(&roadmap);
        assert_eq!(html.matches("<tr>").count(), 1 + STATUS_MARKERS.len());
        assert!(html.contains("<span class=\"m done\">Done</span></td><td>1</td>"));
        assert!(html.contains("<span class=\"m todo\">Todo</span></td><td>0</td>"));
    }

    #[test]
    fn empty_activity_renders_placeholder() {
        assert!(render_activity(&[]).contains("No activity yet"));
    }

    fn activity_event(json: serde_json::Value) -> ActivityEvent {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn activity_renders_newest_first_and_escapes() {
        let events = vec![
            activity_event(serde_json::json!({"timestamp": "t1", "event": "older", "detail": "<x>"})),
            activity_event(serde_json::json!({"timestamp": "t2", "event": "newer"})),
        ];
        let html = render_activity(&events);
        let newer = html.find("newer").unwrap();
        let older = html.find("older").unwrap();
        assert!(newer < older);
        assert!(html.contains("&lt;x&gt;"));
        assert!(!html.contains("<x>"));
    }

    #[test]
    fn field_str_handles_non_string_values() {
        let event = activity_event(serde_json::json!({"timestamp": 42, "detail": null}));
        assert_eq!(field_str(&event.timestamp), "42");
        assert_eq!(field_str(&event.detail), "");
        assert_eq!(field_str(&event.event), "");
    }

    #[tokio::test]
    async fn status_json_reports_totals_and_timestamp() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "- [x] Build API #T1").unwrap();
        let state = Arc::new(AppState {
            config: Config::new(
                file.path().to_path_buf(),
                PathBuf::from("/nonexistent/activity.jsonl"),
            ),
            live: LiveChannel::new(),
        });

        let Json(body) = get_status_json(State(state)).await;
        assert!(body["timestamp"].is_string());
        assert_eq!(body["totals"]["x"], 1);
        assert_eq!(body["totals"][" "], 0);
    }

    #[tokio::test]
    async fn unreadable_roadmap_degrades_to_empty_dashboard() {
        let state = test_state();
        let Html(dag) = get_dag(State(Arc::clone(&state))).await;
        assert!(dag.contains("No tasks found"));
        let Html(status) = get_status(State(state)).await;
        assert!(status.contains("<td>0</td>"));
    }

    #[tokio::test]
    async fn events_rejects_the_sixth_concurrent_viewer() {
        let state = test_state();
        let mut open = Vec::new();
        for _ in 0..MAX_SUBSCRIBERS {
            open.push(
                events(State(Arc::clone(&state)))
                    .await
                    .map_err(|(code, _)| code)
                    .expect("within capacity"),
            );
        }

        let rejected = events(State(Arc::clone(&state))).await;
        match rejected {
            Err((code, body)) => {
                assert_eq!(code, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(body, "Too many clients");
            }
            Ok(_) => panic!("expected rejection over capacity"),
        }

        // Closing one stream frees exactly one slot.
        drop(open.pop());
        assert!(events(State(Arc::clone(&state))).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn stream_closes_when_lifetime_expires() {
        use futures::StreamExt;

        let channel = LiveChannel::new();
        let subscription = channel.subscribe().unwrap();
        let mut stream = Box::pin(subscription_stream(subscription));

        let greeting = stream.next().await.unwrap().unwrap();
        assert!(format!("{:?}", greeting).contains("connected"));
        assert_eq!(channel.subscriber_count(), 1);

        // A refresh inside the lifetime still flows through.
        channel.notify_refresh();
        let refresh = stream.next().await.unwrap().unwrap();
        assert!(format!("{:?}", refresh).contains("refresh"));

        // With no further payloads the next poll resolves only once the
        // lifetime deadline fires and ends the stream.
        assert!(stream.next().await.is_none());

        // The expired viewer has left the set; its slot is free again.
        assert_eq!(channel.subscriber_count(), 0);
        assert_ok!(channel.subscribe());
    }
}
