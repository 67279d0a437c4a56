//! Mermaid serialization of the task graph.
//!
//! Renders the parsed roadmap as a `graph TD` document the browser-side
//! Mermaid library draws: one styled node per task, one directed edge per
//! dependency. The output is embedded verbatim in a `<pre class="mermaid">`
//! block; the server knows nothing about Mermaid beyond this grammar.

use crate::roadmap::Task;

/// Node fill color per status marker.
const STATUS_COLORS: [(char, &str); 7] = [
    ('x', "#22c55e"),
    ('-', "#3b82f6"),
    ('~', "#a855f7"),
    (' ', "#94a3b8"),
    ('!', "#ef4444"),
    ('?', "#eab308"),
    ('>', "#f97316"),
];

/// Fallback fill for markers outside the palette.
const DEFAULT_COLOR: &str = "#94a3b8";

/// Node labels are truncated to keep the rendered graph readable.
const MAX_LABEL_CHARS: usize = 40;

fn color_for(marker: char) -> &'static str {
    STATUS_COLORS
        .iter()
        .find(|&&(m, _)| m == marker)
        .map(|&(_, c)| c)
        .unwrap_or(DEFAULT_COLOR)
}

/// Render the task graph as an embeddable Mermaid fragment.
///
/// An empty task list renders a placeholder paragraph instead of a graph:
/// Mermaid fails to initialize on a zero-node document, so an empty graph
/// must never reach the client.
///
/// Edges are emitted after all nodes, outer loop in document order, inner
/// loop in annotation order. A dependency id with no matching task still
/// gets its edge; Mermaid auto-declares the missing endpoint.
pub fn render_dag(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return r#"<p style="color:#999">No tasks found</p>"#.to_string();
    }
    let mut dag = String::from("graph TD\n");
    for task in tasks {
        let label: String = task.title.chars().take(MAX_LABEL_CHARS).collect();
        dag.push_str(&format!("  {}[\"{}\"]\n", task.id, label));
        dag.push_str(&format!(
            "  style {} fill:{},stroke:#333,color:#000\n",
            task.id,
            color_for(task.marker)
        ));
    }
    for task in tasks {
        for dep in &task.deps {
            dag.push_str(&format!("  {} --> {}\n", dep, task.id));
        }
    }
    format!("<pre class=\"mermaid\">{}</pre>", dag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::parse_roadmap_text;

    fn task(id: &str, title: &str, marker: char, deps: &[&str]) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            marker,
            deps: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn empty_roadmap_renders_placeholder_not_graph() {
        let out = render_dag(&[]);
        assert!(out.contains("No tasks found"));
        assert!(!out.contains("mermaid"));
        assert!(!out.contains("graph TD"));
    }

    #[test]
    fn nodes_are_styled_by_marker() {
        let out = render_dag(&[task("T1", "Build API", 'x', &[])]);
        assert!(out.starts_with("<pre class=\"mermaid\">graph TD\n"));
        assert!(out.contains("T1[\"Build API\"]"));
        assert!(out.contains("style T1 fill:#22c55e,stroke:#333,color:#000"));
    }

    #[test]
    fn unknown_marker_falls_back_to_neutral_color() {
        let out = render_dag(&[task("T1", "Odd", 'z', &[])]);
        assert!(out.contains("style T1 fill:#94a3b8"));
    }

    #[test]
    fn edges_point_from_dependency_to_task() {
        let out = render_dag(&[
            task("T1", "Build API", 'x', &[]),
            task("T2", "Write docs", ' ', &["T1"]),
        ]);
        assert!(out.contains("T1 --> T2"));
    }

    #[test]
    fn dangling_dependency_still_produces_one_edge() {
        let out = render_dag(&[task("T2", "Write docs", ' ', &["T99"])]);
        assert_eq!(out.matches("T99 --> T2").count(), 1);
        assert!(!out.contains("T99[\""));
    }

    #[test]
    fn edges_come_after_all_nodes() {
        let out = render_dag(&[
            task("T1", "A", 'x', &["T2"]),
            task("T2", "B", ' ', &[]),
        ]);
        let edge_pos = out.find("T2 --> T1").unwrap();
        let node_pos = out.find("T2[\"B\"]").unwrap();
        assert!(node_pos < edge_pos);
    }

    #[test]
    fn long_labels_are_truncated_on_char_boundaries() {
        let title = "é".repeat(60);
        let out = render_dag(&[task("T1", &title, ' ', &[])]);
        assert!(out.contains(&format!("T1[\"{}\"]", "é".repeat(40))));
    }

    #[test]
    fn renders_a_two_task_document_end_to_end() {
        let roadmap =
            parse_roadmap_text("- [x] Build API #T1\n- [ ] Write docs (depends: #T1) #T2\n");
        assert_eq!(roadmap.totals[&'x'], 1);
        assert_eq!(roadmap.totals[&' '], 1);
        assert_eq!(roadmap.totals.values().sum::<u32>(), 2);
        let out = render_dag(&roadmap.tasks);
        assert!(out.contains("T1[\"Build API\"]"));
        assert!(out.contains("T2[\"Write docs\"]"));
        assert!(out.contains("style T2 fill:#94a3b8"));
        assert!(out.contains("T1 --> T2"));
    }
}
