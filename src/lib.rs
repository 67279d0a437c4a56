//! # taskdash
//!
//! Live-updating task dashboard. A human-authored markdown checklist
//! (status markers, dependency annotations, trailing task ids) is parsed
//! into a task graph on every request and rendered as a status table and a
//! Mermaid dependency graph; connected viewers are told to re-fetch over
//! SSE whenever the source files change.
//!
//! ## Data flow
//!
//! ```text
//!  ROADMAP.md ──┐                        ┌─> /api/status   (table)
//!               ├─ watch ─ debounce ─┐   ├─> /api/dag      (Mermaid)
//!  activity ────┘                    │   ├─> /api/activity (feed)
//!  .jsonl                            ▼   │
//!                             LiveChannel ── /events (SSE "refresh")
//!                                        │
//!                  viewers re-fetch ─────┘
//! ```
//!
//! There is no persistent task store: every fetch re-parses the roadmap
//! file, and the SSE channel only ever says "something changed".
//!
//! ## Modules
//! - `roadmap`: checklist parser and task model
//! - `dag`: Mermaid serialization of the task graph
//! - `activity`: activity-log tailer
//! - `watch`: file watching with a shared debounce window
//! - `api`: HTTP routes, live viewer channel, page shell

pub mod activity;
pub mod api;
pub mod config;
pub mod dag;
pub mod roadmap;
pub mod util;
pub mod watch;

pub use config::Config;
