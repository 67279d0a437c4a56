//! HTTP API for the dashboard.
//!
//! ## Endpoints
//!
//! - `GET /` - Static dashboard page shell
//! - `GET /api/status` - Status table fragment (HTML)
//! - `GET /api/dag` - Mermaid dependency graph fragment (HTML)
//! - `GET /api/activity` - Activity feed fragment (HTML)
//! - `GET /api/status.json` - Machine-readable status counts (JSON)
//! - `GET /events` - SSE refresh stream for live viewers

pub mod live;
mod page;
mod routes;

pub use routes::serve;
