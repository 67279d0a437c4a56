//! Static dashboard page shell.
//!
//! The page is a single self-contained HTML document. All live behavior is
//! client-side: htmx polls the fragment endpoints on load and on every
//! `refresh` pushed over the `/events` SSE stream, and Mermaid re-renders
//! the dependency graph after each swap. The server never templates
//! anything into this shell.

/// The dashboard HTML document served at `/`.
pub fn dashboard_page() -> &'static str {
    r##"<!DOCTYPE html><html><head><meta charset="UTF-8"><meta name="viewport" content="width=device-width,initial-scale=1">
<title>Task Dashboard</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css" integrity="sha384-L1dWfspMTHU/ApYnFiMz2QID/PlP1xCW9visvBdbEkOLkSSWsP6ZJWhPw6apiXxU" crossorigin="anonymous">
<script src="https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.min.js" integrity="sha384-jFhLSLFn4m565eRAS0CDMWubMqOtfZWWbE8kqgGdU+VHbJ3B2G/4X8u+0BM8MtdU" crossorigin="anonymous"></script>
<script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous"></script>
<script src="https://unpkg.com/htmx-ext-sse@2.2.4/sse.js" integrity="sha384-QA9wXqexhwzXTuTvuF5QP82pddm3R2hy81UzXi7ioNTqNF2b75hlkkSGjafohhL3" crossorigin="anonymous"></script>
<style>
body{padding:20px}h1{margin-bottom:8px}h2{font-size:18px;margin:20px 0 12px}
.grid{display:grid;grid-template-columns:1fr 1fr;gap:24px;margin-bottom:24px}
table{width:100%}
.m{padding:2px 8px;border-radius:4px;font-weight:600;font-size:11px}
.draft{background:#fef08a}.todo{background:#e5e7eb}.wip{background:#bfdbfe}.review{background:#d8b4fe}
.done{background:#86efac}.blocked{background:#fca5a5}.racing{background:#fed7aa}
.card{background:var(--pico-card-background-color);padding:20px;border-radius:8px}
.item{padding:8px 0;border-bottom:1px solid var(--pico-muted-border-color);font-size:13px}
.item:last-child{border-bottom:0}.load{text-align:center;padding:20px;color:var(--pico-muted-color)}
</style></head>
<body><main class="container" hx-ext="sse" sse-connect="/events">
<h1>Task Dashboard</h1><p>Live task tracking with dependency visualization</p>
<div class="grid">
<div><h2>Task Status</h2><div id="status" hx-get="/api/status" hx-trigger="sse:refresh, load" hx-swap="innerHTML"><div class="load">Loading...</div></div></div>
<div><h2>Dependencies</h2><div class="card" id="dag" hx-get="/api/dag" hx-trigger="sse:refresh, load" hx-swap="innerHTML"><div class="load">Loading...</div></div></div>
</div>
<div class="card"><h2>Activity Feed</h2><div id="activity" hx-get="/api/activity" hx-trigger="sse:refresh, load" hx-swap="innerHTML"><div class="load">Loading...</div></div></div>
</main>
<script>mermaid.initialize({startOnLoad:false,theme:'default',securityLevel:'strict'});
document.body.addEventListener('htmx:afterSwap',function(e){
  if(e.detail.target.id==='dag'){mermaid.run({nodes:e.detail.target.querySelectorAll('.mermaid')})}
});</script></body></html>"##
}
