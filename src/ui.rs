//! Dashboard page rendering.
//!
//! One HTML template serves both roles; a [`Theme`] struct holds the
//! palette and is injected as CSS custom properties, so restyling the
//! dashboard is a matter of swapping the theme constant rather than
//! duplicating the markup.

/// Palette for the dashboard. Injected into the page as CSS variables.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: &'static str,
    pub surface: &'static str,
    pub accent: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
}

/// The default dark theme.
pub const DARK: Theme = Theme {
    background: "#0e1117",
    surface: "#1e2130",
    accent: "#00d4ff",
    text: "#ffffff",
    muted: "#3d4455",
};

/// Render the two-role dashboard page with the given theme.
pub fn dashboard_page(theme: &Theme) -> String {
    let vars = format!(
        ":root{{--bg:{};--surface:{};--accent:{};--text:{};--muted:{}}}",
        theme.background, theme.surface, theme.accent, theme.text, theme.muted
    );
    PAGE.replace("/*THEME*/", &vars)
}

const PAGE: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Living Inbox</title>
<style>
/*THEME*/
* { box-sizing: border-box; }
body {
  margin: 0; padding: 2rem; background: var(--bg); color: var(--text);
  font-family: system-ui, -apple-system, sans-serif;
}
h1 { color: var(--accent); letter-spacing: -1px; margin-bottom: 0.25rem; }
.caption { color: var(--muted); margin-bottom: 2rem; }
.tabs button {
  background: var(--surface); color: var(--text); border: 1px solid var(--muted);
  padding: 0.5rem 1.25rem; border-radius: 8px 8px 0 0; cursor: pointer;
}
.tabs button.active { border-color: var(--accent); color: var(--accent); }
.panel {
  background: var(--surface); border: 1px solid var(--muted);
  border-radius: 0 10px 10px 10px; padding: 1.5rem; max-width: 720px;
}
label { display: block; margin: 0.75rem 0 0.25rem; color: var(--accent); font-size: 0.85rem; }
input, textarea, select {
  width: 100%; padding: 0.5rem; background: var(--bg); color: var(--text);
  border: 1px solid var(--muted); border-radius: 6px;
}
textarea { min-height: 7rem; }
button.action {
  margin-top: 1rem; background: var(--accent); color: var(--bg); border: none;
  padding: 0.6rem 1.5rem; border-radius: 8px; font-weight: 700; cursor: pointer;
}
.card {
  margin-top: 1.5rem; padding: 1.25rem; background: var(--bg);
  border: 1px solid var(--accent); border-radius: 10px; white-space: pre-wrap;
}
.card.error { border-color: #ff5470; color: #ff5470; }
.hidden { display: none; }
</style>
</head>
<body>
<h1>Living Inbox</h1>
<p class="caption">Developer updates and client answers, one shared brain per project.</p>

<div class="tabs">
  <button id="tab-client" class="active" onclick="showRole('client')">Client Portal</button>
  <button id="tab-developer" onclick="showRole('developer')">Developer Hub</button>
</div>

<div id="panel-client" class="panel">
  <label for="client-id">Access key (client id)</label>
  <input id="client-id" placeholder="e.g. C01">
  <label for="client-question">Ask anything about your project's latest status</label>
  <input id="client-question" placeholder="e.g. What did the developers finish today?">
  <button class="action" onclick="ask()">Ask</button>
  <div id="client-result" class="card hidden"></div>
</div>

<div id="panel-developer" class="panel hidden">
  <label for="dev-id">Developer id</label>
  <input id="dev-id" placeholder="e.g. D505">
  <button class="action" onclick="loadProjects()">Load projects</button>
  <div id="dev-projects" class="hidden">
    <label for="dev-project">Project</label>
    <select id="dev-project"></select>
    <label for="dev-note">Log daily progress</label>
    <textarea id="dev-note" placeholder="Details about specific milestones reached..."></textarea>
    <button class="action" onclick="publish()">Publish to client inbox</button>
  </div>
  <div id="dev-result" class="card hidden"></div>
</div>

<script>
function showRole(role) {
  for (const r of ['client', 'developer']) {
    document.getElementById('panel-' + r).classList.toggle('hidden', r !== role);
    document.getElementById('tab-' + r).classList.toggle('active', r === role);
  }
}

async function call(path, body) {
  const resp = await fetch(path, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  const json = await resp.json();
  if (!resp.ok) throw new Error(json.error ? json.error.message : resp.statusText);
  return json;
}

function show(id, text, isError) {
  const el = document.getElementById(id);
  el.textContent = text;
  el.classList.remove('hidden');
  el.classList.toggle('error', !!isError);
}

async function ask() {
  try {
    const json = await call('/api/ask', {
      customer_id: document.getElementById('client-id').value.trim(),
      question: document.getElementById('client-question').value.trim(),
    });
    show('client-result', json.answer, false);
  } catch (e) {
    show('client-result', e.message, true);
  }
}

async function loadProjects() {
  try {
    const json = await call('/api/projects', {
      developer_id: document.getElementById('dev-id').value.trim(),
    });
    const select = document.getElementById('dev-project');
    select.innerHTML = '';
    for (const p of json.projects) {
      const opt = document.createElement('option');
      opt.value = p.customer_id;
      opt.textContent = p.client_name + ' (' + p.customer_id + ')';
      select.appendChild(opt);
    }
    document.getElementById('dev-projects').classList.remove('hidden');
    document.getElementById('dev-result').classList.add('hidden');
  } catch (e) {
    show('dev-result', e.message, true);
  }
}

async function publish() {
  try {
    const json = await call('/api/publish', {
      developer_id: document.getElementById('dev-id').value.trim(),
      customer_id: document.getElementById('dev-project').value,
      note: document.getElementById('dev-note').value,
    });
    show('dev-result', 'Published to ' + json.client_name + ' (' + json.customer_id + ').', false);
    document.getElementById('dev-note').value = '';
  } catch (e) {
    show('dev-result', e.message, true);
  }
}
</script>
</body>
</html>
"##;
