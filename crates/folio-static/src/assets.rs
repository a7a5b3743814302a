//! Asset pipeline for CSS and JavaScript processing.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the browser runtime: copy buttons, package manager tabs and
    /// the table of contents tracker.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* folio blog theme */

:root {
  --background: #0b0b0f;
  --foreground: #e8e8ed;
  --muted: #9a9aa5;
  --border: #26262e;
  --card: #14141a;
  --primary: #8b9cff;
  --code-bg: #111117;
  --radius: 0.5rem;
  --font-sans: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif;
  --font-mono: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace;
  --navbar-height: 3.5rem;
  --toc-width: 16rem;
}

*,
*::before,
*::after {
  box-sizing: border-box;
}

html {
  scroll-behavior: smooth;
  scroll-padding-top: calc(var(--navbar-height) + 1rem);
}

body {
  margin: 0;
  background: var(--background);
  color: var(--foreground);
  font-family: var(--font-sans);
  line-height: 1.7;
}

a {
  color: var(--primary);
  text-decoration: none;
}

a:hover {
  text-decoration: underline;
}

/* Navbar */
.navbar {
  position: sticky;
  top: 0;
  z-index: 10;
  display: flex;
  align-items: center;
  justify-content: space-between;
  height: var(--navbar-height);
  padding: 0 1.5rem;
  background: var(--background);
  border-bottom: 1px solid var(--border);
}

.nav-logo {
  font-weight: 600;
  color: var(--foreground);
}

.nav-links a {
  margin-left: 1.25rem;
  color: var(--muted);
}

.nav-links a:hover {
  color: var(--foreground);
}

.main {
  max-width: 72rem;
  margin: 0 auto;
  padding: 2.5rem 1.5rem 4rem;
}

/* Home and listings */
.hero h1 {
  font-size: 2.5rem;
  margin: 0 0 0.5rem;
}

.hero p,
.subtitle {
  color: var(--muted);
  max-width: 40rem;
}

.post-list {
  display: grid;
  gap: 1rem;
  margin: 1.5rem 0;
}

.post-card {
  display: block;
  padding: 1.25rem;
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  color: var(--foreground);
  transition: border-color 0.15s ease;
}

.post-card:hover {
  border-color: var(--primary);
  text-decoration: none;
}

.post-card h3 {
  margin: 0.5rem 0 0.25rem;
}

.post-card p {
  margin: 0;
  color: var(--muted);
}

.post-meta {
  display: flex;
  flex-wrap: wrap;
  align-items: center;
  gap: 0.5rem;
  color: var(--muted);
  font-size: 0.875rem;
}

.tags {
  display: flex;
  gap: 0.375rem;
}

.tag,
.tag-more,
.badge {
  padding: 0.125rem 0.5rem;
  border: 1px solid var(--border);
  border-radius: 999px;
  font-size: 0.75rem;
}

.empty {
  color: var(--muted);
  font-style: italic;
}

/* Post layout */
.post-layout {
  display: grid;
  grid-template-columns: minmax(0, 1fr) var(--toc-width);
  gap: 3rem;
}

.post {
  min-width: 0;
}

.post-header h1 {
  font-size: 2.25rem;
  line-height: 1.2;
  margin: 1rem 0 0.75rem;
}

.post-description {
  color: var(--muted);
  font-size: 1.125rem;
}

.post-footer {
  margin-top: 3rem;
  padding-top: 1.5rem;
  border-top: 1px solid var(--border);
}

.back {
  color: var(--muted);
  font-size: 0.875rem;
}

.content h2,
.content h3 {
  margin-top: 2.5rem;
  line-height: 1.3;
}

.content img {
  max-width: 100%;
}

.content table {
  width: 100%;
  border-collapse: collapse;
}

.content th,
.content td {
  padding: 0.5rem;
  border: 1px solid var(--border);
}

.content code {
  font-family: var(--font-mono);
  font-size: 0.875em;
}

.content :not(pre) > code {
  padding: 0.125rem 0.375rem;
  background: var(--code-bg);
  border-radius: 0.25rem;
}

/* Code blocks */
.code-block {
  position: relative;
  margin: 1.5rem 0;
  padding: 1rem;
  overflow-x: auto;
  background: var(--code-bg);
  border: 1px solid var(--border);
  border-radius: var(--radius);
}

.code-block[data-filename]::before {
  content: attr(data-filename);
  display: block;
  margin: -1rem -1rem 1rem;
  padding: 0.375rem 1rem;
  border-bottom: 1px solid var(--border);
  color: var(--muted);
  font-size: 0.75rem;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.5rem;
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: 0.25rem;
  color: var(--muted);
  font-size: 0.75rem;
  cursor: pointer;
  opacity: 0;
  transition: opacity 0.15s ease;
}

.code-block:hover .copy-btn {
  opacity: 1;
}

/* Package manager tabs */
.pm-tabs {
  margin: 1.5rem 0;
}

.pm-tab-list {
  display: flex;
  gap: 0.25rem;
}

.pm-tab {
  padding: 0.25rem 0.75rem;
  background: none;
  border: 1px solid transparent;
  border-radius: 0.25rem 0.25rem 0 0;
  color: var(--muted);
  font-family: var(--font-mono);
  font-size: 0.8125rem;
  cursor: pointer;
}

.pm-tab.active {
  border-color: var(--border);
  border-bottom-color: var(--code-bg);
  background: var(--code-bg);
  color: var(--foreground);
}

.pm-panel {
  margin-top: 0;
  border-top-left-radius: 0;
}

/* Migration checklist */
.checklist {
  margin: 2rem 0;
  padding: 1.5rem;
  border: 1px solid var(--border);
  border-radius: var(--radius);
  background: var(--card);
}

.checklist-title {
  font-size: 1.25rem;
  font-weight: 700;
  margin-bottom: 0.5rem;
}

.checklist-progress {
  display: flex;
  align-items: center;
  gap: 1rem;
  margin-bottom: 1rem;
  color: var(--muted);
  font-size: 0.875rem;
}

.checklist-bar {
  flex: 1;
  height: 0.5rem;
  border-radius: 9999px;
  background: var(--border);
}

.checklist-fill {
  height: 100%;
  border-radius: 9999px;
  background: var(--primary);
  transition: width 0.3s ease;
}

.checklist-section + .checklist-section {
  margin-top: 1rem;
}

.checklist-section-title {
  font-weight: 600;
  margin-bottom: 0.5rem;
}

.checklist-item {
  display: flex;
  align-items: flex-start;
  gap: 0.75rem;
  padding: 0.25rem 0.5rem;
  cursor: pointer;
}

.checklist-item.done span {
  text-decoration: line-through;
  color: var(--muted);
}

/* Table of contents */
.toc {
  position: sticky;
  top: calc(var(--navbar-height) + 2rem);
  align-self: start;
  max-height: calc(100vh - var(--navbar-height) - 4rem);
  overflow-y: auto;
  font-size: 0.875rem;
  visibility: hidden;
}

.toc.ready {
  visibility: visible;
}

.toc h2 {
  margin: 0 0 0.75rem;
  color: var(--muted);
  font-size: 0.75rem;
  letter-spacing: 0.05em;
  text-transform: uppercase;
}

.toc ul {
  margin: 0;
  padding: 0;
  list-style: none;
}

.toc-row {
  display: flex;
  align-items: center;
  gap: 0.25rem;
}

.toc-toggle {
  width: 1.25rem;
  padding: 0;
  background: none;
  border: none;
  color: var(--muted);
  cursor: pointer;
  transition: transform 0.15s ease;
}

.toc-section.expanded > .toc-row .toc-toggle {
  transform: rotate(90deg);
}

.toc-link {
  display: block;
  overflow: hidden;
  padding: 0.25rem 0;
  color: var(--muted);
  text-overflow: ellipsis;
  white-space: nowrap;
  border-left: 2px solid transparent;
}

.toc-link.active {
  color: var(--primary);
  font-weight: 500;
}

.toc-children {
  padding-left: 1.5rem;
}

.toc-level-3 {
  padding-left: 0.5rem;
}

.toc-level-4,
.toc-level-5,
.toc-level-6 {
  padding-left: 1rem;
}

.toc-hidden {
  display: none;
}

/* About */
.about .badge {
  display: inline-block;
  margin-top: 1rem;
}

@media (max-width: 1024px) {
  .post-layout {
    grid-template-columns: minmax(0, 1fr);
  }

  .toc {
    display: none;
  }
}
"#;

const DEFAULT_JS: &str = r#"// folio runtime
(function() {
  'use strict';

  // Copy button for code blocks
  document.querySelectorAll('.content pre.code-block').forEach(pre => {
    if (pre.querySelector('.copy-btn')) return;

    const btn = document.createElement('button');
    btn.className = 'copy-btn';
    btn.textContent = 'Copy';
    btn.setAttribute('type', 'button');

    btn.addEventListener('click', async () => {
      const code = pre.querySelector('code');
      const text = code ? code.textContent : pre.textContent;

      try {
        await navigator.clipboard.writeText(text || '');
        btn.textContent = 'Copied!';
      } catch (err) {
        btn.textContent = 'Error';
      }
      setTimeout(() => { btn.textContent = 'Copy'; }, 2000);
    });

    pre.appendChild(btn);
  });

  // Package manager tabs; the chosen manager applies to every tab group
  const PM_KEY = 'folio:package-manager';

  function selectManager(pm) {
    document.querySelectorAll('.pm-tabs').forEach(group => {
      if (!group.querySelector(`.pm-tab[data-pm="${pm}"]`)) return;
      group.querySelectorAll('.pm-tab').forEach(tab => {
        const on = tab.dataset.pm === pm;
        tab.classList.toggle('active', on);
        tab.setAttribute('aria-selected', String(on));
      });
      group.querySelectorAll('.pm-panel').forEach(panel => {
        panel.hidden = panel.dataset.pm !== pm;
      });
    });
  }

  document.querySelectorAll('.pm-tab').forEach(tab => {
    tab.addEventListener('click', () => {
      selectManager(tab.dataset.pm);
      try { localStorage.setItem(PM_KEY, tab.dataset.pm); } catch (err) {}
    });
  });

  try {
    const saved = localStorage.getItem(PM_KEY);
    if (saved) selectManager(saved);
  } catch (err) {}

  // Migration checklists; progress is recounted from the boxes on every change
  document.querySelectorAll('[data-checklist]').forEach(list => {
    const boxes = Array.from(list.querySelectorAll('input[data-item]'));
    const fill = list.querySelector('.checklist-fill');
    const count = list.querySelector('.checklist-count');

    function update() {
      const done = boxes.filter(box => box.checked).length;
      const percent = boxes.length === 0 ? 0 : Math.round((done / boxes.length) * 100);
      boxes.forEach(box => box.closest('.checklist-item').classList.toggle('done', box.checked));
      if (fill) fill.style.width = `${percent}%`;
      if (count) count.textContent = `${done}/${boxes.length} completed (${percent}%)`;
    }

    boxes.forEach(box => box.addEventListener('change', update));
  });

  // Table of contents
  const toc = document.querySelector('[data-toc]');
  const settingsEl = document.getElementById('toc-settings');
  if (!toc || !settingsEl) return;

  const settings = JSON.parse(settingsEl.textContent);

  const state = {
    active: null,
    pending: null,
    timer: null,
    expanded: new Set(),
    manual: new Set(),
    override: false,
  };

  const sections = Array.from(toc.querySelectorAll('.toc-section')).map(li => ({
    id: li.dataset.section,
    el: li,
    children: Array.from(li.querySelectorAll('.toc-children [data-target]'))
      .map(a => a.dataset.target),
  }));

  function findSection(id) {
    return sections.find(s => s.id === id || s.children.includes(id));
  }

  function render() {
    toc.querySelectorAll('.toc-link').forEach(link => {
      link.classList.toggle('active', link.dataset.target === state.active);
    });
    sections.forEach(section => {
      const open = state.expanded.has(section.id);
      section.el.classList.toggle('expanded', open);
      const list = section.el.querySelector('.toc-children');
      if (list) list.hidden = !open;
    });
  }

  function recompute() {
    if (state.override) {
      state.override = false;
      return;
    }
    if (!state.active) return;
    const section = findSection(state.active);
    if (!section) return;

    state.expanded = new Set(state.manual);
    if (section.children.length > 0) state.expanded.add(section.id);
  }

  function confirm() {
    state.timer = null;
    if (state.pending === null || state.pending === state.active) return;
    state.active = state.pending;
    recompute();
    render();
  }

  function nominate(id) {
    if (!id || id === state.pending) return;
    state.pending = id;
    clearTimeout(state.timer);
    state.timer = setTimeout(confirm, settings.debounceMs);
  }

  function activate(id) {
    clearTimeout(state.timer);
    state.timer = null;
    state.pending = id;
    state.active = id;
  }

  // Nominate the intersecting heading nearest the reference line
  function onIntersect(entries) {
    let best = null;
    entries.forEach(entry => {
      if (!entry.isIntersecting) return;
      const distance = Math.abs(entry.boundingClientRect.top - settings.referenceLine);
      if (best === null || distance < best.distance) {
        best = { id: entry.target.id, distance };
      }
    });
    if (best) nominate(best.id);
  }

  toc.querySelectorAll('.toc-link').forEach(link => {
    link.addEventListener('click', () => {
      const id = link.dataset.target;
      activate(id);
      const section = findSection(id);
      if (section && section.children.length > 0) {
        state.override = true;
        state.manual = new Set([section.id]);
        state.expanded = new Set([section.id]);
      } else if (section) {
        state.override = true;
        state.manual.clear();
        state.expanded.clear();
      }
      recompute();
      render();
    });
  });

  toc.querySelectorAll('.toc-toggle').forEach(btn => {
    btn.addEventListener('click', event => {
      event.preventDefault();
      const id = btn.dataset.toggle;
      state.override = true;
      if (state.expanded.has(id)) {
        state.expanded.delete(id);
        state.manual.delete(id);
      } else {
        state.expanded.add(id);
        state.manual.add(id);
      }
      render();
    });
  });

  // Hide entries whose heading did not make it into the page
  setTimeout(() => {
    let visible = 0;
    toc.querySelectorAll('.toc-link').forEach(link => {
      const present = document.getElementById(link.dataset.target) !== null;
      link.closest('li').classList.toggle('toc-hidden', !present);
      if (present) visible += 1;
    });
    if (visible === 0) {
      toc.remove();
      return;
    }
    toc.classList.add('ready');
  }, settings.reconcileDelayMs);

  if (!('IntersectionObserver' in window)) return;

  setTimeout(() => {
    const observer = new IntersectionObserver(onIntersect, {
      rootMargin: settings.rootMargin,
      threshold: settings.thresholds,
    });
    toc.querySelectorAll('.toc-link').forEach(link => {
      const heading = document.getElementById(link.dataset.target);
      if (heading) observer.observe(heading);
    });
  }, settings.observeDelayMs);
})();
"#;
