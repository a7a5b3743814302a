//! Markdown to HTML for post bodies.
//!
//! Heading elements get ids from the same [`HeadingIds`] strategy the table of
//! contents uses, code blocks carry their language and filename,
//! `<PackageManagerTabs />` elements expand to one snippet per manager and
//! `<MigrationChecklist />` elements become tickable lists.

use std::ops::Range;

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Parser, Tag, TagEnd};

use folio_mdx::codeblock::extract_filename;
use folio_mdx::heading::is_fence_delimiter;
use folio_mdx::checklist::{find_checklists, MigrationChecklist};
use folio_mdx::package_manager::{find_tabs, PackageManagerTabs};
use folio_mdx::{markdown_options, HeadingIds, Language, PackageManager};

/// Render post content to HTML.
pub fn render_markdown(content: &str, mut ids: HeadingIds) -> String {
    let content = expand_components(content);

    let mut events: Vec<Event> = Parser::new_ext(&content, markdown_options()).collect();
    assign_heading_ids(&mut events, &mut ids);

    let events = events.into_iter().map(|event| match event {
        Event::Start(Tag::CodeBlock(kind)) => Event::Html(open_code_block(&kind).into()),
        Event::End(TagEnd::CodeBlock) => Event::Html("</code></pre>\n".into()),
        other => other,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, events);

    html_output
}

/// Give every heading without an explicit id one derived from its text.
fn assign_heading_ids(events: &mut [Event], ids: &mut HeadingIds) {
    let mut i = 0;
    while i < events.len() {
        let Event::Start(Tag::Heading { id: None, .. }) = &events[i] else {
            i += 1;
            continue;
        };

        let mut text = String::new();
        let mut end = i + 1;
        while end < events.len() {
            match &events[end] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            end += 1;
        }

        if let Some(anchor) = ids.assign(text.trim()) {
            if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                *id = Some(CowStr::from(anchor));
            }
        }

        i = end + 1;
    }
}

fn open_code_block(kind: &CodeBlockKind) -> String {
    let info = match kind {
        CodeBlockKind::Fenced(info) => info.as_ref(),
        CodeBlockKind::Indented => "",
    };

    let language = Language::from_info(info);
    let filename = extract_filename(info)
        .map(|name| format!(r#" data-filename="{}""#, escape_attr(&name)))
        .unwrap_or_default();

    format!(
        r#"<pre class="code-block" data-language="{}"{}><code class="{}">"#,
        language.name(),
        filename,
        language.as_class()
    )
}

/// Replace component elements outside code fences with their markup.
fn expand_components(content: &str) -> String {
    let fences = fenced_ranges(content);

    let mut found: Vec<(Range<usize>, String)> = find_tabs(content)
        .into_iter()
        .map(|m| (m.start..m.end, tabs_html(&m.tabs)))
        .chain(
            find_checklists(content)
                .into_iter()
                .map(|m| (m.start..m.end, checklist_html(&m.checklist))),
        )
        .filter(|(range, _)| !fences.iter().any(|fence| fence.contains(&range.start)))
        .collect();
    found.sort_by_key(|(range, _)| range.start);

    let mut output = String::with_capacity(content.len());
    let mut cursor = 0;

    for (range, markup) in found {
        if range.start < cursor {
            continue;
        }

        output.push_str(&content[cursor..range.start]);
        output.push_str("\n\n");
        output.push_str(&markup);
        output.push_str("\n\n");
        cursor = range.end;
    }

    output.push_str(&content[cursor..]);
    output
}

/// Byte ranges covered by fenced code blocks, delimiters included.
fn fenced_ranges(content: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut open: Option<usize> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        if is_fence_delimiter(line) {
            match open.take() {
                Some(start) => ranges.push(start..offset + line.len()),
                None => open = Some(offset),
            }
        }
        offset += line.len();
    }

    if let Some(start) = open {
        ranges.push(start..content.len());
    }

    ranges
}

/// Tab markup for one snippet. Kept free of blank lines so markdown treats it
/// as a single HTML block.
fn tabs_html(tabs: &PackageManagerTabs) -> String {
    let default = PackageManager::default();
    let mut buttons = String::new();
    let mut panels = String::new();

    for manager in PackageManager::ALL {
        let selected = manager == default;
        buttons.push_str(&format!(
            r#"<button type="button" class="pm-tab{}" data-pm="{}" aria-selected="{}">{}</button>"#,
            if selected { " active" } else { "" },
            manager,
            selected,
            manager
        ));

        let snippet = escape_html(&tabs.snippet_for(manager)).replace('\n', "&#10;");
        panels.push_str(&format!(
            r#"<pre class="code-block pm-panel" data-pm="{}" data-language="bash"{}><code class="language-bash">{}</code></pre>"#,
            manager,
            if selected { "" } else { " hidden" },
            snippet
        ));
    }

    format!(
        r#"<div class="pm-tabs"><div class="pm-tab-list" role="tablist">{}</div>{}</div>"#,
        buttons, panels
    )
}

/// Checklist markup with progress filled in for items that start ticked.
fn checklist_html(checklist: &MigrationChecklist) -> String {
    let total = checklist.total_items();
    let done = checklist.completed_items();
    let percent = checklist.progress_percent(done);

    let mut sections = String::new();
    for section in &checklist.sections {
        let mut items = String::new();
        for item in &section.items {
            items.push_str(&format!(
                r#"<label class="checklist-item{}"><input type="checkbox" data-item="{}"{}><span>{}</span></label>"#,
                if item.completed { " done" } else { "" },
                escape_attr(&item.id),
                if item.completed { " checked" } else { "" },
                escape_html(&item.text)
            ));
        }
        sections.push_str(&format!(
            r#"<div class="checklist-section"><div class="checklist-section-title">{}</div>{}</div>"#,
            escape_html(&section.title),
            items
        ));
    }

    format!(
        concat!(
            r#"<div class="checklist" data-checklist data-total="{total}">"#,
            r#"<div class="checklist-header"><div class="checklist-title">Migration Checklist</div>"#,
            r#"<div class="checklist-progress"><div class="checklist-bar"><div class="checklist-fill" style="width: {percent}%"></div></div>"#,
            r#"<span class="checklist-count">{done}/{total} completed ({percent}%)</span></div></div>"#,
            r#"{sections}</div>"#
        ),
        total = total,
        percent = percent,
        done = done,
        sections = sections
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(text: &str) -> String {
    escape_html(text).replace('"', "&quot;")
}
