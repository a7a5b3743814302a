//! The table of contents for one document.
//!
//! Ties the heading list, the section tree, the active-section tracker and the
//! expand/collapse state together, and is the only thing that mutates them.

use std::collections::{BTreeSet, HashSet};
use std::time::Instant;

use folio_mdx::{extract_headings_with, HeadingIds, HeadingRecord};
use serde::Serialize;

use crate::expansion::SectionExpansion;
use crate::organizer::{find_section, organize, SectionNode};
use crate::reconcile::retain_rendered;
use crate::tracker::{ActiveSectionTracker, TrackerConfig};
use crate::visibility::VisibilityEntry;

/// How the navigation panel should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    /// Headings have not been checked against the rendered page yet
    #[default]
    Loading,
    /// Checked, and there is nothing to show
    Hidden,
    Shown,
}

/// Host-facing view of the current state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TocSnapshot {
    pub active_id: Option<String>,
    pub expanded: Vec<String>,
    pub display: Display,
}

/// Table of contents state for one document.
#[derive(Debug, Clone)]
pub struct TableOfContents {
    config: TrackerConfig,
    unique_ids: bool,
    headings: Vec<HeadingRecord>,
    sections: Vec<SectionNode>,
    tracker: ActiveSectionTracker,
    expansion: SectionExpansion,
    reconciled: bool,
}

impl TableOfContents {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            tracker: ActiveSectionTracker::new(config.debounce),
            config,
            unique_ids: false,
            headings: Vec::new(),
            sections: Vec::new(),
            expansion: SectionExpansion::new(),
            reconciled: false,
        }
    }

    /// Suffix duplicate heading ids instead of letting them collide.
    pub fn with_unique_ids(mut self, unique: bool) -> Self {
        self.unique_ids = unique;
        self
    }

    /// Build from a document source in one step.
    pub fn from_source(source: &str, config: TrackerConfig) -> Self {
        let mut toc = Self::new(config);
        toc.set_source(source);
        toc
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn headings(&self) -> &[HeadingRecord] {
        &self.headings
    }

    pub fn sections(&self) -> &[SectionNode] {
        &self.sections
    }

    pub fn tracker(&self) -> &ActiveSectionTracker {
        &self.tracker
    }

    pub fn expansion(&self) -> &SectionExpansion {
        &self.expansion
    }

    pub fn active_id(&self) -> Option<&str> {
        self.tracker.active_id()
    }

    pub fn expanded(&self) -> &BTreeSet<String> {
        self.expansion.expanded()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expansion.is_expanded(id)
    }

    pub fn display(&self) -> Display {
        match (self.headings.is_empty(), self.reconciled) {
            (false, _) => Display::Shown,
            (true, true) => Display::Hidden,
            (true, false) => Display::Loading,
        }
    }

    pub fn snapshot(&self) -> TocSnapshot {
        TocSnapshot {
            active_id: self.active_id().map(str::to_string),
            expanded: self.expanded().iter().cloned().collect(),
            display: self.display(),
        }
    }

    /// Replace the document source.
    ///
    /// Headings and sections are rebuilt from scratch. Tracking state carries over
    /// unless the new headings share no id with the old ones.
    pub fn set_source(&mut self, source: &str) {
        let headings = extract_headings_with(source, &mut HeadingIds::from_flag(self.unique_ids));

        let previous: HashSet<&str> = self.headings.iter().map(|h| h.id.as_str()).collect();
        let unrelated = !previous.is_empty()
            && !headings.iter().any(|h| previous.contains(h.id.as_str()));

        if unrelated {
            tracing::debug!("Document headings replaced, resetting active section");
            self.tracker.reset();
            self.expansion.reset();
        }

        self.reconciled = false;
        self.replace_headings(headings);
    }

    /// Drop headings whose ids are missing from the rendered page.
    ///
    /// Returns whether any heading was dropped.
    pub fn reconcile(&mut self, rendered: &HashSet<String>) -> bool {
        self.reconciled = true;

        let kept = retain_rendered(&self.headings, rendered);
        if kept.len() == self.headings.len() {
            return false;
        }

        tracing::debug!(
            "Dropped {} headings missing from rendered output",
            self.headings.len() - kept.len()
        );
        self.replace_headings(kept);
        true
    }

    /// Feed one batch of visibility changes from the host.
    pub fn observe(&mut self, entries: &[VisibilityEntry], now: Instant) -> bool {
        self.tracker
            .observe(entries, self.config.observer.reference_line, now)
    }

    /// When [`TableOfContents::poll`] next needs to run.
    pub fn deadline(&self) -> Option<Instant> {
        self.tracker.deadline()
    }

    /// Confirm a pending nomination whose window has passed.
    ///
    /// Returns the newly active id; the expanded sections follow it.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let id = self.tracker.poll(now)?;
        tracing::debug!("Active section is now {}", id);
        self.expansion.recompute(Some(&id), &self.sections);
        Some(id)
    }

    /// Navigate to a heading from the table of contents.
    ///
    /// The heading becomes active at once, its section opens (or everything
    /// closes when the section has no children). Returns false for ids not in the
    /// current heading list.
    pub fn click(&mut self, id: &str) -> bool {
        if !self.headings.iter().any(|h| h.id == id) {
            return false;
        }

        self.tracker.activate(id);

        match find_section(&self.sections, id) {
            Some(section) if section.has_children() => {
                let section_id = section.id().to_string();
                self.expansion.expand_only(&section_id);
            }
            Some(_) => self.expansion.collapse_all(),
            None => {}
        }

        // The click's own update spends the override, so the next scroll
        // confirmation expands normally.
        self.expansion.recompute(self.tracker.active_id(), &self.sections);

        true
    }

    /// Open or close a section's disclosure.
    pub fn toggle(&mut self, id: &str) {
        self.expansion.toggle(id);
    }

    fn replace_headings(&mut self, headings: Vec<HeadingRecord>) {
        self.sections = organize(&headings);
        self.headings = headings;
        self.expansion.recompute(self.tracker.active_id(), &self.sections);
    }
}

impl Default for TableOfContents {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const DOC: &str = "# Guide\n## Install\n### npm\n### cargo\n## Usage\n### Basics\n## FAQ\n";

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn expanded(toc: &TableOfContents) -> Vec<&str> {
        toc.expanded().iter().map(String::as_str).collect()
    }

    fn all_ids(toc: &TableOfContents) -> HashSet<String> {
        toc.headings().iter().map(|h| h.id.clone()).collect()
    }

    #[test]
    fn builds_tree_from_source() {
        let toc = TableOfContents::from_source(DOC, TrackerConfig::default());

        let top: Vec<_> = toc.sections().iter().map(|s| s.id()).collect();
        assert_eq!(top, vec!["guide", "install", "usage", "faq"]);
        assert_eq!(toc.sections()[1].children.len(), 2);
        assert_eq!(toc.display(), Display::Shown);
    }

    #[test]
    fn display_states() {
        let mut toc = TableOfContents::from_source("no headings here", TrackerConfig::default());
        assert_eq!(toc.display(), Display::Loading);

        toc.reconcile(&HashSet::new());
        assert_eq!(toc.display(), Display::Hidden);
    }

    #[test]
    fn debounced_scroll_expands_section() {
        let t0 = Instant::now();
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());

        toc.observe(&[VisibilityEntry::new("npm", 4.0, true)], t0);
        toc.observe(&[VisibilityEntry::new("basics", 2.0, true)], t0 + ms(100));

        assert_eq!(toc.poll(t0 + ms(300)), None);
        assert_eq!(toc.poll(t0 + ms(500)), Some("basics".to_string()));
        assert_eq!(toc.active_id(), Some("basics"));
        assert_eq!(expanded(&toc), vec!["usage"]);
    }

    #[test]
    fn clicking_child_expands_parent() {
        let t0 = Instant::now();
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());

        // Scroll to FAQ, which collapses everything
        toc.observe(&[VisibilityEntry::new("faq", 0.0, true)], t0);
        toc.poll(t0 + ms(300));
        assert!(toc.expanded().is_empty());

        assert!(toc.click("cargo"));

        assert_eq!(toc.active_id(), Some("cargo"));
        assert_eq!(toc.tracker().deadline(), None);
        assert_eq!(expanded(&toc), vec!["install"]);
    }

    #[test]
    fn scrolling_after_click_expands_normally() {
        let t0 = Instant::now();
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());

        assert!(toc.click("npm"));
        assert_eq!(expanded(&toc), vec!["install"]);

        toc.observe(&[VisibilityEntry::new("basics", 0.0, true)], t0);
        assert_eq!(toc.poll(t0 + ms(300)), Some("basics".to_string()));

        assert_eq!(expanded(&toc), vec!["install", "usage"]);
    }

    #[test]
    fn re_reported_heading_after_click_is_not_renominated() {
        let t0 = Instant::now();
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());
        toc.click("npm");
        toc.toggle("install");

        toc.observe(&[VisibilityEntry::new("npm", 0.0, true)], t0);
        toc.observe(&[VisibilityEntry::new("npm", 0.0, true)], t0 + ms(50));

        assert_eq!(toc.deadline(), None);
        assert_eq!(toc.poll(t0 + ms(400)), None);
        assert!(toc.expanded().is_empty());
    }

    #[test]
    fn clicking_childless_section_collapses_all() {
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());
        toc.toggle("usage");

        assert!(toc.click("faq"));

        assert_eq!(toc.active_id(), Some("faq"));
        assert!(toc.expanded().is_empty());
        assert!(toc.expansion().manually_expanded().is_empty());
    }

    #[test]
    fn clicking_unknown_heading_is_ignored() {
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());

        assert!(!toc.click("missing"));
        assert_eq!(toc.active_id(), None);
    }

    #[test]
    fn toggle_suppresses_next_automatic_expand() {
        let t0 = Instant::now();
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());
        toc.observe(&[VisibilityEntry::new("npm", 0.0, true)], t0);
        toc.poll(t0 + ms(300));
        assert_eq!(expanded(&toc), vec!["install"]);

        toc.toggle("install");
        toc.observe(&[VisibilityEntry::new("basics", 0.0, true)], t0 + ms(400));
        toc.poll(t0 + ms(700));
        assert!(toc.expanded().is_empty());

        toc.observe(&[VisibilityEntry::new("npm", 0.0, true)], t0 + ms(800));
        toc.poll(t0 + ms(1100));
        assert_eq!(expanded(&toc), vec!["install"]);
    }

    #[test]
    fn reconcile_drops_unrendered_headings() {
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());
        let mut rendered = all_ids(&toc);
        rendered.remove("cargo");

        assert!(toc.reconcile(&rendered));
        assert_eq!(toc.sections()[1].children.len(), 1);
        assert!(!toc.reconcile(&rendered));
    }

    #[test]
    fn keeps_tracking_when_headings_overlap() {
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());
        toc.click("usage");

        toc.set_source("## Usage\n## Changelog");

        assert_eq!(toc.active_id(), Some("usage"));
    }

    #[test]
    fn resets_tracking_for_unrelated_document() {
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());
        toc.click("npm");

        toc.set_source("## Something\n### Else");

        assert_eq!(toc.active_id(), None);
        assert!(toc.expanded().is_empty());
        assert_eq!(toc.display(), Display::Shown);
    }

    #[test]
    fn unique_ids_disambiguate() {
        let mut toc = TableOfContents::default().with_unique_ids(true);
        toc.set_source("## Notes\n## Notes");

        let ids: Vec<_> = toc.headings().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["notes", "notes-1"]);
    }

    #[test]
    fn snapshot_reports_state() {
        let mut toc = TableOfContents::from_source(DOC, TrackerConfig::default());
        toc.click("npm");

        let snapshot = toc.snapshot();

        assert_eq!(snapshot.active_id.as_deref(), Some("npm"));
        assert_eq!(snapshot.expanded, vec!["install".to_string()]);
        assert_eq!(snapshot.display, Display::Shown);
    }
}
