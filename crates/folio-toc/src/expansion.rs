//! Expand/collapse state of the navigation tree.
//!
//! Sections open automatically to follow the active heading. Anything the reader
//! opens by hand stays open, and a manual change wins over the next automatic
//! recomputation.

use std::collections::BTreeSet;

use crate::organizer::{find_section, SectionNode};

/// Who made the most recent change to the expanded set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Auto,
    /// Set by a manual change; consumed by the next [`SectionExpansion::recompute`]
    ManualOverride,
}

/// Expanded and pinned section ids.
#[derive(Debug, Clone, Default)]
pub struct SectionExpansion {
    expanded: BTreeSet<String>,
    manual: BTreeSet<String>,
    interaction: Interaction,
}

impl SectionExpansion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    /// Sections the reader opened by hand.
    pub fn manually_expanded(&self) -> &BTreeSet<String> {
        &self.manual
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Follow the active heading.
    ///
    /// Opens the section holding `active` (keeping pinned sections open) or, when
    /// that section has nothing to show, falls back to just the pinned sections.
    /// A pending manual override is consumed instead. Returns whether the
    /// expanded set changed.
    pub fn recompute(&mut self, active: Option<&str>, sections: &[SectionNode]) -> bool {
        if std::mem::take(&mut self.interaction) == Interaction::ManualOverride {
            return false;
        }

        let Some(active) = active else {
            return false;
        };

        let Some(section) = find_section(sections, active) else {
            return false;
        };

        let mut next = self.manual.clone();
        if section.has_children() {
            next.insert(section.id().to_string());
        }

        self.replace(next)
    }

    /// Flip one section open or closed. Opening pins it; closing unpins it.
    pub fn toggle(&mut self, id: &str) {
        self.interaction = Interaction::ManualOverride;
        if self.expanded.remove(id) {
            self.manual.remove(id);
        } else {
            self.expanded.insert(id.to_string());
            self.manual.insert(id.to_string());
        }
    }

    /// Open one section and pin it.
    pub fn expand(&mut self, id: &str) {
        self.interaction = Interaction::ManualOverride;
        self.expanded.insert(id.to_string());
        self.manual.insert(id.to_string());
    }

    /// Close everything and drop all pins.
    pub fn collapse_all(&mut self) {
        self.interaction = Interaction::ManualOverride;
        self.expanded.clear();
        self.manual.clear();
    }

    /// Open exactly one section, closing and unpinning the rest.
    pub fn expand_only(&mut self, id: &str) {
        self.interaction = Interaction::ManualOverride;
        self.expanded = BTreeSet::from([id.to_string()]);
        self.manual = BTreeSet::from([id.to_string()]);
    }

    /// Forget all state, including a pending override.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn replace(&mut self, next: BTreeSet<String>) -> bool {
        if self.expanded == next {
            return false;
        }
        self.expanded = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organizer::organize;
    use folio_mdx::HeadingRecord;

    fn tree() -> Vec<SectionNode> {
        let h = |id: &str, level| HeadingRecord::new(id, id, level);
        organize(&[
            h("intro", 2),
            h("install", 2),
            h("npm", 3),
            h("cargo", 3),
            h("usage", 2),
            h("basics", 3),
            h("faq", 2),
        ])
    }

    fn ids(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn follows_active_section() {
        let sections = tree();
        let mut expansion = SectionExpansion::new();

        assert!(expansion.recompute(Some("cargo"), &sections));
        assert_eq!(ids(expansion.expanded()), vec!["install"]);

        assert!(expansion.recompute(Some("usage"), &sections));
        assert_eq!(ids(expansion.expanded()), vec!["usage"]);
    }

    #[test]
    fn childless_section_collapses_to_pins() {
        let sections = tree();
        let mut expansion = SectionExpansion::new();
        expansion.expand("usage");
        expansion.recompute(None, &sections); // consume override

        expansion.recompute(Some("npm"), &sections);
        assert_eq!(ids(expansion.expanded()), vec!["install", "usage"]);

        expansion.recompute(Some("faq"), &sections);
        assert_eq!(ids(expansion.expanded()), vec!["usage"]);
    }

    #[test]
    fn unknown_or_missing_active_changes_nothing() {
        let sections = tree();
        let mut expansion = SectionExpansion::new();
        expansion.recompute(Some("npm"), &sections);

        assert!(!expansion.recompute(Some("nowhere"), &sections));
        assert!(!expansion.recompute(None, &sections));
        assert_eq!(ids(expansion.expanded()), vec!["install"]);
    }

    #[test]
    fn manual_toggle_wins_for_one_recompute() {
        let sections = tree();
        let mut expansion = SectionExpansion::new();
        expansion.recompute(Some("npm"), &sections);

        expansion.toggle("install");
        assert_eq!(expansion.interaction(), Interaction::ManualOverride);
        assert!(expansion.expanded().is_empty());

        // Suppressed once, then automatic tracking resumes
        assert!(!expansion.recompute(Some("npm"), &sections));
        assert!(expansion.expanded().is_empty());
        assert_eq!(expansion.interaction(), Interaction::Auto);

        expansion.recompute(Some("basics"), &sections);
        assert_eq!(ids(expansion.expanded()), vec!["usage"]);
    }

    #[test]
    fn toggle_only_touches_target() {
        let mut expansion = SectionExpansion::new();
        expansion.expand("install");
        expansion.expand("usage");

        expansion.toggle("install");

        assert_eq!(ids(expansion.expanded()), vec!["usage"]);
        assert_eq!(ids(expansion.manually_expanded()), vec!["usage"]);

        expansion.toggle("install");
        assert_eq!(ids(expansion.expanded()), vec!["install", "usage"]);
    }

    #[test]
    fn expand_only_and_collapse_all() {
        let mut expansion = SectionExpansion::new();
        expansion.expand("install");
        expansion.expand("usage");

        expansion.expand_only("faq");
        assert_eq!(ids(expansion.expanded()), vec!["faq"]);
        assert_eq!(ids(expansion.manually_expanded()), vec!["faq"]);

        expansion.collapse_all();
        assert!(expansion.expanded().is_empty());
        assert!(expansion.manually_expanded().is_empty());
    }
}
