//! Interactive migration checklists.
//!
//! `<MigrationChecklist sections={[...]} />` in MDX lists steps grouped under
//! titles. The sections expression is read as YAML flow syntax, so both JSON and
//! object literals with bare keys work:
//!
//! ```text
//! <MigrationChecklist sections={[
//!   { title: "Prepare", items: [{ id: "backup", text: "Back up the database" }] },
//! ]} />
//! ```

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

static CHECKLIST_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<MigrationChecklist\b\s*sections=\{(.*?)\}\s*/>")
        .expect("checklist tag pattern is valid")
});

/// One step the reader can tick off.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    /// Starts ticked
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChecklistSection {
    pub title: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

/// A `<MigrationChecklist />` element found in post content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationChecklist {
    pub sections: Vec<ChecklistSection>,
}

impl MigrationChecklist {
    pub fn total_items(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    pub fn completed_items(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| &s.items)
            .filter(|item| item.completed)
            .count()
    }

    /// Rounded share of `completed` out of all items. An empty list reports 0.
    pub fn progress_percent(&self, completed: usize) -> u32 {
        let total = self.total_items();
        if total == 0 {
            return 0;
        }
        ((completed.min(total) as f64 / total as f64) * 100.0).round() as u32
    }
}

/// A checklist element and the byte range it occupies in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistMatch {
    pub start: usize,
    pub end: usize,
    pub checklist: MigrationChecklist,
}

/// Find every `<MigrationChecklist sections={...} />` element in `content`.
///
/// Elements whose sections expression does not parse are skipped.
pub fn find_checklists(content: &str) -> Vec<ChecklistMatch> {
    CHECKLIST_TAG_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let sections = serde_yaml::from_str::<Vec<ChecklistSection>>(&caps[1]).ok()?;
            Some(ChecklistMatch {
                start: whole.start(),
                end: whole.end(),
                checklist: MigrationChecklist { sections },
            })
        })
        .collect()
}
