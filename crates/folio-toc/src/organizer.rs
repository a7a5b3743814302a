//! Two-level section tree built from a flat heading list.

use folio_mdx::HeadingRecord;
use serde::Serialize;

/// A top-level entry in the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionNode {
    #[serde(flatten)]
    pub heading: HeadingRecord,
    /// Deeper headings nested under this one, in document order
    pub children: Vec<HeadingRecord>,
}

impl SectionNode {
    fn leaf(heading: HeadingRecord) -> Self {
        Self {
            heading,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.heading.id
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether `id` names this section or one of its children.
    pub fn contains(&self, id: &str) -> bool {
        self.heading.id == id || self.children.iter().any(|child| child.id == id)
    }
}

/// Group headings into top-level sections.
///
/// Level 1 and 2 headings open a section; deeper headings nest under the most
/// recent section. A deep heading before any section becomes its own childless
/// section.
pub fn organize(headings: &[HeadingRecord]) -> Vec<SectionNode> {
    let mut sections: Vec<SectionNode> = Vec::new();
    let mut has_parent = false;

    for heading in headings {
        if heading.is_top_level() {
            sections.push(SectionNode::leaf(heading.clone()));
            has_parent = true;
        } else if has_parent {
            if let Some(parent) = sections.last_mut() {
                parent.children.push(heading.clone());
            }
        } else {
            sections.push(SectionNode::leaf(heading.clone()));
        }
    }

    sections
}

/// Find the section that is, or contains, `id`.
pub fn find_section<'a>(sections: &'a [SectionNode], id: &str) -> Option<&'a SectionNode> {
    sections.iter().find(|section| section.contains(id))
}

/// Walk the tree back into document order.
pub fn flatten(sections: &[SectionNode]) -> Vec<HeadingRecord> {
    sections
        .iter()
        .flat_map(|section| std::iter::once(&section.heading).chain(section.children.iter()))
        .cloned()
        .collect()
}
