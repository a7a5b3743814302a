//! Table of contents for folio posts.
//!
//! Groups extracted headings into a two-level section tree, tracks which heading
//! is currently in view (debounced, with manual navigation taking effect at
//! once), and keeps the tree's expand/collapse state in step with it.

pub mod driver;
pub mod expansion;
pub mod organizer;
pub mod reconcile;
pub mod toc;
pub mod tracker;
pub mod visibility;

pub use driver::{DriverError, TocCommand, TocDriver};
pub use expansion::{Interaction, SectionExpansion};
pub use organizer::{find_section, flatten, organize, SectionNode};
pub use reconcile::{rendered_heading_ids, retain_rendered};
pub use toc::{Display, TableOfContents, TocSnapshot};
pub use tracker::{ActiveSectionTracker, Phase, RuntimeSettings, TrackerConfig};
pub use visibility::{closest_to_reference, ObserverOptions, VisibilityEntry};
