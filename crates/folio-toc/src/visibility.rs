//! Picking the heading closest to the top of the viewport.

use serde::{Deserialize, Serialize};

/// One observed heading element, as reported by the host's visibility observer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VisibilityEntry {
    /// Element id
    pub id: String,
    /// Top edge of the element relative to the viewport, in pixels
    pub top: f64,
    /// Whether the element currently intersects the observed region
    pub is_intersecting: bool,
}

impl VisibilityEntry {
    pub fn new(id: impl Into<String>, top: f64, is_intersecting: bool) -> Self {
        Self {
            id: id.into(),
            top,
            is_intersecting,
        }
    }
}

/// Observer settings handed to the host environment.
///
/// The observed region is the viewport shrunk by `root_margin`; an element is
/// reported each time its visible ratio crosses one of `thresholds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverOptions {
    pub root_margin: String,
    pub thresholds: Vec<f64>,
    /// Line the distance is measured from, in viewport pixels
    pub reference_line: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin: "-15% 0% -60% 0%".to_string(),
            thresholds: vec![0.1, 0.3, 0.7],
            reference_line: 0.0,
        }
    }
}

/// The intersecting entry whose top edge is nearest `reference_line`.
///
/// Ties go to the earliest entry, so DOM order decides between equals.
pub fn closest_to_reference(
    entries: &[VisibilityEntry],
    reference_line: f64,
) -> Option<&VisibilityEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_intersecting)
        .fold(None, |closest: Option<&VisibilityEntry>, entry| match closest {
            Some(best)
                if (best.top - reference_line).abs() <= (entry.top - reference_line).abs() =>
            {
                Some(best)
            }
            _ => Some(entry),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_nearest_intersecting_entry() {
        let entries = vec![
            VisibilityEntry::new("far", 420.0, true),
            VisibilityEntry::new("hidden", 1.0, false),
            VisibilityEntry::new("near", -30.0, true),
            VisibilityEntry::new("mid", 90.0, true),
        ];

        let closest = closest_to_reference(&entries, 0.0).unwrap();

        assert_eq!(closest.id, "near");
    }

    #[test]
    fn ties_keep_first_entry() {
        let entries = vec![
            VisibilityEntry::new("first", -50.0, true),
            VisibilityEntry::new("second", 50.0, true),
        ];

        assert_eq!(closest_to_reference(&entries, 0.0).unwrap().id, "first");
    }

    #[test]
    fn measures_from_reference_line() {
        let entries = vec![
            VisibilityEntry::new("top", 0.0, true),
            VisibilityEntry::new("lower", 140.0, true),
        ];

        assert_eq!(closest_to_reference(&entries, 120.0).unwrap().id, "lower");
    }

    #[test]
    fn nothing_intersecting_yields_none() {
        let entries = vec![VisibilityEntry::new("a", 0.0, false)];

        assert!(closest_to_reference(&entries, 0.0).is_none());
        assert!(closest_to_reference(&[], 0.0).is_none());
    }
}
