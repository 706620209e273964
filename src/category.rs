//! # Category Module
//!
//! ## Purpose
//! Closed enumeration of the product domains the classifier can assign.
//! The set is fixed at compile time; there is no dynamic registration.
//!
//! ## Input/Output Specification
//! - **Input**: Raw label strings (e.g. corpus file names)
//! - **Output**: `Category` values, or a loud error for unknown labels
//! - **Ordering**: Declaration order is the tie-break priority used by the
//!   classifier when two categories score identically
//!
//! ## Key Features
//! - Exhaustively checked label mapping (no silent category creation)
//! - Stable, documented enumeration order
//! - Serde support for API responses and stats

use crate::errors::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Product domain labels, in fixed priority order.
///
/// The declaration order below is load-bearing: when two categories produce
/// exactly equal classification scores, the one declared earlier wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Photography,
    Audio,
    Projector,
    Drones,
    DJ,
    Transport,
    Storage,
    Electronics,
    Party,
    Sports,
    Instruments,
    HomeOfficeGarden,
    Kids,
    Travel,
    Clothing,
}

impl Category {
    /// All categories in tie-break priority order.
    pub const ALL: [Category; 15] = [
        Category::Photography,
        Category::Audio,
        Category::Projector,
        Category::Drones,
        Category::DJ,
        Category::Transport,
        Category::Storage,
        Category::Electronics,
        Category::Party,
        Category::Sports,
        Category::Instruments,
        Category::HomeOfficeGarden,
        Category::Kids,
        Category::Travel,
        Category::Clothing,
    ];

    /// Canonical label string, matching corpus file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Photography => "Photography",
            Category::Audio => "Audio",
            Category::Projector => "Projector",
            Category::Drones => "Drones",
            Category::DJ => "DJ",
            Category::Transport => "Transport",
            Category::Storage => "Storage",
            Category::Electronics => "Electronics",
            Category::Party => "Party",
            Category::Sports => "Sports",
            Category::Instruments => "Instruments",
            Category::HomeOfficeGarden => "HomeOfficeGarden",
            Category::Kids => "Kids",
            Category::Travel => "Travel",
            Category::Clothing => "Clothing",
        }
    }

    /// Position within [`Category::ALL`]; lower index wins score ties.
    pub fn priority(self) -> usize {
        Category::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or(Category::ALL.len())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SearchError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == label)
            .ok_or_else(|| SearchError::UnknownLabel {
                label: label.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let err = "Gardening".parse::<Category>().unwrap_err();
        assert!(matches!(err, SearchError::UnknownLabel { .. }));
    }

    #[test]
    fn test_priority_matches_declaration_order() {
        assert_eq!(Category::Photography.priority(), 0);
        assert_eq!(Category::Clothing.priority(), Category::ALL.len() - 1);
        for window in Category::ALL.windows(2) {
            assert!(window[0].priority() < window[1].priority());
        }
    }
}
