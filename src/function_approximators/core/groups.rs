//! Parameter groups and the fixed tag table used by selection masks.
//!
//! A model's flat parameter vector is partitioned into named groups. Each
//! group carries a small integer tag; a selection mask stores the tag of the
//! owning group at every selected index and `0` elsewhere.
//!
//! | group    | label       | tag |
//! |----------|-------------|-----|
//! | centers  | `"centers"` | 1   |
//! | widths   | `"widths"`  | 2   |
//! | offsets  | `"offsets"` | 3   |
//! | slopes   | `"slopes"`  | 4   |
//! | priors   | `"priors"`  | 5   |
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::function_approximators::errors::ParamError;

/// Set of parameter groups, ordered by flattening order.
pub type GroupSet = BTreeSet<ParameterGroup>;

/// Mask tag for "not selected".
pub const UNSELECTED: u8 = 0;

/// Named partition of a model's flat parameter vector.
///
/// The derived ordering matches the flattening order, so iterating a
/// [`GroupSet`] visits groups in the order they appear in the flat vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParameterGroup {
    Centers,
    Widths,
    Offsets,
    Slopes,
    Priors,
}

impl ParameterGroup {
    /// Every group, in flattening order.
    pub const ALL: [ParameterGroup; 5] = [
        ParameterGroup::Centers,
        ParameterGroup::Widths,
        ParameterGroup::Offsets,
        ParameterGroup::Slopes,
        ParameterGroup::Priors,
    ];

    /// Mask tag written at every index owned by this group.
    pub fn tag(self) -> u8 {
        match self {
            ParameterGroup::Centers => 1,
            ParameterGroup::Widths => 2,
            ParameterGroup::Offsets => 3,
            ParameterGroup::Slopes => 4,
            ParameterGroup::Priors => 5,
        }
    }

    /// Inverse of [`ParameterGroup::tag`]; `None` for `0` and unknown tags.
    pub fn from_tag(tag: u8) -> Option<ParameterGroup> {
        ParameterGroup::ALL.into_iter().find(|group| group.tag() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            ParameterGroup::Centers => "centers",
            ParameterGroup::Widths => "widths",
            ParameterGroup::Offsets => "offsets",
            ParameterGroup::Slopes => "slopes",
            ParameterGroup::Priors => "priors",
        }
    }
}

impl std::fmt::Display for ParameterGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ParameterGroup {
    type Err = ParamError;

    /// Parse a group label (case-insensitive, surrounding whitespace ignored).
    ///
    /// Unknown labels return [`ParamError::UnknownParameterGroup`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "centers" => Ok(ParameterGroup::Centers),
            "widths" => Ok(ParameterGroup::Widths),
            "offsets" => Ok(ParameterGroup::Offsets),
            "slopes" => Ok(ParameterGroup::Slopes),
            "priors" => Ok(ParameterGroup::Priors),
            _ => Err(ParamError::UnknownParameterGroup { name: s.to_string() }),
        }
    }
}

/// Parse labels into a [`GroupSet`], silently dropping unknown labels.
pub fn groups_from_labels<'a, I>(labels: I) -> GroupSet
where
    I: IntoIterator<Item = &'a str>,
{
    labels.into_iter().filter_map(|label| label.parse().ok()).collect()
}
