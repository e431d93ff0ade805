//! Core view-state value types

use serde::{Deserialize, Serialize};

/// Where a numeric height (or viewport reading) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Confirmed from on-screen geometry reported by the host.
    Measured,
    /// Placeholder that has not been confirmed yet.
    Estimated,
}

/// Height of one row, tagged with its provenance.
///
/// Estimated rows keep a usable numeric value so offsets can be computed
/// before anything is measured; the tag tells consumers whether to trust it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowHeight {
    pub provenance: Provenance,
    pub value: f64,
}

impl RowHeight {
    /// Height confirmed by the host.
    pub fn measured(value: f64) -> Self {
        Self {
            provenance: Provenance::Measured,
            value,
        }
    }

    /// Placeholder height.
    pub fn estimated(value: f64) -> Self {
        Self {
            provenance: Provenance::Estimated,
            value,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.provenance == Provenance::Measured
    }

    /// Same numeric value, retagged as estimated.
    ///
    /// Used to force a remeasure without a visible height jump.
    pub fn as_estimated(self) -> Self {
        Self::estimated(self.value)
    }
}

/// Desired on-screen position of a navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Row start at the top edge of the viewport.
    #[default]
    Top,
    /// Row start at the vertical middle of the viewport.
    Center,
    /// Row end at the bottom edge of the viewport.
    Bottom,
}
