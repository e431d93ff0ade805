//! Item set reconciliation
//!
//! Rebuilds the height cache for a new ordered list of identifiers, reusing
//! heights by identity rather than by position.

use super::height_cache::HeightCache;
use super::types::RowHeight;
use crate::model::ItemId;
use std::collections::{HashMap, HashSet};

/// Which surviving rows must be measured again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Remeasure {
    /// Keep every reused height as it is (`set_items`).
    #[default]
    Nothing,
    /// Retag every reused height as estimated (`set_items_and_remeasure_all`).
    All,
    /// Retag only the listed identifiers (`set_items_and_remeasure`).
    Only(HashSet<ItemId>),
}

impl Remeasure {
    fn includes(&self, id: &ItemId) -> bool {
        match self {
            Self::Nothing => false,
            Self::All => true,
            Self::Only(ids) => ids.contains(id),
        }
    }
}

/// Build the height cache for `new_ids` from the cache of `old_ids`.
///
/// For every new identifier, its first position in `old_ids` (if any)
/// supplies the previous height. Reused heights keep their provenance unless
/// the identifier is selected by `remeasure`, in which case the numeric value
/// is kept but retagged estimated: it gets measured again without a visible
/// height jump. Identifiers without a previous height start estimated at the
/// default height. Rows past the new length are dropped.
///
/// # Examples
///
/// ```
/// # use vlist::model::ItemId;
/// # use vlist::view_state::height_cache::HeightCache;
/// # use vlist::view_state::reconcile::{reconcile, Remeasure};
/// # use vlist::view_state::types::RowHeight;
/// let old_ids: Vec<ItemId> = ["a", "b"].map(ItemId::from).to_vec();
/// let old = HeightCache::from_heights(
///     26.0,
///     vec![RowHeight::measured(10.0), RowHeight::measured(20.0)],
/// );
/// let new_ids: Vec<ItemId> = ["b", "z"].map(ItemId::from).to_vec();
///
/// let cache = reconcile(&old_ids, &old, &new_ids, &Remeasure::Nothing);
/// assert_eq!(cache.get(0), RowHeight::measured(20.0));
/// assert_eq!(cache.get(1), RowHeight::estimated(26.0));
/// ```
pub fn reconcile(
    old_ids: &[ItemId],
    old: &HeightCache,
    new_ids: &[ItemId],
    remeasure: &Remeasure,
) -> HeightCache {
    let mut previous_index: HashMap<&ItemId, usize> = HashMap::with_capacity(old_ids.len());
    for (index, id) in old_ids.iter().enumerate() {
        previous_index.entry(id).or_insert(index);
    }

    let default_height = old.default_height();
    let heights = new_ids
        .iter()
        .map(|id| {
            let previous = previous_index
                .get(id)
                .and_then(|&index| old.heights().get(index).copied());
            match previous {
                Some(height) if remeasure.includes(id) => height.as_estimated(),
                Some(height) => height,
                None => RowHeight::estimated(default_height),
            }
        })
        .collect();

    HeightCache::from_heights(default_height, heights)
}
