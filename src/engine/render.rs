//! Render entry point: visible range plus offsets into positioned rows.

use super::ListEngine;
use crate::model::ItemId;
use crate::view_state::types::RowHeight;
use crate::view_state::visible_range::VisibleRange;

/// Memoization key for one rendered row.
///
/// A host UI can skip redrawing a row whose key did not change since the
/// previous render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RowKey {
    pub id: ItemId,
    pub top: f64,
    pub visible: bool,
}

/// One row positioned in content coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow<R> {
    pub index: usize,
    /// Absolute offset of the row's top edge.
    pub top: f64,
    pub height: RowHeight,
    pub key: RowKey,
    pub content: R,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedList<R> {
    pub rows: Vec<RenderedRow<R>>,
    /// Content size of the scroll container.
    pub total_height: f64,
    pub range: VisibleRange,
    /// Whether the list should be shown to the user yet.
    pub revealed: bool,
}

impl<R> RenderedList<R> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl ListEngine {
    /// Renders the rows of the visible range with `render_row`.
    ///
    /// `render_row` is called once per row per pass and must tolerate being
    /// called again for rows that did not change.
    pub fn render<R>(&self, mut render_row: impl FnMut(&ItemId) -> R) -> RenderedList<R> {
        let rows = self
            .range
            .indices()
            .filter_map(|index| {
                let id = self.ids.get(index)?;
                let top = self.heights.row_start(index).unwrap_or(0.0);
                Some(RenderedRow {
                    index,
                    top,
                    height: self.heights.get(index),
                    key: RowKey {
                        id: id.clone(),
                        top,
                        visible: self.revealed,
                    },
                    content: render_row(id),
                })
            })
            .collect();

        RenderedList {
            rows,
            total_height: self.heights.total_height(),
            range: self.range,
            revealed: self.revealed,
        }
    }
}
