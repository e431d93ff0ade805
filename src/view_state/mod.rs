//! View-state layer - heights, viewport, visible range and scroll state
//!
//! Pure data structures and functions the engine is assembled from. Nothing
//! here talks to the host.
//!
//! # Module Structure
//!
//! - `types`: Core value types (Provenance, RowHeight, Alignment)
//! - `height_cache`: HeightCache - per-row heights and cumulative offsets
//! - `viewport`: Viewport - scroll offset, history and container height
//! - `buffer`: BufferPolicy - extra rows around the viewport
//! - `visible_range`: VisibleRange - rows to render for a viewport
//! - `reconcile`: Item-set reconciliation by identity
//! - `scroll`: ScrollState - navigation state machine states and targets

pub mod buffer;
pub mod height_cache;
pub mod reconcile;
pub mod scroll;
pub mod types;
pub mod viewport;
pub mod visible_range;
