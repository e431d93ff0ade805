//! Domain model types (pure).
//!
//! Item identity and the error taxonomy shared by the engine, the host
//! contract and the binary.

pub mod error;
pub mod identifiers;

pub use error::{AppError, MeasureError, ViewportError};
pub use identifiers::ItemId;
