//! List virtualization engine (vlist)
//!
//! Renders only the rows of a long list that intersect the viewport, while
//! discovering each row's real height incrementally.
//!
//! Follows the Pure Core / Impure Shell architecture: the [`engine`] and
//! [`view_state`] modules are pure state transitions that return commands,
//! [`host`] carries those commands out, and [`view`] draws a render pass
//! into a terminal buffer.

pub mod config;
pub mod engine;
pub mod host;
pub mod logging;
pub mod model;
pub mod view;
pub mod view_state;
