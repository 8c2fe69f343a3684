//! Upload services.
//!
//! - [`tracker`] - per-attempt state for the whole page session
//! - [`upload`] - `XMLHttpRequest` upload with progress callbacks

pub mod tracker;
pub mod upload;

pub use tracker::*;
pub use upload::*;
