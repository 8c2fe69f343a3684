//! UI Components for the DropSend widget.
//!
//! - [`Hero`] - Title and description
//! - [`DropZone`] - Drag & drop surface and file picker
//! - [`UploadList`] - One status row per upload attempt

mod hero;
mod drop_zone;
mod upload_list;

pub use hero::*;
pub use drop_zone::*;
pub use upload_list::*;
