//! # DropSend - receiving server
//!
//! Accepts files posted by the drag and drop widget and writes them to a
//! directory, reporting progress on the console and over SSE.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Browser   │────▶│ POST /send  │────▶│  FileStore  │────▶│  <dir>/name │
//! │   widget    │     │ (multipart) │     │ (streaming) │     │             │
//! └─────────────┘     └─────────────┘     └──────┬──────┘     └─────────────┘
//!                                                │ progress
//!                                                ▼
//!                                         stdout + /api/logs
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Validated server configuration
//! - [`progress`] - Transfer progress and byte formatting
//! - [`storage`] - Streaming uploads to disk
//! - [`api`] - HTTP API server

pub mod error;
pub mod config;
pub mod progress;
pub mod storage;
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ServerError, StoreError};
pub use config::ServerConfig;
pub use progress::{byte_unit_str, ProgressReporter, TransferProgress};
pub use storage::{sanitize_file_name, FileStore, StoredFile};
pub use api::types::{error_response, SendResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, serve, start_server};
}
