//! DropSend - Frontend Rust/Leptos Application
//!
//! A WebAssembly drag & drop upload widget. Every file becomes its own
//! upload attempt with a live progress row.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Hero (title, description)                                   │
//! │  DropZone (drag & drop + file picker)                        │
//! │  UploadList (one row per upload, rendered from the tracker)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Upload records, events and errors
//! - [`components`] - UI components
//! - [`services`] - Upload tracking and the XHR transport

use leptos::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Uploads
    UploadId, UploadPhase, UploadRecord, UploadEvent, ProgressSample,
    // Errors
    AppError, AppResult,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// Install the panic hook and console logger, then mount the app.
pub fn start() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 DropSend - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    // Owned here and handed down, so no component looks anything up globally
    let tracker = create_rw_signal(UploadTracker::new());

    view! {
        <main class="container">
            <Hero/>
            <DropZone tracker=tracker/>
            <UploadList tracker=tracker/>
        </main>
    }
}
