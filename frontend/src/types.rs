//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **Upload Types** - one record per upload attempt and the events that drive it
//! - **Error Types** - Frontend error handling
//!
//! The status line of a row is always rendered from its [`UploadRecord`];
//! nothing is ever parsed back out of the DOM.

use std::fmt;

use crate::config::{ERROR_SUFFIX, STATUS_SEPARATOR};

// =============================================================================
// Upload Types
// =============================================================================

/// Identifier of one upload attempt.
///
/// Allocated from a counter that never resets, so ids stay unique across
/// drop/selection batches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadId(pub u64);

impl UploadId {
    /// `id` attribute of the status row.
    pub fn dom_id(&self) -> String {
        format!("upload-{}", self.0)
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of an upload attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadPhase {
    /// Row created, request not sent yet
    Pending,
    /// Request sent, body in flight
    Uploading,
    /// HTTP exchange finished, whatever the status code
    Completed { status: u16 },
    /// Network-level failure or abort
    Failed,
}

impl UploadPhase {
    /// Completed and failed attempts accept no further events.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadPhase::Completed { .. } | UploadPhase::Failed)
    }
}

/// Snapshot of an upload progress event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressSample {
    pub loaded: f64,
    pub total: f64,
    pub length_computable: bool,
}

impl ProgressSample {
    /// `round(loaded / total * 100)`, or `None` when the total is unknown.
    ///
    /// A known total of zero counts as finished.
    pub fn percent(&self) -> Option<u8> {
        if !self.length_computable {
            return None;
        }
        if self.total <= 0.0 {
            return Some(100);
        }
        let pct = (self.loaded / self.total * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }
}

/// Something the transport reported for one attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadEvent {
    Progress(ProgressSample),
    Loaded { status: u16, body: String },
    TransportError,
}

/// Everything the UI knows about one upload attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadRecord {
    pub id: UploadId,
    pub file_name: String,
    /// Shown in the status line; `None` hides the percentage
    pub percent: Option<u8>,
    /// Last known width of the progress bar
    pub bar_percent: u8,
    pub phase: UploadPhase,
}

impl UploadRecord {
    pub fn new(id: UploadId, file_name: impl Into<String>) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            percent: Some(0),
            bar_percent: 0,
            phase: UploadPhase::Pending,
        }
    }

    /// Move from `Pending` to `Uploading`. Returns `false` in any other phase.
    pub fn mark_submitted(&mut self) -> bool {
        if self.phase != UploadPhase::Pending {
            return false;
        }
        self.phase = UploadPhase::Uploading;
        true
    }

    /// Apply a transport event. Returns `false` if the attempt had already
    /// finished and the event was ignored.
    pub fn apply(&mut self, event: &UploadEvent) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        match event {
            UploadEvent::Progress(sample) => {
                self.phase = UploadPhase::Uploading;
                self.percent = sample.percent();
                if let Some(pct) = self.percent {
                    self.bar_percent = pct;
                }
            }
            UploadEvent::Loaded { status, .. } => {
                self.phase = UploadPhase::Completed { status: *status };
            }
            UploadEvent::TransportError => {
                self.phase = UploadPhase::Failed;
            }
        }
        true
    }

    /// Status line, e.g. `a.txt - 50%` or `a.txt - 50% - Something went wrong.`
    pub fn status_text(&self) -> String {
        let mut text = self.file_name.clone();
        if let Some(pct) = self.percent {
            text.push_str(STATUS_SEPARATOR);
            text.push_str(&format!("{}%", pct));
        }
        if self.phase == UploadPhase::Failed {
            text.push_str(STATUS_SEPARATOR);
            text.push_str(ERROR_SUFFIX);
        }
        text
    }

    /// CSS classes of the progress bar.
    pub fn bar_class(&self) -> &'static str {
        match self.phase {
            UploadPhase::Pending | UploadPhase::Uploading => "progress active",
            UploadPhase::Completed { .. } => "progress",
            UploadPhase::Failed => "progress error",
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug)]
pub enum AppError {
    /// Building or sending the upload request failed.
    Upload(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upload(msg) => write!(f, "Upload error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
