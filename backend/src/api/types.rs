//! REST API types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::storage::StoredFile;

/// Response to a successful `POST /send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    /// Server-side id, also used in log lines
    pub upload_id: String,
    /// Name the file was stored under
    pub file_name: String,
    pub bytes_written: u64,
}

impl SendResponse {
    pub fn new(upload_id: Uuid, stored: &StoredFile) -> Self {
        Self {
            upload_id: upload_id.to_string(),
            file_name: stored.file_name.clone(),
            bytes_written: stored.bytes_written,
        }
    }
}

/// Build the JSON body used for every error response.
pub fn error_response(message: &str) -> Value {
    json!({
        "status": "error",
        "error": message
    })
}
