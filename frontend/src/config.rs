//! Application configuration.
//!
//! The widget is served by the same server it uploads to, so the endpoint
//! is a relative path.

/// Upload endpoint.
pub const SEND_ENDPOINT: &str = "/send";

/// Multipart field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Header repeating the file name for the server.
pub const FILE_NAME_HEADER: &str = "X-File-Name";

/// Separator between the segments of a status line.
pub const STATUS_SEPARATOR: &str = " - ";

/// Appended to the status line on a transport failure.
pub const ERROR_SUFFIX: &str = "Something went wrong.";
