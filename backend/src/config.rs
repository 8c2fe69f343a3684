//! Server configuration.
//!
//! Built by the CLI from flags, `DROPSEND_*` environment variables and an
//! optional `.env` file, then validated once before the server starts.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default listen address.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

/// Default directory for the compiled widget (trunk output).
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

/// Default cap on a single request body, in megabytes.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 1024;

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub listen: SocketAddr,
    /// Directory uploads are written to.
    pub upload_dir: PathBuf,
    /// Directory with static frontend assets.
    pub static_dir: PathBuf,
    /// Log a line per 10% step while receiving.
    pub show_progress: bool,
    /// Request body cap in bytes.
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Parse and check the raw settings.
    pub fn new(
        listen: &str,
        upload_dir: PathBuf,
        static_dir: PathBuf,
        show_progress: bool,
        max_upload_mb: u64,
    ) -> Result<Self, ConfigError> {
        let listen = parse_listen(listen)?;

        if !upload_dir.exists() {
            return Err(ConfigError::MissingDirectory(upload_dir));
        }
        if !upload_dir.is_dir() {
            return Err(ConfigError::NotADirectory(upload_dir));
        }

        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        let static_dir = resolve_static_dir(static_dir, exe_dir.as_deref());

        let max_upload_bytes = usize::try_from(max_upload_mb.saturating_mul(1024 * 1024))
            .unwrap_or(usize::MAX);

        Ok(Self {
            listen,
            upload_dir,
            static_dir,
            show_progress,
            max_upload_bytes,
        })
    }

    /// Whether the static dir holds a built widget.
    pub fn has_widget(&self) -> bool {
        self.static_dir.join("index.html").is_file()
    }
}

/// Pick the widget directory.
///
/// A relative path that does not exist under the working directory is
/// looked up next to the executable instead, so an installed binary finds
/// assets shipped beside it. Otherwise the path is returned unchanged.
pub fn resolve_static_dir(static_dir: PathBuf, exe_dir: Option<&Path>) -> PathBuf {
    if static_dir.is_absolute() || static_dir.is_dir() {
        return static_dir;
    }
    match exe_dir.map(|dir| dir.join(&static_dir)) {
        Some(beside_exe) if beside_exe.is_dir() => beside_exe,
        _ => static_dir,
    }
}

/// Accepts `host:port` or the Go-style `:port` shorthand.
fn parse_listen(listen: &str) -> Result<SocketAddr, ConfigError> {
    let normalized = if listen.starts_with(':') {
        format!("0.0.0.0{}", listen)
    } else {
        listen.to_string()
    };
    normalized
        .parse()
        .map_err(|_| ConfigError::InvalidListen(listen.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_port_shorthand() {
        let addr = parse_listen(":9000").unwrap();
        assert_eq!(addr.port(), 9000);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn test_invalid_listen() {
        assert!(matches!(
            parse_listen("nowhere"),
            Err(ConfigError::InvalidListen(_))
        ));
    }

    #[test]
    fn test_missing_upload_dir() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = ServerConfig::new(DEFAULT_LISTEN, missing, PathBuf::from("."), true, 1)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingDirectory(_)));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();
        let err = ServerConfig::new(DEFAULT_LISTEN, file, PathBuf::from("."), true, 1)
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotADirectory(_)));
    }

    #[test]
    fn test_static_dir_falls_back_to_exe_dir() {
        let exe_dir = tempdir().unwrap();
        std::fs::create_dir_all(exe_dir.path().join("widget-assets-beside-exe")).unwrap();

        let resolved = resolve_static_dir(
            PathBuf::from("widget-assets-beside-exe"),
            Some(exe_dir.path()),
        );
        assert_eq!(resolved, exe_dir.path().join("widget-assets-beside-exe"));
    }

    #[test]
    fn test_static_dir_kept_when_nowhere_to_be_found() {
        let exe_dir = tempdir().unwrap();
        let resolved = resolve_static_dir(PathBuf::from("no-such-widget-dir"), Some(exe_dir.path()));
        assert_eq!(resolved, PathBuf::from("no-such-widget-dir"));

        let absolute = exe_dir.path().join("absent");
        assert_eq!(resolve_static_dir(absolute.clone(), None), absolute);
    }

    #[test]
    fn test_has_widget_needs_index() {
        let upload = tempdir().unwrap();
        let assets = tempdir().unwrap();
        let config = ServerConfig::new(
            "127.0.0.1:0",
            upload.path().to_path_buf(),
            assets.path().to_path_buf(),
            true,
            1,
        )
        .unwrap();
        assert!(!config.has_widget());

        std::fs::write(assets.path().join("index.html"), "<html></html>").unwrap();
        assert!(config.has_widget());
    }

    #[test]
    fn test_body_cap_in_bytes() {
        let dir = tempdir().unwrap();
        let config = ServerConfig::new(
            "127.0.0.1:0",
            dir.path().to_path_buf(),
            PathBuf::from("."),
            false,
            2,
        )
        .unwrap();
        assert_eq!(config.max_upload_bytes, 2 * 1024 * 1024);
        assert!(!config.show_progress);
    }
}
