//! Server-side transfer progress.
//!
//! Tracks how many bytes of an upload have been written and turns that into
//! console/SSE log lines such as `photo.jpg 40% 1.2 MB/3 MB`.

use crate::api::logs::{log_info, log_success};

const BYTE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Report granularity when the total length is unknown.
const UNKNOWN_LENGTH_STEP: u64 = 1_000_000;

/// Render a byte count with three significant digits and decimal units.
///
/// ```
/// assert_eq!(dropsend::progress::byte_unit_str(1_500), "1.5 KB");
/// ```
pub fn byte_unit_str(n: u64) -> String {
    let mut size = n as f64;
    let mut unit = BYTE_UNITS[0];
    for (i, candidate) in BYTE_UNITS.iter().enumerate() {
        unit = candidate;
        // The largest unit absorbs everything above it.
        if size < 1000.0 || i == BYTE_UNITS.len() - 1 {
            break;
        }
        size /= 1000.0;
    }
    format!("{} {}", three_significant(size), unit)
}

fn three_significant(value: f64) -> String {
    let formatted = if value >= 100.0 {
        format!("{:.0}", value)
    } else if value >= 10.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    };
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Progress of one upload being written to disk.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    pub file_name: String,
    /// Expected total, when the client announced one.
    pub length: Option<u64>,
    pub written: u64,
    last_step: u64,
}

impl TransferProgress {
    pub fn new(file_name: impl Into<String>, length: Option<u64>) -> Self {
        Self {
            file_name: file_name.into(),
            length,
            written: 0,
            last_step: 0,
        }
    }

    /// Completed percentage, if the length is known.
    pub fn percent(&self) -> Option<u8> {
        let length = self.length?;
        if length == 0 {
            return Some(100);
        }
        let pct = (self.written as f64 / length as f64 * 100.0).round();
        Some(pct.clamp(0.0, 100.0) as u8)
    }

    /// Record `n` more bytes. Returns `true` when a new report step was reached.
    pub fn advance(&mut self, n: u64) -> bool {
        self.written += n;
        let step = match self.percent() {
            Some(pct) => u64::from(pct) / 10,
            None => self.written / UNKNOWN_LENGTH_STEP,
        };
        if step > self.last_step {
            self.last_step = step;
            true
        } else {
            false
        }
    }

    /// One-line summary: name, percentage and sizes.
    pub fn summary(&self) -> String {
        let written = byte_unit_str(self.written);
        match (self.percent(), self.length) {
            (Some(pct), Some(length)) => format!(
                "{} {}% {}/{}",
                self.file_name,
                pct,
                written,
                byte_unit_str(length)
            ),
            _ => format!("{} {}", self.file_name, written),
        }
    }
}

/// Decides what gets logged while a transfer runs.
#[derive(Debug, Clone, Copy)]
pub struct ProgressReporter {
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Account for a written chunk and log a step line when one is reached.
    pub fn record(&self, progress: &mut TransferProgress, n: u64) {
        if progress.advance(n) && self.enabled {
            log_info(progress.summary());
        }
    }

    /// Log the end of a transfer.
    pub fn finish(&self, progress: &TransferProgress) {
        if self.enabled {
            log_success(progress.summary());
        } else {
            log_success(format!(
                "Wrote {} bytes to file {}",
                progress.written, progress.file_name
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_units() {
        assert_eq!(byte_unit_str(0), "0 B");
        assert_eq!(byte_unit_str(999), "999 B");
        assert_eq!(byte_unit_str(1_000), "1 KB");
        assert_eq!(byte_unit_str(1_500), "1.5 KB");
        assert_eq!(byte_unit_str(12_345_678), "12.3 MB");
        assert_eq!(byte_unit_str(250_000_000_000), "250 GB");
    }

    #[test]
    fn test_byte_units_past_the_table() {
        assert_eq!(byte_unit_str(2_000_000_000_000_000_000), "2000 PB");
    }

    #[test]
    fn test_percent_known_length() {
        let mut progress = TransferProgress::new("a.txt", Some(10));
        assert_eq!(progress.percent(), Some(0));
        progress.advance(5);
        assert_eq!(progress.percent(), Some(50));
        assert_eq!(progress.summary(), "a.txt 50% 5 B/10 B");
    }

    #[test]
    fn test_percent_unknown_length() {
        let mut progress = TransferProgress::new("a.txt", None);
        progress.advance(2_500);
        assert_eq!(progress.percent(), None);
        assert_eq!(progress.summary(), "a.txt 2.5 KB");
    }

    #[test]
    fn test_summary_is_plain_text() {
        let mut progress = TransferProgress::new("a.txt", Some(3_000_000));
        progress.advance(1_500_000);
        let line = progress.summary();
        assert_eq!(line, "a.txt 50% 1.5 MB/3 MB");
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_empty_body_is_complete() {
        let progress = TransferProgress::new("empty", Some(0));
        assert_eq!(progress.percent(), Some(100));
    }

    #[test]
    fn test_steps_fire_once_per_ten_percent() {
        let mut progress = TransferProgress::new("b.bin", Some(100));
        let fired: Vec<bool> = [4, 4, 4, 30, 1].iter().map(|n| progress.advance(*n)).collect();
        // 4, 8, 12 (step 1), 42 (step 4), 43
        assert_eq!(fired, vec![false, false, true, true, false]);
    }

    #[test]
    fn test_steps_without_length_every_megabyte() {
        let mut progress = TransferProgress::new("c.bin", None);
        assert!(!progress.advance(999_999));
        assert!(progress.advance(1));
        assert!(!progress.advance(10));
    }
}
