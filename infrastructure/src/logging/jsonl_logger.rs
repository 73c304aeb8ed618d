//! JSONL file writer for summary pipeline events.
//!
//! Each event is serialized as a single JSON line with a `type` field and
//! `timestamp`, appended to the file via a buffered writer.

use council_application::{SummaryObserver, SummaryRecord};
use council_domain::RoundNumber;
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

/// JSONL summary log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlSummaryLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlSummaryLog {
    /// Open the log for appending.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create summary log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open summary log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, event_type: &str, payload: Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = match payload {
            Value::Object(mut map) => {
                map.insert("type".to_string(), Value::String(event_type.to_string()));
                map.insert("timestamp".to_string(), Value::String(timestamp));
                Value::Object(map)
            }
            other => json!({
                "type": event_type,
                "timestamp": timestamp,
                "data": other,
            }),
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Append-only; flush per line so a crash loses at most one event
            let _ = writer.flush();
        }
    }
}

impl SummaryObserver for JsonlSummaryLog {
    fn on_summary_complete(&self, record: &SummaryRecord) {
        self.write(
            "summary_complete",
            json!({
                "round": record.round_number,
                "input_chars": record.input_char_count,
                "output_chars": record.output_char_count,
                "compression_ratio": record.compression_ratio,
                "latency_ms": record.latency.as_millis() as u64,
                "outcome": record.outcome.as_str(),
            }),
        );
    }

    fn on_summary_suspended(&self, round: RoundNumber, waited: Duration) {
        self.write(
            "summary_suspended",
            json!({
                "round": round,
                "waited_ms": waited.as_millis() as u64,
            }),
        );
    }
}

impl Drop for JsonlSummaryLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::SummaryStatus;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics").join("summary.jsonl");
        let log = JsonlSummaryLog::new(&path).unwrap();

        log.on_summary_complete(&SummaryRecord::new(
            1,
            900,
            180,
            Duration::from_millis(2500),
            SummaryStatus::Ready,
        ));
        log.on_summary_suspended(2, Duration::from_millis(40));
        drop(log);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);

        assert_eq!(lines[0]["type"], "summary_complete");
        assert_eq!(lines[0]["round"], 1);
        assert_eq!(lines[0]["input_chars"], 900);
        assert_eq!(lines[0]["output_chars"], 180);
        assert_eq!(lines[0]["compression_ratio"], 5.0);
        assert_eq!(lines[0]["latency_ms"], 2500);
        assert_eq!(lines[0]["outcome"], "ready");
        assert!(lines[0]["timestamp"].is_string());

        assert_eq!(lines[1]["type"], "summary_suspended");
        assert_eq!(lines[1]["waited_ms"], 40);
    }

    #[test]
    fn test_appends_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.jsonl");

        for round in 1..=2 {
            let log = JsonlSummaryLog::new(&path).unwrap();
            log.on_summary_suspended(round, Duration::ZERO);
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["round"], 2);
    }

    #[test]
    fn test_unwritable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file
        assert!(JsonlSummaryLog::new(dir.path()).is_none());
    }
}
