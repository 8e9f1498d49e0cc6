use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::history::HistoryEntry;

/// One row of the on-disk history log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub completed_at: String,
    pub round: u32,
    pub text_index: usize,
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: usize,
    pub elapsed_secs: String,
    pub text_length: usize,
}

impl From<&HistoryEntry> for LogRecord {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            completed_at: entry.completed_at.to_rfc3339(),
            round: entry.round,
            text_index: entry.text_index,
            wpm: entry.wpm,
            accuracy: entry.accuracy,
            errors: entry.errors,
            elapsed_secs: format!("{:.2}", entry.elapsed_secs),
            text_length: entry.text_length,
        }
    }
}

/// Append-only CSV log of completed texts
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &HistoryEntry) -> csv::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(LogRecord::from(entry))?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_all(&self) -> csv::Result<Vec<LogRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        reader.deserialize().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use tempfile::tempdir;

    fn entry(text_index: usize, wpm: u32) -> HistoryEntry {
        HistoryEntry {
            text_index,
            round: 1,
            wpm,
            accuracy: 97,
            errors: 1,
            elapsed_secs: 12.5,
            text_length: 42,
            completed_at: Local::now(),
            text: "does not go to disk".to_string(),
        }
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("state").join("history.csv"));

        log.append(&entry(3, 40)).unwrap();
        log.append(&entry(7, 55)).unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.matches("completed_at").count(), 1);
        assert!(!content.contains("does not go to disk"));

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text_index, 3);
        assert_eq!(records[1].wpm, 55);
        assert_eq!(records[1].elapsed_secs, "12.50");
    }

    #[test]
    fn test_record_from_entry() {
        let e = entry(1, 60);
        let record = LogRecord::from(&e);

        assert_eq!(record.wpm, 60);
        assert_eq!(record.accuracy, 97);
        assert_eq!(record.text_length, 42);
        assert_eq!(record.completed_at, e.completed_at.to_rfc3339());
    }
}
