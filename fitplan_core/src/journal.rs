//! Generation log.
//!
//! Every persisted plan generation is appended to a JSONL (JSON Lines) file
//! with file locking, so the history of targets survives plan replacement.

use crate::{MacroTargets, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One plan generation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GenerationRecord {
    pub id: Uuid,
    pub user: String,
    pub generated_at: DateTime<Utc>,
    /// Seed used for the fruit pick, if generation was reproducible
    pub seed: Option<u64>,
    pub targets: MacroTargets,
}

impl GenerationRecord {
    pub fn new(user: impl Into<String>, seed: Option<u64>, targets: MacroTargets) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: user.into(),
            generated_at: Utc::now(),
            seed,
            targets,
        }
    }
}

/// Sink for generation records
pub trait GenerationSink {
    fn append(&mut self, record: &GenerationRecord) -> Result<()>;
}

/// JSONL-based generation log with file locking
pub struct JsonlLog {
    path: PathBuf,
}

impl JsonlLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log at `<data_dir>/generations.jsonl`
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("generations.jsonl"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl GenerationSink for JsonlLog {
    fn append(&mut self, record: &GenerationRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended generation {} to log", record.id);
        Ok(())
    }
}

/// Read all records from a log file, skipping malformed lines
pub fn read_records(path: &Path) -> Result<Vec<GenerationRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<GenerationRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse generation at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} generation records", records.len());
    Ok(records)
}

/// Records for a single user, oldest first
pub fn records_for(path: &Path, user: &str) -> Result<Vec<GenerationRecord>> {
    Ok(read_records(path)?
        .into_iter()
        .filter(|r| r.user == user)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(calories: u32) -> MacroTargets {
        MacroTargets {
            calories,
            protein_grams: 150,
            fat_grams: 60,
            carb_grams: 200,
        }
    }

    #[test]
    fn test_append_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlLog::in_data_dir(temp_dir.path());

        let record = GenerationRecord::new("alice", Some(7), targets(2100));
        log.append(&record).unwrap();

        let records = read_records(log.path()).unwrap();
        assert_eq!(records, vec![record]);
    }

    #[test]
    fn test_filter_by_user() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlLog::in_data_dir(temp_dir.path());

        for (user, kcal) in [("alice", 2000), ("bob", 2500), ("alice", 1900)] {
            log.append(&GenerationRecord::new(user, None, targets(kcal))).unwrap();
        }

        let alice = records_for(log.path(), "alice").unwrap();
        assert_eq!(alice.len(), 2);
        assert_eq!(alice[1].targets.calories, 1900);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut log = JsonlLog::in_data_dir(temp_dir.path());
        log.append(&GenerationRecord::new("alice", None, targets(2000))).unwrap();

        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(file, "{{ truncated").unwrap();
        drop(file);
        log.append(&GenerationRecord::new("alice", None, targets(2100))).unwrap();

        let records = read_records(log.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_log_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records = read_records(&temp_dir.path().join("none.jsonl")).unwrap();
        assert!(records.is_empty());
    }
}
