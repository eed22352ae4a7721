//! Plan document persistence with file locking.
//!
//! One JSON document per user. Regeneration replaces the document wholesale.
//! Each save writes and locks its own temp file, then renames it over the
//! document, so concurrent saves never interleave and the last rename wins.
//! Readers hold a shared lock on the document while reading it.

use crate::{Error, Plan, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Directory of per-user plan documents
#[derive(Clone, Debug)]
pub struct PlanStore {
    dir: PathBuf,
}

impl PlanStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `<data_dir>/plans`
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join("plans"))
    }

    /// Path of a user's plan document
    ///
    /// User names are restricted to ASCII alphanumerics, `-` and `_` so they
    /// cannot escape the store directory.
    pub fn path_for(&self, user: &str) -> Result<PathBuf> {
        let valid = !user.is_empty()
            && user
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::Other(format!("Invalid user name: {:?}", user)));
        }
        Ok(self.dir.join(format!("{}.json", user)))
    }

    /// Load a user's plan, or None if none was generated yet
    ///
    /// A corrupt document is an error, never a default plan.
    pub fn load(&self, user: &str) -> Result<Option<Plan>> {
        let path = self.path_for(user)?;
        if !path.exists() {
            tracing::debug!("No plan stored for {}", user);
            return Ok(None);
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let plan = serde_json::from_str::<Plan>(&contents)?;
        tracing::debug!("Loaded plan for {} from {:?}", user, path);
        Ok(Some(plan))
    }

    /// Replace a user's plan document
    ///
    /// Atomically writes the plan by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, user: &str, plan: &Plan) -> Result<PathBuf> {
        let path = self.path_for(user)?;
        std::fs::create_dir_all(&self.dir)?;

        let temp = NamedTempFile::new_in(&self.dir)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(plan)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved plan for {} to {:?}", user, path);
        Ok(path)
    }

    /// Remove a user's plan; returns whether one existed
    pub fn delete(&self, user: &str) -> Result<bool> {
        let path = self.path_for(user)?;
        if path.exists() {
            std::fs::remove_file(&path)?;
            tracing::info!("Deleted plan for {}", user);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
