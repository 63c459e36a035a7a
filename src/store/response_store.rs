use super::record::{format_timestamp, CallRecord};
use crate::error::StoreError;
use crate::import::CallTarget;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Call records keyed by target id, mirrored to a JSON file
#[derive(Debug)]
pub struct ResponseStore {
    path: PathBuf,
    records: BTreeMap<String, CallRecord>,
}

impl ResponseStore {
    /// Load the mapping from `path`.
    ///
    /// A missing file yields an empty store. A file that is not a valid
    /// mapping is an error; nothing is overwritten in that case.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let records = match fs::read_to_string(&path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                    path: path.display().to_string(),
                    source,
                })?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No response store at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        info!(
            "Loaded {} call records from {}",
            records.len(),
            path.display()
        );

        Ok(Self { path, records })
    }

    /// Insert or replace the record for `record.id`, then persist.
    /// On a failed write the in-memory mapping is left unchanged.
    pub fn upsert(&mut self, record: CallRecord) -> Result<(), StoreError> {
        debug!("Storing call record for {}", record.id);
        let mut next = self.records.clone();
        next.insert(record.id.clone(), record);
        self.commit(next)
    }

    /// Save operator notes for `target` without touching its transcript.
    /// Creates an empty-transcript record if the target was never called.
    pub fn save_notes(
        &mut self,
        target: &CallTarget,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<CallRecord, StoreError> {
        let record = match self.records.get(&target.id) {
            Some(existing) => CallRecord {
                notes,
                ..existing.clone()
            },
            None => CallRecord {
                id: target.id.clone(),
                phone_number: target.number.clone(),
                timestamp: format_timestamp(now),
                transcript: String::new(),
                notes,
            },
        };

        self.upsert(record.clone())?;
        Ok(record)
    }

    pub fn get(&self, id: &str) -> Option<&CallRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &CallRecord> {
        self.records.values()
    }

    /// Owned copy of every record, ordered by id
    pub fn snapshot(&self) -> Vec<CallRecord> {
        self.records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `next` to disk and make it the current mapping
    fn commit(&mut self, next: BTreeMap<String, CallRecord>) -> Result<(), StoreError> {
        self.persist(&next)?;
        self.records = next;
        Ok(())
    }

    /// Rewrite the whole mapping (temp file + rename)
    fn persist(&self, records: &BTreeMap<String, CallRecord>) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;

        if let Err(e) = fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                warn!("Failed to remove {}: {}", tmp.display(), cleanup);
            }
            return Err(write_err(e));
        }

        Ok(())
    }
}
