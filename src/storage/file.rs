use super::store::{StoreError, TermRecord, TermStore, now_ms};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    terms: Vec<TermRecord>,
}

/// Rows persisted as a single JSON document.
///
/// Every mutation rewrites the whole file through a temporary file and an atomic rename,
/// so a crash leaves either the old or the new snapshot on disk. A mutation whose write
/// fails is rolled back in memory and reported to the caller.
#[derive(Debug)]
pub struct FileTermStore {
    path: PathBuf,
    rows: Mutex<BTreeMap<String, TermRecord>>,
}

impl FileTermStore {
    /// Opens the snapshot at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let mut rows = BTreeMap::new();

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let snapshot: Snapshot = serde_json::from_reader(reader)?;
            for record in snapshot.terms {
                rows.insert(record.term.clone(), record);
            }
            tracing::info!("Loaded {} terms from {}", rows.len(), path.display());
        } else {
            tracing::info!("No term snapshot at {}, starting empty", path.display());
        }

        Ok(Self {
            path,
            rows: Mutex::new(rows),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, TermRecord>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("term store lock poisoned".to_string()))
    }

    fn write_snapshot(&self, rows: &BTreeMap<String, TermRecord>) -> Result<(), StoreError> {
        let parent_dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir)?;

        let snapshot = Snapshot {
            terms: rows.values().cloned().collect(),
        };

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        temp_file.as_file().sync_all()?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    // Applies `row` and persists; on failure the previous row (if any) is restored.
    fn commit(
        &self,
        rows: &mut BTreeMap<String, TermRecord>,
        row: TermRecord,
    ) -> Result<TermRecord, StoreError> {
        let previous = rows.insert(row.term.clone(), row.clone());

        if let Err(e) = self.write_snapshot(rows) {
            match previous {
                Some(previous) => {
                    rows.insert(previous.term.clone(), previous);
                }
                None => {
                    rows.remove(&row.term);
                }
            }
            tracing::error!("Failed to persist term '{}': {}", row.term, e);
            return Err(e);
        }

        Ok(row)
    }
}

impl TermStore for FileTermStore {
    fn find_all(&self) -> Result<Vec<TermRecord>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn find_by_term(&self, term: &str) -> Result<Option<TermRecord>, StoreError> {
        Ok(self.lock()?.get(term).cloned())
    }

    fn upsert_increment(&self, term: &str) -> Result<TermRecord, StoreError> {
        let mut rows = self.lock()?;
        let row = match rows.get(term) {
            Some(existing) => TermRecord {
                frequency: existing.frequency.saturating_add(1),
                last_used: now_ms(),
                ..existing.clone()
            },
            None => TermRecord::new(term, 1),
        };
        self.commit(&mut rows, row)
    }

    fn save(&self, record: TermRecord) -> Result<TermRecord, StoreError> {
        let mut rows = self.lock()?;
        self.commit(&mut rows, record)
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.len())
    }
}
