//! Saved-project listing persisted as one JSON file of `{id, data, timestamp}` records.

use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    foundation::error::ClipforgeResult,
    project::document::{ProjectDocument, write_atomic},
};

/// One saved project. `data` is the project document as a JSON string.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProjectRecord {
    /// Library-unique id, `project-<millis>` when generated.
    pub id: String,
    /// Project document JSON.
    pub data: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl ProjectRecord {
    /// Parse the stored document.
    pub fn document(&self) -> ClipforgeResult<ProjectDocument> {
        ProjectDocument::from_json(&self.data)
    }
}

/// Saved projects backed by a single JSON file.
#[derive(Clone, Debug)]
pub struct ProjectLibrary {
    records: Vec<ProjectRecord>,
    storage_path: PathBuf,
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl ProjectLibrary {
    /// Load the library at `path`.
    ///
    /// A missing file is an empty library. An unreadable or corrupt file is
    /// logged and also treated as empty.
    pub fn load_from(path: &Path) -> Self {
        let records = match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Vec<ProjectRecord>>(&json) {
                Ok(records) => {
                    tracing::debug!(count = records.len(), "loaded project library");
                    records
                }
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "corrupt project library, starting empty");
                    Vec::new()
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(error = %e, path = %path.display(), "failed to read project library");
                }
                Vec::new()
            }
        };
        Self {
            records,
            storage_path: path.to_path_buf(),
        }
    }

    /// File the library persists to.
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Records in insertion order.
    pub fn list(&self) -> &[ProjectRecord] {
        &self.records
    }

    /// Record with `id`.
    pub fn get(&self, id: &str) -> Option<&ProjectRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Insert or replace a record and persist the library.
    ///
    /// Without an explicit id a new `project-<millis>` id is allocated.
    /// Replacing keeps the record's position. Returns the id used.
    pub fn save(&mut self, id: Option<&str>, doc: &ProjectDocument) -> ClipforgeResult<String> {
        let timestamp = now_millis();
        let id = match id {
            Some(id) => id.to_string(),
            None => self.fresh_id(timestamp),
        };
        let record = ProjectRecord {
            id: id.clone(),
            data: doc.to_json()?,
            timestamp,
        };
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(slot) => *slot = record,
            None => self.records.push(record),
        }
        self.persist()?;
        tracing::info!(id = %id, "saved project to library");
        Ok(id)
    }

    /// Remove a record and persist. Returns whether it existed.
    pub fn remove(&mut self, id: &str) -> ClipforgeResult<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let removed = self.records.len() != before;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    fn fresh_id(&self, millis: u64) -> String {
        let mut n = millis;
        loop {
            let id = format!("project-{n}");
            if self.get(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }

    fn persist(&self) -> ClipforgeResult<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        write_atomic(&self.storage_path, json.as_bytes())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/library.rs"]
mod tests;
