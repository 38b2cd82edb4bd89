//! The import ledger: UIDs of events already pushed as tasks.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{TodologyError, TodologyResult};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportLedger {
    ids: HashSet<String>,
}

impl ImportLedger {
    /// Read the ledger at `path`.
    ///
    /// Never fails: a missing file, invalid JSON or a JSON `null` all load as
    /// an empty ledger.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match serde_json::from_str::<Option<Vec<String>>>(&content) {
            Ok(ids) => ids.into_iter().flatten().collect(),
            Err(e) => {
                log::debug!("Ignoring unreadable ledger at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Write the whole id set to `path`, creating `directory` first.
    pub fn store(&self, directory: &Path, path: &Path) -> TodologyResult<()> {
        std::fs::create_dir_all(directory)?;

        // Sort for deterministic output
        let mut sorted: Vec<&str> = self.ids.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let content = serde_json::to_string(&sorted)
            .map_err(|e| TodologyError::Serialization(e.to_string()))?;

        let temp = path.with_extension("json.tmp");
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, path)?;
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Record a pushed id. Returns `false` if it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<String> for ImportLedger {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        ImportLedger {
            ids: iter.into_iter().collect(),
        }
    }
}
