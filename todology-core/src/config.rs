//! Loading and validation of `config.yml`.
//!
//! The file is deep-merged over a built-in default document, so a user only
//! needs to write the keys they want to change:
//!
//! ```yaml
//! schoology:
//!   calendar: webcal://example.schoology.com/calendar/feed/ical/123/calendar.ics
//! todoist:
//!   apiToken: 0123456789abcdef
//!   project: School
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{TodologyError, TodologyResult};

pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Name of the ledger file inside the storage directory.
pub const LEDGER_FILE_NAME: &str = "imported.json";

static DEFAULT_PROJECT: &str = "Inbox";
static DEFAULT_LABEL: &str = "Todology";
static DEFAULT_STORAGE: &str = "~/.todology";

/// Validated configuration for a single run.
///
/// Only built through [`Config::from_document`], so the feed address and the
/// API token are always non-empty.
#[derive(Debug, Clone)]
pub struct Config {
    pub feed_address: String,
    pub api_token: String,
    pub project: String,
    pub labels: BTreeSet<String>,
    /// Storage directory with `~` already expanded.
    pub storage: PathBuf,
}

#[derive(Deserialize)]
struct RawConfig {
    todoist: RawTodoist,
    storage: String,
}

#[derive(Deserialize)]
struct RawTodoist {
    project: String,
    labels: BTreeSet<String>,
}

/// The document every loaded config is merged onto.
pub fn default_document() -> Value {
    let mut schoology = Mapping::new();
    schoology.insert("calendar".into(), Value::Null);

    let mut todoist = Mapping::new();
    todoist.insert("apiToken".into(), Value::Null);
    todoist.insert("project".into(), DEFAULT_PROJECT.into());
    todoist.insert(
        "labels".into(),
        Value::Sequence(vec![DEFAULT_LABEL.into()]),
    );

    let mut root = Mapping::new();
    root.insert("schoology".into(), Value::Mapping(schoology));
    root.insert("todoist".into(), Value::Mapping(todoist));
    root.insert("storage".into(), DEFAULT_STORAGE.into());
    Value::Mapping(root)
}

/// Deep-merge `source` onto `destination`.
///
/// Mappings are merged key by key, recursively. Any other value in `source`
/// (scalars, sequences, null) replaces the destination value wholesale.
pub fn merge(source: Value, destination: Value) -> Value {
    match (source, destination) {
        (Value::Mapping(source), Value::Mapping(mut destination)) => {
            for (key, value) in source {
                let merged = match destination.get_mut(&key) {
                    Some(existing) => merge(value, std::mem::take(existing)),
                    None => value,
                };
                destination.insert(key, merged);
            }
            Value::Mapping(destination)
        }
        (source, _) => source,
    }
}

impl Config {
    /// Read, merge and validate the config file at `path`.
    pub fn load(path: &Path) -> TodologyResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TodologyError::Config(format!(
                "Could not read config file at {}: {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> TodologyResult<Self> {
        let loaded = if content.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| TodologyError::Config(format!("Could not parse config: {e}")))?
        };
        Self::from_document(loaded)
    }

    /// Merge an already-parsed document over the defaults and validate it.
    ///
    /// A document that is not a mapping is ignored with a warning.
    pub fn from_document(loaded: Value) -> TodologyResult<Self> {
        let document = if loaded.is_mapping() {
            merge(loaded, default_document())
        } else {
            log::warn!("Invalid {DEFAULT_CONFIG_FILE}. Ignoring.");
            default_document()
        };

        let api_token = required_string(&document, "todoist", "apiToken").ok_or_else(|| {
            TodologyError::Config("Invalid API token! Set todoist.apiToken".into())
        })?;
        let feed_address =
            required_string(&document, "schoology", "calendar").ok_or_else(|| {
                TodologyError::Config("Invalid calendar URL! Set schoology.calendar".into())
            })?;

        let raw: RawConfig = serde_yaml::from_value(document)
            .map_err(|e| TodologyError::Config(e.to_string()))?;

        Ok(Config {
            feed_address,
            api_token,
            project: raw.todoist.project,
            labels: raw.todoist.labels,
            storage: PathBuf::from(shellexpand::tilde(&raw.storage).as_ref()),
        })
    }

    /// `<storage>/imported.json`
    pub fn ledger_path(&self) -> PathBuf {
        self.storage.join(LEDGER_FILE_NAME)
    }
}

fn required_string(document: &Value, section: &str, key: &str) -> Option<String> {
    document
        .get(section)?
        .get(key)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_merge_overrides_only_matching_leaves() {
        let destination = yaml(
            "first:\n  all_rows:\n    pass: dog\n    number: '1'\nsecond: keep\n",
        );
        let source = yaml("first:\n  all_rows:\n    fail: cat\n    number: '5'\n");

        let merged = merge(source, destination);

        assert_eq!(
            merged,
            yaml(
                "first:\n  all_rows:\n    pass: dog\n    number: '5'\n    fail: cat\nsecond: keep\n"
            )
        );
    }

    #[test]
    fn test_merge_replaces_sequences_wholesale() {
        let merged = merge(yaml("labels: [a]"), yaml("labels: [x, y, z]"));
        assert_eq!(merged, yaml("labels: [a]"));
    }

    #[test]
    fn test_merge_subset_keeps_every_default() {
        let merged = merge(yaml("todoist:\n  project: School\n"), default_document());

        assert_eq!(merged["todoist"]["project"], Value::from("School"));
        assert_eq!(merged["todoist"]["labels"], yaml("[Todology]"));
        assert_eq!(merged["todoist"]["apiToken"], Value::Null);
        assert_eq!(merged["schoology"]["calendar"], Value::Null);
        assert_eq!(merged["storage"], Value::from("~/.todology"));
    }

    #[test]
    fn test_config_applies_defaults() {
        let config = Config::from_yaml_str(
            "schoology:\n  calendar: webcal://example.com/feed.ics\ntodoist:\n  apiToken: secret\n",
        )
        .unwrap();

        assert_eq!(config.feed_address, "webcal://example.com/feed.ics");
        assert_eq!(config.api_token, "secret");
        assert_eq!(config.project, "Inbox");
        assert_eq!(config.labels, BTreeSet::from(["Todology".to_string()]));
        assert!(!config.storage.to_string_lossy().starts_with('~'));
        assert!(config.ledger_path().ends_with(".todology/imported.json"));
    }

    #[test]
    fn test_config_overrides_labels_and_storage() {
        let config = Config::from_yaml_str(
            "schoology:\n  calendar: example.com/feed.ics\ntodoist:\n  apiToken: secret\n  labels: [school, homework]\nstorage: /tmp/todology\n",
        )
        .unwrap();

        assert_eq!(
            config.labels,
            BTreeSet::from(["homework".to_string(), "school".to_string()])
        );
        assert_eq!(config.ledger_path(), PathBuf::from("/tmp/todology/imported.json"));
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = Config::from_yaml_str("schoology:\n  calendar: example.com/feed.ics\n")
            .unwrap_err();
        assert!(matches!(err, TodologyError::Config(msg) if msg.contains("API token")));
    }

    #[test]
    fn test_empty_or_non_string_calendar_is_fatal() {
        let err = Config::from_yaml_str("schoology:\n  calendar: ''\ntodoist:\n  apiToken: t\n")
            .unwrap_err();
        assert!(matches!(err, TodologyError::Config(msg) if msg.contains("calendar")));

        let err = Config::from_yaml_str("schoology:\n  calendar: 42\ntodoist:\n  apiToken: t\n")
            .unwrap_err();
        assert!(matches!(err, TodologyError::Config(_)));
    }

    #[test]
    fn test_non_mapping_document_falls_back_to_defaults() {
        // Defaults carry no token, so validation still fails after the fallback.
        let err = Config::from_yaml_str("- just\n- a list\n").unwrap_err();
        assert!(matches!(err, TodologyError::Config(msg) if msg.contains("API token")));

        let err = Config::from_yaml_str("").unwrap_err();
        assert!(matches!(err, TodologyError::Config(msg) if msg.contains("API token")));
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("config.yml")).unwrap_err();
        assert!(matches!(err, TodologyError::Config(_)));
    }
}
