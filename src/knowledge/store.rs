//! Profile document store: load, create-if-absent, atomic persist.
//!
//! [`KnowledgeStore`] owns the single resident [`KnowledgeBase`] for one profile
//! plus its derived [`SearchIndex`]. The document lives at
//! `<data_dir>/<profile>.json` and is rewritten in full on every save.

use std::path::{Path, PathBuf};

use super::error::{KnowledgeError, Result};
use super::history::{HistoryEntry, DEFAULT_HISTORY_LIMIT};
use super::search::{self, ApproximateMatcher, SearchIndex, SearchResult, SearchSettings};
use super::types::{
    CustomKnowledge, KnowledgeBase, PersonalInfo, Preferences, ProfessionalInfo, ProjectContext,
};

/// Engine tunables, normally taken from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreSettings {
    /// Maximum retained history entries.
    pub history_limit: usize,
    pub search: SearchSettings,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            search: SearchSettings::default(),
        }
    }
}

/// The resident knowledge base for one profile.
pub struct KnowledgeStore {
    profile: String,
    data_dir: PathBuf,
    file_path: PathBuf,
    settings: StoreSettings,
    pub(super) kb: KnowledgeBase,
    index: Option<SearchIndex>,
}

impl KnowledgeStore {
    /// Create a store for `profile` under `data_dir` holding an empty document.
    /// Nothing touches disk until [`initialize`](Self::initialize).
    pub fn new(data_dir: impl AsRef<Path>, profile: &str, settings: StoreSettings) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        let file_path = data_dir.join(format!("{profile}.json"));
        Self {
            profile: profile.to_string(),
            data_dir,
            file_path,
            settings,
            kb: KnowledgeBase::empty(),
            index: None,
        }
    }

    /// [`new`](Self::new) followed by [`initialize`](Self::initialize).
    pub fn open(data_dir: impl AsRef<Path>, profile: &str, settings: StoreSettings) -> Result<Self> {
        let mut store = Self::new(data_dir, profile, settings);
        store.initialize()?;
        Ok(store)
    }

    /// Ensure the data directory exists and load the persisted document if any.
    ///
    /// With no file the resident document becomes a fresh empty one. A document
    /// that fails to parse is renamed to `<profile>.json.corrupt`, logged, and
    /// replaced in memory by an empty one, so a later save cannot overwrite it.
    pub fn initialize(&mut self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| KnowledgeError::io(&self.data_dir, e))?;

        if self.file_path.exists() {
            let contents = std::fs::read_to_string(&self.file_path)
                .map_err(|e| KnowledgeError::io(&self.file_path, e))?;
            match serde_json::from_str::<KnowledgeBase>(&contents) {
                Ok(kb) => {
                    tracing::info!(
                        profile = %self.profile,
                        path = %self.file_path.display(),
                        custom = kb.custom.len(),
                        history = kb.history.len(),
                        "knowledge base loaded"
                    );
                    self.kb = kb;
                }
                Err(e) => {
                    let corrupt_path = self.corrupt_path();
                    std::fs::rename(&self.file_path, &corrupt_path)
                        .map_err(|e| KnowledgeError::io(&corrupt_path, e))?;
                    tracing::error!(
                        path = %self.file_path.display(),
                        moved_to = %corrupt_path.display(),
                        error = %e,
                        "failed to parse knowledge base, starting from an empty document"
                    );
                    self.kb = KnowledgeBase::empty();
                }
            }
        } else {
            tracing::info!(profile = %self.profile, "no knowledge base on disk, created empty document");
            self.kb = KnowledgeBase::empty();
        }

        self.rebuild_index();
        Ok(())
    }

    /// Stamp `lastUpdated`, persist the whole document, rebuild the index.
    ///
    /// Writes to a temp file and renames it over the target so a failed write
    /// leaves the previous version intact.
    pub fn save(&mut self) -> Result<()> {
        self.kb.last_updated = chrono::Utc::now().to_rfc3339();
        let json = serde_json::to_string_pretty(&self.kb)?;

        let tmp_path = self.file_path.with_extension("json.tmp");
        let written = std::fs::write(&tmp_path, json)
            .map_err(|e| KnowledgeError::io(&tmp_path, e))
            .and_then(|()| {
                std::fs::rename(&tmp_path, &self.file_path)
                    .map_err(|e| KnowledgeError::io(&self.file_path, e))
            });
        if let Err(e) = written {
            // best effort; the target file still holds the last good version
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }

        tracing::debug!(path = %self.file_path.display(), "knowledge base saved");
        self.rebuild_index();
        Ok(())
    }

    /// Where an unreadable document is moved aside: `<profile>.json.corrupt`.
    fn corrupt_path(&self) -> PathBuf {
        self.file_path.with_extension("json.corrupt")
    }

    fn rebuild_index(&mut self) {
        let records = search::flatten(&self.kb);
        tracing::debug!(records = records.len(), "search index rebuilt");
        self.index = Some(SearchIndex::build(
            records,
            ApproximateMatcher::new(self.settings.search),
        ));
    }

    /// Append a history entry, honoring the configured cap.
    pub(super) fn record(&mut self, entry: HistoryEntry) {
        self.kb.history.append(entry, self.settings.history_limit);
    }

    /// Fuzzy search over every set field and custom entry, best match first.
    pub fn search(&mut self, query: &str) -> Vec<SearchResult> {
        if self.index.is_none() {
            self.rebuild_index();
        }
        self.index
            .as_ref()
            .map(|index| index.query(query))
            .unwrap_or_default()
    }

    /// Serialize the resident document as pretty JSON.
    pub fn export_document(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.kb)?)
    }

    /// Replace the resident document with `data` and persist it.
    ///
    /// The payload must carry a non-empty `version` and a `personal` key; anything
    /// else, or a document that does not deserialize, is a
    /// [`KnowledgeError::Format`] and leaves the current state untouched.
    pub fn import_document(&mut self, data: &str) -> Result<()> {
        let raw: serde_json::Value = serde_json::from_str(data)
            .map_err(|e| KnowledgeError::Format(format!("not valid JSON: {e}")))?;

        let has_version = raw
            .get("version")
            .and_then(|v| v.as_str())
            .is_some_and(|v| !v.is_empty());
        if !has_version || raw.get("personal").is_none() {
            return Err(KnowledgeError::Format(
                "missing version or personal section".into(),
            ));
        }

        let kb: KnowledgeBase =
            serde_json::from_value(raw).map_err(|e| KnowledgeError::Format(e.to_string()))?;

        let previous = std::mem::replace(&mut self.kb, kb);
        if let Err(e) = self.save() {
            self.kb = previous;
            self.rebuild_index();
            return Err(e);
        }
        tracing::info!(profile = %self.profile, id = %self.kb.id, "knowledge base imported");
        Ok(())
    }

    /// True when no structured field and no custom entry is set.
    pub fn is_new(&self) -> bool {
        self.kb.is_new()
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Copy of the whole document.
    pub fn knowledge_base(&self) -> KnowledgeBase {
        self.kb.clone()
    }

    pub fn personal(&self) -> PersonalInfo {
        self.kb.personal.clone()
    }

    pub fn professional(&self) -> ProfessionalInfo {
        self.kb.professional.clone()
    }

    pub fn preferences(&self) -> Preferences {
        self.kb.preferences.clone()
    }

    pub fn projects(&self) -> ProjectContext {
        self.kb.projects.clone()
    }

    /// Custom entries, optionally restricted to one category.
    pub fn custom(&self, category: Option<&str>) -> Vec<CustomKnowledge> {
        self.kb
            .custom
            .iter()
            .filter(|entry| category.map_or(true, |c| entry.category == c))
            .cloned()
            .collect()
    }

    /// The most recent `limit` history entries, oldest first.
    pub fn history(&self, limit: usize) -> Vec<HistoryEntry> {
        self.kb.history.recent(limit).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn initialize_creates_directory_without_writing_document() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("kb");
        let store = KnowledgeStore::open(&dir, "default", StoreSettings::default()).unwrap();

        assert!(dir.is_dir());
        assert!(!store.file_path().exists());
        assert!(store.is_new());
    }

    #[test]
    fn save_writes_pretty_json_at_profile_path() {
        let tmp = TempDir::new().unwrap();
        let mut store = KnowledgeStore::open(tmp.path(), "alice", StoreSettings::default()).unwrap();
        store.save().unwrap();

        let path = tmp.path().join("alice.json");
        assert_eq!(store.file_path(), path);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n  \"version\": \"1.0.0\""));
        assert!(!tmp.path().join("alice.json.tmp").exists());
    }

    #[test]
    fn malformed_document_is_moved_aside() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("default.json"), "{ not json").unwrap();

        let mut store = KnowledgeStore::open(tmp.path(), "default", StoreSettings::default()).unwrap();
        assert!(store.is_new());
        assert!(!tmp.path().join("default.json").exists());

        store.save().unwrap();
        let contents = std::fs::read_to_string(tmp.path().join("default.json.corrupt")).unwrap();
        assert_eq!(contents, "{ not json");
    }

    #[test]
    fn reinitialize_without_file_resets_document() {
        let tmp = TempDir::new().unwrap();
        let mut store = KnowledgeStore::open(tmp.path(), "default", StoreSettings::default()).unwrap();
        store.kb.personal.name = Some("Ada".into());
        store.save().unwrap();
        let old_id = store.knowledge_base().id;

        std::fs::remove_file(store.file_path()).unwrap();
        store.initialize().unwrap();

        assert!(store.is_new());
        assert!(store.personal().name.is_none());
        assert_ne!(store.knowledge_base().id, old_id);
        assert!(store.search("ada").is_empty());
    }

    #[test]
    fn failed_save_removes_temp_file() {
        let tmp = TempDir::new().unwrap();
        let mut store = KnowledgeStore::open(tmp.path(), "default", StoreSettings::default()).unwrap();
        // a directory at the target path makes the rename fail after the write
        std::fs::create_dir(store.file_path()).unwrap();

        assert!(store.save().is_err());
        assert!(!tmp.path().join("default.json.tmp").exists());
    }

    #[test]
    fn import_rejects_missing_markers() {
        let tmp = TempDir::new().unwrap();
        let mut store = KnowledgeStore::open(tmp.path(), "default", StoreSettings::default()).unwrap();
        let before = store.knowledge_base();

        let err = store.import_document(r#"{"personal": {}}"#).unwrap_err();
        assert!(matches!(err, KnowledgeError::Format(_)));
        let err = store.import_document(r#"{"version": "1.0.0"}"#).unwrap_err();
        assert!(matches!(err, KnowledgeError::Format(_)));
        let err = store.import_document("not json").unwrap_err();
        assert!(matches!(err, KnowledgeError::Format(_)));

        assert_eq!(store.knowledge_base(), before);
        assert!(!store.file_path().exists());
    }

    #[test]
    fn search_builds_index_lazily() {
        let tmp = TempDir::new().unwrap();
        let mut store = KnowledgeStore::new(tmp.path(), "default", StoreSettings::default());
        store.kb.personal.name = Some("Grace Hopper".into());

        let results = store.search("hopper");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].field, "name");
    }
}
