//! Field mutators.
//!
//! Each call applies a whole batch in memory, records one history entry per
//! touched field, and then saves once. Empty batches are a no-op.

use serde_json::Value;

use super::error::Result;
use super::history::{HistoryAction, HistoryEntry};
use super::store::KnowledgeStore;
use super::types::{
    Category, CustomKnowledge, CustomMetadata, PersonalInfo, Preferences, ProfessionalInfo,
    ProjectContext,
};

/// One field write inside a batch.
struct FieldChange {
    field: String,
    old_value: Option<Value>,
    new_value: Value,
}

/// Merge the set fields of `updates` into `target`.
///
/// Changes come back in the category's declared field order. The merge happens
/// on the JSON projection and is only written back once every field has been
/// applied, so a failure leaves `target` unchanged.
fn merge_fields<C: Category>(target: &mut C, updates: &C) -> Result<Vec<FieldChange>> {
    let incoming = updates.to_fields()?;
    if incoming.is_empty() {
        return Ok(Vec::new());
    }

    let mut current = target.to_fields()?;
    let mut changes = Vec::with_capacity(incoming.len());
    for (field, new_value) in incoming {
        let old_value = current.insert(field.clone(), new_value.clone());
        changes.push(FieldChange {
            field,
            old_value,
            new_value,
        });
    }

    *target = C::from_fields(current)?;
    Ok(changes)
}

impl KnowledgeStore {
    /// Apply a partial personal update. Returns the number of fields written.
    pub fn update_personal(&mut self, updates: &PersonalInfo) -> Result<usize> {
        let changes = merge_fields(&mut self.kb.personal, updates)?;
        self.commit_changes(PersonalInfo::NAME, changes)
    }

    pub fn update_professional(&mut self, updates: &ProfessionalInfo) -> Result<usize> {
        let changes = merge_fields(&mut self.kb.professional, updates)?;
        self.commit_changes(ProfessionalInfo::NAME, changes)
    }

    pub fn update_preferences(&mut self, updates: &Preferences) -> Result<usize> {
        let changes = merge_fields(&mut self.kb.preferences, updates)?;
        self.commit_changes(Preferences::NAME, changes)
    }

    pub fn update_projects(&mut self, updates: &ProjectContext) -> Result<usize> {
        let changes = merge_fields(&mut self.kb.projects, updates)?;
        self.commit_changes(ProjectContext::NAME, changes)
    }

    fn commit_changes(&mut self, category: &str, changes: Vec<FieldChange>) -> Result<usize> {
        if changes.is_empty() {
            return Ok(0);
        }
        let count = changes.len();
        for change in changes {
            self.record(HistoryEntry::change(
                category,
                change.field,
                change.old_value,
                change.new_value,
            ));
        }
        self.save()?;
        tracing::info!(category, fields = count, "knowledge updated");
        Ok(count)
    }

    /// Insert or replace the custom entry for `(category, key)`.
    ///
    /// Replacing keeps the original `addedAt` and is recorded as an update.
    pub fn add_custom_knowledge(
        &mut self,
        category: &str,
        key: &str,
        value: Value,
        tags: Option<Vec<String>>,
    ) -> Result<HistoryAction> {
        let now = chrono::Utc::now().to_rfc3339();
        let history_category = format!("custom:{category}");

        let existing = self
            .kb
            .custom
            .iter_mut()
            .find(|entry| entry.category == category && entry.key == key);

        let entry = match existing {
            Some(entry) => {
                let old_value = std::mem::replace(&mut entry.value, value.clone());
                entry.metadata.last_updated = now;
                entry.metadata.tags = tags;
                HistoryEntry::change(history_category, key, Some(old_value), value)
            }
            None => {
                self.kb.custom.push(CustomKnowledge {
                    category: category.to_string(),
                    key: key.to_string(),
                    value: value.clone(),
                    metadata: CustomMetadata {
                        added_at: now.clone(),
                        last_updated: now,
                        importance: None,
                        tags,
                    },
                });
                HistoryEntry::change(history_category, key, None, value)
            }
        };

        let action = entry.action;
        self.record(entry);
        self.save()?;
        tracing::info!(category, key, action = %action, "custom knowledge stored");
        Ok(action)
    }

    /// Remove the custom entry for `(category, key)`.
    ///
    /// Returns `false`, touching nothing, when no such entry exists.
    pub fn remove_custom_knowledge(&mut self, category: &str, key: &str) -> Result<bool> {
        let Some(position) = self
            .kb
            .custom
            .iter()
            .position(|entry| entry.category == category && entry.key == key)
        else {
            return Ok(false);
        };

        let removed = self.kb.custom.remove(position);
        self.record(HistoryEntry::deletion(
            format!("custom:{category}"),
            key,
            removed.value,
        ));
        self.save()?;
        tracing::info!(category, key, "custom knowledge removed");
        Ok(true)
    }
}
