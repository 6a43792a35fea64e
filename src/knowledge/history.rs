//! Bounded, append-only change log.
//!
//! The ledger has no storage of its own: it serializes as a plain JSON array
//! inside the knowledge base document and is persisted with every save.

use serde::{Deserialize, Serialize};

/// Default number of entries retained.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Kind of mutation recorded in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Add,
    Update,
    Delete,
    Query,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Query => "query",
        }
    }
}

impl std::fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// RFC 3339, stamped by [`HistoryLedger::append`].
    pub timestamp: String,
    pub action: HistoryAction,
    /// Category name, or `custom:<category>` for custom entries.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<serde_json::Value>,
}

impl HistoryEntry {
    /// A field write: `add` when there was no previous value, `update` otherwise.
    pub fn change(
        category: impl Into<String>,
        field: impl Into<String>,
        old_value: Option<serde_json::Value>,
        new_value: serde_json::Value,
    ) -> Self {
        let action = if old_value.is_some() {
            HistoryAction::Update
        } else {
            HistoryAction::Add
        };
        Self {
            timestamp: String::new(),
            action,
            category: category.into(),
            field: Some(field.into()),
            old_value,
            new_value: Some(new_value),
        }
    }

    /// A removal carrying the value that was dropped.
    pub fn deletion(
        category: impl Into<String>,
        field: impl Into<String>,
        old_value: serde_json::Value,
    ) -> Self {
        Self {
            timestamp: String::new(),
            action: HistoryAction::Delete,
            category: category.into(),
            field: Some(field.into()),
            old_value: Some(old_value),
            new_value: None,
        }
    }
}

/// Ordered log of mutations, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLedger(Vec<HistoryEntry>);

impl HistoryLedger {
    /// Stamp `entry` with the current time and push it, then drop the oldest
    /// entries until at most `limit` remain.
    pub fn append(&mut self, mut entry: HistoryEntry, limit: usize) {
        entry.timestamp = chrono::Utc::now().to_rfc3339();
        self.0.push(entry);
        if self.0.len() > limit {
            let excess = self.0.len() - limit;
            self.0.drain(..excess);
        }
    }

    /// The last `limit` entries in chronological order.
    pub fn recent(&self, limit: usize) -> &[HistoryEntry] {
        let start = self.0.len().saturating_sub(limit);
        &self.0[start..]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.0.last()
    }
}
