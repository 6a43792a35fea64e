//! Knowledge engine: document store, field mutators, history ledger, and fuzzy search.

pub mod error;
pub mod history;
pub mod search;
pub mod store;
pub mod types;
pub mod update;
pub mod views;

pub use error::{KnowledgeError, Result};
pub use history::{HistoryAction, HistoryEntry};
pub use search::SearchResult;
pub use store::{KnowledgeStore, StoreSettings};
pub use types::KnowledgeBase;
