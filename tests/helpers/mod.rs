#![allow(dead_code)]

use mcp_instruct::knowledge::{KnowledgeStore, StoreSettings};
use mcp_instruct::persona::AgentManager;
use std::path::Path;
use tempfile::TempDir;

/// Open a fresh store for the `default` profile in a temp directory.
/// Keep the returned `TempDir` alive for as long as the store is used.
pub fn test_store() -> (TempDir, KnowledgeStore) {
    let tmp = TempDir::new().unwrap();
    let store = KnowledgeStore::open(tmp.path(), "default", StoreSettings::default()).unwrap();
    (tmp, store)
}

/// Re-open the `default` profile from `dir`, as a restarted process would.
pub fn reopen(dir: &Path) -> KnowledgeStore {
    KnowledgeStore::open(dir, "default", StoreSettings::default()).unwrap()
}

/// Write `(id, markdown)` templates into a temp agents directory and load them.
pub fn test_agents(templates: &[(&str, &str)]) -> (TempDir, AgentManager) {
    let tmp = TempDir::new().unwrap();
    for (id, content) in templates {
        std::fs::write(tmp.path().join(format!("{id}.md")), content).unwrap();
    }
    let mut agents = AgentManager::new(tmp.path());
    agents.load().unwrap();
    (tmp, agents)
}
