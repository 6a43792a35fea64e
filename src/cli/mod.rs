pub mod export;
pub mod history;
pub mod import;
pub mod search;
pub mod stats;

use anyhow::{Context, Result};

use mcp_instruct::config::InstructConfig;
use mcp_instruct::knowledge::KnowledgeStore;

/// Open the configured profile's knowledge store.
fn open_store(config: &InstructConfig) -> Result<KnowledgeStore> {
    let data_dir = config.resolved_data_dir();
    KnowledgeStore::open(&data_dir, &config.storage.profile, config.store_settings())
        .with_context(|| format!("failed to open knowledge base in {}", data_dir.display()))
}
