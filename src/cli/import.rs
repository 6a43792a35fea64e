use anyhow::{Context, Result};
use std::path::Path;

use mcp_instruct::config::InstructConfig;

/// Replace the profile's knowledge base with the document in `file`.
///
/// The file must be a previous export; anything else is rejected and the
/// current document is left as it was.
pub fn import(config: &InstructConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    let mut store = super::open_store(config)?;
    store
        .import_document(&json)
        .context("failed to import knowledge base")?;

    let kb = store.knowledge_base();
    println!(
        "Imported knowledge base {} into profile '{}' ({} custom entries, {} history entries).",
        kb.id,
        store.profile(),
        kb.custom.len(),
        kb.history.len()
    );

    Ok(())
}
