use anyhow::{Context, Result};
use std::path::Path;

use mcp_instruct::config::InstructConfig;

/// Export the profile's knowledge base as pretty JSON to stdout or `output`.
pub fn export(config: &InstructConfig, output: Option<&Path>) -> Result<()> {
    let store = super::open_store(config)?;
    let json = store.export_document()?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write export file: {}", path.display()))?;
            eprintln!("Exported profile '{}' to {}.", store.profile(), path.display());
        }
        None => {
            println!("{json}");
            eprintln!("Exported profile '{}'.", store.profile());
        }
    }

    Ok(())
}
