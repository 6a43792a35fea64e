use anyhow::Result;

use mcp_instruct::config::InstructConfig;
use mcp_instruct::knowledge::types::Category;

/// Display knowledge base statistics in the terminal.
pub fn stats(config: &InstructConfig) -> Result<()> {
    let store = super::open_store(config)?;
    let kb = store.knowledge_base();

    println!("Knowledge Base Statistics");
    println!("{}", "=".repeat(40));
    println!("  Profile:             {}", store.profile());
    println!("  ID:                  {}", kb.id);
    println!("  Version:             {}", kb.version);
    println!("  Created:             {}", kb.created_at);
    println!("  Last updated:        {}", kb.last_updated);
    println!();

    println!("Fields set:");
    let counts = [
        ("personal", kb.personal.set_fields().len()),
        ("professional", kb.professional.set_fields().len()),
        ("preferences", kb.preferences.set_fields().len()),
        ("projects", kb.projects.set_fields().len()),
    ];
    for (category, count) in counts {
        println!("  {:<14} {}", category, count);
    }
    println!();

    println!("Custom entries:        {}", kb.custom.len());
    for category in kb.custom_categories() {
        let count = kb.custom.iter().filter(|c| c.category == category).count();
        println!("  {:<14} {}", category, count);
    }
    println!();

    println!(
        "History entries:       {} (cap {})",
        kb.history.len(),
        store.settings().history_limit
    );

    let file_size = std::fs::metadata(store.file_path())
        .map(|m| m.len())
        .unwrap_or(0);
    println!("File:                  {}", store.file_path().display());
    println!("File size:             {} bytes", file_size);

    Ok(())
}
