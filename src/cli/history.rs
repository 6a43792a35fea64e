use anyhow::Result;

use mcp_instruct::config::InstructConfig;

/// Print the most recent history entries, oldest first.
pub fn history(config: &InstructConfig, limit: Option<usize>) -> Result<()> {
    let store = super::open_store(config)?;
    let limit = limit.unwrap_or(config.knowledge.default_history);
    let entries = store.history(limit);

    if entries.is_empty() {
        println!("No history.");
        return Ok(());
    }

    for entry in &entries {
        let field = entry.field.as_deref().unwrap_or("-");
        let change = match (&entry.old_value, &entry.new_value) {
            (Some(old), Some(new)) => format!("{old} -> {new}"),
            (None, Some(new)) => new.to_string(),
            (Some(old), None) => format!("{old} (removed)"),
            (None, None) => String::new(),
        };
        println!(
            "{}  {:<7} {}.{}  {}",
            entry.timestamp,
            entry.action.as_str(),
            entry.category,
            field,
            change
        );
    }

    Ok(())
}
