use anyhow::Result;

use mcp_instruct::config::InstructConfig;

/// Run a fuzzy search from the terminal.
pub fn search(config: &InstructConfig, query: &str, limit: Option<usize>) -> Result<()> {
    let mut store = super::open_store(config)?;
    let limit = limit.unwrap_or(config.search.default_limit);

    let results = store.search(query);
    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", results.len());

    for (i, result) in results.iter().take(limit).enumerate() {
        let value = match &result.value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let preview = if value.chars().count() > 120 {
            format!("{}...", value.chars().take(120).collect::<String>())
        } else {
            value
        };

        println!(
            "  {}. [{}] {} (relevance: {:.3})",
            i + 1,
            result.category,
            result.field,
            result.relevance,
        );
        println!("     {}", preview);
        println!("     {}", result.context);
        println!();
    }

    Ok(())
}
