//! Parameter definitions for the `kb_*` MCP tools.
//!
//! The four category update tools take the category structs themselves
//! (`PersonalInfo`, `ProfessionalInfo`, ...) as their arguments.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddCustomParams {
    #[schemars(description = "Free-form category, e.g. 'hobbies' or 'family'")]
    pub category: String,

    #[schemars(description = "Key within the category. Re-using a key replaces its value.")]
    pub key: String,

    #[schemars(description = "Any JSON value")]
    pub value: serde_json::Value,

    #[schemars(description = "Optional tags, searchable alongside the value")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RemoveCustomParams {
    pub category: String,
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetAllParams {
    #[schemars(
        description = "'full' (whole document), 'summary' (key fields only), or 'categories' (set field names). Defaults to 'full'."
    )]
    pub format: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetCustomParams {
    #[schemars(description = "Only return entries in this category")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "Text to fuzzy-match against field names, values, and tags")]
    pub query: String,

    #[schemars(description = "Maximum results to return")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetContextParams {
    #[schemars(
        description = "Categories to include: personal, professional, preferences, projects. Defaults to all four."
    )]
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetHistoryParams {
    #[schemars(description = "Number of most recent entries to return")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ImportParams {
    #[schemars(description = "A document previously produced by kb_export")]
    pub data: String,
}
