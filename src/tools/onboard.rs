//! MCP `onboard` tool parameter definition.

use mcp_instruct::onboarding::QuickSetup;
use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for the `onboard` MCP tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct OnboardParams {
    #[schemars(description = "'start', 'check_status', or 'quick_setup'")]
    pub action: String,

    #[schemars(description = "Profile data for quick_setup")]
    pub data: Option<QuickSetup>,
}
