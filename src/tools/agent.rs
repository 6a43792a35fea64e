use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AgentActivateParams {
    #[schemars(description = "Agent template ID, e.g. 'blue-team'")]
    pub agent: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AgentQuickSwitchParams {
    #[schemars(description = "Shorthand: 'it', 'hacker', 'sales', 'blue', 'red', or 'purple'")]
    pub r#type: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AgentInstructionsParams {
    #[schemars(description = "Agent template ID. Defaults to the active agent.")]
    pub agent: Option<String>,
}
