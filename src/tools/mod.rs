pub mod agent;
pub mod knowledge;
pub mod onboard;

use agent::{AgentActivateParams, AgentInstructionsParams, AgentQuickSwitchParams};
use knowledge::{
    AddCustomParams, GetAllParams, GetContextParams, GetCustomParams, GetHistoryParams,
    ImportParams, RemoveCustomParams, SearchParams,
};
use onboard::OnboardParams;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use mcp_instruct::config::InstructConfig;
use mcp_instruct::knowledge::types::{PersonalInfo, Preferences, ProfessionalInfo, ProjectContext};
use mcp_instruct::knowledge::views::{
    render_context, CategoryIndex, KnowledgeStatus, KnowledgeSummary, CONTEXT_CATEGORIES,
};
use mcp_instruct::knowledge::{self as kb, KnowledgeStore};
use mcp_instruct::onboarding;
use mcp_instruct::persona::AgentManager;

/// The MCP tool handler. Holds the profile's knowledge store, the persona
/// manager, and config, and exposes all tools via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct InstructTools {
    tool_router: ToolRouter<Self>,
    store: Arc<Mutex<KnowledgeStore>>,
    agents: Arc<Mutex<AgentManager>>,
    config: Arc<InstructConfig>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("serialization failed: {e}"))
}

#[tool_router]
impl InstructTools {
    pub fn new(
        store: Arc<Mutex<KnowledgeStore>>,
        agents: Arc<Mutex<AgentManager>>,
        config: Arc<InstructConfig>,
    ) -> Self {
        Self {
            tool_router: Self::tool_router(),
            store,
            agents,
            config,
        }
    }

    #[tool(description = "Reload the knowledge base from disk and return its status. Call at the start of a conversation.")]
    async fn kb_initialize(&self) -> Result<String, String> {
        tracing::info!("kb_initialize called");
        let status = self
            .with_store("initialize", |store| {
                store.initialize()?;
                Ok(KnowledgeStatus::from_kb(&store.knowledge_base()))
            })
            .await?;
        to_json(&status)
    }

    #[tool(description = "Update personal information (name, birthYear, birthPlace, currentLocation, languages, nationality, timezone, pronouns). Only the fields given are changed.")]
    async fn kb_update_personal(
        &self,
        Parameters(params): Parameters<PersonalInfo>,
    ) -> Result<String, String> {
        let updated = self
            .with_store("update", move |store| store.update_personal(&params))
            .await?;
        Ok(serde_json::json!({ "category": "personal", "updated": updated }).to_string())
    }

    #[tool(description = "Update professional background (occupation, yearsOfExperience, industry, skills, ...). Only the fields given are changed.")]
    async fn kb_update_professional(
        &self,
        Parameters(params): Parameters<ProfessionalInfo>,
    ) -> Result<String, String> {
        let updated = self
            .with_store("update", move |store| store.update_professional(&params))
            .await?;
        Ok(serde_json::json!({ "category": "professional", "updated": updated }).to_string())
    }

    #[tool(description = "Update communication and working preferences. Only the fields given are changed.")]
    async fn kb_update_preferences(
        &self,
        Parameters(params): Parameters<Preferences>,
    ) -> Result<String, String> {
        let updated = self
            .with_store("update", move |store| store.update_preferences(&params))
            .await?;
        Ok(serde_json::json!({ "category": "preferences", "updated": updated }).to_string())
    }

    #[tool(description = "Update current project context (currentProjects, technologies, goals, challenges, teamSize, methodology). Only the fields given are changed.")]
    async fn kb_update_projects(
        &self,
        Parameters(params): Parameters<ProjectContext>,
    ) -> Result<String, String> {
        let updated = self
            .with_store("update", move |store| store.update_projects(&params))
            .await?;
        Ok(serde_json::json!({ "category": "projects", "updated": updated }).to_string())
    }

    #[tool(description = "Store a custom fact under (category, key). An existing key is replaced.")]
    async fn kb_add_custom(
        &self,
        Parameters(params): Parameters<AddCustomParams>,
    ) -> Result<String, String> {
        if params.category.trim().is_empty() || params.key.trim().is_empty() {
            return Err("category and key must not be empty".into());
        }

        tracing::info!(category = %params.category, key = %params.key, "kb_add_custom called");
        let category = params.category.clone();
        let key = params.key.clone();
        let action = self
            .with_store("add custom", move |store| {
                store.add_custom_knowledge(&params.category, &params.key, params.value, params.tags)
            })
            .await?;

        Ok(serde_json::json!({
            "category": category,
            "key": key,
            "action": action.as_str(),
        })
        .to_string())
    }

    #[tool(description = "Remove a custom fact by category and key.")]
    async fn kb_remove_custom(
        &self,
        Parameters(params): Parameters<RemoveCustomParams>,
    ) -> Result<String, String> {
        let category = params.category.clone();
        let key = params.key.clone();
        let removed = self
            .with_store("remove custom", move |store| {
                store.remove_custom_knowledge(&params.category, &params.key)
            })
            .await?;

        Ok(serde_json::json!({
            "category": category,
            "key": key,
            "removed": removed,
        })
        .to_string())
    }

    #[tool(description = "Get the knowledge base: 'full' document, a 'summary', or the set field names per 'categories'.")]
    async fn kb_get_all(
        &self,
        Parameters(params): Parameters<GetAllParams>,
    ) -> Result<String, String> {
        let format = params.format.unwrap_or_else(|| "full".into());
        let doc = self
            .with_store("read", |store| Ok(store.knowledge_base()))
            .await?;

        match format.as_str() {
            "full" => to_json(&doc),
            "summary" => to_json(&KnowledgeSummary::from_kb(&doc)),
            "categories" => to_json(&CategoryIndex::from_kb(&doc)),
            other => Err(format!(
                "unknown format '{other}': expected full, summary, or categories"
            )),
        }
    }

    #[tool(description = "Get personal information.")]
    async fn kb_get_personal(&self) -> Result<String, String> {
        let personal = self.with_store("read", |store| Ok(store.personal())).await?;
        to_json(&personal)
    }

    #[tool(description = "Get professional background.")]
    async fn kb_get_professional(&self) -> Result<String, String> {
        let professional = self
            .with_store("read", |store| Ok(store.professional()))
            .await?;
        to_json(&professional)
    }

    #[tool(description = "Get communication and working preferences.")]
    async fn kb_get_preferences(&self) -> Result<String, String> {
        let preferences = self
            .with_store("read", |store| Ok(store.preferences()))
            .await?;
        to_json(&preferences)
    }

    #[tool(description = "Get current project context.")]
    async fn kb_get_projects(&self) -> Result<String, String> {
        let projects = self.with_store("read", |store| Ok(store.projects())).await?;
        to_json(&projects)
    }

    #[tool(description = "Get custom facts, optionally only those in one category.")]
    async fn kb_get_custom(
        &self,
        Parameters(params): Parameters<GetCustomParams>,
    ) -> Result<String, String> {
        let entries = self
            .with_store("read", move |store| Ok(store.custom(params.category.as_deref())))
            .await?;
        to_json(&entries)
    }

    #[tool(description = "Fuzzy search across all knowledge. Tolerates typos; results ranked by relevance (1.0 = exact).")]
    async fn kb_search(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<String, String> {
        let limit = params.limit.unwrap_or(self.config.search.default_limit);
        tracing::info!(query = %params.query, limit, "kb_search called");

        let query = params.query.clone();
        let mut results = self
            .with_store("search", move |store| Ok(store.search(&params.query)))
            .await?;
        let total = results.len();
        results.truncate(limit);

        Ok(serde_json::json!({
            "query": query,
            "total": total,
            "results": results,
        })
        .to_string())
    }

    #[tool(description = "Get a formatted user-context block to prepend to a system prompt.")]
    async fn kb_get_context(
        &self,
        Parameters(params): Parameters<GetContextParams>,
    ) -> Result<String, String> {
        let categories = params
            .categories
            .unwrap_or_else(|| CONTEXT_CATEGORIES.iter().map(|c| c.to_string()).collect());
        let doc = self
            .with_store("read", |store| Ok(store.knowledge_base()))
            .await?;
        Ok(render_context(&doc, &categories))
    }

    #[tool(description = "Get recent changes to the knowledge base, oldest first.")]
    async fn kb_get_history(
        &self,
        Parameters(params): Parameters<GetHistoryParams>,
    ) -> Result<String, String> {
        let limit = params.limit.unwrap_or(self.config.knowledge.default_history);
        let entries = self
            .with_store("read", move |store| Ok(store.history(limit)))
            .await?;
        to_json(&entries)
    }

    #[tool(description = "Export the whole knowledge base as JSON.")]
    async fn kb_export(&self) -> Result<String, String> {
        self.with_store("export", |store| store.export_document())
            .await
    }

    #[tool(description = "Replace the knowledge base with a previously exported JSON document.")]
    async fn kb_import(
        &self,
        Parameters(params): Parameters<ImportParams>,
    ) -> Result<String, String> {
        let status = self
            .with_store("import", move |store| {
                store.import_document(&params.data)?;
                Ok(KnowledgeStatus::from_kb(&store.knowledge_base()))
            })
            .await?;
        to_json(&status)
    }

    #[tool(description = "List available agent persona templates grouped by category.")]
    async fn agent_list(&self) -> Result<String, String> {
        let agents = self.agents()?;
        if agents.templates().next().is_none() {
            return Ok("No agent templates loaded.".into());
        }
        Ok(agents.formatted_list())
    }

    #[tool(description = "Activate an agent persona by template ID and return its instructions.")]
    async fn agent_activate(
        &self,
        Parameters(params): Parameters<AgentActivateParams>,
    ) -> Result<String, String> {
        let mut agents = self.agents()?;
        if !agents.activate(&params.agent) {
            return Err(format!("agent not found: {}", params.agent));
        }
        agents
            .instructions(&params.agent)
            .ok_or_else(|| format!("agent not found: {}", params.agent))
    }

    #[tool(description = "Switch persona by shorthand: it, hacker, sales, blue, red, purple.")]
    async fn agent_switch_quick(
        &self,
        Parameters(params): Parameters<AgentQuickSwitchParams>,
    ) -> Result<String, String> {
        let mut agents = self.agents()?;
        if !agents.quick_switch(&params.r#type) {
            return Err(format!(
                "no agent for type '{}': expected it, hacker, sales, blue, red, or purple",
                params.r#type
            ));
        }
        let active = agents
            .active()
            .map(|a| a.id.clone())
            .ok_or("no active agent")?;
        agents
            .instructions(&active)
            .ok_or_else(|| format!("agent not found: {active}"))
    }

    #[tool(description = "Get the currently active agent persona.")]
    async fn agent_get_active(&self) -> Result<String, String> {
        let agents = self.agents()?;
        match agents.active().and_then(|a| agents.context(&a.id)) {
            Some(context) => to_json(&context),
            None => Ok(serde_json::json!({ "active": null }).to_string()),
        }
    }

    #[tool(description = "Get the full instructions for an agent persona (defaults to the active one).")]
    async fn agent_instructions(
        &self,
        Parameters(params): Parameters<AgentInstructionsParams>,
    ) -> Result<String, String> {
        let agents = self.agents()?;
        let id = match params.agent {
            Some(id) => id,
            None => agents
                .active()
                .map(|a| a.id.clone())
                .ok_or("no active agent; pass an agent ID")?,
        };
        agents
            .instructions(&id)
            .ok_or_else(|| format!("agent not found: {id}"))
    }

    #[tool(description = "First-run onboarding. Actions: 'start' (welcome), 'check_status', 'quick_setup' (with data: name, role, preferredAgent).")]
    async fn onboard(
        &self,
        Parameters(params): Parameters<OnboardParams>,
    ) -> Result<String, String> {
        tracing::info!(action = %params.action, "onboard called");
        let store = Arc::clone(&self.store);
        let agents = Arc::clone(&self.agents);

        tokio::task::spawn_blocking(move || {
            let mut store = store
                .lock()
                .map_err(|e| format!("store lock poisoned: {e}"))?;
            let mut agents = agents
                .lock()
                .map_err(|e| format!("agents lock poisoned: {e}"))?;

            match params.action.as_str() {
                "start" => Ok(onboarding::welcome(&store, &agents)),
                "check_status" => to_json(&onboarding::status(&store, &agents)),
                "quick_setup" => {
                    let setup = params.data.unwrap_or_default();
                    onboarding::quick_setup(&mut store, &mut agents, &setup)
                        .map_err(|e| format!("setup failed: {e}"))
                }
                other => Err(format!(
                    "unknown action '{other}': expected start, check_status, or quick_setup"
                )),
            }
        })
        .await
        .map_err(|e| format!("onboard task failed: {e}"))?
    }
}

impl InstructTools {
    /// Run `op` against the store on the blocking pool, mapping engine errors
    /// to `"<label> failed: ..."`.
    async fn with_store<T, F>(&self, label: &'static str, op: F) -> Result<T, String>
    where
        F: FnOnce(&mut KnowledgeStore) -> kb::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut store = store
                .lock()
                .map_err(|e| format!("store lock poisoned: {e}"))?;
            op(&mut store).map_err(|e| format!("{label} failed: {e}"))
        })
        .await
        .map_err(|e| format!("{label} task failed: {e}"))?
    }

    fn agents(&self) -> Result<MutexGuard<'_, AgentManager>, String> {
        self.agents
            .lock()
            .map_err(|e| format!("agents lock poisoned: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for InstructTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "MCP Instruct keeps a persistent profile of the user. Call kb_initialize first, \
                 kb_get_context to load what is known, kb_update_* and kb_add_custom to record \
                 new facts, and kb_search to look things up. agent_* tools switch personas."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
