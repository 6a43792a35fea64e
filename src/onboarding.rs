//! First-run onboarding: welcome text, status probe, and one-shot profile setup.

use serde::{Deserialize, Serialize};

use crate::knowledge::types::{PersonalInfo, ProfessionalInfo};
use crate::knowledge::{KnowledgeStore, Result};
use crate::persona::AgentManager;

/// Whole-word role keywords that pick a persona during quick setup, checked in order.
const ROLE_PERSONAS: [(&str, &str); 3] = [
    ("it", "it-expert"),
    ("security", "ethical-hacker"),
    ("sales", "sales-expert"),
];

/// Input for [`quick_setup`].
#[derive(Debug, Clone, Default, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuickSetup {
    #[schemars(description = "The user's name")]
    pub name: Option<String>,
    #[schemars(description = "The user's role or occupation")]
    pub role: Option<String>,
    #[schemars(description = "Agent template ID to activate, e.g. 'it-expert'")]
    pub preferred_agent: Option<String>,
}

/// Snapshot returned by the `check_status` action.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub is_new: bool,
    pub name: Option<String>,
    pub role: Option<String>,
    pub active_agent: Option<String>,
}

/// Greeting for a new profile, or a short recap for a returning one.
pub fn welcome(store: &KnowledgeStore, agents: &AgentManager) -> String {
    if store.is_new() {
        return "Welcome to MCP Instruct!\n\n\
                I'll help you set up your personal knowledge base and AI agent.\n\n\
                Tell me:\n\
                1. Your name\n\
                2. Your role/occupation\n\
                3. Preferred agent mode (IT, Security, Sales, etc.)\n\n\
                Or run onboarding with action=\"quick_setup\"."
            .to_string();
    }

    let kb = store.knowledge_base();
    format!(
        "Welcome back, {}!\n\nProfile: {}\nActive Agent: {}\n\n\
         You can switch agents or update your profile anytime.",
        kb.personal.name.as_deref().unwrap_or("User"),
        kb.professional.occupation.as_deref().unwrap_or("Not set"),
        agents.active().map(|a| a.name.as_str()).unwrap_or("None"),
    )
}

pub fn status(store: &KnowledgeStore, agents: &AgentManager) -> OnboardingStatus {
    let kb = store.knowledge_base();
    OnboardingStatus {
        is_new: kb.is_new(),
        name: kb.personal.name,
        role: kb.professional.occupation,
        active_agent: agents.active().map(|a| a.name.clone()),
    }
}

/// Store name and role, then pick a persona.
///
/// The role's keywords select a default persona; an explicit
/// `preferred_agent` overrides it when that template exists.
pub fn quick_setup(
    store: &mut KnowledgeStore,
    agents: &mut AgentManager,
    setup: &QuickSetup,
) -> Result<String> {
    if let Some(name) = &setup.name {
        store.update_personal(&PersonalInfo {
            name: Some(name.clone()),
            ..Default::default()
        })?;
    }

    if let Some(role) = &setup.role {
        store.update_professional(&ProfessionalInfo {
            occupation: Some(role.clone()),
            ..Default::default()
        })?;

        let role_lower = role.to_lowercase();
        let words: Vec<&str> = role_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        if let Some((_, agent)) = ROLE_PERSONAS
            .iter()
            .find(|(keyword, _)| words.contains(keyword))
        {
            agents.activate(agent);
        }
    }

    if let Some(agent) = &setup.preferred_agent {
        if !agents.activate(agent) {
            tracing::warn!(agent = %agent, "preferred agent not found");
        }
    }

    Ok(format!(
        "Setup complete!\n\nProfile: {} - {}\nActive Agent: {}\n\n\
         Your profile is saved and will persist across sessions.",
        setup.name.as_deref().unwrap_or("(unchanged)"),
        setup.role.as_deref().unwrap_or("(unchanged)"),
        agents.active().map(|a| a.name.as_str()).unwrap_or("None"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::StoreSettings;
    use crate::persona::AgentTemplate;
    use tempfile::TempDir;

    fn agents() -> AgentManager {
        let mut agents = AgentManager::default();
        for id in ["it-expert", "ethical-hacker", "sales-expert"] {
            agents.insert(AgentTemplate::from_markdown(id, format!("# {id}\n")));
        }
        agents
    }

    #[test]
    fn welcome_differs_for_new_and_returning() {
        let tmp = TempDir::new().unwrap();
        let mut store = KnowledgeStore::open(tmp.path(), "default", StoreSettings::default()).unwrap();
        let agents = agents();
        assert!(welcome(&store, &agents).starts_with("Welcome to MCP Instruct!"));

        store
            .update_personal(&PersonalInfo {
                name: Some("Ada".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(welcome(&store, &agents).starts_with("Welcome back, Ada!"));
    }

    #[test]
    fn quick_setup_selects_persona_from_role() {
        let tmp = TempDir::new().unwrap();
        let mut store = KnowledgeStore::open(tmp.path(), "default", StoreSettings::default()).unwrap();
        let mut agents = agents();

        let setup = QuickSetup {
            name: Some("Ada".into()),
            role: Some("Security Engineer".into()),
            preferred_agent: None,
        };
        quick_setup(&mut store, &mut agents, &setup).unwrap();

        assert_eq!(agents.active().unwrap().id, "ethical-hacker");
        let status = status(&store, &agents);
        assert!(!status.is_new);
        assert_eq!(status.name.as_deref(), Some("Ada"));
        assert_eq!(status.role.as_deref(), Some("Security Engineer"));
    }

    #[test]
    fn preferred_agent_overrides_role() {
        let tmp = TempDir::new().unwrap();
        let mut store = KnowledgeStore::open(tmp.path(), "default", StoreSettings::default()).unwrap();
        let mut agents = agents();

        let setup = QuickSetup {
            name: None,
            role: Some("Sales Director".into()),
            preferred_agent: Some("it-expert".into()),
        };
        let text = quick_setup(&mut store, &mut agents, &setup).unwrap();
        assert_eq!(agents.active().unwrap().id, "it-expert");
        assert!(text.contains("Active Agent: It Expert"));
    }
}
