//! Agent persona templates.
//!
//! Personas are markdown files in an agents directory (`<id>.md`). Role,
//! expertise, and category are scraped from the markdown; the persona content
//! itself is handed to the client verbatim as instructions. [`AgentManager`]
//! also carries the session's active persona.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Metadata extracted from a template's markdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expertise: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A loaded persona template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentTemplate {
    /// File stem, e.g. `it-expert`.
    pub id: String,
    /// Display name, e.g. `It Expert`.
    pub name: String,
    pub content: String,
    pub metadata: AgentMetadata,
}

impl AgentTemplate {
    pub fn from_markdown(id: &str, content: String) -> Self {
        Self {
            id: id.to_string(),
            name: display_name(id),
            metadata: extract_metadata(&content),
            content,
        }
    }
}

/// Compact description of a template for listings.
#[derive(Debug, Clone, Serialize)]
pub struct AgentContext {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub expertise: Vec<String>,
    pub active: bool,
}

/// Shorthand persona kinds accepted by [`AgentManager::quick_switch`].
pub const QUICK_SWITCH: [(&str, &str); 6] = [
    ("it", "it-expert"),
    ("hacker", "ethical-hacker"),
    ("sales", "sales-expert"),
    ("blue", "blue-team"),
    ("red", "red-team"),
    ("purple", "purple-team"),
];

/// Content markers mapped to categories; first match wins.
const CATEGORY_MARKERS: [(&[&str], &str); 6] = [
    (&["Blue Team"], "Cybersecurity - Defensive"),
    (&["Red Team"], "Cybersecurity - Offensive"),
    (&["Purple Team"], "Cybersecurity - Collaborative"),
    (&["IT Expert", "IT Professional"], "Technology"),
    (&["Sales"], "Business"),
    (&["Ethical Hacker"], "Cybersecurity"),
];

/// `it-expert` -> `It Expert`.
fn display_name(id: &str) -> String {
    id.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text following `heading` up to the first `terminator` (or end of content).
fn section<'a>(content: &'a str, heading: &str, terminator: &str) -> Option<&'a str> {
    let start = content.find(heading)? + heading.len();
    let rest = &content[start..];
    let end = rest.find(terminator).unwrap_or(rest.len());
    Some(&rest[..end])
}

fn extract_metadata(content: &str) -> AgentMetadata {
    let role = section(content, "## Role\n", "\n\n")
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    let expertise = section(content, "## Core Expertise\n", "\n##")
        .map(|body| {
            body.lines()
                .map(str::trim)
                .filter_map(|line| line.strip_prefix('-'))
                .map(|item| item.trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let category = CATEGORY_MARKERS
        .iter()
        .find(|(markers, _)| markers.iter().any(|m| content.contains(m)))
        .map(|(_, category)| category.to_string());

    AgentMetadata {
        role,
        expertise,
        category,
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Persona catalog plus the session's active selection.
#[derive(Debug, Default)]
pub struct AgentManager {
    agents_dir: PathBuf,
    templates: BTreeMap<String, AgentTemplate>,
    active: Option<String>,
}

impl AgentManager {
    pub fn new(agents_dir: impl AsRef<Path>) -> Self {
        Self {
            agents_dir: agents_dir.as_ref().to_path_buf(),
            templates: BTreeMap::new(),
            active: None,
        }
    }

    /// Read every `*.md` file in the agents directory. Returns the template count.
    pub fn load(&mut self) -> Result<usize> {
        if !self.agents_dir.is_dir() {
            bail!("agents directory not found: {}", self.agents_dir.display());
        }

        let entries = std::fs::read_dir(&self.agents_dir).with_context(|| {
            format!("failed to read agents directory {}", self.agents_dir.display())
        })?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read template {}", path.display()))?;
            self.templates
                .insert(id.to_string(), AgentTemplate::from_markdown(id, content));
        }

        tracing::info!(
            dir = %self.agents_dir.display(),
            count = self.templates.len(),
            "agent templates loaded"
        );
        Ok(self.templates.len())
    }

    /// Drop all templates and read the directory again. The active selection is
    /// kept only if that template still exists.
    pub fn reload(&mut self) -> Result<usize> {
        self.templates.clear();
        let count = self.load()?;
        if let Some(id) = &self.active {
            if !self.templates.contains_key(id) {
                self.active = None;
            }
        }
        Ok(count)
    }

    /// Register a template directly, bypassing the filesystem.
    pub fn insert(&mut self, template: AgentTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn templates(&self) -> impl Iterator<Item = &AgentTemplate> {
        self.templates.values()
    }

    pub fn template(&self, id: &str) -> Option<&AgentTemplate> {
        self.templates.get(id)
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a AgentTemplate> {
        self.templates
            .values()
            .filter(move |t| t.metadata.category.as_deref() == Some(category))
    }

    /// Distinct categories across all templates.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for category in self.templates.values().filter_map(|t| t.metadata.category.as_ref()) {
            if !categories.contains(category) {
                categories.push(category.clone());
            }
        }
        categories
    }

    /// Make `id` the active persona. Returns `false` if there is no such template.
    pub fn activate(&mut self, id: &str) -> bool {
        if self.templates.contains_key(id) {
            self.active = Some(id.to_string());
            tracing::info!(agent = %id, "agent activated");
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<&AgentTemplate> {
        self.active.as_deref().and_then(|id| self.templates.get(id))
    }

    /// Activate a persona by shorthand kind (`it`, `hacker`, `sales`, `blue`, `red`, `purple`).
    pub fn quick_switch(&mut self, kind: &str) -> bool {
        QUICK_SWITCH
            .iter()
            .find(|(k, _)| *k == kind)
            .is_some_and(|(_, id)| self.activate(id))
    }

    /// Template content framed as instructions for the model.
    pub fn instructions(&self, id: &str) -> Option<String> {
        self.templates
            .get(id)
            .map(|t| format!("# AI AGENT INSTRUCTIONS - {}\n\n{}", t.name, t.content))
    }

    pub fn context(&self, id: &str) -> Option<AgentContext> {
        let template = self.templates.get(id)?;
        Some(AgentContext {
            id: template.id.clone(),
            name: template.name.clone(),
            role: template.metadata.role.clone(),
            category: template.metadata.category.clone(),
            expertise: template.metadata.expertise.iter().take(5).cloned().collect(),
            active: self.active.as_deref() == Some(id),
        })
    }

    /// Markdown listing grouped by category, marking the active persona.
    pub fn formatted_list(&self) -> String {
        let mut out = String::from("# Available AI Agent Templates\n\n");
        for category in self.categories() {
            out.push_str(&format!("## {category}\n"));
            for template in self.by_category(&category) {
                let marker = if self.active.as_deref() == Some(template.id.as_str()) {
                    " ✓ [ACTIVE]"
                } else {
                    ""
                };
                out.push_str(&format!("- **{}** ({}){marker}\n", template.name, template.id));
                if let Some(role) = &template.metadata.role {
                    out.push_str(&format!("  {}...\n", truncate_chars(role, 100)));
                }
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BLUE_TEAM: &str = "# Blue Team Defender\n\n## Role\nDefensive security analyst.\nWatches the SOC.\n\n## Core Expertise\n- Incident response\n- Threat hunting\n  - SIEM tuning\n\n## Style\nCalm.\n";

    #[test]
    fn display_name_capitalizes_words() {
        assert_eq!(display_name("it-expert"), "It Expert");
        assert_eq!(display_name("blue-team"), "Blue Team");
    }

    #[test]
    fn metadata_is_extracted() {
        let meta = extract_metadata(BLUE_TEAM);
        assert_eq!(
            meta.role.as_deref(),
            Some("Defensive security analyst.\nWatches the SOC.")
        );
        assert_eq!(
            meta.expertise,
            vec!["Incident response", "Threat hunting", "SIEM tuning"]
        );
        assert_eq!(meta.category.as_deref(), Some("Cybersecurity - Defensive"));
    }

    #[test]
    fn missing_sections_yield_empty_metadata() {
        let meta = extract_metadata("# Plain\n\nNothing here.");
        assert_eq!(meta, AgentMetadata::default());
    }

    #[test]
    fn load_reads_markdown_only() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("blue-team.md"), BLUE_TEAM).unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let mut manager = AgentManager::new(tmp.path());
        assert_eq!(manager.load().unwrap(), 1);
        assert_eq!(manager.template("blue-team").unwrap().name, "Blue Team");
    }

    #[test]
    fn load_fails_without_directory() {
        let tmp = TempDir::new().unwrap();
        let mut manager = AgentManager::new(tmp.path().join("missing"));
        assert!(manager.load().is_err());
    }

    #[test]
    fn activation_and_quick_switch() {
        let mut manager = AgentManager::default();
        manager.insert(AgentTemplate::from_markdown("blue-team", BLUE_TEAM.into()));
        manager.insert(AgentTemplate::from_markdown(
            "sales-expert",
            "## Role\nSales lead.\n".into(),
        ));

        assert!(!manager.activate("nobody"));
        assert!(manager.active().is_none());

        assert!(manager.quick_switch("blue"));
        assert_eq!(manager.active().unwrap().id, "blue-team");
        assert!(manager.context("blue-team").unwrap().active);

        // known kind, but no template loaded for it
        assert!(!manager.quick_switch("red"));
        assert!(!manager.quick_switch("wizard"));
        assert_eq!(manager.active().unwrap().id, "blue-team");
    }

    #[test]
    fn formatted_list_marks_active() {
        let mut manager = AgentManager::default();
        manager.insert(AgentTemplate::from_markdown("blue-team", BLUE_TEAM.into()));
        manager.activate("blue-team");

        let list = manager.formatted_list();
        assert!(list.contains("## Cybersecurity - Defensive\n"));
        assert!(list.contains("- **Blue Team** (blue-team) ✓ [ACTIVE]\n"));
    }

    #[test]
    fn instructions_are_framed() {
        let mut manager = AgentManager::default();
        manager.insert(AgentTemplate::from_markdown("blue-team", BLUE_TEAM.into()));
        let text = manager.instructions("blue-team").unwrap();
        assert!(text.starts_with("# AI AGENT INSTRUCTIONS - Blue Team\n\n# Blue Team Defender"));
        assert!(manager.instructions("missing").is_none());
    }
}
