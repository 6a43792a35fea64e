//! Knowledge base document types.
//!
//! A [`KnowledgeBase`] is one profile's whole document: four typed categories
//! ([`PersonalInfo`], [`ProfessionalInfo`], [`Preferences`], [`ProjectContext`]),
//! open-ended [`CustomKnowledge`] entries, and the bounded [`HistoryLedger`].
//! Everything serializes as camelCase JSON; unset fields are omitted, never `null`.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::history::HistoryLedger;

/// Schema version written into new documents.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// A structured knowledge category with a fixed field set.
///
/// Implemented by the four typed categories so mutators and the search
/// flattener can treat them uniformly through their JSON projection.
pub trait Category: Serialize + DeserializeOwned + Default + Clone {
    /// Name used in history entries, search records, and tool output.
    const NAME: &'static str;

    /// Project the set fields into a JSON map (unset fields are absent).
    fn to_fields(&self) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Ok(serde_json::Map::new()),
        }
    }

    /// Rebuild the category from a JSON map.
    fn from_fields(fields: serde_json::Map<String, serde_json::Value>) -> serde_json::Result<Self> {
        serde_json::from_value(serde_json::Value::Object(fields))
    }

    /// Names of the fields currently set.
    fn set_fields(&self) -> Vec<String> {
        self.to_fields()
            .map(|m| m.into_iter().map(|(k, _)| k).collect())
            .unwrap_or_default()
    }

    fn is_empty(&self) -> bool {
        self.set_fields().is_empty()
    }
}

/// Who the user is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PersonalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Full name")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Year of birth")]
    pub birth_year: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Place of birth")]
    pub birth_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Current living location (city, country)")]
    pub current_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Languages spoken")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "IANA timezone, e.g. 'Europe/London'")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pronouns: Option<String>,
}

/// Work background.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfessionalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Job title or occupation")]
    pub occupation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specializations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<String>>,
}

/// How much detail the user wants in answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseDetail {
    Concise,
    Detailed,
    Balanced,
}

/// Self-reported technical expertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TechnicalLevel {
    Beginner,
    Intermediate,
    Expert,
}

/// Communication and working preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "'concise', 'detailed', or 'balanced'")]
    pub response_detail: Option<ResponseDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "'beginner', 'intermediate', or 'expert'")]
    pub technical_level: Option<TechnicalLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_tools: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
}

/// What the user is currently working on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_projects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenges: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Development methodology, e.g. 'scrum'")]
    pub methodology: Option<String>,
}

impl Category for PersonalInfo {
    const NAME: &'static str = "personal";
}

impl Category for ProfessionalInfo {
    const NAME: &'static str = "professional";
}

impl Category for Preferences {
    const NAME: &'static str = "preferences";
}

impl Category for ProjectContext {
    const NAME: &'static str = "projects";
}

/// Caller-assigned weight of a custom entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    Medium,
    High,
}

/// Bookkeeping attached to a custom entry.
///
/// Documents written by older clients may omit it; such entries load with
/// empty timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetadata {
    #[serde(default)]
    pub added_at: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A free-form `(category, key) -> value` fact outside the fixed categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomKnowledge {
    pub category: String,
    pub key: String,
    pub value: serde_json::Value,
    #[serde(default)]
    pub metadata: CustomMetadata,
}

/// One profile's complete knowledge document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBase {
    /// Opaque `kb_<uuid>` identifier, fixed at creation.
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub personal: PersonalInfo,
    #[serde(default)]
    pub professional: ProfessionalInfo,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub projects: ProjectContext,
    #[serde(default)]
    pub custom: Vec<CustomKnowledge>,
    #[serde(default)]
    pub history: HistoryLedger,
    pub created_at: String,
    pub last_updated: String,
}

impl KnowledgeBase {
    /// A fresh document with every category empty.
    pub fn empty() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: format!("kb_{}", uuid::Uuid::now_v7().simple()),
            version: SCHEMA_VERSION.to_string(),
            personal: PersonalInfo::default(),
            professional: ProfessionalInfo::default(),
            preferences: Preferences::default(),
            projects: ProjectContext::default(),
            custom: Vec::new(),
            history: HistoryLedger::default(),
            created_at: now.clone(),
            last_updated: now,
        }
    }

    /// True when no structured field and no custom entry is set. History is ignored.
    pub fn is_new(&self) -> bool {
        self.personal.is_empty()
            && self.professional.is_empty()
            && self.preferences.is_empty()
            && self.projects.is_empty()
            && self.custom.is_empty()
    }

    /// Distinct custom categories in first-seen order.
    pub fn custom_categories(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for entry in &self.custom {
            if !seen.contains(&entry.category) {
                seen.push(entry.category.clone());
            }
        }
        seen
    }
}
