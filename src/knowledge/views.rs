//! Read-only projections of a knowledge base for clients.
//!
//! [`KnowledgeSummary`], [`CategoryIndex`], and [`KnowledgeStatus`] are JSON views;
//! [`render_context`] produces the plain-text block an assistant prepends to its
//! system prompt.

use serde::Serialize;

use super::types::{
    Category, KnowledgeBase, PersonalInfo, Preferences, ProfessionalInfo, ProjectContext,
    TechnicalLevel,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalSummary {
    pub name: Option<String>,
    pub location: Option<String>,
    pub languages: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalSummary {
    pub occupation: Option<String>,
    pub experience: Option<f64>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesSummary {
    pub communication_style: Option<String>,
    pub technical_level: Option<TechnicalLevel>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsSummary {
    pub current: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
}

/// The handful of fields most useful at a glance.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSummary {
    pub personal: PersonalSummary,
    pub professional: ProfessionalSummary,
    pub preferences: PreferencesSummary,
    pub projects: ProjectsSummary,
    pub custom_categories: Vec<String>,
}

impl KnowledgeSummary {
    pub fn from_kb(kb: &KnowledgeBase) -> Self {
        Self {
            personal: PersonalSummary {
                name: kb.personal.name.clone(),
                location: kb.personal.current_location.clone(),
                languages: kb.personal.languages.clone(),
            },
            professional: ProfessionalSummary {
                occupation: kb.professional.occupation.clone(),
                experience: kb.professional.years_of_experience,
                skills: kb.professional.skills.clone(),
            },
            preferences: PreferencesSummary {
                communication_style: kb.preferences.communication_style.clone(),
                technical_level: kb.preferences.technical_level,
            },
            projects: ProjectsSummary {
                current: kb.projects.current_projects.clone(),
                technologies: kb.projects.technologies.clone(),
            },
            custom_categories: kb.custom_categories(),
        }
    }
}

/// Which fields are set in each category.
#[derive(Debug, Serialize)]
pub struct CategoryIndex {
    pub personal: Vec<String>,
    pub professional: Vec<String>,
    pub preferences: Vec<String>,
    pub projects: Vec<String>,
    pub custom: Vec<String>,
}

impl CategoryIndex {
    pub fn from_kb(kb: &KnowledgeBase) -> Self {
        Self {
            personal: kb.personal.set_fields(),
            professional: kb.professional.set_fields(),
            preferences: kb.preferences.set_fields(),
            projects: kb.projects.set_fields(),
            custom: kb.custom_categories(),
        }
    }
}

/// Profile overview returned when a client connects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeStatus {
    pub id: String,
    pub created_at: String,
    pub last_updated: String,
    pub is_new: bool,
    pub has_personal: bool,
    pub has_professional: bool,
    pub has_preferences: bool,
    pub has_projects: bool,
    pub custom_categories: Vec<String>,
}

impl KnowledgeStatus {
    pub fn from_kb(kb: &KnowledgeBase) -> Self {
        Self {
            id: kb.id.clone(),
            created_at: kb.created_at.clone(),
            last_updated: kb.last_updated.clone(),
            is_new: kb.is_new(),
            has_personal: !kb.personal.is_empty(),
            has_professional: !kb.professional.is_empty(),
            has_preferences: !kb.preferences.is_empty(),
            has_projects: !kb.projects.is_empty(),
            custom_categories: kb.custom_categories(),
        }
    }
}

/// Default category set for [`render_context`].
pub const CONTEXT_CATEGORIES: [&str; 4] = [
    PersonalInfo::NAME,
    ProfessionalInfo::NAME,
    Preferences::NAME,
    ProjectContext::NAME,
];

fn push_line(out: &mut String, label: &str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        out.push_str(&format!("- {label}: {value}\n"));
    }
}

fn joined(list: &Option<Vec<String>>) -> Option<String> {
    list.as_ref().map(|items| items.join(", "))
}

/// Render the requested categories as a `=== USER CONTEXT ===` block.
///
/// Empty categories are skipped entirely.
pub fn render_context(kb: &KnowledgeBase, categories: &[String]) -> String {
    let wants = |name: &str| categories.iter().any(|c| c == name);
    let mut out = String::from("=== USER CONTEXT ===\n\n");

    let p = &kb.personal;
    if wants(PersonalInfo::NAME) && !p.is_empty() {
        out.push_str("**Personal Information:**\n");
        push_line(&mut out, "Name", p.name.clone());
        push_line(&mut out, "Location", p.current_location.clone());
        push_line(&mut out, "Languages", joined(&p.languages));
        push_line(&mut out, "Birth Year", p.birth_year.map(|y| y.to_string()));
        push_line(&mut out, "Pronouns", p.pronouns.clone());
        out.push('\n');
    }

    let w = &kb.professional;
    if wants(ProfessionalInfo::NAME) && !w.is_empty() {
        out.push_str("**Professional Background:**\n");
        push_line(&mut out, "Occupation", w.occupation.clone());
        push_line(
            &mut out,
            "Experience",
            w.years_of_experience.map(|y| format!("{y} years")),
        );
        push_line(&mut out, "Industry", w.industry.clone());
        push_line(&mut out, "Skills", joined(&w.skills));
        push_line(&mut out, "Specializations", joined(&w.specializations));
        out.push('\n');
    }

    let pr = &kb.preferences;
    if wants(Preferences::NAME) && !pr.is_empty() {
        out.push_str("**Communication Preferences:**\n");
        push_line(&mut out, "Style", pr.communication_style.clone());
        push_line(
            &mut out,
            "Response Detail",
            pr.response_detail.and_then(|d| serde_plain(&d)),
        );
        push_line(
            &mut out,
            "Technical Level",
            pr.technical_level.and_then(|l| serde_plain(&l)),
        );
        push_line(&mut out, "Favorite Tools", joined(&pr.favorite_tools));
        out.push('\n');
    }

    let pj = &kb.projects;
    if wants(ProjectContext::NAME) && !pj.is_empty() {
        out.push_str("**Current Projects:**\n");
        push_line(&mut out, "Projects", joined(&pj.current_projects));
        push_line(&mut out, "Technologies", joined(&pj.technologies));
        push_line(&mut out, "Goals", joined(&pj.goals));
        out.push('\n');
    }

    out.push_str("=== END CONTEXT ===");
    out
}

/// Serialized string form of a unit enum (`TechnicalLevel::Expert` -> `expert`).
fn serde_plain<T: Serialize>(value: &T) -> Option<String> {
    match serde_json::to_value(value).ok()? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    }
}
