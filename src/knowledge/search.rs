//! Fuzzy search over a flattened projection of the knowledge base.
//!
//! The document is projected into one [`SearchRecord`] per set field and per
//! custom entry, then matched with an approximate substring scorer. The index is
//! derived data: it is rebuilt wholesale after every save and never persisted.

use serde::Serialize;

use super::types::{Category, KnowledgeBase};

/// Default match tolerance: score ceiling for a record to count as a hit.
pub const DEFAULT_THRESHOLD: f64 = 0.3;
/// Default number of characters over which a late match start costs a full point.
pub const DEFAULT_DISTANCE: usize = 100;

/// Category name used for custom entries in search records.
pub const CUSTOM_CATEGORY: &str = "custom";

/// Tunables for [`ApproximateMatcher`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    pub threshold: f64,
    pub distance: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            distance: DEFAULT_DISTANCE,
        }
    }
}

/// One searchable row derived from the document.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRecord {
    /// Structured category name, or [`CUSTOM_CATEGORY`].
    pub category: String,
    /// Field name, or the custom entry's key.
    pub field: String,
    pub value: serde_json::Value,
    pub tags: Vec<String>,
    /// The custom entry's own category; `None` for structured fields.
    pub custom_category: Option<String>,
}

impl SearchRecord {
    /// Every string the matcher looks at: category, field, value, and tags.
    fn keys(&self) -> Vec<String> {
        let mut keys = vec![self.category.clone(), self.field.clone()];
        keys.extend(value_strings(&self.value));
        keys.extend(self.tags.iter().cloned());
        keys
    }

    fn context(&self) -> String {
        match &self.custom_category {
            Some(category) => format!("Custom knowledge in category: {category}"),
            None => describe_field(&self.category, &self.field),
        }
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub category: String,
    pub field: String,
    pub value: serde_json::Value,
    /// `1 - score`, in `[0, 1]`; higher is better.
    pub relevance: f64,
    pub context: String,
}

/// Pluggable approximate string scorer.
///
/// Returns `Some(score)` when `text` matches `pattern` within tolerance, where
/// `0.0` is a perfect match and larger is worse. Inputs arrive lowercased.
pub trait TextMatcher: Send + Sync {
    fn score(&self, pattern: &str, text: &str) -> Option<f64>;
}

/// Approximate substring matcher in the Bitap style.
///
/// Finds the substring of `text` with the fewest edits to `pattern` and scores it
/// as `edits / pattern_len + match_start / distance`, so typos and late matches
/// both cost relevance.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateMatcher {
    settings: SearchSettings,
}

impl ApproximateMatcher {
    pub fn new(settings: SearchSettings) -> Self {
        Self { settings }
    }

    fn location_penalty(&self, start: usize) -> f64 {
        if self.settings.distance == 0 {
            return if start == 0 { 0.0 } else { 1.0 };
        }
        start as f64 / self.settings.distance as f64
    }
}

impl Default for ApproximateMatcher {
    fn default() -> Self {
        Self::new(SearchSettings::default())
    }
}

impl TextMatcher for ApproximateMatcher {
    fn score(&self, pattern: &str, text: &str) -> Option<f64> {
        let pattern: Vec<char> = pattern.chars().collect();
        let text: Vec<char> = text.chars().collect();
        if pattern.is_empty() {
            return None;
        }

        let m = pattern.len() as f64;
        let best = best_alignments(&pattern, &text)
            .into_iter()
            .map(|(edits, start)| edits as f64 / m + self.location_penalty(start))
            .fold(f64::INFINITY, f64::min);

        (best <= self.settings.threshold).then_some(best)
    }
}

/// Sellers' approximate substring alignment.
///
/// For every end position in `text`, returns `(edits, start)` of the cheapest
/// alignment of the whole `pattern` ending there, preferring earlier starts on ties.
fn best_alignments(pattern: &[char], text: &[char]) -> Vec<(usize, usize)> {
    let n = text.len();
    // Row 0: a match may begin anywhere at no cost.
    let mut prev: Vec<(usize, usize)> = (0..=n).map(|j| (0, j)).collect();
    let mut cur = vec![(0usize, 0usize); n + 1];

    for (i, &pc) in pattern.iter().enumerate() {
        cur[0] = (i + 1, 0);
        for j in 1..=n {
            let substitution = usize::from(pc != text[j - 1]);
            let diag = (prev[j - 1].0 + substitution, prev[j - 1].1);
            let skip_pattern = (prev[j].0 + 1, prev[j].1);
            let skip_text = (cur[j - 1].0 + 1, cur[j - 1].1);
            cur[j] = diag.min(skip_pattern).min(skip_text);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev
}

/// Flat strings for a value: each element of an array, the raw text of a
/// string, JSON text for everything else.
fn value_strings(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Null => Vec::new(),
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Array(items) => items.iter().flat_map(value_strings).collect(),
        other => vec![other.to_string()],
    }
}

/// Project the document into search records. Unset fields produce no record.
pub fn flatten(kb: &KnowledgeBase) -> Vec<SearchRecord> {
    let mut records = Vec::new();
    push_category(&mut records, &kb.personal);
    push_category(&mut records, &kb.professional);
    push_category(&mut records, &kb.preferences);
    push_category(&mut records, &kb.projects);

    for entry in &kb.custom {
        records.push(SearchRecord {
            category: CUSTOM_CATEGORY.to_string(),
            field: entry.key.clone(),
            value: entry.value.clone(),
            tags: entry.metadata.tags.clone().unwrap_or_default(),
            custom_category: Some(entry.category.clone()),
        });
    }

    records
}

fn push_category<C: Category>(records: &mut Vec<SearchRecord>, category: &C) {
    let Ok(fields) = category.to_fields() else {
        return;
    };
    for (field, value) in fields {
        if value.is_null() {
            continue;
        }
        records.push(SearchRecord {
            category: C::NAME.to_string(),
            field,
            value,
            tags: Vec::new(),
            custom_category: None,
        });
    }
}

/// Built index: the flattened records plus the matcher used to query them.
pub struct SearchIndex<M = ApproximateMatcher> {
    records: Vec<SearchRecord>,
    matcher: M,
}

impl<M: TextMatcher> SearchIndex<M> {
    pub fn build(records: Vec<SearchRecord>, matcher: M) -> Self {
        Self { records, matcher }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ranked hits for `query`, best first. A blank query matches nothing.
    pub fn query(&self, query: &str) -> Vec<SearchResult> {
        let pattern = query.trim().to_lowercase();
        if pattern.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(&SearchRecord, f64)> = self
            .records
            .iter()
            .filter_map(|record| {
                record
                    .keys()
                    .iter()
                    .filter_map(|key| self.matcher.score(&pattern, &key.to_lowercase()))
                    .min_by(f64::total_cmp)
                    .map(|score| (record, score))
            })
            .collect();

        // Stable sort keeps document order among equal scores.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        scored
            .into_iter()
            .map(|(record, score)| SearchResult {
                category: record.category.clone(),
                field: record.field.clone(),
                value: record.value.clone(),
                relevance: (1.0 - score).clamp(0.0, 1.0),
                context: record.context(),
            })
            .collect()
    }
}

/// Human-readable description of a structured field.
pub fn describe_field(category: &str, field: &str) -> String {
    let description = match (category, field) {
        ("personal", "name") => "The person's full name",
        ("personal", "birthYear") => "Year of birth",
        ("personal", "birthPlace") => "Place of birth",
        ("personal", "currentLocation") => "Current living location",
        ("personal", "languages") => "Languages spoken",
        ("personal", "nationality") => "Nationality",
        ("personal", "timezone") => "Current timezone",
        ("personal", "pronouns") => "Preferred pronouns",
        ("professional", "occupation") => "Current job title or occupation",
        ("professional", "yearsOfExperience") => "Years of professional experience",
        ("professional", "industry") => "Industry or sector",
        ("professional", "specializations") => "Areas of specialization",
        ("professional", "currentCompany") => "Current employer",
        ("professional", "role") => "Current role",
        ("professional", "skills") => "Technical and professional skills",
        ("professional", "certifications") => "Professional certifications",
        ("professional", "education") => "Educational background",
        ("preferences", "communicationStyle") => "Preferred communication style",
        ("preferences", "learningStyle") => "How they prefer to learn",
        ("preferences", "workingHours") => "Typical working hours",
        ("preferences", "responseDetail") => "Level of detail in responses",
        ("preferences", "technicalLevel") => "Technical expertise level",
        ("preferences", "favoriteTools") => "Preferred tools and software",
        ("preferences", "interests") => "Personal interests and hobbies",
        ("projects", "currentProjects") => "Active projects",
        ("projects", "technologies") => "Technologies being used",
        ("projects", "goals") => "Current goals and objectives",
        ("projects", "challenges") => "Current challenges",
        ("projects", "teamSize") => "Size of the team",
        ("projects", "methodology") => "Development methodology",
        _ => return format!("{category} information"),
    };
    description.to_string()
}
