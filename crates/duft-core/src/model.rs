use serde::{Deserialize, Serialize};

/// Highest effect degree ("Wirksamkeit") an oil can have for an effect
pub const MAX_EFFECT_DEGREE: i32 = 4;

/// Highest discomfort value ("Beschwerdeausmass") the search form offers
pub const MAX_SEVERITY: i32 = 4;

/// Separator between matched effect names, consumed by the client-side highlighting
pub const MATCHED_EFFECT_DELIMITER: &str = ";@";

/// One symptom slot of a search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTerm {
    /// Effect name as typed or picked from the autocomplete
    pub search_text: String,

    /// Discomfort value ("Beschwerdeausmass"), usually 0-4
    pub severity: i32,
}

impl QueryTerm {
    pub fn new(search_text: impl Into<String>, severity: i32) -> Self {
        Self {
            search_text: search_text.into(),
            severity,
        }
    }

    /// Terms without text or without a positive severity take no part in a search
    pub fn is_usable(&self) -> bool {
        !self.search_text.trim().is_empty() && self.severity > 0
    }
}

/// Effect ("Wirkung")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub id: String,
    pub name: String,
    pub category_id: String,
}

/// Effect category ("Kategorie")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Essential oil ("Ätherisches Öl") display record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssentialOil {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub latin_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Edge between an effect and an oil
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationRecord {
    pub oil_id: String,
    pub effect_id: String,

    /// 0-4
    pub effect_degree: i32,
}

/// Per-oil accumulator of one search invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedOilResult {
    pub oil_id: String,
    pub oil: EssentialOil,

    /// Sum of effect_degree * severity over all matched terms
    pub raw_score: i64,

    /// Number of query terms this oil matched
    pub match_count: u32,

    /// Matched search texts joined with `;@`
    pub matched_effect_names: String,

    /// 0-100, zero until the result set is normalized
    pub weighted_match_value: i32,
}

impl RankedOilResult {
    /// Partial contribution of one association to one query term
    pub fn partial(oil: EssentialOil, raw_score: i64, search_text: impl Into<String>) -> Self {
        Self {
            oil_id: oil.id.clone(),
            oil,
            raw_score,
            match_count: 0,
            matched_effect_names: search_text.into(),
            weighted_match_value: 0,
        }
    }

    /// Split `matched_effect_names` back into the individual search texts
    pub fn matched_effects(&self) -> Vec<&str> {
        if self.matched_effect_names.is_empty() {
            return Vec::new();
        }
        self.matched_effect_names
            .split(MATCHED_EFFECT_DELIMITER)
            .collect()
    }
}
