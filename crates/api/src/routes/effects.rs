use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SuggestQuery {
    /// Text typed so far
    pub q: String,

    /// Maximum suggestions, defaults to the configured limit
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<EffectSuggestion>,
}

#[derive(Serialize, Deserialize)]
pub struct EffectSuggestion {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
}

/// Effect name autocomplete for the search form
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestQuery>,
) -> Json<SuggestResponse> {
    let limit = params
        .limit
        .unwrap_or(state.config.suggest_limit)
        .min(state.config.suggest_limit.saturating_mul(5));

    let suggestions = state
        .catalog
        .suggest_effects(&params.q, limit)
        .into_iter()
        .map(|effect| EffectSuggestion {
            id: effect.id.clone(),
            name: effect.name.clone(),
            category: state
                .catalog
                .category(&effect.category_id)
                .map(|c| c.name.clone()),
        })
        .collect();

    Json(SuggestResponse { suggestions })
}
