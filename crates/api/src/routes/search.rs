use crate::search::ranking::{rank, SearchResult};
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use duft_core::model::MAX_SEVERITY;
use duft_core::QueryTerm;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

const UNEXPECTED_ERROR: &str = "An unexpected error occurred, please try again";

#[derive(Deserialize)]
pub struct SearchRequest {
    /// Symptom slots in form order
    pub terms: Vec<QueryTerm>,
}

#[derive(Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub max_possible_score: i64,
    pub query_time_ms: f64,
}

/// Weighted effect search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();

    validate(&request.terms, state.config.max_query_terms)?;

    let results = state.engine.search(&request.terms).await.map_err(|e| {
        error!(error = %e, "Search failed");
        (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR.to_string())
    })?;

    let (results, max_possible_score) = rank(&request.terms, results).map_err(|e| {
        error!(error = %e, "Ranking failed");
        (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR.to_string())
    })?;

    let query_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        terms = request.terms.len(),
        results = results.len(),
        query_time_ms,
        "Search served"
    );

    Ok(Json(SearchResponse {
        results,
        max_possible_score,
        query_time_ms,
    }))
}

fn validate(terms: &[QueryTerm], max_terms: usize) -> Result<(), (StatusCode, String)> {
    if terms.len() > max_terms {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Maximum {} search terms per request", max_terms),
        ));
    }

    if let Some(term) = terms
        .iter()
        .find(|t| !(0..=MAX_SEVERITY).contains(&t.severity))
    {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "Severity for '{}' must be between 0 and {}",
                term.search_text, MAX_SEVERITY
            ),
        ));
    }

    Ok(())
}
