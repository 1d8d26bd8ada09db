use duft_core::ranking::{max_possible_raw_score, normalize_all, sort_for_display};
use duft_core::{QueryTerm, RankedOilResult};
use serde::{Deserialize, Serialize};

/// One oil in the search response
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchResult {
    pub oil_id: String,
    pub name: String,
    pub latin_name: String,
    pub raw_score: i64,
    pub match_count: u32,
    /// `;@`-separated, split by the client to highlight matched effects
    pub matched_effect_names: String,
    pub weighted_match_value: i32,
}

impl From<RankedOilResult> for SearchResult {
    fn from(result: RankedOilResult) -> Self {
        Self {
            oil_id: result.oil_id,
            name: result.oil.name,
            latin_name: result.oil.latin_name,
            raw_score: result.raw_score,
            match_count: result.match_count,
            matched_effect_names: result.matched_effect_names,
            weighted_match_value: result.weighted_match_value,
        }
    }
}

/// Normalize engine results against the query's best possible score and order them for display
///
/// Returns the ranked results and the maximum possible raw score. A query
/// without usable terms yields no results and is never normalized.
pub fn rank(
    terms: &[QueryTerm],
    mut results: Vec<RankedOilResult>,
) -> duft_core::Result<(Vec<SearchResult>, i64)> {
    let max_possible = max_possible_raw_score(terms);
    if max_possible == 0 {
        return Ok((Vec::new(), 0));
    }

    normalize_all(&mut results, max_possible)?;
    sort_for_display(&mut results);

    Ok((results.into_iter().map(SearchResult::from).collect(), max_possible))
}
