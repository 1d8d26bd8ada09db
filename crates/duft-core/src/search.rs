use crate::error::{Error, Result};
use crate::model::{QueryTerm, RankedOilResult, MATCHED_EFFECT_DELIMITER};
use crate::store::{AssociationLookup, EffectResolver, OilLookup};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Per-search result set keyed by oil id
///
/// Keeps one entry per oil in the order oils were first matched.
#[derive(Debug, Default)]
pub struct ResultAccumulator {
    results: Vec<RankedOilResult>,
    positions: HashMap<String, usize>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, oil_id: &str) -> Option<&RankedOilResult> {
        self.positions.get(oil_id).map(|&i| &self.results[i])
    }

    /// Merge the partial results of one query term
    ///
    /// A new oil is inserted with a match count of 1. An oil already present
    /// gets the partial score added, its match count incremented and the
    /// term's search text appended after `;@`.
    pub fn merge(&mut self, partials: Vec<RankedOilResult>) {
        for mut partial in partials {
            match self.positions.get(&partial.oil_id).copied() {
                Some(i) => {
                    let existing = &mut self.results[i];
                    existing.raw_score = existing.raw_score.saturating_add(partial.raw_score);
                    existing.match_count += 1;
                    existing
                        .matched_effect_names
                        .push_str(MATCHED_EFFECT_DELIMITER);
                    existing
                        .matched_effect_names
                        .push_str(&partial.matched_effect_names);
                }
                None => {
                    partial.match_count = 1;
                    partial.matched_effect_names = partial.matched_effect_names.trim().to_string();
                    self.positions
                        .insert(partial.oil_id.clone(), self.results.len());
                    self.results.push(partial);
                }
            }
        }
    }

    /// Results in first-matched order
    pub fn into_results(self) -> Vec<RankedOilResult> {
        self.results
    }
}

/// Merge one term's partial results into the accumulator
pub fn merge_into(accumulator: &mut ResultAccumulator, partials: Vec<RankedOilResult>) {
    accumulator.merge(partials);
}

/// Weighted-match search over effects ("Wirkungen")
///
/// Each query term is resolved to an effect, the oils associated with that
/// effect are scored with `effect_degree * severity`, and the term's partial
/// scores are merged into the accumulator before the next term starts.
#[derive(Clone)]
pub struct SearchEngine {
    effects: Arc<dyn EffectResolver>,
    associations: Arc<dyn AssociationLookup>,
    oils: Arc<dyn OilLookup>,
}

impl SearchEngine {
    pub fn new(
        effects: Arc<dyn EffectResolver>,
        associations: Arc<dyn AssociationLookup>,
        oils: Arc<dyn OilLookup>,
    ) -> Self {
        Self {
            effects,
            associations,
            oils,
        }
    }

    /// Use a single store for all lookups
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: EffectResolver + AssociationLookup + OilLookup + 'static,
    {
        Self {
            effects: store.clone(),
            associations: store.clone(),
            oils: store,
        }
    }

    /// Run a search, returning unnormalized results in first-matched order
    ///
    /// Terms are processed one after another. Unknown effects contribute
    /// nothing. Any lookup failure aborts the whole search.
    pub async fn search(&self, terms: &[QueryTerm]) -> Result<Vec<RankedOilResult>> {
        let mut accumulator = ResultAccumulator::new();

        for term in terms {
            if !term.is_usable() {
                debug!(search_text = %term.search_text, severity = term.severity, "Skipping query term");
                continue;
            }

            let partials = self.term_partials(term).await?;
            merge_into(&mut accumulator, partials);
        }

        debug!(
            terms = terms.len(),
            oils = accumulator.len(),
            "Search complete"
        );

        Ok(accumulator.into_results())
    }

    /// Score the oils associated with one term's effect
    async fn term_partials(&self, term: &QueryTerm) -> Result<Vec<RankedOilResult>> {
        let search_text = term.search_text.trim();

        let effect = match self.effects.find_effect_by_name(search_text).await? {
            Some(effect) => effect,
            None => {
                debug!(search_text, "No effect with this name");
                return Ok(Vec::new());
            }
        };

        let associations = self
            .associations
            .find_associations_by_effect(&effect.id)
            .await?;

        let mut partials = Vec::with_capacity(associations.len());
        for association in associations {
            let oil = self
                .oils
                .find_oil_by_id(&association.oil_id)
                .await?
                .ok_or_else(|| Error::OilNotFound(association.oil_id.clone()))?;

            let score = i64::from(association.effect_degree) * i64::from(term.severity);
            partials.push(RankedOilResult::partial(oil, score, search_text));
        }

        debug!(
            search_text,
            effect_id = %effect.id,
            oils = partials.len(),
            "Term resolved"
        );

        Ok(partials)
    }
}
