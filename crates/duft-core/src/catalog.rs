use crate::error::{Error, Result};
use crate::model::{AssociationRecord, Category, EffectRecord, EssentialOil, MAX_EFFECT_DEGREE};
use crate::store::{AssociationLookup, EffectResolver, OilLookup};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

/// On-disk catalog document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub effects: Vec<EffectRecord>,
    #[serde(default)]
    pub oils: Vec<EssentialOil>,
    #[serde(default)]
    pub associations: Vec<AssociationRecord>,
}

/// Counts reported by `duftfinder-catalog stats` and `/health`
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub categories: usize,
    pub effects: usize,
    pub oils: usize,
    pub associations: usize,
    /// (category name, number of effects), sorted by category name
    pub effects_per_category: Vec<(String, usize)>,
}

/// Read-only, validated in-memory catalog serving all storage lookups
#[derive(Debug, Clone)]
pub struct Catalog {
    data: CatalogData,
    categories_by_id: HashMap<String, usize>,
    oils_by_id: HashMap<String, usize>,
    effects_by_name: HashMap<String, usize>,
    associations_by_effect: HashMap<String, Vec<usize>>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Catalog {
    /// Load and validate a catalog JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;

        info!(
            path = ?path,
            oils = catalog.data.oils.len(),
            effects = catalog.data.effects.len(),
            associations = catalog.data.associations.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Build the lookup tables, rejecting dangling references and duplicates
    pub fn from_data(data: CatalogData) -> Result<Self> {
        let mut categories_by_id = HashMap::with_capacity(data.categories.len());
        for (i, category) in data.categories.iter().enumerate() {
            if categories_by_id.insert(category.id.clone(), i).is_some() {
                return Err(Error::InvalidCatalog(format!(
                    "Duplicate category id: {}",
                    category.id
                )));
            }
        }

        let mut oils_by_id = HashMap::with_capacity(data.oils.len());
        for (i, oil) in data.oils.iter().enumerate() {
            if oil.name.trim().is_empty() {
                return Err(Error::InvalidCatalog(format!("Oil {} has no name", oil.id)));
            }
            if oils_by_id.insert(oil.id.clone(), i).is_some() {
                return Err(Error::InvalidCatalog(format!("Duplicate oil id: {}", oil.id)));
            }
        }

        let mut effect_ids = HashSet::with_capacity(data.effects.len());
        let mut effects_by_name = HashMap::with_capacity(data.effects.len());
        for (i, effect) in data.effects.iter().enumerate() {
            if !effect_ids.insert(effect.id.as_str()) {
                return Err(Error::InvalidCatalog(format!(
                    "Duplicate effect id: {}",
                    effect.id
                )));
            }
            if !categories_by_id.contains_key(&effect.category_id) {
                return Err(Error::InvalidCatalog(format!(
                    "Effect {} references unknown category {}",
                    effect.id, effect.category_id
                )));
            }
            let key = name_key(&effect.name);
            if key.is_empty() {
                return Err(Error::InvalidCatalog(format!(
                    "Effect {} has no name",
                    effect.id
                )));
            }
            if effects_by_name.insert(key, i).is_some() {
                return Err(Error::InvalidCatalog(format!(
                    "Duplicate effect name: {}",
                    effect.name
                )));
            }
        }

        let mut seen_pairs = HashSet::with_capacity(data.associations.len());
        let mut associations_by_effect: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, association) in data.associations.iter().enumerate() {
            if !oils_by_id.contains_key(&association.oil_id) {
                return Err(Error::InvalidCatalog(format!(
                    "Association references unknown oil {}",
                    association.oil_id
                )));
            }
            if !effect_ids.contains(association.effect_id.as_str()) {
                return Err(Error::InvalidCatalog(format!(
                    "Association references unknown effect {}",
                    association.effect_id
                )));
            }
            if !(0..=MAX_EFFECT_DEGREE).contains(&association.effect_degree) {
                return Err(Error::InvalidCatalog(format!(
                    "Effect degree {} out of range 0-{} for oil {} / effect {}",
                    association.effect_degree,
                    MAX_EFFECT_DEGREE,
                    association.oil_id,
                    association.effect_id
                )));
            }
            if !seen_pairs.insert((association.oil_id.as_str(), association.effect_id.as_str())) {
                return Err(Error::InvalidCatalog(format!(
                    "Duplicate association for oil {} / effect {}",
                    association.oil_id, association.effect_id
                )));
            }
            associations_by_effect
                .entry(association.effect_id.clone())
                .or_default()
                .push(i);
        }

        Ok(Self {
            data,
            categories_by_id,
            oils_by_id,
            effects_by_name,
            associations_by_effect,
        })
    }

    pub fn oils(&self) -> &[EssentialOil] {
        &self.data.oils
    }

    pub fn effects(&self) -> &[EffectRecord] {
        &self.data.effects
    }

    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    pub fn associations(&self) -> &[AssociationRecord] {
        &self.data.associations
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories_by_id.get(id).map(|&i| &self.data.categories[i])
    }

    /// Autocomplete for the effect search fields
    ///
    /// Case-insensitive substring match. Names starting with the input come
    /// first, each group sorted alphabetically.
    pub fn suggest_effects(&self, input: &str, limit: usize) -> Vec<&EffectRecord> {
        let needle = name_key(input);
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut matches: Vec<(bool, String, &EffectRecord)> = self
            .data
            .effects
            .iter()
            .filter_map(|effect| {
                let name = effect.name.to_lowercase();
                let pos = name.find(&needle)?;
                Some((pos != 0, name, effect))
            })
            .collect();

        matches.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        matches.truncate(limit);

        matches.into_iter().map(|(_, _, effect)| effect).collect()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut per_category: HashMap<&str, usize> = HashMap::new();
        for effect in &self.data.effects {
            *per_category.entry(effect.category_id.as_str()).or_insert(0) += 1;
        }

        let mut effects_per_category: Vec<(String, usize)> = self
            .data
            .categories
            .iter()
            .map(|c| (c.name.clone(), per_category.get(c.id.as_str()).copied().unwrap_or(0)))
            .collect();
        effects_per_category.sort();

        CatalogStats {
            categories: self.data.categories.len(),
            effects: self.data.effects.len(),
            oils: self.data.oils.len(),
            associations: self.data.associations.len(),
            effects_per_category,
        }
    }
}

#[async_trait]
impl EffectResolver for Catalog {
    async fn find_effect_by_name(&self, name: &str) -> Result<Option<EffectRecord>> {
        Ok(self
            .effects_by_name
            .get(&name_key(name))
            .map(|&i| self.data.effects[i].clone()))
    }
}

#[async_trait]
impl AssociationLookup for Catalog {
    async fn find_associations_by_effect(
        &self,
        effect_id: &str,
    ) -> Result<Vec<AssociationRecord>> {
        Ok(self
            .associations_by_effect
            .get(effect_id)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&i| self.data.associations[i].clone())
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl OilLookup for Catalog {
    async fn find_oil_by_id(&self, oil_id: &str) -> Result<Option<EssentialOil>> {
        Ok(self.oils_by_id.get(oil_id).map(|&i| self.data.oils[i].clone()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    /// Small catalog shared by the search tests
    pub(crate) fn sample_json() -> &'static str {
        r#"{
            "categories": [
                { "id": "cat-body", "name": "Körper" },
                { "id": "cat-mind", "name": "Psyche" }
            ],
            "effects": [
                { "id": "eff-pain", "name": "Pain", "category_id": "cat-body" },
                { "id": "eff-stress", "name": "Stress", "category_id": "cat-mind" },
                { "id": "eff-sleep", "name": "Schlafstörung", "category_id": "cat-mind" },
                { "id": "eff-headache", "name": "Kopfschmerzen", "category_id": "cat-body" }
            ],
            "oils": [
                { "id": "oil-lavender", "name": "Lavendel", "latin_name": "Lavandula angustifolia" },
                { "id": "oil-mint", "name": "Pfefferminze", "latin_name": "Mentha piperita" },
                { "id": "oil-orange", "name": "Orange", "latin_name": "Citrus sinensis" }
            ],
            "associations": [
                { "oil_id": "oil-mint", "effect_id": "eff-pain", "effect_degree": 3 },
                { "oil_id": "oil-lavender", "effect_id": "eff-pain", "effect_degree": 2 },
                { "oil_id": "oil-lavender", "effect_id": "eff-stress", "effect_degree": 4 },
                { "oil_id": "oil-orange", "effect_id": "eff-stress", "effect_degree": 2 },
                { "oil_id": "oil-lavender", "effect_id": "eff-sleep", "effect_degree": 4 },
                { "oil_id": "oil-mint", "effect_id": "eff-headache", "effect_degree": 4 }
            ]
        }"#
    }

    pub(crate) fn sample_catalog() -> Catalog {
        Catalog::from_json(sample_json()).unwrap()
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(sample_json().as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();

        assert_eq!(catalog.oils().len(), 3);
        assert_eq!(catalog.effects().len(), 4);
        assert_eq!(catalog.associations().len(), 6);
        assert_eq!(catalog.category("cat-mind").unwrap().name, "Psyche");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Catalog::load(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_find_effect_case_insensitive_trimmed() {
        let catalog = sample_catalog();

        let effect = catalog.find_effect_by_name("  stress ").await.unwrap();
        assert_eq!(effect.unwrap().id, "eff-stress");

        let effect = catalog.find_effect_by_name("SCHLAFSTÖRUNG").await.unwrap();
        assert_eq!(effect.unwrap().id, "eff-sleep");

        assert!(catalog.find_effect_by_name("Stres").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_associations_keeps_catalog_order() {
        let catalog = sample_catalog();

        let associations = catalog.find_associations_by_effect("eff-pain").await.unwrap();
        let oils: Vec<&str> = associations.iter().map(|a| a.oil_id.as_str()).collect();
        assert_eq!(oils, vec!["oil-mint", "oil-lavender"]);

        assert!(catalog
            .find_associations_by_effect("eff-unknown")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_find_oil_by_id() {
        let catalog = sample_catalog();

        let oil = catalog.find_oil_by_id("oil-orange").await.unwrap().unwrap();
        assert_eq!(oil.latin_name, "Citrus sinensis");
        assert!(catalog.find_oil_by_id("oil-none").await.unwrap().is_none());
    }

    #[test]
    fn test_rejects_dangling_association() {
        let mut data: CatalogData = serde_json::from_str(sample_json()).unwrap();
        data.associations.push(AssociationRecord {
            oil_id: "oil-ghost".to_string(),
            effect_id: "eff-pain".to_string(),
            effect_degree: 1,
        });

        assert!(matches!(Catalog::from_data(data), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_rejects_effect_degree_out_of_range() {
        let mut data: CatalogData = serde_json::from_str(sample_json()).unwrap();
        data.associations[0].effect_degree = 5;

        assert!(matches!(Catalog::from_data(data), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_rejects_duplicate_effect_name() {
        let mut data: CatalogData = serde_json::from_str(sample_json()).unwrap();
        data.effects.push(EffectRecord {
            id: "eff-pain-2".to_string(),
            name: "PAIN ".to_string(),
            category_id: "cat-body".to_string(),
        });

        assert!(matches!(Catalog::from_data(data), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_rejects_duplicate_association() {
        let mut data: CatalogData = serde_json::from_str(sample_json()).unwrap();
        let duplicate = data.associations[0].clone();
        data.associations.push(duplicate);

        assert!(matches!(Catalog::from_data(data), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let mut data: CatalogData = serde_json::from_str(sample_json()).unwrap();
        data.effects[0].category_id = "cat-none".to_string();

        assert!(matches!(Catalog::from_data(data), Err(Error::InvalidCatalog(_))));
    }

    #[test]
    fn test_suggest_prefix_first() {
        let catalog = sample_catalog();

        // "s" starts "Schlafstörung" and "Stress", and appears inside "Kopfschmerzen"
        let names: Vec<&str> = catalog
            .suggest_effects("s", 10)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Schlafstörung", "Stress", "Kopfschmerzen"]);
    }

    #[test]
    fn test_suggest_limit_and_empty() {
        let catalog = sample_catalog();

        assert_eq!(catalog.suggest_effects("s", 1).len(), 1);
        assert!(catalog.suggest_effects("   ", 10).is_empty());
        assert!(catalog.suggest_effects("xyz", 10).is_empty());
    }

    #[test]
    fn test_stats() {
        let stats = sample_catalog().stats();

        assert_eq!(stats.oils, 3);
        assert_eq!(stats.effects, 4);
        assert_eq!(stats.associations, 6);
        assert_eq!(
            stats.effects_per_category,
            vec![("Körper".to_string(), 2), ("Psyche".to_string(), 2)]
        );
    }
}
