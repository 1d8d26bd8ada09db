use crate::error::Result;
use crate::model::{AssociationRecord, EffectRecord, EssentialOil};
use async_trait::async_trait;

/// Resolves a typed effect name to its record
#[async_trait]
pub trait EffectResolver: Send + Sync {
    /// Exact, case-insensitive match on the trimmed name
    async fn find_effect_by_name(&self, name: &str) -> Result<Option<EffectRecord>>;
}

/// Effect-to-oil associations
#[async_trait]
pub trait AssociationLookup: Send + Sync {
    async fn find_associations_by_effect(&self, effect_id: &str)
        -> Result<Vec<AssociationRecord>>;
}

/// Essential oil display records
#[async_trait]
pub trait OilLookup: Send + Sync {
    async fn find_oil_by_id(&self, oil_id: &str) -> Result<Option<EssentialOil>>;
}
