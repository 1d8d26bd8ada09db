pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod ranking;
pub mod search;
pub mod store;

pub use catalog::Catalog;
pub use config::Config;
pub use error::{Error, Result};
pub use model::{
    AssociationRecord, Category, EffectRecord, EssentialOil, QueryTerm, RankedOilResult,
};
pub use ranking::{max_possible_raw_score, normalize};
pub use search::{merge_into, ResultAccumulator, SearchEngine};
pub use store::{AssociationLookup, EffectResolver, OilLookup};
