use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the catalog JSON document (oils, effects, associations)
    pub catalog_path: PathBuf,

    /// API server port
    pub api_port: u16,

    /// Maximum number of query terms accepted per search request
    pub max_query_terms: usize,

    /// Default number of autocomplete suggestions
    pub suggest_limit: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_port = match env::var("API_PORT") {
            Ok(p) => p
                .parse()
                .map_err(|_| Error::Config(format!("API_PORT is not a valid port: {}", p)))?,
            Err(_) => 3000,
        };

        Ok(Self {
            catalog_path: env::var("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/catalog.json")),

            api_port,

            max_query_terms: env::var("MAX_QUERY_TERMS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5), // five symptom slots in the search form

            suggest_limit: env::var("SUGGEST_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        })
    }

    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            catalog_path: PathBuf::from("/tmp/test-catalog.json"),
            api_port: 3000,
            max_query_terms: 5,
            suggest_limit: 10,
        }
    }
}
