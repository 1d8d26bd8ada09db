use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use duft_core::model::MAX_SEVERITY;
use duft_core::ranking::{max_possible_raw_score, normalize_all, sort_for_display};
use duft_core::{Catalog, Config, QueryTerm, SearchEngine};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "duftfinder-catalog")]
#[command(about = "Inspect and query a Duftfinder catalog", version)]
struct Cli {
    /// Path to the catalog JSON (defaults to CATALOG_PATH)
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog and check its references
    Validate,

    /// Show catalog statistics
    Stats,

    /// Rank oils for a set of effects
    Search {
        /// Effect and severity as NAME=SEVERITY, repeatable
        #[arg(short, long = "term", required = true, value_parser = parse_term)]
        terms: Vec<QueryTerm>,
    },
}

fn parse_term(s: &str) -> std::result::Result<QueryTerm, String> {
    let (name, severity) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=SEVERITY, got '{}'", s))?;
    let severity: i32 = severity
        .trim()
        .parse()
        .map_err(|_| format!("invalid severity in '{}'", s))?;
    if !(0..=MAX_SEVERITY).contains(&severity) {
        return Err(format!(
            "severity in '{}' must be between 0 and {}",
            s, MAX_SEVERITY
        ));
    }
    Ok(QueryTerm::new(name.trim(), severity))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let catalog_path = cli.catalog.unwrap_or_else(|| config.catalog_path.clone());

    match cli.command {
        Commands::Validate => validate(&catalog_path)?,
        Commands::Stats => show_stats(&catalog_path)?,
        Commands::Search { terms } => run_search(&catalog_path, &terms).await?,
    }

    Ok(())
}

fn load(path: &Path) -> Result<Catalog> {
    Catalog::load(path).with_context(|| format!("Failed to load catalog {}", path.display()))
}

fn validate(path: &Path) -> Result<()> {
    let catalog = load(path)?;
    let stats = catalog.stats();

    info!(
        oils = stats.oils,
        effects = stats.effects,
        categories = stats.categories,
        associations = stats.associations,
        "Catalog is valid"
    );

    Ok(())
}

fn show_stats(path: &Path) -> Result<()> {
    let stats = load(path)?.stats();

    println!("Oils:         {}", stats.oils);
    println!("Effects:      {}", stats.effects);
    println!("Categories:   {}", stats.categories);
    println!("Associations: {}", stats.associations);
    for (category, count) in &stats.effects_per_category {
        println!("  {:<24} {} effects", category, count);
    }

    Ok(())
}

async fn run_search(path: &Path, terms: &[QueryTerm]) -> Result<()> {
    let catalog = Arc::new(load(path)?);
    let engine = SearchEngine::from_store(catalog);

    let max_possible = max_possible_raw_score(terms);
    if max_possible == 0 {
        anyhow::bail!("No term has both an effect name and a positive severity");
    }

    let mut results = engine.search(terms).await?;
    normalize_all(&mut results, max_possible)?;
    sort_for_display(&mut results);

    info!(results = results.len(), max_possible, "Search complete");

    for (rank, result) in results.iter().enumerate() {
        println!(
            "{:>3}. {:<28} {:>3}%  score {:>3}/{}  matches {}  [{}]",
            rank + 1,
            result.oil.name,
            result.weighted_match_value,
            result.raw_score,
            max_possible,
            result.match_count,
            result.matched_effects().join(", ")
        );
    }

    Ok(())
}
