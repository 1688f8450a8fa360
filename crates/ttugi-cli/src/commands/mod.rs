//! CLI command implementations for `ttugi`.
//!
//! - [`recommend`] -- situation, weather, budget, time and group lists.
//! - [`ask`] -- free-text chat turns and analyzer inspection.
//! - [`catalog_cmd`] -- catalog statistics and listing.

pub mod ask;
pub mod catalog_cmd;
pub mod recommend;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};

use ttugi_core::catalog::RestaurantCatalog;
use ttugi_core::preference::ProfilePreferenceAgent;
use ttugi_core::{Recommendation, RecommendationFacade};
use ttugi_types::config::{Config, expand_home};

/// Env var naming a config file.
pub const CONFIG_ENV: &str = "TTUGI_CONFIG";

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Config file path (overrides auto-discovery).
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Catalog file (.json or .csv), overriding `catalog.path`.
    #[arg(long, global = true)]
    pub catalog: Option<String>,

    /// Print JSON instead of a table.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Discover the config file.
///
/// 1. `--config`
/// 2. `TTUGI_CONFIG` env var
/// 3. `~/.ttugi/config.json`
///
/// Returns `None` when nothing is found.
pub fn discover_config_path(config_override: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_override {
        return Some(expand_home(path));
    }
    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.trim().is_empty()
    {
        return Some(expand_home(&path));
    }
    let default = dirs::home_dir()?.join(".ttugi").join("config.json");
    default.exists().then_some(default)
}

/// Load and validate configuration. A missing config means defaults; an
/// explicitly named file that does not exist is an error.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<Config> {
    let Some(path) = discover_config_path(config_override) else {
        tracing::debug!("no config file found, using defaults");
        return Ok(Config::default());
    };
    let config = load_config_file(&path)?;
    config
        .validate()
        .map_err(|err| anyhow::anyhow!("{}: {err}", path.display()))?;
    Ok(config)
}

fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        anyhow::bail!("config file not found: {}", path.display());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load the catalog and wire up the facade, with the profile agent when a
/// profiles file is configured.
pub fn build_facade(common: &CommonArgs) -> anyhow::Result<RecommendationFacade> {
    let config = load_config(common.config.as_deref())?;

    let catalog_path = common
        .catalog
        .as_deref()
        .map(expand_home)
        .unwrap_or_else(|| config.catalog.resolved_path());
    let catalog = RestaurantCatalog::load(&catalog_path, &config.catalog)
        .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?;

    let profiles = config.preferences.resolved_path();
    let mut facade = RecommendationFacade::new(Arc::new(catalog), config);
    if let Some(path) = profiles {
        let agent = ProfilePreferenceAgent::load(&path)?;
        facade = facade.with_preference_agent(Arc::new(agent));
    }
    Ok(facade)
}

/// Format a won amount with thousands separators.
pub fn format_won(won: u32) -> String {
    let digits = won.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("₩{out}")
}

/// Render recommendations as a table, or JSON with `--json`.
pub fn print_recommendations(list: &[Recommendation], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(list)?);
        return Ok(());
    }
    if list.is_empty() {
        println!("No restaurants found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["#", "NAME", "AREA", "CATEGORY", "RATING", "PRICE", "SCORE", "WHY"]);
    for (rank, rec) in list.iter().enumerate() {
        let r = &rec.restaurant;
        let score = match (rec.score, rec.preference_score) {
            (Some(s), Some(p)) => format!("{s} / {p:.2}"),
            (Some(s), None) => s.to_string(),
            (None, Some(p)) => format!("{p:.2}"),
            (None, None) => "-".into(),
        };
        table.add_row([
            (rank + 1).to_string(),
            r.name.clone(),
            r.area.to_string(),
            r.category.to_string(),
            format!("{:.1}", r.rating),
            r.price_range.clone(),
            score,
            rec.reasons.join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}
