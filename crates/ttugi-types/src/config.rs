//! Configuration schema types.
//!
//! All structs accept both `snake_case` and `camelCase` field names in JSON
//! via `#[serde(alias)]`. Unknown fields are silently ignored for forward
//! compatibility. Every fallback literal the engine relies on is a named
//! constant here so tests can assert on it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TtugiError};
use crate::restaurant::{Area, Category};

/// Price assumed when a `price_range` string has no embedded integer.
pub const DEFAULT_PRICE_WON: u32 = 20_000;

/// Number of recommendations returned when no limit is given.
pub const DEFAULT_TOP_N: usize = 10;

/// Upper bound of the "저렴" budget bucket.
pub const CHEAP_CUTOFF_WON: u32 = 10_000;

/// Upper bound of the "보통" budget bucket.
pub const MODERATE_CUTOFF_WON: u32 = 30_000;

/// Category assigned to records whose category is outside the vocabulary.
pub const DEFAULT_CATEGORY: Category = Category::Other;

/// Area assigned to records whose area cannot be resolved.
pub const DEFAULT_AREA: Area = Area::Other;

/// Maximum number of live chat sessions before LRU eviction.
pub const DEFAULT_MAX_SESSIONS: usize = 1_000;

/// Idle time after which a session expires.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

// ── Root config ──────────────────────────────────────────────────────────

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Restaurant catalog source and load-time defaults.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Scoring and recommendation defaults.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Chat session memory limits.
    #[serde(default)]
    pub sessions: SessionConfig,

    /// User preference profiles.
    #[serde(default)]
    pub preferences: PreferenceConfig,
}

impl Config {
    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.scoring.top_n == 0 {
            return Err(invalid("scoring.top_n must be at least 1"));
        }
        if self.scoring.cheap_cutoff > self.scoring.moderate_cutoff {
            return Err(invalid(format!(
                "scoring.cheap_cutoff ({}) must not exceed scoring.moderate_cutoff ({})",
                self.scoring.cheap_cutoff, self.scoring.moderate_cutoff
            )));
        }
        if self.sessions.max_sessions == 0 {
            return Err(invalid("sessions.max_sessions must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> TtugiError {
    TtugiError::ConfigInvalid {
        reason: reason.into(),
    }
}

// ── Catalog ──────────────────────────────────────────────────────────────

/// Where the catalog comes from and how unknown labels are bucketed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to a `.json` or `.csv` catalog file.
    #[serde(default = "default_catalog_path")]
    pub path: String,

    /// Fallback for unrecognised categories.
    #[serde(default = "default_category", alias = "defaultCategory")]
    pub default_category: Category,

    /// Fallback for unrecognised areas.
    #[serde(default = "default_area", alias = "defaultArea")]
    pub default_area: Area,
}

fn default_catalog_path() -> String {
    "~/.ttugi/restaurants.json".into()
}
fn default_category() -> Category {
    DEFAULT_CATEGORY
}
fn default_area() -> Area {
    DEFAULT_AREA
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            default_category: default_category(),
            default_area: default_area(),
        }
    }
}

impl CatalogConfig {
    /// The catalog path with a leading `~/` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        expand_home(&self.path)
    }
}

// ── Scoring ──────────────────────────────────────────────────────────────

/// Scoring and truncation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Price assumed when none can be parsed, in won.
    #[serde(default = "default_price", alias = "defaultPrice")]
    pub default_price: u32,

    /// Recommendations returned per call.
    #[serde(default = "default_top_n", alias = "topN")]
    pub top_n: usize,

    /// Upper bound of the cheap budget bucket, in won.
    #[serde(default = "default_cheap_cutoff", alias = "cheapCutoff")]
    pub cheap_cutoff: u32,

    /// Upper bound of the moderate budget bucket, in won.
    #[serde(default = "default_moderate_cutoff", alias = "moderateCutoff")]
    pub moderate_cutoff: u32,
}

fn default_price() -> u32 {
    DEFAULT_PRICE_WON
}
fn default_top_n() -> usize {
    DEFAULT_TOP_N
}
fn default_cheap_cutoff() -> u32 {
    CHEAP_CUTOFF_WON
}
fn default_moderate_cutoff() -> u32 {
    MODERATE_CUTOFF_WON
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_price: default_price(),
            top_n: default_top_n(),
            cheap_cutoff: default_cheap_cutoff(),
            moderate_cutoff: default_moderate_cutoff(),
        }
    }
}

// ── Sessions ─────────────────────────────────────────────────────────────

/// Session memory limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Live sessions kept before the least recently used one is evicted.
    #[serde(default = "default_max_sessions", alias = "maxSessions")]
    pub max_sessions: usize,

    /// Idle seconds after which a session expires.
    #[serde(default = "default_ttl_secs", alias = "ttlSecs")]
    pub ttl_secs: u64,
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}
fn default_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

// ── Preferences ──────────────────────────────────────────────────────────

/// Source of per-user preference profiles.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PreferenceConfig {
    /// JSON file mapping user id to profile. No file means no
    /// personalization.
    #[serde(default, alias = "profilesPath")]
    pub profiles_path: Option<String>,
}

impl PreferenceConfig {
    /// The profiles path with a leading `~/` expanded.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.profiles_path.as_deref().map(expand_home)
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    #[cfg(feature = "native")]
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}
