//! Price extraction from free-text `price_range` strings.
//!
//! The first number in the string is taken as the minimum price. Commas
//! are accepted as thousands separators and a `만` directly after the
//! number multiplies it by 10,000 (`"1만원~2만원"` is 10,000 won). Head
//! counts (`"1인"`, `"2인분"`, `"1인당"`) are not prices and are skipped.
//! When no number is present the caller's default applies.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use ttugi_types::config::ScoringConfig;

static PRICE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn price_pattern() -> &'static Regex {
    PRICE_PATTERN.get_or_init(|| {
        Regex::new(r"(\d[\d,]*(?:\.\d+)?)\s*(만|인분|인당|인(?:[^가-힣]|$))?")
            .expect("price pattern is a valid regex")
    })
}

/// Parse the first price embedded in `text`, in won.
pub fn parse_min_price(text: &str) -> Option<u32> {
    let caps = price_pattern()
        .captures_iter(text)
        .find(|caps| caps.get(2).is_none_or(|unit| unit.as_str() == "만"))?;
    let digits = caps.get(1)?.as_str().replace(',', "");
    let value: f64 = digits.parse().ok()?;
    let won = if caps.get(2).is_some() {
        value * 10_000.0
    } else {
        value.trunc()
    };
    if won.is_finite() && won >= 0.0 && won <= f64::from(u32::MAX) {
        Some(won as u32)
    } else {
        None
    }
}

/// Parse the first price in `text`, or `default` if there is none.
pub fn min_price_or(text: &str, default: u32) -> u32 {
    parse_min_price(text).unwrap_or(default)
}

/// Budget bucket a spend threshold falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceBucket {
    /// "저렴": at or below the cheap cutoff.
    Cheap,
    /// "보통": at or below the moderate cutoff.
    Moderate,
    /// "고급": anything above.
    Premium,
}

impl PriceBucket {
    /// Bucket for a per-person budget.
    pub fn for_budget(budget: u32, config: &ScoringConfig) -> Self {
        if budget <= config.cheap_cutoff {
            PriceBucket::Cheap
        } else if budget <= config.moderate_cutoff {
            PriceBucket::Moderate
        } else {
            PriceBucket::Premium
        }
    }

    /// Upper price boundary of the bucket. `None` means unbounded.
    pub fn max_price(self, config: &ScoringConfig) -> Option<u32> {
        match self {
            PriceBucket::Cheap => Some(config.cheap_cutoff),
            PriceBucket::Moderate => Some(config.moderate_cutoff),
            PriceBucket::Premium => None,
        }
    }

    /// Korean label.
    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::Cheap => "저렴",
            PriceBucket::Moderate => "보통",
            PriceBucket::Premium => "고급",
        }
    }
}
