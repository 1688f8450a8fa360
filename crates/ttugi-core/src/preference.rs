//! User preference agents.
//!
//! The facade re-ranks results for signed-in users through a
//! [`PreferenceAgent`]. Two implementations ship here: a pass-through
//! [`NoopPreferenceAgent`] and [`ProfilePreferenceAgent`], which scores
//! restaurants against per-user JSON profiles.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ttugi_types::restaurant::{Area, Category, RestaurantRecord};
use ttugi_types::{Result, TtugiError};

use crate::scoring::Recommendation;

/// Id prefix used for anonymous chat users.
pub const GUEST_PREFIX: &str = "guest_";

/// True when the caller is anonymous: no id, `"guest"`, or a `guest_` id.
pub fn is_guest(user_id: Option<&str>) -> bool {
    match user_id.map(str::trim) {
        None | Some("") => true,
        Some(id) => id.eq_ignore_ascii_case("guest") || id.starts_with(GUEST_PREFIX),
    }
}

/// Personalization collaborator.
///
/// Both methods are awaited without a timeout; errors propagate to the
/// caller unchanged.
#[async_trait]
pub trait PreferenceAgent: Send + Sync {
    /// Re-rank (and possibly re-truncate) `list` for `user_id`.
    async fn personalized_recommendations(
        &self,
        user_id: &str,
        list: Vec<Recommendation>,
        limit: usize,
    ) -> Result<Vec<Recommendation>>;

    /// Preference score of one restaurant for one user. `None` when the
    /// agent knows nothing about the user.
    async fn preference_score(
        &self,
        user_id: &str,
        restaurant: &RestaurantRecord,
    ) -> Result<Option<f64>>;
}

/// Agent that leaves lists untouched apart from truncation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPreferenceAgent;

#[async_trait]
impl PreferenceAgent for NoopPreferenceAgent {
    async fn personalized_recommendations(
        &self,
        _user_id: &str,
        mut list: Vec<Recommendation>,
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        list.truncate(limit);
        Ok(list)
    }

    async fn preference_score(
        &self,
        _user_id: &str,
        _restaurant: &RestaurantRecord,
    ) -> Result<Option<f64>> {
        Ok(None)
    }
}

// ── Profiles ─────────────────────────────────────────────────────────────

/// Stored taste profile for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "favoriteCategory")]
    pub favorite_categories: Vec<Category>,

    #[serde(default, alias = "favoriteArea")]
    pub favorite_areas: Vec<Area>,

    #[serde(default, alias = "dislikes")]
    pub disliked_categories: Vec<Category>,
}

const FAVORITE_CATEGORY_WEIGHT: f64 = 0.5;
const FAVORITE_AREA_WEIGHT: f64 = 0.3;
const DISLIKED_CATEGORY_PENALTY: f64 = 0.5;
const RATING_WEIGHT: f64 = 0.2;

impl UserProfile {
    /// Score in `-0.5..=1.0`.
    pub fn score(&self, restaurant: &RestaurantRecord) -> f64 {
        let mut score = f64::from(restaurant.rating.clamp(0.0, 5.0)) / 5.0 * RATING_WEIGHT;
        if self.favorite_categories.contains(&restaurant.category) {
            score += FAVORITE_CATEGORY_WEIGHT;
        }
        if self.favorite_areas.contains(&restaurant.area) {
            score += FAVORITE_AREA_WEIGHT;
        }
        if self.disliked_categories.contains(&restaurant.category) {
            score -= DISLIKED_CATEGORY_PENALTY;
        }
        score
    }
}

/// Agent backed by an in-memory map of user profiles.
#[derive(Debug, Clone, Default)]
pub struct ProfilePreferenceAgent {
    profiles: HashMap<String, UserProfile>,
}

impl ProfilePreferenceAgent {
    pub fn new(profiles: HashMap<String, UserProfile>) -> Self {
        Self { profiles }
    }

    /// Parse a JSON object of `user id -> profile`.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let profiles: HashMap<String, UserProfile> = serde_json::from_str(raw)?;
        Ok(Self::new(profiles))
    }

    /// Load profiles from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| TtugiError::Preference {
            message: format!("cannot read profiles at {}: {e}", path.display()),
        })?;
        let agent = Self::from_json_str(&raw).map_err(|e| TtugiError::Preference {
            message: format!("cannot parse profiles at {}: {e}", path.display()),
        })?;
        info!(path = %path.display(), users = agent.profiles.len(), "loaded user profiles");
        Ok(agent)
    }

    pub fn insert(&mut self, user_id: impl Into<String>, profile: UserProfile) {
        self.profiles.insert(user_id.into(), profile);
    }

    pub fn profile(&self, user_id: &str) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[async_trait]
impl PreferenceAgent for ProfilePreferenceAgent {
    async fn personalized_recommendations(
        &self,
        user_id: &str,
        mut list: Vec<Recommendation>,
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        let Some(profile) = self.profiles.get(user_id) else {
            debug!(user_id, "no profile, keeping ranking");
            list.truncate(limit);
            return Ok(list);
        };

        for rec in &mut list {
            rec.preference_score = Some(profile.score(&rec.restaurant));
        }
        // Stable: equal preference keeps the situational order.
        list.sort_by(|a, b| {
            let a = a.preference_score.unwrap_or_default();
            let b = b.preference_score.unwrap_or_default();
            b.total_cmp(&a)
        });
        list.truncate(limit);
        debug!(user_id, kept = list.len(), "personalized ranking");
        Ok(list)
    }

    async fn preference_score(
        &self,
        user_id: &str,
        restaurant: &RestaurantRecord,
    ) -> Result<Option<f64>> {
        Ok(self.profiles.get(user_id).map(|p| p.score(restaurant)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, category: Category, area: Area) -> RestaurantRecord {
        RestaurantRecord {
            id: id.into(),
            name: id.into(),
            address: String::new(),
            area,
            category,
            rating: 0.0,
            review_count: 0,
            price_range: String::new(),
            features: Vec::new(),
            specialty: String::new(),
            business_hours: String::new(),
        }
    }

    fn agent() -> ProfilePreferenceAgent {
        ProfilePreferenceAgent::from_json_str(
            r#"{
                "u1": {
                    "favoriteCategories": ["일식"],
                    "favoriteAreas": ["광안리"],
                    "dislikedCategories": ["치킨"]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn guest_detection() {
        assert!(is_guest(None));
        assert!(is_guest(Some("")));
        assert!(is_guest(Some("guest")));
        assert!(is_guest(Some("GUEST")));
        assert!(is_guest(Some("guest_1729")));
        assert!(!is_guest(Some("u1")));
        assert!(!is_guest(Some("guesthouse")));
    }

    #[test]
    fn profile_score_components() {
        let profile = agent().profile("u1").cloned().unwrap();
        let liked = record("a", Category::Japanese, Area::Gwangalli);
        let disliked = record("b", Category::Chicken, Area::Other);
        assert!((profile.score(&liked) - 0.8).abs() < 1e-9);
        assert!((profile.score(&disliked) + 0.5).abs() < 1e-9);
    }

    #[test]
    fn profile_accepts_singular_aliases() {
        let agent = ProfilePreferenceAgent::from_json_str(
            r#"{"u2": {"favoriteCategory": ["카페"], "dislikes": ["분식"]}}"#,
        )
        .unwrap();
        let p = agent.profile("u2").unwrap();
        assert_eq!(p.favorite_categories, vec![Category::Cafe]);
        assert_eq!(p.disliked_categories, vec![Category::Bunsik]);
    }

    #[tokio::test]
    async fn reranks_known_user() {
        let list = vec![
            Recommendation::unscored(record("chicken", Category::Chicken, Area::Seomyeon)),
            Recommendation::unscored(record("sushi", Category::Japanese, Area::Gwangalli)),
            Recommendation::unscored(record("noodle", Category::Korean, Area::Nampo)),
        ];
        let out = agent()
            .personalized_recommendations("u1", list, 2)
            .await
            .unwrap();
        let ids: Vec<&str> = out.iter().map(Recommendation::id).collect();
        assert_eq!(ids, vec!["sushi", "noodle"]);
        assert!(out.iter().all(|r| r.preference_score.is_some()));
    }

    #[tokio::test]
    async fn unknown_user_keeps_order() {
        let list = vec![
            Recommendation::unscored(record("a", Category::Chicken, Area::Other)),
            Recommendation::unscored(record("b", Category::Japanese, Area::Other)),
        ];
        let out = agent()
            .personalized_recommendations("nobody", list.clone(), 10)
            .await
            .unwrap();
        assert_eq!(out, list);
        let score = agent()
            .preference_score("nobody", &list[0].restaurant)
            .await
            .unwrap();
        assert_eq!(score, None);
    }

    #[tokio::test]
    async fn noop_only_truncates() {
        let list: Vec<_> = (0..4)
            .map(|i| Recommendation::unscored(record(&i.to_string(), Category::Other, Area::Other)))
            .collect();
        let out = NoopPreferenceAgent
            .personalized_recommendations("u1", list, 3)
            .await
            .unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ProfilePreferenceAgent::load(Path::new("/nonexistent/profiles.json")).unwrap_err();
        assert!(matches!(err, TtugiError::Preference { .. }));
    }
}
