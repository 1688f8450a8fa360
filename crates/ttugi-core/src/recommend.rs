//! Recommendation facade.
//!
//! [`RecommendationFacade`] ties the catalog, analyzer, scoring engine,
//! session store and preference agent together. Each `recommend_*` call is
//! request/response over the immutable catalog snapshot; the session store
//! is the only state it mutates.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Timelike;
use serde::Serialize;
use tracing::{debug, info};

use ttugi_types::Result;
use ttugi_types::config::Config;
use ttugi_types::criteria::{BudgetSentiment, Criteria};
use ttugi_types::restaurant::RestaurantRecord;
use ttugi_types::situation::Situation;

use crate::analyzer::QueryAnalyzer;
use crate::catalog::RestaurantCatalog;
use crate::preference::{NoopPreferenceAgent, PreferenceAgent, is_guest};
use crate::price::PriceBucket;
use crate::scoring::{Recommendation, ScoringEngine};
use crate::session::{SessionCache, SessionStore};
use crate::weather::{TimeWindow, Weather};

/// Result of [`RecommendationFacade::recommend_for_message`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecommendation {
    /// What the analyzer extracted (after session inheritance).
    pub criteria: Criteria,
    /// Situation used for scoring.
    pub situation: Situation,
    /// True when the criteria matched nothing and the whole catalog was
    /// ranked instead.
    pub fell_back: bool,
    pub recommendations: Vec<Recommendation>,
}

/// Entry point for every recommendation flow.
pub struct RecommendationFacade {
    catalog: Arc<RestaurantCatalog>,
    engine: ScoringEngine,
    analyzer: QueryAnalyzer,
    sessions: Arc<dyn SessionCache>,
    preferences: Arc<dyn PreferenceAgent>,
    config: Config,
}

impl RecommendationFacade {
    /// Facade with default analyzer, an in-memory session store and no
    /// preference agent.
    ///
    /// The catalog adopts `config.scoring.default_price` so price filters
    /// and scoring agree on unpriced records.
    pub fn new(catalog: Arc<RestaurantCatalog>, config: Config) -> Self {
        let default_price = config.scoring.default_price;
        let catalog = if catalog.default_price() == default_price {
            catalog
        } else {
            debug!(default_price, "applying configured default price to catalog");
            Arc::new(Arc::unwrap_or_clone(catalog).with_default_price(default_price))
        };
        Self {
            engine: ScoringEngine::new(&config.scoring),
            analyzer: QueryAnalyzer::new(),
            sessions: Arc::new(SessionStore::new(&config.sessions)),
            preferences: Arc::new(NoopPreferenceAgent),
            catalog,
            config,
        }
    }

    pub fn with_preference_agent(mut self, agent: Arc<dyn PreferenceAgent>) -> Self {
        self.preferences = agent;
        self
    }

    pub fn with_session_cache(mut self, sessions: Arc<dyn SessionCache>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn with_analyzer(mut self, analyzer: QueryAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn catalog(&self) -> &RestaurantCatalog {
        &self.catalog
    }

    pub fn analyzer(&self) -> &QueryAnalyzer {
        &self.analyzer
    }

    pub fn sessions(&self) -> &dyn SessionCache {
        self.sessions.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn top_n(&self) -> usize {
        self.config.scoring.top_n
    }

    // ── Situation ────────────────────────────────────────────────────────

    /// Rank the catalog for a situation tag.
    ///
    /// Unknown tags rank by rating only. For a signed-in user the list goes
    /// through the preference agent, whose errors propagate.
    pub async fn recommend_by_situation(
        &self,
        situation: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<Recommendation>> {
        self.recommend_by_situation_with_limit(situation, user_id, self.top_n())
            .await
    }

    /// [`recommend_by_situation`](Self::recommend_by_situation) returning up
    /// to `limit` results instead of the configured top N.
    pub async fn recommend_by_situation_with_limit(
        &self,
        situation: &str,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        let situation = Situation::parse(situation);
        let ranked = self.rank_situation(situation, self.catalog.records(), limit);
        self.personalize(user_id, ranked, limit).await
    }

    fn rank_situation<'a, I>(
        &self,
        situation: Situation,
        records: I,
        limit: usize,
    ) -> Vec<Recommendation>
    where
        I: IntoIterator<Item = &'a RestaurantRecord>,
    {
        if situation.is_scored() {
            self.engine.rank_with_limit(situation, records, limit)
        } else {
            let mut all: Vec<&RestaurantRecord> = records.into_iter().collect();
            crate::catalog::sort_by_popularity(&mut all);
            all.into_iter()
                .take(limit)
                .cloned()
                .map(Recommendation::unscored)
                .collect()
        }
    }

    async fn personalize(
        &self,
        user_id: Option<&str>,
        ranked: Vec<Recommendation>,
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        match user_id {
            Some(user) if !is_guest(user_id) => {
                debug!(user_id = user, candidates = ranked.len(), "personalizing");
                self.preferences
                    .personalized_recommendations(user, ranked, limit)
                    .await
            }
            _ => Ok(ranked),
        }
    }

    // ── Weather ──────────────────────────────────────────────────────────

    /// Dishes suited to the weather, one catalog search per dish, merged
    /// in dish order and de-duplicated by id.
    ///
    /// Unrecognized weather falls back to the top-rated list.
    pub fn recommend_by_weather(&self, weather: &str) -> Vec<Recommendation> {
        let Some(kind) = Weather::detect(weather) else {
            debug!(weather, "unknown weather, using top rated");
            return self.to_unscored(self.catalog.top_rated(self.top_n()));
        };

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        for dish in kind.dishes() {
            let hits = self
                .catalog
                .search(&Criteria::with_keyword(*dish), self.top_n());
            for record in hits {
                if seen.insert(record.id.as_str()) {
                    merged.push(record);
                }
            }
        }
        merged.truncate(self.top_n());
        debug!(weather = kind.label(), hits = merged.len(), "weather recommendations");
        self.to_unscored(merged)
    }

    // ── Time ─────────────────────────────────────────────────────────────

    /// [`recommend_by_time_at`](Self::recommend_by_time_at) using the local
    /// wall-clock hour.
    pub fn recommend_by_time(&self) -> Vec<Recommendation> {
        let hour = chrono::Local::now().hour() as u8;
        self.recommend_by_time_at(hour)
    }

    /// Rank for the situation tied to the time window containing `hour`.
    pub fn recommend_by_time_at(&self, hour: u8) -> Vec<Recommendation> {
        let window = TimeWindow::for_hour(hour);
        debug!(hour, ?window, "time-based recommendation");
        self.engine
            .rank(window.situation(), self.catalog.records())
    }

    // ── Budget ───────────────────────────────────────────────────────────

    /// Restaurants whose minimum price fits the budget bucket, by rating.
    pub fn recommend_by_budget(&self, budget: u32) -> Vec<Recommendation> {
        let bucket = PriceBucket::for_budget(budget, &self.config.scoring);
        let criteria = Criteria {
            max_price: bucket.max_price(&self.config.scoring),
            ..Criteria::default()
        };
        debug!(budget, bucket = bucket.label(), max_price = ?criteria.max_price, "budget recommendation");
        self.to_unscored(self.catalog.search(&criteria, self.top_n()))
    }

    // ── Group ────────────────────────────────────────────────────────────

    /// Mean preference score across the group for every restaurant, sorted
    /// descending.
    ///
    /// Members without preference data contribute 0 and still count toward
    /// the group size. An empty group yields an empty list.
    pub async fn recommend_for_group(&self, user_ids: &[String]) -> Result<Vec<Recommendation>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let size = user_ids.len() as f64;

        let mut scored = Vec::with_capacity(self.catalog.len());
        for record in self.catalog.records() {
            let mut sum = 0.0;
            for user in user_ids {
                sum += self
                    .preferences
                    .preference_score(user, record)
                    .await?
                    .unwrap_or(0.0);
            }
            let mut rec = Recommendation::unscored(record.clone());
            rec.preference_score = Some(sum / size);
            scored.push(rec);
        }

        scored.sort_by(|a, b| {
            let a = a.preference_score.unwrap_or_default();
            let b = b.preference_score.unwrap_or_default();
            b.total_cmp(&a)
        });
        scored.truncate(self.top_n());
        info!(members = user_ids.len(), kept = scored.len(), "group recommendation");
        Ok(scored)
    }

    // ── Chat message ─────────────────────────────────────────────────────

    /// Full chat flow for one user message.
    ///
    /// Analyze with session memory, record the turn, filter by the
    /// criteria, then rank with the detected situation (or the one tied to
    /// the message's hour). A cheap sentiment bounds the price at the cheap
    /// cutoff. When the filter leaves nothing, the whole catalog is ranked.
    pub async fn recommend_for_message(
        &self,
        session_id: &str,
        text: &str,
        hour: u8,
        user_id: Option<&str>,
    ) -> Result<MessageRecommendation> {
        let memory = self.sessions.get(session_id);
        let mut criteria = self.analyzer.analyze(text, hour, memory.as_ref());
        if criteria.budget == Some(BudgetSentiment::Cheap) {
            criteria.max_price = Some(self.config.scoring.cheap_cutoff);
        }
        self.sessions
            .touch(session_id, &mut |pref| pref.record(&criteria))?;

        let situation = criteria
            .situation
            .unwrap_or_else(|| TimeWindow::for_hour(criteria.time_hour).situation());

        let candidates = self.catalog.find(&criteria);
        let fell_back = candidates.is_empty();
        let ranked = if fell_back {
            debug!(session_id, "no match for criteria, ranking whole catalog");
            self.engine.rank(situation, self.catalog.records())
        } else {
            self.engine.rank(situation, candidates)
        };
        let recommendations = self.personalize(user_id, ranked, self.top_n()).await?;

        info!(
            session_id,
            situation = %situation,
            area = ?criteria.area,
            category = ?criteria.category,
            fell_back,
            results = recommendations.len(),
            "message recommendation"
        );
        Ok(MessageRecommendation {
            criteria,
            situation,
            fell_back,
            recommendations,
        })
    }

    fn to_unscored(&self, records: Vec<&RestaurantRecord>) -> Vec<Recommendation> {
        records
            .into_iter()
            .cloned()
            .map(Recommendation::unscored)
            .collect()
    }
}
