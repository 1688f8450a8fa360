//! # ttugi-core
//!
//! Core engine for the ttugi restaurant recommender.
//!
//! Contains the restaurant catalog, the keyword query analyzer, the
//! situational scoring engine, preference agents, the session store, and
//! the recommendation facade that ties them together.

pub mod analyzer;
pub mod catalog;
pub mod preference;
pub mod price;
pub mod recommend;
pub mod scoring;
pub mod session;
pub mod weather;

pub use analyzer::QueryAnalyzer;
pub use catalog::RestaurantCatalog;
pub use recommend::{MessageRecommendation, RecommendationFacade};
pub use scoring::{Recommendation, ScoringEngine};
pub use session::{SessionCache, SessionStore};
