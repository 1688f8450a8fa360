//! End-to-end tests over the bundled fixture catalog.
//!
//! Loads `tests/fixtures/restaurants.json` (and the CSV / profile
//! fixtures) through the public API and exercises every recommendation
//! flow the facade exposes.

use std::path::PathBuf;
use std::sync::Arc;

use ttugi_core::catalog::RestaurantCatalog;
use ttugi_core::preference::ProfilePreferenceAgent;
use ttugi_core::{Recommendation, RecommendationFacade, SessionCache};
use ttugi_types::config::{CatalogConfig, Config};
use ttugi_types::restaurant::{Area, Category};
use ttugi_types::situation::Situation;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/fixtures")).join(name)
}

fn load_catalog() -> Arc<RestaurantCatalog> {
    let catalog =
        RestaurantCatalog::load(&fixture("restaurants.json"), &CatalogConfig::default()).unwrap();
    Arc::new(catalog)
}

fn facade() -> RecommendationFacade {
    RecommendationFacade::new(load_catalog(), Config::default())
}

fn names(list: &[Recommendation]) -> Vec<&str> {
    list.iter().map(|r| r.restaurant.name.as_str()).collect()
}

#[test]
fn fixture_catalog_is_normalized() {
    let catalog = load_catalog();
    // 19 rows: one without a name, one exact (name, address) duplicate.
    assert_eq!(catalog.len(), 17);

    let fusion = catalog.get("18").unwrap();
    assert_eq!(fusion.category, Category::Other);
    assert_eq!(fusion.area, Area::Saha);
    assert_eq!(fusion.rating, 5.0);
    assert_eq!(fusion.features, vec!["룸", "주차"]);
    assert!(catalog.get("17").is_none());
}

#[test]
fn csv_fixture_loads() {
    let catalog =
        RestaurantCatalog::load(&fixture("restaurants.csv"), &CatalogConfig::default()).unwrap();
    assert_eq!(catalog.len(), 3);
    let first = catalog.get("101").unwrap();
    assert_eq!(first.area, Area::Nampo);
    assert_eq!(first.features, vec!["주차", "야경"]);
    assert_eq!(catalog.min_price(catalog.get("102").unwrap()), 9_000);
}

#[test]
fn analyzer_reads_area_and_seafood() {
    let f = facade();
    let criteria = f.analyzer().analyze("해운대에서 회 먹고싶어", 19, None);
    assert_eq!(criteria.area, Some(Area::Haeundae));
    assert_eq!(criteria.category, Some(Category::Seafood));
    assert_eq!(criteria.keyword.as_deref(), Some("회"));
    assert_eq!(criteria.time_hour, 19);
}

#[tokio::test]
async fn date_prefers_view_restaurant() {
    let out = facade().recommend_by_situation("데이트", None).await.unwrap();
    assert_eq!(out.len(), 10);
    assert_eq!(out[0].restaurant.name, "오션 비스트로");
    assert!(out.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn special_day_prefers_omakase() {
    let out = facade().recommend_by_situation("특별한 날", None).await.unwrap();
    assert_eq!(out[0].restaurant.name, "센텀 오마카세 긴");
    assert_eq!(out[0].situation, Some(Situation::SpecialDay));
}

#[tokio::test]
async fn profile_agent_reranks_signed_in_user() {
    let agent = ProfilePreferenceAgent::load(&fixture("profiles.json")).unwrap();
    let f = facade().with_preference_agent(Arc::new(agent));

    let out = f.recommend_by_situation("데이트", Some("minji")).await.unwrap();
    assert_eq!(out[0].restaurant.name, "센텀 오마카세 긴");
    assert!(out.iter().all(|r| r.preference_score.is_some()));
    assert!(
        out.windows(2)
            .all(|w| w[0].preference_score >= w[1].preference_score)
    );

    let guest = f.recommend_by_situation("데이트", Some("guest_42")).await.unwrap();
    assert_eq!(guest[0].restaurant.name, "오션 비스트로");
    assert!(guest.iter().all(|r| r.preference_score.is_none()));
}

#[test]
fn budget_filter_respects_cheap_cutoff() {
    let f = facade();
    let out = f.recommend_by_budget(8_000);
    assert!(!out.is_empty());
    for r in &out {
        assert!(f.catalog().min_price(&r.restaurant) <= 10_000, "{}", r.restaurant.name);
    }
}

#[test]
fn rainy_weather_finds_soup_and_pancake() {
    let out = facade().recommend_by_weather("비 오는 날");
    let found = names(&out);
    assert!(found.contains(&"쌍둥이돼지국밥"));
    assert!(found.contains(&"초량 차이나타운 홍성방"));
}

#[test]
fn late_night_window() {
    let out = facade().recommend_by_time_at(23);
    assert!(out.iter().all(|r| r.situation == Some(Situation::LateNight)));
    assert_eq!(out[0].restaurant.name, "서면 치킨 포차");
}

#[tokio::test]
async fn group_recommendation() {
    let agent = ProfilePreferenceAgent::load(&fixture("profiles.json")).unwrap();
    let f = facade().with_preference_agent(Arc::new(agent));

    assert!(f.recommend_for_group(&[]).await.unwrap().is_empty());

    let group = vec!["minji".to_string(), "seoyeon".to_string(), "stranger".to_string()];
    let out = f.recommend_for_group(&group).await.unwrap();
    assert_eq!(out.len(), 10);
    assert!(
        out.windows(2)
            .all(|w| w[0].preference_score >= w[1].preference_score)
    );
}

#[tokio::test]
async fn chat_session_keeps_area_across_turns() {
    let f = facade();

    let first = f
        .recommend_for_message("web-1", "서면에서 회식 장소 추천해줘", 18, None)
        .await
        .unwrap();
    assert_eq!(first.situation, Situation::CompanyDinner);
    assert_eq!(first.criteria.area, Some(Area::Seomyeon));
    assert_eq!(first.recommendations[0].restaurant.name, "서면 삼겹살 대장");

    let second = f
        .recommend_for_message("web-1", "저렴한 데 없어?", 18, None)
        .await
        .unwrap();
    assert!(second.criteria.area_inherited);
    assert_eq!(second.criteria.max_price, Some(10_000));
    assert_eq!(names(&second.recommendations), vec!["개금밀면"]);

    let memory = f.sessions().get("web-1").unwrap();
    assert_eq!(memory.turns, 2);
    assert_eq!(memory.areas, vec![Area::Seomyeon]);
}

#[tokio::test]
async fn repeated_calls_are_identical() {
    let f = facade();
    let a = serde_json::to_string(&f.recommend_by_situation("브런치", None).await.unwrap()).unwrap();
    let b = serde_json::to_string(&f.recommend_by_situation("브런치", None).await.unwrap()).unwrap();
    assert_eq!(a, b);
}
