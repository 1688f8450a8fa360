//! `ttugi recommend|weather|budget|now|group` -- ranked lists.
//!
//! # Examples
//!
//! ```text
//! ttugi recommend 데이트
//! ttugi recommend 회식 --user minji --limit 5
//! ttugi weather "비 오는 날"
//! ttugi budget 8000
//! ttugi now --hour 22
//! ttugi group minji junho seoyeon
//! ```

use clap::Args;

use ttugi_core::price::PriceBucket;
use ttugi_core::weather::TimeWindow;

use super::{CommonArgs, build_facade, format_won, print_recommendations};

/// Arguments for `ttugi recommend`.
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Situation tag (데이트, 가족모임, 회식, 혼밥, 친구모임, 특별한날,
    /// 브런치, 야식). Anything else ranks by rating.
    pub situation: String,

    /// Signed-in user id for personalization.
    #[arg(short, long)]
    pub user: Option<String>,

    /// Number of results (defaults to `scoring.top_n`).
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for `ttugi weather`.
#[derive(Args, Debug)]
pub struct WeatherArgs {
    /// Weather description ("비", "더워", "맑음", ...).
    pub weather: String,
}

/// Arguments for `ttugi budget`.
#[derive(Args, Debug)]
pub struct BudgetArgs {
    /// Budget per person, in won.
    pub won: u32,
}

/// Arguments for `ttugi now`.
#[derive(Args, Debug)]
pub struct NowArgs {
    /// Hour of day (0-23) instead of the local clock.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..24))]
    pub hour: Option<u8>,
}

/// Arguments for `ttugi group`.
#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Member user ids.
    pub users: Vec<String>,
}

pub async fn run_recommend(args: RecommendArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let facade = build_facade(common)?;
    let limit = args.limit.unwrap_or(facade.config().scoring.top_n);
    let list = facade
        .recommend_by_situation_with_limit(&args.situation, args.user.as_deref(), limit)
        .await?;
    print_recommendations(&list, common.json)
}

pub fn run_weather(args: WeatherArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let facade = build_facade(common)?;
    let list = facade.recommend_by_weather(&args.weather);
    print_recommendations(&list, common.json)
}

pub fn run_budget(args: BudgetArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let facade = build_facade(common)?;
    let scoring = &facade.config().scoring;
    let bucket = PriceBucket::for_budget(args.won, scoring);
    if !common.json {
        match bucket.max_price(scoring) {
            Some(max) => println!(
                "{} budget {}: up to {}",
                bucket.label(),
                format_won(args.won),
                format_won(max)
            ),
            None => println!("{} budget {}: no upper bound", bucket.label(), format_won(args.won)),
        }
    }
    let list = facade.recommend_by_budget(args.won);
    print_recommendations(&list, common.json)
}

pub fn run_now(args: NowArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let facade = build_facade(common)?;
    let list = match args.hour {
        Some(hour) => {
            if !common.json {
                let window = TimeWindow::for_hour(hour);
                println!("{hour:02}:00 -> {}", window.situation());
            }
            facade.recommend_by_time_at(hour)
        }
        None => facade.recommend_by_time(),
    };
    print_recommendations(&list, common.json)
}

pub async fn run_group(args: GroupArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let facade = build_facade(common)?;
    let list = facade.recommend_for_group(&args.users).await?;
    print_recommendations(&list, common.json)
}
