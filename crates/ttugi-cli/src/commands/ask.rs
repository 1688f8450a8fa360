//! `ttugi ask` and `ttugi analyze` -- free-text queries.
//!
//! `ask` runs each message as one chat turn in the same session, so later
//! messages inherit the area named in earlier ones:
//!
//! ```text
//! ttugi ask "서면에서 회식 장소 추천해줘" "저렴한 데 없어?"
//! ttugi analyze "해운대에서 회 먹고싶어" --hour 19
//! ```

use chrono::Timelike;
use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};

use ttugi_core::MessageRecommendation;
use ttugi_types::criteria::Criteria;

use super::{CommonArgs, build_facade, format_won, print_recommendations};

/// Arguments for `ttugi ask`.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// One or more messages, processed in order as chat turns.
    #[arg(required = true)]
    pub messages: Vec<String>,

    /// Hour of day (0-23) instead of the local clock.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..24))]
    pub hour: Option<u8>,

    /// Session id carrying memory between turns.
    #[arg(short, long, default_value = "cli")]
    pub session: String,

    /// Signed-in user id for personalization.
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Arguments for `ttugi analyze`.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Message to analyze.
    pub text: String,

    /// Hour of day (0-23) instead of the local clock.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..24))]
    pub hour: Option<u8>,
}

fn current_hour(hour: Option<u8>) -> u8 {
    hour.unwrap_or_else(|| chrono::Local::now().hour() as u8)
}

pub async fn run_ask(args: AskArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let facade = build_facade(common)?;
    let hour = current_hour(args.hour);

    let mut turns: Vec<MessageRecommendation> = Vec::with_capacity(args.messages.len());
    for message in &args.messages {
        let turn = facade
            .recommend_for_message(&args.session, message, hour, args.user.as_deref())
            .await?;
        if !common.json {
            println!("> {message}");
            println!("{}", describe(&turn.criteria));
            println!("situation: {}", turn.situation);
            if turn.fell_back {
                println!("(no exact match, showing best overall)");
            }
            print_recommendations(&turn.recommendations, false)?;
        }
        turns.push(turn);
    }

    if common.json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
    }
    Ok(())
}

pub fn run_analyze(args: AnalyzeArgs, common: &CommonArgs) -> anyhow::Result<()> {
    let facade = build_facade(common)?;
    let criteria = facade
        .analyzer()
        .analyze(&args.text, current_hour(args.hour), None);

    if common.json {
        println!("{}", serde_json::to_string_pretty(&criteria)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["FIELD", "VALUE"]);
    for (field, value) in criteria_rows(&criteria) {
        table.add_row([field.to_string(), value]);
    }
    println!("{table}");
    Ok(())
}

fn criteria_rows(c: &Criteria) -> Vec<(&'static str, String)> {
    fn or_dash<T: ToString>(v: Option<T>) -> String {
        v.map_or_else(|| "-".into(), |v| v.to_string())
    }
    let area = match (c.area, c.area_inherited) {
        (Some(a), true) => format!("{a} (from session)"),
        (area, _) => or_dash(area),
    };
    vec![
        ("area", area),
        ("category", or_dash(c.category)),
        ("keyword", or_dash(c.keyword.as_deref())),
        ("meal time", or_dash(c.meal_time.map(|m| format!("{m:?}")))),
        ("hour", c.time_hour.to_string()),
        ("budget", or_dash(c.budget.map(|b| format!("{b:?}")))),
        ("situation", or_dash(c.situation)),
        ("max price", or_dash(c.max_price.map(format_won))),
    ]
}

/// One-line summary of the extracted criteria.
fn describe(c: &Criteria) -> String {
    let parts: Vec<String> = criteria_rows(c)
        .into_iter()
        .filter(|(_, v)| v != "-")
        .map(|(k, v)| format!("{k}={v}"))
        .collect();
    parts.join(" ")
}
