//! `ttugi catalog` -- inspect the loaded restaurant catalog.
//!
//! ```text
//! ttugi catalog stats
//! ttugi catalog list --area 서면 --category 한식
//! ```

use clap::{Args, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};

use ttugi_core::catalog::CatalogStats;
use ttugi_types::criteria::Criteria;
use ttugi_types::restaurant::{Area, Category, RestaurantRecord};

use super::{CommonArgs, build_facade};

/// Subcommands for `ttugi catalog`.
#[derive(Subcommand, Debug)]
pub enum CatalogAction {
    /// Counts per area and category.
    Stats,

    /// List restaurants, most popular first.
    List(ListArgs),
}

/// Arguments for `ttugi catalog list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only this area (Korean label, e.g. 해운대).
    #[arg(long)]
    pub area: Option<String>,

    /// Only this category (Korean label, e.g. 한식).
    #[arg(long)]
    pub category: Option<String>,

    /// Only restaurants mentioning this keyword.
    #[arg(short, long)]
    pub keyword: Option<String>,

    /// Maximum rows.
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

pub fn run(action: CatalogAction, common: &CommonArgs) -> anyhow::Result<()> {
    let facade = build_facade(common)?;
    let catalog = facade.catalog();
    match action {
        CatalogAction::Stats => {
            let stats = catalog.stats();
            if common.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
        CatalogAction::List(args) => {
            let criteria = list_criteria(&args)?;
            let rows = catalog.search(&criteria, args.limit);
            if common.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_records(&rows);
            }
        }
    }
    Ok(())
}

fn list_criteria(args: &ListArgs) -> anyhow::Result<Criteria> {
    let area = args
        .area
        .as_deref()
        .map(|label| {
            Area::from_label(label).ok_or_else(|| anyhow::anyhow!("unknown area: {label}"))
        })
        .transpose()?;
    let category = args
        .category
        .as_deref()
        .map(|label| {
            Category::from_label(label).ok_or_else(|| anyhow::anyhow!("unknown category: {label}"))
        })
        .transpose()?;
    Ok(Criteria {
        area,
        category,
        keyword: args.keyword.clone(),
        ..Criteria::default()
    })
}

fn print_stats(stats: &CatalogStats) {
    println!("Restaurants: {}", stats.total);
    println!("Average rating: {:.2}", stats.average_rating);

    let mut areas = Table::new();
    areas.load_preset(UTF8_FULL);
    areas.set_header(["AREA", "COUNT"]);
    for (area, count) in &stats.by_area {
        areas.add_row([area.to_string(), count.to_string()]);
    }
    println!("{areas}");

    let mut categories = Table::new();
    categories.load_preset(UTF8_FULL);
    categories.set_header(["CATEGORY", "COUNT"]);
    for (category, count) in &stats.by_category {
        categories.add_row([category.to_string(), count.to_string()]);
    }
    println!("{categories}");
}

fn print_records(rows: &[&RestaurantRecord]) {
    if rows.is_empty() {
        println!("No restaurants found.");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["ID", "NAME", "AREA", "CATEGORY", "RATING", "REVIEWS", "PRICE"]);
    for r in rows {
        table.add_row([
            r.id.clone(),
            r.name.clone(),
            r.area.to_string(),
            r.category.to_string(),
            format!("{:.1}", r.rating),
            r.review_count.to_string(),
            r.price_range.clone(),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(area: Option<&str>, category: Option<&str>) -> ListArgs {
        ListArgs {
            area: area.map(String::from),
            category: category.map(String::from),
            keyword: None,
            limit: 20,
        }
    }

    #[test]
    fn list_criteria_parses_labels() {
        let c = list_criteria(&args(Some("서면"), Some("한식"))).unwrap();
        assert_eq!(c.area, Some(Area::Seomyeon));
        assert_eq!(c.category, Some(Category::Korean));
    }

    #[test]
    fn list_criteria_rejects_unknown_labels() {
        assert!(list_criteria(&args(Some("뉴욕"), None)).is_err());
        assert!(list_criteria(&args(None, Some("멕시칸"))).is_err());
    }
}
