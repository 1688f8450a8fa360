//! In-memory restaurant catalog.
//!
//! [`RestaurantCatalog`] is populated once at startup from a JSON or CSV
//! file and never mutated afterwards; recommendation code shares it behind
//! an `Arc`. Loading normalizes the lenient on-disk shape into typed
//! [`RestaurantRecord`]s:
//!
//! - records without a name are dropped;
//! - unknown areas are resolved from the address, then fall back to the
//!   configured default area;
//! - unknown categories fall back to the configured default category;
//! - ratings are clamped to `0.0..=5.0`;
//! - exact `(name, address)` duplicates keep their first occurrence;
//! - duplicate ids are suffixed (`"12"`, `"12-2"`, ...).

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use ttugi_types::config::{CatalogConfig, DEFAULT_PRICE_WON};
use ttugi_types::criteria::Criteria;
use ttugi_types::error::{Result, TtugiError};
use ttugi_types::restaurant::{Area, Category, NumberOrText, RawRestaurant, RestaurantRecord};

use crate::price::min_price_or;

/// Top-level JSON shapes accepted for a catalog file.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<RawRestaurant>),
    Wrapped { restaurants: Vec<RawRestaurant> },
}

/// Per-area and per-category counts for a catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub by_area: BTreeMap<Area, usize>,
    pub by_category: BTreeMap<Category, usize>,
    pub average_rating: f32,
}

/// Read-only restaurant collection.
#[derive(Debug, Clone, Default)]
pub struct RestaurantCatalog {
    records: Vec<RestaurantRecord>,
    default_price: u32,
}

impl RestaurantCatalog {
    /// Build a catalog from already-typed records.
    ///
    /// Ratings are clamped and duplicate ids are suffixed; no other
    /// normalization is applied.
    pub fn new(records: Vec<RestaurantRecord>) -> Self {
        let mut seen = HashSet::new();
        let records = records
            .into_iter()
            .map(|mut r| {
                r.rating = clamp_rating(f64::from(r.rating));
                r.id = unique_id(&mut seen, r.id);
                r
            })
            .collect();
        Self {
            records,
            default_price: DEFAULT_PRICE_WON,
        }
    }

    /// Normalize raw on-disk rows into a catalog.
    pub fn from_raw(rows: Vec<RawRestaurant>, defaults: &CatalogConfig) -> Self {
        let mut seen_ids = HashSet::new();
        let mut seen_places: HashSet<(String, String)> = HashSet::new();
        let mut records = Vec::with_capacity(rows.len());

        for (index, row) in rows.into_iter().enumerate() {
            let Some(record) = normalize(index, row, defaults) else {
                warn!(row = index, "skipping catalog row without a name");
                continue;
            };

            let place = (record.name.clone(), record.address.clone());
            if !seen_places.insert(place) {
                warn!(
                    name = %record.name,
                    address = %record.address,
                    "dropping duplicate catalog entry"
                );
                continue;
            }

            let mut record = record;
            record.id = unique_id(&mut seen_ids, record.id);
            records.push(record);
        }

        Self {
            records,
            default_price: DEFAULT_PRICE_WON,
        }
    }

    /// Set the price assumed for records without a parseable price.
    pub fn with_default_price(mut self, default_price: u32) -> Self {
        self.default_price = default_price;
        self
    }

    /// Load a catalog, choosing the parser by file extension.
    pub fn load(path: &Path, defaults: &CatalogConfig) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let catalog = match extension.as_str() {
            "json" => Self::load_json(path, defaults)?,
            "csv" => Self::load_csv(path, defaults)?,
            _ => return Err(TtugiError::UnsupportedFormat { extension }),
        };
        info!(
            path = %path.display(),
            records = catalog.len(),
            "restaurant catalog loaded"
        );
        Ok(catalog)
    }

    /// Load a JSON catalog (an array of records or `{"restaurants": [...]}`).
    pub fn load_json(path: &Path, defaults: &CatalogConfig) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TtugiError::CatalogLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content, defaults).map_err(|e| TtugiError::CatalogLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse a JSON catalog from a string.
    pub fn from_json_str(content: &str, defaults: &CatalogConfig) -> Result<Self> {
        let rows = match serde_json::from_str::<CatalogFile>(content)? {
            CatalogFile::List(rows) => rows,
            CatalogFile::Wrapped { restaurants } => restaurants,
        };
        Ok(Self::from_raw(rows, defaults))
    }

    /// Load a CSV catalog with a header row.
    pub fn load_csv(path: &Path, defaults: &CatalogConfig) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| TtugiError::CatalogLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_csv_reader(file, defaults).map_err(|e| match e {
            TtugiError::CatalogLoad { reason, .. } => TtugiError::CatalogLoad {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse a CSV catalog from any reader.
    pub fn from_csv_reader<R: Read>(reader: R, defaults: &CatalogConfig) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut rows = Vec::new();
        for (line, result) in rdr.deserialize::<RawRestaurant>().enumerate() {
            let row = result.map_err(|e| TtugiError::CatalogLoad {
                path: "<csv>".into(),
                reason: format!("row {}: {e}", line + 1),
            })?;
            rows.push(row);
        }
        Ok(Self::from_raw(rows, defaults))
    }

    /// All records in catalog order.
    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the catalog has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Price assumed for records without a parseable price.
    pub fn default_price(&self) -> u32 {
        self.default_price
    }

    /// Look a record up by id.
    pub fn get(&self, id: &str) -> Option<&RestaurantRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Minimum price of a record, with the catalog default applied.
    pub fn min_price(&self, record: &RestaurantRecord) -> u32 {
        min_price_or(&record.price_range, self.default_price)
    }

    /// Records matching every set criteria field, in catalog order.
    ///
    /// Area and category match exactly; the keyword matches name,
    /// specialty, category label or any feature tag; `max_price` bounds the
    /// parsed minimum price. Time, sentiment and situation do not filter.
    pub fn find(&self, criteria: &Criteria) -> Vec<&RestaurantRecord> {
        self.records
            .iter()
            .filter(|r| criteria.area.is_none_or(|a| r.area == a))
            .filter(|r| criteria.category.is_none_or(|c| r.category == c))
            .filter(|r| {
                criteria
                    .keyword
                    .as_deref()
                    .is_none_or(|kw| r.mentions(kw))
            })
            .filter(|r| criteria.max_price.is_none_or(|max| self.min_price(r) <= max))
            .collect()
    }

    /// [`find`](Self::find) ordered by rating, then review count, truncated
    /// to `limit`. Equal records keep catalog order.
    pub fn search(&self, criteria: &Criteria, limit: usize) -> Vec<&RestaurantRecord> {
        let mut hits = self.find(criteria);
        sort_by_popularity(&mut hits);
        hits.truncate(limit);
        debug!(
            area = ?criteria.area,
            category = ?criteria.category,
            keyword = ?criteria.keyword,
            max_price = ?criteria.max_price,
            hits = hits.len(),
            "catalog search"
        );
        hits
    }

    /// Highest rated records, ties broken by review count then catalog
    /// order.
    pub fn top_rated(&self, limit: usize) -> Vec<&RestaurantRecord> {
        let mut all: Vec<&RestaurantRecord> = self.records.iter().collect();
        sort_by_popularity(&mut all);
        all.truncate(limit);
        all
    }

    /// Counts per area and category.
    pub fn stats(&self) -> CatalogStats {
        let mut by_area = BTreeMap::new();
        let mut by_category = BTreeMap::new();
        let mut rating_sum = 0.0f64;
        for r in &self.records {
            *by_area.entry(r.area).or_insert(0) += 1;
            *by_category.entry(r.category).or_insert(0) += 1;
            rating_sum += f64::from(r.rating);
        }
        let average_rating = if self.records.is_empty() {
            0.0
        } else {
            (rating_sum / self.records.len() as f64) as f32
        };
        CatalogStats {
            total: self.records.len(),
            by_area,
            by_category,
            average_rating,
        }
    }
}

/// Stable sort: rating descending, then review count descending.
pub(crate) fn sort_by_popularity(records: &mut [&RestaurantRecord]) {
    records.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| b.review_count.cmp(&a.review_count))
    });
}

fn clamp_rating(raw: f64) -> f32 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 5.0) as f32
}

fn unique_id(seen: &mut HashSet<String>, id: String) -> String {
    if seen.insert(id.clone()) {
        return id;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{id}-{n}");
        if seen.insert(candidate.clone()) {
            warn!(original = %id, renamed = %candidate, "duplicate restaurant id");
            return candidate;
        }
        n += 1;
    }
}

fn id_text(id: &NumberOrText) -> String {
    match id {
        NumberOrText::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
        NumberOrText::Number(n) => n.to_string(),
        NumberOrText::Text(t) => t.trim().to_string(),
    }
}

fn resolve_area(raw: Option<&str>, address: &str, fallback: Area) -> Area {
    if let Some(area) = raw.and_then(Area::from_label) {
        return area;
    }
    // "해운대구", "부산 해운대구 우동" and similar spellings.
    let haystacks = [raw.unwrap_or(""), address];
    for text in haystacks {
        if let Some(area) = Area::ALL
            .into_iter()
            .filter(|a| *a != Area::Other)
            .find(|a| text.contains(a.label()))
        {
            return area;
        }
    }
    fallback
}

fn resolve_category(raw: Option<&str>, fallback: Category) -> Category {
    let Some(raw) = raw else {
        return fallback;
    };
    if let Some(category) = Category::from_label(raw) {
        return category;
    }
    // "한식 > 국밥", "카페/디저트" and similar compound labels.
    match Category::ALL.into_iter().find(|c| raw.contains(c.label())) {
        Some(category) => category,
        None => {
            debug!(category = raw, fallback = %fallback, "unknown category, using fallback");
            fallback
        }
    }
}

fn normalize(index: usize, row: RawRestaurant, defaults: &CatalogConfig) -> Option<RestaurantRecord> {
    let name = row.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;
    let address = row.address.map(|a| a.trim().to_string()).unwrap_or_default();

    let id = row
        .id
        .as_ref()
        .map(id_text)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| (index + 1).to_string());

    let area = resolve_area(row.area.as_deref(), &address, defaults.default_area);
    let category = resolve_category(row.category.as_deref(), defaults.default_category);

    let rating = clamp_rating(row.rating.as_ref().and_then(NumberOrText::as_f64).unwrap_or(0.0));
    let review_count = row
        .review_count
        .as_ref()
        .and_then(NumberOrText::as_f64)
        .filter(|n| n.is_finite())
        .map(|n| n.clamp(0.0, f64::from(u32::MAX)) as u32)
        .unwrap_or(0);

    Some(RestaurantRecord {
        id,
        name,
        address,
        area,
        category,
        rating,
        review_count,
        price_range: row.price_range.unwrap_or_default().trim().to_string(),
        features: row.features.map(|f| f.into_vec()).unwrap_or_default(),
        specialty: row.specialty.unwrap_or_default().trim().to_string(),
        business_hours: row.business_hours.unwrap_or_default().trim().to_string(),
    })
}
