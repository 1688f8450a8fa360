//! Restaurant records and their fixed vocabularies.
//!
//! [`RestaurantRecord`] is the typed, read-only form held by the catalog.
//! [`RawRestaurant`] is the lenient shape accepted from JSON and CSV files:
//! every field is optional, numbers may arrive as strings, and features may
//! arrive either as a list or as one comma-separated string.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Area ─────────────────────────────────────────────────────────────────

/// Busan district tag.
///
/// The labels are the Korean names used by the keyword tables and the
/// scoring weight tables. Values outside this vocabulary are bucketed into
/// [`Area::Other`] (or the configured fallback) at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Area {
    #[serde(rename = "해운대")]
    Haeundae,
    #[serde(rename = "광안리")]
    Gwangalli,
    #[serde(rename = "서면")]
    Seomyeon,
    #[serde(rename = "전포")]
    Jeonpo,
    #[serde(rename = "남포동")]
    Nampo,
    #[serde(rename = "센텀시티")]
    CentumCity,
    #[serde(rename = "기장")]
    Gijang,
    #[serde(rename = "송정")]
    Songjeong,
    #[serde(rename = "부산역")]
    BusanStation,
    #[serde(rename = "동래")]
    Dongnae,
    #[serde(rename = "부산대")]
    PusanNationalUniv,
    #[serde(rename = "연산")]
    Yeonsan,
    #[serde(rename = "영도")]
    Yeongdo,
    #[serde(rename = "사하")]
    Saha,
    #[serde(rename = "기타")]
    Other,
}

impl Area {
    /// Every area, in declaration order.
    pub const ALL: [Area; 15] = [
        Area::Haeundae,
        Area::Gwangalli,
        Area::Seomyeon,
        Area::Jeonpo,
        Area::Nampo,
        Area::CentumCity,
        Area::Gijang,
        Area::Songjeong,
        Area::BusanStation,
        Area::Dongnae,
        Area::PusanNationalUniv,
        Area::Yeonsan,
        Area::Yeongdo,
        Area::Saha,
        Area::Other,
    ];

    /// Korean display label.
    pub fn label(self) -> &'static str {
        match self {
            Area::Haeundae => "해운대",
            Area::Gwangalli => "광안리",
            Area::Seomyeon => "서면",
            Area::Jeonpo => "전포",
            Area::Nampo => "남포동",
            Area::CentumCity => "센텀시티",
            Area::Gijang => "기장",
            Area::Songjeong => "송정",
            Area::BusanStation => "부산역",
            Area::Dongnae => "동래",
            Area::PusanNationalUniv => "부산대",
            Area::Yeonsan => "연산",
            Area::Yeongdo => "영도",
            Area::Saha => "사하",
            Area::Other => "기타",
        }
    }

    /// Exact (trimmed) label lookup.
    pub fn from_label(label: &str) -> Option<Area> {
        let label = label.trim();
        Area::ALL.into_iter().find(|a| a.label() == label)
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Category ─────────────────────────────────────────────────────────────

/// Cuisine category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "한식")]
    Korean,
    #[serde(rename = "일식")]
    Japanese,
    #[serde(rename = "중식")]
    Chinese,
    #[serde(rename = "양식")]
    Western,
    #[serde(rename = "해산물")]
    Seafood,
    #[serde(rename = "카페")]
    Cafe,
    #[serde(rename = "치킨")]
    Chicken,
    #[serde(rename = "분식")]
    Bunsik,
    #[serde(rename = "베이커리")]
    Bakery,
    #[serde(rename = "기타")]
    Other,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 10] = [
        Category::Korean,
        Category::Japanese,
        Category::Chinese,
        Category::Western,
        Category::Seafood,
        Category::Cafe,
        Category::Chicken,
        Category::Bunsik,
        Category::Bakery,
        Category::Other,
    ];

    /// Korean display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Korean => "한식",
            Category::Japanese => "일식",
            Category::Chinese => "중식",
            Category::Western => "양식",
            Category::Seafood => "해산물",
            Category::Cafe => "카페",
            Category::Chicken => "치킨",
            Category::Bunsik => "분식",
            Category::Bakery => "베이커리",
            Category::Other => "기타",
        }
    }

    /// Exact (trimmed) label lookup.
    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        Category::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── RestaurantRecord ─────────────────────────────────────────────────────

/// A restaurant as held by the catalog. Read-only after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRecord {
    /// Identifier, unique within one catalog snapshot.
    pub id: String,

    /// Restaurant name.
    pub name: String,

    /// Street address.
    #[serde(default)]
    pub address: String,

    /// District tag.
    pub area: Area,

    /// Cuisine category.
    pub category: Category,

    /// Average rating in `0.0..=5.0`.
    #[serde(default)]
    pub rating: f32,

    /// Number of reviews behind the rating.
    #[serde(default)]
    pub review_count: u32,

    /// Free-text price description, e.g. `"1만원~2만원"` or `"15,000원"`.
    #[serde(default)]
    pub price_range: String,

    /// Free-text feature tags ("주차", "룸", "24시간", ...).
    #[serde(default)]
    pub features: Vec<String>,

    /// Signature dish or menu summary.
    #[serde(default)]
    pub specialty: String,

    /// Free-text opening hours.
    #[serde(default)]
    pub business_hours: String,
}

impl RestaurantRecord {
    /// True if any feature tag contains any of `needles`.
    pub fn has_feature_like(&self, needles: &[&str]) -> bool {
        self.features
            .iter()
            .any(|f| needles.iter().any(|n| f.contains(n)))
    }

    /// True if the specialty text contains any of `needles`.
    pub fn specialty_contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.specialty.contains(n))
    }

    /// True if the business hours contain any of `needles`.
    pub fn hours_contain_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.business_hours.contains(n))
    }

    /// True if the record mentions `keyword` in its name, specialty,
    /// category label or any feature tag.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.name.contains(keyword)
            || self.specialty.contains(keyword)
            || self.category.label().contains(keyword)
            || self.features.iter().any(|f| f.contains(keyword))
    }
}

// ── RawRestaurant ────────────────────────────────────────────────────────

/// A field that may be a list of strings or one comma-separated string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    List(Vec<String>),
    Text(String),
}

impl StringOrList {
    /// Flatten into trimmed, non-empty entries.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            StringOrList::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            StringOrList::Text(text) => text
                .split([',', '|', '/'])
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

/// A numeric field that may arrive as a JSON number or as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    /// Numeric value, if the text form parses (commas are ignored).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(t) => t.trim().replace(',', "").parse().ok(),
        }
    }
}

/// Lenient on-disk restaurant shape accepted from JSON and CSV.
///
/// Both `snake_case` and `camelCase` keys are accepted, along with the
/// `menu` / `hours` spellings used by older data files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRestaurant {
    #[serde(default)]
    pub id: Option<NumberOrText>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default, alias = "district", alias = "region")]
    pub area: Option<String>,

    #[serde(default, alias = "type")]
    pub category: Option<String>,

    #[serde(default)]
    pub rating: Option<NumberOrText>,

    #[serde(default, alias = "reviewCount", alias = "reviews")]
    pub review_count: Option<NumberOrText>,

    #[serde(default, alias = "priceRange", alias = "price")]
    pub price_range: Option<String>,

    #[serde(default, alias = "tags")]
    pub features: Option<StringOrList>,

    #[serde(default, alias = "menu", alias = "signature")]
    pub specialty: Option<String>,

    #[serde(default, alias = "businessHours", alias = "hours")]
    pub business_hours: Option<String>,
}
