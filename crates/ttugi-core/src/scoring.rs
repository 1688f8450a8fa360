//! Situational scoring.
//!
//! Every situation owns a hand-tuned [`WeightTable`]: a list of independent
//! bonuses plus a rating multiplier. A record's score is the plain sum of
//! the bonuses it earns and `round(rating * rating_weight)`. Scores are
//! non-negative integers and are only comparable within one situation.
//!
//! Ranking uses a stable sort on the score alone, so records with equal
//! scores keep the order in which they were supplied (catalog order).

use serde::Serialize;
use tracing::debug;

use ttugi_types::config::ScoringConfig;
use ttugi_types::restaurant::{Area, Category, RestaurantRecord};
use ttugi_types::situation::Situation;

use crate::price::min_price_or;

// ── Rules ────────────────────────────────────────────────────────────────

/// One boolean test against a restaurant record.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Category is one of these.
    Category(&'static [Category]),
    /// Any feature tag contains any of these substrings.
    Feature(&'static [&'static str]),
    /// Specialty text contains any of these substrings.
    Specialty(&'static [&'static str]),
    /// Business hours contain any of these substrings.
    Hours(&'static [&'static str]),
    /// A feature tag or the business hours contain any of these.
    FeatureOrHours(&'static [&'static str]),
    /// Area is one of these.
    Area(&'static [Area]),
    /// Parsed minimum price is at most this many won.
    PriceAtMost(u32),
    /// Parsed minimum price is at least this many won.
    PriceAtLeast(u32),
    /// At least this many reviews.
    ReviewsAtLeast(u32),
}

impl Rule {
    fn matches(&self, record: &RestaurantRecord, min_price: u32) -> bool {
        match *self {
            Rule::Category(categories) => categories.contains(&record.category),
            Rule::Feature(needles) => record.has_feature_like(needles),
            Rule::Specialty(needles) => record.specialty_contains_any(needles),
            Rule::Hours(needles) => record.hours_contain_any(needles),
            Rule::FeatureOrHours(needles) => {
                record.has_feature_like(needles) || record.hours_contain_any(needles)
            }
            Rule::Area(areas) => areas.contains(&record.area),
            Rule::PriceAtMost(max) => min_price <= max,
            Rule::PriceAtLeast(min) => min_price >= min,
            Rule::ReviewsAtLeast(n) => record.review_count >= n,
        }
    }
}

/// A named bonus: `points` are added when `rule` matches.
#[derive(Debug, Clone, Copy)]
pub struct Bonus {
    pub label: &'static str,
    pub rule: Rule,
    pub points: i64,
}

const fn bonus(label: &'static str, rule: Rule, points: i64) -> Bonus {
    Bonus { label, rule, points }
}

/// Weight table for one situation.
#[derive(Debug)]
pub struct WeightTable {
    pub situation: Situation,
    /// Multiplier applied to the 0-5 rating.
    pub rating_weight: f32,
    pub bonuses: &'static [Bonus],
}

// ── Tables ───────────────────────────────────────────────────────────────

const VIEW: &[&str] = &["뷰", "야경"];
const PRIVATE_ROOM: &[&str] = &["룸", "프라이빗"];

static DATE: WeightTable = WeightTable {
    situation: Situation::Date,
    rating_weight: 10.0,
    bonuses: &[
        bonus("양식/일식/카페", Rule::Category(&[Category::Western, Category::Japanese, Category::Cafe]), 30),
        bonus("뷰/야경", Rule::Feature(VIEW), 25),
        bonus("분위기", Rule::Feature(&["분위기", "로맨틱", "인스타"]), 15),
        bonus("프라이빗", Rule::Feature(PRIVATE_ROOM), 10),
        bonus("바다 데이트 코스", Rule::Area(&[Area::Gwangalli, Area::Haeundae]), 15),
        bonus("핫플", Rule::Area(&[Area::Jeonpo, Area::CentumCity]), 10),
        bonus("적당한 가격대", Rule::PriceAtLeast(15_000), 10),
    ],
};

static FAMILY_GATHERING: WeightTable = WeightTable {
    situation: Situation::FamilyGathering,
    rating_weight: 10.0,
    bonuses: &[
        bonus("한식", Rule::Category(&[Category::Korean]), 30),
        bonus("중식/해산물", Rule::Category(&[Category::Chinese, Category::Seafood]), 20),
        bonus("주차", Rule::Feature(&["주차"]), 25),
        bonus("단체석", Rule::Feature(&["룸", "단체", "좌석"]), 20),
        bonus("아이 동반", Rule::Feature(&["놀이방", "키즈", "유아"]), 15),
        bonus("검증된 곳", Rule::ReviewsAtLeast(100), 10),
    ],
};

static COMPANY_DINNER: WeightTable = WeightTable {
    situation: Situation::CompanyDinner,
    rating_weight: 10.0,
    bonuses: &[
        bonus("한식", Rule::Category(&[Category::Korean]), 30),
        bonus("중식/해산물", Rule::Category(&[Category::Chinese, Category::Seafood]), 15),
        bonus("단체", Rule::Feature(&["단체"]), 30),
        bonus("룸", Rule::Feature(&["룸"]), 20),
        bonus("주차", Rule::Feature(&["주차"]), 10),
        bonus("고기", Rule::Specialty(&["삼겹살", "고기", "갈비", "소고기", "곱창"]), 20),
    ],
};

static SOLO_DINING: WeightTable = WeightTable {
    situation: Situation::SoloDining,
    rating_weight: 10.0,
    bonuses: &[
        bonus("분식", Rule::Category(&[Category::Bunsik]), 30),
        bonus("일식", Rule::Category(&[Category::Japanese]), 20),
        bonus("한식", Rule::Category(&[Category::Korean]), 15),
        bonus("카페", Rule::Category(&[Category::Cafe]), 10),
        bonus("혼밥석", Rule::Feature(&["혼밥", "1인", "바 좌석"]), 30),
        bonus("만원 이하", Rule::PriceAtMost(10_000), 25),
        bonus("부담 없는 가격", Rule::PriceAtMost(15_000), 10),
    ],
};

static FRIENDS_GATHERING: WeightTable = WeightTable {
    situation: Situation::FriendsGathering,
    rating_weight: 10.0,
    bonuses: &[
        bonus("치킨", Rule::Category(&[Category::Chicken]), 30),
        bonus("양식", Rule::Category(&[Category::Western]), 20),
        bonus("한식", Rule::Category(&[Category::Korean]), 15),
        bonus("단체", Rule::Feature(&["단체"]), 15),
        bonus("술 한잔", Rule::Feature(&["술", "맥주", "호프", "포차"]), 20),
        bonus("번화가", Rule::Area(&[Area::Seomyeon, Area::Jeonpo]), 15),
        bonus("놀거리", Rule::Area(&[Area::Gwangalli, Area::PusanNationalUniv]), 10),
    ],
};

static SPECIAL_DAY: WeightTable = WeightTable {
    situation: Situation::SpecialDay,
    rating_weight: 15.0,
    bonuses: &[
        bonus("양식", Rule::Category(&[Category::Western]), 35),
        bonus("일식", Rule::Category(&[Category::Japanese]), 25),
        bonus("뷰/야경", Rule::Feature(VIEW), 25),
        bonus("코스 요리", Rule::Feature(&["코스", "오마카세"]), 25),
        bonus("시그니처", Rule::Specialty(&["코스", "오마카세", "스테이크"]), 15),
        bonus("프라이빗", Rule::Feature(PRIVATE_ROOM), 15),
        bonus("고급", Rule::PriceAtLeast(50_000), 20),
    ],
};

static BRUNCH: WeightTable = WeightTable {
    situation: Situation::Brunch,
    rating_weight: 10.0,
    bonuses: &[
        bonus("카페/베이커리", Rule::Category(&[Category::Cafe, Category::Bakery]), 35),
        bonus("양식", Rule::Category(&[Category::Western]), 20),
        bonus("브런치", Rule::Feature(&["브런치"]), 30),
        bonus("브런치 메뉴", Rule::Specialty(&["브런치", "샌드위치", "팬케이크", "베이글"]), 20),
        bonus("테라스/뷰", Rule::Feature(&["테라스", "뷰"]), 15),
        bonus("이른 오픈", Rule::Hours(&["07:", "08:", "09:"]), 10),
    ],
};

static LATE_NIGHT: WeightTable = WeightTable {
    situation: Situation::LateNight,
    rating_weight: 10.0,
    bonuses: &[
        bonus("치킨", Rule::Category(&[Category::Chicken]), 35),
        bonus("분식", Rule::Category(&[Category::Bunsik]), 25),
        bonus("한식", Rule::Category(&[Category::Korean]), 15),
        bonus("심야 영업", Rule::FeatureOrHours(&["24시간", "심야", "새벽"]), 30),
        bonus("야식 메뉴", Rule::Specialty(&["족발", "보쌈", "국밥", "곱창"]), 15),
    ],
};

/// Weight table for a situation; `None` for [`Situation::General`].
pub fn weight_table(situation: Situation) -> Option<&'static WeightTable> {
    match situation {
        Situation::Date => Some(&DATE),
        Situation::FamilyGathering => Some(&FAMILY_GATHERING),
        Situation::CompanyDinner => Some(&COMPANY_DINNER),
        Situation::SoloDining => Some(&SOLO_DINING),
        Situation::FriendsGathering => Some(&FRIENDS_GATHERING),
        Situation::SpecialDay => Some(&SPECIAL_DAY),
        Situation::Brunch => Some(&BRUNCH),
        Situation::LateNight => Some(&LATE_NIGHT),
        Situation::General => None,
    }
}

// ── Output ───────────────────────────────────────────────────────────────

/// A restaurant annotated with how it was ranked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(flatten)]
    pub restaurant: RestaurantRecord,

    /// Situation whose table produced `score`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation: Option<Situation>,

    /// Situational score; `None` for unscored (general) lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,

    /// Preference score from the preference agent, when one was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference_score: Option<f64>,

    /// Labels of the bonuses that fired.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<&'static str>,
}

impl Recommendation {
    /// An unscored entry.
    pub fn unscored(restaurant: RestaurantRecord) -> Self {
        Self {
            restaurant,
            situation: None,
            score: None,
            preference_score: None,
            reasons: Vec::new(),
        }
    }

    /// Restaurant id shortcut.
    pub fn id(&self) -> &str {
        &self.restaurant.id
    }
}

// ── Engine ───────────────────────────────────────────────────────────────

/// Applies weight tables to records.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    default_price: u32,
    top_n: usize,
}

impl ScoringEngine {
    /// Engine using the configured default price and top-N.
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            default_price: config.default_price,
            top_n: config.top_n,
        }
    }

    /// Number of results [`rank`](Self::rank) keeps.
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Score one record, returning the total and the labels that fired.
    ///
    /// [`Situation::General`] has no table and scores `0`.
    pub fn score_detailed(
        &self,
        situation: Situation,
        record: &RestaurantRecord,
    ) -> (i64, Vec<&'static str>) {
        let Some(table) = weight_table(situation) else {
            return (0, Vec::new());
        };
        let min_price = min_price_or(&record.price_range, self.default_price);
        let mut total = (record.rating * table.rating_weight).round() as i64;
        let mut reasons = Vec::new();
        for b in table.bonuses {
            if b.rule.matches(record, min_price) {
                total += b.points;
                reasons.push(b.label);
            }
        }
        (total, reasons)
    }

    /// Score one record.
    pub fn score(&self, situation: Situation, record: &RestaurantRecord) -> i64 {
        self.score_detailed(situation, record).0
    }

    /// Score, stable-sort descending and keep the top N.
    pub fn rank<'a, I>(&self, situation: Situation, records: I) -> Vec<Recommendation>
    where
        I: IntoIterator<Item = &'a RestaurantRecord>,
    {
        self.rank_with_limit(situation, records, self.top_n)
    }

    /// [`rank`](Self::rank) with an explicit limit.
    pub fn rank_with_limit<'a, I>(
        &self,
        situation: Situation,
        records: I,
        limit: usize,
    ) -> Vec<Recommendation>
    where
        I: IntoIterator<Item = &'a RestaurantRecord>,
    {
        let mut ranked: Vec<Recommendation> = records
            .into_iter()
            .map(|record| {
                let (score, reasons) = self.score_detailed(situation, record);
                Recommendation {
                    restaurant: record.clone(),
                    situation: Some(situation),
                    score: Some(score),
                    preference_score: None,
                    reasons,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked.truncate(limit);

        debug!(
            situation = %situation,
            kept = ranked.len(),
            top_score = ?ranked.first().and_then(|r| r.score),
            "ranked by situation"
        );
        ranked
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}
