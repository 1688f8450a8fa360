//! Keyword query analyzer.
//!
//! Turns a free-text chat message into [`Criteria`] by scanning ordered
//! keyword tables. No tokenizer, no morphological analysis: just
//! case-insensitive substring matching, where the first table entry that
//! occurs in the text wins. Table order is therefore priority order.
//!
//! Each field is classified through the [`TextClassifier`] trait so a
//! smarter matcher can replace one table without touching callers.
//!
//! Single-syllable words listed in [`STANDALONE_KEYWORDS`] only match as a
//! word of their own: 회 matches "회 먹고싶어", "회를" and "회?" but not
//! 회식 or 송년회.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use ttugi_types::criteria::{BudgetSentiment, Criteria, MealTime};
use ttugi_types::restaurant::{Area, Category};
use ttugi_types::session::SessionPreference;
use ttugi_types::situation::Situation;

/// Maps text to a single label, or `None` when nothing matches.
pub trait TextClassifier<L>: Send + Sync {
    fn classify(&self, text: &str) -> Option<L>;
}

/// An ordered `(keyword, label)` table. First keyword found in the text
/// wins.
pub struct KeywordTable<L: 'static> {
    entries: &'static [(&'static str, L)],
    standalone: &'static [&'static str],
    /// One slot per entry; `Some` for keywords matched as standalone words.
    patterns: OnceLock<Vec<Option<Regex>>>,
}

impl<L: 'static> KeywordTable<L> {
    /// Wrap a static table. Every keyword is a plain substring match.
    pub const fn new(entries: &'static [(&'static str, L)]) -> Self {
        Self::with_standalone(entries, &[])
    }

    /// Wrap a static table whose keywords listed in `standalone` only match
    /// as standalone words.
    pub const fn with_standalone(
        entries: &'static [(&'static str, L)],
        standalone: &'static [&'static str],
    ) -> Self {
        Self {
            entries,
            standalone,
            patterns: OnceLock::new(),
        }
    }

    /// The underlying entries, in priority order.
    pub fn entries(&self) -> &'static [(&'static str, L)] {
        self.entries
    }

    fn patterns(&self) -> &[Option<Regex>] {
        self.patterns.get_or_init(|| {
            self.entries
                .iter()
                .map(|(keyword, _)| {
                    self.standalone
                        .contains(keyword)
                        .then(|| standalone_pattern(keyword))
                })
                .collect()
        })
    }
}

impl<L: Clone + Send + Sync + 'static> TextClassifier<L> for KeywordTable<L> {
    fn classify(&self, text: &str) -> Option<L> {
        let haystack = text.to_lowercase();
        self.entries
            .iter()
            .zip(self.patterns())
            .find(|((keyword, _), pattern)| match pattern {
                Some(word) => word.is_match(&haystack),
                None => haystack.contains(keyword),
            })
            .map(|((_, label), _)| label.clone())
    }
}

/// Particles that may directly follow a standalone word ("회를", "빵이").
const PARTICLES: &str = "을를이가은는도랑와과만";

/// `word` with no Hangul syllable before it, followed by a particle, a
/// non-Hangul character or the end of the text.
fn standalone_pattern(word: &str) -> Regex {
    let pattern = format!(
        "(?:^|[^가-힣]){}(?:[{PARTICLES}]|[^가-힣]|$)",
        regex::escape(word)
    );
    Regex::new(&pattern).expect("standalone keyword pattern is a valid regex")
}

// ── Tables ───────────────────────────────────────────────────────────────

/// Keywords too short to match as substrings. 회 alone is raw fish, but it
/// also ends 송년회 and starts 회식.
pub const STANDALONE_KEYWORDS: &[&str] = &["회", "빵", "싼"];

/// Area keywords. Full district names come before nicknames.
pub const AREA_KEYWORDS: &[(&str, Area)] = &[
    ("해운대", Area::Haeundae),
    ("광안리", Area::Gwangalli),
    ("광안", Area::Gwangalli),
    ("민락", Area::Gwangalli),
    ("서면", Area::Seomyeon),
    ("전포", Area::Jeonpo),
    ("남포", Area::Nampo),
    ("자갈치", Area::Nampo),
    ("광복", Area::Nampo),
    ("센텀", Area::CentumCity),
    ("기장", Area::Gijang),
    ("송정", Area::Songjeong),
    ("부산역", Area::BusanStation),
    ("초량", Area::BusanStation),
    ("동래", Area::Dongnae),
    ("온천장", Area::Dongnae),
    ("부산대", Area::PusanNationalUniv),
    ("장전", Area::PusanNationalUniv),
    ("연산", Area::Yeonsan),
    ("영도", Area::Yeongdo),
    ("사하", Area::Saha),
    ("다대포", Area::Saha),
    ("하단", Area::Saha),
];

/// Category keywords. Seafood is checked before Korean so that "회" and
/// "장어" are not swallowed by generic Korean dish words.
pub const CATEGORY_KEYWORDS: &[(&str, Category)] = &[
    ("해산물", Category::Seafood),
    ("횟집", Category::Seafood),
    ("생선회", Category::Seafood),
    ("회", Category::Seafood),
    ("조개구이", Category::Seafood),
    ("장어", Category::Seafood),
    ("일식", Category::Japanese),
    ("초밥", Category::Japanese),
    ("스시", Category::Japanese),
    ("라멘", Category::Japanese),
    ("돈카츠", Category::Japanese),
    ("중식", Category::Chinese),
    ("중국집", Category::Chinese),
    ("짜장", Category::Chinese),
    ("짬뽕", Category::Chinese),
    ("양식", Category::Western),
    ("파스타", Category::Western),
    ("피자", Category::Western),
    ("스테이크", Category::Western),
    ("치킨", Category::Chicken),
    ("닭강정", Category::Chicken),
    ("분식", Category::Bunsik),
    ("떡볶이", Category::Bunsik),
    ("김밥", Category::Bunsik),
    ("베이커리", Category::Bakery),
    ("빵집", Category::Bakery),
    ("빵", Category::Bakery),
    ("카페", Category::Cafe),
    ("커피", Category::Cafe),
    ("디저트", Category::Cafe),
    ("한식", Category::Korean),
    ("국밥", Category::Korean),
    ("밀면", Category::Korean),
    ("삼겹살", Category::Korean),
    ("갈비", Category::Korean),
    ("고기", Category::Korean),
];

/// Specific dish keywords. Longer dish names come before their suffixes
/// ("돼지국밥" before "국밥", "곰장어" before "장어").
pub const DISH_KEYWORDS: &[(&str, &str)] = &[
    ("돼지국밥", "돼지국밥"),
    ("국밥", "국밥"),
    ("밀면", "밀면"),
    ("냉면", "냉면"),
    ("생선회", "회"),
    ("횟집", "회"),
    ("회", "회"),
    ("조개구이", "조개구이"),
    ("곰장어", "곰장어"),
    ("장어", "장어"),
    ("초밥", "초밥"),
    ("라멘", "라멘"),
    ("돈카츠", "돈카츠"),
    ("짜장", "짜장면"),
    ("짬뽕", "짬뽕"),
    ("파스타", "파스타"),
    ("피자", "피자"),
    ("스테이크", "스테이크"),
    ("삼겹살", "삼겹살"),
    ("갈비", "갈비"),
    ("족발", "족발"),
    ("보쌈", "보쌈"),
    ("떡볶이", "떡볶이"),
    ("어묵", "어묵"),
    ("씨앗호떡", "씨앗호떡"),
    ("칼국수", "칼국수"),
    ("파전", "파전"),
    ("빙수", "빙수"),
];

/// Meal-time synonyms.
pub const MEAL_KEYWORDS: &[(&str, MealTime)] = &[
    ("아침", MealTime::Breakfast),
    ("모닝", MealTime::Breakfast),
    ("점심", MealTime::Lunch),
    ("런치", MealTime::Lunch),
    ("저녁", MealTime::Dinner),
    ("디너", MealTime::Dinner),
    ("야식", MealTime::LateNight),
    ("새벽", MealTime::LateNight),
];

/// Price sentiment. Negated forms precede the bare word they contain.
pub const BUDGET_KEYWORDS: &[(&str, BudgetSentiment)] = &[
    ("비싸지 않", BudgetSentiment::Cheap),
    ("안 비싼", BudgetSentiment::Cheap),
    ("저렴", BudgetSentiment::Cheap),
    ("가성비", BudgetSentiment::Cheap),
    ("싸게", BudgetSentiment::Cheap),
    ("싼", BudgetSentiment::Cheap),
    ("비싼", BudgetSentiment::Premium),
    ("비싸", BudgetSentiment::Premium),
    ("고급", BudgetSentiment::Premium),
    ("럭셔리", BudgetSentiment::Premium),
];

/// Situation keywords. Partner words precede "친구" because "여자친구"
/// contains it.
pub const SITUATION_KEYWORDS: &[(&str, Situation)] = &[
    ("데이트", Situation::Date),
    ("여자친구", Situation::Date),
    ("남자친구", Situation::Date),
    ("애인", Situation::Date),
    ("기념일", Situation::SpecialDay),
    ("생일", Situation::SpecialDay),
    ("프로포즈", Situation::SpecialDay),
    ("특별한", Situation::SpecialDay),
    ("가족", Situation::FamilyGathering),
    ("부모님", Situation::FamilyGathering),
    ("아이랑", Situation::FamilyGathering),
    ("회식", Situation::CompanyDinner),
    ("동료", Situation::CompanyDinner),
    ("혼밥", Situation::SoloDining),
    ("혼자", Situation::SoloDining),
    ("친구", Situation::FriendsGathering),
    ("브런치", Situation::Brunch),
    ("야식", Situation::LateNight),
];

// ── Analyzer ─────────────────────────────────────────────────────────────

/// Free-text to [`Criteria`] analyzer.
pub struct QueryAnalyzer {
    areas: Box<dyn TextClassifier<Area>>,
    categories: Box<dyn TextClassifier<Category>>,
    dishes: Box<dyn TextClassifier<&'static str>>,
    meals: Box<dyn TextClassifier<MealTime>>,
    budgets: Box<dyn TextClassifier<BudgetSentiment>>,
    situations: Box<dyn TextClassifier<Situation>>,
}

impl QueryAnalyzer {
    /// Analyzer over the built-in keyword tables.
    pub fn new() -> Self {
        Self {
            areas: Box::new(KeywordTable::new(AREA_KEYWORDS)),
            categories: Box::new(KeywordTable::with_standalone(
                CATEGORY_KEYWORDS,
                STANDALONE_KEYWORDS,
            )),
            dishes: Box::new(KeywordTable::with_standalone(
                DISH_KEYWORDS,
                STANDALONE_KEYWORDS,
            )),
            meals: Box::new(KeywordTable::new(MEAL_KEYWORDS)),
            budgets: Box::new(KeywordTable::with_standalone(
                BUDGET_KEYWORDS,
                STANDALONE_KEYWORDS,
            )),
            situations: Box::new(KeywordTable::new(SITUATION_KEYWORDS)),
        }
    }

    /// Replace the area matcher.
    pub fn with_area_classifier(mut self, classifier: impl TextClassifier<Area> + 'static) -> Self {
        self.areas = Box::new(classifier);
        self
    }

    /// Replace the category matcher.
    pub fn with_category_classifier(
        mut self,
        classifier: impl TextClassifier<Category> + 'static,
    ) -> Self {
        self.categories = Box::new(classifier);
        self
    }

    /// Replace the dish keyword matcher.
    pub fn with_dish_classifier(
        mut self,
        classifier: impl TextClassifier<&'static str> + 'static,
    ) -> Self {
        self.dishes = Box::new(classifier);
        self
    }

    /// Extract criteria from `text`.
    ///
    /// `current_hour` (0-23, taken modulo 24) becomes `time_hour` unless the
    /// text names a meal time. When the text names no area, the most recent
    /// area from `session` is used and `area_inherited` is set.
    pub fn analyze(
        &self,
        text: &str,
        current_hour: u8,
        session: Option<&SessionPreference>,
    ) -> Criteria {
        let mut area = self.areas.classify(text);
        let mut area_inherited = false;
        if area.is_none()
            && let Some(previous) = session.and_then(SessionPreference::last_area)
        {
            area = Some(previous);
            area_inherited = true;
        }

        let meal_time = self.meals.classify(text);
        let time_hour = meal_time.map_or(current_hour % 24, MealTime::hour);

        let criteria = Criteria {
            area,
            area_inherited,
            category: self.categories.classify(text),
            keyword: self.dishes.classify(text).map(str::to_string),
            meal_time,
            time_hour,
            budget: self.budgets.classify(text),
            situation: self.situations.classify(text),
            max_price: None,
        };

        debug!(
            area = ?criteria.area,
            inherited = criteria.area_inherited,
            category = ?criteria.category,
            keyword = ?criteria.keyword,
            time_hour = criteria.time_hour,
            situation = ?criteria.situation,
            "query analyzed"
        );
        criteria
    }
}

impl Default for QueryAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haeundae_hoe_dinner() {
        let analyzer = QueryAnalyzer::new();
        let criteria = analyzer.analyze("해운대에서 회 먹고싶어", 19, None);
        assert_eq!(criteria.area, Some(Area::Haeundae));
        assert_eq!(criteria.category, Some(Category::Seafood));
        assert_eq!(criteria.keyword.as_deref(), Some("회"));
        assert_eq!(criteria.time_hour, 19);
        assert!(criteria.meal_time.is_none());
    }

    #[test]
    fn standalone_hoe_at_end_of_text() {
        let analyzer = QueryAnalyzer::new();
        let criteria = analyzer.analyze("광안리 회", 12, None);
        assert_eq!(criteria.keyword.as_deref(), Some("회"));
    }

    #[test]
    fn hoesik_is_not_raw_fish() {
        let analyzer = QueryAnalyzer::new();
        let criteria = analyzer.analyze("서면 회식 장소 추천해줘", 18, None);
        assert_eq!(criteria.area, Some(Area::Seomyeon));
        assert_eq!(criteria.category, None);
        assert_eq!(criteria.keyword, None);
        assert_eq!(criteria.situation, Some(Situation::CompanyDinner));
    }

    #[test]
    fn hoe_with_particle_or_punctuation() {
        let analyzer = QueryAnalyzer::new();
        for text in ["광안리 회를 먹고싶어", "해운대 회가 땡겨", "광안리 회?", "회"] {
            let criteria = analyzer.analyze(text, 19, None);
            assert_eq!(criteria.category, Some(Category::Seafood), "{text}");
            assert_eq!(criteria.keyword.as_deref(), Some("회"), "{text}");
        }
    }

    #[test]
    fn nouns_ending_in_hoe_are_not_raw_fish() {
        let analyzer = QueryAnalyzer::new();
        for text in ["송년회 장소 추천", "동창회 모임", "회의 끝나고 갈 곳"] {
            let criteria = analyzer.analyze(text, 19, None);
            assert_eq!(criteria.category, None, "{text}");
            assert_eq!(criteria.keyword, None, "{text}");
        }
    }

    #[test]
    fn bread_only_as_its_own_word() {
        let analyzer = QueryAnalyzer::new();
        assert_eq!(
            analyzer.analyze("빵이 맛있는 곳", 10, None).category,
            Some(Category::Bakery)
        );
        assert_eq!(analyzer.analyze("빵빠레 어때", 10, None).category, None);
    }

    #[test]
    fn cheap_is_not_read_inside_expensive() {
        let analyzer = QueryAnalyzer::new();
        assert_eq!(
            analyzer.analyze("제일 싼 곳", 12, None).budget,
            Some(BudgetSentiment::Cheap)
        );
        assert_eq!(
            analyzer.analyze("비싼 곳도 괜찮아", 12, None).budget,
            Some(BudgetSentiment::Premium)
        );
    }

    #[test]
    fn meal_keyword_overrides_current_hour() {
        let analyzer = QueryAnalyzer::new();
        let criteria = analyzer.analyze("점심에 밀면 어때", 21, None);
        assert_eq!(criteria.meal_time, Some(MealTime::Lunch));
        assert_eq!(criteria.time_hour, 12);
        assert_eq!(criteria.keyword.as_deref(), Some("밀면"));
        assert_eq!(criteria.category, Some(Category::Korean));
    }

    #[test]
    fn current_hour_is_wrapped() {
        let analyzer = QueryAnalyzer::new();
        assert_eq!(analyzer.analyze("아무거나", 25, None).time_hour, 1);
    }

    #[test]
    fn first_area_in_table_order_wins() {
        let analyzer = QueryAnalyzer::new();
        // 센텀 appears first in the text, but 해운대 has table priority.
        let criteria = analyzer.analyze("센텀이나 해운대 근처", 12, None);
        assert_eq!(criteria.area, Some(Area::Haeundae));
    }

    #[test]
    fn longer_dish_name_wins() {
        let analyzer = QueryAnalyzer::new();
        let criteria = analyzer.analyze("돼지국밥 맛집", 12, None);
        assert_eq!(criteria.keyword.as_deref(), Some("돼지국밥"));
    }

    #[test]
    fn negated_expensive_is_cheap() {
        let analyzer = QueryAnalyzer::new();
        assert_eq!(
            analyzer.analyze("비싸지 않은 곳", 12, None).budget,
            Some(BudgetSentiment::Cheap)
        );
        assert_eq!(
            analyzer.analyze("좀 비싸도 괜찮아", 12, None).budget,
            Some(BudgetSentiment::Premium)
        );
        assert_eq!(
            analyzer.analyze("저렴한 곳", 12, None).budget,
            Some(BudgetSentiment::Cheap)
        );
    }

    #[test]
    fn girlfriend_is_date_not_friends() {
        let analyzer = QueryAnalyzer::new();
        let criteria = analyzer.analyze("여자친구랑 갈만한 곳", 19, None);
        assert_eq!(criteria.situation, Some(Situation::Date));
    }

    #[test]
    fn session_area_is_inherited() {
        let analyzer = QueryAnalyzer::new();
        let session = SessionPreference {
            areas: vec![Area::Seomyeon, Area::Nampo],
            ..SessionPreference::default()
        };
        let criteria = analyzer.analyze("국밥 먹고싶다", 12, Some(&session));
        assert_eq!(criteria.area, Some(Area::Nampo));
        assert!(criteria.area_inherited);
    }

    #[test]
    fn explicit_area_beats_session() {
        let analyzer = QueryAnalyzer::new();
        let session = SessionPreference {
            areas: vec![Area::Nampo],
            ..SessionPreference::default()
        };
        let criteria = analyzer.analyze("기장 장어", 12, Some(&session));
        assert_eq!(criteria.area, Some(Area::Gijang));
        assert!(!criteria.area_inherited);
        assert_eq!(criteria.category, Some(Category::Seafood));
    }

    #[test]
    fn nothing_matches() {
        let analyzer = QueryAnalyzer::default();
        let criteria = analyzer.analyze("안녕하세요", 9, None);
        assert!(criteria.is_unconstrained());
        assert_eq!(criteria.time_hour, 9);
        assert!(criteria.situation.is_none());
    }

    #[test]
    fn empty_text() {
        let analyzer = QueryAnalyzer::new();
        let criteria = analyzer.analyze("", 0, None);
        assert!(criteria.is_unconstrained());
    }

    #[test]
    fn matching_is_case_insensitive() {
        static BRUNCH: &[(&str, Category)] = &[("brunch", Category::Cafe)];
        let analyzer = QueryAnalyzer::new().with_category_classifier(KeywordTable::new(BRUNCH));
        let criteria = analyzer.analyze("BRUNCH spot", 10, None);
        assert_eq!(criteria.category, Some(Category::Cafe));
    }

    #[test]
    fn custom_classifier_can_replace_a_table() {
        struct AlwaysYeongdo;
        impl TextClassifier<Area> for AlwaysYeongdo {
            fn classify(&self, _text: &str) -> Option<Area> {
                Some(Area::Yeongdo)
            }
        }
        let analyzer = QueryAnalyzer::new().with_area_classifier(AlwaysYeongdo);
        let criteria = analyzer.analyze("해운대", 12, None);
        assert_eq!(criteria.area, Some(Area::Yeongdo));
    }
}
