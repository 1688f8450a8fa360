//! Weather and time-of-day hints.
//!
//! [`Weather`] maps a free-text weather description to dishes that suit
//! it. [`TimeWindow`] buckets an hour of day into one of five windows,
//! each tied to a dining situation.

use serde::{Deserialize, Serialize};

use ttugi_types::situation::Situation;

use crate::analyzer::{KeywordTable, TextClassifier};

/// Weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Rainy,
    Snowy,
    Hot,
    Cold,
    Cloudy,
    Clear,
}

/// Weather synonyms, checked in order. Snow before rain so "눈비" is snowy.
pub const WEATHER_KEYWORDS: &[(&str, Weather)] = &[
    ("눈", Weather::Snowy),
    ("snow", Weather::Snowy),
    ("비", Weather::Rainy),
    ("장마", Weather::Rainy),
    ("rain", Weather::Rainy),
    ("더워", Weather::Hot),
    ("더운", Weather::Hot),
    ("덥", Weather::Hot),
    ("폭염", Weather::Hot),
    ("hot", Weather::Hot),
    ("추워", Weather::Cold),
    ("추운", Weather::Cold),
    ("춥", Weather::Cold),
    ("한파", Weather::Cold),
    ("cold", Weather::Cold),
    ("흐림", Weather::Cloudy),
    ("흐린", Weather::Cloudy),
    ("cloud", Weather::Cloudy),
    ("맑", Weather::Clear),
    ("화창", Weather::Clear),
    ("sunny", Weather::Clear),
    ("clear", Weather::Clear),
];

static WEATHER_TABLE: KeywordTable<Weather> = KeywordTable::new(WEATHER_KEYWORDS);

impl Weather {
    /// Detect the weather named in `text`.
    pub fn detect(text: &str) -> Option<Weather> {
        WEATHER_TABLE.classify(text)
    }

    /// Dishes searched for this weather, in priority order.
    pub fn dishes(self) -> &'static [&'static str] {
        match self {
            Weather::Rainy => &["파전", "국밥", "칼국수", "수제비", "짬뽕"],
            Weather::Snowy => &["어묵", "국밥", "전골", "호떡"],
            Weather::Hot => &["밀면", "냉면", "물회", "빙수"],
            Weather::Cold => &["국밥", "곰탕", "찌개", "어묵"],
            Weather::Cloudy => &["칼국수", "파전", "커피"],
            Weather::Clear => &["브런치", "회", "커피"],
        }
    }

    /// Korean label.
    pub fn label(self) -> &'static str {
        match self {
            Weather::Rainy => "비",
            Weather::Snowy => "눈",
            Weather::Hot => "더움",
            Weather::Cold => "추움",
            Weather::Cloudy => "흐림",
            Weather::Clear => "맑음",
        }
    }
}

/// Hour-of-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    /// 05:00-10:59
    Morning,
    /// 11:00-14:59
    Lunch,
    /// 15:00-16:59
    Afternoon,
    /// 17:00-20:59
    Dinner,
    /// 21:00-04:59
    LateNight,
}

impl TimeWindow {
    /// Window containing `hour`. Hours past 23 wrap.
    pub fn for_hour(hour: u8) -> TimeWindow {
        match hour % 24 {
            5..=10 => TimeWindow::Morning,
            11..=14 => TimeWindow::Lunch,
            15..=16 => TimeWindow::Afternoon,
            17..=20 => TimeWindow::Dinner,
            _ => TimeWindow::LateNight,
        }
    }

    /// Situation recommended in this window.
    pub fn situation(self) -> Situation {
        match self {
            TimeWindow::Morning => Situation::Brunch,
            TimeWindow::Lunch => Situation::SoloDining,
            TimeWindow::Afternoon => Situation::FriendsGathering,
            TimeWindow::Dinner => Situation::FamilyGathering,
            TimeWindow::LateNight => Situation::LateNight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_weather_words() {
        assert_eq!(Weather::detect("비 오는 날"), Some(Weather::Rainy));
        assert_eq!(Weather::detect("오늘 너무 더워"), Some(Weather::Hot));
        assert_eq!(Weather::detect("눈비 섞임"), Some(Weather::Snowy));
        assert_eq!(Weather::detect("Sunny"), Some(Weather::Clear));
        assert_eq!(Weather::detect("모르겠음"), None);
    }

    #[test]
    fn every_weather_has_dishes() {
        for w in [
            Weather::Rainy,
            Weather::Snowy,
            Weather::Hot,
            Weather::Cold,
            Weather::Cloudy,
            Weather::Clear,
        ] {
            assert!(!w.dishes().is_empty(), "{}", w.label());
        }
    }

    #[test]
    fn window_boundaries() {
        assert_eq!(TimeWindow::for_hour(4), TimeWindow::LateNight);
        assert_eq!(TimeWindow::for_hour(5), TimeWindow::Morning);
        assert_eq!(TimeWindow::for_hour(10), TimeWindow::Morning);
        assert_eq!(TimeWindow::for_hour(11), TimeWindow::Lunch);
        assert_eq!(TimeWindow::for_hour(15), TimeWindow::Afternoon);
        assert_eq!(TimeWindow::for_hour(17), TimeWindow::Dinner);
        assert_eq!(TimeWindow::for_hour(20), TimeWindow::Dinner);
        assert_eq!(TimeWindow::for_hour(21), TimeWindow::LateNight);
        assert_eq!(TimeWindow::for_hour(0), TimeWindow::LateNight);
        assert_eq!(TimeWindow::for_hour(29), TimeWindow::Morning);
    }

    #[test]
    fn windows_map_to_scored_situations() {
        for hour in 0..24 {
            assert!(TimeWindow::for_hour(hour).situation().is_scored());
        }
    }
}
