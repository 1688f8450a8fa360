//! Structured search criteria produced by the query analyzer.

use serde::{Deserialize, Serialize};

use crate::restaurant::{Area, Category};
use crate::situation::Situation;

/// Meal-time synonym detected in user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
    LateNight,
}

impl MealTime {
    /// Representative hour of day (0-23) for this meal.
    pub fn hour(self) -> u8 {
        match self {
            MealTime::Breakfast => 8,
            MealTime::Lunch => 12,
            MealTime::Dinner => 18,
            MealTime::LateNight => 22,
        }
    }
}

/// Coarse price sentiment ("저렴" vs "비싸").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetSentiment {
    Cheap,
    Premium,
}

/// Criteria extracted from one user message.
///
/// Every field except `time_hour` is optional: absence of a keyword match
/// simply leaves the field unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<Area>,

    /// True when `area` came from session memory rather than the text.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub area_inherited: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Specific dish keyword ("회", "국밥", "돼지국밥", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_time: Option<MealTime>,

    /// Hour of day (0-23): the meal-time hour if one was named, otherwise
    /// the caller-supplied current hour.
    pub time_hour: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetSentiment>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub situation: Option<Situation>,

    /// Upper bound on parsed minimum price, in won.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<u32>,
}

impl Criteria {
    /// Criteria that only bound the price.
    pub fn with_max_price(max_price: u32) -> Self {
        Self {
            max_price: Some(max_price),
            ..Self::default()
        }
    }

    /// Criteria that only search for a dish keyword.
    pub fn with_keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    /// True when no filtering field is set.
    pub fn is_unconstrained(&self) -> bool {
        self.area.is_none()
            && self.category.is_none()
            && self.keyword.is_none()
            && self.max_price.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_time_hours() {
        assert_eq!(MealTime::Breakfast.hour(), 8);
        assert_eq!(MealTime::Lunch.hour(), 12);
        assert_eq!(MealTime::Dinner.hour(), 18);
        assert_eq!(MealTime::LateNight.hour(), 22);
    }

    #[test]
    fn unconstrained_ignores_time_and_sentiment() {
        let criteria = Criteria {
            time_hour: 19,
            budget: Some(BudgetSentiment::Cheap),
            ..Criteria::default()
        };
        assert!(criteria.is_unconstrained());
        assert!(!Criteria::with_keyword("회").is_unconstrained());
        assert!(!Criteria::with_max_price(10_000).is_unconstrained());
    }

    #[test]
    fn serializes_only_set_fields() {
        let criteria = Criteria {
            area: Some(Area::Haeundae),
            time_hour: 19,
            ..Criteria::default()
        };
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["area"], "해운대");
        assert_eq!(json["timeHour"], 19);
        assert!(json.get("category").is_none());
        assert!(json.get("areaInherited").is_none());
    }
}
