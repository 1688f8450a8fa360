//! Dining situations.
//!
//! A [`Situation`] selects which weight table the scoring engine applies.
//! Unknown tags map to [`Situation::General`], which ranks by rating alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A dining situation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Situation {
    #[serde(rename = "데이트")]
    Date,
    #[serde(rename = "가족모임")]
    FamilyGathering,
    #[serde(rename = "회식")]
    CompanyDinner,
    #[serde(rename = "혼밥")]
    SoloDining,
    #[serde(rename = "친구모임")]
    FriendsGathering,
    #[serde(rename = "특별한날")]
    SpecialDay,
    #[serde(rename = "브런치")]
    Brunch,
    #[serde(rename = "야식")]
    LateNight,
    #[serde(rename = "일반")]
    General,
}

impl Situation {
    /// Situations backed by a weight table (everything except `General`).
    pub const SCORED: [Situation; 8] = [
        Situation::Date,
        Situation::FamilyGathering,
        Situation::CompanyDinner,
        Situation::SoloDining,
        Situation::FriendsGathering,
        Situation::SpecialDay,
        Situation::Brunch,
        Situation::LateNight,
    ];

    /// Korean tag.
    pub fn label(self) -> &'static str {
        match self {
            Situation::Date => "데이트",
            Situation::FamilyGathering => "가족모임",
            Situation::CompanyDinner => "회식",
            Situation::SoloDining => "혼밥",
            Situation::FriendsGathering => "친구모임",
            Situation::SpecialDay => "특별한날",
            Situation::Brunch => "브런치",
            Situation::LateNight => "야식",
            Situation::General => "일반",
        }
    }

    /// Parse a tag, falling back to [`Situation::General`].
    ///
    /// Accepts the Korean tag, the tag with inner spaces (`"특별한 날"`),
    /// and the lowercase English variant name (`"date"`, `"late_night"`).
    pub fn parse(tag: &str) -> Situation {
        let compact: String = tag.split_whitespace().collect();
        let lower = compact.to_lowercase();
        match lower.as_str() {
            "데이트" | "date" => Situation::Date,
            "가족모임" | "가족" | "family" | "family_gathering" => Situation::FamilyGathering,
            "회식" | "company_dinner" | "team_dinner" => Situation::CompanyDinner,
            "혼밥" | "solo" | "solo_dining" => Situation::SoloDining,
            "친구모임" | "친구" | "friends" | "friends_gathering" => Situation::FriendsGathering,
            "특별한날" | "기념일" | "special" | "special_day" => Situation::SpecialDay,
            "브런치" | "brunch" => Situation::Brunch,
            "야식" | "late_night" | "latenight" => Situation::LateNight,
            _ => Situation::General,
        }
    }

    /// True for every situation that has a weight table.
    pub fn is_scored(self) -> bool {
        self != Situation::General
    }
}

impl FromStr for Situation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Situation::parse(s))
    }
}

impl fmt::Display for Situation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
