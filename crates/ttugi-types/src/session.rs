//! Per-session preference memory.
//!
//! [`SessionPreference`] accumulates what a chat session has mentioned so
//! far. The analyzer reads it to inherit an area the user named in an
//! earlier turn; the session store owns its lifetime.

use serde::{Deserialize, Serialize};

use crate::criteria::{BudgetSentiment, Criteria};
use crate::restaurant::{Area, Category};

/// Accumulated preferences for one chat session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPreference {
    /// Areas mentioned so far, oldest first, without duplicates.
    #[serde(default)]
    pub areas: Vec<Area>,

    /// Categories mentioned so far, oldest first, without duplicates.
    #[serde(default)]
    pub categories: Vec<Category>,

    /// Most recent price sentiment.
    #[serde(default)]
    pub budget: Option<BudgetSentiment>,

    /// Number of user turns recorded.
    #[serde(default)]
    pub turns: u32,
}

impl SessionPreference {
    /// Fold one turn's criteria into the session.
    ///
    /// Only areas the user actually typed are remembered; an inherited area
    /// is already present. A re-mentioned area or category moves to the end.
    pub fn record(&mut self, criteria: &Criteria) {
        self.turns = self.turns.saturating_add(1);

        if let Some(area) = criteria.area
            && !criteria.area_inherited
        {
            self.areas.retain(|a| *a != area);
            self.areas.push(area);
        }
        if let Some(category) = criteria.category {
            self.categories.retain(|c| *c != category);
            self.categories.push(category);
        }
        if criteria.budget.is_some() {
            self.budget = criteria.budget;
        }
    }

    /// The most recently mentioned area.
    pub fn last_area(&self) -> Option<Area> {
        self.areas.last().copied()
    }

    /// The most recently mentioned category.
    pub fn last_category(&self) -> Option<Category> {
        self.categories.last().copied()
    }
}
