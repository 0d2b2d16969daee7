use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_READING_SPEED: u32 = 30;
pub const DEFAULT_YEARLY_GOAL: u32 = 50;
pub const DEFAULT_MONTHLY_GOAL: u32 = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreferencesError {
    #[error("reading speed must be at least 1 page per hour")]
    ReadingSpeed,
    #[error("{0} goal must be at least 1 book")]
    Goal(&'static str),
}

/// Target book counts per year and per month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingGoals {
    pub yearly_goal: u32,
    pub monthly_goal: u32,
}

impl Default for ReadingGoals {
    fn default() -> Self {
        Self {
            yearly_goal: DEFAULT_YEARLY_GOAL,
            monthly_goal: DEFAULT_MONTHLY_GOAL,
        }
    }
}

/// Which books `purchased_books` is counted over. `to_buy_books` always
/// counts the to-read shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PurchaseScope {
    /// Explicitly purchased books on the to-read shelf.
    #[default]
    ToRead,
    /// Explicitly purchased to-read books plus every reading and completed
    /// book, which are treated as owned.
    AllShelves,
}

impl FromStr for PurchaseScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "to-read" => Ok(PurchaseScope::ToRead),
            "all-shelves" | "all" => Ok(PurchaseScope::AllShelves),
            _ => Err(()),
        }
    }
}

/// Per-user settings consumed by the statistics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingPreferences {
    /// Pages per hour.
    pub reading_speed: u32,
    #[serde(flatten)]
    pub goals: ReadingGoals,
    pub purchase_scope: PurchaseScope,
}

impl Default for ReadingPreferences {
    fn default() -> Self {
        Self {
            reading_speed: DEFAULT_READING_SPEED,
            goals: ReadingGoals::default(),
            purchase_scope: PurchaseScope::default(),
        }
    }
}

impl ReadingPreferences {
    pub fn validate(&self) -> Result<(), PreferencesError> {
        if self.reading_speed == 0 {
            return Err(PreferencesError::ReadingSpeed);
        }
        if self.goals.yearly_goal == 0 {
            return Err(PreferencesError::Goal("yearly"));
        }
        if self.goals.monthly_goal == 0 {
            return Err(PreferencesError::Goal("monthly"));
        }
        Ok(())
    }

    /// Apply optional overrides on top of these preferences.
    pub fn with_overrides(
        mut self,
        reading_speed: Option<u32>,
        yearly_goal: Option<u32>,
        monthly_goal: Option<u32>,
        purchase_scope: Option<PurchaseScope>,
    ) -> Self {
        if let Some(speed) = reading_speed {
            self.reading_speed = speed;
        }
        if let Some(goal) = yearly_goal {
            self.goals.yearly_goal = goal;
        }
        if let Some(goal) = monthly_goal {
            self.goals.monthly_goal = goal;
        }
        if let Some(scope) = purchase_scope {
            self.purchase_scope = scope;
        }
        self
    }
}
