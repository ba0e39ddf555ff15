//! Journal Entities
//!
//! Daily note and reflection, both keyed by calendar date.

use serde::{Deserialize, Serialize};

/// Free-form note for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyNote {
    pub for_date: String,
    pub content: String,
}

/// Structured end-of-day (or end-of-month) reflection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub for_date: String,
    #[serde(default)]
    pub what_went_well: Option<String>,
    #[serde(default)]
    pub what_didnt_go_well: Option<String>,
    #[serde(default)]
    pub improvements: Option<String>,
    #[serde(default)]
    pub is_monthly: bool,
}

impl Reflection {
    /// True when no field carries any non-whitespace text
    pub fn is_empty(&self) -> bool {
        [
            &self.what_went_well,
            &self.what_didnt_go_well,
            &self.improvements,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}
