//! Profile Entity
//!
//! Per-user settings driving date rendering and the monthly-review gate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// User profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// IANA zone identifier or a known abbreviation (PST, EST, ...)
    pub timezone: String,
    /// Date the last monthly review was completed, if any
    #[serde(default)]
    pub last_monthly_review_at: Option<NaiveDate>,
    /// Whether the onboarding flow has been completed
    pub onboarding_completed: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            last_monthly_review_at: None,
            onboarding_completed: false,
        }
    }
}

/// Partial profile update; only provided fields are written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_monthly_review_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
}

impl ProfilePatch {
    /// Apply the patch to a profile in place
    pub fn apply_to(&self, profile: &mut Profile) {
        if let Some(timezone) = &self.timezone {
            profile.timezone = timezone.clone();
        }
        if let Some(date) = self.last_monthly_review_at {
            profile.last_monthly_review_at = Some(date);
        }
        if let Some(done) = self.onboarding_completed {
            profile.onboarding_completed = done;
        }
    }
}
