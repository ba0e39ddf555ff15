//! Profile Controller
//!
//! Cached profile reads plus the monthly-review gate.

use std::sync::{Arc, Mutex};

use crate::clock::Clock;
use crate::dates::{self, ReviewPolicy};
use crate::domain::{DomainResult, Profile, ProfilePatch};
use crate::repository::ProfileRepository;

pub struct ProfileController<R: ProfileRepository> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
    policy: ReviewPolicy,
    cached: Mutex<Option<Profile>>,
}

impl<R: ProfileRepository> ProfileController<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(repo, clock, ReviewPolicy::default())
    }

    pub fn with_policy(repo: Arc<R>, clock: Arc<dyn Clock>, policy: ReviewPolicy) -> Self {
        Self {
            repo,
            clock,
            policy,
            cached: Mutex::new(None),
        }
    }

    /// Cached profile, fetching on first read. None until onboarding has
    /// created one.
    pub async fn profile(&self) -> DomainResult<Option<Profile>> {
        if let Some(profile) = self.cached.lock().expect("profile lock poisoned").clone() {
            return Ok(Some(profile));
        }
        self.refresh().await
    }

    /// Drop the cached copy and re-fetch
    pub async fn refresh(&self) -> DomainResult<Option<Profile>> {
        let profile = self.repo.get().await?;
        *self.cached.lock().expect("profile lock poisoned") = profile.clone();
        Ok(profile)
    }

    /// User timezone, defaulting to UTC while no profile exists
    pub async fn timezone(&self) -> String {
        self.profile()
            .await
            .ok()
            .flatten()
            .map(|p| p.timezone)
            .unwrap_or_else(|| "UTC".to_string())
    }

    /// Whether the monthly-review prompt should appear right now.
    ///
    /// False until onboarding is complete; otherwise the two-factor gate on
    /// today's date in the user's zone.
    pub async fn should_show_monthly_review(&self) -> DomainResult<bool> {
        let Some(profile) = self.profile().await? else {
            return Ok(false);
        };
        if !profile.onboarding_completed {
            return Ok(false);
        }
        let today = dates::local_date_in(self.clock.now(), &profile.timezone);
        Ok(dates::should_show_monthly_review(
            today,
            profile.last_monthly_review_at,
            &self.policy,
        ))
    }

    /// Finish onboarding with the chosen timezone, creating the profile if
    /// necessary
    pub async fn complete_onboarding(&self, timezone: &str) -> DomainResult<Profile> {
        let profile = self.repo.complete_onboarding(timezone).await?;
        *self.cached.lock().expect("profile lock poisoned") = Some(profile.clone());
        Ok(profile)
    }

    /// Record that the monthly review was completed today (user's zone),
    /// which re-arms the cooldown
    pub async fn mark_review_completed(&self) -> DomainResult<Profile> {
        let timezone = self.timezone().await;
        let today = dates::local_date_in(self.clock.now(), &timezone);
        let patch = ProfilePatch {
            last_monthly_review_at: Some(today),
            ..Default::default()
        };
        let profile = self.repo.update(&patch).await?;
        *self.cached.lock().expect("profile lock poisoned") = Some(profile.clone());
        Ok(profile)
    }
}
