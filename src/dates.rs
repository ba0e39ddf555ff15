//! Date & Eligibility Engine
//!
//! Pure calendar logic: timezone-aware date rendering and the monthly-review
//! eligibility gate. Every output is a deterministic function of the given
//! instant and timezone name. Arithmetic is always calendar-day granularity
//! on the zone-local date, never elapsed wall-clock hours, so daylight-saving
//! transitions cannot shift a date by one.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Known timezone abbreviations mapped to IANA identifiers
const TIMEZONE_ALIASES: &[(&str, &str)] = &[
    ("PST", "America/Los_Angeles"),
    ("PDT", "America/Los_Angeles"),
    ("EST", "America/New_York"),
    ("EDT", "America/New_York"),
    ("CST", "America/Chicago"),
    ("CDT", "America/Chicago"),
    ("MST", "America/Denver"),
    ("MDT", "America/Denver"),
    ("UTC", "UTC"),
    ("GMT", "UTC"),
];

/// Business constants for the monthly-review gate
///
/// The defaults mirror the product rules (review prompt in the last 3 or
/// first 2 days of a month, at most once every 25 days); they are policy,
/// not structure, so they stay configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPolicy {
    /// Minimum calendar days between completed reviews
    pub cooldown_days: i64,
    /// Window length at the end of the month
    pub month_tail_days: u32,
    /// Window length at the start of the month
    pub month_head_days: u32,
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            cooldown_days: 25,
            month_tail_days: 3,
            month_head_days: 2,
        }
    }
}

/// Map a known abbreviation to its IANA identifier; unrecognized input is
/// passed through unchanged for the timezone library to resolve or fail.
pub fn normalize_timezone(timezone: &str) -> String {
    let upper = timezone.trim().to_ascii_uppercase();
    TIMEZONE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, iana)| (*iana).to_string())
        .unwrap_or_else(|| timezone.to_string())
}

/// Resolve a timezone name to a concrete zone, falling back to UTC
pub fn resolve_timezone(timezone: &str) -> Tz {
    normalize_timezone(timezone).parse().unwrap_or(chrono_tz::UTC)
}

/// Calendar date of `instant` as observed in `timezone`
pub fn local_date_in(instant: DateTime<Utc>, timezone: &str) -> NaiveDate {
    instant.with_timezone(&resolve_timezone(timezone)).date_naive()
}

/// `YYYY-MM-DD` rendering of `instant` as observed in `timezone`
pub fn format_date_in(instant: DateTime<Utc>, timezone: &str) -> String {
    format_date(local_date_in(instant, timezone))
}

/// `YYYY-MM-DD` rendering of a calendar date
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` partition key
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Today's date string in `timezone`
pub fn today_in(now: DateTime<Utc>, timezone: &str) -> String {
    shifted_in(now, timezone, 0)
}

/// Tomorrow's date string in `timezone`
pub fn tomorrow_in(now: DateTime<Utc>, timezone: &str) -> String {
    shifted_in(now, timezone, 1)
}

/// Yesterday's date string in `timezone`
pub fn yesterday_in(now: DateTime<Utc>, timezone: &str) -> String {
    shifted_in(now, timezone, -1)
}

fn shifted_in(now: DateTime<Utc>, timezone: &str, days: i64) -> String {
    let date = local_date_in(now, timezone);
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days as u64))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    format_date(shifted.unwrap_or(date))
}

/// Number of days in the month containing `date`
pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// True iff the day after `date` falls in a different month
pub fn is_end_of_month(date: NaiveDate) -> bool {
    date.checked_add_days(Days::new(1))
        .map(|next| next.month() != date.month())
        .unwrap_or(true)
}

/// True iff `date` is within the last `tail` days of its month
fn in_month_tail(date: NaiveDate, tail: u32) -> bool {
    date.day() + tail > days_in_month(date)
}

/// True iff `date`'s day-of-month >= (days-in-month - 2)
pub fn is_last_three_days_of_month(date: NaiveDate) -> bool {
    in_month_tail(date, 3)
}

/// True iff `date`'s day-of-month <= 2
pub fn is_first_two_days_of_month(date: NaiveDate) -> bool {
    date.day() <= 2
}

/// Whether `date` falls in the policy's end-or-start-of-month window
pub fn in_review_window(date: NaiveDate, policy: &ReviewPolicy) -> bool {
    in_month_tail(date, policy.month_tail_days) || date.day() <= policy.month_head_days
}

/// Two-factor monthly-review gate: `today` must be inside the calendar
/// window AND the cooldown since the last completed review must have
/// elapsed. A missing last review counts as infinitely long ago.
pub fn should_show_monthly_review(
    today: NaiveDate,
    last_review: Option<NaiveDate>,
    policy: &ReviewPolicy,
) -> bool {
    if !in_review_window(today, policy) {
        return false;
    }
    match last_review {
        Some(last) => (today - last).num_days() > policy.cooldown_days,
        None => true,
    }
}

/// (year, month) of the current instant in `timezone`
pub fn current_month(now: DateTime<Utc>, timezone: &str) -> (i32, u32) {
    let date = local_date_in(now, timezone);
    (date.year(), date.month())
}

/// (year, month) of the month after the current one in `timezone`
pub fn next_month(now: DateTime<Utc>, timezone: &str) -> (i32, u32) {
    let (year, month) = current_month(now, timezone);
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_normalize_timezone_aliases() {
        assert_eq!(normalize_timezone("PST"), "America/Los_Angeles");
        assert_eq!(normalize_timezone("pdt"), "America/Los_Angeles");
        assert_eq!(normalize_timezone("EST"), "America/New_York");
        assert_eq!(normalize_timezone("GMT"), "UTC");
        // Unrecognized input passes through for the zone library to handle
        assert_eq!(normalize_timezone("Asia/Tokyo"), "Asia/Tokyo");
    }

    #[test]
    fn test_resolve_timezone_falls_back_to_utc() {
        assert_eq!(resolve_timezone("MDT"), chrono_tz::America::Denver);
        assert_eq!(resolve_timezone("not-a-zone"), chrono_tz::UTC);
    }

    #[test]
    fn test_today_changes_at_local_midnight_not_utc_midnight() {
        // Midnight in Los Angeles (PDT, UTC-7) on 2024-06-02 is 07:00 UTC.
        assert_eq!(today_in(utc(2024, 6, 2, 6, 59), "PST"), "2024-06-01");
        assert_eq!(today_in(utc(2024, 6, 2, 7, 0), "PST"), "2024-06-02");
        // Same instants in UTC already read as June 2nd.
        assert_eq!(today_in(utc(2024, 6, 2, 6, 59), "UTC"), "2024-06-02");
    }

    #[test]
    fn test_tomorrow_and_yesterday_are_calendar_shifts() {
        let now = utc(2024, 6, 2, 6, 59); // still June 1st in LA
        assert_eq!(tomorrow_in(now, "America/Los_Angeles"), "2024-06-02");
        assert_eq!(yesterday_in(now, "America/Los_Angeles"), "2024-05-31");
        assert_eq!(tomorrow_in(now, "UTC"), "2024-06-03");
    }

    #[test]
    fn test_shift_across_dst_transition() {
        // US DST ended 2024-11-03; the fall-back day is 25 wall-clock hours
        // long but must still count as exactly one calendar day.
        let now = utc(2024, 11, 3, 20, 0); // 2024-11-03 12:00 PST
        assert_eq!(today_in(now, "America/Los_Angeles"), "2024-11-03");
        assert_eq!(tomorrow_in(now, "America/Los_Angeles"), "2024-11-04");
        assert_eq!(yesterday_in(now, "America/Los_Angeles"), "2024-11-02");
    }

    #[test]
    fn test_end_of_month() {
        assert!(is_end_of_month(date(2024, 3, 31)));
        assert!(!is_end_of_month(date(2024, 3, 30)));
        assert!(is_end_of_month(date(2024, 2, 29))); // leap year
        assert!(is_end_of_month(date(2023, 2, 28)));
        assert!(is_end_of_month(date(2024, 12, 31)));
    }

    #[test]
    fn test_month_window_edges() {
        // 31-day month: day 30 >= 29
        assert!(is_last_three_days_of_month(date(2024, 3, 30)));
        assert!(is_last_three_days_of_month(date(2024, 3, 29)));
        assert!(!is_last_three_days_of_month(date(2024, 3, 28)));
        // February in a leap year
        assert!(is_last_three_days_of_month(date(2024, 2, 27)));
        assert!(!is_last_three_days_of_month(date(2024, 2, 26)));

        assert!(is_first_two_days_of_month(date(2024, 4, 1)));
        assert!(is_first_two_days_of_month(date(2024, 4, 2)));
        assert!(!is_first_two_days_of_month(date(2024, 4, 3)));
    }

    #[test]
    fn test_review_gate_without_prior_review() {
        let policy = ReviewPolicy::default();
        // Inside the window, no prior review: show.
        assert!(should_show_monthly_review(date(2024, 3, 30), None, &policy));
        assert!(should_show_monthly_review(date(2024, 4, 2), None, &policy));
        // Outside the window: never show.
        assert!(!should_show_monthly_review(date(2024, 4, 15), None, &policy));
    }

    #[test]
    fn test_review_gate_cooldown() {
        let policy = ReviewPolicy::default();
        let today = date(2024, 3, 31);
        // Reviewed 25 days ago: cooldown not yet elapsed (must be > 25).
        assert!(!should_show_monthly_review(
            today,
            Some(date(2024, 3, 6)),
            &policy
        ));
        // Reviewed 26 days ago: eligible again.
        assert!(should_show_monthly_review(
            today,
            Some(date(2024, 3, 5)),
            &policy
        ));
        // Recent review suppresses the prompt through the whole window.
        assert!(!should_show_monthly_review(
            date(2024, 4, 1),
            Some(date(2024, 3, 30)),
            &policy
        ));
    }

    #[test]
    fn test_custom_policy() {
        let policy = ReviewPolicy {
            cooldown_days: 5,
            month_tail_days: 1,
            month_head_days: 0,
        };
        assert!(should_show_monthly_review(date(2024, 3, 31), None, &policy));
        assert!(!should_show_monthly_review(date(2024, 3, 30), None, &policy));
        assert!(!should_show_monthly_review(date(2024, 4, 1), None, &policy));
    }

    #[test]
    fn test_month_helpers() {
        let now = utc(2024, 12, 15, 12, 0);
        assert_eq!(current_month(now, "UTC"), (2024, 12));
        assert_eq!(next_month(now, "UTC"), (2025, 1));
        // Late-evening UTC on Dec 31 is already January in Tokyo.
        let new_years_eve = utc(2024, 12, 31, 20, 0);
        assert_eq!(current_month(new_years_eve, "Asia/Tokyo"), (2025, 1));
    }

    #[test]
    fn test_parse_and_format_round_trip() {
        let d = parse_date("2024-06-01").unwrap();
        assert_eq!(format_date(d), "2024-06-01");
        assert!(parse_date("June 1st").is_none());
    }
}
