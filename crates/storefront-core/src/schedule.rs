//! # Store Schedule
//!
//! Decides whether the store is open at a given wall-clock moment.
//!
//! ## Evaluation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  mode == OPEN   ──► open                                                │
//! │  mode == CLOSED ──► closed                                              │
//! │  mode == AUTO:                                                          │
//! │     1. today's entry       same-day:  open ≤ now ≤ close                │
//! │                            overnight: now ≥ open   (evening part)       │
//! │     2. yesterday's entry   overnight: now ≤ close  (after-midnight tail)│
//! │     3. otherwise closed                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Overnight Example
//! Monday 18:00 → 02:00 is stored on Monday's entry. Monday 23:00 matches
//! step 1; Tuesday 01:00 matches step 2 through Monday's entry.
//!
//! Entries that are disabled or whose times don't parse as `HH:MM` are
//! skipped, never reported as errors.
//!
//! The caller supplies `now` (normally local time) and is responsible for
//! re-evaluating on a timer.

use chrono::{Datelike, NaiveTime, Timelike};

use crate::types::{OpeningHour, StoreSettings, StoreStatusMode};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// An opening-hour entry with both times parsed, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningWindow {
    pub open_minute: u32,
    pub close_minute: u32,
}

impl OpeningWindow {
    /// Parses an enabled entry. Disabled or malformed entries yield `None`.
    pub fn from_entry(entry: &OpeningHour) -> Option<Self> {
        if !entry.enabled {
            return None;
        }
        Some(OpeningWindow {
            open_minute: parse_minute_of_day(&entry.open)?,
            close_minute: parse_minute_of_day(&entry.close)?,
        })
    }

    /// `close < open`: the window runs past midnight into the next day.
    #[inline]
    pub fn crosses_midnight(&self) -> bool {
        self.close_minute < self.open_minute
    }

    /// Whether `minute` falls in the part of the window that belongs to
    /// the entry's own day.
    pub fn covers_same_day(&self, minute: u32) -> bool {
        if self.crosses_midnight() {
            minute >= self.open_minute
        } else {
            self.open_minute <= minute && minute <= self.close_minute
        }
    }

    /// Whether `minute` (on the following day) falls in the after-midnight
    /// tail. Always false for same-day windows.
    pub fn covers_next_day(&self, minute: u32) -> bool {
        self.crosses_midnight() && minute <= self.close_minute
    }
}

/// Parses "HH:MM" into minutes since midnight.
///
/// A trailing `:SS` is accepted and ignored. "24:00" is the end of the day.
///
/// ## Example
/// ```rust
/// use storefront_core::schedule::parse_minute_of_day;
///
/// assert_eq!(parse_minute_of_day("18:30"), Some(1110));
/// assert_eq!(parse_minute_of_day("18:30:45"), Some(1110));
/// assert_eq!(parse_minute_of_day("24:00"), Some(1440));
/// assert_eq!(parse_minute_of_day("24:30"), None);
/// assert_eq!(parse_minute_of_day("ab:cd"), None);
/// ```
pub fn parse_minute_of_day(value: &str) -> Option<u32> {
    let value = value.trim();
    if matches!(value, "24:00" | "24:00:00") {
        return Some(MINUTES_PER_DAY);
    }

    let time = NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()?;
    Some(time.hour() * 60 + time.minute())
}

/// Day of week with Sunday as 0.
#[inline]
fn day_index<T: Datelike>(now: &T) -> u8 {
    now.weekday().num_days_from_sunday() as u8
}

fn entry_for(hours: &[OpeningHour], day: u8) -> Option<&OpeningHour> {
    hours.iter().find(|h| h.day_of_week == day)
}

/// Decides whether the store is open at `now`.
///
/// `now` is any chrono value carrying a date and a time of day
/// (`NaiveDateTime`, `DateTime<Local>`, ...). Seconds are ignored.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use storefront_core::schedule::is_open;
/// use storefront_core::types::{OpeningHour, StoreStatusMode};
///
/// // 2024-01-01 is a Monday (day 1)
/// let hours = vec![OpeningHour::new(1, "18:00", "02:00")];
/// let monday_late = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(23, 0, 0).unwrap();
/// let tuesday_early = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(1, 0, 0).unwrap();
///
/// assert!(is_open(&monday_late, StoreStatusMode::Auto, &hours));
/// assert!(is_open(&tuesday_early, StoreStatusMode::Auto, &hours));
/// assert!(!is_open(&tuesday_early, StoreStatusMode::Closed, &hours));
/// ```
pub fn is_open<T>(now: &T, mode: StoreStatusMode, hours: &[OpeningHour]) -> bool
where
    T: Datelike + Timelike,
{
    match mode {
        StoreStatusMode::Open => return true,
        StoreStatusMode::Closed => return false,
        StoreStatusMode::Auto => {}
    }

    let day = day_index(now);
    let minute = now.hour() * 60 + now.minute();
    debug_assert!(minute < MINUTES_PER_DAY);

    let today = entry_for(hours, day).and_then(OpeningWindow::from_entry);
    if today.is_some_and(|w| w.covers_same_day(minute)) {
        return true;
    }

    let yesterday = entry_for(hours, (day + 6) % 7).and_then(OpeningWindow::from_entry);
    yesterday.is_some_and(|w| w.covers_next_day(minute))
}

impl StoreSettings {
    /// Evaluates the store's own mode and opening hours at `now`.
    pub fn is_open_at<T>(&self, now: &T) -> bool
    where
        T: Datelike + Timelike,
    {
        is_open(now, self.store_status, &self.opening_hours)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    // 2024-01-07 is a Sunday; day_of_week n is 2024-01-(7+n).
    fn at(day_of_week: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 7 + day_of_week)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn every_minute_of_week() -> impl Iterator<Item = NaiveDateTime> {
        let start = at(0, 0, 0);
        (0..7 * MINUTES_PER_DAY as i64).map(move |m| start + Duration::minutes(m))
    }

    #[test]
    fn test_day_index_sunday_is_zero() {
        assert_eq!(day_index(&at(0, 12, 0)), 0);
        assert_eq!(day_index(&at(1, 12, 0)), 1);
        assert_eq!(day_index(&at(6, 12, 0)), 6);
    }

    #[test]
    fn test_manual_overrides_ignore_schedule() {
        let schedules = vec![
            vec![],
            vec![OpeningHour::new(0, "08:00", "20:00")],
            vec![OpeningHour::new(3, "18:00", "02:00").disabled()],
            (0..7).map(|d| OpeningHour::new(d, "00:00", "23:59")).collect(),
        ];

        for hours in &schedules {
            for now in every_minute_of_week().step_by(37) {
                assert!(is_open(&now, StoreStatusMode::Open, hours));
                assert!(!is_open(&now, StoreStatusMode::Closed, hours));
            }
        }
    }

    #[test]
    fn test_same_day_window_is_inclusive() {
        let hours = vec![OpeningHour::new(3, "08:00", "20:00")];

        assert!(is_open(&at(3, 8, 0), StoreStatusMode::Auto, &hours));
        assert!(is_open(&at(3, 20, 0), StoreStatusMode::Auto, &hours));
        assert!(is_open(&at(3, 12, 30), StoreStatusMode::Auto, &hours));
        assert!(!is_open(&at(3, 7, 59), StoreStatusMode::Auto, &hours));
        assert!(!is_open(&at(3, 20, 1), StoreStatusMode::Auto, &hours));
        // Other days have no entry
        assert!(!is_open(&at(4, 12, 0), StoreStatusMode::Auto, &hours));
    }

    #[test]
    fn test_midnight_crossing_window() {
        let hours = vec![OpeningHour::new(1, "18:00", "02:00")];

        assert!(is_open(&at(1, 23, 0), StoreStatusMode::Auto, &hours));
        assert!(is_open(&at(2, 1, 0), StoreStatusMode::Auto, &hours));
        assert!(is_open(&at(2, 2, 0), StoreStatusMode::Auto, &hours));
        assert!(!is_open(&at(2, 3, 0), StoreStatusMode::Auto, &hours));
        assert!(!is_open(&at(1, 17, 0), StoreStatusMode::Auto, &hours));
        // The tail belongs to Tuesday morning, not Monday morning
        assert!(!is_open(&at(1, 1, 0), StoreStatusMode::Auto, &hours));
    }

    #[test]
    fn test_saturday_overnight_wraps_to_sunday() {
        let hours = vec![OpeningHour::new(6, "20:00", "01:30")];

        assert!(is_open(&at(6, 22, 0), StoreStatusMode::Auto, &hours));
        assert!(is_open(&at(0, 1, 30), StoreStatusMode::Auto, &hours));
        assert!(!is_open(&at(0, 1, 31), StoreStatusMode::Auto, &hours));
    }

    #[test]
    fn test_disabled_entries_never_open() {
        let hours: Vec<OpeningHour> = (0..7)
            .map(|d| OpeningHour::new(d, "18:00", "02:00").disabled())
            .collect();

        assert!(every_minute_of_week().all(|now| !is_open(&now, StoreStatusMode::Auto, &hours)));
    }

    #[test]
    fn test_disabled_yesterday_does_not_extend_today() {
        let hours = vec![
            OpeningHour::new(1, "18:00", "02:00").disabled(),
            OpeningHour::new(2, "10:00", "12:00"),
        ];

        assert!(!is_open(&at(2, 1, 0), StoreStatusMode::Auto, &hours));
        assert!(is_open(&at(2, 11, 0), StoreStatusMode::Auto, &hours));
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let hours = vec![
            OpeningHour::new(1, "abc", "20:00"),
            OpeningHour::new(2, "08:00", "25:00"),
            OpeningHour::new(3, "", ""),
        ];

        assert!(every_minute_of_week().all(|now| !is_open(&now, StoreStatusMode::Auto, &hours)));
    }

    #[test]
    fn test_first_entry_for_a_day_wins() {
        let hours = vec![
            OpeningHour::new(4, "08:00", "09:00"),
            OpeningHour::new(4, "08:00", "22:00"),
        ];

        assert!(is_open(&at(4, 8, 30), StoreStatusMode::Auto, &hours));
        assert!(!is_open(&at(4, 21, 0), StoreStatusMode::Auto, &hours));
    }

    #[test]
    fn test_open_minutes_match_windows_for_whole_week() {
        // Daily 19:15-22:00 except Sunday 15:30-21:45 and an overnight Friday
        let mut hours: Vec<OpeningHour> =
            (1..5).map(|d| OpeningHour::new(d, "19:15", "22:00")).collect();
        hours.push(OpeningHour::new(0, "15:30", "21:45"));
        hours.push(OpeningHour::new(5, "19:15", "01:00"));

        let open_minutes = every_minute_of_week()
            .filter(|now| is_open(now, StoreStatusMode::Auto, &hours))
            .count();

        // Mon-Thu: 166 minutes each (19:15..=22:00)
        // Sun: 376 minutes (15:30..=21:45)
        // Fri evening: 285 minutes (19:15..=23:59) + Sat tail 61 (00:00..=01:00)
        assert_eq!(open_minutes, 4 * 166 + 376 + 285 + 61);
    }

    #[test]
    fn test_seconds_are_ignored() {
        let hours = vec![OpeningHour::new(3, "08:00", "20:00")];
        let now = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(20, 0, 59)
            .unwrap();

        assert!(is_open(&now, StoreStatusMode::Auto, &hours));
    }

    #[test]
    fn test_times_with_seconds_and_end_of_day() {
        let hours = vec![
            OpeningHour::new(3, "08:00:00", "20:00:00"),
            OpeningHour::new(4, "18:00", "24:00"),
        ];

        assert!(is_open(&at(3, 8, 0), StoreStatusMode::Auto, &hours));
        assert!(!is_open(&at(3, 20, 1), StoreStatusMode::Auto, &hours));

        assert!(is_open(&at(4, 23, 59), StoreStatusMode::Auto, &hours));
        // Closing at 24:00 does not spill into Friday
        assert!(!is_open(&at(5, 0, 0), StoreStatusMode::Auto, &hours));
    }

    #[test]
    fn test_window_helpers() {
        let overnight = OpeningWindow::from_entry(&OpeningHour::new(1, "18:00", "02:00")).unwrap();
        assert!(overnight.crosses_midnight());
        assert!(overnight.covers_next_day(120));
        assert!(!overnight.covers_next_day(121));

        let day = OpeningWindow::from_entry(&OpeningHour::new(1, "08:00", "08:00")).unwrap();
        assert!(!day.crosses_midnight());
        assert!(day.covers_same_day(480));
        assert!(!day.covers_next_day(0));
    }

    #[test]
    fn test_settings_is_open_at() {
        let settings = StoreSettings {
            store_name: "Sabor".into(),
            whatsapp_number: "5594991623576".into(),
            store_status: StoreStatusMode::Auto,
            delivery_fee: crate::Money::from_cents(700),
            opening_hours: vec![OpeningHour::new(0, "15:30", "21:45")],
            closed_message: "Closed".into(),
            open_message: "Open".into(),
            delivery_time: None,
            pickup_time: None,
        };

        assert!(settings.is_open_at(&at(0, 16, 0)));
        assert!(!settings.is_open_at(&at(0, 22, 0)));
    }
}
