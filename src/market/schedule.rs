//! Daily auto-refresh timing and market hours.
//!
//! Reference rates are published once per business day in the afternoon,
//! Frankfurt time. All wall-clock times here are in `Europe/Berlin`, so they
//! follow the CET/CEST switch.

use chrono::{DateTime, Datelike, Days, Duration, NaiveTime, TimeZone, Timelike, Weekday};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

/// Time zone of the reference-rate publication and of market hours.
pub const MARKET_TZ: Tz = chrono_tz::Europe::Berlin;

/// Wall-clock time at which rates are re-fetched, on business days only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    time: NaiveTime,
}

impl Default for RefreshSchedule {
    /// 16:05 Frankfurt time, shortly after the daily reference-rate publication.
    fn default() -> Self {
        Self {
            time: NaiveTime::MIN + Duration::minutes(16 * 60 + 5),
        }
    }
}

impl RefreshSchedule {
    /// `None` unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(|time| Self { time })
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// Next refresh strictly after `now`, in market time. Weekend targets
    /// roll forward to Monday. `None` only at the end of the calendar range.
    pub fn next_after<Z: TimeZone>(&self, now: &DateTime<Z>) -> Option<DateTime<Tz>> {
        let local = now.with_timezone(&MARKET_TZ);
        let today = local.date_naive();
        // Any seven consecutive days hold a weekday target after `now`.
        (0..=7)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .filter(|date| !matches!(date.weekday(), Weekday::Sat | Weekday::Sun))
            .filter_map(|date| {
                MARKET_TZ
                    .from_local_datetime(&date.and_time(self.time))
                    .earliest()
            })
            .find(|target| *target > local)
    }

    /// How long to sleep before the next refresh.
    pub fn delay_from<Z: TimeZone>(&self, now: &DateTime<Z>) -> Option<Duration> {
        let local = now.with_timezone(&MARKET_TZ);
        self.next_after(now)
            .map(|next| next.signed_duration_since(local))
    }
}

/// Convenience for the default 16:05 schedule.
pub fn next_refresh<Z: TimeZone>(now: &DateTime<Z>) -> Option<DateTime<Tz>> {
    RefreshSchedule::default().next_after(now)
}

/// Whether the European FX session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    Open,
    Closed,
    ClosedWeekend,
}

impl MarketStatus {
    /// Open 08:00–17:00 Frankfurt time on weekdays.
    pub fn at<Z: TimeZone>(now: &DateTime<Z>) -> Self {
        let local = now.with_timezone(&MARKET_TZ);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            MarketStatus::ClosedWeekend
        } else if local.hour() < 8 || local.hour() >= 17 {
            MarketStatus::Closed
        } else {
            MarketStatus::Open
        }
    }

    pub fn is_open(&self) -> bool {
        *self == MarketStatus::Open
    }
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MarketStatus::Open => "Markets Open",
            MarketStatus::Closed => "Markets Closed",
            MarketStatus::ClosedWeekend => "Markets Closed (Weekend)",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Tz> {
        MARKET_TZ.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_refresh_later_same_day() {
        // Wednesday morning.
        let next = next_refresh(&at(2026, 1, 7, 9, 30)).unwrap();
        assert_eq!(next, at(2026, 1, 7, 16, 5));
    }

    #[test]
    fn test_refresh_rolls_to_next_day() {
        let next = next_refresh(&at(2026, 1, 7, 16, 5)).unwrap();
        assert_eq!(next, at(2026, 1, 8, 16, 5));
    }

    #[test]
    fn test_friday_evening_rolls_to_monday() {
        // 2026-01-09 is a Friday.
        let next = next_refresh(&at(2026, 1, 9, 18, 0)).unwrap();
        assert_eq!(next, at(2026, 1, 12, 16, 5));
        assert_eq!(next.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_sunday_rolls_to_monday() {
        let next = next_refresh(&at(2026, 1, 11, 10, 0)).unwrap();
        assert_eq!(next, at(2026, 1, 12, 16, 5));
    }

    #[test]
    fn test_winter_utc_input_is_converted() {
        // 14:00 UTC is 15:00 CET.
        let now = utc(2026, 1, 7, 14, 0);
        assert_eq!(next_refresh(&now).unwrap(), utc(2026, 1, 7, 15, 5));
        assert_eq!(
            RefreshSchedule::default().delay_from(&now),
            Some(Duration::minutes(65))
        );
    }

    #[test]
    fn test_summer_refresh_uses_cest() {
        // 14:30 UTC is 16:30 CEST, past today's run.
        let next = next_refresh(&utc(2026, 7, 8, 14, 30)).unwrap();
        assert_eq!(next, utc(2026, 7, 9, 14, 5));

        // 13:30 UTC is 15:30 CEST.
        let next = next_refresh(&utc(2026, 7, 8, 13, 30)).unwrap();
        assert_eq!(next, utc(2026, 7, 8, 14, 5));
    }

    #[test]
    fn test_refresh_across_spring_forward() {
        // Clocks change on Sunday 2026-03-29; Friday's 16:05 is CET,
        // Monday's is CEST.
        let next = next_refresh(&at(2026, 3, 27, 18, 0)).unwrap();
        assert_eq!(next, utc(2026, 3, 30, 14, 5));
        assert_eq!(
            RefreshSchedule::default().delay_from(&at(2026, 3, 27, 18, 0)),
            Some(Duration::hours(69) + Duration::minutes(5))
        );
    }

    #[test]
    fn test_custom_schedule() {
        let schedule = RefreshSchedule::new(9, 30).unwrap();
        assert_eq!(schedule.time(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        let next = schedule.next_after(&at(2026, 1, 7, 10, 0)).unwrap();
        assert_eq!(next, at(2026, 1, 8, 9, 30));
    }

    #[test]
    fn test_schedule_rejects_out_of_range_time() {
        assert!(RefreshSchedule::new(30, 0).is_none());
        assert!(RefreshSchedule::new(16, 60).is_none());
        assert!(RefreshSchedule::new(23, 59).is_some());
        assert_eq!(
            RefreshSchedule::default(),
            RefreshSchedule::new(16, 5).unwrap()
        );
    }

    #[test]
    fn test_market_status() {
        assert_eq!(MarketStatus::at(&at(2026, 1, 7, 9, 0)), MarketStatus::Open);
        assert_eq!(MarketStatus::at(&at(2026, 1, 7, 7, 59)), MarketStatus::Closed);
        assert_eq!(MarketStatus::at(&at(2026, 1, 7, 17, 0)), MarketStatus::Closed);
        assert_eq!(MarketStatus::at(&at(2026, 1, 10, 12, 0)), MarketStatus::ClosedWeekend);
        assert_eq!(MarketStatus::ClosedWeekend.to_string(), "Markets Closed (Weekend)");
    }

    #[test]
    fn test_summer_market_hours() {
        // 15:30 UTC is 17:30 CEST.
        assert_eq!(MarketStatus::at(&utc(2026, 7, 8, 15, 30)), MarketStatus::Closed);
        // 06:30 UTC is 08:30 CEST.
        assert_eq!(MarketStatus::at(&utc(2026, 7, 8, 6, 30)), MarketStatus::Open);
    }
}
