use time::{Duration, Month, OffsetDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

pub const VALID_PERIODS: [&str; 8] = [
    "today",
    "yesterday",
    "thisWeek",
    "thisMonth",
    "lastMonth",
    "last30Days",
    "last90Days",
    "thisYear",
];

/// Resolves a named relative window against `now` (UTC). Closed windows
/// (`today`, `yesterday`, `lastMonth`) carry their own end; open windows end
/// at `now`. Weeks start on Sunday. Unknown names resolve to `None`.
pub fn resolve(period: &str, now: OffsetDateTime) -> Option<DateRange> {
    let today = now.date();
    let midnight = today.midnight().assume_utc();

    match period {
        "today" => Some(DateRange {
            start: midnight,
            end: midnight + Duration::days(1) - Duration::milliseconds(1),
        }),
        "yesterday" => {
            let start = (today - Duration::days(1)).midnight().assume_utc();
            Some(DateRange {
                start,
                end: start + Duration::days(1) - Duration::milliseconds(1),
            })
        }
        "thisWeek" => {
            let days_since_sunday = today.weekday().number_days_from_sunday() as i64;
            Some(DateRange {
                start: (today - Duration::days(days_since_sunday))
                    .midnight()
                    .assume_utc(),
                end: now,
            })
        }
        "thisMonth" => Some(DateRange {
            start: today.replace_day(1).ok()?.midnight().assume_utc(),
            end: now,
        }),
        "lastMonth" => {
            let first_of_this_month = today.replace_day(1).ok()?;
            let last_of_previous = first_of_this_month - Duration::days(1);
            let first_of_previous = last_of_previous.replace_day(1).ok()?;
            Some(DateRange {
                start: first_of_previous.midnight().assume_utc(),
                end: last_of_previous.midnight().assume_utc(),
            })
        }
        "last30Days" => Some(DateRange {
            start: (today - Duration::days(30)).midnight().assume_utc(),
            end: now,
        }),
        "last90Days" => Some(DateRange {
            start: (today - Duration::days(90)).midnight().assume_utc(),
            end: now,
        }),
        "thisYear" => Some(DateRange {
            start: today
                .replace_day(1)
                .ok()?
                .replace_month(Month::January)
                .ok()?
                .midnight()
                .assume_utc(),
            end: now,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    // A Wednesday in mid-March.
    const NOW: OffsetDateTime = datetime!(2025-03-12 15:45:30 UTC);

    #[test]
    fn today_spans_the_calendar_day() {
        let range = resolve("today", NOW).unwrap();
        assert_eq!(range.start, datetime!(2025-03-12 00:00 UTC));
        assert_eq!(
            range.end,
            datetime!(2025-03-12 23:59:59.999 UTC)
        );
    }

    #[test]
    fn yesterday_is_the_previous_calendar_day() {
        let range = resolve("yesterday", NOW).unwrap();
        assert_eq!(range.start, datetime!(2025-03-11 00:00 UTC));
        assert_eq!(range.end, datetime!(2025-03-11 23:59:59.999 UTC));
    }

    #[test]
    fn this_week_starts_on_sunday() {
        let range = resolve("thisWeek", NOW).unwrap();
        assert_eq!(range.start, datetime!(2025-03-09 00:00 UTC));
        assert_eq!(range.end, NOW);
    }

    #[test]
    fn this_month_starts_on_the_first() {
        let range = resolve("thisMonth", NOW).unwrap();
        assert_eq!(range.start, datetime!(2025-03-01 00:00 UTC));
        assert_eq!(range.end, NOW);
    }

    #[test]
    fn last_month_is_the_whole_previous_month() {
        let range = resolve("lastMonth", NOW).unwrap();
        assert_eq!(range.start, datetime!(2025-02-01 00:00 UTC));
        assert_eq!(range.end, datetime!(2025-02-28 00:00 UTC));
    }

    #[test]
    fn last_month_crosses_year_boundary() {
        let january = datetime!(2025-01-10 09:00 UTC);
        let range = resolve("lastMonth", january).unwrap();
        assert_eq!(range.start, datetime!(2024-12-01 00:00 UTC));
        assert_eq!(range.end, datetime!(2024-12-31 00:00 UTC));
    }

    #[test]
    fn rolling_windows_count_back_from_today() {
        let thirty = resolve("last30Days", NOW).unwrap();
        assert_eq!(thirty.start, datetime!(2025-02-10 00:00 UTC));
        let ninety = resolve("last90Days", NOW).unwrap();
        assert_eq!(ninety.start, datetime!(2024-12-12 00:00 UTC));
    }

    #[test]
    fn this_year_starts_on_january_first() {
        let range = resolve("thisYear", NOW).unwrap();
        assert_eq!(range.start, datetime!(2025-01-01 00:00 UTC));
        assert_eq!(range.end, NOW);
    }

    #[test]
    fn unknown_period_resolves_to_none() {
        assert!(resolve("bogus", NOW).is_none());
        assert!(resolve("ThisMonth", NOW).is_none());
        assert!(resolve("", NOW).is_none());
    }

    #[test]
    fn every_advertised_period_resolves() {
        for period in VALID_PERIODS {
            assert!(resolve(period, NOW).is_some(), "period {period} must resolve");
        }
    }
}
