use rust_decimal::{Decimal, RoundingStrategy};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::ApiError;

use super::dto::{CategoryBreakdown, ListExpensesParams, MonthlyEntry, PaginationMeta};
use super::repo::{CategoryStatsRow, ExpenseFilter, MonthRow};

pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 100;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn clamp_page_size(requested: i64) -> i64 {
    requested.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE)
}

pub fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

pub fn paginate(page: i64, page_size: i64, total_count: i64) -> PaginationMeta {
    let total_pages = (total_count + page_size - 1) / page_size;
    PaginationMeta {
        page,
        page_size,
        total_count,
        total_pages,
        has_next_page: page < total_pages,
        has_previous_page: page > 1,
    }
}

/// Accepts either a full RFC 3339 timestamp or a plain `YYYY-MM-DD` date,
/// which is taken as UTC midnight.
pub fn parse_date_param(name: &str, value: &str) -> Result<OffsetDateTime, ApiError> {
    if let Ok(ts) = OffsetDateTime::parse(value, &Rfc3339) {
        return Ok(ts);
    }
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format)
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| {
            ApiError::Validation(format!(
                "Invalid {name}: expected YYYY-MM-DD or an RFC 3339 timestamp"
            ))
        })
}

pub fn parse_filter(params: &ListExpensesParams) -> Result<ExpenseFilter, ApiError> {
    let start_date = params
        .start_date
        .as_deref()
        .map(|v| parse_date_param("startDate", v))
        .transpose()?;
    let end_date = params
        .end_date
        .as_deref()
        .map(|v| parse_date_param("endDate", v))
        .transpose()?;

    let category_ids = params
        .category_ids
        .as_deref()
        .map(|csv| {
            csv.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    Uuid::parse_str(s)
                        .map_err(|_| ApiError::Validation(format!("Invalid category id: {s}")))
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .filter(|ids| !ids.is_empty());

    let min_amount = params
        .min_amount
        .as_deref()
        .map(|v| {
            v.parse::<Decimal>()
                .map_err(|_| ApiError::Validation("Invalid minAmount".into()))
        })
        .transpose()?;
    let max_amount = params
        .max_amount
        .as_deref()
        .map(|v| {
            v.parse::<Decimal>()
                .map_err(|_| ApiError::Validation("Invalid maxAmount".into()))
        })
        .transpose()?;

    Ok(ExpenseFilter {
        start_date,
        end_date,
        category_ids,
        min_amount,
        max_amount,
    })
}

/// Share of the overall total, as a percentage rounded to one decimal place
/// (half away from zero). Zero when there is no spending at all.
fn percentage(total: Decimal, overall_total: Decimal) -> Decimal {
    if overall_total.is_zero() {
        return Decimal::ZERO;
    }
    (total * Decimal::from(100) / overall_total)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Attaches percentage shares and orders the breakdown by total, highest first.
pub fn build_breakdown(
    rows: Vec<CategoryStatsRow>,
    overall_total: Decimal,
) -> Vec<CategoryBreakdown> {
    let mut breakdown: Vec<CategoryBreakdown> = rows
        .into_iter()
        .map(|r| CategoryBreakdown {
            category_id: r.category_id,
            category_name: r.category_name,
            category_color: r.category_color,
            category_icon: r.category_icon,
            total: r.total,
            count: r.count,
            average: r.average,
            percentage: percentage(r.total, overall_total),
        })
        .collect();
    breakdown.sort_by(|a, b| b.total.cmp(&a.total));
    breakdown
}

/// Expands sparse per-month aggregates into exactly twelve entries, zero-filling
/// months with no expenses, and returns the year total alongside.
pub fn fill_months(rows: &[MonthRow]) -> (Vec<MonthlyEntry>, Decimal) {
    let months: Vec<MonthlyEntry> = MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let month = index as i32 + 1;
            match rows.iter().find(|r| r.month == month) {
                Some(r) => MonthlyEntry {
                    month,
                    month_name: (*name).to_string(),
                    total: r.total,
                    count: r.count,
                    average: r.average,
                },
                None => MonthlyEntry {
                    month,
                    month_name: (*name).to_string(),
                    total: Decimal::ZERO,
                    count: 0,
                    average: Decimal::ZERO,
                },
            }
        })
        .collect();
    let year_total = months.iter().map(|m| m.total).sum();
    (months, year_total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(mantissa: i64, scale: u32) -> Decimal {
        Decimal::new(mantissa, scale)
    }

    #[test]
    fn paginate_matches_ceiling_division() {
        let meta = paginate(3, 20, 95);
        assert_eq!(meta.total_pages, 5);
        assert!(meta.has_next_page);
        assert!(meta.has_previous_page);
        assert_eq!(offset(3, 20), 40);
    }

    #[test]
    fn paginate_last_page_has_no_next() {
        let meta = paginate(5, 20, 95);
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);
    }

    #[test]
    fn paginate_empty_result_set() {
        let meta = paginate(1, 20, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
        assert!(!meta.has_previous_page);
    }

    #[test]
    fn paginate_exact_multiple() {
        let meta = paginate(2, 10, 40);
        assert_eq!(meta.total_pages, 4);
        assert!(meta.has_next_page);
    }

    #[test]
    fn page_size_is_clamped_into_range() {
        assert_eq!(clamp_page_size(0), 1);
        assert_eq!(clamp_page_size(-5), 1);
        assert_eq!(clamp_page_size(20), 20);
        assert_eq!(clamp_page_size(1000), 100);
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let rows = vec![
            stats_row("Groceries", dec(6000, 2), 3),
            stats_row("Transport", dec(2500, 2), 2),
            stats_row("Fun", dec(1500, 2), 1),
        ];
        let overall = dec(10000, 2);
        let breakdown = build_breakdown(rows, overall);
        let sum: Decimal = breakdown.iter().map(|b| b.percentage).sum();
        assert_eq!(sum, dec(1000, 1)); // 100.0
        assert_eq!(breakdown[0].percentage, dec(600, 1)); // 60.0
    }

    #[test]
    fn percentage_rounds_half_away_from_zero() {
        // 1/3 of the total is 33.333..., which rounds to 33.3
        let rows = vec![stats_row("Thirds", Decimal::ONE, 1)];
        let breakdown = build_breakdown(rows, Decimal::from(3));
        assert_eq!(breakdown[0].percentage, dec(333, 1));
    }

    #[test]
    fn percentage_is_zero_when_overall_is_zero() {
        let rows = vec![stats_row("Anything", Decimal::ZERO, 0)];
        let breakdown = build_breakdown(rows, Decimal::ZERO);
        assert_eq!(breakdown[0].percentage, Decimal::ZERO);
    }

    #[test]
    fn breakdown_is_sorted_by_total_descending() {
        let rows = vec![
            stats_row("Small", dec(100, 2), 1),
            stats_row("Big", dec(9000, 2), 4),
            stats_row("Mid", dec(500, 2), 2),
        ];
        let breakdown = build_breakdown(rows, dec(9600, 2));
        let names: Vec<&str> = breakdown.iter().map(|b| b.category_name.as_str()).collect();
        assert_eq!(names, ["Big", "Mid", "Small"]);
    }

    #[test]
    fn fill_months_always_yields_twelve_entries() {
        let rows = vec![
            MonthRow {
                month: 3,
                total: dec(4200, 2),
                count: 2,
                average: dec(2100, 2),
            },
            MonthRow {
                month: 11,
                total: dec(800, 2),
                count: 1,
                average: dec(800, 2),
            },
        ];
        let (months, year_total) = fill_months(&rows);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, 1);
        assert_eq!(months[0].month_name, "January");
        assert_eq!(months[0].total, Decimal::ZERO);
        assert_eq!(months[2].total, dec(4200, 2));
        assert_eq!(months[10].month_name, "November");
        assert_eq!(months[11].month, 12);
        assert_eq!(year_total, dec(5000, 2));
    }

    #[test]
    fn year_total_equals_sum_of_months() {
        let rows: Vec<MonthRow> = (1..=12)
            .map(|month| MonthRow {
                month,
                total: dec(100 * month as i64, 2),
                count: 1,
                average: dec(100 * month as i64, 2),
            })
            .collect();
        let (months, year_total) = fill_months(&rows);
        let sum: Decimal = months.iter().map(|m| m.total).sum();
        assert_eq!(year_total, sum);
    }

    #[test]
    fn parse_date_param_accepts_plain_dates_and_timestamps() {
        let midnight = parse_date_param("startDate", "2025-03-15").unwrap();
        assert_eq!(midnight, time::macros::datetime!(2025-03-15 00:00 UTC));
        assert!(parse_date_param("startDate", "2025-03-15T12:30:00Z").is_ok());
        assert!(parse_date_param("startDate", "not-a-date").is_err());
    }

    #[test]
    fn parse_filter_splits_category_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let params = ListExpensesParams {
            start_date: None,
            end_date: None,
            category_ids: Some(format!("{a},{b}")),
            min_amount: Some("10.50".into()),
            max_amount: None,
            page: 1,
            page_size: 20,
        };
        let filter = parse_filter(&params).unwrap();
        assert_eq!(filter.category_ids, Some(vec![a, b]));
        assert_eq!(filter.min_amount, Some(dec(1050, 2)));
    }

    #[test]
    fn parse_filter_rejects_bad_category_id() {
        let params = ListExpensesParams {
            start_date: None,
            end_date: None,
            category_ids: Some("not-a-uuid".into()),
            min_amount: None,
            max_amount: None,
            page: 1,
            page_size: 20,
        };
        assert!(parse_filter(&params).is_err());
    }

    fn stats_row(name: &str, total: Decimal, count: i64) -> CategoryStatsRow {
        CategoryStatsRow {
            category_id: Uuid::new_v4(),
            category_name: name.to_string(),
            category_color: "#95A5A6".to_string(),
            category_icon: "\u{1F4CC}".to_string(),
            total,
            count,
            average: if count > 0 {
                total / Decimal::from(count)
            } else {
                Decimal::ZERO
            },
        }
    }
}
