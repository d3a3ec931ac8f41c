//! Sales report over a range of calendar days.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Error;

/// Days covered when the caller gives no start date.
pub const DEFAULT_REPORT_DAYS: u64 = 30;

/// Longest range a single report may span.
pub const MAX_REPORT_DAYS: u64 = 366;

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl ReportRange {
    /// Resolve optional bounds against `today`.
    ///
    /// A missing `to` is today; a missing `from` is the start of the
    /// [`DEFAULT_REPORT_DAYS`]-day window ending at `to`.
    pub fn resolve(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, Error> {
        let to = to.unwrap_or(today);
        let from = match from {
            Some(from) => from,
            None => to
                .checked_sub_days(Days::new(DEFAULT_REPORT_DAYS - 1))
                .ok_or_else(|| Error::validation("report range is out of bounds"))?,
        };
        if from > to {
            return Err(Error::validation("from must not be after to"));
        }
        let span = to.signed_duration_since(from).num_days() + 1;
        if u64::try_from(span).map_or(true, |days| days > MAX_REPORT_DAYS) {
            return Err(Error::validation(format!(
                "report range must span at most {MAX_REPORT_DAYS} days"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// First instant inside the range.
    pub fn start(&self) -> NaiveDateTime {
        self.from.and_time(NaiveTime::MIN)
    }

    /// First instant after the range.
    pub fn end_exclusive(&self) -> NaiveDateTime {
        self.to
            .checked_add_days(Days::new(1))
            .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN))
    }

    fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from.iter_days().take_while(|day| *day <= self.to)
    }
}

/// Totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub order_count: i64,
    pub revenue: i64,
}

/// Order count and revenue over a range, broken down per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub order_count: i64,
    pub revenue: i64,
    pub days: Vec<DailyTotals>,
}

impl OrdersReport {
    /// Aggregate `(createdAt, totalPrice)` pairs into daily buckets.
    ///
    /// Every day of the range appears, including days without orders.
    /// Pairs outside the range are ignored.
    pub fn aggregate(range: ReportRange, totals: &[(NaiveDateTime, i64)]) -> Self {
        let mut buckets: BTreeMap<NaiveDate, (i64, i64)> =
            range.days().map(|day| (day, (0, 0))).collect();
        for (created_at, total) in totals {
            if let Some((count, revenue)) = buckets.get_mut(&created_at.date()) {
                *count += 1;
                *revenue = revenue.saturating_add(*total);
            }
        }
        let days: Vec<DailyTotals> = buckets
            .into_iter()
            .map(|(date, (order_count, revenue))| DailyTotals {
                date,
                order_count,
                revenue,
            })
            .collect();
        Self {
            from: range.from,
            to: range.to,
            order_count: days.iter().map(|day| day.order_count).sum(),
            revenue: days
                .iter()
                .fold(0_i64, |sum, day| sum.saturating_add(day.revenue)),
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorKind;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn at(day: NaiveDate, hour: u32) -> NaiveDateTime {
        day.and_hms_opt(hour, 0, 0).expect("valid time")
    }

    #[rstest]
    fn defaults_to_thirty_days_ending_today() {
        let range = ReportRange::resolve(None, None, date(2026, 3, 30)).expect("valid");
        assert_eq!(range.from(), date(2026, 3, 1));
        assert_eq!(range.to(), date(2026, 3, 30));
    }

    #[rstest]
    fn inverted_ranges_are_rejected() {
        let err = ReportRange::resolve(Some(date(2026, 3, 2)), Some(date(2026, 3, 1)), date(2026, 3, 5))
            .expect_err("inverted");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[rstest]
    fn overly_long_ranges_are_rejected() {
        let result = ReportRange::resolve(Some(date(2020, 1, 1)), Some(date(2026, 1, 1)), date(2026, 1, 1));
        assert!(result.is_err());
    }

    #[rstest]
    fn bounds_cover_whole_days() {
        let range = ReportRange::resolve(Some(date(2026, 1, 1)), Some(date(2026, 1, 2)), date(2026, 1, 5))
            .expect("valid");
        assert_eq!(range.start(), at(date(2026, 1, 1), 0));
        assert_eq!(range.end_exclusive(), at(date(2026, 1, 3), 0));
    }

    #[rstest]
    fn aggregates_per_day_with_empty_days() {
        let range = ReportRange::resolve(Some(date(2026, 1, 1)), Some(date(2026, 1, 3)), date(2026, 1, 3))
            .expect("valid");
        let totals = [
            (at(date(2026, 1, 1), 9), 100),
            (at(date(2026, 1, 1), 17), 250),
            (at(date(2026, 1, 3), 8), 40),
            (at(date(2026, 1, 4), 8), 999),
        ];
        let report = OrdersReport::aggregate(range, &totals);
        assert_eq!(report.order_count, 3);
        assert_eq!(report.revenue, 390);
        let per_day: Vec<(i64, i64)> = report
            .days
            .iter()
            .map(|day| (day.order_count, day.revenue))
            .collect();
        assert_eq!(per_day, vec![(2, 350), (0, 0), (1, 40)]);
    }
}
