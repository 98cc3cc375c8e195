//! Calendar period bucketing (yearly / monthly rollups)

use super::model::{OrderId, OrderLine};
use super::summary::ratio;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Month,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Year => "year",
            Granularity::Month => "month",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "year" => Some(Granularity::Year),
            "month" => Some(Granularity::Month),
            _ => None,
        }
    }

    pub fn all() -> [Granularity; 2] {
        [Granularity::Year, Granularity::Month]
    }

    /// Truncate a date to the start of its bucket
    pub fn truncate(&self, date: NaiveDate) -> Period {
        match self {
            Granularity::Year => Period {
                year: date.year(),
                month: None,
            },
            Granularity::Month => Period {
                year: date.year(),
                month: Some(date.month()),
            },
        }
    }
}

/// A calendar year, or a month within a year
///
/// Ordering is chronological: by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: Option<u32>,
}

impl Period {
    /// First day of the period
    pub fn start(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.unwrap_or(1), 1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(month) => write!(f, "{:04}-{:02}", self.year, month),
            None => write!(f, "{:04}", self.year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub order_count: usize,
    pub quantity_sum: u64,
    pub revenue_sum: f64,
}

#[derive(Default)]
struct PeriodAccumulator {
    orders: HashSet<OrderId>,
    quantity_sum: u64,
    revenue_sum: f64,
}

/// Bucket lines by truncated order date
///
/// Monthly buckets come back oldest first (drill-down views); yearly buckets
/// newest first (overview listings).
pub fn bucket_by_period<'a, I>(lines: I, granularity: Granularity) -> Vec<PeriodSummary>
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    let mut buckets: BTreeMap<Period, PeriodAccumulator> = BTreeMap::new();

    for line in lines {
        let acc = buckets
            .entry(granularity.truncate(line.order_date))
            .or_default();
        acc.orders.insert(line.order_id);
        acc.quantity_sum += line.quantity as u64;
        acc.revenue_sum += line.revenue();
    }

    let ascending = buckets.into_iter().map(|(period, acc)| PeriodSummary {
        period,
        order_count: acc.orders.len(),
        quantity_sum: acc.quantity_sum,
        revenue_sum: acc.revenue_sum,
    });

    match granularity {
        Granularity::Month => ascending.collect(),
        Granularity::Year => {
            let mut periods: Vec<PeriodSummary> = ascending.collect();
            periods.reverse();
            periods
        }
    }
}

/// Revenue change of one period relative to the period before it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodChange {
    pub period: Period,
    pub revenue_sum: f64,
    /// Percentage change against the previous period; `None` for the first period
    pub change_pct: Option<f64>,
}

/// Period-over-period revenue trend, oldest first
///
/// Accepts periods in either order. A previous period with zero revenue yields
/// a change of 0.
pub fn revenue_trend(periods: &[PeriodSummary]) -> Vec<PeriodChange> {
    let mut chronological: Vec<&PeriodSummary> = periods.iter().collect();
    chronological.sort_by_key(|p| p.period);

    let mut previous: Option<f64> = None;
    chronological
        .into_iter()
        .map(|p| {
            let change_pct =
                previous.map(|prev| ratio(p.revenue_sum - prev, prev) * 100.0);
            previous = Some(p.revenue_sum);
            PeriodChange {
                period: p.period,
                revenue_sum: p.revenue_sum,
                change_pct,
            }
        })
        .collect()
}
