use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::entry::{Entry, YearMonth};
use crate::services::stats::{round2, Mean};

/// Rows shown in the sleep/mood trend.
pub const RECENT_WINDOW_SIZE: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverage {
    pub month: YearMonth,
    pub weight: Option<f64>,
    pub mood: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub week_start: NaiveDate,
    pub entries: usize,
    pub sleep_hours: Option<f64>,
    pub mood: Option<f64>,
    pub spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentPoint {
    pub timestamp: Option<NaiveDateTime>,
    pub sleep_hours: Option<f64>,
    pub mood: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentWindow {
    pub points: Vec<RecentPoint>,
    /// Fewer than two points carry no trend worth charting.
    pub has_trend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub monthly_averages: Vec<MonthlyAverage>,
    pub weekly_summaries: Vec<WeeklySummary>,
    pub recent_window: RecentWindow,
    pub category_totals: Vec<CategoryTotal>,
}

pub fn summarize(entries: &[Entry]) -> Summary {
    Summary {
        monthly_averages: monthly_averages(entries),
        weekly_summaries: weekly_summaries(entries),
        recent_window: recent_window(entries),
        category_totals: category_totals(entries),
    }
}

/// Mean weight and mood per calendar month, oldest month first. Rows
/// without a parseable timestamp belong to no month.
pub fn monthly_averages(entries: &[Entry]) -> Vec<MonthlyAverage> {
    let mut groups: BTreeMap<YearMonth, (Mean, Mean)> = BTreeMap::new();
    for entry in entries {
        let Some(month) = entry.month else { continue };
        let (weight, mood) = groups.entry(month).or_default();
        weight.push(entry.weight);
        mood.push(entry.mood);
    }

    groups
        .into_iter()
        .map(|(month, (weight, mood))| MonthlyAverage {
            month,
            weight: weight.value().map(round2),
            mood: mood.value().map(round2),
        })
        .collect()
}

fn find_monday(date: NaiveDate) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday(); // Mon=0
    date - Duration::days(weekday as i64)
}

/// Per ISO week (keyed by its Monday): row count, mean sleep and mood, and
/// total spend.
pub fn weekly_summaries(entries: &[Entry]) -> Vec<WeeklySummary> {
    #[derive(Default)]
    struct Acc {
        entries: usize,
        sleep: Mean,
        mood: Mean,
        spend: f64,
    }

    let mut groups: BTreeMap<NaiveDate, Acc> = BTreeMap::new();
    for entry in entries {
        let Some(ts) = entry.timestamp else { continue };
        let acc = groups.entry(find_monday(ts.date())).or_default();
        acc.entries += 1;
        acc.sleep.push(entry.sleep_hours);
        acc.mood.push(entry.mood);
        acc.spend += entry.spend.unwrap_or(0.0);
    }

    groups
        .into_iter()
        .map(|(week_start, acc)| WeeklySummary {
            week_start,
            entries: acc.entries,
            sleep_hours: acc.sleep.value().map(round2),
            mood: acc.mood.value().map(round2),
            spend: acc.spend,
        })
        .collect()
}

/// Last `RECENT_WINDOW_SIZE` rows by timestamp. The sort is stable and puts
/// rows without a timestamp after every dated row.
pub fn recent_window(entries: &[Entry]) -> RecentWindow {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let skip = sorted.len().saturating_sub(RECENT_WINDOW_SIZE);
    let points: Vec<RecentPoint> = sorted
        .into_iter()
        .skip(skip)
        .map(|e| RecentPoint {
            timestamp: e.timestamp,
            sleep_hours: e.sleep_hours,
            mood: e.mood,
        })
        .collect();

    RecentWindow {
        has_trend: points.len() >= 2,
        points,
    }
}

/// Spend summed per category label; null spend counts as zero and rows
/// without a category are left out.
pub fn category_totals(entries: &[Entry]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in entries {
        if let Some(category) = entry.spend_category.as_deref() {
            *totals.entry(category).or_insert(0.0) += entry.spend.unwrap_or(0.0);
        }
    }

    totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect()
}
