//! Rule-based journal alerts.
//!
//! Rules run in a fixed order and never fail: a null value simply does not
//! satisfy a numeric comparison. When nothing fires, a single all-clear
//! alert is returned.

use std::fmt;

use serde::Serialize;

use crate::models::entry::Entry;
use crate::services::stats::{mean, sum};

pub const SHORT_SLEEP_HOURS: f64 = 6.0;
pub const SHORT_SLEEP_MIN_ROWS: usize = 3;
pub const SHORT_SLEEP_MAX_SPAN_DAYS: i64 = 5;

pub const MOOD_WINDOW: usize = 3;
pub const LOW_MOOD_MEAN: f64 = 2.0;

pub const WEIGHT_SWING_KG: f64 = 1.5;

pub const SPEND_WINDOW: usize = 7;
pub const SPEND_LIMIT: f64 = 15_000.0;

pub const MONOTONOUS_LUNCH_MIN_ROWS: usize = 3;
pub const MONOTONOUS_LUNCH_KEYWORDS: [&str; 7] = [
    "カップラーメン",
    "ラーメン",
    "揚げ物",
    "instant noodle",
    "ramen",
    "noodle",
    "fried",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    ShortSleep,
    MoodDecline,
    WeightSwing,
    SpendingSpike,
    MealMonotony,
    AllClear,
}

impl AlertKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::ShortSleep => {
                "🛌 You have slept less than 6 hours on 3 or more days recently. Try to get to bed earlier."
            }
            Self::MoodDecline => {
                "😟 Your mood has been low lately. Try adding a few small things you enjoy to your day."
            }
            Self::WeightSwing => {
                "⚠️ Your weight changed sharply since the last entry. Keep an eye on how you feel."
            }
            Self::SpendingSpike => {
                "💸 Spending over the last week is on the high side. Check for anything you could cut back."
            }
            Self::MealMonotony => {
                "🍜 Your lunches have been one-sided lately. Aim for a more balanced diet."
            }
            Self::AllClear => "✅ Nothing to flag. Keep up the good habits!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: &'static str,
}

impl From<AlertKind> for Alert {
    fn from(kind: AlertKind) -> Self {
        Self {
            kind,
            message: kind.message(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

fn tail(entries: &[Entry], n: usize) -> &[Entry] {
    &entries[entries.len().saturating_sub(n)..]
}

/// Counts every short night in the table, not a consecutive run, and fires
/// when there are enough of them and the earliest and latest fall within
/// the span limit.
fn short_sleep(entries: &[Entry]) -> bool {
    let short: Vec<&Entry> = entries
        .iter()
        .filter(|e| e.sleep_hours.is_some_and(|h| h < SHORT_SLEEP_HOURS))
        .collect();
    if short.len() < SHORT_SLEEP_MIN_ROWS {
        return false;
    }

    let stamps = short.iter().filter_map(|e| e.timestamp);
    match (stamps.clone().min(), stamps.max()) {
        (Some(first), Some(last)) => (last - first).num_days() <= SHORT_SLEEP_MAX_SPAN_DAYS,
        _ => false,
    }
}

fn mood_decline(entries: &[Entry]) -> bool {
    mean(tail(entries, MOOD_WINDOW).iter().map(|e| e.mood)).is_some_and(|m| m <= LOW_MOOD_MEAN)
}

fn weight_swing(entries: &[Entry]) -> bool {
    match tail(entries, 2) {
        [previous, last] => match (previous.weight, last.weight) {
            (Some(a), Some(b)) => (b - a).abs() > WEIGHT_SWING_KG,
            _ => false,
        },
        _ => false,
    }
}

fn spending_spike(entries: &[Entry]) -> bool {
    sum(tail(entries, SPEND_WINDOW).iter().map(|e| e.spend)) > SPEND_LIMIT
}

fn is_monotonous_lunch(menu: &str) -> bool {
    let lowered = menu.to_lowercase();
    MONOTONOUS_LUNCH_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

fn meal_monotony(entries: &[Entry]) -> bool {
    entries
        .iter()
        .filter(|e| e.lunch_menu.as_deref().is_some_and(is_monotonous_lunch))
        .count()
        >= MONOTONOUS_LUNCH_MIN_ROWS
}

/// Evaluates every rule against the full table, in table order.
pub fn evaluate(entries: &[Entry]) -> Vec<Alert> {
    let rules: [(AlertKind, fn(&[Entry]) -> bool); 5] = [
        (AlertKind::ShortSleep, short_sleep),
        (AlertKind::MoodDecline, mood_decline),
        (AlertKind::WeightSwing, weight_swing),
        (AlertKind::SpendingSpike, spending_spike),
        (AlertKind::MealMonotony, meal_monotony),
    ];

    let mut alerts: Vec<Alert> = rules
        .iter()
        .filter(|(_, fires)| fires(entries))
        .map(|(kind, _)| Alert::from(*kind))
        .collect();

    if alerts.is_empty() {
        alerts.push(AlertKind::AllClear.into());
    }
    alerts
}
