use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Format used when stamping a new record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Format used for the meal and sleep time-of-day columns.
pub const TIME_OF_DAY_FORMAT: &str = "%H:%M:%S";

pub mod columns {
    pub const TIMESTAMP: &str = "timestamp";
    pub const WEIGHT: &str = "weight";
    pub const SLEEP_HOURS: &str = "sleep_hours";
    pub const MOOD: &str = "mood";
    pub const SPEND: &str = "spend";
    pub const SPEND_CATEGORY: &str = "spend_category";
    pub const BREAKFAST_TIME: &str = "breakfast_time";
    pub const BREAKFAST_MENU: &str = "breakfast_menu";
    pub const LUNCH_TIME: &str = "lunch_time";
    pub const LUNCH_MENU: &str = "lunch_menu";
    pub const DINNER_TIME: &str = "dinner_time";
    pub const DINNER_MENU: &str = "dinner_menu";
    pub const SLEEP_START: &str = "sleep_start";
    pub const SLEEP_END: &str = "sleep_end";
    pub const MEMO: &str = "memo";
}

/// Every persisted row carries these columns, in this order for a fresh file.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    columns::TIMESTAMP,
    columns::WEIGHT,
    columns::SLEEP_HOURS,
    columns::MOOD,
    columns::SPEND,
    columns::SPEND_CATEGORY,
    columns::BREAKFAST_TIME,
    columns::BREAKFAST_MENU,
    columns::LUNCH_TIME,
    columns::LUNCH_MENU,
    columns::DINNER_TIME,
    columns::DINNER_MENU,
    columns::SLEEP_START,
    columns::SLEEP_END,
    columns::MEMO,
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpendCategory {
    Food,
    Hobby,
    Transport,
    DailyGoods,
    Medical,
    #[default]
    Other,
}

impl SpendCategory {
    pub const ALL: [SpendCategory; 6] = [
        Self::Food,
        Self::Hobby,
        Self::Transport,
        Self::DailyGoods,
        Self::Medical,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Hobby => "hobby",
            Self::Transport => "transport",
            Self::DailyGoods => "daily_goods",
            Self::Medical => "medical",
            Self::Other => "other",
        }
    }
}

/// One journal submission, as handed over by the intake layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub weight: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub mood: Option<u8>,
    pub spend: Option<f64>,
    pub spend_category: SpendCategory,
    pub breakfast_time: Option<NaiveTime>,
    pub breakfast_menu: Option<String>,
    pub lunch_time: Option<NaiveTime>,
    pub lunch_menu: Option<String>,
    pub dinner_time: Option<NaiveTime>,
    pub dinner_menu: Option<String>,
    pub sleep_start: Option<NaiveTime>,
    pub sleep_end: Option<NaiveTime>,
    pub memo: Option<String>,
}

impl Record {
    /// Empty record stamped at `timestamp`; every metric is null.
    pub fn at(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            weight: None,
            sleep_hours: None,
            mood: None,
            spend: None,
            spend_category: SpendCategory::default(),
            breakfast_time: None,
            breakfast_menu: None,
            lunch_time: None,
            lunch_menu: None,
            dinner_time: None,
            dinner_menu: None,
            sleep_start: None,
            sleep_end: None,
            memo: None,
        }
    }

    /// Cell values keyed by column name, in `REQUIRED_COLUMNS` order.
    /// Empty text is stored as null.
    pub fn cells(&self) -> Vec<(&'static str, Option<String>)> {
        fn number(v: Option<f64>) -> Option<String> {
            v.filter(|x| x.is_finite()).map(|x| x.to_string())
        }
        fn time(v: Option<NaiveTime>) -> Option<String> {
            v.map(|t| t.format(TIME_OF_DAY_FORMAT).to_string())
        }
        fn text(v: &Option<String>) -> Option<String> {
            v.as_ref().filter(|s| !s.trim().is_empty()).cloned()
        }

        vec![
            (
                columns::TIMESTAMP,
                Some(self.timestamp.format(TIMESTAMP_FORMAT).to_string()),
            ),
            (columns::WEIGHT, number(self.weight)),
            (columns::SLEEP_HOURS, number(self.sleep_hours)),
            (columns::MOOD, self.mood.map(|m| m.to_string())),
            (columns::SPEND, number(self.spend)),
            (
                columns::SPEND_CATEGORY,
                Some(self.spend_category.as_str().to_string()),
            ),
            (columns::BREAKFAST_TIME, time(self.breakfast_time)),
            (columns::BREAKFAST_MENU, text(&self.breakfast_menu)),
            (columns::LUNCH_TIME, time(self.lunch_time)),
            (columns::LUNCH_MENU, text(&self.lunch_menu)),
            (columns::DINNER_TIME, time(self.dinner_time)),
            (columns::DINNER_MENU, text(&self.dinner_menu)),
            (columns::SLEEP_START, time(self.sleep_start)),
            (columns::SLEEP_END, time(self.sleep_end)),
            (columns::MEMO, text(&self.memo)),
        ]
    }
}
