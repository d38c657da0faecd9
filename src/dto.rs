//! # Health Log — Request DTOs
//!
//! Intake shapes for the JSON API. Responses reuse the store's `RowMap` and
//! the dashboard's `Dashboard` directly.
//!
//! Conventions:
//! - `*Request` → deserialized from the client JSON body
//! - `*Query`   → deserialized from query params
//! - Range and length checks are expressed via `validator` derive macros

use chrono::{NaiveDateTime, NaiveTime};
use serde::Deserialize;
use validator::Validate;

use crate::models::record::{Record, SpendCategory};

/// POST /api/records
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRecordRequest {
    /// Body weight in kg
    pub weight: Option<f64>,

    #[validate(range(min = 0.0, max = 24.0, message = "Sleep hours must be between 0 and 24"))]
    pub sleep_hours: Option<f64>,

    /// 1 = bad .. 5 = good
    #[validate(range(min = 1, max = 5, message = "Mood must be between 1 and 5"))]
    pub mood: Option<u8>,

    pub spend: Option<f64>,

    /// Default: "other"
    #[serde(default)]
    pub spend_category: SpendCategory,

    pub breakfast_time: Option<NaiveTime>,
    #[validate(length(max = 500, message = "Meal description must be under 500 characters"))]
    pub breakfast_menu: Option<String>,

    pub lunch_time: Option<NaiveTime>,
    #[validate(length(max = 500, message = "Meal description must be under 500 characters"))]
    pub lunch_menu: Option<String>,

    pub dinner_time: Option<NaiveTime>,
    #[validate(length(max = 500, message = "Meal description must be under 500 characters"))]
    pub dinner_menu: Option<String>,

    /// Bedtime
    pub sleep_start: Option<NaiveTime>,
    /// Wake-up time
    pub sleep_end: Option<NaiveTime>,

    #[validate(length(max = 2000, message = "Memo must be under 2000 characters"))]
    pub memo: Option<String>,
}

impl CreateRecordRequest {
    pub fn into_record(self, timestamp: NaiveDateTime) -> Record {
        Record {
            timestamp,
            weight: self.weight,
            sleep_hours: self.sleep_hours,
            mood: self.mood,
            spend: self.spend,
            spend_category: self.spend_category,
            breakfast_time: self.breakfast_time,
            breakfast_menu: self.breakfast_menu,
            lunch_time: self.lunch_time,
            lunch_menu: self.lunch_menu,
            dinner_time: self.dinner_time,
            dinner_menu: self.dinner_menu,
            sleep_start: self.sleep_start,
            sleep_end: self.sleep_end,
            memo: self.memo,
        }
    }
}

/// GET /api/records
#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    /// Only the last `limit` rows. Default: all
    pub limit: Option<usize>,
}
