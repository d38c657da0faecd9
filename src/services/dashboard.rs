use serde::Serialize;

use crate::services::aggregator::{self, Summary};
use crate::services::alerts::{self, Alert};
use crate::store::journal::Journal;
use crate::store::{RecordStore, StoreResult};

/// Everything the dashboard shows, rebuilt from the full table each time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub has_records: bool,
    pub record_count: usize,
    #[serde(flatten)]
    pub summary: Summary,
    pub alerts: Vec<Alert>,
}

impl Dashboard {
    pub fn from_journal(journal: &Journal) -> Self {
        let entries = journal.entries();
        Self {
            has_records: !journal.is_empty(),
            record_count: journal.len(),
            summary: aggregator::summarize(entries),
            alerts: alerts::evaluate(entries),
        }
    }
}

/// One full load → aggregate → alert cycle.
pub fn build(store: &RecordStore) -> StoreResult<Dashboard> {
    let journal = store.load()?;
    let dashboard = Dashboard::from_journal(&journal);
    tracing::debug!(
        records = dashboard.record_count,
        alerts = dashboard.alerts.len(),
        "Dashboard rebuilt"
    );
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{Record, SpendCategory};
    use crate::services::alerts::AlertKind;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_store_dashboard() {
        let dashboard = build(&RecordStore::in_memory()).unwrap();

        assert!(!dashboard.has_records);
        assert_eq!(dashboard.record_count, 0);
        assert!(dashboard.summary.monthly_averages.is_empty());
        assert!(!dashboard.summary.recent_window.has_trend);
        assert_eq!(
            dashboard.alerts.iter().map(|a| a.kind).collect::<Vec<_>>(),
            vec![AlertKind::AllClear]
        );
    }

    #[test]
    fn test_dashboard_after_appends() {
        let store = RecordStore::in_memory();
        for (day, weight, spend) in [(10, 70.0, 9_000.0), (11, 72.0, 7_000.0)] {
            let ts = NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(21, 0, 0)
                .unwrap();
            let mut record = Record::at(ts);
            record.weight = Some(weight);
            record.mood = Some(4);
            record.spend = Some(spend);
            record.spend_category = SpendCategory::Food;
            store.append(&record).unwrap();
        }

        let dashboard = build(&store).unwrap();
        assert!(dashboard.has_records);
        assert_eq!(dashboard.record_count, 2);
        assert_eq!(dashboard.summary.monthly_averages[0].weight, Some(71.0));
        assert_eq!(dashboard.summary.category_totals[0].total, 16_000.0);
        assert!(dashboard.summary.recent_window.has_trend);
        assert_eq!(
            dashboard.alerts.iter().map(|a| a.kind).collect::<Vec<_>>(),
            vec![AlertKind::WeightSwing, AlertKind::SpendingSpike]
        );
    }

    #[test]
    fn test_dashboard_json_shape() {
        let dashboard = build(&RecordStore::in_memory()).unwrap();
        let json = serde_json::to_value(&dashboard).unwrap();

        for key in [
            "has_records",
            "record_count",
            "monthly_averages",
            "weekly_summaries",
            "recent_window",
            "category_totals",
            "alerts",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["recent_window"]["has_trend"], false);
        assert!(json["recent_window"]["points"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_dashboard_json_reports_trend_flag() {
        let store = RecordStore::in_memory();
        let stamp = |day: u32| {
            NaiveDate::from_ymd_opt(2024, 2, day)
                .unwrap()
                .and_hms_opt(22, 0, 0)
                .unwrap()
        };

        store.append(&Record::at(stamp(1))).unwrap();
        let json = serde_json::to_value(build(&store).unwrap()).unwrap();
        assert_eq!(json["recent_window"]["has_trend"], false);
        assert_eq!(json["recent_window"]["points"].as_array().unwrap().len(), 1);

        store.append(&Record::at(stamp(2))).unwrap();
        let json = serde_json::to_value(build(&store).unwrap()).unwrap();
        assert_eq!(json["recent_window"]["has_trend"], true);
    }
}
