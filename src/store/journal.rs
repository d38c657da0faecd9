use crate::models::entry::{coerce_number, coerce_text, parse_timestamp, Entry, YearMonth};
use crate::models::record::columns;

use super::table::{RowMap, Table};

/// A loaded, reconciled table together with its type-coerced rows.
/// `entries[i]` is always the coerced form of table row `i`.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    table: Table,
    entries: Vec<Entry>,
}

impl Journal {
    pub fn from_table(table: Table) -> Self {
        let col = |name: &str| table.column_index(name);
        let timestamp = col(columns::TIMESTAMP);
        let weight = col(columns::WEIGHT);
        let sleep_hours = col(columns::SLEEP_HOURS);
        let mood = col(columns::MOOD);
        let spend = col(columns::SPEND);
        let spend_category = col(columns::SPEND_CATEGORY);
        let lunch_menu = col(columns::LUNCH_MENU);

        let raw = |row: usize, column: Option<usize>| column.and_then(|c| table.cell(row, c));

        let entries = (0..table.len())
            .map(|row| {
                let ts = parse_timestamp(raw(row, timestamp));
                Entry {
                    timestamp: ts,
                    month: ts.as_ref().map(YearMonth::of),
                    weight: coerce_number(raw(row, weight)),
                    sleep_hours: coerce_number(raw(row, sleep_hours)),
                    mood: coerce_number(raw(row, mood)),
                    spend: coerce_number(raw(row, spend)),
                    spend_category: coerce_text(raw(row, spend_category)),
                    lunch_menu: coerce_text(raw(row, lunch_menu)),
                }
            })
            .collect();

        Self { table, entries }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `limit` rows (all rows when `None`), in table order.
    pub fn tail_rows(&self, limit: Option<usize>) -> Vec<RowMap> {
        let skip = limit.map_or(0, |n| self.table.len().saturating_sub(n));
        self.table.rows().skip(skip).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_degrades_to_null() {
        let table = Table::from_csv(
            "timestamp,weight,sleep_hours,mood,spend,spend_category,lunch_menu\n\
             2024-01-05 08:00,70.5,7,4,1200,food,ramen\n\
             not a date,heavy,,x,12e2,,\n"
                .as_bytes(),
        )
        .unwrap();
        let journal = Journal::from_table(table);
        let [good, bad] = journal.entries() else {
            panic!("expected two entries");
        };

        assert_eq!(good.month.map(|m| m.to_string()).as_deref(), Some("2024-01"));
        assert_eq!(good.weight, Some(70.5));
        assert_eq!(good.sleep_hours, Some(7.0));
        assert_eq!(good.mood, Some(4.0));
        assert_eq!(good.spend_category.as_deref(), Some("food"));
        assert_eq!(good.lunch_menu.as_deref(), Some("ramen"));

        assert_eq!(bad.timestamp, None);
        assert_eq!(bad.month, None);
        assert_eq!(bad.weight, None);
        assert_eq!(bad.mood, None);
        assert_eq!(bad.spend, Some(1200.0));
        assert_eq!(bad.spend_category, None);
        assert_eq!(journal.len(), 2, "unparseable rows stay in the table");
    }

    #[test]
    fn test_tail_rows() {
        let table = Table::from_csv(b"memo\na\nb\nc\n").unwrap();
        let journal = Journal::from_table(table);

        let last_two: Vec<_> = journal
            .tail_rows(Some(2))
            .iter()
            .map(|r| r.get("memo").unwrap().to_string())
            .collect();
        assert_eq!(last_two, vec!["b", "c"]);
        assert_eq!(journal.tail_rows(None).len(), 3);
        assert_eq!(journal.tail_rows(Some(10)).len(), 3);
    }
}
