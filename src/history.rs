use crate::dates::{day_label, full_day_label, parse_day};
use crate::models::{DailyRecord, HistoryEntry, HistoryResponse, HISTORY_PREFIX};
use crate::store::KeyValueStore;
use std::cmp::Ordering;
use tracing::debug;

/// Every archived day, newest first.
///
/// Entries that fail to parse are skipped without complaint. Today's record is
/// never part of the history.
pub fn list_history<S: KeyValueStore + ?Sized>(store: &S) -> Vec<DailyRecord> {
    let mut records = read_history(store);
    records.sort_by(|a, b| newest_first(&a.date, &b.date));
    records
}

/// Archived records in key order, malformed ones dropped.
pub(crate) fn read_history<S: KeyValueStore + ?Sized>(store: &S) -> Vec<DailyRecord> {
    store
        .list_keys(HISTORY_PREFIX)
        .into_iter()
        .filter_map(|key| {
            let record = store.get(&key).and_then(|raw| DailyRecord::decode(&raw));
            if record.is_none() {
                debug!(%key, "skipping malformed history record");
            }
            record
        })
        .collect()
}

pub fn total_count(records: &[DailyRecord]) -> u64 {
    records
        .iter()
        .fold(0u64, |total, record| total.saturating_add(record.count))
}

/// Mean count rounded to the nearest integer, 0 for an empty history.
pub fn average_count(records: &[DailyRecord]) -> u64 {
    if records.is_empty() {
        return 0;
    }
    (total_count(records) as f64 / records.len() as f64).round() as u64
}

pub fn build_history<S: KeyValueStore + ?Sized>(store: &S) -> HistoryResponse {
    let records = list_history(store);
    let total = total_count(&records);
    let average = average_count(&records);
    let entries = records
        .into_iter()
        .map(|record| HistoryEntry {
            label: day_label(&record.date),
            full_label: full_day_label(&record.date),
            date: record.date,
            count: record.count,
        })
        .collect();

    HistoryResponse {
        entries,
        total,
        average,
    }
}

// Dated entries by descending date, undated ones last.
fn newest_first(a: &str, b: &str) -> Ordering {
    match (parse_day(a), parse_day(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::history_key;
    use crate::store::MemoryStore;

    fn seed(store: &mut MemoryStore, date: &str, count: u64) {
        store
            .set(&history_key(date), DailyRecord::new(date, count).encode().unwrap())
            .unwrap();
    }

    #[test]
    fn lists_newest_first() {
        let mut store = MemoryStore::new();
        seed(&mut store, "2024-01-01", 1);
        seed(&mut store, "2024-03-01", 3);
        seed(&mut store, "2024-02-01", 2);

        let dates: Vec<String> = list_history(&store).into_iter().map(|r| r.date).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
    }

    #[test]
    fn orders_by_date_value_not_string() {
        let mut store = MemoryStore::new();
        seed(&mut store, "Wed Jan 31 2024", 1);
        seed(&mut store, "Thu Feb 01 2024", 2);
        seed(&mut store, "2024-01-15", 3);
        seed(&mut store, "not a date", 4);

        let dates: Vec<String> = list_history(&store).into_iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec!["Thu Feb 01 2024", "Wed Jan 31 2024", "2024-01-15", "not a date"]
        );
    }

    #[test]
    fn skips_malformed_records_and_current_day() {
        let mut store = MemoryStore::new();
        seed(&mut store, "2024-01-01", 4);
        store.set("counterHistory_2024-01-02", "garbage".into()).unwrap();
        store
            .set("counterHistory_2024-01-03", r#"{"date":"2024-01-03","count":-2}"#.into())
            .unwrap();
        store
            .set("counterData", DailyRecord::new("2024-01-04", 50).encode().unwrap())
            .unwrap();

        let records = list_history(&store);
        assert_eq!(records, vec![DailyRecord::new("2024-01-01", 4)]);
    }

    #[test]
    fn totals_and_rounded_average() {
        let records = vec![
            DailyRecord::new("2024-01-01", 1),
            DailyRecord::new("2024-01-02", 2),
        ];
        assert_eq!(total_count(&records), 3);
        // 1.5 rounds up
        assert_eq!(average_count(&records), 2);

        let records = vec![
            DailyRecord::new("2024-01-01", 1),
            DailyRecord::new("2024-01-02", 1),
            DailyRecord::new("2024-01-03", 2),
        ];
        assert_eq!(total_count(&records), 4);
        assert_eq!(average_count(&records), 1);
    }

    #[test]
    fn empty_history_averages_zero() {
        assert_eq!(total_count(&[]), 0);
        assert_eq!(average_count(&[]), 0);

        let summary = build_history(&MemoryStore::new());
        assert!(summary.entries.is_empty());
        assert_eq!(summary.average, 0);
    }

    #[test]
    fn summary_carries_labels() {
        let mut store = MemoryStore::new();
        seed(&mut store, "2024-01-01", 10);
        seed(&mut store, "2024-01-02", 5);

        let summary = build_history(&store);
        assert_eq!(summary.total, 15);
        assert_eq!(summary.average, 8);
        assert_eq!(summary.entries[0].label, "Tue, Jan 2");
        assert_eq!(summary.entries[0].full_label, "Tuesday, January 2, 2024");
        assert_eq!(summary.entries[1].date, "2024-01-01");
    }
}
