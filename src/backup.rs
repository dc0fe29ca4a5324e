use crate::clock::Clock;
use crate::errors::{ImportError, StoreError};
use crate::history::read_history;
use crate::models::{history_key, BackupDocument, DailyRecord, BACKUP_VERSION, CURRENT_KEY};
use crate::store::KeyValueStore;
use chrono::SecondsFormat;
use serde_json::Value;
use tracing::{debug, info};

/// Snapshot of every archived day plus today's record.
pub fn export_all<S: KeyValueStore + ?Sized>(store: &S, clock: &dyn Clock) -> BackupDocument {
    BackupDocument {
        version: BACKUP_VERSION,
        exported_at: clock.now_utc().to_rfc3339_opts(SecondsFormat::Millis, true),
        counter_data: store
            .get(CURRENT_KEY)
            .and_then(|raw| DailyRecord::decode(&raw)),
        history_entries: read_history(store),
    }
}

pub fn export_file_name(clock: &dyn Clock) -> String {
    format!(
        "daily-counter-backup-{}.json",
        clock.now_utc().date_naive().format("%Y-%m-%d")
    )
}

/// Merges a backup file into the store and returns how many history records
/// were added.
///
/// Existing records always win: a day already in history is left alone and the
/// backup's current record is only taken when the store has none. Entries
/// without a date or a non-negative integer count are skipped. A document that
/// is not UTF-8 JSON, or has no `historyEntries` array, is rejected before anything
/// is written. The `version` field is not inspected.
pub fn import_all<S: KeyValueStore + ?Sized>(store: &mut S, raw: &[u8]) -> Result<usize, ImportError> {
    let document: Value = serde_json::from_slice(raw).map_err(|err| {
        debug!("backup is not valid json: {err}");
        ImportError::InvalidDocument
    })?;
    let entries = document
        .get("historyEntries")
        .and_then(Value::as_array)
        .ok_or(ImportError::InvalidDocument)?;

    let mut imported = 0;
    for entry in entries {
        let Some(record) = valid_entry(entry) else {
            debug!(%entry, "skipping invalid backup entry");
            continue;
        };
        let key = history_key(&record.date);
        if store.get(&key).is_none() {
            store.set(&key, record.encode().map_err(StoreError::from)?)?;
            imported += 1;
        }
    }

    if store.get(CURRENT_KEY).is_none() {
        if let Some(record) = document.get("counterData").and_then(valid_entry) {
            store.set(CURRENT_KEY, record.encode().map_err(StoreError::from)?)?;
            info!(date = %record.date, "restored current record from backup");
        }
    }

    info!(imported, skipped = entries.len() - imported, "backup imported");
    Ok(imported)
}

pub fn import_message(imported: usize) -> String {
    format!("Imported {imported} record(s). Existing records were kept.")
}

fn valid_entry(value: &Value) -> Option<DailyRecord> {
    let date = value.get("date")?.as_str().filter(|date| !date.is_empty())?;
    let count = value.get("count")?.as_u64()?;
    Some(DailyRecord::new(date, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::history::list_history;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock::at_day(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap())
    }

    fn seed(store: &mut MemoryStore, key: &str, record: DailyRecord) {
        store.set(key, record.encode().unwrap()).unwrap();
    }

    fn stored(store: &MemoryStore, key: &str) -> Option<DailyRecord> {
        store.get(key).and_then(|raw| DailyRecord::decode(&raw))
    }

    #[test]
    fn export_collects_history_and_today() {
        let mut store = MemoryStore::new();
        seed(&mut store, CURRENT_KEY, DailyRecord::new("2024-03-02", 4));
        seed(&mut store, "counterHistory_2024-03-01", DailyRecord::new("2024-03-01", 9));
        store.set("counterHistory_broken", "nope".into()).unwrap();

        let document = export_all(&store, &clock());
        assert_eq!(document.version, 1);
        assert!(document.exported_at.ends_with('Z'));
        assert_eq!(document.counter_data, Some(DailyRecord::new("2024-03-02", 4)));
        assert_eq!(document.history_entries, vec![DailyRecord::new("2024-03-01", 9)]);

        let json = serde_json::to_value(&document).unwrap();
        assert!(json.get("exportedAt").is_some());
        assert!(json.get("historyEntries").is_some());
        assert_eq!(json["counterData"]["count"], 4);
    }

    #[test]
    fn export_without_current_record_is_null() {
        let document = export_all(&MemoryStore::new(), &clock());
        let json = serde_json::to_value(&document).unwrap();
        assert!(json["counterData"].is_null());
        assert_eq!(json["historyEntries"], serde_json::json!([]));
    }

    #[test]
    fn file_name_uses_export_date() {
        let clock = FixedClock::new(
            chrono::DateTime::parse_from_rfc3339("2024-05-06T12:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Local),
        );
        assert_eq!(export_file_name(&clock), "daily-counter-backup-2024-05-06.json");
    }

    #[test]
    fn import_keeps_existing_history() {
        let mut store = MemoryStore::new();
        seed(&mut store, "counterHistory_2024-01-01", DailyRecord::new("2024-01-01", 5));

        let raw = r#"{
            "version": 1,
            "exportedAt": "2024-01-03T10:00:00.000Z",
            "counterData": null,
            "historyEntries": [
                { "date": "2024-01-01", "count": 99 },
                { "date": "2024-01-02", "count": 3 }
            ]
        }"#;
        assert_eq!(import_all(&mut store, raw.as_bytes()).unwrap(), 1);
        assert_eq!(
            stored(&store, "counterHistory_2024-01-01"),
            Some(DailyRecord::new("2024-01-01", 5))
        );
        assert_eq!(
            stored(&store, "counterHistory_2024-01-02"),
            Some(DailyRecord::new("2024-01-02", 3))
        );
    }

    #[test]
    fn import_skips_invalid_entries() {
        let mut store = MemoryStore::new();
        let raw = r#"{
            "historyEntries": [
                { "date": "2024-01-01", "count": 2 },
                { "date": "", "count": 2 },
                { "count": 2 },
                { "date": "2024-01-03", "count": "2" },
                { "date": "2024-01-04", "count": -1 },
                { "date": "2024-01-05" },
                7,
                { "date": "2024-01-01", "count": 8 }
            ]
        }"#;
        assert_eq!(import_all(&mut store, raw.as_bytes()).unwrap(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(
            stored(&store, "counterHistory_2024-01-01"),
            Some(DailyRecord::new("2024-01-01", 2))
        );
    }

    #[test]
    fn import_sets_current_only_when_absent() {
        let raw = r#"{"historyEntries": [], "counterData": {"date": "2024-01-09", "count": 6}}"#;

        let mut empty = MemoryStore::new();
        import_all(&mut empty, raw.as_bytes()).unwrap();
        assert_eq!(stored(&empty, CURRENT_KEY), Some(DailyRecord::new("2024-01-09", 6)));

        let mut existing = MemoryStore::new();
        seed(&mut existing, CURRENT_KEY, DailyRecord::new("2024-01-10", 1));
        import_all(&mut existing, raw.as_bytes()).unwrap();
        assert_eq!(stored(&existing, CURRENT_KEY), Some(DailyRecord::new("2024-01-10", 1)));
    }

    #[test]
    fn malformed_documents_write_nothing() {
        for raw in [
            "",
            "not json",
            "[]",
            "42",
            r#"{"counterData": {"date": "2024-01-01", "count": 1}}"#,
            r#"{"historyEntries": {"date": "2024-01-01", "count": 1}}"#,
        ] {
            let mut store = MemoryStore::new();
            let err = import_all(&mut store, raw.as_bytes()).unwrap_err();
            assert!(matches!(err, ImportError::InvalidDocument), "{raw}");
            assert_eq!(err.to_string(), "Invalid backup file");
            assert!(store.is_empty(), "{raw}");
        }
    }

    #[test]
    fn non_utf8_document_is_invalid() {
        let mut store = MemoryStore::new();
        let err = import_all(&mut store, &[0xff, 0xfe, b'{']).unwrap_err();
        assert!(matches!(err, ImportError::InvalidDocument));
        assert!(store.is_empty());
    }

    #[test]
    fn export_then_import_into_empty_store() {
        let mut store = MemoryStore::new();
        seed(&mut store, CURRENT_KEY, DailyRecord::new("2024-03-02", 2));
        for (date, count) in [("2024-02-28", 1), ("2024-02-29", 0), ("2024-03-01", 12)] {
            seed(&mut store, &history_key(date), DailyRecord::new(date, count));
        }
        let before = list_history(&store);
        let raw = serde_json::to_string_pretty(&export_all(&store, &clock())).unwrap();

        let mut restored = MemoryStore::new();
        assert_eq!(import_all(&mut restored, raw.as_bytes()).unwrap(), 3);
        assert_eq!(list_history(&restored), before);
        assert_eq!(stored(&restored, CURRENT_KEY), Some(DailyRecord::new("2024-03-02", 2)));
        assert_eq!(restored.len(), store.len());
    }

    #[test]
    fn message_reports_count() {
        assert_eq!(import_message(2), "Imported 2 record(s). Existing records were kept.");
    }
}
