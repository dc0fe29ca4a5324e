use crate::clock::Clock;
use crate::dates::day_string;
use crate::errors::StoreError;
use crate::models::{history_key, DailyRecord, CURRENT_KEY};
use crate::store::KeyValueStore;
use tracing::{debug, info};

/// Owns the count for "today" and writes every change through to the store.
///
/// Opening the counter runs the day rollover: a stored record from an earlier
/// day is archived under its own date and today starts again at zero.
pub struct DailyCounter<'a, S: KeyValueStore + ?Sized> {
    store: &'a mut S,
    date: String,
    count: u64,
}

impl<'a, S: KeyValueStore + ?Sized> DailyCounter<'a, S> {
    pub fn open(store: &'a mut S, clock: &dyn Clock) -> Result<Self, StoreError> {
        let today = day_string(clock.today());
        let saved = store.get(CURRENT_KEY).and_then(|raw| {
            let record = DailyRecord::decode(&raw);
            if record.is_none() {
                debug!("dropping malformed current record");
            }
            record
        });

        let count = match saved {
            Some(record) if record.date == today => record.count,
            Some(record) => {
                archive(store, &record)?;
                reset(store, &today)?;
                0
            }
            None => {
                reset(store, &today)?;
                0
            }
        };

        Ok(Self {
            store,
            date: today,
            count,
        })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn increment(&mut self) -> Result<u64, StoreError> {
        self.save(self.count.saturating_add(1))
    }

    /// Never goes below zero.
    pub fn decrement(&mut self) -> Result<u64, StoreError> {
        self.save(self.count.saturating_sub(1))
    }

    /// Applies `n` single increments, persisting each intermediate value.
    pub fn batch_increment(&mut self, n: u32) -> Result<u64, StoreError> {
        for _ in 0..n {
            self.increment()?;
        }
        Ok(self.count)
    }

    pub fn record(&self) -> DailyRecord {
        DailyRecord::new(self.date.clone(), self.count)
    }

    fn save(&mut self, count: u64) -> Result<u64, StoreError> {
        let record = DailyRecord::new(self.date.clone(), count);
        self.store.set(CURRENT_KEY, record.encode()?)?;
        self.count = count;
        Ok(count)
    }
}

fn archive<S: KeyValueStore + ?Sized>(store: &mut S, record: &DailyRecord) -> Result<(), StoreError> {
    let key = history_key(&record.date);
    if store.get(&key).is_some() {
        debug!(date = %record.date, "history already holds this day, keeping it");
        return Ok(());
    }
    store.set(&key, record.encode()?)?;
    info!(date = %record.date, count = record.count, "archived previous day");
    Ok(())
}

fn reset<S: KeyValueStore + ?Sized>(store: &mut S, today: &str) -> Result<(), StoreError> {
    store.set(CURRENT_KEY, DailyRecord::new(today, 0).encode()?)
}
