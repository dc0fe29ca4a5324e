use serde::{Deserialize, Serialize};

/// Storage key of the record for "today".
pub const CURRENT_KEY: &str = "counterData";

/// Prefix of the per-day archived records.
pub const HISTORY_PREFIX: &str = "counterHistory_";

pub const BACKUP_VERSION: u32 = 1;

pub fn history_key(date: &str) -> String {
    format!("{HISTORY_PREFIX}{date}")
}

/// One calendar day's tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: String,
    pub count: u64,
}

impl DailyRecord {
    pub fn new(date: impl Into<String>, count: u64) -> Self {
        Self {
            date: date.into(),
            count,
        }
    }

    /// Parses a stored payload, `None` when it is not a well-formed record.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The export/import file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: u32,
    pub exported_at: String,
    pub counter_data: Option<DailyRecord>,
    pub history_entries: Vec<DailyRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterAction {
    Increment,
    Decrement,
}

#[derive(Debug, Deserialize)]
pub struct CounterRequest {
    pub action: CounterAction,
    #[serde(default = "default_amount")]
    pub amount: u32,
}

fn default_amount() -> u32 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub date: String,
    pub count: u64,
    pub label: String,
    pub full_label: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntry>,
    pub total: u64,
    pub average: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub message: String,
}
