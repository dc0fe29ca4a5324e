pub mod app;
pub mod backup;
pub mod clock;
pub mod config;
pub mod counter;
pub mod dates;
pub mod errors;
pub mod handlers;
pub mod history;
pub mod models;
pub mod state;
pub mod store;
pub mod ui;

pub use app::router;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use counter::DailyCounter;
pub use state::AppState;
pub use store::{FileStore, KeyValueStore, MemoryStore};
