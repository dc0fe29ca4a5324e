use crate::clock::Clock;
use crate::errors::AppError;
use crate::store::KeyValueStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Box<dyn KeyValueStore>>>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: impl KeyValueStore + 'static, clock: impl Clock + 'static) -> Self {
        let store: Box<dyn KeyValueStore> = Box::new(store);
        Self {
            store: Arc::new(Mutex::new(store)),
            clock: Arc::new(clock),
        }
    }

    /// Runs `f` with exclusive access to the store on the blocking pool, since
    /// store writes hit the disk synchronously.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut dyn KeyValueStore, &dyn Clock) -> Result<T, AppError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let clock = Arc::clone(&self.clock);
        tokio::task::spawn_blocking(move || {
            let mut store = store.blocking_lock();
            f(&mut **store, clock.as_ref())
        })
        .await
        .map_err(AppError::internal)?
    }
}
