use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::state::config::TableConfig;

/// Settles free-text input for hosts that debounce before filtering.
#[derive(Clone, Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn from_config(config: &TableConfig) -> Self {
        Self::new(Duration::from_millis(config.search_debounce_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn settle(&self, query: String) -> Option<String> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        (self.latest.load(Ordering::SeqCst) == ticket).then_some(query)
    }
}
