use std::sync::Arc;
use std::time::Duration;

use doctext_ingest::Dispatcher;

use crate::config::Settings;

/// Shared application state accessible from all handlers. Read-only after startup.
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub extraction_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher, settings: &Settings) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            extraction_timeout: settings.extraction_timeout,
            max_upload_bytes: settings.max_upload_bytes,
        }
    }
}
