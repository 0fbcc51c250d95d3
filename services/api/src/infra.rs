use gensave::workflows::screening::{
    StorageError, StorageReceipt, SubmissionRecord, SubmissionStore,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keeps submissions for the life of the process; used by the demo when no directory is given.
#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionStore {
    records: Arc<Mutex<Vec<(String, SubmissionRecord)>>>,
}

impl SubmissionStore for InMemorySubmissionStore {
    fn save(&self, record: &SubmissionRecord, stem: &str) -> Result<StorageReceipt, StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StorageError::Unavailable("submission store poisoned".to_string()))?;
        guard.push((stem.to_string(), record.clone()));
        Ok(StorageReceipt {
            locations: vec![format!("memory://{stem}")],
        })
    }
}

impl InMemorySubmissionStore {
    pub(crate) fn stems(&self) -> Vec<String> {
        self.records
            .lock()
            .map(|guard| guard.iter().map(|(stem, _)| stem.clone()).collect())
            .unwrap_or_default()
    }
}
