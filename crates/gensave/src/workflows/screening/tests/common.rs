use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::screening::record::SubmissionRecord;
use crate::workflows::screening::storage::{StorageError, StorageReceipt, SubmissionStore};
use crate::workflows::screening::{
    screening_router, AnswerSet, ScreeningCatalog, ScreeningFlow, ScreeningService,
};

pub(super) fn catalog() -> Arc<ScreeningCatalog> {
    Arc::new(ScreeningCatalog::standard())
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn profile_answers() -> AnswerSet {
    AnswerSet::new()
        .with("nama", "Siti Rahma")
        .with("jenisKelamin", "perempuan")
        .with("tempatLahir", "Bandung")
        .with("tanggalLahir", "1998-04-12")
        .with("umur", "27")
        .with("tinggiBadan", "158")
        .with("beratBadan", "52")
        .with("alamat", "Jl. Merdeka No. 1")
}

/// Profile plus every question answered "tidak", except the thalassemia trio.
pub(super) fn full_answers() -> AnswerSet {
    let catalog = ScreeningCatalog::standard();
    let mut answers = profile_answers();
    for field in catalog.question_fields() {
        answers.insert(field, "tidak");
    }
    answers.insert("hemoglobinRendah", "ya");
    answers.insert("cepatLelah", "kadang-kadang");
    answers.insert("keluargaTalasemia", "tidak-tahu");
    answers
}

pub(super) fn build_service<S>(store: S) -> (ScreeningService<S>, Arc<S>)
where
    S: SubmissionStore + 'static,
{
    let store = Arc::new(store);
    let service = ScreeningService::new(catalog(), store.clone(), Duration::from_millis(500));
    (service, store)
}

/// Drive a fresh wizard to the summary with `full_answers`.
pub(super) fn flow_at_summary() -> ScreeningFlow {
    let mut flow = ScreeningFlow::new(catalog());
    for (field, value) in full_answers().iter() {
        flow.set_field_on(field, value, today())
            .expect("field accepted");
    }
    flow.advance().expect("intro");
    flow.advance().expect("profile");
    for _ in 0..flow.catalog().len() {
        flow.advance().expect("questions");
        flow.advance().expect("result");
    }
    flow
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    saved: Arc<Mutex<Vec<(String, SubmissionRecord)>>>,
}

impl MemoryStore {
    pub(super) fn saved(&self) -> Vec<(String, SubmissionRecord)> {
        self.saved.lock().expect("store mutex poisoned").clone()
    }
}

impl SubmissionStore for MemoryStore {
    fn save(&self, record: &SubmissionRecord, stem: &str) -> Result<StorageReceipt, StorageError> {
        self.saved
            .lock()
            .expect("store mutex poisoned")
            .push((stem.to_string(), record.clone()));
        Ok(StorageReceipt {
            locations: vec![format!("memory://{stem}")],
        })
    }
}

pub(super) struct FailingStore;

impl SubmissionStore for FailingStore {
    fn save(&self, _record: &SubmissionRecord, _stem: &str) -> Result<StorageReceipt, StorageError> {
        Err(StorageError::Unavailable("disk offline".to_string()))
    }
}

pub(super) struct SlowStore {
    pub(super) delay: Duration,
}

impl SubmissionStore for SlowStore {
    fn save(&self, _record: &SubmissionRecord, stem: &str) -> Result<StorageReceipt, StorageError> {
        std::thread::sleep(self.delay);
        Ok(StorageReceipt {
            locations: vec![format!("slow://{stem}")],
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) async fn read_text_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) fn router_with_store<S>(store: S) -> axum::Router
where
    S: SubmissionStore + 'static,
{
    let (service, _) = build_service(store);
    screening_router(Arc::new(service))
}
