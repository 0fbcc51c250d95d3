//! End-to-end screening scenarios driven through the public service facade, the wizard, and
//! the HTTP router, persisting into a real directory.

mod common {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;

    use gensave::workflows::screening::{
        AnswerSet, FileSubmissionStore, ScreeningCatalog, ScreeningService,
    };

    pub(super) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    pub(super) fn profile() -> AnswerSet {
        AnswerSet::new()
            .with("nama", "Budi Santoso")
            .with("jenisKelamin", "laki-laki")
            .with("tempatLahir", "Surabaya")
            .with("tanggalLahir", "1990-01-20")
            .with("umur", "35")
            .with("tinggiBadan", "170")
            .with("beratBadan", "90")
            .with("alamat", "Jl. Pahlawan 10")
    }

    pub(super) fn file_service(
        root: &std::path::Path,
    ) -> Arc<ScreeningService<FileSubmissionStore>> {
        let catalog = Arc::new(ScreeningCatalog::standard());
        let store = Arc::new(FileSubmissionStore::new(root, catalog.clone()));
        Arc::new(ScreeningService::new(
            catalog,
            store,
            Duration::from_secs(5),
        ))
    }
}

use std::fs;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use gensave::workflows::screening::{
    screening_router, AnswerToken, FlowStep, PersistenceOutcome, SubmissionRecord,
};
use tower::ServiceExt;

#[tokio::test]
async fn wizard_submission_lands_on_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let service = common::file_service(dir.path());
    let mut flow = service.start_flow();

    for (field, value) in common::profile().iter() {
        flow.set_field_on(field, value, common::today())
            .expect("profile field");
    }
    flow.advance().expect("intro");
    flow.advance().expect("profile complete");

    while let FlowStep::GroupQuestions(index) = flow.step() {
        let fields: Vec<&str> = flow
            .catalog()
            .group(index)
            .expect("active group")
            .fields()
            .collect();
        for field in fields {
            let answer = if field.starts_with("keluarga") {
                AnswerToken::Ya
            } else {
                AnswerToken::Tidak
            };
            flow.set_field_on(field, answer.as_str(), common::today())
                .expect("offered option");
        }
        flow.advance().expect("group complete");
        flow.advance().expect("next group");
    }
    assert_eq!(flow.step(), FlowStep::Summary);

    let submission = service.complete(&mut flow).expect("submits");
    let receipt = submission.receipt;
    assert_eq!(receipt.bmi.map(|bmi| bmi.label), Some("Obesitas"));

    let top = receipt.record.results.top.clone().expect("top group");
    assert_eq!(top.group_title, "Disabilitas");
    assert_eq!(top.percentage, 50);

    match submission.persistence.outcome().await {
        PersistenceOutcome::Stored(stored) => assert_eq!(stored.locations.len(), 2),
        other => panic!("expected stored outcome, got {other:?}"),
    }

    let text = fs::read_to_string(dir.path().join(format!("{}.txt", receipt.file_stem)))
        .expect("text document");
    assert!(text.contains("- Nama Lengkap : Budi Santoso"));
    assert!(text.contains("- Hipertensi: 35%"));
    assert!(text.contains("Risiko tertinggi: Disabilitas (50%)"));

    let json = fs::read_to_string(dir.path().join(format!("{}.json", receipt.file_stem)))
        .expect("json document");
    let stored: SubmissionRecord = serde_json::from_str(&json).expect("record decodes");
    assert_eq!(stored, receipt.record);
}

#[tokio::test]
async fn http_intake_rejects_then_accepts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let router = screening_router(common::file_service(dir.path()));

    let incomplete = serde_json::json!({ "nama": "Budi Santoso" });
    let response = router
        .clone()
        .oneshot(
            Request::post("/api/v1/screening")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(incomplete.to_string()))
                .expect("valid request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let complete = serde_json::to_vec(&common::profile()).expect("encode");
    let response = router
        .oneshot(
            Request::post("/api/v1/screening")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(complete))
                .expect("valid request"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["record"]["results"]["overall"], 0);
    assert_eq!(payload["record"]["results"]["top"]["groupTitle"], "Thalasemia");
}
