use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::catalog::ScreeningCatalog;
use super::domain::{AnswerSet, BodyMassIndex};
use super::evaluation::{aggregate, ScreeningResult};
use super::flow::{FlowError, ScreeningFlow};
use super::intake::{profile_from_answers, ValidationError};
use super::record::{build_record, SubmissionRecord};
use super::storage::{StorageError, StorageReceipt, SubmissionStore};

/// Service composing the catalog, scoring, record assembly, and best-effort persistence.
pub struct ScreeningService<S> {
    catalog: Arc<ScreeningCatalog>,
    store: Arc<S>,
    persist_timeout: Duration,
}

impl<S> ScreeningService<S>
where
    S: SubmissionStore + 'static,
{
    /// Catalog invariant violations are logged, not fatal: scoring clamps every group.
    pub fn new(catalog: Arc<ScreeningCatalog>, store: Arc<S>, persist_timeout: Duration) -> Self {
        for issue in catalog.issues() {
            warn!(%issue, "screening catalog violates a configuration invariant");
        }

        Self {
            catalog,
            store,
            persist_timeout,
        }
    }

    pub fn catalog(&self) -> &Arc<ScreeningCatalog> {
        &self.catalog
    }

    pub fn start_flow(&self) -> ScreeningFlow {
        ScreeningFlow::new(self.catalog.clone())
    }

    pub fn score(&self, answers: &AnswerSet) -> ScreeningResult {
        aggregate(self.catalog.groups(), answers)
    }

    /// Single-call intake: validate the profile, score, build the record, and hand it to the
    /// store without waiting for the write.
    pub fn submit(&self, answers: AnswerSet) -> Result<Submission, ScreeningServiceError> {
        let profile = profile_from_answers(&answers).map_err(|err| {
            debug!(fields = ?err.fields, "screening intake rejected");
            err
        })?;

        let results = self.score(&answers);
        let record = build_record(profile, &answers, results);
        Ok(self.finalize(record))
    }

    /// Submit a wizard sitting at its summary step.
    pub fn complete(&self, flow: &mut ScreeningFlow) -> Result<Submission, ScreeningServiceError> {
        let record = flow.submit()?;
        Ok(self.finalize(record))
    }

    fn finalize(&self, record: SubmissionRecord) -> Submission {
        let file_stem = record.file_stem();
        let persistence = self.dispatch(record.clone(), file_stem.clone());

        Submission {
            receipt: SubmissionReceipt {
                bmi: record.profile.body_mass_index(),
                file_stem,
                record,
            },
            persistence,
        }
    }

    fn dispatch(&self, record: SubmissionRecord, stem: String) -> PersistenceTask {
        let store = self.store.clone();
        let timeout = self.persist_timeout;

        match Handle::try_current() {
            Ok(handle) => {
                PersistenceTask::running(handle.spawn(persist(store, record, stem, timeout)))
            }
            Err(_) => {
                let outcome = persist_on_thread(store, record, stem.clone(), timeout);
                log_outcome(&stem, &outcome);
                PersistenceTask::finished(outcome)
            }
        }
    }
}

/// Without a runtime the save gets its own thread; the caller waits at most `timeout`.
fn persist_on_thread<S>(
    store: Arc<S>,
    record: SubmissionRecord,
    stem: String,
    timeout: Duration,
) -> PersistenceOutcome
where
    S: SubmissionStore + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let spawned = thread::Builder::new()
        .name("gensave-persist".to_string())
        .spawn(move || {
            // The receiver is gone once the caller stopped waiting.
            let _ = sender.send(store.save(&record, &stem));
        });
    if let Err(err) = spawned {
        return PersistenceOutcome::Failed(format!("persistence thread unavailable: {err}"));
    }

    match receiver.recv_timeout(timeout) {
        Ok(result) => classify(result),
        Err(RecvTimeoutError::Timeout) => PersistenceOutcome::TimedOut(timeout),
        Err(RecvTimeoutError::Disconnected) => {
            PersistenceOutcome::Failed("persistence thread exited without a result".to_string())
        }
    }
}

fn classify(result: Result<StorageReceipt, StorageError>) -> PersistenceOutcome {
    match result {
        Ok(receipt) => PersistenceOutcome::Stored(receipt),
        Err(err) => PersistenceOutcome::Failed(err.to_string()),
    }
}

async fn persist<S>(
    store: Arc<S>,
    record: SubmissionRecord,
    stem: String,
    timeout: Duration,
) -> PersistenceOutcome
where
    S: SubmissionStore + 'static,
{
    let write_stem = stem.clone();
    let write = tokio::task::spawn_blocking(move || store.save(&record, &write_stem));

    let outcome = match tokio::time::timeout(timeout, write).await {
        Ok(Ok(result)) => classify(result),
        Ok(Err(join_err)) => {
            PersistenceOutcome::Failed(format!("persistence task aborted: {join_err}"))
        }
        Err(_) => PersistenceOutcome::TimedOut(timeout),
    };

    log_outcome(&stem, &outcome);
    outcome
}

fn log_outcome(stem: &str, outcome: &PersistenceOutcome) {
    match outcome {
        PersistenceOutcome::Stored(receipt) => {
            info!(stem, locations = ?receipt.locations, "screening submission persisted");
        }
        PersistenceOutcome::Failed(error) => {
            warn!(stem, %error, "screening submission could not be persisted");
        }
        PersistenceOutcome::TimedOut(timeout) => {
            warn!(
                stem,
                timeout_ms = timeout.as_millis() as u64,
                "screening submission persistence timed out"
            );
        }
    }
}

/// Accepted submission plus a handle on its background write.
pub struct Submission {
    pub receipt: SubmissionReceipt,
    pub persistence: PersistenceTask,
}

/// What the applicant gets back regardless of how persistence went.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub record: SubmissionRecord,
    pub file_stem: String,
    pub bmi: Option<BodyMassIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceOutcome {
    Stored(StorageReceipt),
    Failed(String),
    TimedOut(Duration),
}

impl PersistenceOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, PersistenceOutcome::Stored(_))
    }
}

/// Dropping the task detaches it; the write still runs and logs its outcome.
pub struct PersistenceTask {
    state: TaskState,
}

enum TaskState {
    Running(JoinHandle<PersistenceOutcome>),
    Finished(PersistenceOutcome),
}

impl PersistenceTask {
    fn running(handle: JoinHandle<PersistenceOutcome>) -> Self {
        Self {
            state: TaskState::Running(handle),
        }
    }

    fn finished(outcome: PersistenceOutcome) -> Self {
        Self {
            state: TaskState::Finished(outcome),
        }
    }

    /// Outcome known without awaiting. Always set for saves made outside a runtime.
    pub fn settled(&self) -> Option<&PersistenceOutcome> {
        match &self.state {
            TaskState::Running(_) => None,
            TaskState::Finished(outcome) => Some(outcome),
        }
    }

    pub async fn outcome(self) -> PersistenceOutcome {
        match self.state {
            TaskState::Running(handle) => handle.await.unwrap_or_else(|err| {
                PersistenceOutcome::Failed(format!("persistence task aborted: {err}"))
            }),
            TaskState::Finished(outcome) => outcome,
        }
    }
}

/// Error raised by the screening service. Persistence problems never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Flow(#[from] FlowError),
}

impl ScreeningServiceError {
    /// Offending field ids when the failure was a validation problem.
    pub fn fields(&self) -> &[String] {
        match self {
            ScreeningServiceError::Validation(err)
            | ScreeningServiceError::Flow(FlowError::Validation(err)) => &err.fields,
            ScreeningServiceError::Flow(_) => &[],
        }
    }
}
