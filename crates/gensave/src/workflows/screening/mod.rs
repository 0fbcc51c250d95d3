//! Health self-screening: condition-group catalog, weighted scoring, intake validation,
//! the step-by-step wizard, and best-effort persistence of finished submissions.

pub mod catalog;
pub mod domain;
pub(crate) mod evaluation;
pub mod flow;
pub mod intake;
pub mod record;
pub mod report;
pub mod router;
pub mod service;
pub mod storage;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogIssue, ConditionGroup, Question, ScreeningCatalog, GROUP_WEIGHT_TOTAL};
pub use domain::{
    derive_age, AnswerSet, AnswerToken, BmiCategory, BodyMassIndex, Profile, ProfileField,
};
pub use evaluation::{aggregate, score_answer, score_group, GroupResult, ScreeningResult};
pub use flow::{FlowError, FlowStep, ScreeningFlow};
pub use intake::{profile_from_answers, require, validate_required, ValidationError};
pub use record::{build_record, build_record_at, SubmissionRecord};
pub use report::{render_json, render_text};
pub use router::screening_router;
pub use service::{
    PersistenceOutcome, PersistenceTask, ScreeningService, ScreeningServiceError, Submission,
    SubmissionReceipt,
};
pub use storage::{FileSubmissionStore, StorageError, StorageReceipt, SubmissionStore};
