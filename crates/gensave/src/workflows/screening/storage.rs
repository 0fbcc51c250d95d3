use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::catalog::ScreeningCatalog;
use super::record::SubmissionRecord;
use super::report::{render_json, render_text};

/// Durable destination for completed submissions.
///
/// Implementations may block; the service runs them off the async executor under a timeout.
pub trait SubmissionStore: Send + Sync {
    fn save(&self, record: &SubmissionRecord, stem: &str) -> Result<StorageReceipt, StorageError>;
}

/// Where a submission ended up, for logs and callers that await persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageReceipt {
    pub locations: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode submission: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Writes `<stem>.txt` and `<stem>.json` side by side in one directory.
#[derive(Debug, Clone)]
pub struct FileSubmissionStore {
    root: PathBuf,
    catalog: Arc<ScreeningCatalog>,
}

impl FileSubmissionStore {
    pub fn new(root: impl Into<PathBuf>, catalog: Arc<ScreeningCatalog>) -> Self {
        Self {
            root: root.into(),
            catalog,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SubmissionStore for FileSubmissionStore {
    fn save(&self, record: &SubmissionRecord, stem: &str) -> Result<StorageReceipt, StorageError> {
        fs::create_dir_all(&self.root)?;

        let text_path = self.root.join(format!("{stem}.txt"));
        let json_path = self.root.join(format!("{stem}.json"));

        let json = render_json(record)?;
        fs::write(&text_path, render_text(record, &self.catalog))?;
        fs::write(&json_path, json)?;

        Ok(StorageReceipt {
            locations: vec![
                text_path.display().to_string(),
                json_path.display().to_string(),
            ],
        })
    }
}
