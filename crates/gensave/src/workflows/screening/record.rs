use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AnswerSet, Profile};
use super::evaluation::ScreeningResult;

/// Finalized submission: what was entered and what it scored at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub submitted_at: DateTime<Utc>,
    pub profile: Profile,
    pub answers: AnswerSet,
    pub results: ScreeningResult,
}

impl SubmissionRecord {
    /// Filename-safe identity: `<name>_<timestamp>` with no path separators or colons.
    pub fn file_stem(&self) -> String {
        let name = sanitize_name(&self.profile.name);
        let stamp = self
            .submitted_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        format!("{name}_{stamp}")
    }
}

pub fn build_record(
    profile: Profile,
    answers: &AnswerSet,
    results: ScreeningResult,
) -> SubmissionRecord {
    build_record_at(profile, answers, results, Utc::now())
}

/// Assemble a record stamped at `at`. The whole answer set is kept for audit, profile
/// entries included.
pub fn build_record_at(
    profile: Profile,
    answers: &AnswerSet,
    results: ScreeningResult,
    at: DateTime<Utc>,
) -> SubmissionRecord {
    SubmissionRecord {
        submitted_at: at.trunc_subsecs(3),
        profile,
        answers: answers.clone(),
        results,
    }
}

/// Bounds the stem so it fits the usual 255 byte file name limit.
const MAX_NAME_LEN: usize = 64;

fn sanitize_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len().min(MAX_NAME_LEN));
    let mut pending_separator = false;
    for ch in raw.chars().flat_map(char::to_lowercase) {
        if cleaned.len() >= MAX_NAME_LEN {
            break;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_separator && !cleaned.is_empty() {
                cleaned.push('_');
            }
            pending_separator = false;
            cleaned.push(ch);
        } else {
            pending_separator = true;
        }
    }

    // Output is ASCII, so byte truncation stays on a char boundary.
    cleaned.truncate(MAX_NAME_LEN);
    let trimmed = cleaned.trim_end_matches('_');
    if trimmed.is_empty() {
        "user".to_string()
    } else {
        trimmed.to_string()
    }
}
