mod aggregate;
mod rules;

pub use aggregate::aggregate;
pub use rules::{score_answer, score_group};

use serde::{Deserialize, Serialize};

/// Percentage a single condition group scored for one answer set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResult {
    pub group_title: String,
    pub percentage: u8,
}

/// Per-group scores, their rounded mean, and the highest-risk group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub items: Vec<GroupResult>,
    pub overall: u8,
    pub top: Option<GroupResult>,
}
