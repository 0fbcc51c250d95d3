use tracing::warn;

use super::super::catalog::{ConditionGroup, GROUP_WEIGHT_TOTAL};
use super::super::domain::{AnswerSet, AnswerToken};
use super::GroupResult;

/// Partial credit one answer earns out of `weight`.
///
/// "ya" earns the full weight, "kadang-kadang" half, "tidak-tahu" a third (both rounded
/// half-up). "tidak", an empty value, or anything unrecognized earns nothing.
pub fn score_answer(answer: &str, weight: u32) -> u32 {
    match AnswerToken::parse(answer) {
        Some(AnswerToken::Ya) => weight,
        Some(AnswerToken::KadangKadang) => weight / 2 + weight % 2,
        // A third never lands on .5; a remainder of 2 rounds up.
        Some(AnswerToken::TidakTahu) => weight / 3 + u32::from(weight % 3 == 2),
        Some(AnswerToken::Tidak) | None => 0,
    }
}

/// Sum the group's weighted answers, clamped to [0, 100]. Missing answers count as "tidak".
pub fn score_group(group: &ConditionGroup, answers: &AnswerSet) -> GroupResult {
    let raw: u32 = group
        .questions
        .iter()
        .map(|question| score_answer(answers.get(question.field).unwrap_or(""), question.weight))
        .fold(0, u32::saturating_add);

    if raw > GROUP_WEIGHT_TOTAL {
        warn!(
            group = group.title,
            raw_score = raw,
            weight_total = group.weight_total(),
            "group score exceeded 100 before clamping; check catalog weights"
        );
    }

    GroupResult {
        group_title: group.title.to_string(),
        percentage: raw.min(GROUP_WEIGHT_TOTAL) as u8,
    }
}
