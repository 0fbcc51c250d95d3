use super::super::catalog::ConditionGroup;
use super::super::domain::AnswerSet;
use super::rules::score_group;
use super::{GroupResult, ScreeningResult};

/// Score every group in declared order, then derive the overall mean and top group.
pub fn aggregate(groups: &[ConditionGroup], answers: &AnswerSet) -> ScreeningResult {
    let items: Vec<GroupResult> = groups
        .iter()
        .map(|group| score_group(group, answers))
        .collect();

    let overall = rounded_mean(&items);
    let top = highest(&items).cloned();

    ScreeningResult {
        items,
        overall,
        top,
    }
}

fn rounded_mean(items: &[GroupResult]) -> u8 {
    if items.is_empty() {
        return 0;
    }
    let count = items.len() as u32;
    let total: u32 = items.iter().map(|item| u32::from(item.percentage)).sum();
    // half-up: floor(total / count + 1/2)
    ((2 * total + count) / (2 * count)) as u8
}

// Strict comparison keeps the earliest group on ties.
fn highest(items: &[GroupResult]) -> Option<&GroupResult> {
    items.iter().fold(None, |best, item| match best {
        Some(current) if current.percentage >= item.percentage => Some(current),
        _ => Some(item),
    })
}
