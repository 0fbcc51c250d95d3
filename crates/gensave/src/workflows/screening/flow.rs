use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;

use super::catalog::{ConditionGroup, ScreeningCatalog};
use super::domain::{derive_age, AnswerSet, AnswerToken, Profile, ProfileField};
use super::evaluation::{aggregate, score_group, GroupResult, ScreeningResult};
use super::intake::{group_fields, profile_fields, profile_from_answers, require, ValidationError};
use super::record::{build_record_at, SubmissionRecord};

/// Wizard position. Group indexes follow catalog declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", content = "group", rename_all = "snake_case")]
pub enum FlowStep {
    Intro,
    ProfileEntry,
    GroupQuestions(usize),
    GroupResult(usize),
    Summary,
    Submitted,
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("screening has already been submitted")]
    AlreadySubmitted,
    #[error("the summary step submits instead of advancing")]
    SubmitRequired,
    #[error("submission is only possible from the summary step (currently {0:?})")]
    NotAtSummary(FlowStep),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("question '{field}' does not offer the answer '{value}'")]
    OptionNotOffered { field: String, value: String },
}

/// One applicant's pass through intro, profile, each condition group, and the summary.
///
/// Forward moves are guarded by the intake validator; backward moves never validate.
/// Once submitted the flow is frozen.
#[derive(Debug, Clone)]
pub struct ScreeningFlow {
    catalog: Arc<ScreeningCatalog>,
    step: FlowStep,
    answers: AnswerSet,
}

impl ScreeningFlow {
    pub fn new(catalog: Arc<ScreeningCatalog>) -> Self {
        Self {
            catalog,
            step: FlowStep::Intro,
            answers: AnswerSet::new(),
        }
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn catalog(&self) -> &ScreeningCatalog {
        &self.catalog
    }

    pub fn is_submitted(&self) -> bool {
        self.step == FlowStep::Submitted
    }

    /// Group being answered or reviewed at the current step.
    pub fn active_group(&self) -> Option<&ConditionGroup> {
        match self.step {
            FlowStep::GroupQuestions(index) | FlowStep::GroupResult(index) => {
                self.catalog.group(index)
            }
            _ => None,
        }
    }

    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), FlowError> {
        self.set_field_on(field, value, Local::now().date_naive())
    }

    /// Record a value. Question answers are normalized and must be one of the question's
    /// options; a blank value clears the answer. A birth date also fills in the age.
    pub fn set_field_on(
        &mut self,
        field: &str,
        value: &str,
        today: NaiveDate,
    ) -> Result<(), FlowError> {
        if self.is_submitted() {
            return Err(FlowError::AlreadySubmitted);
        }

        if let Some(profile_field) = ProfileField::from_id(field) {
            self.answers.insert(field, value);
            if profile_field == ProfileField::BirthDate {
                if let Some(age) = derive_age(value, today) {
                    self.answers.insert(ProfileField::Age.id(), age.to_string());
                }
            }
            return Ok(());
        }

        let question = self
            .catalog
            .question(field)
            .ok_or_else(|| FlowError::UnknownField(field.to_string()))?;

        if value.trim().is_empty() {
            self.answers.remove(field);
            return Ok(());
        }

        match AnswerToken::parse(value) {
            Some(token) if question.offers(token) => {
                self.answers.insert(field, token.as_str());
                Ok(())
            }
            _ => Err(FlowError::OptionNotOffered {
                field: field.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn advance(&mut self) -> Result<FlowStep, FlowError> {
        let next = match self.step {
            FlowStep::Intro => FlowStep::ProfileEntry,
            FlowStep::ProfileEntry => {
                require(profile_fields(), &self.answers)?;
                self.first_group_or_summary(0)
            }
            FlowStep::GroupQuestions(index) => {
                if let Some(group) = self.catalog.group(index) {
                    require(group_fields(group), &self.answers)?;
                }
                FlowStep::GroupResult(index)
            }
            FlowStep::GroupResult(index) => self.first_group_or_summary(index + 1),
            FlowStep::Summary => return Err(FlowError::SubmitRequired),
            FlowStep::Submitted => return Err(FlowError::AlreadySubmitted),
        };
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<FlowStep, FlowError> {
        let previous = match self.step {
            FlowStep::Intro | FlowStep::ProfileEntry => FlowStep::Intro,
            FlowStep::GroupQuestions(0) => FlowStep::ProfileEntry,
            FlowStep::GroupQuestions(index) => FlowStep::GroupResult(index - 1),
            FlowStep::GroupResult(index) => FlowStep::GroupQuestions(index),
            FlowStep::Summary => match self.catalog.len() {
                0 => FlowStep::ProfileEntry,
                count => FlowStep::GroupResult(count - 1),
            },
            FlowStep::Submitted => return Err(FlowError::AlreadySubmitted),
        };
        self.step = previous;
        Ok(previous)
    }

    pub fn group_result(&self, index: usize) -> Option<GroupResult> {
        self.catalog
            .group(index)
            .map(|group| score_group(group, &self.answers))
    }

    pub fn results(&self) -> ScreeningResult {
        aggregate(self.catalog.groups(), &self.answers)
    }

    pub fn profile(&self) -> Result<Profile, ValidationError> {
        profile_from_answers(&self.answers)
    }

    pub fn submit(&mut self) -> Result<SubmissionRecord, FlowError> {
        self.submit_at(Utc::now())
    }

    /// Build the record from the summary step and freeze the flow.
    pub fn submit_at(&mut self, at: DateTime<Utc>) -> Result<SubmissionRecord, FlowError> {
        match self.step {
            FlowStep::Summary => {}
            FlowStep::Submitted => return Err(FlowError::AlreadySubmitted),
            other => return Err(FlowError::NotAtSummary(other)),
        }

        let profile = self.profile()?;
        let record = build_record_at(profile, &self.answers, self.results(), at);
        self.step = FlowStep::Submitted;
        Ok(record)
    }

    fn first_group_or_summary(&self, index: usize) -> FlowStep {
        if index < self.catalog.len() {
            FlowStep::GroupQuestions(index)
        } else {
            FlowStep::Summary
        }
    }
}
