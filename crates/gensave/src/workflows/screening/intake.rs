use super::catalog::ConditionGroup;
use super::domain::{AnswerSet, Profile, ProfileField};

/// One or more required fields were absent or blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("required fields are missing: {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<String>,
}

/// Every field from `fields` whose value is absent or blank after trimming, in input order.
pub fn validate_required<'a, I>(fields: I, data: &AnswerSet) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut violations: Vec<String> = Vec::new();
    for field in fields {
        let blank = data
            .get(field)
            .map(|value| value.trim().is_empty())
            .unwrap_or(true);
        if blank && !violations.iter().any(|seen| seen == field) {
            violations.push(field.to_string());
        }
    }
    violations
}

pub fn require<'a, I>(fields: I, data: &AnswerSet) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    let fields = validate_required(fields, data);
    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields })
    }
}

pub fn profile_fields() -> impl Iterator<Item = &'static str> {
    ProfileField::ordered().into_iter().map(ProfileField::id)
}

pub fn group_fields(group: &ConditionGroup) -> impl Iterator<Item = &'static str> + '_ {
    group.fields()
}

/// Validate the personal fields and copy them out verbatim.
pub fn profile_from_answers(data: &AnswerSet) -> Result<Profile, ValidationError> {
    require(profile_fields(), data)?;

    let value = |field: ProfileField| data.get(field.id()).unwrap_or_default().to_string();
    Ok(Profile {
        name: value(ProfileField::Name),
        sex: value(ProfileField::Sex),
        birthplace: value(ProfileField::Birthplace),
        birth_date: value(ProfileField::BirthDate),
        age: value(ProfileField::Age),
        height_cm: value(ProfileField::Height),
        weight_kg: value(ProfileField::Weight),
        address: value(ProfileField::Address),
    })
}
