use super::common::*;
use crate::workflows::screening::{FlowError, FlowStep, ScreeningFlow};
use chrono::{TimeZone, Utc};

#[test]
fn advance_from_profile_reports_every_missing_field() {
    let mut flow = ScreeningFlow::new(catalog());
    flow.advance().expect("intro has no guard");
    flow.set_field_on("nama", "Siti", today()).expect("profile field");

    match flow.advance() {
        Err(FlowError::Validation(err)) => assert_eq!(
            err.fields,
            vec![
                "jenisKelamin",
                "tempatLahir",
                "tanggalLahir",
                "umur",
                "tinggiBadan",
                "beratBadan",
                "alamat"
            ]
        ),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(flow.step(), FlowStep::ProfileEntry);
}

#[test]
fn birth_date_fills_in_age() {
    let mut flow = ScreeningFlow::new(catalog());
    flow.set_field_on("tanggalLahir", "1998-04-12", today())
        .expect("profile field");

    assert_eq!(flow.answers().get("umur"), Some("27"));
}

#[test]
fn group_questions_guard_only_checks_the_active_group() {
    let mut flow = ScreeningFlow::new(catalog());
    for (field, value) in profile_answers().iter() {
        flow.set_field_on(field, value, today()).expect("accepted");
    }
    flow.advance().expect("intro");
    assert_eq!(flow.advance().expect("profile"), FlowStep::GroupQuestions(0));

    flow.set_field_on("hemoglobinRendah", "ya", today())
        .expect("offered");
    match flow.advance() {
        Err(FlowError::Validation(err)) => {
            assert_eq!(err.fields, vec!["cepatLelah", "keluargaTalasemia"])
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    flow.set_field_on("cepatLelah", "Kadang-Kadang", today())
        .expect("offered");
    flow.set_field_on("keluargaTalasemia", "tidak-tahu", today())
        .expect("offered");
    assert_eq!(flow.advance().expect("group answered"), FlowStep::GroupResult(0));
    assert_eq!(flow.answers().get("cepatLelah"), Some("kadang-kadang"));
    assert_eq!(
        flow.group_result(0).map(|result| result.percentage),
        Some(58)
    );
}

#[test]
fn rejects_options_a_question_does_not_offer() {
    let mut flow = ScreeningFlow::new(catalog());

    let err = flow
        .set_field_on("lukaSulitSembuh", "tidak-tahu", today())
        .expect_err("yes/no question");
    assert!(matches!(err, FlowError::OptionNotOffered { .. }));

    let err = flow
        .set_field_on("golonganDarah", "ya", today())
        .expect_err("unknown field");
    assert!(matches!(err, FlowError::UnknownField(field) if field == "golonganDarah"));
}

#[test]
fn blank_answer_clears_a_question() {
    let mut flow = ScreeningFlow::new(catalog());
    flow.set_field_on("nyeriDada", "ya", today()).expect("offered");
    flow.set_field_on("nyeriDada", "  ", today()).expect("cleared");

    assert_eq!(flow.answers().get("nyeriDada"), None);
}

#[test]
fn back_never_validates_and_keeps_answers() {
    let mut flow = flow_at_summary();
    assert_eq!(flow.step(), FlowStep::Summary);

    let last = flow.catalog().len() - 1;
    assert_eq!(flow.back().expect("back"), FlowStep::GroupResult(last));
    assert_eq!(flow.back().expect("back"), FlowStep::GroupQuestions(last));

    flow.set_field_on("perdarahanLama", "", today()).expect("cleared");
    assert_eq!(flow.back().expect("back"), FlowStep::GroupResult(last - 1));
    assert_eq!(flow.answers().get("hemoglobinRendah"), Some("ya"));

    let mut fresh = ScreeningFlow::new(catalog());
    assert_eq!(fresh.back().expect("back at intro"), FlowStep::Intro);
}

#[test]
fn summary_requires_submit_and_submission_is_terminal() {
    let mut flow = flow_at_summary();
    assert!(matches!(flow.advance(), Err(FlowError::SubmitRequired)));

    let at = Utc
        .with_ymd_and_hms(2025, 6, 1, 2, 0, 0)
        .single()
        .expect("valid instant");
    let record = flow.submit_at(at).expect("submits from summary");

    assert_eq!(record.profile.name, "Siti Rahma");
    assert_eq!(record.results.overall, 7);
    assert_eq!(
        record.results.top.as_ref().map(|top| top.group_title.as_str()),
        Some("Thalasemia")
    );
    assert!(flow.is_submitted());

    assert!(matches!(flow.submit(), Err(FlowError::AlreadySubmitted)));
    assert!(matches!(flow.back(), Err(FlowError::AlreadySubmitted)));
    assert!(matches!(flow.advance(), Err(FlowError::AlreadySubmitted)));
    assert!(matches!(
        flow.set_field_on("nama", "Someone Else", today()),
        Err(FlowError::AlreadySubmitted)
    ));
}

#[test]
fn submit_outside_summary_is_rejected() {
    let mut flow = ScreeningFlow::new(catalog());
    flow.advance().expect("intro");

    assert!(matches!(
        flow.submit(),
        Err(FlowError::NotAtSummary(FlowStep::ProfileEntry))
    ));
}
