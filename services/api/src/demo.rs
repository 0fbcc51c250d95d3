use crate::infra::InMemorySubmissionStore;
use clap::{Args, ValueEnum};
use gensave::error::AppError;
use gensave::workflows::screening::{
    aggregate, build_record, profile_from_answers, render_json, render_text, AnswerSet,
    AnswerToken, FileSubmissionStore, FlowStep, PersistenceOutcome, Question, ScreeningCatalog,
    ScreeningService, ScreeningServiceError, SubmissionRecord, SubmissionStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const DEMO_PERSIST_TIMEOUT: Duration = Duration::from_secs(5);

const DEMO_PROFILE: [(&str, &str); 7] = [
    ("nama", "Siti Rahma"),
    ("jenisKelamin", "perempuan"),
    ("tempatLahir", "Bandung"),
    ("tanggalLahir", "1998-04-12"),
    ("tinggiBadan", "158"),
    ("beratBadan", "52"),
    ("alamat", "Jl. Merdeka No. 1, Bandung"),
];

// Anything not listed is answered "tidak".
const DEMO_ANSWERS: [(&str, AnswerToken); 6] = [
    ("hemoglobinRendah", AnswerToken::Ya),
    ("cepatLelah", AnswerToken::KadangKadang),
    ("keluargaTalasemia", AnswerToken::TidakTahu),
    ("seringHaus", AnswerToken::KadangKadang),
    ("keluargaDiabetes", AnswerToken::Ya),
    ("sulitBedakanWarna", AnswerToken::Ya),
];

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Persist the demo submission into this directory instead of memory
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Flat JSON object of field ids to answers
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Document format to print
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub(crate) format: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    Text,
    Json,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = Arc::new(ScreeningCatalog::standard());

    match args.output_dir {
        Some(dir) => {
            let store = Arc::new(FileSubmissionStore::new(dir, catalog.clone()));
            walk_wizard(&ScreeningService::new(catalog, store, DEMO_PERSIST_TIMEOUT)).await
        }
        None => {
            let store = Arc::new(InMemorySubmissionStore::default());
            let service = ScreeningService::new(catalog, store.clone(), DEMO_PERSIST_TIMEOUT);
            walk_wizard(&service).await?;
            println!("In-memory submissions: {}", store.stems().join(", "));
            Ok(())
        }
    }
}

async fn walk_wizard<S>(service: &ScreeningService<S>) -> Result<(), AppError>
where
    S: SubmissionStore + 'static,
{
    println!("GenSave screening demo");
    let mut flow = service.start_flow();
    print_step(flow.step());

    for (field, value) in DEMO_PROFILE {
        flow.set_field(field, value)
            .map_err(ScreeningServiceError::from)?;
    }
    print_step(flow.advance().map_err(ScreeningServiceError::from)?);
    println!(
        "  Umur terhitung: {} tahun",
        flow.answers().get("umur").unwrap_or("-")
    );
    print_step(flow.advance().map_err(ScreeningServiceError::from)?);

    while let FlowStep::GroupQuestions(index) = flow.step() {
        let questions: Vec<Question> = flow
            .active_group()
            .map(|group| group.questions.clone())
            .unwrap_or_default();
        for question in &questions {
            let answer = scripted_answer(question);
            flow.set_field(question.field, answer.as_str())
                .map_err(ScreeningServiceError::from)?;
            println!("    * {}: {}", question.label, answer.label());
        }

        print_step(flow.advance().map_err(ScreeningServiceError::from)?);
        if let Some(result) = flow.group_result(index) {
            println!("  {}: {}%", result.group_title, result.percentage);
        }
        print_step(flow.advance().map_err(ScreeningServiceError::from)?);
    }

    let results = flow.results();
    println!("  Rata-rata keseluruhan: {}%", results.overall);
    if let Some(top) = &results.top {
        println!("  Risiko tertinggi: {} ({}%)", top.group_title, top.percentage);
    }

    let submission = service.complete(&mut flow)?;
    print_step(flow.step());

    let receipt = submission.receipt;
    match &receipt.bmi {
        Some(bmi) => println!("  BMI: {:.1} ({})", bmi.value, bmi.label),
        None => println!("  BMI: unavailable"),
    }
    println!("  Document: {}.txt", receipt.file_stem);

    match submission.persistence.outcome().await {
        PersistenceOutcome::Stored(stored) => {
            println!("  Stored at: {}", stored.locations.join(", "));
        }
        PersistenceOutcome::Failed(error) => println!("  Storage failed: {error}"),
        PersistenceOutcome::TimedOut(timeout) => {
            println!("  Storage timed out after {} ms", timeout.as_millis());
        }
    }

    println!();
    println!("{}", render_text(&receipt.record, service.catalog()));
    Ok(())
}

fn scripted_answer(question: &Question) -> AnswerToken {
    DEMO_ANSWERS
        .iter()
        .find(|(field, _)| *field == question.field)
        .map(|(_, token)| *token)
        .filter(|token| question.offers(*token))
        .unwrap_or(AnswerToken::Tidak)
}

fn print_step(step: FlowStep) {
    let label = match step {
        FlowStep::Intro => "Intro".to_string(),
        FlowStep::ProfileEntry => "Data pribadi".to_string(),
        FlowStep::GroupQuestions(index) => format!("Pertanyaan kelompok {}", index + 1),
        FlowStep::GroupResult(index) => format!("Hasil kelompok {}", index + 1),
        FlowStep::Summary => "Ringkasan".to_string(),
        FlowStep::Submitted => "Terkirim".to_string(),
    };
    println!("- Step: {label}");
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let catalog = ScreeningCatalog::standard();
    let record = score_file(&args.input, &catalog)?;

    let document = match args.format {
        ReportFormat::Text => render_text(&record, &catalog),
        ReportFormat::Json => render_json(&record).map_err(AppError::Encode)?,
    };
    println!("{document}");
    Ok(())
}

pub(crate) fn score_file(
    path: &Path,
    catalog: &ScreeningCatalog,
) -> Result<SubmissionRecord, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let answers: AnswerSet = serde_json::from_str(&raw)?;
    let profile = profile_from_answers(&answers).map_err(ScreeningServiceError::from)?;
    let results = aggregate(catalog.groups(), &answers);
    Ok(build_record(profile, &answers, results))
}
