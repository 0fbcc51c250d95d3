use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc};

use super::catalog::ScreeningCatalog;
use super::domain::ProfileField;
use super::record::SubmissionRecord;

pub const REPORT_TITLE: &str = "HASIL SCREENING GENETIK GENSAVE";
pub const CONFIDENTIALITY_FOOTER: &str =
    "Data ini bersifat rahasia dan hanya untuk keperluan medis.";
const RULE: &str = "================================";
const WIB_OFFSET_SECONDS: i32 = 7 * 3600;
const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Human-readable summary of a stored submission.
///
/// Question lines are looked up in `catalog` by group title; a group the catalog no longer
/// knows still prints its stored percentage.
pub fn render_text(record: &SubmissionRecord, catalog: &ScreeningCatalog) -> String {
    let label_width = ProfileField::ordered()
        .iter()
        .map(|field| field.label().len())
        .max()
        .unwrap_or_default();

    let mut lines: Vec<String> = vec![
        REPORT_TITLE.to_string(),
        RULE.to_string(),
        String::new(),
        "Data Pribadi:".to_string(),
    ];

    for field in ProfileField::ordered() {
        let value = record.profile.value(field);
        let value = match field.unit() {
            Some(unit) => format!("{value} {unit}"),
            None => value.to_string(),
        };
        lines.push(format!("- {:<label_width$}: {}", field.label(), value));
    }

    lines.push(String::new());
    lines.push("Ringkasan Skor per Penyakit:".to_string());
    for item in &record.results.items {
        lines.push(format!("- {}: {}%", item.group_title, item.percentage));
        if let Some(group) = catalog.group_by_title(&item.group_title) {
            for question in &group.questions {
                let answer = record
                    .answers
                    .get(question.field)
                    .map(str::trim)
                    .filter(|answer| !answer.is_empty())
                    .unwrap_or("-");
                lines.push(format!("    * {}: {}", question.label, answer));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!("Rata-rata keseluruhan: {}%", record.results.overall));
    if let Some(top) = &record.results.top {
        lines.push(format!(
            "Risiko tertinggi: {} ({}%)",
            top.group_title, top.percentage
        ));
    }
    lines.push(String::new());
    lines.push(format!("Waktu Screening: {}", format_wib(record.submitted_at)));
    lines.push(String::new());
    lines.push(RULE.to_string());
    lines.push(CONFIDENTIALITY_FOOTER.to_string());

    lines.join("\n")
}

/// Machine-readable document mirroring the record shape.
pub fn render_json(record: &SubmissionRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}

/// `9 Maret 2025 11.05.06 WIB`
pub fn format_wib(instant: DateTime<Utc>) -> String {
    let Some(offset) = FixedOffset::east_opt(WIB_OFFSET_SECONDS) else {
        return instant.to_rfc3339();
    };
    let local = instant.with_timezone(&offset);
    format!(
        "{} {} {} {:02}.{:02}.{:02} WIB",
        local.day(),
        MONTHS[local.month0() as usize],
        local.year(),
        local.hour(),
        local.minute(),
        local.second()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::screening::domain::{AnswerSet, Profile};
    use crate::workflows::screening::evaluation::aggregate;
    use crate::workflows::screening::record::build_record_at;
    use chrono::TimeZone;

    fn record() -> SubmissionRecord {
        let catalog = ScreeningCatalog::standard();
        let answers = AnswerSet::new()
            .with("hemoglobinRendah", "ya")
            .with("cepatLelah", "kadang-kadang")
            .with("keluargaTalasemia", "tidak-tahu");
        let profile = Profile {
            name: "Siti Rahma".to_string(),
            sex: "perempuan".to_string(),
            birthplace: "Bandung".to_string(),
            birth_date: "1998-04-12".to_string(),
            age: "27".to_string(),
            height_cm: "158".to_string(),
            weight_kg: "52".to_string(),
            address: "Jl. Merdeka No. 1".to_string(),
        };
        let results = aggregate(catalog.groups(), &answers);
        let at = Utc
            .with_ymd_and_hms(2025, 3, 8, 20, 5, 6)
            .single()
            .expect("valid instant");
        build_record_at(profile, &answers, results, at)
    }

    #[test]
    fn text_document_has_every_section() {
        let text = render_text(&record(), &ScreeningCatalog::standard());

        assert!(text.starts_with(REPORT_TITLE));
        assert!(text.contains("- Nama Lengkap : Siti Rahma"));
        assert!(text.contains("- Umur         : 27 tahun"));
        assert!(text.contains("- Tinggi Badan : 158 cm"));
        assert!(text.contains("- Thalasemia: 58%"));
        assert!(text.contains("    * Apakah anda sering merasa cepat lelah atau capek?: kadang-kadang"));
        assert!(text.contains("- Diabetes: 0%"));
        assert!(text.contains("    * Apakah anda sering merasa haus berlebihan?: -"));
        assert!(text.contains("Rata-rata keseluruhan: 7%"));
        assert!(text.contains("Risiko tertinggi: Thalasemia (58%)"));
        assert!(text.contains("Waktu Screening: 9 Maret 2025 03.05.06 WIB"));
        assert!(text.ends_with(CONFIDENTIALITY_FOOTER));
    }

    #[test]
    fn unknown_groups_still_print_percentages() {
        let mut record = record();
        record.results.items[0].group_title = "Retired Group".to_string();

        let text = render_text(&record, &ScreeningCatalog::standard());
        assert!(text.contains("- Retired Group: 58%"));
        assert!(!text.contains("hemoglobin"));
    }

    #[test]
    fn json_document_mirrors_record() {
        let record = record();
        let json = render_json(&record).expect("record renders");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        for key in ["submittedAt", "profile", "answers", "results"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["answers"]["cepatLelah"], "kadang-kadang");
    }
}
