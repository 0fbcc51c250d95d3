use std::collections::HashSet;

use serde::Serialize;

use super::domain::{AnswerToken, ProfileField};

const YES_NO: &[AnswerToken] = &[AnswerToken::Ya, AnswerToken::Tidak];
const YES_NO_SOMETIMES: &[AnswerToken] =
    &[AnswerToken::Ya, AnswerToken::Tidak, AnswerToken::KadangKadang];
const YES_NO_UNSURE: &[AnswerToken] =
    &[AnswerToken::Ya, AnswerToken::Tidak, AnswerToken::TidakTahu];

/// Total of question weights every group must reach.
pub const GROUP_WEIGHT_TOTAL: u32 = 100;

/// One weighted yes/no question. `weight` is the most it can add to its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    pub field: &'static str,
    pub label: &'static str,
    pub weight: u32,
    pub options: &'static [AnswerToken],
}

impl Question {
    pub fn offers(&self, token: AnswerToken) -> bool {
        self.options.contains(&token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionGroup {
    pub key: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
    pub questions: Vec<Question>,
}

impl ConditionGroup {
    pub fn weight_total(&self) -> u32 {
        self.questions
            .iter()
            .map(|question| question.weight)
            .fold(0, u32::saturating_add)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.questions.iter().map(|question| question.field)
    }
}

/// Configuration invariant violations. These are bugs in the catalog, not user errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogIssue {
    #[error("group '{group}' has no questions")]
    EmptyGroup { group: &'static str },
    #[error("group '{group}' weights sum to {total}, expected 100")]
    WeightTotal { group: &'static str, total: u32 },
    #[error("question '{field}' has weight {weight} above 100")]
    WeightOutOfRange { field: &'static str, weight: u32 },
    #[error("question field '{field}' is declared more than once")]
    DuplicateField { field: &'static str },
    #[error("question field '{field}' collides with a profile field")]
    ProfileFieldCollision { field: &'static str },
    #[error("question '{field}' must offer both 'ya' and 'tidak'")]
    MissingBinaryOptions { field: &'static str },
}

/// Ordered condition groups shared by scoring, validation, and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreeningCatalog {
    groups: Vec<ConditionGroup>,
}

impl ScreeningCatalog {
    pub fn new(groups: Vec<ConditionGroup>) -> Self {
        Self { groups }
    }

    pub fn standard() -> Self {
        Self::new(standard_groups())
    }

    pub fn groups(&self) -> &[ConditionGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&ConditionGroup> {
        self.groups.get(index)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_by_title(&self, title: &str) -> Option<&ConditionGroup> {
        self.groups.iter().find(|group| group.title == title)
    }

    pub fn question(&self, field: &str) -> Option<&Question> {
        self.groups
            .iter()
            .flat_map(|group| group.questions.iter())
            .find(|question| question.field == field)
    }

    pub fn question_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.groups.iter().flat_map(ConditionGroup::fields)
    }

    /// Every invariant violation in declaration order; empty for a sound catalog.
    pub fn issues(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for group in &self.groups {
            if group.questions.is_empty() {
                issues.push(CatalogIssue::EmptyGroup { group: group.title });
                continue;
            }

            for question in &group.questions {
                if question.weight > GROUP_WEIGHT_TOTAL {
                    issues.push(CatalogIssue::WeightOutOfRange {
                        field: question.field,
                        weight: question.weight,
                    });
                }
                if !seen.insert(question.field) {
                    issues.push(CatalogIssue::DuplicateField {
                        field: question.field,
                    });
                }
                if ProfileField::from_id(question.field).is_some() {
                    issues.push(CatalogIssue::ProfileFieldCollision {
                        field: question.field,
                    });
                }
                if !question.offers(AnswerToken::Ya) || !question.offers(AnswerToken::Tidak) {
                    issues.push(CatalogIssue::MissingBinaryOptions {
                        field: question.field,
                    });
                }
            }

            let total = group.weight_total();
            if total != GROUP_WEIGHT_TOTAL {
                issues.push(CatalogIssue::WeightTotal {
                    group: group.title,
                    total,
                });
            }
        }

        issues
    }
}

fn standard_groups() -> Vec<ConditionGroup> {
    vec![
        ConditionGroup {
            key: "thalasemia",
            title: "Thalasemia",
            summary: "Kelainan darah turunan. Skrining dini membantu perencanaan pemeriksaan lanjutan.",
            questions: vec![
                Question {
                    field: "hemoglobinRendah",
                    label: "Apakah anda memiliki kadar hemoglobin (HB) rendah?",
                    weight: 30,
                    options: YES_NO_UNSURE,
                },
                Question {
                    field: "cepatLelah",
                    label: "Apakah anda sering merasa cepat lelah atau capek?",
                    weight: 30,
                    options: YES_NO_SOMETIMES,
                },
                Question {
                    field: "keluargaTalasemia",
                    label: "Apakah keluarga anda ada yang menderita Talasemia?",
                    weight: 40,
                    options: YES_NO_UNSURE,
                },
            ],
        },
        ConditionGroup {
            key: "diabetes",
            title: "Diabetes",
            summary: "Gangguan kadar gula darah yang dapat dipengaruhi faktor keturunan.",
            questions: vec![
                Question {
                    field: "seringHaus",
                    label: "Apakah anda sering merasa haus berlebihan?",
                    weight: 25,
                    options: YES_NO_SOMETIMES,
                },
                Question {
                    field: "seringBuangAirKecil",
                    label: "Apakah anda sering buang air kecil, terutama di malam hari?",
                    weight: 25,
                    options: YES_NO_SOMETIMES,
                },
                Question {
                    field: "lukaSulitSembuh",
                    label: "Apakah luka pada tubuh anda sulit sembuh?",
                    weight: 20,
                    options: YES_NO,
                },
                Question {
                    field: "keluargaDiabetes",
                    label: "Apakah keluarga anda ada yang menderita Diabetes?",
                    weight: 30,
                    options: YES_NO_UNSURE,
                },
            ],
        },
        ConditionGroup {
            key: "hipertensi",
            title: "Hipertensi",
            summary: "Tekanan darah tinggi yang sering tidak bergejala.",
            questions: vec![
                Question {
                    field: "sakitKepalaTengkuk",
                    label: "Apakah anda sering sakit kepala atau tengkuk terasa berat?",
                    weight: 25,
                    options: YES_NO_SOMETIMES,
                },
                Question {
                    field: "tekananDarahTinggi",
                    label: "Apakah hasil pengukuran tekanan darah anda pernah tinggi?",
                    weight: 40,
                    options: YES_NO_UNSURE,
                },
                Question {
                    field: "keluargaHipertensi",
                    label: "Apakah keluarga anda ada yang menderita Hipertensi?",
                    weight: 35,
                    options: YES_NO_UNSURE,
                },
            ],
        },
        ConditionGroup {
            key: "kanker",
            title: "Tanda Peringatan Kanker",
            summary: "Tanda awal yang perlu diperiksakan lebih lanjut ke tenaga kesehatan.",
            questions: vec![
                Question {
                    field: "benjolanTidakNormal",
                    label: "Apakah anda menemukan benjolan yang tidak normal pada tubuh?",
                    weight: 40,
                    options: YES_NO_UNSURE,
                },
                Question {
                    field: "beratTurunDrastis",
                    label: "Apakah berat badan anda turun drastis tanpa sebab yang jelas?",
                    weight: 30,
                    options: YES_NO,
                },
                Question {
                    field: "keluargaKanker",
                    label: "Apakah keluarga anda ada yang menderita Kanker?",
                    weight: 30,
                    options: YES_NO_UNSURE,
                },
            ],
        },
        ConditionGroup {
            key: "jantung",
            title: "Penyakit Jantung",
            summary: "Gangguan jantung dan pembuluh darah.",
            questions: vec![
                Question {
                    field: "nyeriDada",
                    label: "Apakah anda pernah merasakan nyeri dada saat beraktivitas?",
                    weight: 35,
                    options: YES_NO_SOMETIMES,
                },
                Question {
                    field: "sesakNapas",
                    label: "Apakah anda mudah sesak napas?",
                    weight: 30,
                    options: YES_NO_SOMETIMES,
                },
                Question {
                    field: "keluargaJantung",
                    label: "Apakah keluarga anda ada yang menderita Penyakit Jantung?",
                    weight: 35,
                    options: YES_NO_UNSURE,
                },
            ],
        },
        ConditionGroup {
            key: "disabilitas",
            title: "Disabilitas",
            summary: "Keterbatasan fisik, intelektual, atau sensorik yang dapat diturunkan.",
            questions: vec![
                Question {
                    field: "keterbatasanFisik",
                    label: "Apakah anda memiliki keterbatasan fisik atau sensorik sejak lahir?",
                    weight: 50,
                    options: YES_NO,
                },
                Question {
                    field: "keluargaDisabilitas",
                    label: "Apakah keluarga anda ada yang memiliki disabilitas bawaan?",
                    weight: 50,
                    options: YES_NO_UNSURE,
                },
            ],
        },
        ConditionGroup {
            key: "buta_warna",
            title: "Buta Warna",
            summary: "Kesulitan membedakan warna tertentu, umumnya diturunkan.",
            questions: vec![
                Question {
                    field: "sulitBedakanWarna",
                    label: "Apakah anda sulit membedakan warna tertentu (misalnya merah dan hijau)?",
                    weight: 60,
                    options: YES_NO_SOMETIMES,
                },
                Question {
                    field: "keluargaButaWarna",
                    label: "Apakah keluarga anda ada yang menderita Buta Warna?",
                    weight: 40,
                    options: YES_NO_UNSURE,
                },
            ],
        },
        ConditionGroup {
            key: "hemofilia",
            title: "Hemofilia",
            summary: "Gangguan pembekuan darah yang diturunkan.",
            questions: vec![
                Question {
                    field: "perdarahanLama",
                    label: "Apakah perdarahan pada luka anda sulit berhenti?",
                    weight: 35,
                    options: YES_NO_SOMETIMES,
                },
                Question {
                    field: "mudahMemar",
                    label: "Apakah tubuh anda mudah memar tanpa sebab yang jelas?",
                    weight: 25,
                    options: YES_NO_SOMETIMES,
                },
                Question {
                    field: "keluargaHemofilia",
                    label: "Apakah keluarga anda ada yang menderita Hemofilia?",
                    weight: 40,
                    options: YES_NO_UNSURE,
                },
            ],
        },
    ]
}
