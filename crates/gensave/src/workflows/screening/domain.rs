use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Closed set of answers a screening question accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerToken {
    #[serde(rename = "ya")]
    Ya,
    #[serde(rename = "tidak")]
    Tidak,
    #[serde(rename = "kadang-kadang")]
    KadangKadang,
    #[serde(rename = "tidak-tahu")]
    TidakTahu,
}

impl AnswerToken {
    pub const fn as_str(self) -> &'static str {
        match self {
            AnswerToken::Ya => "ya",
            AnswerToken::Tidak => "tidak",
            AnswerToken::KadangKadang => "kadang-kadang",
            AnswerToken::TidakTahu => "tidak-tahu",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            AnswerToken::Ya => "Ya",
            AnswerToken::Tidak => "Tidak",
            AnswerToken::KadangKadang => "Kadang-kadang",
            AnswerToken::TidakTahu => "Tidak tahu",
        }
    }

    /// Case-insensitive; surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ya" => Some(AnswerToken::Ya),
            "tidak" => Some(AnswerToken::Tidak),
            "kadang-kadang" => Some(AnswerToken::KadangKadang),
            "tidak-tahu" => Some(AnswerToken::TidakTahu),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat mapping of field id to raw value, covering both profile and question fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// Form clients send numbers for age/height/weight; null means "not answered".
impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlatFieldsVisitor;

        impl<'de> Visitor<'de> for FlatFieldsVisitor {
            type Value = AnswerSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of field ids to scalar values")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut fields = BTreeMap::new();
                while let Some((key, value)) =
                    access.next_entry::<String, serde_json::Value>()?
                {
                    let value = match value {
                        serde_json::Value::Null => continue,
                        serde_json::Value::String(text) => text,
                        serde_json::Value::Number(number) => number.to_string(),
                        serde_json::Value::Bool(flag) => flag.to_string(),
                        other => {
                            return Err(serde::de::Error::custom(format!(
                                "field '{key}' must be a scalar, found {other}"
                            )))
                        }
                    };
                    fields.insert(key, value);
                }
                Ok(AnswerSet(fields))
            }
        }

        deserializer.deserialize_map(FlatFieldsVisitor)
    }
}

/// Personal fields collected before any condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Sex,
    Birthplace,
    BirthDate,
    Age,
    Height,
    Weight,
    Address,
}

impl ProfileField {
    pub const fn ordered() -> [ProfileField; 8] {
        [
            ProfileField::Name,
            ProfileField::Sex,
            ProfileField::Birthplace,
            ProfileField::BirthDate,
            ProfileField::Age,
            ProfileField::Height,
            ProfileField::Weight,
            ProfileField::Address,
        ]
    }

    /// Wire identifier used in intake payloads and stored records.
    pub const fn id(self) -> &'static str {
        match self {
            ProfileField::Name => "nama",
            ProfileField::Sex => "jenisKelamin",
            ProfileField::Birthplace => "tempatLahir",
            ProfileField::BirthDate => "tanggalLahir",
            ProfileField::Age => "umur",
            ProfileField::Height => "tinggiBadan",
            ProfileField::Weight => "beratBadan",
            ProfileField::Address => "alamat",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ProfileField::Name => "Nama Lengkap",
            ProfileField::Sex => "Jenis Kelamin",
            ProfileField::Birthplace => "Tempat Lahir",
            ProfileField::BirthDate => "Tanggal Lahir",
            ProfileField::Age => "Umur",
            ProfileField::Height => "Tinggi Badan",
            ProfileField::Weight => "Berat Badan",
            ProfileField::Address => "Alamat",
        }
    }

    pub const fn unit(self) -> Option<&'static str> {
        match self {
            ProfileField::Age => Some("tahun"),
            ProfileField::Height => Some("cm"),
            ProfileField::Weight => Some("kg"),
            _ => None,
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|field| field.id() == id)
    }
}

/// Personal data exactly as the applicant entered it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "jenisKelamin")]
    pub sex: String,
    #[serde(rename = "tempatLahir")]
    pub birthplace: String,
    #[serde(rename = "tanggalLahir")]
    pub birth_date: String,
    #[serde(rename = "umur")]
    pub age: String,
    #[serde(rename = "tinggiBadan")]
    pub height_cm: String,
    #[serde(rename = "beratBadan")]
    pub weight_kg: String,
    #[serde(rename = "alamat")]
    pub address: String,
}

impl Profile {
    pub fn value(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Sex => &self.sex,
            ProfileField::Birthplace => &self.birthplace,
            ProfileField::BirthDate => &self.birth_date,
            ProfileField::Age => &self.age,
            ProfileField::Height => &self.height_cm,
            ProfileField::Weight => &self.weight_kg,
            ProfileField::Address => &self.address,
        }
    }

    pub fn body_mass_index(&self) -> Option<BodyMassIndex> {
        let height_cm = parse_measure(&self.height_cm)?;
        let weight_kg = parse_measure(&self.weight_kg)?;
        BodyMassIndex::from_measurements(height_cm, weight_kg)
    }
}

fn parse_measure(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub const fn label(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Kurus",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Berlebih",
            BmiCategory::Obese => "Obesitas",
        }
    }
}

/// Estimate only; shown next to the profile, never part of the risk score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyMassIndex {
    pub value: f64,
    pub category: BmiCategory,
    pub label: &'static str,
}

impl BodyMassIndex {
    pub fn from_measurements(height_cm: f64, weight_kg: f64) -> Option<Self> {
        if height_cm <= 0.0 || weight_kg <= 0.0 {
            return None;
        }
        let meters = height_cm / 100.0;
        let value = (weight_kg / (meters * meters) * 10.0).round() / 10.0;
        let category = if value < 18.5 {
            BmiCategory::Underweight
        } else if value < 25.0 {
            BmiCategory::Normal
        } else if value < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        };
        Some(Self {
            value,
            category,
            label: category.label(),
        })
    }
}

/// Whole years between a `YYYY-MM-DD` birth date and `today`.
pub fn derive_age(birth_date: &str, today: NaiveDate) -> Option<u32> {
    let born = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d").ok()?;
    if born > today {
        return None;
    }
    let mut years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}
