use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Patient sex as offered by the report form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatientSex {
    Male,
    Female,
}

impl PatientSex {
    pub fn as_str(self) -> &'static str {
        match self {
            PatientSex::Male => "Male",
            PatientSex::Female => "Female",
        }
    }

    /// Parses the form value; matching is case-insensitive.
    pub fn from_form(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Some(PatientSex::Male),
            "female" | "f" => Some(PatientSex::Female),
            _ => None,
        }
    }
}

impl std::fmt::Display for PatientSex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient-care record as stored by the backend.
///
/// `patient_sex` stays a plain string here: records written by older clients may carry values
/// the current form no longer offers, and listing must not fail on them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    pub personnel_name: String,
    pub patient_name: String,
    #[serde(default)]
    pub patient_age: Option<u32>,
    pub patient_sex: String,
    pub location: String,
    pub lga: String,
    pub description: String,
    pub action_taken: String,
    #[serde(default)]
    pub transfer_to_hospital: bool,
    #[serde(default)]
    pub hospital_id: Option<String>,
}

/// Body of `POST /incidents`.
///
/// `transfer_to_hospital` is always sent as `false`; the transfer decision is recorded later
/// through [`IncidentPatch`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewIncident {
    pub patient_name: String,
    pub patient_age: Option<u32>,
    pub patient_sex: PatientSex,
    pub location: String,
    pub lga: String,
    pub description: String,
    pub action_taken: String,
    pub transfer_to_hospital: bool,
}

/// Body of `PATCH /incidents/{id}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentPatch {
    pub transfer_to_hospital: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hospital_id: Option<String>,
}

impl IncidentPatch {
    /// Patch recording a transfer to `hospital_id`.
    pub fn transfer_to(hospital_id: impl Into<String>) -> Self {
        Self {
            transfer_to_hospital: true,
            hospital_id: Some(hospital_id.into()),
        }
    }
}

/// Accepts RFC 3339 timestamps and, for records stored without an offset, naive ISO 8601
/// timestamps which are read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}
