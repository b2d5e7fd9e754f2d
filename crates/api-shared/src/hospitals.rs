use serde::{Deserialize, Serialize};

/// A receiving hospital. Read-only from the client's perspective.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hospital {
    pub id: String,
    pub name: String,
    pub address: String,
    pub lga: String,
    pub phone: String,
    pub available_beds: i64,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Distance in kilometres, only present on `GET /hospitals/nearby` results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl Hospital {
    pub fn has_available_beds(&self) -> bool {
        self.available_beds > 0
    }
}
