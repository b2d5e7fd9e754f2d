//! In-memory backend and fixtures for unit tests.

use crate::error::{BackendError, BackendResult};
use crate::ports::{HospitalsBackend, IncidentsBackend};
use crate::report_flow::IncidentForm;
use api_shared::{Hospital, Incident, IncidentPatch, NewIncident};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Records every call and answers from canned data.
#[derive(Default)]
pub struct FakeBackend {
    incidents: Vec<Incident>,
    hospitals: Vec<Hospital>,
    create_error: Option<String>,
    patch_error: Option<String>,
    hospitals_fail: bool,
    list_fail_at_skip: Option<usize>,
    created: Mutex<Vec<NewIncident>>,
    patches: Mutex<Vec<(String, IncidentPatch)>>,
    list_calls: Mutex<Vec<(usize, usize)>>,
    calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_incidents(mut self, incidents: Vec<Incident>) -> Self {
        self.incidents = incidents;
        self
    }

    pub fn with_hospitals(mut self, hospitals: Vec<Hospital>) -> Self {
        self.hospitals = hospitals;
        self
    }

    pub fn failing_create(mut self, message: &str) -> Self {
        self.create_error = Some(message.to_string());
        self
    }

    pub fn failing_patch(mut self, message: &str) -> Self {
        self.patch_error = Some(message.to_string());
        self
    }

    pub fn failing_hospitals(mut self) -> Self {
        self.hospitals_fail = true;
        self
    }

    pub fn failing_list_at(mut self, skip: usize) -> Self {
        self.list_fail_at_skip = Some(skip);
        self
    }

    pub fn created(&self) -> Vec<NewIncident> {
        self.created.lock().unwrap().clone()
    }

    pub fn patches(&self) -> Vec<(String, IncidentPatch)> {
        self.patches.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<(usize, usize)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn rejected(message: &str) -> BackendError {
    BackendError::Application {
        status: 400,
        message: message.to_string(),
    }
}

#[async_trait]
impl IncidentsBackend for FakeBackend {
    async fn create_incident(&self, incident: &NewIncident) -> BackendResult<Incident> {
        self.count();
        if let Some(message) = &self.create_error {
            return Err(rejected(message));
        }
        let mut created = self.created.lock().unwrap();
        created.push(incident.clone());
        Ok(Incident {
            id: format!("inc-{}", created.len()),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            personnel_name: "Ada Obi".into(),
            patient_name: incident.patient_name.clone(),
            patient_age: incident.patient_age,
            patient_sex: incident.patient_sex.as_str().into(),
            location: incident.location.clone(),
            lga: incident.lga.clone(),
            description: incident.description.clone(),
            action_taken: incident.action_taken.clone(),
            transfer_to_hospital: incident.transfer_to_hospital,
            hospital_id: None,
        })
    }

    async fn list_incidents(&self, skip: usize, limit: usize) -> BackendResult<Vec<Incident>> {
        self.count();
        self.list_calls.lock().unwrap().push((skip, limit));
        if self.list_fail_at_skip == Some(skip) {
            return Err(BackendError::Connectivity("connection reset".into()));
        }
        Ok(self.incidents.iter().skip(skip).take(limit).cloned().collect())
    }

    async fn patch_incident(&self, id: &str, patch: &IncidentPatch) -> BackendResult<Incident> {
        self.count();
        if let Some(message) = &self.patch_error {
            return Err(rejected(message));
        }
        self.patches
            .lock()
            .unwrap()
            .push((id.to_string(), patch.clone()));
        let mut updated = incident(id, patch.transfer_to_hospital, None);
        updated.hospital_id = patch.hospital_id.clone();
        Ok(updated)
    }
}

#[async_trait]
impl HospitalsBackend for FakeBackend {
    async fn list_hospitals(&self) -> BackendResult<Vec<Hospital>> {
        self.count();
        if self.hospitals_fail {
            return Err(BackendError::Connectivity("connection refused".into()));
        }
        Ok(self.hospitals.clone())
    }

    async fn nearby_hospitals(
        &self,
        _lat: f64,
        _lon: f64,
        _condition: Option<&str>,
    ) -> BackendResult<Vec<Hospital>> {
        self.count();
        Ok(self.hospitals.clone())
    }
}

pub fn filled_form() -> IncidentForm {
    IncidentForm {
        patient_name: "Chinedu Okafor".into(),
        patient_age: "34".into(),
        patient_sex: "Male".into(),
        location: "Third Mainland Bridge".into(),
        lga: "Lagos Mainland".into(),
        description: "Road traffic collision".into(),
        action_taken: "Splinted left leg".into(),
    }
}

pub fn hospital(id: &str, beds: i64, phone: &str) -> Hospital {
    Hospital {
        id: id.into(),
        name: format!("Hospital {id}"),
        address: "1 Marina".into(),
        lga: "Lagos Island".into(),
        phone: phone.into(),
        available_beds: beds,
        expertise: vec!["Trauma".into()],
        latitude: None,
        longitude: None,
        distance: None,
    }
}

pub fn incident(id: &str, transferred: bool, age: Option<u32>) -> Incident {
    Incident {
        id: id.into(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
        personnel_name: "Ada Obi".into(),
        patient_name: format!("Patient {id}"),
        patient_age: age,
        patient_sex: "Female".into(),
        location: "Ikeja GRA".into(),
        lga: "Ikeja".into(),
        description: "Fainted at bus stop".into(),
        action_taken: "Oxygen administered".into(),
        transfer_to_hospital: transferred,
        hospital_id: transferred.then(|| "hosp-1".to_string()),
    }
}

/// `n` incidents, every third one transferred.
pub fn incidents(n: usize) -> Vec<Incident> {
    (0..n)
        .map(|i| incident(&format!("inc-{i}"), i % 3 == 0, Some(20 + (i % 50) as u32)))
        .collect()
}
