//! Incident report flow.
//!
//! Personnel fill in a report, submit it, and then answer one question: does the patient go to
//! hospital? The flow is strictly linear:
//!
//! ```text
//! Editing --submit--> AwaitingTransferDecision --no--> Editing (blank form)
//!                                              --yes-> AwaitingHospitalChoice --pick/skip--> Editing (blank form)
//! ```
//!
//! ## Type-state
//!
//! Each state is a marker type and every transition consumes the current `ReportFlow<S>`, so
//! only the operations valid in a state can be called and a report cannot be submitted twice.
//! The in-flight submission is the `submit` future itself: while it runs there is no
//! `ReportFlow<Editing>` left to submit again.
//!
//! The incident is created with `transfer_to_hospital = false`. Answering "no" sends nothing
//! further; answering "yes" hands the incident id to [`HospitalSelection`], which records the
//! transfer with a single patch.
//!
//! [`HospitalSelection`]: crate::hospital_selection::HospitalSelection

use crate::constants::LAGOS_LGAS;
use crate::error::{FieldIssue, ReportError, ReportResult};
use crate::hospital_selection::HospitalSelection;
use crate::ports::{HospitalsBackend, IncidentsBackend};
use api_shared::{Incident, NewIncident, PatientSex};

// ============================================================================
// FORM
// ============================================================================

/// Raw form input, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncidentForm {
    pub patient_name: String,
    pub patient_age: String,
    pub patient_sex: String,
    pub location: String,
    pub lga: String,
    pub description: String,
    pub action_taken: String,
}

impl IncidentForm {
    /// True when every field is empty, as after a reset.
    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }

    /// Validates the form and builds the creation body.
    ///
    /// Required: patient name, sex, location, LGA, description and action taken, all non-blank
    /// after trimming. Sex must be Male or Female and the LGA one of [`LAGOS_LGAS`] (matched
    /// case-insensitively, sent in canonical spelling). Age is optional: text that is not a
    /// non-negative whole number is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidForm` listing every failing field.
    pub fn validate(&self) -> ReportResult<NewIncident> {
        let mut issues = Vec::new();

        let patient_name = required(&mut issues, "patient_name", &self.patient_name);
        let location = required(&mut issues, "location", &self.location);
        let description = required(&mut issues, "description", &self.description);
        let action_taken = required(&mut issues, "action_taken", &self.action_taken);

        let patient_sex = if self.patient_sex.trim().is_empty() {
            issues.push(FieldIssue::new("patient_sex", "Text cannot be empty"));
            None
        } else {
            let sex = PatientSex::from_form(&self.patient_sex);
            if sex.is_none() {
                issues.push(FieldIssue::new("patient_sex", "Must be Male or Female"));
            }
            sex
        };

        let lga = if self.lga.trim().is_empty() {
            issues.push(FieldIssue::new("lga", "Text cannot be empty"));
            None
        } else {
            let lga = canonical_lga(&self.lga);
            if lga.is_none() {
                issues.push(FieldIssue::new("lga", "Must be a Lagos Local Government Area"));
            }
            lga
        };

        if !issues.is_empty() {
            return Err(ReportError::InvalidForm(issues));
        }

        match (
            patient_name,
            patient_sex,
            location,
            lga,
            description,
            action_taken,
        ) {
            (
                Some(patient_name),
                Some(patient_sex),
                Some(location),
                Some(lga),
                Some(description),
                Some(action_taken),
            ) => Ok(NewIncident {
                patient_name,
                patient_age: coerce_age(&self.patient_age),
                patient_sex,
                location,
                lga: lga.to_string(),
                description,
                action_taken,
                transfer_to_hospital: false,
            }),
            _ => Err(ReportError::InvalidForm(issues)),
        }
    }
}

fn required(issues: &mut Vec<FieldIssue>, field: &str, value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        issues.push(FieldIssue::new(field, "Text cannot be empty"));
        return None;
    }
    Some(trimmed.to_string())
}

/// Canonical spelling of `input` if it names a Lagos LGA.
pub fn canonical_lga(input: &str) -> Option<&'static str> {
    let input = input.trim();
    LAGOS_LGAS
        .iter()
        .copied()
        .find(|lga| lga.eq_ignore_ascii_case(input))
}

/// Integer age, or `None` when the text is empty or not a whole number.
pub fn coerce_age(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok()
}

// ============================================================================
// TYPE-STATE MARKERS
// ============================================================================

/// Marker type: the form is being filled in.
#[derive(Clone, Debug, Default)]
pub struct Editing {
    form: IncidentForm,
}

/// Marker type: the incident exists and the transfer question is open.
#[derive(Clone, Debug)]
pub struct AwaitingTransferDecision {
    incident: Incident,
}

/// Marker type: transfer was chosen and a hospital is being picked.
#[derive(Clone, Debug)]
pub struct AwaitingHospitalChoice {
    incident_id: String,
}

/// Answer to "transfer to hospital?".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferDecision {
    Transfer,
    TreatedOnSite,
}

// ============================================================================
// REPORT FLOW
// ============================================================================

/// The report flow in state `S`.
#[derive(Clone, Debug)]
pub struct ReportFlow<S> {
    state: S,
}

/// A submission that did not create an incident. The flow is handed back still editable,
/// with the form as the user left it.
#[derive(Debug)]
pub struct SubmitRejected {
    pub flow: ReportFlow<Editing>,
    pub error: ReportError,
}

/// Where the flow goes after the transfer question.
#[derive(Debug)]
pub enum TransferOutcome {
    /// No transfer; the report is complete and the form is blank again.
    Completed(ReportFlow<Editing>),
    /// Transfer chosen; a hospital must be picked (or skipped).
    ChooseHospital(ReportFlow<AwaitingHospitalChoice>),
}

impl ReportFlow<Editing> {
    /// A flow with a blank form.
    pub fn new() -> Self {
        Self {
            state: Editing::default(),
        }
    }

    pub fn with_form(form: IncidentForm) -> Self {
        Self {
            state: Editing { form },
        }
    }

    pub fn form(&self) -> &IncidentForm {
        &self.state.form
    }

    pub fn form_mut(&mut self) -> &mut IncidentForm {
        &mut self.state.form
    }

    /// Validates and submits the report.
    ///
    /// **This method consumes `self`**. On success the flow moves to
    /// `AwaitingTransferDecision` holding the created incident; on failure the unchanged
    /// editing flow is returned inside [`SubmitRejected`] together with the error to show.
    /// Invalid forms are rejected without a network call.
    pub async fn submit<B>(
        self,
        backend: &B,
    ) -> Result<ReportFlow<AwaitingTransferDecision>, SubmitRejected>
    where
        B: IncidentsBackend + ?Sized,
    {
        let body = match self.state.form.validate() {
            Ok(body) => body,
            Err(error) => return Err(SubmitRejected { flow: self, error }),
        };

        match backend.create_incident(&body).await {
            Ok(incident) => {
                tracing::info!(incident_id = %incident.id, lga = %incident.lga, "incident report saved");
                Ok(ReportFlow {
                    state: AwaitingTransferDecision { incident },
                })
            }
            Err(e) => {
                tracing::warn!("incident submission failed: {}", e);
                Err(SubmitRejected {
                    flow: self,
                    error: e.into(),
                })
            }
        }
    }
}

impl Default for ReportFlow<Editing> {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFlow<AwaitingTransferDecision> {
    /// The incident created by the submission.
    pub fn incident(&self) -> &Incident {
        &self.state.incident
    }

    /// Records the transfer decision.
    ///
    /// Declining sends nothing: the incident was created with `transfer_to_hospital = false`.
    pub fn decide(self, decision: TransferDecision) -> TransferOutcome {
        match decision {
            TransferDecision::TreatedOnSite => {
                tracing::debug!(incident_id = %self.state.incident.id, "treated on site, no transfer");
                TransferOutcome::Completed(ReportFlow::new())
            }
            TransferDecision::Transfer => TransferOutcome::ChooseHospital(ReportFlow {
                state: AwaitingHospitalChoice {
                    incident_id: self.state.incident.id,
                },
            }),
        }
    }
}

impl ReportFlow<AwaitingHospitalChoice> {
    pub fn incident_id(&self) -> &str {
        &self.state.incident_id
    }

    /// Opens hospital selection for the held incident.
    pub async fn open_selection<B>(&self, backend: &B) -> HospitalSelection
    where
        B: HospitalsBackend + ?Sized,
    {
        HospitalSelection::load(backend, &self.state.incident_id).await
    }

    /// Ends the report after a hospital was picked or the choice was skipped.
    pub fn finish(self) -> ReportFlow<Editing> {
        ReportFlow::new()
    }
}
