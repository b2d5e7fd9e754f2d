//! Hospital selection for a transferred patient.
//!
//! Only hospitals reporting free beds are ever offered. Picking one records the transfer on the
//! incident with a single patch and completes straight away: the hospital is not asked to
//! acknowledge, the crew phones them on the number shown.

use crate::constants::{HOSPITALS_LOAD_FAILED_NOTICE, NO_HOSPITALS_NOTICE};
use crate::error::{ReportError, ReportResult};
use crate::ports::{HospitalsBackend, IncidentsBackend};
use api_shared::{Hospital, IncidentPatch};

/// Hospitals on offer for one incident.
#[derive(Clone, Debug)]
pub struct HospitalSelection {
    incident_id: String,
    hospitals: Vec<Hospital>,
    load_failed: bool,
}

impl HospitalSelection {
    /// Fetches all hospitals and keeps those with free beds.
    ///
    /// A failed fetch is logged and yields an empty selection whose [`notice`](Self::notice)
    /// reports the failure.
    pub async fn load<B>(backend: &B, incident_id: &str) -> Self
    where
        B: HospitalsBackend + ?Sized,
    {
        match backend.list_hospitals().await {
            Ok(hospitals) => Self::from_hospitals(incident_id, hospitals),
            Err(e) => {
                tracing::warn!(incident_id, "failed to load hospitals: {}", e);
                Self {
                    incident_id: incident_id.to_string(),
                    hospitals: Vec::new(),
                    load_failed: true,
                }
            }
        }
    }

    pub fn from_hospitals(incident_id: &str, hospitals: Vec<Hospital>) -> Self {
        let total = hospitals.len();
        let hospitals: Vec<_> = hospitals
            .into_iter()
            .filter(Hospital::has_available_beds)
            .collect();
        tracing::debug!(
            incident_id,
            offered = hospitals.len(),
            total,
            "hospitals with free beds"
        );
        Self {
            incident_id: incident_id.to_string(),
            hospitals,
            load_failed: false,
        }
    }

    pub fn incident_id(&self) -> &str {
        &self.incident_id
    }

    /// Offered hospitals; none has zero beds.
    pub fn hospitals(&self) -> &[Hospital] {
        &self.hospitals
    }

    /// True in the no-hospitals state, where the only action is to close.
    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }

    /// Message for the empty state, if there is one.
    pub fn notice(&self) -> Option<&'static str> {
        if self.load_failed {
            Some(HOSPITALS_LOAD_FAILED_NOTICE)
        } else if self.hospitals.is_empty() {
            Some(NO_HOSPITALS_NOTICE)
        } else {
            None
        }
    }

    pub fn find(&self, hospital_id: &str) -> Option<&Hospital> {
        self.hospitals.iter().find(|h| h.id == hospital_id)
    }

    /// Records the transfer to `hospital_id` and calls `on_complete` as soon as the patch
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidInput` without a network call if `hospital_id` is not on
    /// offer, or the backend error if the patch fails. In both cases `on_complete` is not
    /// called and the selection may be retried by the user.
    pub async fn select<B, F>(
        &self,
        backend: &B,
        hospital_id: &str,
        on_complete: F,
    ) -> ReportResult<Hospital>
    where
        B: IncidentsBackend + ?Sized,
        F: FnOnce(&Hospital),
    {
        let hospital = self
            .find(hospital_id)
            .cloned()
            .ok_or_else(|| ReportError::InvalidInput(format!("Unknown hospital: {hospital_id}")))?;

        backend
            .patch_incident(&self.incident_id, &IncidentPatch::transfer_to(&hospital.id))
            .await?;

        tracing::info!(
            incident_id = %self.incident_id,
            hospital_id = %hospital.id,
            "transfer recorded"
        );
        on_complete(&hospital);
        Ok(hospital)
    }
}

/// Confirmation shown after a hospital is picked.
pub fn reservation_notice(hospital: &Hospital) -> String {
    format!(
        "Hospital notified for reservation. Contact them on {}",
        hospital.phone
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{hospital, FakeBackend};
    use std::cell::Cell;

    #[test]
    fn test_hospitals_without_beds_are_never_offered() {
        let selection = HospitalSelection::from_hospitals(
            "inc-1",
            vec![
                hospital("a", 0, "1"),
                hospital("b", 2, "2"),
                hospital("c", -1, "3"),
                hospital("d", 1, "4"),
            ],
        );

        let ids: Vec<_> = selection.hospitals().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["b", "d"]);
        assert!(selection.hospitals().iter().all(|h| h.available_beds > 0));
    }

    #[test]
    fn test_all_full_is_no_hospitals_state() {
        let selection = HospitalSelection::from_hospitals("inc-1", vec![hospital("a", 0, "1")]);

        assert!(selection.is_empty());
        assert_eq!(selection.notice(), Some(NO_HOSPITALS_NOTICE));
    }

    #[tokio::test]
    async fn test_failed_fetch_is_empty_with_notice() {
        let backend = FakeBackend::default().failing_hospitals();

        let selection = HospitalSelection::load(&backend, "inc-1").await;

        assert!(selection.is_empty());
        assert_eq!(selection.notice(), Some(HOSPITALS_LOAD_FAILED_NOTICE));
    }

    #[tokio::test]
    async fn test_unknown_hospital_rejected_without_patch() {
        let backend = FakeBackend::default();
        let selection = HospitalSelection::from_hospitals("inc-1", vec![hospital("a", 1, "1")]);
        let completed = Cell::new(false);

        let err = selection
            .select(&backend, "zzz", |_| completed.set(true))
            .await
            .expect_err("unknown id should be rejected");

        assert!(matches!(err, ReportError::InvalidInput(_)));
        assert!(backend.patches().is_empty());
        assert!(!completed.get());
    }

    #[tokio::test]
    async fn test_failed_patch_does_not_complete() {
        let backend = FakeBackend::default().failing_patch("Incident not found");
        let selection = HospitalSelection::from_hospitals("inc-1", vec![hospital("a", 1, "1")]);
        let completed = Cell::new(false);

        let err = selection
            .select(&backend, "a", |_| completed.set(true))
            .await
            .expect_err("patch failure should surface");

        assert_eq!(err.to_string(), "Incident not found");
        assert!(!completed.get());
        assert_eq!(selection.hospitals().len(), 1, "selection stays open");
    }

    #[test]
    fn test_reservation_notice_shows_phone() {
        assert_eq!(
            reservation_notice(&hospital("a", 3, "0803-555-0101")),
            "Hospital notified for reservation. Contact them on 0803-555-0101"
        );
    }
}
