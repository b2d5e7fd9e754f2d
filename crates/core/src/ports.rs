//! Backend ports.
//!
//! The flows in this crate talk to the backend only through these traits. `api-client`
//! implements them over HTTP; tests implement them in memory to observe exactly which calls a
//! flow issues.

use crate::error::BackendResult;
use api_shared::{Hospital, Incident, IncidentPatch, LoginRes, NewIncident, RegisterReq, User};
use async_trait::async_trait;

/// Authentication endpoints.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// `POST /auth/login`.
    async fn login(&self, email: &str, password: &str) -> BackendResult<LoginRes>;

    /// `POST /auth/register`.
    async fn register(&self, req: &RegisterReq) -> BackendResult<User>;
}

/// Incident endpoints.
#[async_trait]
pub trait IncidentsBackend: Send + Sync {
    /// `POST /incidents`.
    async fn create_incident(&self, incident: &NewIncident) -> BackendResult<Incident>;

    /// `GET /incidents?skip&limit`.
    async fn list_incidents(&self, skip: usize, limit: usize) -> BackendResult<Vec<Incident>>;

    /// `PATCH /incidents/{id}`.
    async fn patch_incident(&self, id: &str, patch: &IncidentPatch) -> BackendResult<Incident>;
}

/// Hospital endpoints.
#[async_trait]
pub trait HospitalsBackend: Send + Sync {
    /// `GET /hospitals`.
    async fn list_hospitals(&self) -> BackendResult<Vec<Hospital>>;

    /// `GET /hospitals/nearby?lat&lon&condition`.
    async fn nearby_hospitals(
        &self,
        lat: f64,
        lon: f64,
        condition: Option<&str>,
    ) -> BackendResult<Vec<Hospital>>;
}

/// Everything a front end needs from the backend.
pub trait Backend: AuthBackend + IncidentsBackend + HospitalsBackend {}

impl<T: AuthBackend + IncidentsBackend + HospitalsBackend> Backend for T {}
