//! # API Shared
//!
//! Wire models and REST paths for the LASAMBUS backend.
//!
//! Contains:
//! - Authentication bodies and the `User` resource (`auth` module)
//! - The `Incident` resource and its create/patch bodies (`incidents` module)
//! - The `Hospital` resource (`hospitals` module)
//! - Endpoint paths relative to the API base (`paths` module)
//!
//! Used by `lasambus-core` (ports and flows) and `api-client` (HTTP transport). The structs
//! mirror the JSON the backend produces and accept unknown fields, so additive backend changes
//! do not break the client.

pub mod auth;
pub mod hospitals;
pub mod incidents;

pub use auth::{LoginReq, LoginRes, RegisterReq, Role, User};
pub use hospitals::Hospital;
pub use incidents::{Incident, IncidentPatch, NewIncident, PatientSex};

/// Endpoint paths, relative to `<backend>/api`.
pub mod paths {
    pub const API_PREFIX: &str = "/api";
    pub const AUTH_LOGIN: &str = "/auth/login";
    pub const AUTH_REGISTER: &str = "/auth/register";
    pub const INCIDENTS: &str = "/incidents";
    pub const HOSPITALS: &str = "/hospitals";
    pub const HOSPITALS_NEARBY: &str = "/hospitals/nearby";

    /// Path of a single incident, used for `PATCH`.
    pub fn incident(id: &str) -> String {
        format!("{INCIDENTS}/{id}")
    }
}

/// Largest page the backend returns from `GET /incidents`.
pub const MAX_INCIDENTS_PAGE: usize = 100;
