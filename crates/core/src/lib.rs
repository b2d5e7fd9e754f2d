//! # LASAMBUS Core
//!
//! Client-side logic for the LASAMBUS incident reporting system.
//!
//! This crate holds everything a front end needs apart from the transport:
//! - The session store and its durable storage
//! - Route resolution and the navigation port
//! - The incident report flow and hospital selection
//! - Admin list aggregation, filtering, pagination and CSV export
//!
//! **No HTTP concerns**: the backend is reached through the traits in [`ports`]; `api-client`
//! implements them over REST.

pub mod auth;
pub mod config;
pub mod constants;
pub mod csv_export;
pub mod error;
pub mod hospital_selection;
pub mod incident_listing;
pub mod ports;
pub mod report_flow;
pub mod routing;
pub mod session;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use error::{BackendError, BackendResult, FieldIssue, ReportError, ReportResult};
pub use ports::{AuthBackend, Backend, HospitalsBackend, IncidentsBackend};
pub use routing::{resolve_route, Navigator, Route, ViewNavigator};
pub use session::{FileStorage, MemoryStorage, Session, SessionStorage, SessionStore};
