//! Constants used throughout the LASAMBUS core crate.
//!
//! Storage keys, paging sizes, configuration defaults and the user-facing notice texts live here
//! so the front ends and the tests agree on them.

/// Durable storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Durable storage key holding the JSON-encoded user.
pub const USER_KEY: &str = "user";

/// Records requested per `GET /incidents` call while aggregating the admin list.
pub const FETCH_PAGE_SIZE: usize = api_shared::MAX_INCIDENTS_PAGE;

/// Incidents shown per page in the admin list.
pub const INCIDENTS_PER_PAGE: usize = 10;

/// Maximum number of page-number controls in the admin pagination bar.
pub const PAGE_WINDOW: usize = 5;

/// Aggregated list size above which retrieval logs a memory warning.
pub const LARGE_INCIDENT_SET: usize = 10_000;

/// Local Government Areas offered by the report form.
pub const LAGOS_LGAS: [&str; 20] = [
    "Agege",
    "Ajeromi-Ifelodun",
    "Alimosho",
    "Amuwo-Odofin",
    "Apapa",
    "Badagry",
    "Epe",
    "Eti-Osa",
    "Ibeju-Lekki",
    "Ifako-Ijaiye",
    "Ikeja",
    "Ikorodu",
    "Kosofe",
    "Lagos Island",
    "Lagos Mainland",
    "Mushin",
    "Ojo",
    "Oshodi-Isolo",
    "Shomolu",
    "Surulere",
];

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";
pub const DEFAULT_STATE_DIR: &str = ".lasambus";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const ENV_BACKEND_URL: &str = "LASAMBUS_BACKEND_URL";
pub const ENV_STATE_DIR: &str = "LASAMBUS_STATE_DIR";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "LASAMBUS_HTTP_TIMEOUT_SECS";

pub const NETWORK_ERROR_NOTICE: &str = "Network error. Please check your connection.";
pub const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please login again.";
pub const INCIDENT_SAVED_NOTICE: &str = "Incident report saved successfully!";
pub const REPORT_COMPLETED_NOTICE: &str = "Report completed. Ready for next incident.";
pub const HOSPITALS_LOAD_FAILED_NOTICE: &str = "Failed to load hospitals";
pub const NO_HOSPITALS_NOTICE: &str = "No hospitals with available beds at the moment.";
pub const INCIDENT_UPDATE_FAILED_NOTICE: &str = "Failed to update incident";
pub const INCIDENTS_FETCH_FAILED_NOTICE: &str = "Failed to fetch incidents";
pub const EXPORT_SUCCESS_NOTICE: &str = "Export successful!";
pub const LOGIN_SUCCESS_NOTICE: &str = "Login successful!";
pub const REGISTER_SUCCESS_NOTICE: &str = "Registration successful! Please login.";
