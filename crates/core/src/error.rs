use crate::constants::NETWORK_ERROR_NOTICE;

/// One validation failure, keyed by the dotted path of the offending field.
///
/// Server-side validation (`422`) reports paths such as `body.patient_age`; client-side form
/// validation uses the bare field name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Failures reported by a backend port.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request was rejected with `422` and a structured list of field issues.
    #[error("validation failed: {}", join_issues(.0))]
    Validation(Vec<FieldIssue>),
    /// The backend answered `401`. The session has already been torn down when this is seen.
    #[error("{message}")]
    Unauthorized { message: String },
    /// No response was received (connection refused, DNS, timeout).
    #[error("{}", NETWORK_ERROR_NOTICE)]
    Connectivity(String),
    /// Any other non-success status, with the server's message.
    #[error("{message}")]
    Application { status: u16, message: String },
    /// A success response whose body could not be decoded.
    #[error("unexpected response from backend: {0}")]
    Decode(String),
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("form is incomplete: {}", join_issues(.0))]
    InvalidForm(Vec<FieldIssue>),
    #[error("{0}")]
    Backend(#[from] BackendError),
    #[error("failed to read session storage: {0}")]
    StorageRead(std::io::Error),
    #[error("failed to write session storage: {0}")]
    StorageWrite(std::io::Error),
    #[error("failed to serialize session user: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to write export file: {0}")]
    ExportWrite(std::io::Error),
}

impl ReportError {
    /// Field issues to display next to their fields, if this error carries any.
    pub fn field_issues(&self) -> &[FieldIssue] {
        match self {
            ReportError::InvalidForm(issues)
            | ReportError::Backend(BackendError::Validation(issues)) => issues,
            _ => &[],
        }
    }
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;
