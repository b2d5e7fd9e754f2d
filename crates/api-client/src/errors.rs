//! Mapping of failed exchanges onto `BackendError`.

use lasambus_core::{BackendError, FieldIssue};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Error body shape used by the backend: `{"detail": "..."}` or, for `422`,
/// `{"detail": [{"loc": [...], "msg": "..."}]}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ValidationIssue {
    #[serde(default)]
    loc: Vec<Value>,
    msg: String,
}

pub(crate) fn map_transport_error(error: reqwest::Error) -> BackendError {
    BackendError::Connectivity(error.to_string())
}

/// Maps a non-success response. `401` is mapped here too; tearing the session down is the
/// caller's job.
pub(crate) fn map_status_error(status: StatusCode, body: &[u8]) -> BackendError {
    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail);

    if status == StatusCode::UNPROCESSABLE_ENTITY {
        if let Some(issues) = detail.as_ref().and_then(validation_issues) {
            return BackendError::Validation(issues);
        }
    }

    let message = match detail {
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
        None => {
            let raw = String::from_utf8_lossy(body).trim().to_string();
            if raw.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                raw
            }
        }
    };

    if status == StatusCode::UNAUTHORIZED {
        return BackendError::Unauthorized { message };
    }
    BackendError::Application {
        status: status.as_u16(),
        message,
    }
}

fn validation_issues(detail: &Value) -> Option<Vec<FieldIssue>> {
    let issues: Vec<ValidationIssue> = serde_json::from_value(detail.clone()).ok()?;
    Some(
        issues
            .into_iter()
            .map(|issue| FieldIssue::new(join_loc(&issue.loc), issue.msg))
            .collect(),
    )
}

fn join_loc(loc: &[Value]) -> String {
    loc.iter()
        .map(|part| match part {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}
