//! Login, self-service registration and logout.

use crate::error::{FieldIssue, ReportError, ReportResult};
use crate::ports::AuthBackend;
use crate::session::SessionStore;
use api_shared::{RegisterReq, User};
use lasambus_types::{EmailAddress, NonEmptyText, Password};

/// Logs in and starts a session.
///
/// # Errors
///
/// Returns `ReportError::InvalidForm` for blank credentials (no request is sent), the backend's
/// error (for example `401 Invalid credentials`), or a storage error if the session cannot be
/// persisted.
pub async fn login<B>(
    backend: &B,
    session: &SessionStore,
    email: &str,
    password: &str,
) -> ReportResult<User>
where
    B: AuthBackend + ?Sized,
{
    let mut issues = Vec::new();
    let email = match NonEmptyText::new(email) {
        Ok(email) => Some(email),
        Err(e) => {
            issues.push(FieldIssue::new("email", e.to_string()));
            None
        }
    };
    if password.is_empty() {
        issues.push(FieldIssue::new("password", "Text cannot be empty"));
    }
    let Some(email) = email.filter(|_| issues.is_empty()) else {
        return Err(ReportError::InvalidForm(issues));
    };

    let res = backend.login(email.as_str(), password).await?;
    session.login(res.token, res.user.clone())?;
    Ok(res.user)
}

/// Registers a personnel account. Admin accounts cannot be created from here.
///
/// The password policy is checked before any network call.
///
/// # Errors
///
/// Returns `ReportError::InvalidForm` listing every local validation failure, or the backend's
/// error (for example `Email already registered`).
pub async fn register<B>(
    backend: &B,
    email: &str,
    full_name: &str,
    password: &str,
) -> ReportResult<User>
where
    B: AuthBackend + ?Sized,
{
    let mut issues = Vec::new();

    let email = EmailAddress::parse(email)
        .map_err(|e| issues.push(FieldIssue::new("email", e.to_string())))
        .ok();
    let full_name = NonEmptyText::new(full_name)
        .map_err(|e| issues.push(FieldIssue::new("full_name", e.to_string())))
        .ok();
    let password = Password::new(password)
        .map_err(|e| issues.push(FieldIssue::new("password", e.to_string())))
        .ok();

    let (Some(email), Some(full_name), Some(password)) = (email, full_name, password) else {
        return Err(ReportError::InvalidForm(issues));
    };

    let req = RegisterReq::personnel(
        email.as_str().to_string(),
        password.expose().to_string(),
        full_name.into_inner(),
    );
    tracing::debug!(?req, "registering personnel account");
    Ok(backend.register(&req).await?)
}

/// Ends the session.
///
/// # Errors
///
/// Returns a storage error if durable storage cannot be cleared; the in-memory session is
/// cleared regardless.
pub fn logout(session: &SessionStore) -> ReportResult<()> {
    session.logout()
}
