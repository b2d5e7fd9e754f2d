//! Reqwest-backed implementation of the backend ports.

use std::sync::Arc;

use api_shared::{
    auth::bearer, paths, Hospital, Incident, IncidentPatch, LoginReq, LoginRes, NewIncident,
    RegisterReq, User,
};
use async_trait::async_trait;
use lasambus_core::constants::SESSION_EXPIRED_NOTICE;
use lasambus_core::{
    AuthBackend, BackendError, BackendResult, ClientConfig, HospitalsBackend, IncidentsBackend,
    Navigator, Route, SessionStore,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::errors::{map_status_error, map_transport_error};

/// HTTP client for the LASAMBUS backend.
///
/// Every request carries `Authorization: Bearer <token>` while the session holds a token. A
/// `401` from any endpoint clears the session and, unless the navigator already shows the login
/// view, redirects there once with a "session expired" notice. Nothing is retried.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Builds a client for the API under `config.api_base_url()`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        config: &ClientConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.http_timeout()).build()?;
        Ok(Self {
            http,
            base_url: config.api_base_url(),
            session,
            navigator,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> BackendResult<T> {
        let request = match self.session.token() {
            Some(token) => request.header(AUTHORIZATION, bearer(&token)),
            None => request,
        };

        tracing::debug!(endpoint, "backend request");
        let response = request.send().await.map_err(|e| {
            tracing::warn!(endpoint, "backend unreachable: {}", e);
            map_transport_error(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;

        if !status.is_success() {
            let error = map_status_error(status, body.as_ref());
            tracing::warn!(endpoint, status = status.as_u16(), "backend request failed: {}", error);
            if matches!(error, BackendError::Unauthorized { .. }) {
                self.expire_session();
            }
            return Err(error);
        }

        serde_json::from_slice(body.as_ref()).map_err(|e| {
            tracing::warn!(endpoint, "undecodable backend response: {}", e);
            BackendError::Decode(e.to_string())
        })
    }

    fn expire_session(&self) {
        if let Err(e) = self.session.logout() {
            tracing::warn!("failed to clear stored session: {}", e);
        }
        if self.navigator.current_path() != Route::ROOT_PATH {
            tracing::info!("session expired, returning to login");
            self.navigator
                .redirect(Route::ROOT_PATH, SESSION_EXPIRED_NOTICE);
        }
    }
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, email: &str, password: &str) -> BackendResult<LoginRes> {
        let body = LoginReq {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(
            self.http.post(self.url(paths::AUTH_LOGIN)).json(&body),
            "POST /auth/login",
        )
        .await
    }

    async fn register(&self, req: &RegisterReq) -> BackendResult<User> {
        self.execute(
            self.http.post(self.url(paths::AUTH_REGISTER)).json(req),
            "POST /auth/register",
        )
        .await
    }
}

#[async_trait]
impl IncidentsBackend for ApiClient {
    async fn create_incident(&self, incident: &NewIncident) -> BackendResult<Incident> {
        self.execute(
            self.http.post(self.url(paths::INCIDENTS)).json(incident),
            "POST /incidents",
        )
        .await
    }

    async fn list_incidents(&self, skip: usize, limit: usize) -> BackendResult<Vec<Incident>> {
        self.execute(
            self.http
                .get(self.url(paths::INCIDENTS))
                .query(&[("skip", skip), ("limit", limit)]),
            "GET /incidents",
        )
        .await
    }

    async fn patch_incident(&self, id: &str, patch: &IncidentPatch) -> BackendResult<Incident> {
        self.execute(
            self.http.patch(self.url(&paths::incident(id))).json(patch),
            "PATCH /incidents/{id}",
        )
        .await
    }
}

#[async_trait]
impl HospitalsBackend for ApiClient {
    async fn list_hospitals(&self) -> BackendResult<Vec<Hospital>> {
        self.execute(self.http.get(self.url(paths::HOSPITALS)), "GET /hospitals")
            .await
    }

    async fn nearby_hospitals(
        &self,
        lat: f64,
        lon: f64,
        condition: Option<&str>,
    ) -> BackendResult<Vec<Hospital>> {
        let mut request = self
            .http
            .get(self.url(paths::HOSPITALS_NEARBY))
            .query(&[("lat", lat), ("lon", lon)]);
        if let Some(condition) = condition {
            request = request.query(&[("condition", condition)]);
        }
        self.execute(request, "GET /hospitals/nearby").await
    }
}
