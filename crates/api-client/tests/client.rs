use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_client::ApiClient;
use api_shared::{IncidentPatch, Role, User};
use lasambus_core::constants::SESSION_EXPIRED_NOTICE;
use lasambus_core::incident_listing::fetch_all_incidents;
use lasambus_core::{
    AuthBackend, BackendError, ClientConfig, HospitalsBackend, IncidentsBackend, MemoryStorage,
    Navigator, ReportError, SessionStore,
};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Navigator that records redirects and moves to the target path.
struct RecordingNavigator {
    path: Mutex<String>,
    redirects: Mutex<Vec<(String, String)>>,
}

impl RecordingNavigator {
    fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            path: Mutex::new(path.to_string()),
            redirects: Mutex::new(Vec::new()),
        })
    }

    fn redirects(&self) -> Vec<(String, String)> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.lock().unwrap().clone()
    }

    fn redirect(&self, path: &str, notice: &str) {
        *self.path.lock().unwrap() = path.to_string();
        self.redirects
            .lock()
            .unwrap()
            .push((path.to_string(), notice.to_string()));
    }
}

fn admin() -> User {
    User {
        id: "u-1".into(),
        email: "admin@lasambus.ng".into(),
        full_name: "Admin".into(),
        role: Role::Admin,
    }
}

fn config_for(uri: &str) -> ClientConfig {
    ClientConfig::new(
        uri.parse().unwrap(),
        "state".into(),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn logged_in_session() -> SessionStore {
    let session = SessionStore::load(MemoryStorage::new());
    session.login("tok-123".into(), admin()).unwrap();
    session
}

fn client(server: &MockServer, session: SessionStore, nav: Arc<RecordingNavigator>) -> ApiClient {
    ApiClient::new(&config_for(&server.uri()), session, nav).unwrap()
}

fn incident_json(id: &str) -> Value {
    json!({
        "id": id,
        "created_at": "2024-03-01T09:30:00",
        "personnel_id": "u-9",
        "personnel_name": "Ada Obi",
        "patient_name": "Patient",
        "patient_age": null,
        "patient_sex": "Male",
        "location": "Ojota",
        "lga": "Kosofe",
        "description": "Fall",
        "action_taken": "Observed",
        "transfer_to_hospital": false,
        "hospital_id": null
    })
}

fn incident_page(start: usize, len: usize) -> Value {
    Value::Array(
        (start..start + len)
            .map(|i| incident_json(&format!("inc-{i}")))
            .collect(),
    )
}

#[tokio::test]
async fn bearer_token_is_sent_when_logged_in() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/hospitals"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, logged_in_session(), RecordingNavigator::at("/admin"));

    let hospitals = api.list_hospitals().await.expect("request should succeed");
    assert!(hospitals.is_empty());
}

#[tokio::test]
async fn login_is_sent_without_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-new",
            "user": {"id": "u-1", "email": "medic@lasambus.ng", "full_name": "Ada", "role": "personnel"}
        })))
        .mount(&server)
        .await;

    let session = SessionStore::load(MemoryStorage::new());
    let api = client(&server, session, RecordingNavigator::at("/"));

    let res = api.login("medic@lasambus.ng", "pw").await.unwrap();
    assert_eq!(res.token, "tok-new");
    assert_eq!(res.user.role, Role::Personnel);

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0]
        .headers
        .iter()
        .all(|(name, _)| name.as_str() != "authorization"));
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"email": "medic@lasambus.ng", "password": "pw"}));
}

#[tokio::test]
async fn register_sends_personnel_role() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-5", "email": "new@lasambus.ng", "full_name": "New Medic", "role": "personnel"
        })))
        .mount(&server)
        .await;

    let session = SessionStore::load(MemoryStorage::new());
    let api = client(&server, session, RecordingNavigator::at("/"));

    let user = lasambus_core::auth::register(&api, "new@lasambus.ng", "New Medic", "Amb#ulance9")
        .await
        .unwrap();
    assert_eq!(user.id, "u-5");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["role"], "personnel");
}

#[tokio::test]
async fn incidents_are_aggregated_across_pages() {
    let server = MockServer::start().await;
    for (skip, len) in [(0, 100), (100, 100), (200, 37)] {
        Mock::given(method("GET"))
            .and(path("/api/incidents"))
            .and(query_param("skip", skip.to_string()))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(incident_page(skip, len)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let api = client(&server, logged_in_session(), RecordingNavigator::at("/admin"));

    let all = fetch_all_incidents(&api).await.expect("aggregation should succeed");

    assert_eq!(all.len(), 237);
    assert_eq!(all[0].id, "inc-0");
    assert_eq!(all[236].id, "inc-236");
}

#[tokio::test]
async fn unauthorized_clears_session_and_redirects_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/incidents"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})))
        .expect(2)
        .mount(&server)
        .await;

    let session = logged_in_session();
    let nav = RecordingNavigator::at("/admin");
    let api = client(&server, session.clone(), nav.clone());

    let first = api.list_incidents(0, 100).await.expect_err("401 expected");
    let second = api.list_incidents(0, 100).await.expect_err("401 expected");

    assert!(matches!(first, BackendError::Unauthorized { .. }));
    assert!(matches!(second, BackendError::Unauthorized { .. }));
    assert!(!session.is_logged_in());
    assert_eq!(
        nav.redirects(),
        vec![("/".to_string(), SESSION_EXPIRED_NOTICE.to_string())]
    );
}

#[tokio::test]
async fn failed_login_at_root_does_not_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let nav = RecordingNavigator::at("/");
    let api = client(&server, SessionStore::load(MemoryStorage::new()), nav.clone());

    let err = api.login("medic@lasambus.ng", "nope").await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(nav.redirects().is_empty());
}

#[tokio::test]
async fn validation_errors_are_keyed_by_field_path() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/incidents/inc-1"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "hospital_id"], "msg": "field required", "type": "value_error.missing"}]
        })))
        .mount(&server)
        .await;

    let api = client(&server, logged_in_session(), RecordingNavigator::at("/dashboard"));

    let err = api
        .patch_incident("inc-1", &IncidentPatch::transfer_to("h-1"))
        .await
        .unwrap_err();

    let BackendError::Validation(issues) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(issues[0].path, "body.hospital_id");
    assert_eq!(issues[0].message, "field required");
}

#[tokio::test]
async fn patch_body_carries_transfer_and_hospital() {
    let server = MockServer::start().await;
    let mut updated = incident_json("inc-1");
    updated["transfer_to_hospital"] = json!(true);
    updated["hospital_id"] = json!("h-1");
    Mock::given(method("PATCH"))
        .and(path("/api/incidents/inc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .mount(&server)
        .await;

    let api = client(&server, logged_in_session(), RecordingNavigator::at("/dashboard"));

    let incident = api
        .patch_incident("inc-1", &IncidentPatch::transfer_to("h-1"))
        .await
        .unwrap();
    assert!(incident.transfer_to_hospital);

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"transfer_to_hospital": true, "hospital_id": "h-1"}));
}

#[tokio::test]
async fn nearby_lookup_sends_coordinates_and_condition() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/hospitals/nearby"))
        .and(query_param("lat", "6.5"))
        .and(query_param("lon", "3.35"))
        .and(query_param("condition", "Trauma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "h-1", "name": "LUTH", "address": "Idi-Araba", "lga": "Surulere",
            "phone": "0803", "available_beds": 4, "expertise": ["Trauma"],
            "latitude": 6.51, "longitude": 3.36, "distance": 1.8
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, logged_in_session(), RecordingNavigator::at("/dashboard"));

    let hospitals = api.nearby_hospitals(6.5, 3.35, Some("Trauma")).await.unwrap();
    assert_eq!(hospitals[0].distance, Some(1.8));
}

#[tokio::test]
async fn server_message_is_passed_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/incidents"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Not enough permissions"})))
        .mount(&server)
        .await;

    let api = client(&server, logged_in_session(), RecordingNavigator::at("/dashboard"));
    let form = lasambus_core::report_flow::IncidentForm {
        patient_name: "P".into(),
        patient_sex: "Male".into(),
        location: "L".into(),
        lga: "Ikeja".into(),
        description: "D".into(),
        action_taken: "A".into(),
        ..Default::default()
    };

    let rejected = lasambus_core::report_flow::ReportFlow::with_form(form)
        .submit(&api)
        .await
        .expect_err("submit should fail");

    assert_eq!(rejected.error.to_string(), "Not enough permissions");
    assert!(matches!(
        rejected.error,
        ReportError::Backend(BackendError::Application { status: 403, .. })
    ));
}

#[tokio::test]
async fn undecodable_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/hospitals"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let api = client(&server, logged_in_session(), RecordingNavigator::at("/dashboard"));

    let err = api.list_hospitals().await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn unreachable_backend_is_a_connectivity_error() {
    // A port that was just released has nothing listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let session = logged_in_session();
    let api = ApiClient::new(&config_for(&uri), session.clone(), RecordingNavigator::at("/admin"))
        .unwrap();

    let err = api.list_hospitals().await.unwrap_err();

    assert!(matches!(err, BackendError::Connectivity(_)));
    assert_eq!(err.to_string(), "Network error. Please check your connection.");
    assert!(session.is_logged_in(), "connectivity errors keep the session");
}
