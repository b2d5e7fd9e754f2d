//! View routing.
//!
//! Which view a front end shows is a pure function of the session: no token means the login
//! view, otherwise the user's role picks the dashboard. Forced navigation (after a `401`) goes
//! through the [`Navigator`] port so the API client does not need to know how a front end
//! renders views.

use crate::session::Session;
use api_shared::Role;
use std::sync::{Mutex, PoisonError};

/// The views a front end can render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    PersonnelDashboard,
    AdminDashboard,
}

impl Route {
    /// The root path, where the login view lives.
    pub const ROOT_PATH: &'static str = "/";

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => Self::ROOT_PATH,
            Route::PersonnelDashboard => "/dashboard",
            Route::AdminDashboard => "/admin",
        }
    }
}

/// Resolves the view to render for `session`.
pub fn resolve_route(session: Option<&Session>) -> Route {
    match session {
        None => Route::Login,
        Some(s) if s.role() == Role::Admin => Route::AdminDashboard,
        Some(_) => Route::PersonnelDashboard,
    }
}

/// Front-end navigation, as seen by code that must force a view change.
pub trait Navigator: Send + Sync {
    /// Path of the view currently shown.
    fn current_path(&self) -> String;

    /// Switches to `path`, showing `notice` to the user.
    fn redirect(&self, path: &str, notice: &str);
}

/// In-process navigator for front ends that poll for forced view changes.
///
/// `redirect` records the target path and the notice; the front end picks the notice up with
/// [`take_notice`](Self::take_notice) and re-resolves its view.
#[derive(Debug)]
pub struct ViewNavigator {
    state: Mutex<NavState>,
}

#[derive(Debug)]
struct NavState {
    path: String,
    notice: Option<String>,
}

impl ViewNavigator {
    pub fn new(route: Route) -> Self {
        Self {
            state: Mutex::new(NavState {
                path: route.path().to_string(),
                notice: None,
            }),
        }
    }

    /// Records that the front end now shows `route`.
    pub fn show(&self, route: Route) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .path = route.path().to_string();
    }

    /// The pending redirect notice, if any. Clears it.
    pub fn take_notice(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .notice
            .take()
    }
}

impl Navigator for ViewNavigator {
    fn current_path(&self) -> String {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .path
            .clone()
    }

    fn redirect(&self, path: &str, notice: &str) {
        tracing::debug!(path, "forced navigation");
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.path = path.to_string();
        state.notice = Some(notice.to_string());
    }
}
