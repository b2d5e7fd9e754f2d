use serde::{Deserialize, Serialize};

/// Account role. Closed set: the client refuses any other value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Personnel,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Personnel => "personnel",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated account as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

/// Body of `POST /auth/login`.
#[derive(Clone, Serialize)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginReq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReq")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Response of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginRes {
    pub token: String,
    pub user: User,
}

/// Body of `POST /auth/register`.
#[derive(Clone, Serialize)]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

impl RegisterReq {
    /// Self-service registration always creates a personnel account.
    pub fn personnel(email: String, password: String, full_name: String) -> Self {
        Self {
            email,
            password,
            full_name,
            role: Role::Personnel,
        }
    }
}

impl std::fmt::Debug for RegisterReq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterReq")
            .field("email", &self.email)
            .field("password", &"***")
            .field("full_name", &self.full_name)
            .field("role", &self.role)
            .finish()
    }
}

/// Value of the `Authorization` header for a bearer token.
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
