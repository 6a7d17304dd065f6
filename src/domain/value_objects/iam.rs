use serde::{Deserialize, Serialize};

/// Identity resolved from a session token. This is exactly what gets cached
/// at `token_{token}` and injected into request extensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponseModel {
    pub token: String,
    pub name: String,
}
