use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `username` is the principal identifier (the email), not the display name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_in: u64,
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub username: String,
}
