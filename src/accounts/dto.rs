use serde::{Deserialize, Serialize};

/// Body of `POST /register` and `POST /login`.
///
/// Both fields are optional on the wire so a missing one can be answered with
/// an envelope instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Returns `(email, password)` when both are present and non-empty.
    pub fn into_parts(self) -> Option<(String, String)> {
        let email = self.email.filter(|e| !e.is_empty())?;
        let password = self.password.filter(|p| !p.is_empty())?;
        Some((email, password))
    }
}

/// Payload of a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: i64,
}
