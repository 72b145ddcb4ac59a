use serde_derive::{Deserialize, Serialize};

/// Route the room page posts to for connection details.
pub const TOKEN_PATH: &str = "/api/token";

/// Connection details handed to the room page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub server_url: String,
    pub room_name: String,
    pub participant_token: String,
    pub participant_name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
