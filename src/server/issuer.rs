use log::{debug, error, warn};
use rand::Rng;
use thiserror::Error;

use crate::auth::{AccessToken, VideoGrant};
use crate::config::Config;
use crate::livekit::TokenResponse;

pub const MISCONFIGURED: &str = "Server misconfigured";
pub const SIGNING_FAILED: &str = "Failed to generate token";

#[derive(Debug, Error)]
pub enum IssueError {
    /// API key or secret is not configured.
    #[error("Server misconfigured")]
    Misconfigured,

    #[error("Failed to generate token: {0}")]
    Signing(#[from] crate::errors::Error),
}

impl IssueError {
    /// The message returned to callers; details stay in the server log.
    pub fn public_message(&self) -> &'static str {
        match self {
            IssueError::Misconfigured => MISCONFIGURED,
            IssueError::Signing(_) => SIGNING_FAILED,
        }
    }
}

/// A freshly drawn participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub identity: String,
    pub name: String,
}

/// Draw a random display name and identity, each from `0..1000`.
///
/// Nothing checks these against participants already in the room.
pub fn random_participant() -> Participant {
    let mut rng = rand::thread_rng();
    let name = format!("User-{}", rng.gen_range(0..1000));
    let identity = format!("user_identity_{}", rng.gen_range(0..1000));
    Participant { identity, name }
}

/// Mints one access token per call for the configured room.
pub struct TokenIssuer {
    config: Config,
}

impl TokenIssuer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn issue(&self) -> Result<TokenResponse, IssueError> {
        self.issue_for(random_participant())
    }

    pub fn issue_for(&self, participant: Participant) -> Result<TokenResponse, IssueError> {
        let Some(credentials) = self.config.credentials.as_ref() else {
            warn!("refusing to issue token: {} / secret not configured", crate::config::API_KEY_VAR);
            return Err(IssueError::Misconfigured);
        };

        let token = AccessToken::from_credentials(credentials)
            .with_identity(&participant.identity)
            .with_name(&participant.name)
            .with_ttl(self.config.token_ttl)
            .with_grant(VideoGrant::join_and_talk(&self.config.room_name))
            .to_jwt()
            .map_err(|e| {
                error!("token signing failed: {}", e);
                IssueError::Signing(e)
            })?;

        debug!(
            "issued token for {} ({}) in room {}",
            participant.identity, participant.name, self.config.room_name
        );

        Ok(TokenResponse {
            server_url: self.config.server_url.clone(),
            room_name: self.config.room_name.clone(),
            participant_token: token,
            participant_name: participant.name,
        })
    }
}
