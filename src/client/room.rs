//! Room client: fetch a token once, then join the room with it.

use async_trait::async_trait;
use log::{error, info};

use crate::errors::{Error, Result};
use crate::livekit::{ErrorResponse, TOKEN_PATH, TokenResponse};

pub const LOADING_PLACEHOLDER: &str = "Loading...";
pub const ROOM_HEADING: &str = "Voice Agent Test";

/// Media the local participant enables when joining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomOptions {
    pub audio: bool,
    pub video: bool,
}

impl RoomOptions {
    pub fn audio_only() -> Self {
        Self {
            audio: true,
            video: false,
        }
    }
}

/// Connects to the hosted real-time platform.
///
/// The session type is whatever the platform's client hands back; this crate
/// never looks inside it.
#[async_trait]
pub trait RoomConnector: Send + Sync {
    type Session: Send;

    async fn connect(
        &self,
        server_url: &str,
        token: &str,
        options: RoomOptions,
    ) -> Result<Self::Session>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomState {
    Loading,
    Connected { room_name: String },
    /// The fetch or the connection failed. Nothing retries from here.
    Stalled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Widget {
    /// Plays the remote participants' audio.
    AudioRenderer,
    ControlBar { microphone: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomView {
    Loading(&'static str),
    Room {
        heading: &'static str,
        connected_to: String,
        widgets: Vec<Widget>,
    },
}

pub struct RoomClient {
    base_url: String,
    http: reqwest::Client,
    state: RoomState,
}

impl RoomClient {
    /// Create a client for the token issuer served at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            state: RoomState::Loading,
        }
    }

    pub fn state(&self) -> &RoomState {
        &self.state
    }

    /// Request connection details from the token issuer.
    pub async fn fetch_details(&self) -> Result<TokenResponse> {
        let endpoint = format!("{}{}", self.base_url.trim_end_matches('/'), TOKEN_PATH);
        let response = self.http.post(&endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            return Err(Error::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<TokenResponse>().await?)
    }

    /// Fetch a token and join the room with it.
    ///
    /// Failures are logged and leave the client [`RoomState::Stalled`]; the
    /// caller only sees `None`.
    pub async fn join<C: RoomConnector>(&mut self, connector: &C) -> Option<C::Session> {
        self.state = RoomState::Loading;

        let details = match self.fetch_details().await {
            Ok(details) => details,
            Err(e) => {
                error!("Failed to connect: {}", e);
                self.state = RoomState::Stalled;
                return None;
            }
        };

        match connector
            .connect(
                &details.server_url,
                &details.participant_token,
                RoomOptions::audio_only(),
            )
            .await
        {
            Ok(session) => {
                info!(
                    "joined {} as {}",
                    details.room_name, details.participant_name
                );
                self.state = RoomState::Connected {
                    room_name: details.room_name,
                };
                Some(session)
            }
            Err(e) => {
                error!("Failed to connect: {}", e);
                self.state = RoomState::Stalled;
                None
            }
        }
    }

    /// What the page shows for the current state.
    pub fn view(&self) -> RoomView {
        match &self.state {
            RoomState::Loading | RoomState::Stalled => RoomView::Loading(LOADING_PLACEHOLDER),
            RoomState::Connected { room_name } => RoomView::Room {
                heading: ROOM_HEADING,
                connected_to: room_name.clone(),
                widgets: vec![Widget::AudioRenderer, Widget::ControlBar { microphone: true }],
            },
        }
    }
}
