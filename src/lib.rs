//! Token issuer and room client for a hosted real-time voice room.
//!
//! The server half mints short-lived access tokens for one fixed room; the
//! client half fetches such a token and hands it to the platform's connector.

pub mod agent;
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod livekit;
pub mod server;

pub use config::Config;
pub use errors::{Error, Result};
pub use livekit::TokenResponse;
