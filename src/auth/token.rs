//! Signed access tokens.
//!
//! Tokens are HS256 JWTs keyed by the API secret, with the API key as issuer
//! and the participant identity as subject. The room permissions live under
//! the `video` claim (see [`VideoGrant`]).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_derive::{Deserialize, Serialize};

use crate::auth::grants::VideoGrant;
use crate::config::Credentials;
use crate::errors::{Error, Result};

pub const DEFAULT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub iss: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sub: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jti: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub nbf: u64,
    pub exp: u64,
    pub video: VideoGrant,
}

/// Builder for a participant access token.
pub struct AccessToken {
    api_key: String,
    api_secret: String,
    identity: String,
    name: String,
    ttl: Duration,
    grant: VideoGrant,
}

impl AccessToken {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            identity: String::new(),
            name: String::new(),
            ttl: DEFAULT_TTL,
            grant: VideoGrant::default(),
        }
    }

    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::new(&credentials.api_key, &credentials.api_secret)
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = identity.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_grant(mut self, grant: VideoGrant) -> Self {
        self.grant = grant;
        self
    }

    /// Claims as they would be signed at `now`.
    pub fn claims_at(&self, now: SystemTime) -> Result<Claims> {
        let issued = now
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::Internal(format!("clock before unix epoch: {}", e)))?;

        Ok(Claims {
            iss: self.api_key.clone(),
            sub: self.identity.clone(),
            jti: self.identity.clone(),
            name: self.name.clone(),
            nbf: 0,
            exp: (issued + self.ttl).as_secs(),
            video: self.grant.clone(),
        })
    }

    /// Sign the token.
    pub fn to_jwt(&self) -> Result<String> {
        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(Error::Internal("api key and secret must be set".to_string()));
        }

        let claims = self.claims_at(SystemTime::now())?;
        let key = EncodingKey::from_secret(self.api_secret.as_bytes());
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)?;
        Ok(token)
    }

    /// Check the signature and expiry of `token` and return its claims.
    pub fn verify(token: &str, api_secret: &str) -> Result<Claims> {
        let key = DecodingKey::from_secret(api_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &key, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "APIkey123";
    const SECRET: &str = "a-very-secret-signing-secret-of-decent-length";

    fn now_secs() -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs()
    }

    fn sample() -> AccessToken {
        AccessToken::new(KEY, SECRET)
            .with_identity("user_identity_42")
            .with_name("User-7")
            .with_ttl(Duration::from_secs(900))
            .with_grant(VideoGrant::join_and_talk("test-room-22"))
    }

    #[test]
    fn signed_token_verifies_and_carries_claims() -> Result<()> {
        let jwt = sample().to_jwt()?;
        let claims = AccessToken::verify(&jwt, SECRET)?;

        assert_eq!(claims.iss, KEY);
        assert_eq!(claims.sub, "user_identity_42");
        assert_eq!(claims.jti, "user_identity_42");
        assert_eq!(claims.name, "User-7");
        assert_eq!(claims.nbf, 0);
        assert!(claims.video.allows_join("test-room-22"));
        assert_eq!(claims.video.can_publish, Some(true));
        assert_eq!(claims.video.can_subscribe, Some(true));

        let remaining = claims.exp.saturating_sub(now_secs());
        assert!((890..=900).contains(&remaining), "remaining ttl was {}", remaining);
        Ok(())
    }

    #[test]
    fn wrong_secret_is_rejected() -> Result<()> {
        let jwt = sample().to_jwt()?;
        assert!(matches!(
            AccessToken::verify(&jwt, "some-other-secret"),
            Err(Error::JSONWebToken(_))
        ));
        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> Result<()> {
        let token = sample();
        let long_ago = SystemTime::now() - Duration::from_secs(3600);
        let claims = token.claims_at(long_ago)?;
        let jwt = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )?;
        assert!(AccessToken::verify(&jwt, SECRET).is_err());
        Ok(())
    }

    #[test]
    fn missing_secret_cannot_sign() {
        let result = AccessToken::new(KEY, "").to_jwt();
        assert!(matches!(result, Err(Error::Internal(_))));
    }

    #[test]
    fn anonymous_claims_omit_identity_fields() -> Result<()> {
        let claims = AccessToken::new(KEY, SECRET).claims_at(SystemTime::now())?;
        let value = serde_json::to_value(&claims)?;
        assert!(value.get("sub").is_none());
        assert!(value.get("name").is_none());
        assert_eq!(value["iss"], KEY);
        Ok(())
    }
}
