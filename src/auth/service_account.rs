//! Service account authentication for Google APIs.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use super::{unix_now, AccessTokenSource, DRIVE_SCOPE, EXPIRY_BUFFER_SECS};
use crate::error::{DriveError, Result};
use crate::models::{ServiceAccountCredentials, TokenResponse};

/// Google OAuth2 token endpoint.
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,   // Issuer (service account email)
    scope: String, // OAuth scope
    aud: String,   // Audience (token endpoint)
    exp: u64,      // Expiration time
    iat: u64,      // Issued at
}

/// Cached access token with expiration (unix seconds).
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: u64,
}

/// Authenticator for Google APIs using service account credentials.
#[derive(Clone)]
pub struct ServiceAccountAuth {
    credentials: Arc<ServiceAccountCredentials>,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl ServiceAccountAuth {
    /// Create a new authenticator from a service account JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Create a new authenticator from the JSON content of a key, as stored
    /// in `GOOGLE_CREDS`.
    pub fn from_json(content: &str) -> Result<Self> {
        let credentials: ServiceAccountCredentials = serde_json::from_str(content)?;
        Ok(Self::new(credentials))
    }

    /// Create a new authenticator from credentials.
    pub fn new(credentials: ServiceAccountCredentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.credentials.client_email
    }

    fn token_uri(&self) -> &str {
        self.credentials.token_uri.as_deref().unwrap_or(TOKEN_URI)
    }

    /// Refresh the access token using JWT assertion.
    async fn refresh_token(&self) -> Result<CachedToken> {
        let now = unix_now()?;

        let claims = Claims {
            iss: self.credentials.client_email.clone(),
            scope: DRIVE_SCOPE.to_string(),
            aud: self.token_uri().to_string(),
            iat: now,
            exp: now + 3600, // 1 hour
        };

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())?;
        let jwt = encode(&header, &claims, &key)?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", &jwt),
        ];

        let response = self
            .client
            .post(self.token_uri())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;
        debug!(
            client_email = %self.credentials.client_email,
            expires_in = token_response.expires_in,
            "Obtained service account token"
        );

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at: unix_now()? + token_response.expires_in,
        })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountAuth {
    /// Get a valid access token, refreshing if necessary.
    async fn access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > unix_now()? + EXPIRY_BUFFER_SECS {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let new_token = self.refresh_token().await?;

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }
}
