//! Installed-app OAuth flow with a token file on disk.
//!
//! The first run logs a consent URL and waits for Google to redirect the
//! browser to a loopback listener. The resulting tokens are written to the
//! token file; later runs reuse them and refresh the access token with the
//! stored refresh token whenever it expires.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::reqwest::async_http_client;
use oauth2::url::Url;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, Notify, RwLock};
use tracing::{debug, info, warn};

use super::{unix_now, AccessTokenSource, DRIVE_SCOPE, EXPIRY_BUFFER_SECS};
use crate::error::{DriveError, Result};
use crate::models::{ClientSecretsFile, InstalledClient};

/// Google omits `expires_in` only in odd cases; access tokens live an hour.
const DEFAULT_EXPIRES_IN: Duration = Duration::from_secs(3600);

/// Tokens persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds).
    pub expires_at: u64,
}

impl StoredToken {
    fn from_response(response: &BasicTokenResponse, previous_refresh: Option<String>) -> Result<Self> {
        let expires_in = response.expires_in().unwrap_or(DEFAULT_EXPIRES_IN);
        Ok(Self {
            access_token: response.access_token().secret().clone(),
            // Refresh responses usually omit the refresh token.
            refresh_token: response
                .refresh_token()
                .map(|t| t.secret().clone())
                .or(previous_refresh),
            expires_at: unix_now()? + expires_in.as_secs(),
        })
    }

    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at <= now + EXPIRY_BUFFER_SECS
    }
}

/// JSON token file on local storage.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored token; `Ok(None)` when no token file exists yet.
    pub fn load(&self) -> Result<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Write the token, creating the parent directory if needed.
    pub fn save(&self, token: &StoredToken) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(token)?)?;
        Ok(())
    }
}

/// Authenticator backed by an installed-app OAuth client.
#[derive(Clone)]
pub struct InstalledAppAuth {
    oauth: BasicClient,
    cache: TokenCache,
    current: Arc<RwLock<Option<StoredToken>>>,
}

impl InstalledAppAuth {
    /// Load the client secrets file downloaded from the Cloud console.
    pub fn from_files<P: AsRef<Path>>(client_secrets: P, token_file: impl Into<PathBuf>) -> Result<Self> {
        let content = fs::read_to_string(client_secrets)?;
        let secrets: ClientSecretsFile = serde_json::from_str(&content)?;
        Self::new(secrets.installed, TokenCache::new(token_file))
    }

    pub fn new(client: InstalledClient, cache: TokenCache) -> Result<Self> {
        let oauth = BasicClient::new(
            ClientId::new(client.client_id),
            Some(ClientSecret::new(client.client_secret)),
            AuthUrl::new(client.auth_uri).map_err(invalid_endpoint)?,
            Some(TokenUrl::new(client.token_uri).map_err(invalid_endpoint)?),
        )
        // Google expects the client credentials in the form body.
        .set_auth_type(AuthType::RequestBody);

        Ok(Self {
            oauth,
            cache,
            current: Arc::new(RwLock::new(None)),
        })
    }

    /// Make sure a usable token exists, running the consent flow if the
    /// token file is missing, unreadable, or holds no refresh token.
    pub async fn authorize(&self) -> Result<()> {
        let stored = match self.cache.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(path = %self.cache.path().display(), "Ignoring unreadable token file: {}", e);
                None
            }
        };

        let token = match stored {
            Some(token) if !token.is_expired(unix_now()?) || token.refresh_token.is_some() => token,
            _ => {
                let token = self.run_consent_flow().await?;
                self.cache.save(&token)?;
                token
            }
        };

        *self.current.write().await = Some(token);
        Ok(())
    }

    /// Consent URL for the given redirect URI, with the CSRF state it carries
    /// and the PKCE verifier the code exchange must present.
    pub fn authorization_request(&self, redirect_uri: &str) -> Result<(Url, CsrfToken, PkceCodeVerifier)> {
        let redirect = RedirectUrl::new(redirect_uri.to_string()).map_err(invalid_endpoint)?;
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (url, csrf_state) = self
            .oauth
            .clone()
            .set_redirect_uri(redirect)
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new(DRIVE_SCOPE.to_string()))
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .set_pkce_challenge(pkce_challenge)
            .url();

        Ok((url, csrf_state, pkce_verifier))
    }

    async fn run_consent_flow(&self) -> Result<StoredToken> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let redirect_uri = format!("http://127.0.0.1:{}/", listener.local_addr()?.port());
        let (url, csrf_state, pkce_verifier) = self.authorization_request(&redirect_uri)?;

        info!("Open this URL in your browser to authorize Drive access: {}", url);

        let code = wait_for_authorization_code(listener, csrf_state.secret()).await?;

        let redirect = RedirectUrl::new(redirect_uri).map_err(invalid_endpoint)?;
        let response = self
            .oauth
            .clone()
            .set_redirect_uri(redirect)
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(async_http_client)
            .await
            .map_err(|e| DriveError::AuthenticationError(format!("Code exchange failed: {}", e)))?;

        info!("OAuth consent completed");
        StoredToken::from_response(&response, None)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<StoredToken> {
        debug!("Refreshing OAuth access token");
        let response = self
            .oauth
            .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| DriveError::TokenRefreshError(e.to_string()))?;

        StoredToken::from_response(&response, Some(refresh_token.to_string()))
    }
}

#[async_trait]
impl AccessTokenSource for InstalledAppAuth {
    async fn access_token(&self) -> Result<String> {
        let now = unix_now()?;
        {
            let current = self.current.read().await;
            if let Some(token) = current.as_ref() {
                if !token.is_expired(now) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut current = self.current.write().await;
        if current.is_none() {
            *current = self.cache.load()?;
        }

        let token = match current.as_ref() {
            Some(token) if !token.is_expired(now) => return Ok(token.access_token.clone()),
            Some(StoredToken {
                refresh_token: Some(refresh_token),
                ..
            }) => self.refresh(refresh_token).await?,
            _ => {
                return Err(DriveError::AuthenticationError(
                    "No usable OAuth token; run the consent flow first".to_string(),
                ))
            }
        };

        self.cache.save(&token)?;
        let access_token = token.access_token.clone();
        *current = Some(token);
        Ok(access_token)
    }
}

fn invalid_endpoint(e: oauth2::url::ParseError) -> DriveError {
    DriveError::AuthenticationError(format!("Invalid OAuth endpoint: {}", e))
}

/// Query parameters Google appends to the redirect URI.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RedirectParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Decide what a request to the redirect listener means. `None` for anything
/// that is not the authorization response for `expected_state` (browser
/// extras, stray or forged requests); those are ignored and the flow keeps
/// waiting.
pub(crate) fn check_redirect(params: &RedirectParams, expected_state: &str) -> Option<Result<String>> {
    if params.state.as_deref() != Some(expected_state) {
        return None;
    }
    if let Some(error) = &params.error {
        return Some(Err(DriveError::AuthenticationError(format!(
            "Consent was not granted: {}",
            error
        ))));
    }
    params.code.clone().map(Ok)
}

struct RedirectListener {
    expected_state: String,
    outcome: Mutex<Option<Result<String>>>,
    done: Notify,
}

async fn redirect_handler(
    State(listener): State<Arc<RedirectListener>>,
    Query(params): Query<RedirectParams>,
) -> (StatusCode, &'static str) {
    match check_redirect(&params, &listener.expected_state) {
        Some(outcome) => {
            let mut slot = listener.outcome.lock().await;
            if slot.is_none() {
                *slot = Some(outcome);
                listener.done.notify_one();
            }
            (
                StatusCode::OK,
                "The authentication flow has completed. You may close this window.",
            )
        }
        None => {
            warn!("Ignoring request without a matching OAuth state");
            (StatusCode::BAD_REQUEST, "Not an authorization response for this session.")
        }
    }
}

/// Serve the loopback redirect until a request carries `expected_state`
/// together with a code or an error, then return the code.
pub(crate) async fn wait_for_authorization_code(listener: TcpListener, expected_state: &str) -> Result<String> {
    let shared = Arc::new(RedirectListener {
        expected_state: expected_state.to_string(),
        outcome: Mutex::new(None),
        done: Notify::new(),
    });

    let app = Router::new()
        .route("/", get(redirect_handler))
        .with_state(shared.clone());

    let signal = shared.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { signal.done.notified().await })
        .await
        .map_err(|e| DriveError::AuthenticationError(format!("Redirect listener failed: {}", e)))?;

    let outcome = shared.outcome.lock().await.take();
    outcome.unwrap_or_else(|| {
        Err(DriveError::AuthenticationError(
            "Redirect listener stopped before consent completed".to_string(),
        ))
    })
}
