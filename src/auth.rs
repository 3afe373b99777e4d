//! Access token sources for Google APIs.
//!
//! [`DriveClient`](crate::client::DriveClient) asks an [`AccessTokenSource`]
//! for a bearer token before every request. Which flavor backs it is decided
//! once at startup:
//!
//! - [`ServiceAccountAuth`]: JWT assertion signed with a service-account key.
//! - [`InstalledAppAuth`]: interactive consent with a token file on disk.
//! - [`StaticToken`]: a token obtained elsewhere.

mod installed;
mod service_account;

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::error::{DriveError, Result};

pub use installed::{InstalledAppAuth, StoredToken, TokenCache};
pub use service_account::ServiceAccountAuth;

/// Google Drive API scope.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

/// Refresh tokens this long before they actually expire.
pub(crate) const EXPIRY_BUFFER_SECS: u64 = 60;

/// Anything able to hand out a currently valid bearer token.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// A pre-issued bearer token, returned as is.
#[derive(Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

pub(crate) fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| DriveError::AuthenticationError(format!("System clock error: {}", e)))
}
