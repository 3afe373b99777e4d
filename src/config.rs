//! Process configuration from flags, environment, and `.env`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use crate::auth::{AccessTokenSource, InstalledAppAuth, ServiceAccountAuth, StaticToken};
use crate::client::DRIVE_API_BASE;
use crate::error::{DriveError, Result};
use crate::server::DEFAULT_FOLDER_URL_PREFIX;

/// How the server authenticates against Google Drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AuthMode {
    /// Service-account key from GOOGLE_CREDS or GOOGLE_APPLICATION_CREDENTIALS.
    ServiceAccount,
    /// Interactive consent with a token file on disk.
    Installed,
    /// Pre-issued bearer token from GOOGLE_ACCESS_TOKEN.
    Token,
}

/// HTTP service that clones Google Drive template folders.
#[derive(Debug, Clone, Parser)]
#[command(name = "drive_clone")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Authentication flavor.
    #[arg(long, env = "AUTH_MODE", value_enum, default_value_t = AuthMode::ServiceAccount)]
    pub auth_mode: AuthMode,

    /// Service-account key JSON content.
    #[arg(long, env = "GOOGLE_CREDS", hide_env_values = true)]
    pub google_creds: Option<String>,

    /// Path to a service-account key file, used when GOOGLE_CREDS is unset.
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    pub credentials_file: Option<PathBuf>,

    /// Installed-app client secrets file.
    #[arg(long, env = "OAUTH_CLIENT_SECRETS", default_value = "credentials.json")]
    pub client_secrets: PathBuf,

    /// Where the installed-app token is persisted.
    #[arg(long, env = "OAUTH_TOKEN_FILE", default_value = "token.json")]
    pub token_file: PathBuf,

    /// Bearer token for `--auth-mode token`.
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Prefix of the folder URL returned to callers.
    #[arg(long, env = "FOLDER_URL_PREFIX", default_value = DEFAULT_FOLDER_URL_PREFIX)]
    pub folder_url_prefix: String,

    /// Drive API root.
    #[arg(long, env = "DRIVE_API_BASE", default_value = DRIVE_API_BASE)]
    pub drive_api_base: String,
}

impl Config {
    /// Load `.env` if present, then parse flags and environment.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the token source for the configured mode. The installed flow
    /// may block on user consent here, before the server starts listening.
    pub async fn token_source(&self) -> Result<Arc<dyn AccessTokenSource>> {
        match self.auth_mode {
            AuthMode::ServiceAccount => {
                if let Some(json) = &self.google_creds {
                    return Ok(Arc::new(ServiceAccountAuth::from_json(json)?));
                }
                match &self.credentials_file {
                    Some(path) => Ok(Arc::new(ServiceAccountAuth::from_file(path)?)),
                    None => Err(DriveError::MissingEnvVar(
                        "GOOGLE_CREDS or GOOGLE_APPLICATION_CREDENTIALS".to_string(),
                    )),
                }
            }
            AuthMode::Installed => {
                let auth = InstalledAppAuth::from_files(&self.client_secrets, self.token_file.clone())?;
                auth.authorize().await?;
                Ok(Arc::new(auth))
            }
            AuthMode::Token => match &self.access_token {
                Some(token) => Ok(Arc::new(StaticToken::new(token.clone()))),
                None => Err(DriveError::MissingEnvVar("GOOGLE_ACCESS_TOKEN".to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["drive_clone"]).unwrap();
        assert_eq!(config.client_secrets, PathBuf::from("credentials.json"));
        assert_eq!(config.token_file, PathBuf::from("token.json"));
        assert_eq!(config.bind_address(), format!("{}:{}", config.host, config.port));
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "drive_clone",
            "--port",
            "9000",
            "--auth-mode",
            "token",
            "--access-token",
            "abc",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.auth_mode, AuthMode::Token);
        assert_eq!(config.access_token.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_token_mode_requires_token() {
        let mut config = Config::try_parse_from(["drive_clone", "--auth-mode", "token"]).unwrap();
        config.access_token = None;

        let err = config.token_source().await.err().unwrap();
        assert!(matches!(err, DriveError::MissingEnvVar(_)));
    }

    #[tokio::test]
    async fn test_service_account_from_inline_json() {
        let mut config = Config::try_parse_from(["drive_clone"]).unwrap();
        config.auth_mode = AuthMode::ServiceAccount;
        config.google_creds = Some(r#"{"client_email": "a@b.c", "private_key": "k"}"#.to_string());

        assert!(config.token_source().await.is_ok());
    }
}
