//! Server configuration

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Admin tokens expire a day after login
pub const DEFAULT_ADMIN_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Store backend configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port
    pub http_port: u16,
    /// Base URL blobs are served under (`{public_base_url}/blobs/...`)
    pub public_base_url: String,
    /// Shared anonymous bearer key; unset disables the check
    pub anon_key: Option<String>,
    /// Admin password checked by `POST /verify-admin`
    pub admin_password: Option<String>,
    /// Lifetime of an issued admin token
    pub admin_token_ttl: Duration,
    /// Environment: development | staging | production
    pub environment: String,
    /// Resend API key; unset logs e-mails instead of sending them
    pub resend_api_key: Option<String>,
    /// Recipient of feature submissions
    pub notify_email: String,
    /// Sender of feature submissions
    pub notify_from: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<Option<String>, BoxError> {
        match std::env::var(name).ok().filter(|v| !v.is_empty()) {
            Some(v) => Ok(Some(v)),
            None if environment != "development" => {
                Err(format!("{name} must be set in {environment} environment").into())
            }
            None => Ok(None),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let http_port = std::env::var("HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Ok(Self {
            http_port,
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{http_port}")),
            anon_key: std::env::var("ANON_KEY").ok().filter(|s| !s.is_empty()),
            admin_password: Self::require_secret("ADMIN_PASSWORD", &environment)?,
            admin_token_ttl: std::env::var("ADMIN_TOKEN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_ADMIN_TOKEN_TTL),
            resend_api_key: std::env::var("RESEND_API_KEY").ok().filter(|s| !s.is_empty()),
            notify_email: std::env::var("NOTIFY_EMAIL")
                .unwrap_or_else(|_| "submissions@mobiledwellings.media".into()),
            notify_from: std::env::var("NOTIFY_FROM")
                .unwrap_or_else(|_| "Mobile Dwellings <onboarding@resend.dev>".into()),
            environment,
        })
    }

    /// Development defaults with the given admin password
    pub fn for_development(admin_password: impl Into<String>) -> Self {
        Self {
            http_port: 8080,
            public_base_url: "http://localhost:8080".into(),
            anon_key: None,
            admin_password: Some(admin_password.into()),
            admin_token_ttl: DEFAULT_ADMIN_TOKEN_TTL,
            environment: "development".into(),
            resend_api_key: None,
            notify_email: "submissions@mobiledwellings.media".into(),
            notify_from: "Mobile Dwellings <onboarding@resend.dev>".into(),
        }
    }

    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    /// URL of a stored blob
    pub fn blob_url(&self, path: &str) -> String {
        format!("{}/blobs/{}", self.public_base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_url() {
        let mut config = Config::for_development("pw");
        config.public_base_url = "https://api.example.com/".into();
        assert_eq!(
            config.blob_url("rigs/r1/image-0.jpg"),
            "https://api.example.com/blobs/rigs/r1/image-0.jpg"
        );
    }

    #[test]
    fn test_missing_secret_outside_development() {
        let missing = "DWELLINGS_TEST_UNSET_SECRET";
        assert!(Config::require_secret(missing, "production").is_err());
        assert!(matches!(Config::require_secret(missing, "development"), Ok(None)));
    }
}
