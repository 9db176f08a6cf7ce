//! Client configuration

use std::path::PathBuf;

/// Client configuration for connecting to the store backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Shared anonymous bearer key sent with every request
    pub anon_key: Option<String>,

    /// Request timeout in seconds (none by default)
    pub timeout: Option<u64>,

    /// Directory holding the persisted admin session
    pub storage_dir: PathBuf,

    /// YouTube Data API key for the video feed
    pub youtube_api_key: Option<String>,

    /// Channel whose uploads the video feed lists
    pub youtube_channel_id: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            anon_key: None,
            timeout: None,
            storage_dir: PathBuf::from(".dwellings"),
            youtube_api_key: None,
            youtube_channel_id: None,
        }
    }

    /// Load from `DWELLINGS_API_URL`, `DWELLINGS_ANON_KEY`,
    /// `DWELLINGS_STORAGE_DIR`, `DWELLINGS_YOUTUBE_API_KEY` and
    /// `DWELLINGS_YOUTUBE_CHANNEL_ID`, reading `.env` first.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        let mut config = Self::new(
            std::env::var("DWELLINGS_API_URL").unwrap_or_else(|_| "http://localhost:8080".into()),
        );
        if let Ok(key) = std::env::var("DWELLINGS_ANON_KEY") {
            config = config.with_anon_key(key);
        }
        if let Some(dir) = std::env::var("DWELLINGS_STORAGE_DIR")
            .ok()
            .filter(|s| !s.is_empty())
        {
            config = config.with_storage_dir(dir);
        }
        let env = |name: &str| std::env::var(name).ok().filter(|s| !s.is_empty());
        if let (Some(key), Some(channel)) = (
            env("DWELLINGS_YOUTUBE_API_KEY"),
            env("DWELLINGS_YOUTUBE_CHANNEL_ID"),
        ) {
            config = config.with_youtube(key, channel);
        }
        config
    }

    /// Set the anonymous bearer key
    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Set where the admin session is persisted
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// Enable the video feed
    pub fn with_youtube(mut self, api_key: impl Into<String>, channel_id: impl Into<String>) -> Self {
        self.youtube_api_key = Some(api_key.into());
        self.youtube_channel_id = Some(channel_id.into());
        self
    }

    /// Path of the session file inside `storage_dir`
    pub fn session_path(&self) -> PathBuf {
        self.storage_dir.join("session.json")
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> crate::ClientResult<crate::NetworkHttpClient> {
        crate::NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
