//! Application state

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

use crate::config::Config;
use crate::mail::{LogMailer, Mailer, ResendMailer};
use crate::store::{BlobStore, KvStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Rig and deal records
    pub kv: Arc<KvStore>,
    /// Uploaded images
    pub blobs: Arc<BlobStore>,
    /// Tokens issued by `POST /verify-admin`
    pub admin_tokens: Arc<AdminTokens>,
    pub mailer: Arc<dyn Mailer>,
    /// Serializes read-modify-write of rig records
    pub rig_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Picks [`ResendMailer`] when an API key is configured.
    pub fn new(config: Config) -> Self {
        let mailer: Arc<dyn Mailer> = match &config.resend_api_key {
            Some(key) => Arc::new(ResendMailer::new(key.clone())),
            None => {
                tracing::warn!("RESEND_API_KEY not set, feature submissions will only be logged");
                Arc::new(LogMailer)
            }
        };
        Self::with_mailer(config, mailer)
    }

    pub fn with_mailer(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            admin_tokens: Arc::new(AdminTokens::new(config.admin_token_ttl)),
            config: Arc::new(config),
            kv: Arc::new(KvStore::new()),
            blobs: Arc::new(BlobStore::new()),
            mailer,
            rig_lock: Arc::new(Mutex::new(())),
        }
    }
}

/// Admin tokens handed out after a password check
///
/// A token is valid until it is revoked or its TTL runs out. Expired tokens
/// are pruned whenever a new one is issued.
#[derive(Debug)]
pub struct AdminTokens {
    ttl: Duration,
    tokens: RwLock<HashMap<String, Instant>>,
}

impl AdminTokens {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    pub async fn issue(&self) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let mut tokens = self.tokens.write().await;
        let ttl = self.ttl;
        tokens.retain(|_, issued| issued.elapsed() < ttl);
        tokens.insert(token.clone(), Instant::now());
        token
    }

    pub async fn is_valid(&self, token: &str) -> bool {
        self.tokens
            .read()
            .await
            .get(token)
            .is_some_and(|issued| issued.elapsed() < self.ttl)
    }

    /// Forget `token`. Returns whether it was known.
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }

    /// Tokens currently held, expired ones included
    pub async fn count(&self) -> usize {
        self.tokens.read().await.len()
    }
}
