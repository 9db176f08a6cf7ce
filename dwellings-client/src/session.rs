//! Admin Session
//!
//! Gate for mutation-capable views. Logged in only after the backend accepts
//! the admin password; the flag (and the admin token that came with it) is
//! persisted so a restart restores the session without asking again.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::http::HttpClient;
use crate::storage::LocalStorage;
use crate::store::StoreClient;
use crate::{ClientConfig, NetworkHttpClient};

/// Storage key of the session flag
pub const SESSION_KEY: &str = "mobile_dwellings_admin";

/// Value of [`SESSION_KEY`] for an active session
pub const SESSION_SENTINEL: &str = "true";

/// Storage key of the admin token
pub const TOKEN_KEY: &str = "mobile_dwellings_admin_token";

/// Admin login state
///
/// `login` and `logout` are the only mutators.
#[derive(Debug)]
pub struct AdminSession<C = NetworkHttpClient> {
    store: StoreClient<C>,
    storage: LocalStorage,
    is_admin: AtomicBool,
}

impl<C: HttpClient> AdminSession<C> {
    /// Restore the persisted session, if any.
    ///
    /// A stored sentinel is trusted as is; the password is not checked again.
    pub fn restore(store: StoreClient<C>, storage: LocalStorage) -> Self {
        let is_admin = storage.get_item(SESSION_KEY).as_deref() == Some(SESSION_SENTINEL);
        if is_admin {
            if let Some(token) = storage.get_item(TOKEN_KEY) {
                store.http().set_admin_token(Some(token));
            }
            tracing::debug!("Restored admin session");
        }
        Self {
            store,
            storage,
            is_admin: AtomicBool::new(is_admin),
        }
    }

    /// Restore using the session file under `config.storage_dir`.
    pub fn from_config(store: StoreClient<C>, config: &ClientConfig) -> Self {
        Self::restore(store, LocalStorage::new(config.session_path()))
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin.load(Ordering::SeqCst)
    }

    /// Store client carrying this session's credentials
    pub fn store(&self) -> &StoreClient<C> {
        &self.store
    }

    /// Check `password` with the backend.
    ///
    /// A wrong password and an unreachable backend both return `false`.
    pub async fn login(&self, password: &str) -> bool {
        match self.store.verify_admin_password(password).await {
            Ok(true) => {
                self.is_admin.store(true, Ordering::SeqCst);
                self.persist();
                tracing::info!("Admin logged in");
                true
            }
            Ok(false) => {
                tracing::info!("Admin password rejected");
                false
            }
            Err(e) => {
                tracing::warn!(endpoint = "/verify-admin", error = %e, "Admin login failed");
                false
            }
        }
    }

    /// Revoke the admin token and forget the session.
    ///
    /// Local state is cleared even when the backend cannot be reached.
    pub async fn logout(&self) {
        self.is_admin.store(false, Ordering::SeqCst);
        if let Err(e) = self.store.revoke_admin_token().await {
            tracing::warn!(endpoint = "/logout", error = %e, "Failed to revoke admin token");
        }
        for key in [SESSION_KEY, TOKEN_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                tracing::warn!(key, error = %e, "Failed to clear admin session");
            }
        }
        tracing::info!("Admin logged out");
    }

    fn persist(&self) {
        if let Err(e) = self.storage.set_item(SESSION_KEY, SESSION_SENTINEL) {
            tracing::warn!(error = %e, "Failed to persist admin session");
            return;
        }
        if let Some(token) = self.store.http().admin_token() {
            if let Err(e) = self.storage.set_item(TOKEN_KEY, &token) {
                tracing::warn!(error = %e, "Failed to persist admin token");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oneshot::OneshotHttpClient;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn router() -> Router {
        Router::new()
            .route(
                "/verify-admin",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "hunter2" {
                        Json(json!({ "success": true, "token": "admin-token" }))
                    } else {
                        Json(json!({ "success": false }))
                    }
                }),
            )
            .route(
                "/logout",
                post(|headers: HeaderMap| async move {
                    let revoked = headers
                        .get("x-admin-token")
                        .is_some_and(|v| v == "admin-token");
                    Json(json!({ "success": revoked }))
                }),
            )
    }

    fn open_session(dir: &TempDir, router: Router) -> AdminSession<OneshotHttpClient> {
        AdminSession::restore(
            StoreClient::new(OneshotHttpClient::new(router)),
            LocalStorage::new(dir.path().join("session.json")),
        )
    }

    #[tokio::test]
    async fn test_wrong_password_stays_logged_out() {
        let dir = TempDir::new().unwrap();
        let session = open_session(&dir, router());
        assert!(!session.login("wrong-password").await);
        assert!(!session.is_admin());
        assert_eq!(session.storage.get_item(SESSION_KEY), None);
    }

    #[tokio::test]
    async fn test_login_survives_reload() {
        let dir = TempDir::new().unwrap();
        let first = open_session(&dir, router());
        assert!(first.login("hunter2").await);
        assert!(first.is_admin());

        let reloaded = open_session(&dir, router());
        assert!(reloaded.is_admin());
        assert_eq!(reloaded.store().http().admin_token().as_deref(), Some("admin-token"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_not_logged_in() {
        let dir = TempDir::new().unwrap();
        let session = open_session(&dir, Router::new());
        assert!(!session.login("hunter2").await);
        assert!(!session.is_admin());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let dir = TempDir::new().unwrap();
        let session = open_session(&dir, router());
        assert!(session.login("hunter2").await);
        session.logout().await;
        assert!(!session.is_admin());
        assert_eq!(session.store().http().admin_token(), None);

        let reloaded = open_session(&dir, router());
        assert!(!reloaded.is_admin());
    }

    #[tokio::test]
    async fn test_logout_without_backend_still_clears() {
        let dir = TempDir::new().unwrap();
        let session = open_session(&dir, router());
        assert!(session.login("hunter2").await);

        let offline = AdminSession::restore(
            StoreClient::new(OneshotHttpClient::new(Router::new())),
            LocalStorage::new(dir.path().join("session.json")),
        );
        assert!(offline.is_admin());
        offline.logout().await;
        assert!(!offline.is_admin());
        assert_eq!(offline.store().http().admin_token(), None);
        assert!(!open_session(&dir, router()).is_admin());
    }

    #[test]
    fn test_foreign_flag_value_is_ignored() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("session.json"));
        storage.set_item(SESSION_KEY, "yes").unwrap();
        let session = AdminSession::restore(
            StoreClient::new(OneshotHttpClient::new(Router::new())),
            storage,
        );
        assert!(!session.is_admin());
    }
}
