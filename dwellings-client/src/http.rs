//! HTTP transport
//!
//! [`HttpClient`] is the seam between the typed store API and the wire.
//! [`NetworkHttpClient`] talks to a real backend over reqwest; the
//! in-process variant lives in [`crate::oneshot`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::response::ErrorBody;
use std::sync::{Arc, RwLock};

use crate::{ClientConfig, ClientError, ClientResult};

/// Header carrying the admin token issued by `POST /verify-admin`
pub const ADMIN_TOKEN_HEADER: &str = "X-Admin-Token";

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;

    /// Attach (or drop) the admin token on subsequent requests
    fn set_admin_token(&self, token: Option<String>);
    fn admin_token(&self) -> Option<String>;
}

/// Credentials sent with every request
///
/// The admin token slot is shared between clones so that a login seen by
/// one holder applies to all of them.
#[derive(Debug, Clone, Default)]
pub(crate) struct Credentials {
    anon_key: Option<String>,
    admin_token: Arc<RwLock<Option<String>>>,
}

impl Credentials {
    pub(crate) fn new(anon_key: Option<String>) -> Self {
        Self {
            anon_key,
            admin_token: Arc::default(),
        }
    }

    pub(crate) fn bearer(&self) -> Option<String> {
        self.anon_key.as_ref().map(|k| format!("Bearer {}", k))
    }

    pub(crate) fn admin_token(&self) -> Option<String> {
        self.admin_token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub(crate) fn set_admin_token(&self, token: Option<String>) {
        *self.admin_token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }
}

/// Turn a status code and raw body into a typed result.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> ClientResult<T> {
    if !status.is_success() {
        let text = String::from_utf8_lossy(body).to_string();
        // Structured `{ error, details }` body first
        if let Ok(err) = serde_json::from_slice::<ErrorBody>(body) {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: err.error,
                details: err.details,
            });
        }
        return match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
            _ => Err(ClientError::Internal(format!("{}: {}", status, text))),
        };
    }

    serde_json::from_slice(body)
        .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))
}

/// Network HTTP client
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout {
            builder = builder.timeout(std::time::Duration::from_secs(seconds));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: Credentials::new(config.anon_key.clone()),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(auth) = self.credentials.bearer() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }
        if let Some(token) = self.credentials.admin_token() {
            req = req.header(ADMIN_TOKEN_HEADER, token);
        }
        req
    }

    async fn execute<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = self.authorize(req).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        decode_response(status, &body)
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(self.client.get(self.url(path))).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.execute(self.client.post(self.url(path)).json(body))
            .await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.execute(self.client.put(self.url(path)).json(body))
            .await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(self.client.post(self.url(path))).await
    }

    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(self.client.put(self.url(path))).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(self.client.delete(self.url(path))).await
    }

    fn set_admin_token(&self, token: Option<String>) {
        self.credentials.set_admin_token(token);
    }

    fn admin_token(&self) -> Option<String> {
        self.credentials.admin_token()
    }
}
