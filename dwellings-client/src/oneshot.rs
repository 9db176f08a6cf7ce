//! Oneshot HTTP client - in-process transport
//!
//! Calls an `axum::Router` directly through `tower::ServiceExt::oneshot`,
//! so a backend running in the same process is reached without a socket.

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use crate::http::{ADMIN_TOKEN_HEADER, Credentials, HttpClient, decode_response};
use crate::{ClientError, ClientResult};

/// Oneshot HTTP client (in-memory calls)
///
/// # Example
///
/// ```ignore
/// let router = dwellings_server::router(state);
/// let client = OneshotHttpClient::new(router).with_anon_key("anon");
/// let rigs: RigsResponse = client.get("/rigs").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
    credentials: Credentials,
}

impl OneshotHttpClient {
    /// `router` must already have its state attached
    pub fn new(router: Router) -> Self {
        Self {
            router,
            credentials: Credentials::default(),
        }
    }

    /// Set the anonymous bearer key
    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.credentials = Credentials::new(Some(key.into()));
        self
    }

    fn build_request(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> ClientResult<Request<Body>> {
        let uri = format!("/{}", path.trim_start_matches('/'));
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(auth) = self.credentials.bearer() {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        if let Some(token) = self.credentials.admin_token() {
            builder = builder.header(ADMIN_TOKEN_HEADER, token);
        }

        let body = match body {
            Some(bytes) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(bytes)
            }
            None => Body::empty(),
        };

        builder
            .body(body)
            .map_err(|e| ClientError::Transport(format!("Failed to build request: {}", e)))
    }

    async fn execute<T: DeserializeOwned>(&self, request: Request<Body>) -> ClientResult<T> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Transport(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read body: {}", e)))?;

        decode_response(status, &body)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ClientResult<T> {
        let request = self.build_request(method, path, body)?;
        self.execute(request).await
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let bytes = serde_json::to_vec(body)?;
        self.send(Method::POST, path, Some(bytes)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let bytes = serde_json::to_vec(body)?;
        self.send(Method::PUT, path, Some(bytes)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::POST, path, None).await
    }

    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::PUT, path, None).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(Method::DELETE, path, None).await
    }

    fn set_admin_token(&self, token: Option<String>) {
        self.credentials.set_admin_token(token);
    }

    fn admin_token(&self) -> Option<String> {
        self.credentials.admin_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    #[tokio::test]
    async fn test_oneshot_round_trip() {
        let router: Router = Router::new().route("/ping", get(|| async { "{\"ok\":true}" }));
        let client = OneshotHttpClient::new(router);
        let value: serde_json::Value = client.get("ping").await.unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_oneshot_not_found() {
        let client = OneshotHttpClient::new(Router::new());
        let err = client.get::<serde_json::Value>("/missing").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }
}
