//! In-process backend shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use dwellings_client::{OneshotHttpClient, StoreClient};
use dwellings_server::mail::{Email, MailError, Mailer};
use dwellings_server::{AppState, Config};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

pub const ANON_KEY: &str = "test-anon-key";
pub const PASSWORD: &str = "hunter2";

/// Captures outgoing mail instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Email>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct Backend {
    pub router: Router,
    pub client: OneshotHttpClient,
    pub mailer: Arc<RecordingMailer>,
}

impl Backend {
    pub fn start() -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        let config = Config::for_development(PASSWORD).with_anon_key(ANON_KEY);
        let router = dwellings_server::router(AppState::with_mailer(config, mailer.clone()));
        Self {
            client: OneshotHttpClient::new(router.clone()).with_anon_key(ANON_KEY),
            router,
            mailer,
        }
    }

    /// Same backend, new client with no admin token in memory
    pub fn fresh_store(&self) -> StoreClient<OneshotHttpClient> {
        StoreClient::new(OneshotHttpClient::new(self.router.clone()).with_anon_key(ANON_KEY))
    }

    /// Clones share the admin token, so every store sees a login.
    pub fn store(&self) -> StoreClient<OneshotHttpClient> {
        StoreClient::new(self.client.clone())
    }
}

/// Encoded PNG of a solid colour
pub fn png(width: u32, height: u32, colour: [u8; 3]) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(colour)));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
