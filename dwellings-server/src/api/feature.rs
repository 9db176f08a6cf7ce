//! "Feature me" submissions
//!
//! Stores both photos and e-mails the story to the notification address.

use axum::Json;
use axum::extract::State;
use shared::FeatureSubmission;
use shared::response::SuccessResponse;
use shared::util::now_millis;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::mail::{Email, escape_html};
use crate::state::AppState;
use crate::store::decode_image_payload;

/// Store one submission photo; failures are logged and yield `None`.
async fn store_photo(state: &AppState, payload: &str, name: &str) -> Option<String> {
    if payload.trim().is_empty() {
        return None;
    }
    let blob = match decode_image_payload(payload) {
        Ok(blob) => blob,
        Err(e) => {
            tracing::warn!(image = name, error = %e, "Invalid submission photo");
            return None;
        }
    };
    let nonce = uuid::Uuid::new_v4().simple().to_string();
    let path = format!(
        "feature-submissions/{}-{}-{}.jpg",
        now_millis(),
        name,
        &nonce[..8]
    );
    if !state.blobs.put(&path, blob, false).await {
        tracing::warn!(path = %path, "Blob path already taken");
        return None;
    }
    Some(state.config.blob_url(&path))
}

fn compose_email(
    config: &Config,
    submission: &FeatureSubmission,
    exterior_url: Option<&str>,
    interior_url: Option<&str>,
) -> Email {
    let details = &submission.details;
    let photo = |label: &str, url: Option<&str>| match url {
        Some(url) => format!(
            "<p><strong>{label}:</strong><br><img src=\"{}\" style=\"max-width: 500px; height: auto;\"></p>",
            escape_html(url)
        ),
        None => String::new(),
    };

    let html = format!(
        "<h2>New Feature Submission from Mobile Dwellings</h2>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Location/Destination:</strong> {}</p>\n\
         <p><strong>Dwelling Type:</strong> {}</p>\n\
         <p><strong>Socials:</strong> {}</p>\n\
         <p><strong>Story:</strong></p>\n\
         <p>{}</p>\n{}{}",
        escape_html(&details.name),
        escape_html(&details.email),
        escape_html(&details.location),
        escape_html(&details.dwelling_type),
        escape_html(details.socials.as_deref().unwrap_or("Not provided")),
        escape_html(&details.story).replace('\n', "<br>"),
        photo("Exterior Photo", exterior_url),
        photo("Interior Photo", interior_url),
    );

    Email {
        from: config.notify_from.clone(),
        to: config.notify_email.clone(),
        reply_to: Some(details.email.clone()),
        subject: format!(
            "New Feature Submission - {} from {}",
            details.dwelling_type, details.name
        ),
        html,
    }
}

/// POST /feature-submission
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(submission): ApiJson<FeatureSubmission>,
) -> AppResult<Json<SuccessResponse>> {
    submission.details.validate()?;

    let exterior_url = store_photo(&state, &submission.exterior_image, "exterior").await;
    let interior_url = store_photo(&state, &submission.interior_image, "interior").await;

    let email = compose_email(
        &state.config,
        &submission,
        exterior_url.as_deref(),
        interior_url.as_deref(),
    );
    state.mailer.send(&email).await.map_err(|e| AppError::Internal {
        message: "Failed to send email".into(),
        details: Some(serde_json::Value::String(e.to_string())),
    })?;

    tracing::info!(
        dwelling_type = %submission.details.dwelling_type,
        photos = exterior_url.iter().chain(interior_url.iter()).count(),
        "Feature submission relayed"
    );
    Ok(Json(SuccessResponse::ok_with_message(
        "Submission received and email sent",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::FeatureDetails;

    #[test]
    fn test_email_escapes_and_links_photos() {
        let config = Config::for_development("pw");
        let submission = FeatureSubmission {
            details: FeatureDetails {
                name: "Sam <script>".into(),
                email: "sam@example.com".into(),
                location: "Moab".into(),
                dwelling_type: "Skoolie".into(),
                story: "Line one\nLine two".into(),
                socials: None,
            },
            exterior_image: String::new(),
            interior_image: String::new(),
        };
        let email = compose_email(&config, &submission, Some("https://x/e.jpg"), None);

        assert_eq!(email.reply_to.as_deref(), Some("sam@example.com"));
        assert_eq!(email.subject, "New Feature Submission - Skoolie from Sam <script>");
        assert!(email.html.contains("Sam &lt;script&gt;"));
        assert!(email.html.contains("Line one<br>Line two"));
        assert!(email.html.contains("Not provided"));
        assert!(email.html.contains("https://x/e.jpg"));
        assert!(!email.html.contains("Interior Photo"));
    }

    #[tokio::test]
    async fn test_photos_in_same_millisecond_do_not_collide() {
        let state = AppState::new(Config::for_development("pw"));
        let payload = "data:image/jpeg;base64,/9j/AAAA";

        let first = store_photo(&state, payload, "exterior").await;
        let second = store_photo(&state, payload, "exterior").await;

        assert!(first.is_some());
        assert!(second.is_some());
        assert_ne!(first, second);
        assert_eq!(state.blobs.len().await, 2);
    }
}
