//! Feature submissions end to end

mod common;

use common::{Backend, png};
use dwellings_client::{ClientError, FeatureDetails, FeatureRelay, ImageSource};

fn details() -> FeatureDetails {
    FeatureDetails {
        name: "Riley".into(),
        email: "riley@example.com".into(),
        location: "Big Sur".into(),
        dwelling_type: "Van".into(),
        story: "Two years\non the road".into(),
        socials: Some("@riley.rolls".into()),
    }
}

#[tokio::test]
async fn test_submission_reaches_mailbox() {
    let backend = Backend::start();
    let relay = FeatureRelay::new(backend.store());

    let accepted = relay
        .submit(
            details(),
            ImageSource::Bytes(png(3000, 1500, [120, 80, 40])),
            ImageSource::Bytes(png(200, 300, [40, 80, 120])),
        )
        .await
        .unwrap();
    assert!(accepted);

    let sent = backend.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let email = &sent[0];
    assert_eq!(email.subject, "New Feature Submission - Van from Riley");
    assert_eq!(email.reply_to.as_deref(), Some("riley@example.com"));
    assert!(email.html.contains("Two years<br>on the road"));
    assert!(email.html.contains("@riley.rolls"));
    assert!(email.html.contains("Exterior Photo"));
    assert!(email.html.contains("Interior Photo"));
}

#[tokio::test]
async fn test_invalid_form_sends_nothing() {
    let backend = Backend::start();
    let relay = FeatureRelay::new(backend.store());

    let err = relay
        .submit(
            FeatureDetails {
                story: "  ".into(),
                ..details()
            },
            ImageSource::Bytes(png(10, 10, [0, 0, 0])),
            ImageSource::Bytes(png(10, 10, [0, 0, 0])),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)), "{err:?}");
    assert!(backend.mailer.sent.lock().unwrap().is_empty());
}
