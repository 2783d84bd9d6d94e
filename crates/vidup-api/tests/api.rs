//! API integration tests.
//!
//! Routes are exercised end to end through `oneshot` against an app
//! wired with a stub transcoder and a fresh store, so no FFmpeg or
//! network is needed.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use vidup_api::services::billing::sign_payload;
use vidup_api::{create_router, ApiConfig, AppState};
use vidup_media::{MediaError, MediaResult, Transcoder};
use vidup_models::{EncodeProfile, REFERRAL_BONUS_MINOR_UNITS};
use vidup_store::AccountStore;

struct StubTranscoder {
    fail: bool,
}

#[async_trait]
impl Transcoder for StubTranscoder {
    async fn transcode(
        &self,
        _input: &Path,
        output: &Path,
        _profile: &EncodeProfile,
    ) -> MediaResult<()> {
        if self.fail {
            return Err(MediaError::ffmpeg_failed("boom", None, Some(1)));
        }
        tokio::fs::write(output, b"enhanced-bytes").await?;
        Ok(())
    }
}

struct TestApp {
    router: axum::Router,
    secret: String,
    store: Arc<AccountStore>,
    // Held so the work dir outlives the test.
    _work_dir: tempfile::TempDir,
}

fn test_app(fail_transcodes: bool) -> TestApp {
    let work_dir = tempfile::tempdir().unwrap();
    let config = ApiConfig {
        work_dir: work_dir.path().to_path_buf(),
        admin_emails: vec!["admin@example.com".to_string()],
        ..ApiConfig::default()
    };
    let secret = config.payment_webhook_secret.clone();
    let store = Arc::new(AccountStore::new());
    let state = AppState::with_parts(
        config,
        Arc::clone(&store),
        Arc::new(StubTranscoder {
            fail: fail_transcodes,
        }),
    );
    TestApp {
        router: create_router(state, None),
        secret,
        store,
        _work_dir: work_dir,
    }
}

async fn post_json(router: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(router: &axum::Router, email: &str, referred_by: Option<&str>) -> Value {
    let mut payload = json!({ "email": email, "password": "hunter2-extra" });
    if let Some(code) = referred_by {
        payload["referred_by"] = json!(code);
    }
    let (status, body) = post_json(router, "/auth/register", payload).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body
}

async fn login(router: &axum::Router, email: &str) -> String {
    let (status, body) = post_json(
        router,
        "/auth/login",
        json!({ "email": email, "password": "hunter2-extra" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn multipart_upload(token: &str) -> Request<Body> {
    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"video\"; filename=\"in.mp4\"\r\n\
         Content-Type: video/mp4\r\n\r\n\
         fake video bytes\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn get_with_token(router: &axum::Router, uri: &str, token: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn signed_confirm(secret: &str, email: &str) -> Request<Body> {
    let payload = json!({ "email": email }).to_string();
    let signature = sign_payload(secret, payload.as_bytes());
    Request::builder()
        .method("POST")
        .uri("/payments/confirm")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-payment-signature", signature)
        .body(Body::from(payload))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = test_app(false);
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_upload_requires_auth() {
    let app = test_app(false);
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_conflict() {
    let app = test_app(false);
    register(&app.router, "a@example.com", None).await;
    let (status, body) = post_json(
        &app.router,
        "/auth/register",
        json!({ "email": "a@example.com", "password": "hunter2-extra" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[tokio::test]
async fn test_upload_then_quota_exhausted() {
    let app = test_app(false);
    register(&app.router, "a@example.com", None).await;
    let token = login(&app.router, "a@example.com").await;

    // First job is admitted and returns the artifact.
    let response = app
        .router
        .clone()
        .oneshot(multipart_upload(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"enhanced-bytes");

    // Second job in the same window is denied with a stable code.
    let response = app
        .router
        .clone()
        .oneshot(multipart_upload(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["code"], "quota_exceeded");
    assert!(body["retry_after"].is_string());
}

#[tokio::test]
async fn test_failed_transcode_is_not_charged() {
    let app = test_app(true);
    register(&app.router, "a@example.com", None).await;
    let token = login(&app.router, "a@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(multipart_upload(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["code"], "transcode_failed");

    // The failed job did not consume the quota slot: the next attempt is
    // admitted again (and fails again at the transcoder, not at admission).
    let response = app
        .router
        .clone()
        .oneshot(multipart_upload(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["code"], "transcode_failed");
}

#[tokio::test]
async fn test_payment_confirm_upgrades_and_credits_referrer() {
    let app = test_app(false);
    let referrer = register(&app.router, "a@example.com", None).await;
    let code = referrer["referral_code"].as_str().unwrap();
    register(&app.router, "b@example.com", Some(code)).await;

    let response = app
        .router
        .clone()
        .oneshot(signed_confirm(&app.secret, "b@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Upgraded account reports pro on its next login.
    let (_, body) = post_json(
        &app.router,
        "/auth/login",
        json!({ "email": "b@example.com", "password": "hunter2-extra" }),
    )
    .await;
    assert_eq!(body["tier"], "pro");

    // Referrer sees the credited bonus.
    let token = login(&app.router, "a@example.com").await;
    let (status, body) = get_with_token(&app.router, "/referral", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["referral_bonus"].as_u64().unwrap(),
        REFERRAL_BONUS_MINOR_UNITS
    );
}

#[tokio::test]
async fn test_payment_confirm_rejects_bad_signature() {
    let app = test_app(false);
    register(&app.router, "a@example.com", None).await;

    let payload = json!({ "email": "a@example.com" }).to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/payments/confirm")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-payment-signature", sign_payload("wrong-secret", payload.as_bytes()))
        .body(Body::from(payload))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // No state change happened.
    let (_, body) = post_json(
        &app.router,
        "/auth/login",
        json!({ "email": "a@example.com", "password": "hunter2-extra" }),
    )
    .await;
    assert_eq!(body["tier"], "free");
}

#[tokio::test]
async fn test_payment_confirm_unknown_account_not_found() {
    let app = test_app(false);
    let response = app
        .router
        .clone()
        .oneshot(signed_confirm(&app.secret, "ghost@example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_withdraw_then_no_balance() {
    let app = test_app(false);
    let referrer = register(&app.router, "a@example.com", None).await;
    let code = referrer["referral_code"].as_str().unwrap();
    register(&app.router, "b@example.com", Some(code)).await;
    app.router
        .clone()
        .oneshot(signed_confirm(&app.secret, "b@example.com"))
        .await
        .unwrap();

    let token = login(&app.router, "a@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/referral/withdraw")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["amount"].as_u64().unwrap(), REFERRAL_BONUS_MINOR_UNITS);

    // Second withdrawal finds nothing.
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/referral/withdraw")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["code"], "no_balance");
}

#[tokio::test]
async fn test_admin_stats_projection() {
    let app = test_app(false);
    register(&app.router, "admin@example.com", None).await;
    register(&app.router, "b@example.com", None).await;
    app.router
        .clone()
        .oneshot(signed_confirm(&app.secret, "b@example.com"))
        .await
        .unwrap();

    let token = login(&app.router, "admin@example.com").await;
    let (status, body) = get_with_token(&app.router, "/admin/stats", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_users"], 2);
    assert_eq!(body["total_pro"], 1);
    assert_eq!(
        body["revenue_minor_units"].as_u64().unwrap(),
        vidup_models::PRO_UNIT_PRICE_MINOR_UNITS
    );
}

#[tokio::test]
async fn test_admin_stats_forbidden_for_plain_user() {
    let app = test_app(false);
    register(&app.router, "a@example.com", None).await;

    let token = login(&app.router, "a@example.com").await;
    let (status, body) = get_with_token(&app.router, "/admin/stats", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}

#[tokio::test]
async fn test_login_reflects_lapsed_subscription() {
    let app = test_app(false);
    register(&app.router, "a@example.com", None).await;
    app.router
        .clone()
        .oneshot(signed_confirm(&app.secret, "a@example.com"))
        .await
        .unwrap();

    // Subscription lapses between payments.
    app.store
        .update("a@example.com", |account| {
            account.subscription_expires_at = Some(chrono::Utc::now() - chrono::Duration::days(1));
        })
        .await
        .unwrap();

    let (_, body) = post_json(
        &app.router,
        "/auth/login",
        json!({ "email": "a@example.com", "password": "hunter2-extra" }),
    )
    .await;
    assert_eq!(body["tier"], "free");
}
