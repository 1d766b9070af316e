mod support;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use auth_gate::{handle, AuthConfig, AuthContext, AuthOptions};
use axum::body::Body;
use axum::extract::State;
use axum::http::{header::AUTHORIZATION, Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use support::TestClaims;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test-secret";

async fn whoami(State(hits): State<Arc<AtomicUsize>>, context: AuthContext) -> Json<AuthContext> {
    hits.fetch_add(1, Ordering::SeqCst);
    Json(context)
}

fn app(secret: &str, options: AuthOptions, hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route("/", get(whoami))
        .layer(handle(AuthConfig::new(secret), options).expect("layer"))
        .with_state(hits)
}

fn request(authorization: Option<String>) -> Request<Body> {
    let mut builder = Request::builder().uri("/");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    builder.body(Body::empty()).expect("request")
}

async fn send(
    secret: &str,
    options: AuthOptions,
    authorization: Option<String>,
) -> (StatusCode, Vec<u8>, usize) {
    let hits = Arc::new(AtomicUsize::new(0));
    let response = app(secret, options, hits.clone())
        .oneshot(request(authorization))
        .await
        .expect("infallible");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes()
        .to_vec();
    (status, body, hits.load(Ordering::SeqCst))
}

#[tokio::test]
async fn status_table() {
    let valid = TestClaims::expiring_in(Duration::hours(1));
    let mut uuid_subject = TestClaims::expiring_in(Duration::hours(1));
    uuid_subject.sub = Uuid::new_v4().to_string();

    let cases: Vec<(&str, Option<String>, AuthOptions, StatusCode)> = vec![
        (
            "valid token",
            Some(format!("Bearer {}", valid.sign(SECRET))),
            AuthOptions::new(),
            StatusCode::OK,
        ),
        (
            "uuid subject",
            Some(format!("Bearer {}", uuid_subject.sign(SECRET))),
            AuthOptions::new(),
            StatusCode::OK,
        ),
        (
            "invalid token",
            Some("Bearer invalid-token".to_string()),
            AuthOptions::new(),
            StatusCode::UNAUTHORIZED,
        ),
        (
            "empty token",
            Some("Bearer ".to_string()),
            AuthOptions::new(),
            StatusCode::UNAUTHORIZED,
        ),
        (
            "whitespace token",
            Some("Bearer    ".to_string()),
            AuthOptions::new(),
            StatusCode::UNAUTHORIZED,
        ),
        ("missing header", None, AuthOptions::new(), StatusCode::UNAUTHORIZED),
        (
            "token without scheme",
            Some(valid.sign(SECRET)),
            AuthOptions::new(),
            StatusCode::UNAUTHORIZED,
        ),
        (
            "expired token",
            Some(format!(
                "Bearer {}",
                TestClaims::expiring_in(Duration::hours(-1)).sign(SECRET)
            )),
            AuthOptions::new(),
            StatusCode::UNAUTHORIZED,
        ),
        (
            "invalid signature",
            Some(format!("Bearer {}", valid.sign("fake-secret"))),
            AuthOptions::new(),
            StatusCode::UNAUTHORIZED,
        ),
        (
            "invalid admin token",
            Some(format!("Bearer {}", valid.sign(SECRET))),
            AuthOptions::new().only_admin(),
            StatusCode::FORBIDDEN,
        ),
        (
            "valid admin token",
            Some(format!(
                "Bearer {}",
                TestClaims::expiring_in(Duration::hours(1))
                    .with_roles(&["ADMIN"])
                    .sign(SECRET)
            )),
            AuthOptions::new().only_admin(),
            StatusCode::OK,
        ),
        (
            "admin flag token",
            Some(format!(
                "Bearer {}",
                TestClaims::expiring_in(Duration::hours(1))
                    .with_admin(true)
                    .sign(SECRET)
            )),
            AuthOptions::new().only_admin(),
            StatusCode::OK,
        ),
        (
            "lowercase admin role",
            Some(format!(
                "Bearer {}",
                TestClaims::expiring_in(Duration::hours(1))
                    .with_roles(&["admin"])
                    .sign(SECRET)
            )),
            AuthOptions::new().only_admin(),
            StatusCode::FORBIDDEN,
        ),
    ];

    for (name, authorization, options, want) in cases {
        let (status, _, hits) = send(SECRET, options, authorization).await;
        assert_eq!(status, want, "case '{name}'");
        let expected_hits = usize::from(want == StatusCode::OK);
        assert_eq!(hits, expected_hits, "case '{name}' handler calls");
    }
}

#[tokio::test]
async fn plain_user_context_reaches_handler() {
    let token = TestClaims::expiring_in(Duration::hours(1)).sign("s");
    let (status, body, hits) = send("s", AuthOptions::new(), Some(format!("Bearer {token}"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits, 1);
    let context: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(
        context,
        json!({ "is_admin": false, "user_id": "u1", "email": "e@x.com", "roles": [] })
    );
}

#[tokio::test]
async fn admin_role_context_reaches_admin_route() {
    let token = TestClaims::expiring_in(Duration::hours(1))
        .with_roles(&["ADMIN"])
        .sign("s");
    let (status, body, _) = send(
        "s",
        AuthOptions::new().only_admin(),
        Some(format!("Bearer {token}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let context: Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(context["is_admin"], true);
    assert_eq!(context["roles"], json!(["ADMIN"]));
}

#[tokio::test]
async fn wrong_secret_body_is_generic() {
    let token = TestClaims::expiring_in(Duration::hours(1)).sign("wrong-secret");
    let (status, body, hits) = send("s", AuthOptions::new(), Some(format!("Bearer {token}"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(hits, 0);
    assert_eq!(body, b"unauthorized request");
}

#[tokio::test]
async fn route_without_layer_rejects_extractor() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route("/", get(whoami)).with_state(hits.clone());

    let response = app.oneshot(request(None)).await.expect("infallible");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn token_expiring_this_second_is_rejected() {
    let token = TestClaims::expiring_in(Duration::zero()).sign(SECRET);
    let (status, body, hits) =
        send(SECRET, AuthOptions::new(), Some(format!("Bearer {token}"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(hits, 0);
    assert_eq!(body, b"unauthorized request");
}
