//! Router assembly.

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::handlers;
use crate::services::{AuthService, ContactService};
use crate::state::AppState;

/// CORS policy.
///
/// The site origin may send the session cookie; if the configured public URL
/// is not a valid origin the API falls back to anonymous any-origin access.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    match HeaderValue::from_str(config.public_url.trim_end_matches('/')) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(e) => {
            tracing::warn!(error = %e, url = %config.public_url, "Invalid public URL, allowing any origin");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Build the application router with all routes.
pub fn build_router(
    state: AppState,
    auth_service: AuthService,
    contact_service: ContactService,
) -> Router {
    let cors = cors_layer(&state.config);

    // Health check routes (no auth required)
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health))
        .with_state(state);

    // Account and session routes
    let auth_routes = Router::new()
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/auth/verify-email", post(handlers::auth::verify_email))
        .route(
            "/api/auth/resend-verification",
            post(handlers::auth::resend_verification),
        )
        .route("/api/auth/me", get(handlers::auth::me))
        .with_state(auth_service);

    // Contact relay
    let contact_routes = Router::new()
        .route("/api/contact", post(handlers::contact::submit))
        .with_state(contact_service);

    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(contact_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::mail::testing::RecordingMailer;
    use crate::services::auth::tests::seed_unverified;
    use crate::store::memory::MemoryUserStore;

    struct Harness {
        router: Router,
        store: Arc<MemoryUserStore>,
        mailer: Arc<RecordingMailer>,
    }

    fn harness_with(mailer: RecordingMailer) -> Harness {
        let config = Arc::new(AppConfig::default());
        let store = Arc::new(MemoryUserStore::default());
        let mailer = Arc::new(mailer);

        // Never connects: only /api/health touches the pool.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://maharitage@localhost/maharitage")
            .unwrap();

        let router = build_router(
            AppState::new(pool, config.clone()),
            AuthService::new(store.clone(), mailer.clone(), config),
            ContactService::new(mailer.clone(), Some("team@maharitage.in".to_string())),
        );

        Harness {
            router,
            store,
            mailer,
        }
    }

    fn harness() -> Harness {
        harness_with(RecordingMailer::default())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn set_cookie(response: &Response) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness();
        let response = h
            .router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_logout_always_clears_cookie() {
        let h = harness();

        let anonymous = Request::post("/api/auth/logout").body(Body::empty()).unwrap();
        let with_cookie = Request::post("/api/auth/logout")
            .header(header::COOKIE, "auth-token=something")
            .body(Body::empty())
            .unwrap();

        for request in [anonymous, with_cookie] {
            let response = h.router.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let cookie = set_cookie(&response);
            assert!(cookie.starts_with("auth-token=;"), "{cookie}");
            assert!(cookie.contains("Max-Age=0"));

            let body = body_json(response).await;
            assert_eq!(body["success"], true);
        }
    }

    #[tokio::test]
    async fn test_verify_email_unknown_token() {
        let h = harness();
        let response = h
            .router
            .oneshot(post_json("/api/auth/verify-email", json!({"token": "nope"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "error": "Invalid or expired verification token"})
        );
    }

    #[tokio::test]
    async fn test_verify_email_malformed_body() {
        let h = harness();
        let request = Request::post("/api/auth/verify-email")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = h.router.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_verify_email_then_replay() {
        let h = harness();
        seed_unverified(&h.store, "asha@example.com", "tok", Utc::now() + Duration::hours(1));

        let first = h
            .router
            .clone()
            .oneshot(post_json("/api/auth/verify-email", json!({"token": "tok"})))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(
            body_json(first).await,
            json!({"success": true, "message": "Email verified successfully"})
        );

        let replay = h
            .router
            .oneshot(post_json("/api/auth/verify-email", json!({"token": "tok"})))
            .await
            .unwrap();
        assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_contact_missing_fields() {
        let h = harness();
        let response = h
            .router
            .oneshot(post_json(
                "/api/contact",
                json!({"name": "", "email": "a@b.com", "message": "hi"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "All fields are required"})
        );
        assert!(h.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_contact_success() {
        let h = harness();
        let response = h
            .router
            .oneshot(post_json(
                "/api/contact",
                json!({"name": "A", "email": "a@b.com", "message": "hi"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Email sent successfully"})
        );
        assert_eq!(h.mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_contact_transport_failure() {
        let h = harness_with(RecordingMailer::failing());
        let response = h
            .router
            .oneshot(post_json(
                "/api/contact",
                json!({"name": "A", "email": "a@b.com", "message": "hi"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Failed to send email"})
        );
    }

    #[tokio::test]
    async fn test_me_requires_credential() {
        let h = harness();
        let response = h
            .router
            .oneshot(Request::get("/api/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_signup_verify_login_me() {
        let h = harness();

        let signup = h
            .router
            .clone()
            .oneshot(post_json(
                "/api/auth/signup",
                json!({"name": "Asha", "email": "asha@example.com", "password": "password123"}),
            ))
            .await
            .unwrap();
        assert_eq!(signup.status(), StatusCode::CREATED);

        let sent = h.mailer.sent();
        let raw = sent[0]
            .text
            .split("token=")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .unwrap()
            .to_string();

        let login_body = json!({"email": "asha@example.com", "password": "password123"});
        let early = h
            .router
            .clone()
            .oneshot(post_json("/api/auth/login", login_body.clone()))
            .await
            .unwrap();
        assert_eq!(early.status(), StatusCode::FORBIDDEN);

        let verified = h
            .router
            .clone()
            .oneshot(post_json("/api/auth/verify-email", json!({"token": raw})))
            .await
            .unwrap();
        assert_eq!(verified.status(), StatusCode::OK);

        let login = h
            .router
            .clone()
            .oneshot(post_json("/api/auth/login", login_body))
            .await
            .unwrap();
        assert_eq!(login.status(), StatusCode::OK);
        let cookie = set_cookie(&login);
        assert!(cookie.contains("HttpOnly"));
        let token = body_json(login).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let by_header = h
            .router
            .clone()
            .oneshot(
                Request::get("/api/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(by_header.status(), StatusCode::OK);
        let body = body_json(by_header).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["role"], "user");
        assert_eq!(body["data"]["isEmailVerified"], true);

        let by_cookie = h
            .router
            .oneshot(
                Request::get("/api/auth/me")
                    .header(header::COOKIE, format!("auth-token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(by_cookie.status(), StatusCode::OK);
    }
}
