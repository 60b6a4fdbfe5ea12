use anyhow::Context;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use crate::{accounts, admin, mining};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(accounts::router())
        .merge(mining::router())
        .merge(admin::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

/// Bind the listener described by `state.config`.
pub async fn bind(state: &AppState) -> anyhow::Result<TcpListener> {
    let addr = state.config.bind_addr();
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let listener = bind(&state).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        store = ?state.config.store,
        "listening"
    );
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn call(app: &Router, req: Request<Body>) -> Value {
        let res = app.clone().oneshot(req).await.expect("router is infallible");
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).expect("json body")
    }

    async fn post(app: &Router, path: &str, body: Value) -> Value {
        let req = Request::post(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        call(app, req).await
    }

    async fn get_json(app: &Router, path: &str) -> Value {
        call(app, Request::get(path).body(Body::empty()).unwrap()).await
    }

    fn app() -> Router {
        build_app(AppState::in_memory())
    }

    async fn register_and_login(app: &Router, email: &str, password: &str) -> i64 {
        let reg = post(app, "/register", json!({"email": email, "password": password})).await;
        assert_eq!(reg["status"], "success", "{reg}");
        let login = post(app, "/login", json!({"email": email, "password": password})).await;
        assert_eq!(login["status"], "success", "{login}");
        login["userId"].as_i64().expect("userId")
    }

    #[tokio::test]
    async fn bind_uses_configured_address() {
        let state = AppState::in_memory();
        let listener = bind(&state).await.expect("bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_ne!(addr.port(), 0);
    }

    #[tokio::test]
    async fn login_with_corrupt_stored_hash_is_an_error_envelope() {
        let state = AppState::in_memory();
        state.users.create("broken@example.com", "not-a-phc-string").await.unwrap();
        let app = build_app(state);
        let res = post(&app, "/login", json!({"email": "broken@example.com", "password": "pw"})).await;
        assert_eq!(res["status"], "error");
        assert!(res["message"]
            .as_str()
            .unwrap()
            .starts_with("stored password hash is malformed"));
    }

    #[tokio::test]
    async fn health_is_plain_ok() {
        let res = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn register_then_login_returns_stored_id() {
        let app = app();
        let reg = post(&app, "/register", json!({"email": "a@example.com", "password": "pw1"})).await;
        assert_eq!(
            reg,
            json!({"status": "success", "message": "User registered successfully"})
        );

        let login = post(&app, "/login", json!({"email": "a@example.com", "password": "pw1"})).await;
        assert_eq!(login["status"], "success");
        assert_eq!(login["message"], "Login successful");
        assert_eq!(login["userId"], 1);

        let again = post(&app, "/login", json!({"email": "a@example.com", "password": "pw1"})).await;
        assert_eq!(again["userId"], login["userId"]);
    }

    #[tokio::test]
    async fn register_duplicate_email_fails() {
        let app = app();
        register_and_login(&app, "dup@example.com", "pw").await;
        let dup = post(&app, "/register", json!({"email": "dup@example.com", "password": "other"})).await;
        assert_eq!(dup["status"], "error");
        assert!(dup["message"].as_str().unwrap().contains("unique constraint"));
    }

    #[tokio::test]
    async fn register_requires_both_fields() {
        let app = app();
        for body in [
            json!({"email": "a@example.com"}),
            json!({"password": "pw"}),
            json!({"email": "", "password": "pw"}),
            json!({}),
        ] {
            let res = post(&app, "/register", body).await;
            assert_eq!(
                res,
                json!({"status": "error", "message": "Email and password are required"})
            );
        }
    }

    #[tokio::test]
    async fn malformed_json_gets_error_envelope() {
        let req = Request::post("/login")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let res = call(&app(), req).await;
        assert_eq!(res["status"], "error");
        assert!(res["message"].is_string());
    }

    #[tokio::test]
    async fn login_unknown_email_is_user_not_found() {
        let res = post(&app(), "/login", json!({"email": "ghost@example.com", "password": "pw"})).await;
        assert_eq!(res, json!({"status": "error", "message": "User not found"}));
    }

    #[tokio::test]
    async fn login_wrong_password_is_never_user_not_found() {
        let app = app();
        register_and_login(&app, "b@example.com", "right").await;
        for attempt in ["wrong", "Right", "right "] {
            let res = post(&app, "/login", json!({"email": "b@example.com", "password": attempt})).await;
            assert_eq!(res, json!({"status": "error", "message": "Wrong password"}));
        }
    }

    #[tokio::test]
    async fn save_then_get_returns_exact_values() {
        let app = app();
        let id = register_and_login(&app, "c@example.com", "pw").await;

        let saved = post(
            &app,
            "/saveMining",
            json!({"userId": id, "minedTokens": 137.25, "miningSpeed": 3.0}),
        )
        .await;
        assert_eq!(saved, json!({"status": "success", "message": "Mining data saved"}));

        let got = post(&app, "/getMining", json!({"userId": id})).await;
        assert_eq!(
            got,
            json!({"status": "success", "data": {"minedTokens": 137.25, "miningSpeed": 3.0}})
        );

        // a lower count overwrites without complaint
        post(
            &app,
            "/saveMining",
            json!({"userId": id, "minedTokens": 1.0, "miningSpeed": 0.5}),
        )
        .await;
        let got = post(&app, "/getMining", json!({"userId": id})).await;
        assert_eq!(got["data"], json!({"minedTokens": 1.0, "miningSpeed": 0.5}));
    }

    #[tokio::test]
    async fn get_mining_for_unknown_id_is_empty_success() {
        let res = post(&app(), "/getMining", json!({"userId": 999})).await;
        assert_eq!(res, json!({"status": "success", "data": null}));
    }

    #[tokio::test]
    async fn save_mining_for_unknown_id_still_succeeds() {
        let res = post(
            &app(),
            "/saveMining",
            json!({"userId": 999, "minedTokens": 5, "miningSpeed": 1}),
        )
        .await;
        assert_eq!(res["status"], "success");
    }

    #[tokio::test]
    async fn save_mining_rejects_negative_tokens() {
        let res = post(
            &app(),
            "/saveMining",
            json!({"userId": 1, "minedTokens": -5, "miningSpeed": 1}),
        )
        .await;
        assert_eq!(res["status"], "error");
        assert_eq!(res["message"], "minedTokens must be a non-negative number");
    }

    #[tokio::test]
    async fn get_mining_requires_user_id() {
        let res = post(&app(), "/getMining", json!({})).await;
        assert_eq!(res, json!({"status": "error", "message": "userId is required"}));
    }

    #[tokio::test]
    async fn admin_lists_users_most_recent_first() {
        let app = app();
        let first = register_and_login(&app, "first@example.com", "pw").await;
        register_and_login(&app, "second@example.com", "pw").await;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        post(
            &app,
            "/saveMining",
            json!({"userId": first, "minedTokens": 42, "miningSpeed": 2}),
        )
        .await;

        let res = get_json(&app, "/admin/activeUsers").await;
        assert_eq!(res["status"], "success");
        assert_eq!(res["totalUsers"], 2);
        let users = res["users"].as_array().unwrap();
        assert_eq!(users[0]["email"], "first@example.com");
        assert_eq!(users[0]["minedTokens"], 42.0);
        assert_eq!(users[1]["email"], "second@example.com");
        assert!(users[0].get("passwordHash").is_none());
        assert!(users[0]["lastActive"].is_string());
    }
}
