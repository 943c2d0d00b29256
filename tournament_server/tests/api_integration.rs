//! Integration tests for the HTTP API.
//!
//! Drives the full router in-process with `oneshot`, authenticating callers
//! with tokens signed by the same secret the router verifies against.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method
use tournament_oracle::{Identity, ManagerConfig, OracleConfig, ResultsOracle, TournamentManager};
use tournament_server::api::{AppState, auth::CallerAuth, create_router};

const SECRET: &str = "test_secret_key_for_testing_only_0123456789";

struct TestServer {
    app: axum::Router,
    auth: CallerAuth,
}

impl TestServer {
    fn new() -> Self {
        let oracle = Arc::new(ResultsOracle::with_reporters(
            Identity::from("admin"),
            [Identity::from("reporter")],
            OracleConfig::default(),
        ));
        let manager = Arc::new(TournamentManager::new(
            oracle.clone(),
            ManagerConfig::default(),
        ));
        let auth = CallerAuth::new(SECRET);

        let state = AppState {
            manager,
            oracle,
            auth: Arc::new(auth.clone()),
        };

        Self {
            app: create_router(state),
            auth,
        }
    }

    async fn call(
        &self,
        method: &str,
        uri: &str,
        caller: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(caller) = caller {
            let token = self
                .auth
                .issue(&Identity::from(caller), Duration::minutes(5))
                .unwrap();
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    /// Create a tournament as `organizer` and open registration
    async fn registering(&self, organizer: &str) -> u64 {
        let (status, body) = self
            .call("POST", "/api/v1/tournaments", Some(organizer), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_u64().unwrap();

        let (status, _) = self
            .call(
                "POST",
                &format!("/api/v1/tournaments/{}/open", id),
                Some(organizer),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        id
    }
}

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::new();
    let (status, body) = server.call("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["tournaments"], 0);
    assert_eq!(body["reporters"], 1);
}

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let server = TestServer::new();
    let id = server.registering("org").await;

    for player in ["p1", "p2"] {
        let (status, _) = server
            .call(
                "POST",
                &format!("/api/v1/tournaments/{}/register", id),
                Some(player),
                Some(json!({})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = server
        .call("POST", &format!("/api/v1/tournaments/{}/start", id), Some("org"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "in_progress");

    // No result yet: retryable conflict
    let (status, body) = server
        .call("POST", &format!("/api/v1/tournaments/{}/finalize", id), None, None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "result_not_available");
    assert_eq!(body["retryable"], true);

    let (status, body) = server
        .call(
            "POST",
            "/api/v1/results",
            Some("reporter"),
            Some(json!({
                "tournament_id": id,
                "payload": { "type": "winner", "winner": "p1" }
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let sequence = body["sequence"].as_u64().unwrap();

    let (status, body) = server
        .call("POST", &format!("/api/v1/tournaments/{}/finalize", id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "completed");
    assert_eq!(body["result_ref"]["sequence"], sequence);

    let (status, body) = server
        .call("GET", &format!("/api/v1/tournaments/{}/result", id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["winner"], "p1");
    assert_eq!(body["reporter"], "reporter");

    let (status, body) = server
        .call("POST", &format!("/api/v1/tournaments/{}/finalize", id), None, None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "already_finalized");
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let server = TestServer::new();

    let (status, body) = server
        .call("POST", "/api/v1/tournaments", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthenticated");
    assert_eq!(body["retryable"], false);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/tournaments")
        .header("authorization", "Bearer not-a-token")
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = server.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()["content-type"], "application/json");
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], "unauthenticated");
    assert!(body["error"].as_str().is_some());

    let foreign = CallerAuth::new("some_other_secret_that_is_long_enough")
        .issue(&Identity::from("org"), Duration::minutes(5))
        .unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/tournaments")
        .header("authorization", format!("Bearer {}", foreign))
        .header("content-type", "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = server.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_admin_cannot_start() {
    let server = TestServer::new();
    let id = server.registering("org").await;

    let (status, body) = server
        .call("POST", &format!("/api/v1/tournaments/{}/start", id), Some("mallory"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "unauthorized");

    let (_, body) = server
        .call("GET", &format!("/api/v1/tournaments/{}", id), None, None)
        .await;
    assert_eq!(body["state"], "registering");
}

#[tokio::test]
async fn test_start_without_enough_participants() {
    let server = TestServer::new();
    let id = server.registering("org").await;

    let (status, body) = server
        .call("POST", &format!("/api/v1/tournaments/{}/start", id), Some("org"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "insufficient_participants");
}

#[tokio::test]
async fn test_result_submission_rules() {
    let server = TestServer::new();
    let submission = json!({
        "tournament_id": 9,
        "match_id": "final",
        "payload": { "type": "ranking", "ranking": ["a", "b"] }
    });

    let (status, body) = server
        .call("POST", "/api/v1/results", Some("mallory"), Some(submission.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "unauthorized");

    let (status, _) = server
        .call("POST", "/api/v1/results", Some("reporter"), Some(submission.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = server
        .call("POST", "/api/v1/results", Some("reporter"), Some(submission))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "already_finalized");

    let (status, body) = server
        .call("GET", "/api/v1/results/9?match_id=final", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["ranking"], json!(["a", "b"]));

    let (status, body) = server.call("GET", "/api/v1/results/9", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");

    let (status, body) = server
        .call("GET", "/api/v1/results/9?all=true", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reporter_management() {
    let server = TestServer::new();

    let (status, _) = server
        .call(
            "POST",
            "/api/v1/reporters",
            Some("mallory"),
            Some(json!({ "reporter": "mallory" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server
        .call(
            "POST",
            "/api/v1/reporters",
            Some("admin"),
            Some(json!({ "reporter": "scorer" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["authorized"], true);

    let (_, body) = server.call("GET", "/api/v1/reporters", None, None).await;
    assert_eq!(body, json!(["reporter", "scorer"]));

    let (status, _) = server
        .call("DELETE", "/api/v1/reporters/scorer", Some("admin"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = server
        .call("GET", "/api/v1/reporters/scorer", None, None)
        .await;
    assert_eq!(body["authorized"], false);
}

#[tokio::test]
async fn test_unknown_tournament() {
    let server = TestServer::new();

    let (status, body) = server.call("GET", "/api/v1/tournaments/42", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn test_create_with_invalid_config() {
    let server = TestServer::new();

    let (status, body) = server
        .call(
            "POST",
            "/api/v1/tournaments",
            Some("org"),
            Some(json!({ "min_participants": 4, "max_participants": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_config");

    let (status, body) = server
        .call(
            "POST",
            "/api/v1/tournaments",
            Some("org"),
            Some(json!({ "name": "Spring Cup", "max_participants": 8 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["config"]["name"], "Spring Cup");
    assert_eq!(body["organizer"], "org");
    assert_eq!(body["state"], "created");
}

#[tokio::test]
async fn test_listing_and_paging() {
    let server = TestServer::new();
    let open = server.registering("org").await;
    let (status, _) = server
        .call("POST", "/api/v1/tournaments", Some("org"), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    for player in ["a", "b", "c"] {
        server
            .call(
                "POST",
                &format!("/api/v1/tournaments/{}/register", open),
                Some("org"),
                Some(json!({ "participant": player })),
            )
            .await;
    }

    let (_, body) = server
        .call("GET", "/api/v1/tournaments?state=registering", None, None)
        .await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], open);

    let (_, body) = server.call("GET", "/api/v1/tournaments", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = server
        .call(
            "GET",
            &format!("/api/v1/tournaments/{}/participants?offset=1&limit=1", open),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["participants"], json!(["b"]));
    assert_eq!(body["next_offset"], 2);
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let server = TestServer::new();
    let id = server.registering("org").await;
    let uri = format!("/api/v1/tournaments/{}/register", id);

    let (status, _) = server.call("POST", &uri, Some("p1"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = server.call("POST", &uri, Some("p1"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "already_registered");
}

#[tokio::test]
async fn test_delegated_admin() {
    let server = TestServer::new();
    let (_, body) = server
        .call("POST", "/api/v1/tournaments", Some("org"), Some(json!({})))
        .await;
    let id = body["id"].as_u64().unwrap();

    // Only the organizer may delegate
    let (status, _) = server
        .call(
            "POST",
            &format!("/api/v1/tournaments/{}/delegates", id),
            Some("helper"),
            Some(json!({ "delegate": "helper" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server
        .call(
            "POST",
            &format!("/api/v1/tournaments/{}/delegates", id),
            Some("org"),
            Some(json!({ "delegate": "helper" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);

    let (status, _) = server
        .call("POST", &format!("/api/v1/tournaments/{}/open", id), Some("helper"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server
        .call(
            "DELETE",
            &format!("/api/v1/tournaments/{}/delegates/helper", id),
            Some("org"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);

    let (status, _) = server
        .call("POST", &format!("/api/v1/tournaments/{}/cancel", id), Some("helper"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server
        .call("POST", &format!("/api/v1/tournaments/{}/cancel", id), Some("org"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "cancelled");
}

#[tokio::test]
async fn test_malformed_requests_answer_with_json_errors() {
    let server = TestServer::new();

    let (status, body) = server
        .call(
            "POST",
            "/api/v1/results",
            Some("reporter"),
            Some(json!({ "tournament_id": 1, "payload": { "type": "bogus" } })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "invalid_request");
    assert_eq!(body["retryable"], false);

    let (status, body) = server
        .call("GET", "/api/v1/tournaments/not-a-number", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_request");

    let (status, body) = server
        .call("GET", "/api/v1/tournaments?state=sleeping", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_request");
}

#[tokio::test]
async fn test_create_without_body_uses_defaults() {
    let server = TestServer::new();

    let (status, body) = server
        .call("POST", "/api/v1/tournaments", Some("org"), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["state"], "created");
    assert_eq!(body["organizer"], "org");
    assert_eq!(body["config"]["min_participants"], 2);
}

#[tokio::test]
async fn test_empty_ranking_is_rejected() {
    let server = TestServer::new();
    let submission = json!({
        "tournament_id": 3,
        "payload": { "type": "ranking", "ranking": [] }
    });

    let (status, body) = server
        .call("POST", "/api/v1/results", Some("reporter"), Some(submission))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_payload");

    let (status, _) = server.call("GET", "/api/v1/results/3", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
