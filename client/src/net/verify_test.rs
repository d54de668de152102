use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use super::*;

fn verdict_body() -> Value {
    json!({
        "status": "real",
        "confidence": 91,
        "blockchainHash": "0x1f2e3d...",
        "analysis": {
            "credibilityScore": 86,
            "languagePattern": "Neutral tone",
            "factCheck": "Matched with sources A, B, C",
            "sourceReliability": "High"
        },
        "timestamp": "2026-08-08T12:00:00"
    })
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

// =============================================================================
// verify
// =============================================================================

#[tokio::test]
async fn verify_returns_typed_verdict() {
    let app = Router::new().route(
        "/api/verify",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["inputType"], "text");
            assert_eq!(body["text"], "some article body");
            Json(verdict_body())
        }),
    );
    let base = serve(app).await;
    let client = VerifyClient::new(&base).unwrap();

    let verdict = client
        .verify(&VerifyRequest::from_text("some article body", None))
        .await
        .unwrap();

    assert_eq!(verdict.status, "real");
    assert_eq!(verdict.confidence, 91);
    assert_eq!(verdict.blockchain_hash, "0x1f2e3d...");
    assert_eq!(verdict.analysis.unwrap().credibility_score, 86);
}

#[tokio::test]
async fn verify_forwards_user_id() {
    let app = Router::new().route(
        "/api/verify",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["userId"], "u1");
            Json(verdict_body())
        }),
    );
    let base = serve(app).await;
    let client = VerifyClient::new(&base).unwrap();

    client
        .verify(&VerifyRequest::from_url(
            "https://example.com/story",
            Some("u1".to_owned()),
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn verify_rejection_carries_status() {
    let app = Router::new().route(
        "/api/verify",
        post(|| async { StatusCode::UNPROCESSABLE_ENTITY }),
    );
    let base = serve(app).await;
    let client = VerifyClient::new(&base).unwrap();

    let error = client
        .verify(&VerifyRequest::from_text("x", None))
        .await
        .unwrap_err();

    assert!(matches!(error, VerifyError::Rejected { status: 422 }));
}

#[tokio::test]
async fn verify_against_dead_backend_is_unreachable() {
    let base = dead_endpoint().await;
    let client = VerifyClient::new(&base).unwrap();

    let error = client
        .verify(&VerifyRequest::from_text("x", None))
        .await
        .unwrap_err();

    match error {
        VerifyError::BackendUnreachable { base_url } => assert_eq!(base_url, base),
        other => panic!("expected BackendUnreachable, got {other:?}"),
    }
}

// =============================================================================
// history
// =============================================================================

#[tokio::test]
async fn history_scopes_to_user_and_limit() {
    let app = Router::new().route(
        "/api/verifications",
        get(
            |Query(params): Query<std::collections::HashMap<String, String>>| async move {
                assert_eq!(params.get("userId").map(String::as_str), Some("u1"));
                assert_eq!(params.get("limit").map(String::as_str), Some("25"));
                Json(json!([
                    {
                        "id": "v1",
                        "title": "Some headline",
                        "source": "Direct text submission",
                        "status": "real",
                        "confidence": 91,
                        "blockchainHash": "0xabc...",
                        "timestamp": "2026-08-08T12:00:00",
                        "verifier": "AI Authenticity Model",
                        "inputType": "text",
                        "url": null,
                        "snippet": "Some headline body"
                    }
                ]))
            },
        ),
    );
    let base = serve(app).await;
    let client = VerifyClient::new(&base).unwrap();

    let records = client.history(Some("u1"), 25).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "v1");
    assert_eq!(records[0].status, "real");
}

#[tokio::test]
async fn history_without_user_reads_public_feed() {
    let app = Router::new().route(
        "/api/verifications",
        get(
            |Query(params): Query<std::collections::HashMap<String, String>>| async move {
                assert!(params.get("userId").is_none());
                Json(json!([]))
            },
        ),
    );
    let base = serve(app).await;
    let client = VerifyClient::new(&base).unwrap();

    let records = client.history(None, 100).await.unwrap();
    assert!(records.is_empty());
}
