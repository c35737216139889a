mod common;
use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{Action, Flow, setup_server, setup_test_db};

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).expect("Invalid body format")
}

#[tokio::test]
async fn route_health_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(Action::new("health", "GET", "/health").assert_body(|body| {
            let health = json_body(body);
            assert_eq!(health["status"], "healthy");
            assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
            assert_eq!(health["database"]["connection"], true);
            assert_eq!(health["provider"], "stub");
            assert!(health["system"]["cpus"].as_u64().unwrap() >= 1);
        }))
        .step(
            Action::new("live", "GET", "/health/live")
                .assert_body(|body| assert_eq!(json_body(body)["status"], "alive")),
        )
        .step(
            Action::new("ready", "GET", "/health/ready")
                .assert_body(|body| {
                    let ready = json_body(body);
                    assert_eq!(ready["status"], "ready");
                    assert!(ready.get("reason").is_none());
                }),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_openapi_test() {
    let db = setup_test_db().await;
    let server = setup_server(&db).await;

    // docs are switched on in the local config.toml
    let resp = server.get("/api-doc/openapi.json").await;
    resp.assert_status(StatusCode::OK);
    let doc: Value = resp.json();
    assert!(doc["paths"]["/api/v1/chat"]["post"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
}
