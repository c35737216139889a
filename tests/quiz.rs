mod common;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::common::{
    Action, Flow, STUB_CORRECT_ANSWER, generate_action, module_path, setup_server, setup_test_db,
    signed_in,
};

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).expect("Invalid body format")
}

fn submit(answers: Value) -> Action {
    Action::new("submit", "POST", "")
        .with_dyn_path(module_path("module", "/quiz/submit"))
        .with_body(json!({ "answers": answers }))
}

#[tokio::test]
async fn route_quiz_grading_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    signed_in(Flow::new(), "user", "quiz@example.com")
        .step(generate_action("Python Lists").with_save_as("module"))
        .step(submit(json!({"0": "push()"})).assert_body(|body| {
            let result = json_body(body);
            assert_eq!(result["score"], 0.0);
            assert_eq!(result["feedback"][0]["is_correct"], false);
            assert_eq!(result["feedback"][0]["user_answer"], "push()");
            assert_eq!(result["feedback"][0]["correct_answer"], STUB_CORRECT_ANSWER);
            assert!(result["next_steps"].as_str().unwrap().contains("reviewing"));
        }))
        // recommendation points back at the module itself
        .step(submit(json!({})).assert_body(|body| {
            let result = json_body(body);
            assert_eq!(result["score"], 0.0);
            assert!(result["feedback"][0]["user_answer"].is_null());
            assert!(!result["recommended_module_id"].is_null());
        }))
        // matching is exact
        .step(submit(json!({"0": "APPEND()"})).assert_body(|body| {
            assert_eq!(json_body(body)["correct_answers"], 0);
        }))
        .step(submit(json!({"0": STUB_CORRECT_ANSWER})).assert_body(|body| {
            let result = json_body(body);
            assert_eq!(result["score"], 100.0);
            assert!(result["next_steps"].as_str().unwrap().contains("next topic"));
        }))
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_quiz_rejects_bad_answers_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    signed_in(Flow::new(), "user", "badquiz@example.com")
        .step(generate_action("Python Lists").with_save_as("module"))
        .step(submit(json!({"1": "x"})).with_expect(StatusCode::BAD_REQUEST))
        .step(submit(json!({"first": "x"})).with_expect(StatusCode::BAD_REQUEST))
        .step(submit(json!({"0": STUB_CORRECT_ANSWER, " 0": "push()"})).with_expect(StatusCode::BAD_REQUEST))
        .step(submit(json!(["append()"])).with_expect(StatusCode::BAD_REQUEST))
        .step(
            Action::new("no_answers_field", "POST", "")
                .with_dyn_path(module_path("module", "/quiz/submit"))
                .with_body(json!({"0": "append()"}))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("unknown_module", "POST", "")
                .with_dyn_path(|_| format!("/api/v1/modules/{}/quiz/submit", uuid::Uuid::new_v4()))
                .with_body(json!({"answers": {}}))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_progress_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    signed_in(Flow::new(), "user", "progress@example.com")
        .step(
            Action::new("empty_progress", "GET", "/api/v1/progress").assert_body(|body| {
                let progress = json_body(body);
                assert_eq!(progress["email"], "progress@example.com");
                assert_eq!(progress["total_modules"], 0);
                assert_eq!(progress["quizzes_taken"], 0);
                assert!(progress["average_score"].is_null());
            }),
        )
        .step(generate_action("Python Lists").with_save_as("module"))
        .step(generate_action("Python Dicts"))
        .step(submit(json!({"0": "push()"})))
        .step(submit(json!({"0": STUB_CORRECT_ANSWER})))
        .step(
            Action::new("progress", "GET", "/api/v1/progress").assert_body(|body| {
                let progress = json_body(body);
                assert_eq!(progress["total_modules"], 2);
                // only the latest attempt per module counts
                assert_eq!(progress["quizzes_taken"], 1);
                assert_eq!(progress["average_score"], 100.0);
                assert_eq!(progress["best_score"], 100.0);

                let modules = progress["modules"].as_array().unwrap();
                assert_eq!(modules.len(), 2);
                assert_eq!(modules[0]["title"], "Python Dicts");
                assert_eq!(modules[0]["attempts"], 0);
                assert_eq!(modules[1]["title"], "Python Lists");
                assert_eq!(modules[1]["attempts"], 2);
                assert_eq!(modules[1]["quiz_score"], 100.0);
            }),
        )
        .step(
            Action::new("delete", "DELETE", "").with_dyn_path(module_path("module", "")),
        )
        .step(
            Action::new("progress_after_delete", "GET", "/api/v1/progress").assert_body(|body| {
                let progress = json_body(body);
                assert_eq!(progress["total_modules"], 1);
                assert_eq!(progress["quizzes_taken"], 0);
            }),
        )
        .run(&mut server, db)
        .await;
}
