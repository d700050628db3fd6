mod common;

use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpListener;

use common::{
    harness, harness_with, start_backend, start_truncated_unauthorized_server, Harness, MockBackend,
    PASSWORD,
};
use taskdesk::auth::session::AuthState;
use taskdesk::services::models::{NewReport, TaskStatus};
use taskdesk::services::{Credentials, EmployeeTaskService, ReportService};
use taskdesk::views::{Dashboard, Route};
use taskdesk::TaskDeskError;

async fn signed_in(email: &str) -> (MockBackend, Harness) {
    let backend = start_backend();
    let h = harness(&backend.base_url);
    h.ctx
        .login(&Credentials::new(email, PASSWORD))
        .await
        .unwrap();
    (backend, h)
}

#[tokio::test]
async fn test_bearer_token_attached_to_requests() {
    let (backend, h) = signed_in("emp@example.com").await;
    let token = h.ctx.tokens().get_token().unwrap();

    let _: Value = h.ctx.client().get("/employee/tasks").await.unwrap();

    let last = backend.state.requests().pop().unwrap();
    assert_eq!(last.path, "/api/employee/tasks");
    assert_eq!(last.authorization, Some(format!("Bearer {}", token)));
}

#[tokio::test]
async fn test_requests_without_token_are_unauthenticated() {
    let backend = start_backend();
    let h = harness(&backend.base_url);

    let result: Result<Value, _> = h.ctx.client().get("/reports").await;
    assert!(matches!(result, Err(TaskDeskError::Unauthorized)));

    let last = backend.state.requests().pop().unwrap();
    assert_eq!(last.authorization, None);
}

#[tokio::test]
async fn test_unauthorized_forces_logout_exactly_once() {
    let (backend, h) = signed_in("emp@example.com").await;
    let history_before = h.navigator.history().len();
    backend.state.revoke_all();

    let result: Result<Value, _> = h.ctx.client().get("/employee/tasks").await;

    assert!(matches!(result, Err(TaskDeskError::Unauthorized)));
    assert_eq!(h.ctx.auth_state(), AuthState::Unauthenticated);
    assert_eq!(h.ctx.tokens().get_token(), None);
    assert!(h.durable.is_empty());
    assert!(h.cookies.is_empty());
    assert_eq!(&h.navigator.history()[history_before..], &[Route::Login]);
}

#[tokio::test]
async fn test_unauthorized_handled_for_every_verb() {
    let (backend, h) = signed_in("admin@example.com").await;
    let client = h.ctx.client();
    let body = serde_json::json!({ "name": "x" });

    for verb in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        backend.state.revoke_all();
        let before = h.navigator.history().len();

        let result: Result<Value, _> = match verb {
            "GET" => client.get("/admin/projects").await,
            "POST" => client.post("/admin/projects", &body).await,
            "PUT" => client.put("/admin/projects/p1", &body).await,
            "PATCH" => client.patch("/admin/projects/p1/assign", &body).await,
            _ => client.delete("/admin/projects/p1").await,
        };

        assert!(matches!(result, Err(TaskDeskError::Unauthorized)), "{}", verb);
        assert_eq!(h.ctx.current_user(), None, "{}", verb);
        assert_eq!(&h.navigator.history()[before..], &[Route::Login], "{}", verb);

        // Sign back in for the next verb
        h.ctx
            .login(&Credentials::new("admin@example.com", PASSWORD))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_other_failures_pass_through_unchanged() {
    let (_backend, h) = signed_in("emp@example.com").await;
    let reports = ReportService::new(h.ctx.client().clone());

    match reports.get("missing").await {
        Err(TaskDeskError::NotFound(msg)) => assert_eq!(msg, "Report not found"),
        other => panic!("unexpected result: {:?}", other),
    }
    match reports.get("broken").await {
        Err(TaskDeskError::Server { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message.as_deref(), Some("Database unavailable"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    let invalid = NewReport {
        title: "Week 42".to_string(),
        body: "Done".to_string(),
        project: Some("nope".to_string()),
    };
    match reports.submit(&invalid).await {
        Err(TaskDeskError::Validation(msg)) => assert_eq!(msg, "Project does not exist"),
        other => panic!("unexpected result: {:?}", other),
    }

    // None of these touch the session
    assert!(h.ctx.current_user().is_some());
    assert!(h.ctx.tokens().get_token().is_some());
}

#[tokio::test]
async fn test_forbidden_does_not_log_out() {
    let (_backend, h) = signed_in("emp@example.com").await;

    let result: Result<Value, _> = h.ctx.client().get("/admin/projects").await;
    match result {
        Err(TaskDeskError::Forbidden(msg)) => assert_eq!(msg, "Access denied"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(h.ctx.current_user().is_some());
}

#[tokio::test]
async fn test_client_side_validation_sends_nothing() {
    let (backend, h) = signed_in("emp@example.com").await;
    let before = backend.state.request_count();
    let reports = ReportService::new(h.ctx.client().clone());

    let empty = NewReport {
        title: " ".to_string(),
        body: "text".to_string(),
        project: None,
    };
    assert!(matches!(reports.submit(&empty).await, Err(TaskDeskError::Validation(_))));
    assert!(matches!(reports.get("../users").await, Err(TaskDeskError::Validation(_))));
    assert_eq!(backend.state.request_count(), before);
}

#[tokio::test]
async fn test_network_failure_is_surfaced() {
    // Nothing listens on the discard port
    let h = harness("http://127.0.0.1:9/api");
    let result: Result<Value, _> = h.ctx.client().get("/reports").await;
    assert!(matches!(result, Err(TaskDeskError::Network(_))));
    assert!(h.navigator.history().is_empty());
}

#[tokio::test]
async fn test_empty_success_body() {
    let (_backend, h) = signed_in("admin@example.com").await;
    let Some(Dashboard::Admin(admin)) = h.ctx.dashboard() else {
        panic!("expected admin dashboard");
    };
    admin.assets.delete("a1").await.unwrap();
}

#[tokio::test]
async fn test_employee_updates_task_status() {
    let (backend, h) = signed_in("emp@example.com").await;
    let tasks = EmployeeTaskService::new(h.ctx.client().clone());

    let task = tasks.set_status("t1", TaskStatus::InProgress).await.unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);

    let last = backend.state.requests().pop().unwrap();
    assert_eq!(last.method, "PATCH");
    assert_eq!(last.body["status"], "in-progress");
}

#[tokio::test]
async fn test_unauthorized_with_unreadable_body_still_logs_out() {
    let backend = start_backend();
    let first = harness(&backend.base_url);
    first
        .ctx
        .login(&Credentials::new("emp@example.com", PASSWORD))
        .await
        .unwrap();

    // Same stored session, pointed at a server that cuts the 401 body short
    let broken = start_truncated_unauthorized_server().await;
    let h = harness_with(&broken, first.durable.clone(), first.cookies.clone(), first.clock.clone());
    assert!(h.ctx.current_user().is_some());

    let result: Result<Value, _> = h.ctx.client().get("/employee/tasks").await;

    assert!(matches!(result, Err(TaskDeskError::Unauthorized)));
    assert_eq!(h.ctx.current_user(), None);
    assert_eq!(h.ctx.tokens().get_token(), None);
    assert!(h.durable.is_empty());
    assert_eq!(h.navigator.history(), vec![Route::Login]);
}

#[tokio::test]
async fn test_token_never_sent_outside_api() {
    let (backend, h) = signed_in("emp@example.com").await;
    let foreign = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let foreign_url = format!("http://{}/steal", foreign.local_addr().unwrap());
    let before = backend.state.request_count();

    for path in [foreign_url.as_str(), "../../outside"] {
        let result: Result<Value, _> = h.ctx.client().get(path).await;
        assert!(matches!(result, Err(TaskDeskError::Validation(_))), "{}", path);
    }

    let connection = tokio::time::timeout(Duration::from_millis(200), foreign.accept()).await;
    assert!(connection.is_err(), "foreign host was contacted");
    assert_eq!(backend.state.request_count(), before);
    assert!(h.ctx.current_user().is_some());
}
