// Shared test fixtures: an in-process mock backend and a wired client context
#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use warp::http::{Method, StatusCode};
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::reply::Response;
use warp::{Filter, Reply};

use taskdesk::clock::ManualClock;
use taskdesk::config::ClientConfig;
use taskdesk::storage::MemoryStore;
use taskdesk::views::HistoryNavigator;
use taskdesk::AppContext;

pub const PASSWORD: &str = "correct-horse";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Backend double. Tokens it issued stay valid until revoked.
#[derive(Default)]
pub struct MockState {
    issued: Mutex<HashMap<String, Value>>,
    requests: Mutex<Vec<RecordedRequest>>,
    counter: Mutex<u32>,
}

impl MockState {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Simulate server-side expiry of every issued token
    pub fn revoke_all(&self) {
        self.issued.lock().unwrap().clear();
    }

    fn issue(&self, local: &str, name: &str, email: &str) -> Value {
        let role = match local {
            "admin" => "admin",
            "lead" => "teamlead",
            _ => "employee",
        };
        let mut counter = self.counter.lock().unwrap();
        *counter += 1;
        let token = format!("token-{}-{}", local, counter);
        let user = json!({
            "_id": format!("u-{}", local),
            "name": name,
            "email": email,
            "role": role,
        });
        self.issued.lock().unwrap().insert(token.clone(), user.clone());
        json!({ "token": token, "user": user })
    }

    fn handle(&self, method: Method, full_path: &str, auth: Option<String>, body: &[u8]) -> Response {
        let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: full_path.to_string(),
            authorization: auth.clone(),
            body: body.clone(),
        });

        let path = full_path.strip_prefix("/api").unwrap_or(full_path);

        match (method.as_str(), path) {
            ("POST", "/users/login") => {
                let email = body["email"].as_str().unwrap_or_default().to_string();
                if body["password"] != PASSWORD {
                    return respond(StatusCode::UNAUTHORIZED, json!({ "message": "Invalid email or password" }));
                }
                let local = email.split('@').next().unwrap_or_default().to_string();
                respond(StatusCode::OK, self.issue(&local, &capitalize(&local), &email))
            }
            ("POST", "/users/register") => {
                let email = body["email"].as_str().unwrap_or_default().to_string();
                if email == "taken@example.com" {
                    return respond(StatusCode::CONFLICT, json!({ "message": "Email already registered" }));
                }
                let name = body["name"].as_str().unwrap_or_default().to_string();
                respond(StatusCode::CREATED, self.issue("newcomer", &name, &email))
            }
            _ => {
                let user = auth
                    .as_deref()
                    .and_then(|h| h.strip_prefix("Bearer "))
                    .and_then(|token| self.issued.lock().unwrap().get(token).cloned());
                let Some(user) = user else {
                    return respond(StatusCode::UNAUTHORIZED, json!({ "message": "Not authorized, token failed" }));
                };
                self.authorized(method.as_str(), path, &user, &body)
            }
        }
    }

    fn authorized(&self, method: &str, path: &str, user: &Value, body: &Value) -> Response {
        let role = user["role"].as_str().unwrap_or_default();
        let required = if path.starts_with("/admin/") || (path.starts_with("/users") && path != "/users/me") {
            Some("admin")
        } else if path.starts_with("/teamlead/") {
            Some("teamlead")
        } else if path.starts_with("/employee/") {
            Some("employee")
        } else {
            None
        };
        if required.is_some_and(|r| r != role) {
            return respond(StatusCode::FORBIDDEN, json!({ "message": "Access denied" }));
        }

        match (method, path) {
            ("GET", "/users/me") => respond(StatusCode::OK, user.clone()),
            ("GET", "/users") => respond(StatusCode::OK, json!([user, employee_user()])),
            ("GET", "/admin/projects") | ("GET", "/teamlead/projects") => {
                respond(StatusCode::OK, json!([project()]))
            }
            ("POST", "/admin/projects") => respond(
                StatusCode::CREATED,
                json!({ "_id": "p2", "name": body["name"], "status": "planned" }),
            ),
            ("GET", "/teamlead/employees") => respond(StatusCode::OK, json!([employee_user()])),
            ("GET", "/employee/tasks") => respond(
                StatusCode::OK,
                json!([task("t1", "todo"), task("t2", "done"), task("t3", "in-progress")]),
            ),
            ("PATCH", "/employee/tasks/t1/status") => {
                let status = body["status"].as_str().unwrap_or("todo");
                respond(StatusCode::OK, task("t1", status))
            }
            ("GET", "/employee/assets") | ("GET", "/assets") => respond(
                StatusCode::OK,
                json!([{ "_id": "a1", "name": "Laptop", "category": "hardware", "status": "assigned" }]),
            ),
            ("DELETE", "/assets/a1") => warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT).into_response(),
            ("GET", "/reports") => respond(StatusCode::OK, json!([report()])),
            ("GET", "/reports/missing") => {
                respond(StatusCode::NOT_FOUND, json!({ "message": "Report not found" }))
            }
            ("GET", "/reports/broken") => respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Database unavailable" }),
            ),
            ("POST", "/reports") => {
                if body["project"] == "nope" {
                    return respond(
                        StatusCode::UNPROCESSABLE_ENTITY,
                        json!({ "message": "Project does not exist" }),
                    );
                }
                let mut created = report();
                created["title"] = body["title"].clone();
                respond(StatusCode::CREATED, created)
            }
            _ => respond(StatusCode::NOT_FOUND, json!({ "message": "Route not found" })),
        }
    }
}

fn respond(status: StatusCode, body: Value) -> Response {
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn employee_user() -> Value {
    json!({ "_id": "u-emp", "name": "Emp", "email": "emp@example.com", "role": "employee" })
}

fn project() -> Value {
    json!({ "_id": "p1", "name": "Website relaunch", "status": "active", "teamLead": "u-lead", "members": ["u-emp"] })
}

fn task(id: &str, status: &str) -> Value {
    json!({ "_id": id, "title": "Write copy", "status": status, "project": "p1", "assignee": "u-emp" })
}

fn report() -> Value {
    json!({ "_id": "r1", "title": "Week 42", "body": "All good", "author": "u-emp", "status": "submitted" })
}

pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<MockState>,
}

/// Start the mock backend on an ephemeral port. Endpoints live under `/api`.
pub fn start_backend() -> MockBackend {
    let state = Arc::new(MockState::default());
    let shared = state.clone();

    let routes = warp::any()
        .and(warp::method())
        .and(warp::path::full())
        .and(warp::header::optional::<String>("authorization"))
        .and(warp::body::bytes())
        .map(move |method: Method, path: FullPath, auth: Option<String>, body: Bytes| {
            shared.handle(method, path.as_str(), auth, &body)
        });

    let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    MockBackend {
        base_url: format!("http://{}/api", addr),
        state,
    }
}

/// Raw server that answers every request with a 401 whose body is cut off
/// before its declared length. Endpoints live under `/api`.
pub async fn start_truncated_unauthorized_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request).await;
            let _ = stream
                .write_all(
                    b"HTTP/1.1 401 Unauthorized\r\n\
                      Content-Type: application/json\r\n\
                      Content-Length: 200\r\n\r\n\
                      {\"message\":\"tok",
                )
                .await;
            let _ = stream.shutdown().await;
        }
    });

    format!("http://{}/api", addr)
}

pub struct Harness {
    pub ctx: AppContext,
    pub navigator: Arc<HistoryNavigator>,
    pub durable: Arc<MemoryStore>,
    pub cookies: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
}

pub fn start_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap(),
    ))
}

pub fn harness(base_url: &str) -> Harness {
    harness_with(
        base_url,
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
        start_clock(),
    )
}

/// Build a context on existing storage, as a restarted process would
pub fn harness_with(
    base_url: &str,
    durable: Arc<MemoryStore>,
    cookies: Arc<MemoryStore>,
    clock: Arc<ManualClock>,
) -> Harness {
    let navigator = Arc::new(HistoryNavigator::new());
    let config = ClientConfig::new(base_url).unwrap();
    let ctx = AppContext::with_storage(
        config,
        durable.clone(),
        cookies.clone(),
        clock.clone(),
        navigator.clone(),
    )
    .unwrap();
    Harness {
        ctx,
        navigator,
        durable,
        cookies,
        clock,
    }
}
