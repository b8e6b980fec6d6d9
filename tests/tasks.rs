use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use taskhub::auth::{BcryptHasher, JwtTokenService};
use taskhub::directory::InMemoryUserDirectory;
use taskhub::routes;
use taskhub::state::AppState;
use taskhub::store::InMemoryTaskStore;

fn test_state() -> AppState {
    AppState::new(
        Arc::new(InMemoryUserDirectory::new()),
        Arc::new(InMemoryTaskStore::new()),
        // bcrypt's MIN_COST (4) is private; inline it to keep tests fast.
        Arc::new(BcryptHasher::with_cost(4)),
        Arc::new(JwtTokenService::new("task-test-secret")),
    )
}

async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("response body was not JSON")
    };
    (status, json)
}

/// Registers the first (admin) and second (plain) user, logs both in, and
/// returns their bearer tokens.
async fn seed_users<S, B>(app: &S) -> (String, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    for (username, password) in [("admin", "adminpw"), ("member", "memberpw")] {
        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({"username": username, "password": password}))
            .to_request();
        let (status, _) = send(app, req).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let mut tokens = Vec::new();
    for (username, password) in [("admin", "adminpw"), ("member", "memberpw")] {
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"username": username, "password": password}))
            .to_request();
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        tokens.push(body["token"].as_str().unwrap().to_string());
    }

    let member = tokens.pop().unwrap();
    let admin = tokens.pop().unwrap();
    (admin, member)
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[test_log::test(actix_rt::test)]
async fn test_task_crud_as_admin() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;
    let (admin, _) = seed_users(&app).await;

    // Create.
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&admin))
        .set_json(json!({
            "title": "Ship the release",
            "description": "Cut the tag and publish",
            "status": "todo"
        }))
        .to_request();
    let (status, created) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Ship the release");
    assert_eq!(created["status"], "todo");
    let id = created["id"].as_str().unwrap().to_string();

    // List.
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header(bearer(&admin))
        .to_request();
    let (status, listed) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());

    // Read one.
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", id))
        .append_header(bearer(&admin))
        .to_request();
    let (status, fetched) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Ship the release");

    // Update.
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .append_header(bearer(&admin))
        .set_json(json!({
            "title": "Ship the release",
            "description": "Published",
            "status": "done"
        }))
        .to_request();
    let (status, updated) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "done");
    assert_eq!(updated["description"], "Published");

    // Delete, then confirm it is gone.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", id))
        .append_header(bearer(&admin))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", id))
        .append_header(bearer(&admin))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "task not found");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", id))
        .append_header(bearer(&admin))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test_log::test(actix_rt::test)]
async fn test_task_writes_require_admin() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;
    let (admin, member) = seed_users(&app).await;

    // A plain user can read.
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .append_header(bearer(&member))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);

    // But cannot write.
    let payload = json!({"title": "Forbidden", "status": "todo"});

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&member))
        .set_json(payload.clone())
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "insufficient permissions, admin access required");

    // Set up a real task as the admin so update/delete hit the gate, not a 404.
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .append_header(bearer(&admin))
        .set_json(payload.clone())
        .to_request();
    let (status, created) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .append_header(bearer(&member))
        .set_json(payload)
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", id))
        .append_header(bearer(&member))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[test_log::test(actix_rt::test)]
async fn test_task_routes_require_authentication() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/tasks").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing or malformed token");

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .set_json(json!({"title": "x", "status": "todo"}))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[test_log::test(actix_rt::test)]
async fn test_create_task_validates_input() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .wrap(Logger::default())
            .configure(routes::config),
    )
    .await;
    let (admin, _) = seed_users(&app).await;

    let cases = vec![
        (json!({"title": "", "status": "todo"}), "empty title"),
        (json!({"status": "todo"}), "missing title"),
        (
            json!({"title": "ok", "status": "someday"}),
            "unknown status",
        ),
        (
            json!({"title": "ok", "status": "todo", "description": "d".repeat(1001)}),
            "description too long",
        ),
    ];

    for (payload, description) in cases {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .append_header(bearer(&admin))
            .set_json(payload)
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "expected 400 for case: {}",
            description
        );
    }
}
