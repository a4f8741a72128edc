use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use nuptial::{AppState, Config, Store, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    build_router(AppState::new(Config::new(), Store::in_memory()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

async fn create_faq(app: &Router, question: &str, category: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/faqs",
        Some(json!({ "question": question, "answer": "Yes.", "category": category })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["faq"].clone()
}

async fn orders_in(app: &Router, category: &str) -> Vec<(String, u64)> {
    let (_, body) = send(app, Method::GET, &format!("/api/faqs?category={category}"), None).await;
    body["faqs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| (f["question"].as_str().unwrap().to_string(), f["order"].as_u64().unwrap()))
        .collect()
}

#[tokio::test]
async fn faq_reorder_and_delete_scenario() {
    let app = app();
    let first = create_faq(&app, "q1", "general").await;
    create_faq(&app, "q2", "general").await;
    create_faq(&app, "q3", "general").await;
    assert_eq!(first["order"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/faqs/reorder",
        Some(json!({ "id": first["id"], "direction": "down" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "FAQ moved down successfully");
    assert_eq!(
        orders_in(&app, "general").await,
        vec![("q2".into(), 1), ("q1".into(), 2), ("q3".into(), 3)]
    );

    let uri = format!("/api/faqs/{}", first["id"].as_str().unwrap());
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders_in(&app, "general").await, vec![("q2".into(), 1), ("q3".into(), 2)]);

    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "FAQ not found");
}

#[tokio::test]
async fn boundary_reorder_is_informational() {
    let app = app();
    let only = create_faq(&app, "q1", "general").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/faqs/reorder",
        Some(json!({ "id": only["id"], "direction": "up" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "FAQ is already at the top position");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/faqs/reorder",
        Some(json!({ "id": only["id"], "direction": "down" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "FAQ is already at the bottom position");
}

#[tokio::test]
async fn reorder_rejects_bad_input() {
    let app = app();
    let faq = create_faq(&app, "q1", "general").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/faqs/reorder",
        Some(json!({ "id": faq["id"], "direction": "sideways" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Direction must be 'up' or 'down'");

    let (status, _) =
        send(&app, Method::POST, "/api/faqs/reorder", Some(json!({ "direction": "up" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/faqs/reorder",
        Some(json!({ "id": "00000000-0000-4000-8000-000000000000", "direction": "up" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_faq_validation_and_malformed_bodies() {
    let app = app();
    let (status, body) =
        send(&app, Method::POST, "/api/faqs", Some(json!({ "question": "q", "answer": "a" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("category"));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/faqs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/faqs/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid FAQ ID");
}

#[tokio::test]
async fn category_change_on_update_reassigns() {
    let app = app();
    create_faq(&app, "g1", "general").await;
    let mover = create_faq(&app, "g2", "general").await;
    create_faq(&app, "g3", "general").await;
    create_faq(&app, "s1", "services").await;
    create_faq(&app, "s2", "services").await;

    let uri = format!("/api/faqs/{}", mover["id"].as_str().unwrap());
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "category": "services" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["faq"]["category"], "services");
    assert_eq!(body["faq"]["order"], 3);

    assert_eq!(orders_in(&app, "general").await, vec![("g1".into(), 1), ("g3".into(), 2)]);
    assert_eq!(
        orders_in(&app, "services").await,
        vec![("s1".into(), 1), ("s2".into(), 2), ("g2".into(), 3)]
    );
}

#[tokio::test]
async fn category_lifecycle_with_delete_guard() {
    let app = app();
    let (status, body) =
        send(&app, Method::POST, "/api/faqs/categories", Some(json!({ "name": "general" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["category"]["id"].as_str().unwrap().to_string();

    let (status, _) =
        send(&app, Method::POST, "/api/faqs/categories", Some(json!({ "name": "GENERAL" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    create_faq(&app, "q1", "general").await;
    create_faq(&app, "q2", "general").await;

    let uri = format!("/api/faqs/categories/{id}");
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["count"], 2);

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "name": "basics" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"]["name"], "basics");
    assert_eq!(orders_in(&app, "basics").await.len(), 2);
    assert!(orders_in(&app, "general").await.is_empty());

    let (_, body) = send(&app, Method::GET, "/api/faqs", None).await;
    for faq in body["faqs"].as_array().unwrap() {
        let uri = format!("/api/faqs/{}", faq["id"].as_str().unwrap());
        send(&app, Method::DELETE, &uri, None).await;
    }
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/api/faqs/categories", None).await;
    assert!(body["categories"].as_array().unwrap().is_empty());
}

fn service_body(slug: &str, title: &str) -> Value {
    json!({
        "slug": slug,
        "title": title,
        "description": "Guidance for couples",
        "icon": "heart",
        "coverImage": "/uploads/cover.jpg"
    })
}

#[tokio::test]
async fn services_enforce_unique_slugs() {
    let app = app();
    let (status, body) =
        send(&app, Method::POST, "/api/services", Some(service_body("counselling", "Counselling"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["service"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["service"]["isActive"], true);

    let (status, _) =
        send(&app, Method::POST, "/api/services", Some(service_body("counselling", "Again"))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(&app, Method::POST, "/api/services", Some(service_body("astrology", "Astrology"))).await;
    let (_, body) = send(&app, Method::GET, "/api/services", None).await;
    let titles: Vec<&str> = body["services"].as_array().unwrap().iter().map(|s| s["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Astrology", "Counselling"]);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/services/counselling",
        Some(json!({ "slug": "astrology" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/services/id/{id}"),
        Some(json!({ "slug": "premarital-counselling", "title": "Pre-marital counselling" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"]["slug"], "premarital-counselling");

    let (status, body) = send(&app, Method::GET, "/api/services/premarital-counselling", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"]["title"], "Pre-marital counselling");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/services/id/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serviceId"], id.as_str());

    let (status, _) = send(&app, Method::GET, "/api/services/premarital-counselling", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blog_detail_renders_markdown() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(json!({
            "slug": "first-year",
            "title": "The first year",
            "summary": "What to expect",
            "content": "# The first year\n\nTalk **often**.",
            "author": "Editorial team",
            "coverImage": "/uploads/first-year.jpg",
            "tags": ["advice"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::GET, "/api/blogs/first-year", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["html"].as_str().unwrap().contains("<strong>often</strong>"));
    assert_eq!(body["blog"]["tags"], json!(["advice"]));

    let (status, _) = send(&app, Method::POST, "/api/blogs", Some(json!({ "slug": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::DELETE, "/api/blogs/first-year", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = send(&app, Method::GET, "/api/blogs", None).await;
    assert!(body["blogs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn contact_submission_and_status() {
    let app = app();
    let (status, _) =
        send(&app, Method::POST, "/api/contacts", Some(json!({ "name": "Asha", "message": "hi" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/contacts",
        Some(json!({ "name": "Asha", "email": "asha@example.org", "message": "Please call me" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Your message has been received");
    assert_eq!(body["contact"]["status"], "new");
    let uri = format!("/api/contacts/{}", body["contact"]["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "status": "responded" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["contact"]["status"], "responded");

    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({ "status": "lost" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/api/monitor", None).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["stats"]["contacts"], 1);
    assert_eq!(body["stats"]["faqs"], 0);
}

#[tokio::test]
async fn data_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config { data_dir: dir.path().to_path_buf(), ..Config::new() };

    {
        let app = build_router(AppState::new(config.clone(), Store::from_config(&config).await.unwrap()));
        create_faq(&app, "q1", "general").await;
        create_faq(&app, "q2", "general").await;
    }

    let app = build_router(AppState::new(config.clone(), Store::from_config(&config).await.unwrap()));
    create_faq(&app, "q3", "general").await;
    assert_eq!(
        orders_in(&app, "general").await,
        vec![("q1".into(), 1), ("q2".into(), 2), ("q3".into(), 3)]
    );
}

#[tokio::test]
async fn rejected_faq_update_leaves_document_unchanged() {
    let app = app();
    let faq = create_faq(&app, "original", "general").await;
    let uri = format!("/api/faqs/{}", faq["id"].as_str().unwrap());

    let (status, body) =
        send(&app, Method::PUT, &uri, Some(json!({ "question": "changed", "order": 9 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Order must be between 1 and 1");

    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["faq"], faq);
}

#[tokio::test]
async fn user_management() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "username": "admin", "email": "admin@example.org", "password": "secret", "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"].get("password").is_none());
    assert_eq!(body["user"]["isVerified"], false);
    let uri = format!("/api/users/{}", body["user"]["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({ "username": "Admin", "email": "x@example.org", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User with this email or username already exists");

    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({ "isVerified": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["isVerified"], true);

    let (_, body) = send(&app, Method::GET, "/api/users", None).await;
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].get("password").is_none());

    let (_, body) = send(&app, Method::GET, "/api/monitor", None).await;
    assert_eq!(body["stats"]["users"], 1);

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}
