use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use engine::Engine;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(engine)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let res = app.clone().oneshot(request).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn error_of(body: &[u8]) -> String {
    let value: Value = serde_json::from_slice(body).unwrap();
    value["error"].as_str().unwrap().to_string()
}

fn expense_body(days_ago: i64, category: &str, amount_minor: i64, comment: &str) -> Value {
    json!({
        "date": (Utc::now() - Duration::days(days_ago)).to_rfc3339(),
        "category": category,
        "amount_minor": amount_minor,
        "currency": "USD",
        "comment": comment,
        "user": {
            "first_name": "Anthony",
            "last_name": "Stark",
            "currency": "USD",
        },
    })
}

async fn stark_id(app: &Router) -> Uuid {
    let (status, body) = send(
        app,
        post_json(
            "/api/users",
            &json!({ "first_name": "Anthony", "last_name": "Stark", "currency": "USD" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let value: Value = serde_json::from_slice(&body).unwrap();
    value["id"].as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn expense_is_created_then_listed() {
    let app = app().await;
    let user_id = stark_id(&app).await;

    let (status, body) = send(
        &app,
        post_json("/api/expenses", &expense_body(1, "Restaurant", 10_000, "Dinner")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, b"Expense created successfully.");

    let (status, body) = send(&app, get(&format!("/api/expenses/{user_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let list: Value = serde_json::from_slice(&body).unwrap();
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["category"], "Restaurant");
    assert_eq!(list[0]["amount_minor"], 10_000);
    assert_eq!(list[0]["currency"], "USD");
    assert_eq!(list[0]["comment"], "Dinner");
    assert_eq!(list[0]["user_full_name"], "Anthony Stark");
}

#[tokio::test]
async fn duplicate_expense_is_a_conflict() {
    let app = app().await;
    let body = expense_body(1, "Hotel", 25_000, "Two nights");

    let (status, _) = send(&app, post_json("/api/expenses", &body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, post_json("/api/expenses", &body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error_of(&body).ends_with("and amount 250.00 has already been declared."));
}

#[tokio::test]
async fn invalid_expense_is_a_bad_request() {
    let app = app().await;

    let (status, body) = send(
        &app,
        post_json("/api/expenses", &expense_body(1, "Misc", 0, "Nothing")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_of(&body),
        "Amount must be greater than zero. Provided amount: 0.00."
    );

    let (status, body) = send(
        &app,
        post_json("/api/expenses", &expense_body(1, "Misc", 1_000, "   ")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Comment is mandatory.");

    let mut mismatch = expense_body(1, "Misc", 1_000, "Taxi");
    mismatch["currency"] = json!("EUR");
    let (status, _) = send(&app, post_json("/api/expenses", &mismatch)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut unknown = expense_body(1, "Misc", 1_000, "Taxi");
    unknown["currency"] = json!("XYZ");
    let (status, body) = send(&app, post_json("/api/expenses", &unknown)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "The expense currency (XYZ) isn't recognized.");
}

#[tokio::test]
async fn amount_is_checked_before_codes() {
    let app = app().await;
    let mut body = expense_body(1, "Taxi", 0, "Ride");
    body["currency"] = json!("XYZ");

    let (status, body) = send(&app, post_json("/api/expenses", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_of(&body),
        "Amount must be greater than zero. Provided amount: 0.00."
    );
}

#[tokio::test]
async fn malformed_requests_answer_json_errors() {
    let app = app().await;

    let (status, body) = send(&app, get("/api/expenses/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_of(&body).is_empty());

    let (status, body) = send(&app, get("/api/users/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_of(&body).is_empty());

    let mut missing = expense_body(1, "Misc", 1_000, "Taxi");
    missing.as_object_mut().unwrap().remove("comment");
    let (status, body) = send(&app, post_json("/api/expenses", &missing)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_of(&body).contains("comment"));

    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_of(&body).is_empty());
}

#[tokio::test]
async fn expenses_are_sorted_by_query() {
    let app = app().await;
    let user_id = stark_id(&app).await;
    for (days_ago, amount, comment) in [(3, 3_000, "Taxi"), (1, 9_000, "Dinner"), (2, 1_000, "Coffee")] {
        let (status, _) = send(
            &app,
            post_json("/api/expenses", &expense_body(days_ago, "Misc", amount, comment)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &app,
        get(&format!("/api/expenses/{user_id}?sortBy=amount&sortOrder=desc")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let list: Value = serde_json::from_slice(&body).unwrap();
    let amounts: Vec<i64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["amount_minor"].as_i64().unwrap())
        .collect();
    assert_eq!(amounts, [9_000, 3_000, 1_000]);

    let (_, body) = send(&app, get(&format!("/api/expenses/{user_id}"))).await;
    let list: Value = serde_json::from_slice(&body).unwrap();
    let comments: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["comment"].as_str().unwrap())
        .collect();
    assert_eq!(comments, ["Taxi", "Coffee", "Dinner"]);
}

#[tokio::test]
async fn invalid_sort_parameter_is_a_bad_request() {
    let app = app().await;
    let user_id = stark_id(&app).await;

    let (status, body) = send(
        &app,
        get(&format!("/api/expenses/{user_id}?sortBy=invalidSort")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Invalid sort parameter.");
}

#[tokio::test]
async fn no_expenses_is_not_found() {
    let app = app().await;
    let user_id = stark_id(&app).await;

    let (status, body) = send(&app, get(&format!("/api/expenses/{user_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        error_of(&body),
        format!("No expenses found for user with ID {user_id}.")
    );

    let unknown = Uuid::new_v4();
    let (status, body) = send(&app, get(&format!("/api/expenses/{unknown}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        error_of(&body),
        format!("No expenses found for user with ID {unknown}.")
    );
}

#[tokio::test]
async fn users_are_created_and_fetched() {
    let app = app().await;
    let user_id = stark_id(&app).await;

    let (status, body) = send(&app, get(&format!("/api/users/{user_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let user: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(user["first_name"], "Anthony");
    assert_eq!(user["currency"], "USD");

    let (status, _) = send(
        &app,
        post_json(
            "/api/users",
            &json!({ "first_name": "Anthony", "last_name": "Stark", "currency": "USD" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let unknown = Uuid::new_v4();
    let (status, body) = send(&app, get(&format!("/api/users/{unknown}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_of(&body), format!("User with ID {unknown} not found."));
}
