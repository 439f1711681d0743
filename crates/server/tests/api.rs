use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{Credentials, ServerOptions};

/// `user:pass` in base64.
const BASIC_USER_PASS: &str = "Basic dXNlcjpwYXNz";

async fn app(options: ServerOptions) -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::router(engine, options)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let (status, value) = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{uri}: {value}");
    value
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_open_when_auth_is_configured() {
    let app = app(ServerOptions {
        auth: Some(Credentials {
            username: "user".to_string(),
            password: "pass".to_string(),
        }),
        allowed_origins: vec![],
    })
    .await;

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _) = send(&app, Method::GET, "/categories", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/categories")
        .header(header::AUTHORIZATION, BASIC_USER_PASS)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/categories")
        .header(header::AUTHORIZATION, "Basic dXNlcjp3cm9uZw==")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Same-length credentials differing in one byte.
    for credentials in ["Basic dXNleDpwYXNz", "Basic dXNlcjpwYXN4"] {
        let request = Request::builder()
            .uri("/categories")
            .header(header::AUTHORIZATION, credentials)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn wildcard_origin_is_echoed_as_any() {
    let app = app(ServerOptions {
        auth: None,
        allowed_origins: vec!["*".to_string()],
    })
    .await;

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn listed_origin_is_allowed() {
    let app = app(ServerOptions {
        auth: None,
        allowed_origins: vec!["http://localhost:5173".to_string()],
    })
    .await;

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn categories_crud_and_conflicts() {
    let app = app(ServerOptions::default()).await;

    let food = create(
        &app,
        "/categories",
        json!({"name": "Mercado", "kind": "expense"}),
    )
    .await;
    assert_eq!(food["kind"], "expense");
    create(
        &app,
        "/categories",
        json!({"name": "Salário", "kind": "income"}),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/categories",
        Some(json!({"name": "  mercado ", "kind": "expense"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("mercado"));

    let (status, body) = send(&app, Method::GET, "/categories?kind=income", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Salário"]);

    let uri = format!("/categories/{}", id_of(&food));
    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"name": "Supermercado", "kind": "expense"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Supermercado");

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_names_are_rejected() {
    let app = app(ServerOptions::default()).await;

    for uri in ["/accounts", "/responsibles"] {
        let (status, body) = send(&app, Method::POST, uri, Some(json!({"name": "   "}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn transactions_flow_through_the_api() {
    let app = app(ServerOptions::default()).await;

    let category = create(
        &app,
        "/categories",
        json!({"name": "Mercado", "kind": "expense"}),
    )
    .await;
    let account = create(&app, "/accounts", json!({"name": "Nubank"})).await;
    let responsible = create(&app, "/responsibles", json!({"name": "Ana"})).await;

    let tx = create(
        &app,
        "/transactions",
        json!({
            "kind": "expense",
            "date": "2025-03-10",
            "amount_minor": 12550,
            "category_id": id_of(&category),
            "account_id": id_of(&account),
            "responsible_id": id_of(&responsible),
            "description": "  feira  "
        }),
    )
    .await;
    assert_eq!(tx["description"], "feira");
    assert_eq!(tx["amount_minor"], 12550);

    create(
        &app,
        "/transactions",
        json!({"kind": "expense", "date": "2025-04-02", "amount_minor": 1000}),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/transactions?year=2025&month=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::GET, "/transactions?year=2025", None).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-04-02", "2025-03-10"]);

    let (status, body) = send(
        &app,
        Method::GET,
        "/transactions/groups/categoria?kind=expense&year=2025&month=3",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Mercado");
    assert_eq!(body[0]["total_minor"], 12550);

    let (status, body) = send(&app, Method::GET, "/transactions/groups/weekday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown grouping dimension: weekday");

    let (status, _) = send(
        &app,
        Method::POST,
        "/transactions",
        Some(json!({"kind": "expense", "date": "2025-03-10", "amount_minor": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/categories/{}", id_of(&category)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/transactions/{}", id_of(&tx));
    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"kind": "expense", "date": "2025-03-11", "amount_minor": 9900})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2025-03-11");
    assert!(body["category_id"].is_null());

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fixed_expense_checklist_tracks_payments() {
    let app = app(ServerOptions::default()).await;

    let card = create(&app, "/accounts", json!({"name": "Cartão XP"})).await;
    let rent = create(
        &app,
        "/fixed-expenses",
        json!({"description": "Aluguel", "amount_minor": 150000, "due_day": 5}),
    )
    .await;
    assert_eq!(rent["payment_method"], "debit");
    let streaming = create(
        &app,
        "/fixed-expenses",
        json!({
            "description": "Streaming",
            "amount_minor": 5590,
            "due_day": 20,
            "account_id": id_of(&card)
        }),
    )
    .await;
    assert_eq!(streaming["payment_method"], "credit");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/fixed-expenses/{}/payment", id_of(&rent)),
        Some(json!({"year": 2025, "month": 3, "paid": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paid"], true);
    assert!(body["paid_on"].is_string());

    let (status, body) = send(
        &app,
        Method::GET,
        "/fixed-expenses/checklist?year=2025&month=3",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["credit_total_minor"], 5590);
    assert_eq!(body["debit_total_minor"], 150000);
    assert_eq!(body["paid_total_minor"], 150000);
    assert_eq!(body["pending_total_minor"], 5590);
    assert_eq!(body["items"][0]["expense"]["description"], "Aluguel");
    assert_eq!(body["items"][0]["paid"], true);
    assert_eq!(body["items"][1]["paid"], false);

    let (status, body) = send(
        &app,
        Method::GET,
        "/fixed-expenses/checklist?year=2025&month=4",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paid_total_minor"], 0);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/fixed-expenses/{}/payment", id_of(&rent)),
        Some(json!({"year": 2025, "month": 13, "paid": true})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn goals_accept_decimal_amounts() {
    let app = app(ServerOptions::default()).await;

    let goal = create(
        &app,
        "/goals",
        json!({"description": "Viagem", "target_minor": 10000, "month": 12, "year": 2025}),
    )
    .await;
    assert_eq!(goal["kind"], "savings");
    assert_eq!(goal["active"], true);
    let id = id_of(&goal);

    let tx = create(&app, &format!("/goals/{id}/contribute?amount=12,50"), json!({})).await;
    assert_eq!(tx["kind"], "goal_transfer");
    assert_eq!(tx["amount_minor"], 1250);
    assert_eq!(tx["description"], "Transferência para meta: Viagem");

    let (status, body) = send(&app, Method::GET, "/goals/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["achieved_minor"], 1250);
    assert_eq!(body[0]["percent"], 12.5);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/goals/{id}/withdraw?amount=20"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/goals/{id}/contribute?amount=abc"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::DELETE, &format!("/goals/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn dashboard_respects_the_start_parameter() {
    let app = app(ServerOptions::default()).await;

    create(
        &app,
        "/transactions",
        json!({"kind": "income", "date": "2025-03-02", "amount_minor": 500000}),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/dashboard?year=2025&month=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_null());
    assert_eq!(body["total_income_minor"], 500000);
    assert_eq!(body["monthly"].as_array().unwrap().len(), 12);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/parameters/dashboard.start",
        Some(json!({"value": "2025-04"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/dashboard?year=2025&month=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert_eq!(body["total_income_minor"], 0);
}

#[tokio::test]
async fn parameters_crud() {
    let app = app(ServerOptions::default()).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/parameters/theme",
        Some(json!({"value": "dark"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "theme");

    let (status, body) = send(&app, Method::GET, "/parameters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/parameters/dashboard.start",
        Some(json!({"value": "march"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::DELETE, "/parameters/theme", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::GET, "/parameters/theme", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn export_is_served_as_csv_attachment() {
    let app = app(ServerOptions::default()).await;

    create(
        &app,
        "/transactions",
        json!({"kind": "expense", "date": "2025-03-10", "amount_minor": 12550, "description": "feira"}),
    )
    .await;

    let request = Request::builder()
        .uri("/reports/export?year=2025&month=3")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"relatorio-lancamentos-3-2025.csv\""
    );
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let csv = String::from_utf8(bytes.to_vec()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Data,Tipo,Categoria,Descrição,Valor,Conta/Cartão,Responsável")
    );
    assert!(lines.next().unwrap().contains("feira"));
}

#[tokio::test]
async fn spawned_server_answers_health() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = server::spawn_with_listener(engine, ServerOptions::default(), listener).unwrap();

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("\"status\":\"ok\""));
}
