use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use std::{net::SocketAddr, sync::Arc};

use crate::{
    accounts, categories, dashboard, fixed_expenses, goals, parameters, reports, responsibles,
    transactions, types::Health,
};
use engine::Engine;

/// HTTP Basic credentials every request but `/health` must carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Default)]
pub struct ServerOptions {
    /// `None` leaves the API open.
    pub auth: Option<Credentials>,
    /// Origins allowed by CORS. `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    auth: Option<Arc<Credentials>>,
}

/// Compares without short-circuiting on the first differing byte. Only the
/// length leaks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

async fn auth(
    State(state): State<ServerState>,
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.auth.as_deref() else {
        return next.run(request).await;
    };

    let authorized = auth_header.is_some_and(|TypedHeader(header)| {
        let user_ok = constant_time_eq(header.username().as_bytes(), expected.username.as_bytes());
        let pass_ok = constant_time_eq(header.password().as_bytes(), expected.password.as_bytes());
        user_ok & pass_ok
    });
    if !authorized {
        tracing::debug!("rejected unauthenticated request to {}", request.uri().path());
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"financas\"")],
        )
            .into_response();
    }

    next.run(request).await
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_DISPOSITION]);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Build the application router.
pub fn router(engine: Engine, options: ServerOptions) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        auth: options.auth.map(Arc::new),
    };

    Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get_one)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/accounts/{id}",
            get(accounts::get_one)
                .put(accounts::update)
                .delete(accounts::delete),
        )
        .route(
            "/responsibles",
            get(responsibles::list).post(responsibles::create),
        )
        .route(
            "/responsibles/{id}",
            get(responsibles::get_one)
                .put(responsibles::update)
                .delete(responsibles::delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/groups/{dimension}",
            get(transactions::groups),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get_one)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/fixed-expenses",
            get(fixed_expenses::list).post(fixed_expenses::create),
        )
        .route("/fixed-expenses/checklist", get(fixed_expenses::checklist))
        .route(
            "/fixed-expenses/{id}",
            get(fixed_expenses::get_one)
                .put(fixed_expenses::update)
                .delete(fixed_expenses::delete),
        )
        .route(
            "/fixed-expenses/{id}/payment",
            post(fixed_expenses::set_payment),
        )
        .route("/goals", get(goals::list).post(goals::create))
        .route("/goals/progress", get(goals::progress))
        .route(
            "/goals/{id}",
            get(goals::get_one).put(goals::update).delete(goals::delete),
        )
        .route("/goals/{id}/contribute", post(goals::contribute))
        .route("/goals/{id}/withdraw", post(goals::withdraw))
        .route("/dashboard", get(dashboard::get))
        .route("/reports/export", get(reports::export))
        .route("/parameters", get(parameters::list))
        .route(
            "/parameters/{key}",
            get(parameters::get_one)
                .put(parameters::set)
                .delete(parameters::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/health", get(health))
        .layer(cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process stops.
pub async fn run(
    engine: Engine,
    options: ServerOptions,
    addr: SocketAddr,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_with_listener(engine, options, listener).await
}

pub async fn run_with_listener(
    engine: Engine,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, options)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, options, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
