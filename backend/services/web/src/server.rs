//! Development server: the same dispatcher behind an axum router.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::{header, Method};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use famtree_config::AppConfig;
use famtree_db::family::sqlite_repository::SqliteFamilyRepository;
use tower_http::trace::TraceLayer;

use crate::dispatch::dispatch;
use crate::params::QueryParams;
use crate::reply::Reply;

const STYLESHEET: &str = include_str!("../static/styles.css");

#[derive(Clone)]
pub struct AppState {
    pub repo: SqliteFamilyRepository,
    pub config: Arc<AppConfig>,
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = self.status();
        let content_type = self.content_type();
        (status, [(header::CONTENT_TYPE, content_type)], self.into_body()).into_response()
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn styles() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

type Pairs = Vec<(String, String)>;

async fn index(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<Pairs>,
    form: Result<Form<Pairs>, FormRejection>,
) -> Reply {
    let mut params = QueryParams::from_pairs(query);
    // Form also reads the query string on GET, so only a POST body counts
    if method == Method::POST {
        match form {
            Ok(Form(body)) => params.extend(QueryParams::from_pairs(body)),
            Err(e) => tracing::debug!(error = %e, "post without a form body"),
        }
    }
    dispatch(&state.repo, &state.config, &params).await
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(index))
        .route("/health", get(health))
        .route("/styles.css", get(styles))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: AppConfig) -> ExitCode {
    let pool = match famtree_db::open_store(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, url = %config.database_url, "store unavailable");
            return ExitCode::FAILURE;
        }
    };

    let addr: SocketAddr = match config.bind_addr().parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.bind_addr(), "invalid bind address");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState {
        repo: SqliteFamilyRepository::new(pool.clone()),
        config: Arc::new(config),
    };
    let app = build_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(%addr, "listening");

    let result = axum::serve(listener, app).await;
    pool.close().await;
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}
