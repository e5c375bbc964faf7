use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePathLayer;

pub mod dashboard_handlers;
pub mod dto;
pub mod upload_handlers;

// ---------- shared state ----------

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

// ---------- error type ----------

/// A JSON error response: `{"error": "..."}` with an HTTP status.
pub struct ApiErr(StatusCode, String);

impl ApiErr {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self(status, msg.into())
    }

    pub fn internal(e: impl std::fmt::Display) -> Self {
        Self(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(StatusCode::BAD_REQUEST, msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(StatusCode::NOT_FOUND, msg.into())
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.1 });
        (self.0, Json(body)).into_response()
    }
}

// ---------- router ----------

pub fn app_router(state: AppState) -> Router {
    let allowed_origins: Vec<HeaderValue> = std::env::var("RD_CORS_ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173".to_string())
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let cors = if allowed_origins.is_empty() {
        CorsLayer::new() // no origins allowed = same-origin only
    } else {
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .nest("/api", api())
        .layer(cors)
        .layer(NormalizePathLayer::trim_trailing_slash())
        .with_state(state)
}

fn api() -> Router<AppState> {
    Router::new()
        // ingestion
        .route("/upload", post(upload_handlers::upload_workbook))
        .route("/uploads", get(upload_handlers::list_uploads))
        .route("/uploads/{id}", delete(upload_handlers::delete_upload))
        // dashboard reads
        .route("/dashboard/kpis", get(dashboard_handlers::kpis))
        .route("/dashboard/charts", get(dashboard_handlers::charts))
        .route("/dashboard/body-map", get(dashboard_handlers::body_map))
        .route("/dashboard/trends", get(dashboard_handlers::trends))
        .route("/dashboard/incidents", get(dashboard_handlers::list_incidents))
}
