//! JSON endpoints for managing the language registry.
//!
//! All routes live under the configured prefix and pass through the
//! configured route middleware (`auth`, `throttle`) in list order.

use crate::config::{Config, RouteMiddleware};
use crate::error::TranslationError;
use crate::languages::{Language, LanguageInput, LanguageManager};
use crate::rate_limit::RateLimiter;
use crate::security::bearer_matches;
use crate::validation::is_valid_language_code;
use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared state for every handler.
#[derive(Clone)]
pub struct AppState {
    pub languages: LanguageManager,
    pub config: Arc<Config>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(languages: LanguageManager, config: Config) -> Self {
        let limiter = RateLimiter::new(config.api.rate_limit);
        Self {
            languages,
            config: Arc::new(config),
            limiter: Arc::new(limiter),
        }
    }
}

/// Response envelope shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    fn with_message(message: &str, data: Option<T>) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data,
        }
    }
}

/// An error response; the message is what the client sees.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn invalid_code() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid language code format")
    }

    fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Language not found")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()> {
            success: false,
            message: Some(self.message),
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

/// Body for `PUT /languages/:code`; the code comes from the path.
#[derive(Debug, Deserialize)]
pub struct LanguageUpdate {
    pub name: String,
    #[serde(default)]
    pub native_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

/// Build the router with the configured prefix, middleware and request tracing.
pub fn router(state: AppState) -> Router {
    let mut routes = Router::new()
        .route("/languages", get(list_languages).post(store_language))
        .route("/languages/active", get(active_languages))
        .route(
            "/languages/:code",
            put(update_language).delete(delete_language),
        )
        .route("/languages/:code/toggle", patch(toggle_language));

    // The first middleware in the list sees the request first
    for layer in state.config.api.middleware.iter().rev() {
        routes = match layer {
            RouteMiddleware::Auth => {
                routes.layer(middleware::from_fn_with_state(state.clone(), require_token))
            }
            RouteMiddleware::Throttle => {
                routes.layer(middleware::from_fn_with_state(state.clone(), throttle))
            }
        };
    }

    let prefix = state.config.api.prefix.trim_end_matches('/');
    let app = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(prefix, routes)
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

// ==================== Middleware ====================

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let authorized = state
        .config
        .api
        .token
        .as_deref()
        .map(|expected| bearer_matches(auth_header, expected))
        .unwrap_or(false);

    if !authorized {
        warn!("Rejected unauthenticated request to {}", request.uri().path());
        return ApiError::new(StatusCode::UNAUTHORIZED, "Unauthenticated.").into_response();
    }

    next.run(request).await
}

async fn throttle(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let key = client_key(&request, state.config.api.trust_proxy);

    if !state.limiter.check(&key) {
        return ApiError::new(StatusCode::TOO_MANY_REQUESTS, "Too Many Attempts.").into_response();
    }

    next.run(request).await
}

/// Peer IP, or the first `x-forwarded-for` entry when the proxy is trusted.
/// Requests without connection info share one bucket.
fn client_key(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(client) = forwarded {
            return client.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "global".to_string())
}

// ==================== Handlers ====================

async fn list_languages(State(state): State<AppState>) -> ApiResult<Vec<Language>> {
    let languages = state.languages.all().await.map_err(|e| {
        error!("Error listing languages: {}", e);
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while loading languages",
        )
    })?;

    Ok((StatusCode::OK, Json(ApiResponse::data(languages))))
}

async fn active_languages(State(state): State<AppState>) -> ApiResult<Vec<Language>> {
    let languages = state.languages.active().await.map_err(|e| {
        error!("Error listing active languages: {}", e);
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while loading languages",
        )
    })?;

    Ok((StatusCode::OK, Json(ApiResponse::data(languages))))
}

async fn store_language(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LanguageInput>, JsonRejection>,
) -> ApiResult<Language> {
    let Json(input) = payload.map_err(|rejection| {
        warn!("Rejected language payload: {}", rejection.body_text());
        ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    })?;

    let language = save(&state, &input).await?;
    info!("✓ Saved language {}", language.language_code);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Language saved successfully",
            Some(language),
        )),
    ))
}

async fn update_language(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: std::result::Result<Json<LanguageUpdate>, JsonRejection>,
) -> ApiResult<Language> {
    if !is_valid_language_code(&code) {
        return Err(ApiError::invalid_code());
    }

    let Json(update) = payload.map_err(|rejection| {
        warn!("Rejected language payload: {}", rejection.body_text());
        ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    })?;

    let input = LanguageInput {
        language_code: code,
        name: update.name,
        native_name: update.native_name,
        is_active: update.is_active,
        sort_order: update.sort_order,
    };

    let language = save(&state, &input).await?;
    info!("✓ Updated language {}", language.language_code);

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_message(
            "Language saved successfully",
            Some(language),
        )),
    ))
}

async fn toggle_language(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<()> {
    if !is_valid_language_code(&code) {
        return Err(ApiError::invalid_code());
    }

    let toggled = state.languages.toggle(&code).await.map_err(|e| {
        error!("Error toggling language {}: {}", code, e);
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while updating the language status",
        )
    })?;

    if !toggled {
        return Err(ApiError::not_found());
    }

    info!("✓ Toggled language {}", code);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_message(
            "Language status updated successfully",
            None,
        )),
    ))
}

async fn delete_language(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<()> {
    if !is_valid_language_code(&code) {
        return Err(ApiError::invalid_code());
    }

    let deleted = state.languages.delete(&code).await.map_err(|e| {
        error!("Error deleting language {}: {}", code, e);
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while deleting the language",
        )
    })?;

    if !deleted {
        return Err(ApiError::not_found());
    }

    info!("✓ Deleted language {}", code);
    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_message("Language deleted successfully", None)),
    ))
}

/// Validate and persist, mapping failures onto client-safe responses
async fn save(state: &AppState, input: &LanguageInput) -> std::result::Result<Language, ApiError> {
    input.validate().map_err(|e| {
        warn!("Invalid language input: {}", e);
        ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
    })?;

    state.languages.save(input).await.map_err(|e| match e {
        TranslationError::Database(_) => {
            error!(
                "Database error saving language {}: {}",
                input.language_code, e
            );
            ApiError::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Language code already exists or database error occurred",
            )
        }
        e if e.is_validation() => ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        e => {
            error!(
                "Unexpected error saving language {}: {}",
                input.language_code, e
            );
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred while saving the language",
            )
        }
    })
}
