//! HTTP API handlers using axum.
//!
//! Routes:
//! - `GET /` renders the requested services in the requested format
//! - `POST /service` registers a new service
//! - `POST /service/status` replaces a service's status (raw request body)
//! - `DELETE /service` removes a service
//!
//! Mutating routes check the token before anything else, then validate the
//! service ID, then touch the registry. Reads require no token.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use livestat_common::{Error, Result, ServiceId};
use serde::Deserialize;
use std::sync::Arc;
use tracing::error;

use crate::{
    auth::authorize,
    config::ServerConfig,
    render::{self, split_services, Format},
    storage::Registry,
    types::ErrorResponse,
};

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub config: Arc<ServerConfig>,
}

/// Creates the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(render_handler))
        .route("/service", post(create_handler).delete(delete_handler))
        .route("/service/status", post(update_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct RenderQuery {
    /// Comma-separated service IDs. Defaults to the empty string, which
    /// splits to one empty-string ID and matches nothing.
    #[serde(default)]
    services: String,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MutationQuery {
    token: Option<String>,
    id: Option<String>,
}

/// Renders the current status of the requested services.
async fn render_handler(
    State(state): State<AppState>,
    Query(query): Query<RenderQuery>,
) -> std::result::Result<Response, ApiError> {
    // An absent or empty format parameter means the default.
    let format = match query.format.as_deref() {
        Some("") | None => Format::default(),
        Some(raw) => Format::parse(raw)?,
    };

    let ids = split_services(&query.services);
    let records = state.registry.snapshot(&ids).await;
    let body = render::render(format, &ids, &records);

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type()),
            (header::CACHE_CONTROL, render::CACHE_CONTROL),
        ],
        body,
    )
        .into_response())
}

/// Registers a new service with an empty status.
async fn create_handler(
    State(state): State<AppState>,
    Query(query): Query<MutationQuery>,
) -> std::result::Result<StatusCode, ApiError> {
    authorize(query.token.as_deref(), &state.config.master_token)?;
    let id = validated_id(query.id)?;

    state.registry.create(id).await?;
    Ok(StatusCode::OK)
}

/// Replaces a service's status with the raw request body, decoded as text.
async fn update_handler(
    State(state): State<AppState>,
    Query(query): Query<MutationQuery>,
    body: String,
) -> std::result::Result<StatusCode, ApiError> {
    authorize(query.token.as_deref(), &state.config.master_token)?;
    let id = validated_id(query.id)?;

    state.registry.update(&id, body).await?;
    Ok(StatusCode::OK)
}

/// Removes a service.
async fn delete_handler(
    State(state): State<AppState>,
    Query(query): Query<MutationQuery>,
) -> std::result::Result<StatusCode, ApiError> {
    authorize(query.token.as_deref(), &state.config.master_token)?;
    let id = validated_id(query.id)?;

    state.registry.delete(&id).await?;
    Ok(StatusCode::OK)
}

/// Checks the ID of a mutating request. Runs after the token check so an
/// unauthorized caller learns nothing from the response.
fn validated_id(raw: Option<String>) -> Result<ServiceId> {
    let id = ServiceId::new(raw.unwrap_or_default());
    if !id.is_valid() {
        return Err(Error::invalid_id(id.as_str()));
    }
    Ok(id)
}

/// API error wrapper mapping registry errors onto HTTP statuses.
///
/// `Persistence`/`Io` never reach this type on the request path; the 500
/// arm exists for completeness only.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::AlreadyExists { .. } => StatusCode::CONFLICT,
            // A missing ID on update/delete is reported as a bad request,
            // not as 404.
            Error::NotFound { .. } | Error::InvalidId { .. } | Error::InvalidFormat { .. } => {
                StatusCode::BAD_REQUEST
            }
            Error::Persistence { .. } | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.0.to_string();
        error!("API error: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::util::ServiceExt; // for `oneshot`

    fn app() -> Router {
        let config = ServerConfig::new("secret123");
        let state = AppState {
            registry: Arc::new(Registry::new(SnapshotStore::disabled())),
            config: Arc::new(config),
        };
        create_router(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Body) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap();
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_render_json() {
        let app = app();

        let response = send(&app, "POST", "/service?token=secret123&id=web1", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, "GET", "/?services=web1&format=json", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=300");

        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["web1"]["status"], "");
        assert!(body["web1"]["lastUpdated"].is_string());
    }

    #[tokio::test]
    async fn test_create_wrong_token_leaves_registry_untouched() {
        let app = app();

        let response = send(&app, "POST", "/service?token=wrong&id=web1", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = send(&app, "GET", "/?services=web1&format=json", Body::empty()).await;
        assert_eq!(body_string(response).await, "{}");
    }

    #[tokio::test]
    async fn test_create_missing_token_rejected() {
        let app = app();

        let response = send(&app, "POST", "/service?id=web1", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_conflict() {
        let app = app();

        send(&app, "POST", "/service?token=secret123&id=web1", Body::empty()).await;
        let response = send(&app, "POST", "/service?token=secret123&id=web1", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_update_status_from_body() {
        let app = app();

        send(&app, "POST", "/service?token=secret123&id=web1", Body::empty()).await;
        let response = send(
            &app,
            "POST",
            "/service/status?token=secret123&id=web1",
            Body::from("all good <i>mostly</i>"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, "GET", "/?services=web1", Body::empty()).await;
        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["web1"]["status"], "all good <i>mostly</i>");
    }

    #[tokio::test]
    async fn test_update_missing_service() {
        let app = app();

        let response = send(
            &app,
            "POST",
            "/service/status?token=secret123&id=ghost",
            Body::from("up"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_flow() {
        let app = app();

        send(&app, "POST", "/service?token=secret123&id=web1", Body::empty()).await;
        let response = send(&app, "DELETE", "/service?token=secret123&id=web1", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(&app, "DELETE", "/service?token=secret123&id=web1", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_format_rejected() {
        let app = app();

        let response = send(&app, "GET", "/?services=a&format=xml", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_format_defaults_to_json() {
        let app = app();

        let response = send(&app, "GET", "/?services=a", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let response = send(&app, "GET", "/?services=a&format=", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_invalid_id_rejected() {
        let app = app();

        let response = send(
            &app,
            "POST",
            "/service?token=secret123&id=..%2Fetc%2Fpasswd",
            Body::empty(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(&app, "POST", "/service?token=secret123&id=", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_token_checked_before_id() {
        let app = app();

        // Invalid ID but also invalid token: the token failure wins.
        let response = send(&app, "POST", "/service?token=wrong&id=", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_html_renders_only_present_services() {
        let app = app();

        send(&app, "POST", "/service?token=secret123&id=a", Body::empty()).await;
        let response = send(&app, "GET", "/?services=a,b&format=html", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");

        let body = body_string(response).await;
        assert_eq!(body.matches("<tr><td>").count(), 1);
    }

    #[tokio::test]
    async fn test_plaintext_content_type() {
        let app = app();

        send(&app, "POST", "/service?token=secret123&id=a", Body::empty()).await;
        let response = send(&app, "GET", "/?services=a&format=plaintext", Body::empty()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");

        let body = body_string(response).await;
        assert!(body.starts_with("a\nsince: "));
    }
}
