//! HTTP surface of the gateway.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /api/posts/{id}/engagement` | `200` [`Engagement`], `400`/`502` [`ErrorBody`] |
//! | anything else | `404` [`ErrorBody`] |

use std::future::Future;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    client::Client,
    engagement::Engagement,
    error::EngagementError,
    meta::{InvalidPostId, PostId},
};

/// Message for a path `id` that isn't a positive integer.
pub const INVALID_POST_ID_MESSAGE: &str = "id de post inválido";

/// Message for a route that doesn't exist.
pub const NOT_FOUND_MESSAGE: &str = "Ruta no encontrada";

/// JSON body of every non-success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human readable reason.
    pub message: String,
    /// Diagnostic detail, only for upstream calls that failed outright.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            detail: None,
        }
    }
}

#[derive(Debug, Error)]
enum ApiError {
    #[error(transparent)]
    InvalidPostId(#[from] InvalidPostId),
    #[error(transparent)]
    Gateway(#[from] EngagementError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidPostId(err) => {
                tracing::debug!(error = %err, "rejected engagement request");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody::new(INVALID_POST_ID_MESSAGE)),
                )
                    .into_response()
            }
            Self::Gateway(err) => {
                let detail = err.detail();
                tracing::warn!(
                    service = %err.service(),
                    error = %err,
                    detail = detail.as_deref().unwrap_or_default(),
                    "engagement aggregation failed"
                );
                let body = ErrorBody {
                    message: err.message().to_owned(),
                    detail,
                };
                (StatusCode::BAD_GATEWAY, Json(body)).into_response()
            }
        }
    }
}

/// Builds the gateway router around a shared upstream [`Client`].
pub fn router(client: Client) -> Router {
    Router::new()
        .route("/api/posts/{id}/engagement", get(engagement))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(client)
}

/// Serves [`router`] on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, client: Client, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(client))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn engagement(
    State(client): State<Client>,
    Path(id): Path<String>,
) -> Result<Json<Engagement>, ApiError> {
    let post = id.parse::<PostId>()?;
    let engagement = client.engagement(post).await?;
    Ok(Json(engagement))
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new(NOT_FOUND_MESSAGE)))
}
