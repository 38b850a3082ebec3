//! Bearer-token session check.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use crate::error::PayrollError;

use super::response::ApiErrorResponse;
use super::state::AppState;

/// Rejects requests without a live session and attaches the
/// [`Session`](crate::auth::Session) to the request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiErrorResponse> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| PayrollError::Unauthorized {
            message: "missing bearer token".to_string(),
        })
        .and_then(|token| {
            Uuid::parse_str(token.trim()).map_err(|_| PayrollError::Unauthorized {
                message: "malformed bearer token".to_string(),
            })
        });

    let session = match token.and_then(|token| state.sessions().validate(token)) {
        Ok(session) => session,
        Err(err) => {
            warn!(
                path = %request.uri().path(),
                error = %err,
                "Rejected unauthenticated request"
            );
            return Err(err.into());
        }
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
