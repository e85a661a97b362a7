use crate::{AppState, error::AppError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Admits a request only when the identity header set by the authenticating
/// proxy carries an address in the allowed domain.
///
/// Without an `allowed_domain` every request passes.
pub async fn require_allowed_domain(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(domain) = state.auth.allowed_domain.as_deref() else {
        return Ok(next.run(request).await);
    };

    let email = request
        .headers()
        .get(state.auth.email_header.as_str())
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let Some(email) = email else {
        return Err(AppError::Unauthorized("Authentication required".to_string()));
    };

    if !is_allowed(email, domain) {
        tracing::warn!(email = %email, "Rejected request from outside the allowed domain.");
        return Err(AppError::Forbidden(format!(
            "Access is restricted to {} accounts",
            domain.trim_start_matches('@')
        )));
    }

    Ok(next.run(request).await)
}

/// Case-insensitive `@<domain>` suffix match.
pub fn is_allowed(email: &str, domain: &str) -> bool {
    let suffix = format!("@{}", domain.trim().trim_start_matches('@')).to_ascii_lowercase();
    let email = email.to_ascii_lowercase();
    email.len() > suffix.len() && email.ends_with(&suffix)
}
