use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::session;

/// Authenticated staff session extracted from the `Authorization: Bearer`
/// header.
///
/// Add this as a handler parameter to gate a route on a staff session. The
/// console has a single staff role; any valid token grants the full admin
/// surface. Authorization beyond that is the identity provider's concern.
pub struct StaffSession {
    pub staff_id: String,
}

impl FromRequestParts<AppState> for StaffSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = session::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(StaffSession {
            staff_id: claims.sub,
        })
    }
}
