//! Bearer token check for the admin routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use crate::{error::ApiError, state::AppState};

/// The admin a request was authenticated as
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
}

/// Reject requests without a valid session token
pub async fn require_admin(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;
    let claims = state.auth.validate_token(bearer.token())?;

    req.extensions_mut().insert(AdminSession {
        username: claims.sub,
    });

    Ok(next.run(req).await)
}
