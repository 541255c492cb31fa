use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    pkg::{internal::auth::User, server::state::AppState},
    prelude::{AppError, Result},
};

pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let jar = CookieJar::from_headers(&headers);
    let maybe_cookie = jar.get("_Host_token").filter(|c| !c.value().is_empty());
    if let Some(cookie) = maybe_cookie {
        if let Some(user) = User::from_session_token(&state.db_pool, cookie.value()).await? {
            request.extensions_mut().insert(Arc::new(user));
            return Ok(next.run(request).await);
        }
    }
    tracing::warn!("token missing or invalid, authentication denied");
    Err(AppError::Unauthorized)
}
