use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::application::usecases::token_auth::TokenAuthUseCase;
use crate::domain::repositories::kv_store::KeyValueStore;
use crate::domain::repositories::session_tokens::SessionTokenRepository;

/// Request header carrying the opaque session token.
pub const TOKEN_HEADER: &str = "token";

/// Gate layered over every cart/checkout route. Resolves the `token` header
/// through the auth cache and injects the identity as an
/// `Extension<AuthenticatedUser>`.
///
/// CORS preflight never reaches this gate: the CORS layer answers OPTIONS
/// before routing.
pub async fn require_token<S, K>(
    State(token_auth_usecase): State<Arc<TokenAuthUseCase<S, K>>>,
    mut req: Request,
    next: Next,
) -> Response
where
    S: SessionTokenRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    let token = req
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    match token_auth_usecase.authenticate(token).await {
        Ok((user, _cache_key)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}
