use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::application::usecases::login::LoginUseCase;
use crate::domain::repositories::accounts::AccountRepository;
use crate::domain::repositories::session_tokens::SessionTokenRepository;
use crate::domain::value_objects::iam::LoginModel;
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{accounts::AccountPostgres, session_tokens::SessionTokenPostgres},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let account_repository = AccountPostgres::new(Arc::clone(&db_pool));
    let session_repository = SessionTokenPostgres::new(Arc::clone(&db_pool));
    let login_usecase = LoginUseCase::new(Arc::new(account_repository), Arc::new(session_repository));

    Router::new()
        .route("/", post(login))
        .with_state(Arc::new(login_usecase))
}

pub async fn login<A, S>(
    State(login_usecase): State<Arc<LoginUseCase<A, S>>>,
    Json(payload): Json<LoginModel>,
) -> Response
where
    A: AccountRepository + Send + Sync + 'static,
    S: SessionTokenRepository + Send + Sync + 'static,
{
    match login_usecase
        .login(&payload.username, &payload.password)
        .await
    {
        Ok(response) => Json(response).into_response(),
        Err(err) => err.into_response(),
    }
}
