use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::application::usecases::checkout::CheckoutUseCase;
use crate::application::usecases::coupon_matcher::CouponMatcherUseCase;
use crate::domain::repositories::coupons::CouponRepository;
use crate::domain::repositories::kv_store::KeyValueStore;
use crate::domain::value_objects::iam::AuthenticatedUser;
use crate::infrastructure::kv::redis::RedisKv;
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad, repositories::coupons::CouponPostgres,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, kv: Arc<RedisKv>) -> Router {
    let coupon_matcher =
        CouponMatcherUseCase::new(Arc::new(CouponPostgres::new(Arc::clone(&db_pool))));
    let checkout_usecase = CheckoutUseCase::new(Arc::new(coupon_matcher), kv);

    Router::new()
        .route("/", get(get_checkout).post(begin_checkout))
        .with_state(Arc::new(checkout_usecase))
}

#[derive(Debug, Deserialize)]
pub struct BeginCheckoutRequest {
    pub course_ids: Vec<i64>,
}

pub async fn begin_checkout<R, K>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<R, K>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<BeginCheckoutRequest>,
) -> Response
where
    R: CouponRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    match checkout_usecase.begin(user.id, &payload.course_ids).await {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_checkout<R, K>(
    State(checkout_usecase): State<Arc<CheckoutUseCase<R, K>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Response
where
    R: CouponRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    match checkout_usecase.get(user.id).await {
        Ok(view) => Json(view).into_response(),
        Err(err) => err.into_response(),
    }
}
