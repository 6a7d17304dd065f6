use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::application::usecases::cart::CartUseCase;
use crate::application::usecases::price_resolver::PriceResolverUseCase;
use crate::domain::repositories::courses::CourseRepository;
use crate::domain::repositories::kv_store::KeyValueStore;
use crate::domain::repositories::price_policies::PricePolicyRepository;
use crate::domain::value_objects::cart::CartEntry;
use crate::domain::value_objects::iam::AuthenticatedUser;
use crate::infrastructure::kv::redis::RedisKv;
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad,
    repositories::{courses::CoursePostgres, price_policies::PricePolicyPostgres},
};

pub fn routes(db_pool: Arc<PgPoolSquad>, kv: Arc<RedisKv>) -> Router {
    let course_repository = CoursePostgres::new(Arc::clone(&db_pool));
    let price_resolver =
        PriceResolverUseCase::new(Arc::new(PricePolicyPostgres::new(Arc::clone(&db_pool))));
    let cart_usecase = CartUseCase::new(
        Arc::new(course_repository),
        Arc::new(price_resolver),
        kv,
    );

    Router::new()
        .route(
            "/",
            get(list_cart)
                .post(add_to_cart)
                .put(update_selection)
                .delete(remove_from_cart),
        )
        .with_state(Arc::new(cart_usecase))
}

#[derive(Debug, Deserialize)]
pub struct MutateCartRequest {
    pub course_id: i64,
    pub price_policy_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveCartRequest {
    pub course_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CartListResponse {
    pub items: Vec<CartEntry>,
}

pub async fn list_cart<C, P, K>(
    State(cart_usecase): State<Arc<CartUseCase<C, P, K>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Response
where
    C: CourseRepository + Send + Sync + 'static,
    P: PricePolicyRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    match cart_usecase.get(user.id).await {
        Ok(items) => Json(CartListResponse { items }).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn add_to_cart<C, P, K>(
    State(cart_usecase): State<Arc<CartUseCase<C, P, K>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<MutateCartRequest>,
) -> Response
where
    C: CourseRepository + Send + Sync + 'static,
    P: PricePolicyRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    match cart_usecase
        .add(user.id, payload.course_id, payload.price_policy_id)
        .await
    {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_selection<C, P, K>(
    State(cart_usecase): State<Arc<CartUseCase<C, P, K>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<MutateCartRequest>,
) -> Response
where
    C: CourseRepository + Send + Sync + 'static,
    P: PricePolicyRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    match cart_usecase
        .update_selection(user.id, payload.course_id, payload.price_policy_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn remove_from_cart<C, P, K>(
    State(cart_usecase): State<Arc<CartUseCase<C, P, K>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<RemoveCartRequest>,
) -> Response
where
    C: CourseRepository + Send + Sync + 'static,
    P: PricePolicyRepository + Send + Sync + 'static,
    K: KeyValueStore + Send + Sync + 'static,
{
    match cart_usecase.remove(user.id, payload.course_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
