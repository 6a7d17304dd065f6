use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    Router,
    http::{HeaderName, Method, header},
    middleware,
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::application::usecases::token_auth::TokenAuthUseCase;
use crate::config::config_model::DotEnvyConfig;
use crate::infrastructure::axum_http::{auth, default_routers, routers};
use crate::infrastructure::kv::redis::RedisKv;
use crate::infrastructure::postgres::{
    postgres_connection::PgPoolSquad, repositories::session_tokens::SessionTokenPostgres,
};

pub async fn start(
    config: Arc<DotEnvyConfig>,
    db_pool: Arc<PgPoolSquad>,
    kv: Arc<RedisKv>,
) -> Result<()> {
    let session_repository = SessionTokenPostgres::new(Arc::clone(&db_pool));
    let token_auth_usecase = Arc::new(TokenAuthUseCase::new(
        Arc::new(session_repository),
        Arc::clone(&kv),
    ));

    let protected = Router::new()
        .nest(
            "/api/v1/cart",
            routers::cart::routes(Arc::clone(&db_pool), Arc::clone(&kv)),
        )
        .nest(
            "/api/v1/checkout",
            routers::checkout::routes(Arc::clone(&db_pool), Arc::clone(&kv)),
        )
        .layer(middleware::from_fn_with_state(
            token_auth_usecase,
            auth::require_token::<SessionTokenPostgres, RedisKv>,
        ));

    let app = Router::new()
        .fallback(default_routers::not_found)
        .route("/api/v1/health-check", get(default_routers::health_check))
        .nest("/api/v1/login", routers::login::routes(Arc::clone(&db_pool)))
        .merge(protected)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            // Sits outside the token gate, so OPTIONS preflight is answered
            // here and never consults the gate.
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(auth::TOKEN_HEADER)])
                .allow_origin(Any), // TODO Add the domain later
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
