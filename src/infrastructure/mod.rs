pub mod axum_http;
pub mod kv;
pub mod postgres;
