use actix_web::http::StatusCode;
use actix_web::{get, web, HttpResponse, ResponseError};
use rand::Rng;
use serde_json::json;

use crate::errors::AuthenticationError;

pub mod auth;
pub mod favorites;
pub mod reports;
pub mod users;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Object not found")]
    NotFound(String, i32),
    #[error("Authentication error {0:?}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("Redis Error: {0}")]
    RedisError(#[from] redis::RedisError),
    #[error("Redis pool Error: {0}")]
    RedisPoolError(#[from] deadpool_redis::PoolError),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::AuthenticationError(error) => error.error_response(),
            ApiError::NotFound(object_type, id) => HttpResponse::NotFound()
                .json(json!({"type":"/problem/not-found",
                    "title": "Object not found",
                    "status": 404,
                    "detail": format!("Object of type {} with id {} was not found", object_type, id)})),
            ApiError::DatabaseError(_) | ApiError::RedisError(_) | ApiError::RedisPoolError(_) => {
                HttpResponse::InternalServerError().json(json!({"type":"/problem/database",
                    "title": "Error with the database",
                    "status": 500,
                    "detail": "Unexpected error with the database"}))
            }
            _ => HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR).finish(),
        }
    }
}

#[get("/api/v1/ping")]
#[tracing::instrument]
pub async fn ping() -> HttpResponse {
    let mut rng = rand::thread_rng();
    let quotes = [
        "Ground Control To Major Tom",
        "The Eagle Has Landed",
        "Houston, We Have A Liftoff",
        "T Minus Ten",
        "Orbit Achieved",
        "All Systems Nominal",
        "One Small Step",
        "Telemetry Looking Good",
        "Go For Launch",
        "Splashdown Confirmed",
    ];

    HttpResponse::Ok()
        .content_type("text/plain")
        .body(quotes[rng.gen_range(0..quotes.len())])
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth::configure)
        .configure(favorites::configure)
        .configure(reports::configure)
        .configure(users::configure);
}
