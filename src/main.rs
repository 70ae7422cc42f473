use std::env;
use std::net::TcpListener;

use tracing::error;

use spacenews_api::{common, observability, startup};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Init dotenv
    dotenvy::dotenv().ok();

    let subscriber = observability::get_subscriber("spacenews-api", "info");
    observability::init_subscriber(subscriber);

    if !check_configuration() {
        panic!()
    }

    let postgres_connection = common::init_postgres_connection().await;
    sqlx::migrate!()
        .run(&postgres_connection)
        .await
        .expect("Could not run database migrations");

    let redis_pool = common::init_redis_connection();

    let listener = TcpListener::bind(
        env::var("LISTEN_ON").unwrap_or_else(|_| String::from("0.0.0.0:8080")),
    )?;

    startup::startup(postgres_connection, redis_pool, listener).await
}

/// Check that the configuration is OK
fn check_configuration() -> bool {
    if env::var("JWT_SECRET").is_err() {
        error!("JWT_SECRET environment variable is mandatory");

        return false;
    }

    true
}
