use std::net::TcpListener;

use actix_governor::Governor;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use deadpool_redis::Pool as RedisPool;

use crate::common::Pool;
use crate::rate_limiting::build_rate_limiting_conf;
use crate::routes;

pub struct AppState {
    pub db: Pool,
}

pub async fn startup(
    database: Pool,
    redis: RedisPool,
    listener: TcpListener,
) -> std::io::Result<()> {
    let governor_conf = build_rate_limiting_conf();
    let app_state = Data::new(AppState { db: database });
    let redis = Data::new(redis);

    HttpServer::new(move || {
        App::new()
            .wrap(tracing_actix_web::TracingLogger::default())
            .app_data(app_state.clone())
            .app_data(redis.clone())
            .service(routes::ping)
            .service(
                web::scope("/api/v1")
                    .wrap(Governor::new(&governor_conf))
                    .configure(routes::configure),
            )
    })
    .listen(listener)?
    .run()
    .await
}
