use clap::Parser;

use spacenews_api::sync::client::SpaceflightClient;
use spacenews_api::{common, observability, sync};

/// Pull space-news articles from the external feed into the database
#[derive(Parser, Debug)]
#[command(name = "sync-news")]
struct Args {
    /// Maximum number of articles to fetch
    #[arg(long, default_value_t = 100)]
    limit: u32,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let subscriber = observability::get_subscriber("spacenews-sync", "info");
    observability::init_subscriber(subscriber);

    let args = Args::parse();

    let db = common::init_postgres_connection().await;
    sqlx::migrate!()
        .run(&db)
        .await
        .expect("Could not run database migrations");

    let client = SpaceflightClient::from_env();
    let report = sync::sync_articles(&db, &client, args.limit).await;

    tracing::info!("Sync finished. {report}");
}
