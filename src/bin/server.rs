use anyhow::Context;
use quiz_admin::config::get_configuration;
use quiz_admin::db;
use quiz_admin::server::app::run_server;
use quiz_admin::storage::SupabaseStorage;
use quiz_admin::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = get_configuration().context("Failed to read configuration")?;
    let pool = db::establish_connection(&settings.database.path)
        .await
        .context("Cannot connect to DB")?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool).await?;

    let storage = SupabaseStorage::new(settings.storage).context("Failed to build storage client")?;
    run_server(pool, storage, &settings.application.address()).await
}
