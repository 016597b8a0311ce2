use anyhow::Context;
use application::BookstoreApp;
use config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional path to an env file; otherwise `.env` in the working directory
    let env_path = std::env::args().nth(1);
    let config = Config::from_env(env_path.as_deref()).context("failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    info!(storage = ?config.storage, "starting bookstore");

    let app = BookstoreApp::from_config(&config).context("failed to build application")?;
    app.ensure_schema().await.context("failed to prepare storage")?;

    if let Some(admin) = &config.admin {
        app.ensure_admin(&admin.username, &admin.email, &admin.password)
            .await
            .context("failed to bootstrap admin account")?;
    }

    let stats = app.catalog_stats().await?;
    info!(
        books = stats.books,
        authors = stats.authors,
        users = stats.users,
        reading_lists = stats.reading_lists,
        reviews = stats.reviews,
        "catalog ready"
    );

    Ok(())
}
