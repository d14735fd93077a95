use clap::Parser;
use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = settings::Cli::parse();
    let settings = settings::Settings::new(&cli)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "homebudget={level},server={level},engine={level},tower_http={level}",
            level = settings.app.level
        ))
        .init();

    let db = connect(&settings.server.database).await?;

    let initial_amount: engine::MoneyCents = settings.budget.initial_transaction_amount.parse()?;
    let mut builder = engine::Engine::builder()
        .database(db)
        .initial_transaction_amount(initial_amount);
    if let Some(cost) = settings.auth.password_cost {
        builder = builder.password_cost(cost);
    }
    let engine = builder.build().await?;

    let algorithm: server::Algorithm = settings.auth.algorithm.parse()?;
    let auth = server::AuthKeys::new(
        &settings.auth.secret_key,
        algorithm,
        settings.auth.access_token_expire_minutes,
    )?;

    let listener = tokio::net::TcpListener::bind(settings.server.addr()?).await?;
    server::run_with_listener(engine, auth, listener).await?;

    Ok(())
}

async fn connect(
    url: &str,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    tracing::info!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
