//! Reset the database to the demo data set
//!
//! Deletes every todo, user and category, then creates the demo accounts.
//! Reads the same `config.yml` and environment overrides as the server.

use anyhow::Result;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasknest::{config::Config, db, services::Seeder};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasknest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // The seed never signs cookies, so the secret is not required here
    let config = Config::load_with_env_unvalidated(Path::new("config.yml"))?;

    let pool = db::create_pool(&config.database).await?;
    db::migrations::run_migrations(&pool).await?;

    let report = Seeder::new(pool).run(&mut rand::thread_rng()).await?;
    tracing::info!(
        "Seeded {} categories, {} users and {} todos",
        report.categories,
        report.users,
        report.todos
    );
    println!("Database has been seeded");

    Ok(())
}
