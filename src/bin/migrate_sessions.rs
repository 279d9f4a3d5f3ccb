//! Applies the academic-session backfill to an existing database and exits.
//!
//! The same procedure runs on every server start; this binary lets operators
//! apply it ahead of a deploy and inspect the report.

use std::process::ExitCode;
use std::str::FromStr;

use schooldesk::db::{DEFAULT_SCHOOL_ID, SchoolStore, migrate, store};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cfg = &schooldesk::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match run(&cfg.basic.database_url, &cfg.school).await {
        Ok(report) => {
            store::log_report(&report);
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(e) => error!(error = %e, "failed to render migration report"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, database_url = %cfg.basic.database_url, "session migration failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    database_url: &str,
    school: &schooldesk::config::SchoolConfig,
) -> Result<migrate::MigrationReport, schooldesk::SchoolError> {
    let opts = SqliteConnectOptions::from_str(database_url)?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await?;
    let store = SchoolStore::new(pool);
    store.init_schema().await?;
    store.ensure_school(&school.name).await?;
    migrate::run(&store, DEFAULT_SCHOOL_ID, &school.default_session).await
}
