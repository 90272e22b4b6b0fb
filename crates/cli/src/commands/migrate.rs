//! Database migration command.
//!
//! Migrations live in `crates/commerce/migrations/` and are embedded into
//! the binary at compile time, so the CLI can run them anywhere the
//! database is reachable. The server binaries never migrate on startup.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use secrecy::SecretString;
use sugarloaf_commerce::store::create_pool;

use super::CliError;

/// Run the embedded document-store migrations.
///
/// # Errors
///
/// Returns `CliError` if `DATABASE_URL` is unset, the connection fails, or
/// a migration fails to apply.
pub async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let database_url: SecretString = std::env::var("DATABASE_URL")
        .map_err(|_| CliError::MissingEnvVar("DATABASE_URL"))?
        .into();

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../commerce/migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
