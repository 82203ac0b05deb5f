/**
 * Server Configuration
 *
 * Loads the database connection from the environment and runs migrations.
 * Unlike optional services, the database is required: the server refuses
 * to start without it.
 */

use sqlx::PgPool;

/// Load and initialize the database connection pool
///
/// 1. Reads `DATABASE_URL` from the environment
/// 2. Creates a PostgreSQL connection pool
/// 3. Runs pending migrations
///
/// # Errors
///
/// Fails if `DATABASE_URL` is unset, the connection cannot be established,
/// or migrations fail to apply.
pub async fn load_database() -> Result<PgPool, sqlx::Error> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL is not set".into()))?;

    tracing::info!("Connecting to database...");

    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}

/// Read the HTTP port from `SERVER_PORT`, defaulting to 3000
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_port() {
        std::env::remove_var("SERVER_PORT");
        assert_eq!(server_port(), 3000);
    }

    #[test]
    #[serial]
    fn test_configured_port() {
        std::env::set_var("SERVER_PORT", "8080");
        assert_eq!(server_port(), 8080);
        std::env::remove_var("SERVER_PORT");
    }

    #[test]
    #[serial]
    fn test_invalid_port_falls_back() {
        std::env::set_var("SERVER_PORT", "not-a-port");
        assert_eq!(server_port(), 3000);
        std::env::remove_var("SERVER_PORT");
    }
}
