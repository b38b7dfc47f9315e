//! Database initialization and migration runner.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup uses this module to create the shared SQLx pool and enforce schema
//! migrations before accepting API traffic.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

fn db_max_connections() -> u32 {
    parse_max_connections(std::env::var("DB_MAX_CONNECTIONS").ok().as_deref())
}

fn parse_max_connections(raw: Option<&str>) -> u32 {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
}

/// Initialize the `PostgreSQL` connection pool and run migrations.
///
/// # Errors
///
/// Returns an error if the connection or migrations fail.
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(db_max_connections())
        .connect(database_url)
        .await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_connections_parses_or_defaults() {
        assert_eq!(parse_max_connections(Some("12")), 12);
        assert_eq!(parse_max_connections(Some(" 3 ")), 3);
        assert_eq!(parse_max_connections(Some("0")), DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(parse_max_connections(Some("lots")), DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(parse_max_connections(None), DEFAULT_DB_MAX_CONNECTIONS);
    }
}
