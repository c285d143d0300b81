//! Integration tests for database connectivity.
//!
//! These require a running PostgreSQL reachable through `DATABASE_URL`, so
//! they are ignored by default: `cargo test -- --ignored` with the stack up.

use common::database::{DatabaseConfig, health_check, init_pool};
use sqlx::Row;

#[tokio::test]
#[ignore]
async fn database_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_pool(&config).await?;

    assert!(health_check(&pool).await?, "health check failed");

    let row = sqlx::query("SELECT 1 as result").fetch_one(&pool).await?;
    let result: i32 = row.get("result");
    assert_eq!(result, 1);

    Ok(())
}
