/// Database utilities
///
/// - `pool`: PostgreSQL connection pool creation and health checks
/// - `migrations`: migration runner built on sqlx's migration system

pub mod migrations;
pub mod pool;
