//! Application state shared by all handlers.

use crate::config::JwtConfig;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Cloning is cheap: services and the pool are `Arc`-backed.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Used directly by the health checks
    pub db_pool: AsyncDbPool,
    pub jwt_config: JwtConfig,
}

impl AppState {
    /// Wires repositories and services on top of `pool`.
    ///
    /// `lock_timeout_ms` bounds row-lock waits inside borrow and return
    /// transactions.
    pub fn new(pool: AsyncDbPool, jwt_config: JwtConfig, lock_timeout_ms: u64) -> Self {
        let repos = Repositories::new(pool.clone(), lock_timeout_ms);
        Self {
            services: Services::new(repos),
            db_pool: pool,
            jwt_config,
        }
    }
}
