use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::{AuthGuard, AuthPolicy, JwtAuthGuard};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub guard: Arc<dyn AuthGuard>,
    pub policy: Arc<AuthPolicy>,
    /// Stored as `source` when the client omits it.
    pub default_source: Arc<str>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, guard: Arc<dyn AuthGuard>, policy: AuthPolicy, default_source: &str) -> Self {
        Self { db, guard, policy: Arc::new(policy), default_source: Arc::from(default_source) }
    }

    pub fn from_config(db: DatabaseConnection, cfg: &configs::AppConfig) -> Self {
        let guard: Arc<dyn AuthGuard> = Arc::new(JwtAuthGuard::new(&cfg.auth.jwt_secret));
        Self::new(db, guard, AuthPolicy::from_config(&cfg.auth), &cfg.content.default_source)
    }
}
