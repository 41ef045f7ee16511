//! Factory: `Config` から `AuthService` を組み立てる
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::AuthService;

pub fn build_auth_service(config: &Config) -> Arc<AuthService> {
    Arc::new(AuthService::new(
        &config.jwt_secret,
        config.jwt_audience.as_deref(),
    ))
}
