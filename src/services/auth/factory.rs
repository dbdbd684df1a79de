/// Factory: build `AuthService` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthService, TokenError};

pub fn build_auth_service(config: &Config) -> Result<Arc<AuthService>, TokenError> {
    let auth = AuthService::new(
        &config.access_jwt_private_key_pem,
        &config.access_jwt_public_key_pem,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_ttl_seconds,
        config.access_token_leeway_seconds,
    )?;

    Ok(Arc::new(auth))
}
