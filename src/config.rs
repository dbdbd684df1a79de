/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, CORS 許可、Auth 設定、商品の更新制限など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::str::FromStr;

use axum::http::Method;
use thiserror::Error;

pub const DEFAULT_PRODUCTS_PATH_PREFIX: &str = "/api/products";
pub const DEFAULT_PROTECTED_METHODS: &str = "POST,PUT,PATCH,DELETE";
pub const DEFAULT_ADMIN_IDENTIFIER: &str = "admin@admin.com";

// 1 year
pub const MAX_ACCESS_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    // None => in-memory store
    pub database_url: Option<String>,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth_issuer: String,
    pub auth_audience: String,
    pub access_token_ttl_seconds: u64,
    pub access_token_leeway_seconds: u64,
    pub access_jwt_private_key_pem: String,
    pub access_jwt_public_key_pem: String,

    pub products_path_prefix: String,
    pub protected_methods: Vec<Method>,
    pub admin_identifier: String,
    pub seed_admin_password: Option<String>,
    pub password_hash_cost: u32,

    pub http_body_limit_bytes: usize,
    pub http_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` is a thin wrapper over this; tests feed a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url = non_empty("DATABASE_URL");

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth_issuer = non_empty("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;
        let auth_audience =
            non_empty("AUTH_AUDIENCE").ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        let access_token_ttl_seconds = parse_bounded(
            &non_empty,
            "ACCESS_TOKEN_TTL_SECONDS",
            1..=MAX_ACCESS_TOKEN_TTL_SECONDS,
            3600,
        )?;

        let access_token_leeway_seconds = parse_bounded(
            &non_empty,
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            0..=MAX_ACCESS_TOKEN_TTL_SECONDS,
            60,
        )?;

        let access_jwt_private_key_pem = non_empty("ACCESS_JWT_PRIVATE_KEY_PEM")
            .ok_or(ConfigError::Missing("ACCESS_JWT_PRIVATE_KEY_PEM"))?
            .replace("\\n", "\n");

        let access_jwt_public_key_pem = non_empty("ACCESS_JWT_PUBLIC_KEY_PEM")
            .ok_or(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let products_path_prefix = non_empty("PRODUCTS_PATH_PREFIX")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_PRODUCTS_PATH_PREFIX.to_string());
        if !products_path_prefix.starts_with('/') {
            return Err(ConfigError::Invalid("PRODUCTS_PATH_PREFIX"));
        }

        let protected_methods = parse_methods(
            &non_empty("PROTECTED_METHODS").unwrap_or_else(|| DEFAULT_PROTECTED_METHODS.into()),
        )?;

        let admin_identifier = non_empty("ADMIN_IDENTIFIER")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_ADMIN_IDENTIFIER.to_string());

        let seed_admin_password = non_empty("SEED_ADMIN_PASSWORD");

        // bcrypt accepts 4..=31
        let password_hash_cost: u32 =
            parse_bounded(&non_empty, "PASSWORD_HASH_COST", 4..=31, bcrypt::DEFAULT_COST)?;

        let http_body_limit_bytes: usize =
            parse_bounded(&non_empty, "HTTP_BODY_LIMIT_BYTES", 1..=usize::MAX, 1024 * 1024)?;

        let http_timeout_seconds: u64 =
            parse_bounded(&non_empty, "HTTP_TIMEOUT_SECONDS", 1..=24 * 60 * 60, 30)?;

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            auth_issuer,
            auth_audience,
            access_token_ttl_seconds,
            access_token_leeway_seconds,
            access_jwt_private_key_pem,
            access_jwt_public_key_pem,
            products_path_prefix,
            protected_methods,
            admin_identifier,
            seed_admin_password,
            password_hash_cost,
            http_body_limit_bytes,
            http_timeout_seconds,
        })
    }
}

// Unset => `default`; set but unparsable or outside `range` => Invalid.
fn parse_bounded<T, F>(
    non_empty: &F,
    key: &'static str,
    range: RangeInclusive<T>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd,
    F: Fn(&str) -> Option<String>,
{
    match non_empty(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .filter(|v| range.contains(v))
            .ok_or(ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

// Comma-separated verbs, normalized to canonical upper case.
fn parse_methods(raw: &str) -> Result<Vec<Method>, ConfigError> {
    let mut methods = Vec::new();
    for verb in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let method = Method::from_bytes(verb.to_ascii_uppercase().as_bytes())
            .map_err(|_| ConfigError::Invalid("PROTECTED_METHODS"))?;
        if !methods.contains(&method) {
            methods.push(method);
        }
    }

    if methods.is_empty() {
        return Err(ConfigError::Invalid("PROTECTED_METHODS"));
    }
    Ok(methods)
}
