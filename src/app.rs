/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config 読み込み → 依存生成 (repo, auth, access policy) → Router 組み立て
 * - Middleware の適用 (認証 → 商品ガード、CORS、HTTP 共通)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, handlers::health::health};
use crate::config::Config;
use crate::middleware;
use crate::repos::{
    memory::{MemoryProductRepo, MemoryUserRepo},
    product_repo::{PgProductRepo, ProductRepo},
    user_repo::{PgUserRepo, UserRepo},
};
use crate::services::{
    access::ProductAccessPolicy,
    auth::{build_auth_service, password::PasswordHasher},
    seed,
};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG=info,shop_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash loudly
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );
    tracing::info!(
        prefix = %config.products_path_prefix,
        methods = ?config.protected_methods,
        admin = %config.admin_identifier,
        "product mutation guard configured"
    );

    let state = build_state(&config).await?;

    if let Some(password) = &config.seed_admin_password {
        let created = seed::ensure_admin(
            state.users.as_ref(),
            &state.passwords,
            &config.admin_identifier,
            password,
        )
            .await
            .context("seeding admin user")?;
        if created {
            tracing::info!(admin = %config.admin_identifier, "admin user seeded");
        }
    }

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let products: Arc<dyn ProductRepo>;
    let users: Arc<dyn UserRepo>;

    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .context("connecting to DATABASE_URL")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("running migrations")?;

            products = Arc::new(PgProductRepo::new(pool.clone()));
            users = Arc::new(PgUserRepo::new(pool));
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory storage (data is lost on exit)");
            products = Arc::new(MemoryProductRepo::new());
            users = Arc::new(MemoryUserRepo::new());
        }
    }

    let auth = build_auth_service(config).context("building auth service")?;
    let access = Arc::new(ProductAccessPolicy::from_config(config));

    let passwords = PasswordHasher::new(config.password_hash_cost);

    Ok(AppState::new(products, users, auth, access, passwords))
}

/// Full application router. Also used by the integration tests.
pub fn build_router(state: AppState, config: &Config) -> Router {
    // Layer order: the last applied runs first, so authentication wraps the guard.
    let api = api::routes();
    let api = middleware::auth::product_guard::apply(api, state.clone());
    let api = middleware::auth::access::apply(api, state.clone());

    let router = Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
