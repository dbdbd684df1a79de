/*
 * Responsibility
 * - /api 配下の URL 構造を定義
 * - 認証 (access) と商品ガード (product_guard) は app.rs でこの Router 全体に掛ける
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::handlers::{
    auth::{login, who_am_i},
    products::{
        create_product, delete_product, get_product, list_products, replace_product,
        update_product,
    },
    users::create_user,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/login", post(login))
        .route("/me", get(who_am_i))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{product_id}",
            get(get_product)
                .put(replace_product)
                .patch(update_product)
                .delete(delete_product),
        )
}
