/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - products/users: repo (Postgres or in-memory)
 *   - auth: JWT 発行/検証, access: 商品更新の制限ポリシー
 *   - passwords: 登録/seed 時の bcrypt hash
 * - Clone 前提で持つ (内部は Arc で clone cheap)
 */
use std::sync::Arc;

use crate::repos::{product_repo::ProductRepo, user_repo::UserRepo};
use crate::services::{
    access::ProductAccessPolicy,
    auth::{AuthService, password::PasswordHasher},
};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepo>,
    pub users: Arc<dyn UserRepo>,
    pub auth: Arc<AuthService>,
    pub access: Arc<ProductAccessPolicy>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(
        products: Arc<dyn ProductRepo>,
        users: Arc<dyn UserRepo>,
        auth: Arc<AuthService>,
        access: Arc<ProductAccessPolicy>,
        passwords: PasswordHasher,
    ) -> Self {
        Self {
            products,
            users,
            auth,
            access,
            passwords,
        }
    }
}
