/*
 * Responsibility
 * - Handler / middleware から見える「認証済みコンテキスト」(principal) の型
 * - access middleware が JWT を検証して request extensions に格納する
 *
 * Notes
 * - JWT の検証ロジックは services::auth の責務
 * - 商品更新の可否判定は email (identifier) だけを見る。role は持たない
 */

use uuid::Uuid;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` は内部ユーザーID (token の sub)
/// - `email` は principal identifier (ログイン名)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: Uuid,
    pub email: String,
}

impl AuthCtx {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.email
    }
}
