/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 認証 (access) と商品ガード (product_guard)
 * - cors / http: 全ルート共通の横断的関心事
 */
pub mod auth;
pub mod cors;
pub mod http;
