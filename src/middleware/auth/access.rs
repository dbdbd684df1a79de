//! Bearer (JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - Authorization ヘッダなし: 匿名のまま次へ (AuthCtx は入れない)
//! - `Bearer <jwt>` が検証できた: AuthCtx を insert
//! - ヘッダがあるのに形式不正 / 検証失敗: 401
//!
//! 認可 (商品の更新可否) はこの後ろの product_guard が判断する。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// `/api/*` に認証 (任意) を掛けるための middleware を適用する。
///
/// product_guard より外側 (先に実行される側) に置くこと。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|v| v.to_str().map(str::to_owned));

    let auth = match header_value {
        None => return Ok(next.run(req).await),
        Some(Ok(v)) => v,
        Some(Err(_)) => {
            tracing::warn!("authorization header is not valid ascii");
            return Err(AppError::Unauthorized);
        }
    };

    let token = auth
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let verified = match state.auth.verify(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    tracing::debug!(user_id = %verified.user_id, jti = %verified.jti, "request authenticated");
    let auth_ctx = AuthCtx::new(verified.user_id, verified.email);

    // middleware → product_guard / extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
