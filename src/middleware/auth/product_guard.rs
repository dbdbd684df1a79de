//! 商品の作成・更新・削除を admin だけに制限する middleware
//!
//! - path が保護 prefix で始まり、かつ method が更新系のときだけ判定する
//! - それ以外は判定せずにそのまま handler へ
//! - Deny なら handler を呼ばずに 403 (固定メッセージ)
//!
//! principal は access middleware が入れた AuthCtx (なければ匿名) を明示的に渡す。

use axum::{
    Router,
    body::Body,
    extract::{OriginalUri, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::access::AccessDecision;
use crate::state::AppState;

/// access middleware より内側に掛けること (AuthCtx が入った後に実行される)。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, product_guard))
}

async fn product_guard(
    State(state): State<AppState>,
    // nest 後の uri は "/api" が落ちるので、元の path で判定する
    OriginalUri(original_uri): OriginalUri,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = original_uri.path();
    let principal = req.extensions().get::<AuthCtx>().map(AuthCtx::identifier);

    match state.access.evaluate(path, req.method(), principal) {
        None => {}
        Some(AccessDecision::Allow) => {
            tracing::debug!(method = %req.method(), path, "product mutation allowed");
        }
        Some(AccessDecision::Deny) => {
            tracing::warn!(
                method = %req.method(),
                path,
                principal = principal.unwrap_or("anonymous"),
                "product mutation denied"
            );
            return Err(AppError::forbidden(state.access.denial_message()));
        }
    }

    Ok(next.run(req).await)
}
