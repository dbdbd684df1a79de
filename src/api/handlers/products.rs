/*
 * Responsibility
 * - /products 系 CRUD handler
 * - 更新系 (POST/PUT/PATCH/DELETE) の認可は product_guard middleware が handler の前で済ませる
 *   ここに届いた時点で admin であることは保証済み
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::{
        dto::products::{ListProductsQuery, ProductPatchRequest, ProductRequest, ProductResponse},
        extractors::{JsonBody, PathParam, QueryParams},
    },
    error::AppError,
    repos::product_repo::ProductRow,
    state::AppState,
};

fn row_to_response(row: ProductRow) -> Result<ProductResponse, AppError> {
    ProductResponse::try_from(row).map_err(|e| {
        tracing::error!(error = %e, "stored product is invalid");
        AppError::Internal
    })
}

pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let (limit, offset) = query.limit_offset();
    let rows = state.products.list(limit, offset).await?;

    let mut res = Vec::with_capacity(rows.len());
    for row in rows {
        res.push(row_to_response(row)?);
    }

    Ok(Json(res))
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_PRODUCT", msg))?;

    let row = state.products.create(&req.into_data()).await?;
    tracing::info!(product_id = row.id, "product created");

    Ok((StatusCode::CREATED, Json(row_to_response(row)?)))
}

pub async fn get_product(
    State(state): State<AppState>,
    PathParam(product_id): PathParam<i64>,
) -> Result<Json<ProductResponse>, AppError> {
    let row = state
        .products
        .get(product_id)
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row_to_response(row)?))
}

pub async fn replace_product(
    State(state): State<AppState>,
    PathParam(product_id): PathParam<i64>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_PRODUCT", msg))?;

    let row = state
        .products
        .replace(product_id, &req.into_data())
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row_to_response(row)?))
}

pub async fn update_product(
    State(state): State<AppState>,
    PathParam(product_id): PathParam<i64>,
    JsonBody(req): JsonBody<ProductPatchRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_PRODUCT", msg))?;

    let row = state
        .products
        .update(product_id, &req.into_patch())
        .await?
        .ok_or(AppError::not_found("product"))?;

    Ok(Json(row_to_response(row)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    PathParam(product_id): PathParam<i64>,
) -> Result<StatusCode, AppError> {
    if state.products.delete(product_id).await? {
        tracing::info!(product_id, "product deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("product"))
    }
}
