//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use shared::error::AppResult;
use shared::models::{BulkCreateRequest, BulkCreateResponse, Product, ProductInput};

use crate::api::extract::{ApiJson, ApiQuery};
use crate::audit::RequestMeta;
use crate::catalog::ListQuery;
use crate::core::ServerState;
use crate::services::{MessageResponse, ProductListResponse, ProductService};

/// GET /api/products - 分页、搜索、筛选、排序
pub async fn list(
    State(state): State<ServerState>,
    meta: RequestMeta,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> AppResult<Json<ProductListResponse>> {
    let page = ProductService::from_state(&state)?
        .list(&query, &meta)
        .await?;
    Ok(Json(page))
}

/// GET /api/products/{id} - 获取单个商品（浏览次数 +1）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    meta: RequestMeta,
) -> AppResult<Json<Product>> {
    let product = ProductService::from_state(&state)?.get(&id, &meta).await?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    meta: RequestMeta,
    ApiJson(payload): ApiJson<ProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = ProductService::from_state(&state)?
        .create(payload, &meta)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id} - 部分更新
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    meta: RequestMeta,
    ApiJson(payload): ApiJson<ProductInput>,
) -> AppResult<Json<Product>> {
    let product = ProductService::from_state(&state)?
        .update(&id, payload, &meta)
        .await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id} - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    meta: RequestMeta,
) -> AppResult<Json<MessageResponse>> {
    let result = ProductService::from_state(&state)?
        .delete(&id, &meta)
        .await?;
    Ok(Json(result))
}

/// POST /api/products/bulk - 批量创建（部分成功）
pub async fn bulk_create(
    State(state): State<ServerState>,
    meta: RequestMeta,
    ApiJson(payload): ApiJson<BulkCreateRequest>,
) -> AppResult<Json<BulkCreateResponse>> {
    let result = ProductService::from_state(&state)?
        .bulk_create(payload, &meta)
        .await?;
    Ok(Json(result))
}
