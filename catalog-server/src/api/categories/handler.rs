//! Category API Handlers

use axum::{Json, extract::State, http::StatusCode};
use shared::error::AppResult;
use shared::models::{Category, CategoryCreate, CategoryWithCount};

use crate::api::extract::ApiJson;
use crate::audit::RequestMeta;
use crate::core::ServerState;
use crate::services::CategoryService;

/// GET /api/categories - 分类列表（含商品数量）
pub async fn list(
    State(state): State<ServerState>,
    meta: RequestMeta,
) -> AppResult<Json<Vec<CategoryWithCount>>> {
    let categories = CategoryService::from_state(&state)?.list(&meta).await?;
    Ok(Json(categories))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    meta: RequestMeta,
    ApiJson(payload): ApiJson<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = CategoryService::from_state(&state)?
        .create(payload, &meta)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}
