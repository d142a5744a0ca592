//! Export API Handlers

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use shared::error::AppResult;

use crate::api::extract::ApiQuery;
use crate::audit::RequestMeta;
use crate::core::ServerState;
use crate::services::{Export, ExportFormat, ExportService};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// GET /api/export/products?format=json|csv - 导出全部商品
pub async fn export_products(
    State(state): State<ServerState>,
    meta: RequestMeta,
    ApiQuery(query): ApiQuery<ExportQuery>,
) -> AppResult<Response> {
    let format = ExportFormat::parse(query.format.as_deref());
    let export = ExportService::from_state(&state)?
        .export(format, &meta)
        .await?;

    Ok(match export {
        Export::Json(body) => Json(body).into_response(),
        Export::Csv { filename, body } => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename={filename}"),
                ),
            ],
            body,
        )
            .into_response(),
    })
}
