use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use taskboard_domain::TaskboardError;
use validator::Validate;

use crate::{
    error::{ApiError, ApiJson, ApiResult},
    response::ApiResponse,
    routes::AppState,
    types::{
        params_from_query, BulkAssignRequest, BulkIdsRequest, BulkPriorityRequest,
        BulkStatusRequest, CreateTodoRequest, ReorderRequest, SearchTodosRequest, SeedRequest,
        UpdateTodoRequest,
    },
};

/// 列表/搜索待办事项（查询串形式）
pub async fn list_todos(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<impl IntoResponse> {
    let params = params_from_query(&pairs)?;
    let page = state.service.search_todos(&params).await?;
    Ok(ApiResponse::success(page))
}

/// 创建待办事项
pub async fn create_todo(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTodoRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;
    let record = state.service.create_todo(request.into_create()).await?;
    Ok(ApiResponse::success(record))
}

/// 按id获取单条记录，不存在返回404
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    match state.service.get_todo(&id).await? {
        Some(record) => Ok(ApiResponse::success(record)),
        None => Err(TaskboardError::todo_not_found(id).into()),
    }
}

/// 部分更新，只覆盖请求体中出现的字段
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateTodoRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;
    let update = request.into_update();
    if update.is_empty() {
        return Err(ApiError::BadRequest("请求体中没有可更新的字段".to_string()));
    }
    let record = state.service.update_todo(&id, &update).await?;
    Ok(ApiResponse::success(record))
}

/// 删除单条记录
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    state.service.delete_todo(&id).await?;
    Ok(ApiResponse::success_empty_with_message("待办事项已删除"))
}

/// 搜索（JSON请求体形式），语义与 GET /todos 一致
pub async fn search_todos(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SearchTodosRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;
    let params = request.into_params()?;
    let page = state.service.search_todos(&params).await?;
    Ok(ApiResponse::success(page))
}

/// 非归档记录的聚合统计
pub async fn get_statistics(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats = state.service.get_statistics().await?;
    Ok(ApiResponse::success(stats))
}

/// 归档单条记录
pub async fn archive_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let record = state.service.archive_todo(&id).await?;
    Ok(ApiResponse::success(record))
}

/// 恢复已归档记录
pub async fn restore_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let record = state.service.restore_todo(&id).await?;
    Ok(ApiResponse::success(record))
}

/// 看板内移动：写入目标状态列与新位置
pub async fn reorder_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<ReorderRequest>,
) -> ApiResult<impl IntoResponse> {
    let record = state
        .service
        .reorder_todo(&id, request.status, request.position)
        .await?;
    Ok(ApiResponse::success(record))
}

/// 批量修改状态。部分失败体现在返回体的计数与错误列表中，不是HTTP错误
pub async fn bulk_update_status(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BulkStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;
    let result = state
        .service
        .bulk_update_status(&request.ids, request.status)
        .await?;
    Ok(Json(result))
}

/// 批量修改优先级
pub async fn bulk_update_priority(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BulkPriorityRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;
    let result = state
        .service
        .bulk_update_priority(&request.ids, request.priority)
        .await?;
    Ok(Json(result))
}

/// 批量指派负责人
pub async fn bulk_assign(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BulkAssignRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;
    let result = state
        .service
        .bulk_assign(&request.ids, &request.assignee)
        .await?;
    Ok(Json(result))
}

/// 批量归档
pub async fn bulk_archive(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BulkIdsRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;
    let result = state.service.bulk_archive(&request.ids).await?;
    Ok(Json(result))
}

/// 批量恢复
pub async fn bulk_restore(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BulkIdsRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;
    let result = state.service.bulk_restore(&request.ids).await?;
    Ok(Json(result))
}

/// 批量删除
pub async fn bulk_delete(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BulkIdsRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;
    let result = state.service.bulk_delete(&request.ids).await?;
    Ok(Json(result))
}

/// 生成随机演示数据
pub async fn seed_todos(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SeedRequest>,
) -> ApiResult<impl IntoResponse> {
    request.validate()?;
    let result = taskboard_service::seed_todos(&state.service, request.count).await?;
    Ok(Json(result))
}

/// 清空整个索引，维护用
pub async fn delete_all_todos(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let deleted = state.service.delete_all().await?;
    Ok(ApiResponse::success(json!({ "deleted": deleted })))
}
