use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use taskboard_service::TodoService;

use crate::handlers::{
    health::health_check,
    todos::{
        archive_todo, bulk_archive, bulk_assign, bulk_delete, bulk_restore, bulk_update_priority,
        bulk_update_status, create_todo, delete_all_todos, delete_todo, get_statistics, get_todo,
        list_todos, reorder_todo, restore_todo, search_todos, seed_todos, update_todo,
    },
};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TodoService>,
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 待办事项CRUD与搜索
        .route(
            "/api/custom_plugin/todos",
            get(list_todos).post(create_todo),
        )
        .route("/api/custom_plugin/todos/search", post(search_todos))
        .route("/api/custom_plugin/todos/statistics", get(get_statistics))
        .route("/api/custom_plugin/todos/seed", post(seed_todos))
        .route("/api/custom_plugin/todos/all", delete(delete_all_todos))
        .route(
            "/api/custom_plugin/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        // 看板操作
        .route("/api/custom_plugin/todos/{id}/archive", post(archive_todo))
        .route("/api/custom_plugin/todos/{id}/restore", post(restore_todo))
        .route("/api/custom_plugin/todos/{id}/reorder", post(reorder_todo))
        // 批量操作
        .route(
            "/api/custom_plugin/todos/bulk/status",
            post(bulk_update_status),
        )
        .route(
            "/api/custom_plugin/todos/bulk/priority",
            post(bulk_update_priority),
        )
        .route("/api/custom_plugin/todos/bulk/assign", post(bulk_assign))
        .route("/api/custom_plugin/todos/bulk/archive", post(bulk_archive))
        .route("/api/custom_plugin/todos/bulk/restore", post(bulk_restore))
        .route("/api/custom_plugin/todos/bulk/delete", post(bulk_delete))
        .with_state(state)
}
