//! # Taskboard API
//!
//! 安全合规待办事项服务的REST API层，基于Axum构建。
//!
//! ## API 端点
//!
//! 基础路径为 `/api/custom_plugin`：
//!
//! - `GET /todos` - 列表/搜索（查询串）
//! - `POST /todos` - 创建
//! - `GET /todos/{id}` - 获取单条
//! - `PUT /todos/{id}` - 部分更新
//! - `DELETE /todos/{id}` - 删除
//! - `POST /todos/search` - 搜索（JSON请求体）
//! - `GET /todos/statistics` - 聚合统计
//! - `POST /todos/{id}/archive` / `restore` / `reorder` - 看板操作
//! - `POST /todos/bulk/status` / `priority` / `assign` / `archive` / `restore` / `delete` - 批量操作
//! - `POST /todos/seed` - 生成演示数据
//! - `DELETE /todos/all` - 清空索引
//!
//! 另有 `GET /health` 存活探针。
//!
//! ## 响应格式
//!
//! 统一信封 `{success, data?, message?, error?}`；批量操作返回
//! `{success, processed, failed, errors?}`，部分失败是数据而不是HTTP错误。
//! 错误映射：不存在 404，参数问题 400，存储故障 500。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use taskboard_api::create_app;
//! use taskboard_core::AppConfig;
//! use taskboard_infrastructure::MemorySearchStore;
//! use taskboard_service::TodoService;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = AppConfig::default();
//! let store = Arc::new(MemorySearchStore::new());
//! let service = Arc::new(TodoService::new(store));
//! let app = create_app(service, &config.api);
//!
//! let listener = tokio::net::TcpListener::bind(&config.api.bind_address)
//!     .await
//!     .unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod types;
pub mod validation;

use std::sync::Arc;

use axum::Router;
use taskboard_core::ApiConfig;
use taskboard_service::TodoService;
use tower::ServiceBuilder;

use middleware::{cors_layer, request_logging, timeout_layer, trace_layer};
use routes::{create_routes, AppState};

/// 创建完整的API应用
pub fn create_app(service: Arc<TodoService>, api_config: &ApiConfig) -> Router {
    let state = AppState { service };

    // 超时层放最内侧，408在日志中间件里照常记录
    create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(cors_layer(api_config))
            .layer(axum::middleware::from_fn(request_logging))
            .layer(timeout_layer(api_config)),
    )
}
