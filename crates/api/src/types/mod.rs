//! 请求体与查询参数的类型定义
//!
//! 路由层把原始请求整理成这里的结构，再转换为领域层输入。

pub mod requests;
pub mod search_query;

pub use requests::{
    BulkAssignRequest, BulkIdsRequest, BulkPriorityRequest, BulkStatusRequest, CreateTodoRequest,
    ReorderRequest, SeedRequest, UpdateTodoRequest,
};
pub use search_query::{params_from_query, SearchTodosRequest};
