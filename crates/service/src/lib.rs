//! 业务服务层
//!
//! 承载待办事项的全部业务策略：默认值与时间戳、看板排位、归档语义、
//! 批量结果聚合以及统计口径。状态全部保存在搜索存储中，本层自身无状态。

pub mod seed;
pub mod todo_service;

pub use seed::{seed_todos, DEFAULT_SEED_COUNT, MAX_SEED_COUNT};
pub use todo_service::{TodoPage, TodoService, POSITION_STEP};
