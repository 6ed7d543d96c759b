use chrono::{DateTime, Utc};
use serde::Deserialize;
use taskboard_domain::{ComplianceStandard, CreateTodo, TodoPriority, TodoStatus, TodoUpdate};
use taskboard_service::DEFAULT_SEED_COUNT;
use validator::Validate;

use crate::validation::validate_title;

/// 创建待办事项的请求体，id/时间戳/排序位置由服务端分配
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[validate(custom(function = validate_title))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
    pub tags: Option<Vec<String>>,
    pub compliance_standards: Option<Vec<ComplianceStandard>>,
    pub assignee: Option<String>,
    pub planned_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub story_points: Option<u32>,
    pub cover_image: Option<String>,
}

impl CreateTodoRequest {
    pub fn into_create(self) -> CreateTodo {
        CreateTodo {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            tags: self.tags,
            compliance_standards: self.compliance_standards,
            assignee: self.assignee,
            planned_date: self.planned_date,
            due_date: self.due_date,
            story_points: self.story_points,
            cover_image: self.cover_image,
        }
    }
}

/// 部分更新的请求体，缺省字段保持原值
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[validate(custom(function = validate_title))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
    pub tags: Option<Vec<String>>,
    pub compliance_standards: Option<Vec<ComplianceStandard>>,
    pub assignee: Option<String>,
    pub planned_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_details: Option<String>,
    pub story_points: Option<u32>,
    pub cover_image: Option<String>,
    pub position: Option<f64>,
}

impl UpdateTodoRequest {
    pub fn into_update(self) -> TodoUpdate {
        TodoUpdate {
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            tags: self.tags,
            compliance_standards: self.compliance_standards,
            assignee: self.assignee,
            planned_date: self.planned_date,
            due_date: self.due_date,
            completed_at: self.completed_at,
            error_details: self.error_details,
            story_points: self.story_points,
            cover_image: self.cover_image,
            position: self.position,
        }
    }
}

/// 看板内移动：目标状态列与新的排序位置
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub status: TodoStatus,
    pub position: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkIdsRequest {
    #[validate(length(min = 1, message = "ids 不能为空"))]
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkStatusRequest {
    #[validate(length(min = 1, message = "ids 不能为空"))]
    pub ids: Vec<String>,
    pub status: TodoStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkPriorityRequest {
    #[validate(length(min = 1, message = "ids 不能为空"))]
    pub ids: Vec<String>,
    pub priority: TodoPriority,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkAssignRequest {
    #[validate(length(min = 1, message = "ids 不能为空"))]
    pub ids: Vec<String>,
    #[validate(length(min = 1, message = "assignee 不能为空"))]
    pub assignee: String,
}

/// 生成演示数据的请求体，count 缺省为 100
#[derive(Debug, Deserialize, Validate)]
pub struct SeedRequest {
    #[serde(default = "default_seed_count")]
    #[validate(range(min = 1, max = 10000, message = "count 必须在 1 到 10000 之间"))]
    pub count: u32,
}

fn default_seed_count() -> u32 {
    DEFAULT_SEED_COUNT
}
