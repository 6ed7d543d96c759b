use chrono::{DateTime, Utc};

use crate::entities::{ComplianceStandard, TodoPriority, TodoStatus};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Invalid sort order: {s}")),
        }
    }
}

/// 允许排序的字段，wire名与文档字段一致
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    PlannedDate,
    DueDate,
    CompletedAt,
    Position,
    StoryPoints,
    Title,
    Priority,
    Status,
}

impl SortField {
    /// 搜索请求里实际使用的字段路径，title 走 keyword 子字段才能排序
    pub fn field_path(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::PlannedDate => "plannedDate",
            SortField::DueDate => "dueDate",
            SortField::CompletedAt => "completedAt",
            SortField::Position => "position",
            SortField::StoryPoints => "storyPoints",
            SortField::Title => "title.keyword",
            SortField::Priority => "priority",
            SortField::Status => "status",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            "plannedDate" => Ok(SortField::PlannedDate),
            "dueDate" => Ok(SortField::DueDate),
            "completedAt" => Ok(SortField::CompletedAt),
            "position" => Ok(SortField::Position),
            "storyPoints" => Ok(SortField::StoryPoints),
            "title" => Ok(SortField::Title),
            "priority" => Ok(SortField::Priority),
            "status" => Ok(SortField::Status),
            _ => Err(format!("Invalid sort field: {s}")),
        }
    }
}

/// 生效的排序方式：显式字段排序或按相关度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    Relevance,
    Field { field: SortField, order: SortOrder },
}

/// 规范化后的搜索参数，路由层负责把原始请求整理成该结构
#[derive(Debug, Clone, PartialEq)]
pub struct TodoSearchParams {
    pub query: Option<String>,
    pub status: Vec<TodoStatus>,
    pub priority: Vec<TodoPriority>,
    pub tags: Vec<String>,
    pub compliance_standards: Vec<ComplianceStandard>,
    pub assignee: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
    pub page: u32,
    pub size: u32,
    pub archived: bool,
}

impl Default for TodoSearchParams {
    fn default() -> Self {
        Self {
            query: None,
            status: Vec::new(),
            priority: Vec::new(),
            tags: Vec::new(),
            compliance_standards: Vec::new(),
            assignee: None,
            date_from: None,
            date_to: None,
            sort_field: None,
            sort_order: SortOrder::Desc,
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            archived: false,
        }
    }
}

impl TodoSearchParams {
    pub fn has_text_query(&self) -> bool {
        self.query
            .as_deref()
            .is_some_and(|q| !q.trim().is_empty())
    }

    /// offset = (page - 1) * size
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.size)
    }

    /// 未指定排序字段时：有检索词按相关度，否则按创建时间倒序
    pub fn effective_sort(&self) -> SearchSort {
        match self.sort_field {
            Some(field) => SearchSort::Field {
                field,
                order: self.sort_order,
            },
            None if self.has_text_query() => SearchSort::Relevance,
            None => SearchSort::Field {
                field: SortField::CreatedAt,
                order: SortOrder::Desc,
            },
        }
    }
}
