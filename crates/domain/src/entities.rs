use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 待办事项记录，存储层与API共用同一JSON形态（camelCase字段名）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub compliance_standards: Vec<ComplianceStandard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub position: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TodoStatus {
    #[serde(rename = "planned")]
    Planned,
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "completed_success")]
    CompletedSuccess,
    #[serde(rename = "completed_error")]
    CompletedError,
    #[serde(rename = "blocked")]
    Blocked,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Planned => "planned",
            TodoStatus::InProgress => "in_progress",
            TodoStatus::CompletedSuccess => "completed_success",
            TodoStatus::CompletedError => "completed_error",
            TodoStatus::Blocked => "blocked",
        }
    }

    pub fn all() -> [TodoStatus; 5] {
        [
            TodoStatus::Planned,
            TodoStatus::InProgress,
            TodoStatus::CompletedSuccess,
            TodoStatus::CompletedError,
            TodoStatus::Blocked,
        ]
    }
}

impl std::str::FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(TodoStatus::Planned),
            "in_progress" => Ok(TodoStatus::InProgress),
            "completed_success" => Ok(TodoStatus::CompletedSuccess),
            "completed_error" => Ok(TodoStatus::CompletedError),
            "blocked" => Ok(TodoStatus::Blocked),
            _ => Err(format!("Invalid todo status: {s}")),
        }
    }
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TodoPriority {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "critical")]
    Critical,
}

impl TodoPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoPriority::Low => "low",
            TodoPriority::Medium => "medium",
            TodoPriority::High => "high",
            TodoPriority::Critical => "critical",
        }
    }

    pub fn all() -> [TodoPriority; 4] {
        [
            TodoPriority::Low,
            TodoPriority::Medium,
            TodoPriority::High,
            TodoPriority::Critical,
        ]
    }
}

impl std::str::FromStr for TodoPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TodoPriority::Low),
            "medium" => Ok(TodoPriority::Medium),
            "high" => Ok(TodoPriority::High),
            "critical" => Ok(TodoPriority::Critical),
            _ => Err(format!("Invalid todo priority: {s}")),
        }
    }
}

impl std::fmt::Display for TodoPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 合规标准枚举，用于安全合规类任务的归类统计
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComplianceStandard {
    #[serde(rename = "pci_dss")]
    PciDss,
    #[serde(rename = "iso_27001")]
    Iso27001,
    #[serde(rename = "sox")]
    Sox,
    #[serde(rename = "hipaa")]
    Hipaa,
    #[serde(rename = "gdpr")]
    Gdpr,
    #[serde(rename = "nist")]
    Nist,
}

impl ComplianceStandard {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStandard::PciDss => "pci_dss",
            ComplianceStandard::Iso27001 => "iso_27001",
            ComplianceStandard::Sox => "sox",
            ComplianceStandard::Hipaa => "hipaa",
            ComplianceStandard::Gdpr => "gdpr",
            ComplianceStandard::Nist => "nist",
        }
    }

    pub fn all() -> [ComplianceStandard; 6] {
        [
            ComplianceStandard::PciDss,
            ComplianceStandard::Iso27001,
            ComplianceStandard::Sox,
            ComplianceStandard::Hipaa,
            ComplianceStandard::Gdpr,
            ComplianceStandard::Nist,
        ]
    }
}

impl std::str::FromStr for ComplianceStandard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pci_dss" => Ok(ComplianceStandard::PciDss),
            "iso_27001" => Ok(ComplianceStandard::Iso27001),
            "sox" => Ok(ComplianceStandard::Sox),
            "hipaa" => Ok(ComplianceStandard::Hipaa),
            "gdpr" => Ok(ComplianceStandard::Gdpr),
            "nist" => Ok(ComplianceStandard::Nist),
            _ => Err(format!("Invalid compliance standard: {s}")),
        }
    }
}

impl std::fmt::Display for ComplianceStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TodoRecord {
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description: None,
            status: TodoStatus::Planned,   // 默认进入计划列
            priority: TodoPriority::Medium, // 默认中等优先级
            tags: Vec::new(),
            compliance_standards: Vec::new(),
            assignee: None,
            created_at: now,
            updated_at: now,
            planned_date: None,
            due_date: None,
            completed_at: None,
            archived_at: None,
            error_details: None,
            archived: false,
            story_points: None,
            cover_image: None,
            position: 0.0, // 由服务层按所在状态列计算
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(
            self.status,
            TodoStatus::CompletedSuccess | TodoStatus::CompletedError
        )
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, TodoStatus::Planned | TodoStatus::InProgress)
            && self.due_date.is_some_and(|due| due < now)
    }

    pub fn entity_description(&self) -> String {
        format!(
            "待办事项 '{}' (ID: {}, 状态: {})",
            self.title, self.id, self.status
        )
    }
}

/// 创建待办事项的输入，id/时间戳/排序位置由服务端分配
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TodoStatus>,
    #[serde(default)]
    pub priority: Option<TodoPriority>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub compliance_standards: Option<Vec<ComplianceStandard>>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub planned_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub story_points: Option<u32>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// 部分更新输入，缺省的字段保持原值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TodoStatus>,
    #[serde(default)]
    pub priority: Option<TodoPriority>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub compliance_standards: Option<Vec<ComplianceStandard>>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub planned_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_details: Option<String>,
    #[serde(default)]
    pub story_points: Option<u32>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub position: Option<f64>,
}

impl TodoUpdate {
    /// 把提供的字段覆盖到已有记录上，归档标记由专门的归档/恢复路径维护
    pub fn apply_to(&self, record: &mut TodoRecord) {
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(priority) = self.priority {
            record.priority = priority;
        }
        if let Some(tags) = &self.tags {
            record.tags = tags.clone();
        }
        if let Some(standards) = &self.compliance_standards {
            record.compliance_standards = standards.clone();
        }
        if let Some(assignee) = &self.assignee {
            record.assignee = Some(assignee.clone());
        }
        if let Some(planned_date) = self.planned_date {
            record.planned_date = Some(planned_date);
        }
        if let Some(due_date) = self.due_date {
            record.due_date = Some(due_date);
        }
        if let Some(completed_at) = self.completed_at {
            record.completed_at = Some(completed_at);
        }
        if let Some(error_details) = &self.error_details {
            record.error_details = Some(error_details.clone());
        }
        if let Some(story_points) = self.story_points {
            record.story_points = Some(story_points);
        }
        if let Some(cover_image) = &self.cover_image {
            record.cover_image = Some(cover_image.clone());
        }
        if let Some(position) = self.position {
            record.position = position;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.tags.is_none()
            && self.compliance_standards.is_none()
            && self.assignee.is_none()
            && self.planned_date.is_none()
            && self.due_date.is_none()
            && self.completed_at.is_none()
            && self.error_details.is_none()
            && self.story_points.is_none()
            && self.cover_image.is_none()
            && self.position.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = TodoRecord::new("修复防火墙规则".to_string());

        assert!(!record.id.is_empty());
        assert_eq!(record.status, TodoStatus::Planned);
        assert_eq!(record.priority, TodoPriority::Medium);
        assert!(record.tags.is_empty());
        assert!(record.compliance_standards.is_empty());
        assert!(!record.archived);
        assert!(record.archived_at.is_none());
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_new_record_ids_are_unique() {
        let a = TodoRecord::new("same title".to_string());
        let b = TodoRecord::new("same title".to_string());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_status_serde_tokens() {
        assert_eq!(
            serde_json::to_string(&TodoStatus::CompletedSuccess).unwrap(),
            "\"completed_success\""
        );
        assert_eq!(
            serde_json::from_str::<TodoStatus>("\"in_progress\"").unwrap(),
            TodoStatus::InProgress
        );
        for status in TodoStatus::all() {
            let token = serde_json::to_string(&status).unwrap();
            assert_eq!(token, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_compliance_serde_tokens() {
        assert_eq!(
            serde_json::to_string(&ComplianceStandard::Iso27001).unwrap(),
            "\"iso_27001\""
        );
        for standard in ComplianceStandard::all() {
            let token = serde_json::to_string(&standard).unwrap();
            assert_eq!(token, format!("\"{}\"", standard.as_str()));
            let parsed: ComplianceStandard = standard.as_str().parse().unwrap();
            assert_eq!(parsed, standard);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown_tokens() {
        assert!("PLANNED".parse::<TodoStatus>().is_err());
        assert!("urgent".parse::<TodoPriority>().is_err());
        assert!("iso27001".parse::<ComplianceStandard>().is_err());
    }

    #[test]
    fn test_record_wire_format_is_camel_case() {
        let mut record = TodoRecord::new("检查审计日志".to_string());
        record.story_points = Some(3);
        record.due_date = Some(Utc::now());

        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("createdAt"));
        assert!(obj.contains_key("updatedAt"));
        assert!(obj.contains_key("complianceStandards"));
        assert!(obj.contains_key("storyPoints"));
        assert!(obj.contains_key("dueDate"));
        // 未设置的可选字段不应出现在文档中
        assert!(!obj.contains_key("archivedAt"));
        assert!(!obj.contains_key("coverImage"));
    }

    #[test]
    fn test_update_apply_to_merges_provided_fields() {
        let mut record = TodoRecord::new("旧标题".to_string());
        let before_priority = record.priority;

        let update = TodoUpdate {
            title: Some("新标题".to_string()),
            status: Some(TodoStatus::InProgress),
            position: Some(2500.0),
            ..Default::default()
        };
        update.apply_to(&mut record);

        assert_eq!(record.title, "新标题");
        assert_eq!(record.status, TodoStatus::InProgress);
        assert_eq!(record.position, 2500.0);
        // 未提供的字段保持不变
        assert_eq!(record.priority, before_priority);
        assert!(record.description.is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(TodoUpdate::default().is_empty());
        let update = TodoUpdate {
            assignee: Some("alice".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_is_overdue() {
        let now = Utc::now();
        let mut record = TodoRecord::new("轮换密钥".to_string());
        assert!(!record.is_overdue(now));

        record.due_date = Some(now - chrono::Duration::hours(1));
        assert!(record.is_overdue(now));

        // 已完成的任务不算逾期
        record.status = TodoStatus::CompletedSuccess;
        assert!(!record.is_overdue(now));
    }

    #[test]
    fn test_entity_description() {
        let record = TodoRecord::new("升级TLS证书".to_string());
        let description = record.entity_description();
        assert!(description.contains("升级TLS证书"));
        assert!(description.contains(&record.id));
    }
}
