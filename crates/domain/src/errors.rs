use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum TaskboardError {
    #[error("待办事项不存在: id={id}")]
    TodoNotFound { id: String },
    #[error("搜索存储操作失败: {0}")]
    Store(String),
    #[error("索引初始化失败: {0}")]
    IndexProvision(String),
    #[error("数据序列化错误: {0}")]
    Serialization(String),
    #[error("数据验证失败: {0}")]
    ValidationError(String),
    #[error("配置错误: {0}")]
    Configuration(String),
    #[error("系统内部错误: {0}")]
    Internal(String),
}

pub type TaskboardResult<T> = Result<T, TaskboardError>;

impl TaskboardError {
    pub fn todo_not_found<S: Into<String>>(id: S) -> Self {
        Self::TodoNotFound { id: id.into() }
    }
    pub fn store_error<S: Into<String>>(msg: S) -> Self {
        Self::Store(msg.into())
    }
    pub fn index_error<S: Into<String>>(msg: S) -> Self {
        Self::IndexProvision(msg.into())
    }
    pub fn validation_error<S: Into<String>>(msg: S) -> Self {
        Self::ValidationError(msg.into())
    }
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }
    /// 路由层据此把错误映射为 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskboardError::TodoNotFound { .. })
    }
}

impl From<serde_json::Error> for TaskboardError {
    fn from(err: serde_json::Error) -> Self {
        TaskboardError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_contains_id() {
        let err = TaskboardError::todo_not_found("abc-123");
        assert_eq!(err.to_string(), "待办事项不存在: id=abc-123");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_store_error_message() {
        let err = TaskboardError::store_error("connection refused");
        assert_eq!(err.to_string(), "搜索存储操作失败: connection refused");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{broken").unwrap_err();
        let err: TaskboardError = parse_err.into();
        assert!(matches!(err, TaskboardError::Serialization(_)));
        assert!(err.to_string().starts_with("数据序列化错误"));
    }

    #[test]
    fn test_validation_error_message() {
        let err = TaskboardError::validation_error("title 不能为空");
        assert_eq!(err.to_string(), "数据验证失败: title 不能为空");
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = TaskboardError::store_error("bulk item rejected");
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
