use validator::ValidationError;

pub const MAX_TITLE_LENGTH: usize = 500;

/// 验证待办事项标题：不能为空白，长度不超过500个字符
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::new("标题不能为空"));
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::new("标题长度不能超过500个字符"));
    }

    Ok(())
}
