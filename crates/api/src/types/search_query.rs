use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use taskboard_domain::{
    ComplianceStandard, SortOrder, TodoPriority, TodoSearchParams, TodoStatus, DEFAULT_PAGE,
    DEFAULT_PAGE_SIZE,
};
use validator::Validate;

use crate::error::ApiError;

const MAX_PAGE_SIZE: u32 = 1000;

/// POST /todos/search 的请求体
///
/// 数组字段同时接受单个标量和列表两种写法，和查询串形式保持一致。
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchTodosRequest {
    pub query: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub status: Vec<TodoStatus>,
    #[serde(deserialize_with = "one_or_many")]
    pub priority: Vec<TodoPriority>,
    #[serde(deserialize_with = "one_or_many")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub compliance_standards: Vec<ComplianceStandard>,
    pub assignee: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    #[validate(range(min = 1, message = "page 必须从 1 开始"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 1000, message = "size 必须在 1 到 1000 之间"))]
    pub size: Option<u32>,
    pub archived: Option<bool>,
}

impl SearchTodosRequest {
    pub fn into_params(self) -> Result<TodoSearchParams, ApiError> {
        let mut params = TodoSearchParams {
            query: self.query.filter(|q| !q.trim().is_empty()),
            status: self.status,
            priority: self.priority,
            tags: self.tags,
            compliance_standards: self.compliance_standards,
            assignee: self.assignee.filter(|a| !a.is_empty()),
            date_from: self.date_from,
            date_to: self.date_to,
            sort_field: None,
            sort_order: SortOrder::Desc,
            page: self.page.unwrap_or(DEFAULT_PAGE),
            size: self.size.unwrap_or(DEFAULT_PAGE_SIZE),
            archived: self.archived.unwrap_or(false),
        };
        if let Some(field) = self.sort_field.as_deref() {
            params.sort_field = Some(parse_token("sortField", field)?);
        }
        if let Some(order) = self.sort_order.as_deref() {
            params.sort_order = parse_token("sortOrder", order)?;
        }
        Ok(params)
    }
}

/// 把 GET /todos 的查询串键值对整理成类型化搜索参数
///
/// 数组参数接受重复键与 `[]` 后缀两种写法；空值跳过；未知键忽略；
/// 无法解析的值在进入服务层之前就以 400 拒绝。
pub fn params_from_query(pairs: &[(String, String)]) -> Result<TodoSearchParams, ApiError> {
    let mut params = TodoSearchParams::default();

    for (key, value) in pairs {
        if value.is_empty() {
            continue;
        }
        let key = key.strip_suffix("[]").unwrap_or(key);
        match key {
            "query" => params.query = Some(value.clone()),
            "status" => params.status.push(parse_token("status", value)?),
            "priority" => params.priority.push(parse_token("priority", value)?),
            "tags" => params.tags.push(value.clone()),
            "complianceStandards" => params
                .compliance_standards
                .push(parse_token("complianceStandards", value)?),
            "assignee" => params.assignee = Some(value.clone()),
            "dateFrom" => params.date_from = Some(parse_datetime("dateFrom", value)?),
            "dateTo" => params.date_to = Some(parse_datetime("dateTo", value)?),
            "sortField" => params.sort_field = Some(parse_token("sortField", value)?),
            "sortOrder" => params.sort_order = parse_token("sortOrder", value)?,
            "page" => params.page = parse_number("page", value)?,
            "size" => params.size = parse_number("size", value)?,
            "archived" => params.archived = parse_bool("archived", value)?,
            _ => {}
        }
    }

    if params.page < 1 {
        return Err(ApiError::BadRequest("page 必须从 1 开始".to_string()));
    }
    if params.size < 1 || params.size > MAX_PAGE_SIZE {
        return Err(ApiError::BadRequest(format!(
            "size 必须在 1 到 {MAX_PAGE_SIZE} 之间"
        )));
    }

    Ok(params)
}

fn parse_token<T: FromStr<Err = String>>(key: &str, value: &str) -> Result<T, ApiError> {
    value
        .parse()
        .map_err(|err| ApiError::BadRequest(format!("参数 {key} 无效: {err}")))
}

fn parse_datetime(key: &str, value: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ApiError::BadRequest(format!("参数 {key} 不是有效的日期时间: {value}")))
}

fn parse_number(key: &str, value: &str) -> Result<u32, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("参数 {key} 不是有效的数字: {value}")))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ApiError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ApiError::BadRequest(format!(
            "参数 {key} 只接受 true 或 false: {value}"
        ))),
    }
}

/// 单个标量与列表都反序列化为 `Vec<T>`
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        One(T),
        Many(Vec<T>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_domain::SortField;

    fn pairs(input: &[(&str, &str)]) -> Vec<(String, String)> {
        input
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_when_query_string_empty() {
        let params = params_from_query(&[]).unwrap();
        assert_eq!(params, TodoSearchParams::default());
        assert!(!params.archived);
    }

    #[test]
    fn test_repeated_keys_and_bracket_suffix_accumulate() {
        let params = params_from_query(&pairs(&[
            ("status", "planned"),
            ("status", "in_progress"),
            ("priority[]", "high"),
            ("priority[]", "critical"),
            ("tags[]", "vuln"),
            ("tags", "audit"),
        ]))
        .unwrap();

        assert_eq!(
            params.status,
            vec![TodoStatus::Planned, TodoStatus::InProgress]
        );
        assert_eq!(
            params.priority,
            vec![TodoPriority::High, TodoPriority::Critical]
        );
        assert_eq!(params.tags, vec!["vuln", "audit"]);
    }

    #[test]
    fn test_scalar_params_parse() {
        let params = params_from_query(&pairs(&[
            ("query", "cve"),
            ("assignee", "alice"),
            ("page", "3"),
            ("size", "50"),
            ("archived", "true"),
            ("sortField", "dueDate"),
            ("sortOrder", "asc"),
            ("dateFrom", "2026-01-01T00:00:00Z"),
        ]))
        .unwrap();

        assert_eq!(params.query.as_deref(), Some("cve"));
        assert_eq!(params.assignee.as_deref(), Some("alice"));
        assert_eq!(params.page, 3);
        assert_eq!(params.size, 50);
        assert!(params.archived);
        assert_eq!(params.sort_field, Some(SortField::DueDate));
        assert_eq!(params.sort_order, SortOrder::Asc);
        assert_eq!(
            params.date_from.unwrap().to_rfc3339(),
            "2026-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let params = params_from_query(&pairs(&[("query", ""), ("status", "")])).unwrap();
        assert!(params.query.is_none());
        assert!(params.status.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let params = params_from_query(&pairs(&[("foo", "bar"), ("page", "2")])).unwrap();
        assert_eq!(params.page, 2);
    }

    #[test]
    fn test_bad_enum_token_is_rejected_with_key_name() {
        let err = params_from_query(&pairs(&[("status", "doing")])).unwrap_err();
        assert!(err.to_string().contains("status"));

        let err = params_from_query(&pairs(&[("sortField", "created_at")])).unwrap_err();
        assert!(err.to_string().contains("sortField"));
    }

    #[test]
    fn test_bad_scalar_values_are_rejected() {
        assert!(params_from_query(&pairs(&[("page", "abc")])).is_err());
        assert!(params_from_query(&pairs(&[("archived", "yes")])).is_err());
        assert!(params_from_query(&pairs(&[("dateFrom", "next week")])).is_err());
    }

    #[test]
    fn test_page_and_size_bounds() {
        assert!(params_from_query(&pairs(&[("page", "0")])).is_err());
        assert!(params_from_query(&pairs(&[("size", "0")])).is_err());
        assert!(params_from_query(&pairs(&[("size", "1001")])).is_err());
        assert!(params_from_query(&pairs(&[("size", "1000")])).is_ok());
    }

    #[test]
    fn test_body_accepts_scalar_or_list() {
        let request: SearchTodosRequest =
            serde_json::from_str(r#"{"status": "planned", "tags": ["audit", "vuln"]}"#).unwrap();

        assert_eq!(request.status, vec![TodoStatus::Planned]);
        assert_eq!(request.tags, vec!["audit", "vuln"]);
        assert!(request.priority.is_empty());
    }

    #[test]
    fn test_body_into_params_defaults() {
        let request: SearchTodosRequest = serde_json::from_str("{}").unwrap();
        let params = request.into_params().unwrap();

        assert_eq!(params.page, DEFAULT_PAGE);
        assert_eq!(params.size, DEFAULT_PAGE_SIZE);
        assert!(!params.archived);
    }

    #[test]
    fn test_body_sort_tokens_parse_or_reject() {
        let request: SearchTodosRequest =
            serde_json::from_str(r#"{"sortField": "position", "sortOrder": "asc"}"#).unwrap();
        let params = request.into_params().unwrap();
        assert_eq!(params.sort_field, Some(SortField::Position));
        assert_eq!(params.sort_order, SortOrder::Asc);

        let request: SearchTodosRequest =
            serde_json::from_str(r#"{"sortField": "nope"}"#).unwrap();
        assert!(request.into_params().is_err());
    }

    #[test]
    fn test_body_page_bounds_via_validator() {
        let request: SearchTodosRequest = serde_json::from_str(r#"{"page": 0}"#).unwrap();
        assert!(request.validate().is_err());

        let request: SearchTodosRequest = serde_json::from_str(r#"{"size": 1001}"#).unwrap();
        assert!(request.validate().is_err());

        let request: SearchTodosRequest =
            serde_json::from_str(r#"{"page": 2, "size": 10}"#).unwrap();
        assert!(request.validate().is_ok());
    }
}
