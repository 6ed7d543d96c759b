//! 待办事项索引的字段映射定义
//!
//! 精确匹配字段使用 keyword，全文检索字段使用 text，时间字段使用 date。
//! title 额外提供 keyword 子字段以支持排序。

use serde_json::{json, Value};

/// Field mappings for the todo document collection
pub fn index_mappings() -> Value {
    json!({
        "properties": {
            "id": { "type": "keyword" },
            "title": {
                "type": "text",
                "fields": {
                    "keyword": { "type": "keyword" }
                }
            },
            "description": { "type": "text" },
            "status": { "type": "keyword" },
            "priority": { "type": "keyword" },
            "tags": { "type": "keyword" },
            "complianceStandards": { "type": "keyword" },
            "assignee": { "type": "keyword" },
            "createdAt": { "type": "date" },
            "updatedAt": { "type": "date" },
            "plannedDate": { "type": "date" },
            "dueDate": { "type": "date" },
            "completedAt": { "type": "date" },
            "archivedAt": { "type": "date" },
            "errorDetails": { "type": "text" },
            "archived": { "type": "boolean" },
            "storyPoints": { "type": "integer" },
            "coverImage": { "type": "keyword", "index": false },
            "position": { "type": "float" }
        }
    })
}

/// Index template body covering the concrete index and any future rollover indices
pub fn index_template_body(index: &str) -> Value {
    json!({
        "index_patterns": [index],
        "template": {
            "mappings": index_mappings()
        }
    })
}
