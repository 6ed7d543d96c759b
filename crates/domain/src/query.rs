use serde_json::{json, Map, Value};

use crate::search::{SearchSort, SortOrder};

/// 布尔查询的单个子句，渲染成搜索引擎的查询DSL由各存储后端完成
#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    MatchAll,
    /// 大小写归一后的短语前缀匹配，fields 内携带权重后缀（如 "title^2"）
    MultiMatchPhrasePrefix { query: String, fields: Vec<String> },
    Term { field: String, value: Value },
    Terms { field: String, values: Vec<Value> },
    Range {
        field: String,
        gte: Option<Value>,
        lte: Option<Value>,
    },
}

fn single_key(key: &str, value: Value) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Object(map)
}

impl QueryClause {
    pub fn to_value(&self) -> Value {
        match self {
            QueryClause::MatchAll => json!({ "match_all": {} }),
            QueryClause::MultiMatchPhrasePrefix { query, fields } => json!({
                "multi_match": {
                    "query": query,
                    "type": "phrase_prefix",
                    "fields": fields,
                }
            }),
            QueryClause::Term { field, value } => {
                single_key("term", single_key(field, value.clone()))
            }
            QueryClause::Terms { field, values } => {
                single_key("terms", single_key(field, Value::Array(values.clone())))
            }
            QueryClause::Range { field, gte, lte } => {
                let mut bounds = Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".to_string(), gte.clone());
                }
                if let Some(lte) = lte {
                    bounds.insert("lte".to_string(), lte.clone());
                }
                single_key("range", single_key(field, Value::Object(bounds)))
            }
        }
    }
}

/// 查询构建器的输出：must 承载打分子句，filter 承载精确/范围过滤
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<QueryClause>,
    pub filter: Vec<QueryClause>,
}

impl BoolQuery {
    pub fn match_all() -> Self {
        Self {
            must: vec![QueryClause::MatchAll],
            filter: Vec::new(),
        }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "bool": {
                "must": self.must.iter().map(QueryClause::to_value).collect::<Vec<_>>(),
                "filter": self.filter.iter().map(QueryClause::to_value).collect::<Vec<_>>(),
            }
        })
    }
}

impl SearchSort {
    /// 字段排序缺失值策略：升序排到末尾、降序排到开头；相关度排序不受影响
    pub fn to_value(&self) -> Value {
        match self {
            SearchSort::Relevance => json!({ "_score": { "order": "desc" } }),
            SearchSort::Field { field, order } => {
                let missing = match order {
                    SortOrder::Asc => "_last",
                    SortOrder::Desc => "_first",
                };
                single_key(
                    field.field_path(),
                    json!({ "order": order.as_str(), "missing": missing }),
                )
            }
        }
    }
}

/// 一次搜索调用的完整请求
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: BoolQuery,
    pub sort: SearchSort,
    pub from: u64,
    pub size: u32,
}

impl SearchRequest {
    pub fn to_body(&self) -> Value {
        json!({
            "query": self.query.to_value(),
            "sort": [self.sort.to_value()],
            "from": self.from,
            "size": self.size,
            "track_total_hits": true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SortField;

    #[test]
    fn test_match_all_rendering() {
        assert_eq!(QueryClause::MatchAll.to_value(), json!({ "match_all": {} }));
    }

    #[test]
    fn test_term_rendering() {
        let clause = QueryClause::Term {
            field: "archived".to_string(),
            value: json!(false),
        };
        assert_eq!(clause.to_value(), json!({ "term": { "archived": false } }));
    }

    #[test]
    fn test_terms_rendering() {
        let clause = QueryClause::Terms {
            field: "status".to_string(),
            values: vec![json!("planned"), json!("in_progress")],
        };
        assert_eq!(
            clause.to_value(),
            json!({ "terms": { "status": ["planned", "in_progress"] } })
        );
    }

    #[test]
    fn test_range_rendering_with_both_bounds() {
        let clause = QueryClause::Range {
            field: "createdAt".to_string(),
            gte: Some(json!("2024-01-01T00:00:00Z")),
            lte: Some(json!("2024-12-31T00:00:00Z")),
        };
        assert_eq!(
            clause.to_value(),
            json!({
                "range": {
                    "createdAt": {
                        "gte": "2024-01-01T00:00:00Z",
                        "lte": "2024-12-31T00:00:00Z",
                    }
                }
            })
        );
    }

    #[test]
    fn test_range_rendering_with_lower_bound_only() {
        let clause = QueryClause::Range {
            field: "createdAt".to_string(),
            gte: Some(json!("2024-01-01T00:00:00Z")),
            lte: None,
        };
        assert_eq!(
            clause.to_value(),
            json!({ "range": { "createdAt": { "gte": "2024-01-01T00:00:00Z" } } })
        );
    }

    #[test]
    fn test_multi_match_rendering_keeps_boost_fields() {
        let clause = QueryClause::MultiMatchPhrasePrefix {
            query: "patch cve".to_string(),
            fields: vec!["title^2".to_string(), "description".to_string()],
        };
        assert_eq!(
            clause.to_value(),
            json!({
                "multi_match": {
                    "query": "patch cve",
                    "type": "phrase_prefix",
                    "fields": ["title^2", "description"],
                }
            })
        );
    }

    #[test]
    fn test_bool_query_rendering() {
        let query = BoolQuery {
            must: vec![QueryClause::MatchAll],
            filter: vec![QueryClause::Term {
                field: "archived".to_string(),
                value: json!(false),
            }],
        };
        assert_eq!(
            query.to_value(),
            json!({
                "bool": {
                    "must": [{ "match_all": {} }],
                    "filter": [{ "term": { "archived": false } }],
                }
            })
        );
    }

    #[test]
    fn test_sort_missing_policy() {
        let asc = SearchSort::Field {
            field: SortField::DueDate,
            order: SortOrder::Asc,
        };
        assert_eq!(
            asc.to_value(),
            json!({ "dueDate": { "order": "asc", "missing": "_last" } })
        );

        let desc = SearchSort::Field {
            field: SortField::DueDate,
            order: SortOrder::Desc,
        };
        assert_eq!(
            desc.to_value(),
            json!({ "dueDate": { "order": "desc", "missing": "_first" } })
        );

        assert_eq!(
            SearchSort::Relevance.to_value(),
            json!({ "_score": { "order": "desc" } })
        );
    }

    #[test]
    fn test_search_request_body() {
        let request = SearchRequest {
            query: BoolQuery::match_all(),
            sort: SearchSort::Field {
                field: SortField::Position,
                order: SortOrder::Asc,
            },
            from: 20,
            size: 10,
        };
        let body = request.to_body();
        assert_eq!(body["from"], json!(20));
        assert_eq!(body["size"], json!(10));
        assert_eq!(body["track_total_hits"], json!(true));
        assert_eq!(body["sort"][0]["position"]["order"], json!("asc"));
        assert_eq!(body["query"]["bool"]["must"][0], json!({ "match_all": {} }));
    }
}
