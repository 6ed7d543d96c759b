use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use taskboard_domain::entities::TodoRecord;
use taskboard_domain::ports::{BulkItemResult, BulkOp, SearchOutcome, SearchStore};
use taskboard_domain::query::{BoolQuery, QueryClause, SearchRequest};
use taskboard_domain::search::SortOrder;
use taskboard_domain::{SearchSort, TaskboardResult};

/// 进程内的搜索存储实现，用于测试和无外部依赖的本地运行
///
/// 查询语义是对HTTP后端的近似：全文匹配退化为小写子串匹配，
/// 相关性排序退化为按创建时间倒序。
pub struct MemorySearchStore {
    docs: RwLock<HashMap<String, TodoRecord>>,
}

impl MemorySearchStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    fn clause_matches(doc: &Value, clause: &QueryClause) -> bool {
        match clause {
            QueryClause::MatchAll => true,
            QueryClause::MultiMatchPhrasePrefix { query, fields } => fields.iter().any(|field| {
                let base = field.split('^').next().unwrap_or(field);
                doc.get(base)
                    .and_then(Value::as_str)
                    .map(|text| text.to_lowercase().contains(query.as_str()))
                    .unwrap_or(false)
            }),
            QueryClause::Term { field, value } => match doc.get(field) {
                Some(Value::Array(items)) => items.contains(value),
                Some(actual) => actual == value,
                None => false,
            },
            QueryClause::Terms { field, values } => match doc.get(field) {
                Some(Value::Array(items)) => items.iter().any(|item| values.contains(item)),
                Some(actual) => values.contains(actual),
                None => false,
            },
            QueryClause::Range { field, gte, lte } => {
                let Some(actual) = doc.get(field).filter(|v| !v.is_null()) else {
                    return false;
                };
                let lower_ok = gte.as_ref().map_or(true, |bound| {
                    Self::compare_values(actual, bound)
                        .map_or(false, |ordering| ordering != Ordering::Less)
                });
                let upper_ok = lte.as_ref().map_or(true, |bound| {
                    Self::compare_values(actual, bound)
                        .map_or(false, |ordering| ordering != Ordering::Greater)
                });
                lower_ok && upper_ok
            }
        }
    }

    fn query_matches(doc: &Value, query: &BoolQuery) -> bool {
        query
            .must
            .iter()
            .all(|clause| Self::clause_matches(doc, clause))
            && query
                .filter
                .iter()
                .all(|clause| Self::clause_matches(doc, clause))
    }

    /// RFC3339字符串按时间比较，数字按数值比较，其余按原样比较
    fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
            (Value::String(x), Value::String(y)) => {
                match (
                    DateTime::parse_from_rfc3339(x),
                    DateTime::parse_from_rfc3339(y),
                ) {
                    (Ok(dx), Ok(dy)) => Some(dx.cmp(&dy)),
                    _ => Some(x.cmp(y)),
                }
            }
            (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
            _ => None,
        }
    }

    /// 升序时缺失值排末尾；降序通过整体反转得到缺失值排开头的效果
    fn compare_docs(a: &Value, b: &Value, field: &str) -> Ordering {
        let a_val = a.get(field).filter(|v| !v.is_null());
        let b_val = b.get(field).filter(|v| !v.is_null());
        match (a_val, b_val) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => Self::compare_values(x, y).unwrap_or(Ordering::Equal),
        }
    }

    fn sort_matches(matches: &mut [(Value, TodoRecord)], sort: &SearchSort) {
        match sort {
            SearchSort::Relevance => {
                // 内存后端不计算相关性得分
                matches.sort_by(|(_, a), (_, b)| b.created_at.cmp(&a.created_at));
            }
            SearchSort::Field { field, order } => {
                let path = field.field_path();
                let field_name = path.strip_suffix(".keyword").unwrap_or(path).to_string();
                matches.sort_by(|(a, _), (b, _)| {
                    let ordering = Self::compare_docs(a, b, &field_name);
                    match order {
                        SortOrder::Asc => ordering,
                        SortOrder::Desc => ordering.reverse(),
                    }
                });
            }
        }
    }

    /// 部分更新：文档字段覆盖现有值，显式null清除字段
    fn apply_partial(record: &TodoRecord, doc: &Value) -> Result<TodoRecord, String> {
        let mut merged = serde_json::to_value(record).map_err(|e| e.to_string())?;
        let Some(target) = merged.as_object_mut() else {
            return Err("document is not an object".to_string());
        };
        if let Some(patch) = doc.as_object() {
            for (key, value) in patch {
                if value.is_null() {
                    target.remove(key);
                } else {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
        serde_json::from_value(merged).map_err(|e| e.to_string())
    }
}

impl Default for MemorySearchStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchStore for MemorySearchStore {
    async fn ensure_index(&self) -> TaskboardResult<()> {
        Ok(())
    }

    async fn put(&self, record: &TodoRecord) -> TaskboardResult<()> {
        let mut docs = self.docs.write().await;
        docs.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> TaskboardResult<Option<TodoRecord>> {
        let docs = self.docs.read().await;
        Ok(docs.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> TaskboardResult<bool> {
        let mut docs = self.docs.write().await;
        Ok(docs.remove(id).is_some())
    }

    async fn bulk(&self, ops: &[BulkOp]) -> TaskboardResult<Vec<BulkItemResult>> {
        let mut docs = self.docs.write().await;
        let mut results = Vec::with_capacity(ops.len());
        for op in ops {
            let error = match op {
                BulkOp::Index { record } => {
                    docs.insert(record.id.clone(), record.clone());
                    None
                }
                BulkOp::Update { id, doc } => match docs.get(id) {
                    Some(existing) => match Self::apply_partial(existing, doc) {
                        Ok(updated) => {
                            docs.insert(id.clone(), updated);
                            None
                        }
                        Err(e) => Some(e),
                    },
                    None => Some(format!(
                        "document_missing_exception: [{id}]: document missing"
                    )),
                },
                // 与HTTP后端一致：删除不存在的文档不算条目错误
                BulkOp::Delete { id } => {
                    docs.remove(id);
                    None
                }
            };
            results.push(BulkItemResult {
                id: op.id().to_string(),
                error,
            });
        }
        Ok(results)
    }

    #[instrument(skip(self, request))]
    async fn search(&self, request: &SearchRequest) -> TaskboardResult<SearchOutcome> {
        let docs = self.docs.read().await;
        let mut matches = Vec::new();
        for record in docs.values() {
            let doc = serde_json::to_value(record)?;
            if Self::query_matches(&doc, &request.query) {
                matches.push((doc, record.clone()));
            }
        }
        drop(docs);

        let total = matches.len() as u64;
        Self::sort_matches(&mut matches, &request.sort);

        let items = matches
            .into_iter()
            .skip(request.from as usize)
            .take(request.size as usize)
            .map(|(_, record)| record)
            .collect();

        debug!("内存查询命中 {} 条", total);
        Ok(SearchOutcome { items, total })
    }

    async fn delete_by_query(&self, query: &BoolQuery) -> TaskboardResult<u64> {
        let mut docs = self.docs.write().await;
        let mut doomed = Vec::new();
        for (id, record) in docs.iter() {
            let doc = serde_json::to_value(record)?;
            if Self::query_matches(&doc, query) {
                doomed.push(id.clone());
            }
        }
        for id in &doomed {
            docs.remove(id);
        }
        Ok(doomed.len() as u64)
    }
}
