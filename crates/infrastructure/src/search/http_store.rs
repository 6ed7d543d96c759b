use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use taskboard_core::SearchConfig;
use taskboard_domain::entities::TodoRecord;
use taskboard_domain::ports::{BulkItemResult, BulkOp, SearchOutcome, SearchStore};
use taskboard_domain::query::{BoolQuery, SearchRequest};
use taskboard_domain::{TaskboardError, TaskboardResult};

use super::mappings;

/// 基于HTTP的搜索存储实现，对接Elasticsearch/OpenSearch兼容的REST接口
///
/// 所有写操作均带 `refresh=true`，保证同一请求链路内写后读一致。
pub struct HttpSearchStore {
    http_client: reqwest::Client,
    base_url: String,
    index: String,
}

impl HttpSearchStore {
    pub fn new(config: &SearchConfig) -> TaskboardResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| TaskboardError::store_error(format!("创建HTTP客户端失败: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
        })
    }

    fn index_url(&self) -> String {
        format!("{}/{}", self.base_url, self.index)
    }

    fn doc_url(&self, id: &str) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index, id)
    }

    fn connection_error(operation: &str, e: reqwest::Error) -> TaskboardError {
        warn!("搜索服务连接失败: {} - {}", operation, e);
        TaskboardError::store_error(format!("{operation}连接失败: {e}"))
    }

    async fn response_error(operation: &str, response: reqwest::Response) -> TaskboardError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!("搜索存储请求失败: {} HTTP {} - {}", operation, status, body);
        TaskboardError::store_error(format!("{operation}失败: HTTP {status} - {body}"))
    }

    async fn parse_json(operation: &str, response: reqwest::Response) -> TaskboardResult<Value> {
        response
            .json::<Value>()
            .await
            .map_err(|e| TaskboardError::store_error(format!("{operation}响应解析失败: {e}")))
    }

    /// 按NDJSON格式拼装_bulk请求体，动作行与文档行交替出现
    fn ndjson_payload(&self, ops: &[BulkOp]) -> TaskboardResult<String> {
        let mut payload = String::new();
        for op in ops {
            match op {
                BulkOp::Index { record } => {
                    let action = serde_json::json!({
                        "index": { "_index": self.index, "_id": record.id }
                    });
                    payload.push_str(&serde_json::to_string(&action)?);
                    payload.push('\n');
                    payload.push_str(&serde_json::to_string(record)?);
                    payload.push('\n');
                }
                BulkOp::Update { id, doc } => {
                    let action = serde_json::json!({
                        "update": { "_index": self.index, "_id": id }
                    });
                    payload.push_str(&serde_json::to_string(&action)?);
                    payload.push('\n');
                    let body = serde_json::json!({ "doc": doc });
                    payload.push_str(&serde_json::to_string(&body)?);
                    payload.push('\n');
                }
                BulkOp::Delete { id } => {
                    let action = serde_json::json!({
                        "delete": { "_index": self.index, "_id": id }
                    });
                    payload.push_str(&serde_json::to_string(&action)?);
                    payload.push('\n');
                }
            }
        }
        Ok(payload)
    }

    /// 从_bulk响应的单个条目中提取错误描述，无错误时返回None
    fn bulk_item_error(item: &Value) -> Option<String> {
        let detail = item.as_object()?.values().next()?;
        let err = detail.get("error")?;
        let error_type = err.get("type").and_then(Value::as_str).unwrap_or("unknown");
        let reason = err.get("reason").and_then(Value::as_str).unwrap_or("");
        if reason.is_empty() {
            Some(error_type.to_string())
        } else {
            Some(format!("{error_type}: {reason}"))
        }
    }
}

#[async_trait]
impl SearchStore for HttpSearchStore {
    #[instrument(skip(self))]
    async fn ensure_index(&self) -> TaskboardResult<()> {
        let template_url = format!("{}/_index_template/{}-template", self.base_url, self.index);
        let response = self
            .http_client
            .put(&template_url)
            .json(&mappings::index_template_body(&self.index))
            .send()
            .await
            .map_err(|e| TaskboardError::index_error(format!("连接搜索服务失败: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TaskboardError::index_error(format!(
                "安装索引模板失败: HTTP {status} - {body}"
            )));
        }

        let response = self
            .http_client
            .head(self.index_url())
            .send()
            .await
            .map_err(|e| TaskboardError::index_error(format!("检查索引失败: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            let body = serde_json::json!({ "mappings": mappings::index_mappings() });
            let response = self
                .http_client
                .put(self.index_url())
                .json(&body)
                .send()
                .await
                .map_err(|e| TaskboardError::index_error(format!("创建索引失败: {e}")))?;

            if response.status().is_success() {
                info!("已创建索引: {}", self.index);
            } else {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                // 多实例并发启动时索引可能已被其他实例创建
                if body.contains("resource_already_exists_exception") {
                    warn!("索引已存在，跳过创建: {}", self.index);
                } else {
                    return Err(TaskboardError::index_error(format!(
                        "创建索引失败: HTTP {status} - {body}"
                    )));
                }
            }
        } else if !response.status().is_success() {
            return Err(TaskboardError::index_error(format!(
                "检查索引失败: HTTP {}",
                response.status()
            )));
        }

        debug!("索引就绪: {}", self.index);
        Ok(())
    }

    #[instrument(skip(self, record), fields(todo_id = %record.id))]
    async fn put(&self, record: &TodoRecord) -> TaskboardResult<()> {
        let url = format!("{}?refresh=true", self.doc_url(&record.id));
        let response = self
            .http_client
            .put(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| Self::connection_error("写入文档", e))?;

        if response.status().is_success() {
            debug!("已写入待办事项文档: {}", record.id);
            Ok(())
        } else {
            Err(Self::response_error("写入文档", response).await)
        }
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> TaskboardResult<Option<TodoRecord>> {
        let response = self
            .http_client
            .get(self.doc_url(id))
            .send()
            .await
            .map_err(|e| Self::connection_error("读取文档", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::response_error("读取文档", response).await);
        }

        let body = Self::parse_json("读取文档", response).await?;
        let source = body
            .get("_source")
            .cloned()
            .ok_or_else(|| TaskboardError::store_error("读取文档响应缺少_source字段"))?;
        let record: TodoRecord = serde_json::from_value(source)?;
        Ok(Some(record))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> TaskboardResult<bool> {
        let url = format!("{}?refresh=true", self.doc_url(id));
        let response = self
            .http_client
            .delete(&url)
            .send()
            .await
            .map_err(|e| Self::connection_error("删除文档", e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(Self::response_error("删除文档", response).await);
        }

        debug!("已删除待办事项文档: {}", id);
        Ok(true)
    }

    #[instrument(skip(self, ops), fields(op_count = ops.len()))]
    async fn bulk(&self, ops: &[BulkOp]) -> TaskboardResult<Vec<BulkItemResult>> {
        if ops.is_empty() {
            return Ok(Vec::new());
        }

        let payload = self.ndjson_payload(ops)?;
        let url = format!("{}/_bulk?refresh=true", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/x-ndjson")
            .body(payload)
            .send()
            .await
            .map_err(|e| Self::connection_error("批量操作", e))?;

        if !response.status().is_success() {
            return Err(Self::response_error("批量操作", response).await);
        }

        let body = Self::parse_json("批量操作", response).await?;
        let empty = Vec::new();
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .unwrap_or(&empty);

        // 响应条目与请求条目按位置一一对应
        if items.len() != ops.len() {
            return Err(TaskboardError::store_error(format!(
                "批量操作响应条目数不匹配: 期望{}，实际{}",
                ops.len(),
                items.len()
            )));
        }

        let results = ops
            .iter()
            .zip(items)
            .map(|(op, item)| BulkItemResult {
                id: op.id().to_string(),
                error: Self::bulk_item_error(item),
            })
            .collect();
        Ok(results)
    }

    #[instrument(skip(self, request), fields(from = request.from, size = request.size))]
    async fn search(&self, request: &SearchRequest) -> TaskboardResult<SearchOutcome> {
        let url = format!("{}/_search", self.index_url());
        let response = self
            .http_client
            .post(&url)
            .json(&request.to_body())
            .send()
            .await
            .map_err(|e| Self::connection_error("查询索引", e))?;

        if !response.status().is_success() {
            return Err(Self::response_error("查询索引", response).await);
        }

        let body = Self::parse_json("查询索引", response).await?;
        let total = body
            .pointer("/hits/total/value")
            .and_then(Value::as_u64)
            .unwrap_or(0);

        let hits = body
            .pointer("/hits/hits")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut items = Vec::with_capacity(hits.len());
        for hit in &hits {
            if let Some(source) = hit.get("_source") {
                let record: TodoRecord = serde_json::from_value(source.clone())?;
                items.push(record);
            }
        }

        debug!("查询命中 {} 条，总计 {}", items.len(), total);
        Ok(SearchOutcome { items, total })
    }

    #[instrument(skip(self, query))]
    async fn delete_by_query(&self, query: &BoolQuery) -> TaskboardResult<u64> {
        let url = format!("{}/_delete_by_query?refresh=true", self.index_url());
        let body = serde_json::json!({ "query": query.to_value() });
        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Self::connection_error("按条件删除", e))?;

        if !response.status().is_success() {
            return Err(Self::response_error("按条件删除", response).await);
        }

        let body = Self::parse_json("按条件删除", response).await?;
        let deleted = body.get("deleted").and_then(Value::as_u64).unwrap_or(0);
        info!("按条件删除了 {} 条待办事项", deleted);
        Ok(deleted)
    }
}
