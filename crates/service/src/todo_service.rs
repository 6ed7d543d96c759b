use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use taskboard_domain::bulk::BulkOperationResult;
use taskboard_domain::entities::{CreateTodo, TodoPriority, TodoRecord, TodoStatus, TodoUpdate};
use taskboard_domain::ports::{BulkOp, SearchStore};
use taskboard_domain::query::{BoolQuery, QueryClause, SearchRequest};
use taskboard_domain::search::{SearchSort, SortField, SortOrder, TodoSearchParams};
use taskboard_domain::stats::TodoStatistics;
use taskboard_domain::{TaskboardError, TaskboardResult, TodoQueryBuilder};

/// 新卡片排到列尾时使用的位置步长，留出足够空隙供客户端做中点插入
pub const POSITION_STEP: f64 = 1000.0;

/// 统计聚合的扫描上限，远大于看板的实际规模
const STATS_SCAN_LIMIT: u32 = 10000;

/// 一页搜索结果与分页元数据
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    pub items: Vec<TodoRecord>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
    pub total_pages: u64,
}

impl TodoPage {
    pub fn new(items: Vec<TodoRecord>, total: u64, page: u32, size: u32) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            (total + u64::from(size) - 1) / u64::from(size)
        };
        Self {
            items,
            total,
            page,
            size,
            total_pages,
        }
    }
}

/// 待办事项业务服务
///
/// 唯一携带业务策略的组件：默认值、时间戳、看板排位、归档语义、
/// 批量结果聚合与统计口径都在这里决定，存储细节交给 [`SearchStore`]。
pub struct TodoService {
    store: Arc<dyn SearchStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self { store }
    }

    /// 创建待办事项，位置排在目标状态列的末尾
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create_todo(&self, input: CreateTodo) -> TaskboardResult<TodoRecord> {
        let mut record = Self::record_from_input(input);
        record.position = self.next_position(record.status).await?;
        self.store.put(&record).await?;
        info!("已创建{}", record.entity_description());
        Ok(record)
    }

    pub async fn get_todo(&self, id: &str) -> TaskboardResult<Option<TodoRecord>> {
        self.store.get(id).await
    }

    /// 部分更新：读取现有记录，覆盖提供的字段后整篇写回
    #[instrument(skip(self, update))]
    pub async fn update_todo(&self, id: &str, update: &TodoUpdate) -> TaskboardResult<TodoRecord> {
        let mut record = self.load_required(id).await?;
        update.apply_to(&mut record);
        record.updated_at = Utc::now();
        self.store.put(&record).await?;
        debug!("已更新待办事项: id={}", id);
        Ok(record)
    }

    pub async fn delete_todo(&self, id: &str) -> TaskboardResult<()> {
        if !self.store.delete(id).await? {
            return Err(TaskboardError::todo_not_found(id));
        }
        info!("已删除待办事项: id={}", id);
        Ok(())
    }

    #[instrument(skip(self, params), fields(page = params.page, size = params.size))]
    pub async fn search_todos(&self, params: &TodoSearchParams) -> TaskboardResult<TodoPage> {
        let request = SearchRequest {
            query: TodoQueryBuilder::build(params),
            sort: params.effective_sort(),
            from: params.offset(),
            size: params.size,
        };
        let outcome = self.store.search(&request).await?;
        Ok(TodoPage::new(
            outcome.items,
            outcome.total,
            params.page,
            params.size,
        ))
    }

    pub async fn archive_todo(&self, id: &str) -> TaskboardResult<TodoRecord> {
        let mut record = self.load_required(id).await?;
        let now = Utc::now();
        record.archived = true;
        record.archived_at = Some(now);
        record.updated_at = now;
        self.store.put(&record).await?;
        info!("已归档待办事项: id={}", id);
        Ok(record)
    }

    pub async fn restore_todo(&self, id: &str) -> TaskboardResult<TodoRecord> {
        let mut record = self.load_required(id).await?;
        record.archived = false;
        record.archived_at = None;
        record.updated_at = Utc::now();
        self.store.put(&record).await?;
        info!("已恢复待办事项: id={}", id);
        Ok(record)
    }

    /// 拖拽移动：一次写入同时更新状态列与列内位置
    ///
    /// 位置值按客户端给定的原样存储，本服务不做校验或重排。
    pub async fn reorder_todo(
        &self,
        id: &str,
        status: TodoStatus,
        position: f64,
    ) -> TaskboardResult<TodoRecord> {
        let mut record = self.load_required(id).await?;
        record.status = status;
        record.position = position;
        record.updated_at = Utc::now();
        self.store.put(&record).await?;
        debug!("已移动待办事项: id={} status={} position={}", id, status, position);
        Ok(record)
    }

    /// 批量部分更新的通用入口，doc 为要覆盖的字段集合
    ///
    /// 不预校验id是否存在：不存在的id由存储返回条目级错误，计入failed。
    #[instrument(skip(self, ids, doc), fields(count = ids.len()))]
    pub async fn bulk_update(
        &self,
        ids: &[String],
        mut doc: Value,
    ) -> TaskboardResult<BulkOperationResult> {
        if let Some(fields) = doc.as_object_mut() {
            fields.insert("updatedAt".to_string(), json!(Utc::now()));
        }
        let ops = ids
            .iter()
            .map(|id| BulkOp::Update {
                id: id.clone(),
                doc: doc.clone(),
            })
            .collect();
        self.run_bulk(ops).await
    }

    pub async fn bulk_update_status(
        &self,
        ids: &[String],
        status: TodoStatus,
    ) -> TaskboardResult<BulkOperationResult> {
        self.bulk_update(ids, json!({ "status": status.as_str() }))
            .await
    }

    pub async fn bulk_update_priority(
        &self,
        ids: &[String],
        priority: TodoPriority,
    ) -> TaskboardResult<BulkOperationResult> {
        self.bulk_update(ids, json!({ "priority": priority.as_str() }))
            .await
    }

    pub async fn bulk_assign(
        &self,
        ids: &[String],
        assignee: &str,
    ) -> TaskboardResult<BulkOperationResult> {
        self.bulk_update(ids, json!({ "assignee": assignee })).await
    }

    pub async fn bulk_archive(&self, ids: &[String]) -> TaskboardResult<BulkOperationResult> {
        self.bulk_update(
            ids,
            json!({ "archived": true, "archivedAt": Utc::now() }),
        )
        .await
    }

    /// 批量恢复，显式写入null清除归档时间
    pub async fn bulk_restore(&self, ids: &[String]) -> TaskboardResult<BulkOperationResult> {
        self.bulk_update(ids, json!({ "archived": false, "archivedAt": null }))
            .await
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn bulk_delete(&self, ids: &[String]) -> TaskboardResult<BulkOperationResult> {
        let ops = ids
            .iter()
            .map(|id| BulkOp::Delete { id: id.clone() })
            .collect();
        self.run_bulk(ops).await
    }

    /// 批量插入，id已由记录构造分配；位置按批内状态列顺序排布
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn bulk_create(
        &self,
        mut records: Vec<TodoRecord>,
    ) -> TaskboardResult<BulkOperationResult> {
        let mut column_tail: HashMap<TodoStatus, f64> = HashMap::new();
        for record in &mut records {
            let slot = column_tail.entry(record.status).or_insert(0.0);
            *slot += POSITION_STEP;
            record.position = *slot;
        }
        let ops = records
            .into_iter()
            .map(|record| BulkOp::Index { record })
            .collect();
        self.run_bulk(ops).await
    }

    /// 清空全部待办事项，仅供测试与维护使用
    pub async fn delete_all(&self) -> TaskboardResult<u64> {
        let deleted = self.store.delete_by_query(&BoolQuery::match_all()).await?;
        warn!("已删除全部待办事项: {} 条", deleted);
        Ok(deleted)
    }

    /// 统计口径只覆盖未归档记录
    pub async fn get_statistics(&self) -> TaskboardResult<TodoStatistics> {
        let request = SearchRequest {
            query: BoolQuery {
                must: vec![QueryClause::MatchAll],
                filter: vec![QueryClause::Term {
                    field: "archived".to_string(),
                    value: json!(false),
                }],
            },
            sort: SearchSort::Field {
                field: SortField::CreatedAt,
                order: SortOrder::Desc,
            },
            from: 0,
            size: STATS_SCAN_LIMIT,
        };
        let outcome = self.store.search(&request).await?;
        Ok(TodoStatistics::from_records(outcome.items.iter(), Utc::now()))
    }

    fn record_from_input(input: CreateTodo) -> TodoRecord {
        let mut record = TodoRecord::new(input.title);
        record.description = input.description;
        if let Some(status) = input.status {
            record.status = status;
        }
        if let Some(priority) = input.priority {
            record.priority = priority;
        }
        if let Some(tags) = input.tags {
            record.tags = tags;
        }
        if let Some(standards) = input.compliance_standards {
            record.compliance_standards = standards;
        }
        record.assignee = input.assignee;
        record.planned_date = input.planned_date;
        record.due_date = input.due_date;
        record.story_points = input.story_points;
        record.cover_image = input.cover_image;
        record
    }

    async fn load_required(&self, id: &str) -> TaskboardResult<TodoRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| TaskboardError::todo_not_found(id))
    }

    /// 查询目标状态列（未归档）当前的最大位置，新卡片排在其后
    async fn next_position(&self, status: TodoStatus) -> TaskboardResult<f64> {
        let request = SearchRequest {
            query: BoolQuery {
                must: vec![QueryClause::MatchAll],
                filter: vec![
                    QueryClause::Term {
                        field: "status".to_string(),
                        value: json!(status.as_str()),
                    },
                    QueryClause::Term {
                        field: "archived".to_string(),
                        value: json!(false),
                    },
                ],
            },
            sort: SearchSort::Field {
                field: SortField::Position,
                order: SortOrder::Desc,
            },
            from: 0,
            size: 1,
        };
        let outcome = self.store.search(&request).await?;
        let column_max = outcome.items.first().map(|r| r.position).unwrap_or(0.0);
        Ok(column_max + POSITION_STEP)
    }

    /// 所有批量操作共用：一次批量请求，按位置对齐逐项核对结果，
    /// 条目级失败汇总成计数而不是抛错
    async fn run_bulk(&self, ops: Vec<BulkOp>) -> TaskboardResult<BulkOperationResult> {
        if ops.is_empty() {
            return Ok(BulkOperationResult::empty());
        }
        let outcomes = self.store.bulk(&ops).await?;
        let result = BulkOperationResult::from_outcomes(&outcomes);
        if result.failed > 0 {
            warn!(
                "批量操作部分失败: 成功{} 失败{}",
                result.processed, result.failed
            );
        }
        Ok(result)
    }
}
