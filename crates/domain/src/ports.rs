use async_trait::async_trait;
use serde_json::Value;

use crate::entities::TodoRecord;
use crate::errors::TaskboardResult;
use crate::query::{BoolQuery, SearchRequest};

/// 一次批量请求中的单个操作
#[derive(Debug, Clone)]
pub enum BulkOp {
    /// 整文档写入，不存在则创建
    Index { record: TodoRecord },
    /// 部分字段更新，doc 为要合并的字段集合
    Update { id: String, doc: Value },
    /// 物理删除
    Delete { id: String },
}

impl BulkOp {
    pub fn id(&self) -> &str {
        match self {
            BulkOp::Index { record } => &record.id,
            BulkOp::Update { id, .. } => id,
            BulkOp::Delete { id } => id,
        }
    }
}

/// 批量响应中按位置对应的单条结果
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemResult {
    pub id: String,
    pub error: Option<String>,
}

/// 查询命中的记录与总数
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub items: Vec<TodoRecord>,
    pub total: u64,
}

/// 文档存储端口。HTTP 后端对接搜索引擎，内存后端用于本地开发与测试。
/// 除 get/delete 对"不存在"的翻译外，存储层错误原样向上传递；
/// 所有写操作同步 refresh，保证写后立即可读。
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// 幂等建立索引模板与索引，失败由调用方当作启动级错误处理
    async fn ensure_index(&self) -> TaskboardResult<()>;

    async fn put(&self, record: &TodoRecord) -> TaskboardResult<()>;

    /// 不存在时返回 None 而不是错误
    async fn get(&self, id: &str) -> TaskboardResult<Option<TodoRecord>>;

    /// 返回记录此前是否存在
    async fn delete(&self, id: &str) -> TaskboardResult<bool>;

    /// 单次批量请求，返回与输入顺序一致的逐条结果
    async fn bulk(&self, ops: &[BulkOp]) -> TaskboardResult<Vec<BulkItemResult>>;

    async fn search(&self, request: &SearchRequest) -> TaskboardResult<SearchOutcome>;

    /// 返回删除的文档数
    async fn delete_by_query(&self, query: &BoolQuery) -> TaskboardResult<u64>;
}
