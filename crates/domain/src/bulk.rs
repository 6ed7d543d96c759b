use serde::{Deserialize, Serialize};

use crate::ports::BulkItemResult;

/// 批量操作中单个条目的失败原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkError {
    pub id: String,
    pub error: String,
}

/// 批量操作的聚合结果。部分失败通过计数与错误列表表达，从不抛出异常
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkOperationResult {
    pub success: bool,
    pub processed: usize,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<BulkError>>,
}

impl BulkOperationResult {
    pub fn empty() -> Self {
        Self {
            success: true,
            processed: 0,
            failed: 0,
            errors: None,
        }
    }

    /// 按条目位置折叠批量响应：带错误的条目计为失败，
    /// errors 仅在存在失败时出现（不会是空数组）
    pub fn from_outcomes(outcomes: &[BulkItemResult]) -> Self {
        let errors: Vec<BulkError> = outcomes
            .iter()
            .filter_map(|outcome| {
                outcome.error.as_ref().map(|error| BulkError {
                    id: outcome.id.clone(),
                    error: error.clone(),
                })
            })
            .collect();

        let failed = errors.len();
        let processed = outcomes.len() - failed;

        Self {
            success: failed == 0,
            processed,
            failed,
            errors: if errors.is_empty() { None } else { Some(errors) },
        }
    }

    /// 合并分批执行的结果（播种工具按批写入时使用）
    pub fn merge(mut self, other: BulkOperationResult) -> Self {
        self.processed += other.processed;
        self.failed += other.failed;
        match (&mut self.errors, other.errors) {
            (Some(mine), Some(theirs)) => mine.extend(theirs),
            (None, Some(theirs)) => self.errors = Some(theirs),
            _ => {}
        }
        self.success = self.failed == 0;
        self
    }
}
