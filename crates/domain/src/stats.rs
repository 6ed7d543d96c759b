use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::{ComplianceStandard, TodoPriority, TodoRecord, TodoStatus};

/// 仪表盘统计口径：只统计未归档记录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoStatistics {
    pub total: u64,
    pub by_status: BTreeMap<TodoStatus, u64>,
    pub by_priority: BTreeMap<TodoPriority, u64>,
    pub by_compliance_standard: BTreeMap<ComplianceStandard, u64>,
    /// completed_success 占比，百分制；total 为 0 时取 0
    pub completion_rate: f64,
    /// 逾期 = 状态在 {planned, in_progress} 且 dueDate 早于当前时间
    pub overdue_count: u64,
}

impl TodoStatistics {
    /// 各枚举值补零，保证输出形态稳定
    pub fn zeroed() -> Self {
        Self {
            total: 0,
            by_status: TodoStatus::all().into_iter().map(|s| (s, 0)).collect(),
            by_priority: TodoPriority::all().into_iter().map(|p| (p, 0)).collect(),
            by_compliance_standard: ComplianceStandard::all()
                .into_iter()
                .map(|c| (c, 0))
                .collect(),
            completion_rate: 0.0,
            overdue_count: 0,
        }
    }

    /// 对一批未归档记录做聚合
    pub fn from_records<'a, I>(records: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a TodoRecord>,
    {
        let mut stats = Self::zeroed();

        for record in records {
            stats.total += 1;
            *stats.by_status.entry(record.status).or_insert(0) += 1;
            *stats.by_priority.entry(record.priority).or_insert(0) += 1;
            for standard in &record.compliance_standards {
                *stats
                    .by_compliance_standard
                    .entry(*standard)
                    .or_insert(0) += 1;
            }
            if record.is_overdue(now) {
                stats.overdue_count += 1;
            }
        }

        if stats.total > 0 {
            let completed = stats
                .by_status
                .get(&TodoStatus::CompletedSuccess)
                .copied()
                .unwrap_or(0);
            stats.completion_rate = (completed as f64 / stats.total as f64) * 100.0;
        }

        stats
    }
}
