//! 种子数据生成器，为演示和联调环境填充逼真的安全合规待办事项

use chrono::{Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::{info, instrument};

use taskboard_domain::bulk::BulkOperationResult;
use taskboard_domain::entities::{TodoRecord, TodoStatus};
use taskboard_domain::TaskboardResult;

use crate::todo_service::TodoService;

pub const DEFAULT_SEED_COUNT: u32 = 100;
pub const MAX_SEED_COUNT: u32 = 10000;

/// 每次批量写入的记录数上限，避免单个批量请求过大
const SEED_BATCH_SIZE: u32 = 500;

const TITLES: &[&str] = &[
    "Review firewall rule changes",
    "Rotate service account credentials",
    "Patch OpenSSL on edge nodes",
    "Audit S3 bucket permissions",
    "Update incident response runbook",
    "Verify backup restore procedure",
    "Harden SSH configuration baseline",
    "Close stale privileged accounts",
    "Review SIEM alert thresholds",
    "Renew TLS certificates",
    "Scan container images for CVEs",
    "Document data retention policy",
    "Validate WAF rule coverage",
    "Run tabletop exercise for ransomware",
    "Reconcile asset inventory",
    "Enable MFA for vendor accounts",
];

const TAGS: &[&str] = &[
    "security",
    "compliance",
    "audit",
    "urgent",
    "infrastructure",
    "access-control",
    "encryption",
    "monitoring",
    "backup",
    "vendor",
];

const ASSIGNEES: &[&str] = &[
    "alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi",
];

const ERROR_NOTES: &[&str] = &[
    "Change window missed, rescheduling required",
    "Dependency on upstream ticket still open",
    "Rollback triggered by failed smoke test",
    "Access request denied by resource owner",
];

/// 生成 `count` 条随机待办事项并分批写入
///
/// 单批内的条目级失败会累计到返回结果中，不中断后续批次。
#[instrument(skip(service))]
pub async fn seed_todos(
    service: &TodoService,
    count: u32,
) -> TaskboardResult<BulkOperationResult> {
    let mut merged = BulkOperationResult::empty();
    let mut remaining = count;
    while remaining > 0 {
        let batch = remaining.min(SEED_BATCH_SIZE);
        let records: Vec<TodoRecord> = (0..batch).map(|_| random_record()).collect();
        let result = service.bulk_create(records).await?;
        merged = merged.merge(result);
        remaining -= batch;
    }
    info!(
        "种子数据生成完成: 成功{} 失败{}",
        merged.processed, merged.failed
    );
    Ok(merged)
}

fn random_record() -> TodoRecord {
    let mut rng = rand::rng();
    let now = Utc::now();

    let base = TITLES.choose(&mut rng).copied().unwrap_or(TITLES[0]);
    let mut record = TodoRecord::new(format!("{} #{}", base, rng.random_range(1000..10000)));

    let statuses = TodoStatus::all();
    if let Some(status) = statuses.choose(&mut rng) {
        record.status = *status;
    }
    let priorities = taskboard_domain::entities::TodoPriority::all();
    if let Some(priority) = priorities.choose(&mut rng) {
        record.priority = *priority;
    }

    let tag_count = rng.random_range(1..=3);
    record.tags = TAGS
        .choose_multiple(&mut rng, tag_count)
        .map(|tag| tag.to_string())
        .collect();

    let standards = taskboard_domain::entities::ComplianceStandard::all();
    let standard_count = rng.random_range(0..=2);
    record.compliance_standards = standards
        .choose_multiple(&mut rng, standard_count)
        .copied()
        .collect();

    if rng.random_bool(0.8) {
        record.assignee = ASSIGNEES
            .choose(&mut rng)
            .map(|assignee| assignee.to_string());
    }
    if rng.random_bool(0.5) {
        record.description = Some(format!("Auto-generated task for {}", base.to_lowercase()));
    }
    if rng.random_bool(0.4) {
        record.planned_date = Some(now + Duration::days(rng.random_range(-7..21)));
    }
    // 一部分截止日期落在过去，用于制造逾期数据
    if rng.random_bool(0.4) {
        record.due_date = Some(now + Duration::days(rng.random_range(-14..30)));
    }
    if rng.random_bool(0.6) {
        let points = [1_u32, 2, 3, 5, 8, 13];
        record.story_points = points.choose(&mut rng).copied();
    }

    match record.status {
        TodoStatus::CompletedSuccess => {
            record.completed_at = Some(now - Duration::days(rng.random_range(0..10)));
        }
        TodoStatus::CompletedError => {
            record.completed_at = Some(now - Duration::days(rng.random_range(0..10)));
            record.error_details = ERROR_NOTES
                .choose(&mut rng)
                .map(|note| note.to_string());
        }
        _ => {}
    }

    if rng.random_bool(0.1) {
        record.archived = true;
        record.archived_at = Some(now - Duration::days(rng.random_range(1..30)));
    }

    record
}
