use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use taskboard_api::create_app;
use taskboard_core::ApiConfig;
use taskboard_infrastructure::MemorySearchStore;
use taskboard_service::TodoService;

const BASE: &str = "/api/custom_plugin/todos";

fn test_app() -> Router {
    let store = Arc::new(MemorySearchStore::new());
    let service = Arc::new(TodoService::new(store));
    let config = ApiConfig {
        bind_address: "127.0.0.1:0".to_string(),
        cors_enabled: true,
        cors_origins: vec!["*".to_string()],
        request_timeout_seconds: 30,
    };
    create_app(service, &config)
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    dispatch(app, request).await
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    dispatch(app, request).await
}

async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_todo(app: &Router, body: Value) -> Value {
    let (status, json) = send_json(app, Method::POST, BASE, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    json["data"].clone()
}

#[tokio::test]
async fn test_full_lifecycle_roundtrip() {
    let app = test_app();

    // 创建：缺省进入planned列
    let record = create_todo(
        &app,
        json!({"title": "Patch CVE-2026-3094 backdoor", "priority": "high"}),
    )
    .await;
    assert_eq!(record["status"], "planned");
    assert_eq!(record["priority"], "high");
    assert_eq!(record["archived"], false);
    let id = record["id"].as_str().unwrap().to_string();

    // 读取
    let (status, json) = send(&app, Method::GET, &format!("{BASE}/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "Patch CVE-2026-3094 backdoor");

    // 部分更新
    let (status, json) = send_json(
        &app,
        Method::PUT,
        &format!("{BASE}/{id}"),
        json!({"status": "in_progress", "assignee": "alice"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "in_progress");
    assert_eq!(json["data"]["assignee"], "alice");
    assert_eq!(json["data"]["priority"], "high");

    // 归档后从默认列表消失，archived=true 列表可见
    let (status, json) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/{id}/archive"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["archived"], true);
    assert!(json["data"]["archivedAt"].is_string());

    let (_, json) = send(&app, Method::GET, BASE).await;
    assert_eq!(json["data"]["total"], 0);

    let (_, json) = send(&app, Method::GET, &format!("{BASE}?archived=true")).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["id"], id.as_str());

    // 恢复后 archivedAt 被清除，其余字段保留
    let (status, json) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/{id}/restore"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["archived"], false);
    assert!(json["data"].get("archivedAt").is_none());
    assert_eq!(json["data"]["assignee"], "alice");

    // 删除后读取404，信封标记失败
    let (status, json) = send(&app, Method::DELETE, &format!("{BASE}/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (status, json) = send(&app, Method::GET, &format!("{BASE}/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn test_pagination_window() {
    let app = test_app();

    for i in 1..=25 {
        create_todo(&app, json!({"title": format!("todo {i:02}")})).await;
    }

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("{BASE}?page=2&size=10&sortField=position&sortOrder=asc"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["total"], 25);
    assert_eq!(data["page"], 2);
    assert_eq!(data["size"], 10);
    assert_eq!(data["totalPages"], 3);

    let items = data["items"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    // 同列依次创建的position为 1000, 2000, ...，第二页从第11条开始
    assert_eq!(items[0]["position"], 11000.0);
    assert_eq!(items[0]["title"], "todo 11");
    assert_eq!(items[9]["title"], "todo 20");
}

#[tokio::test]
async fn test_status_filter_and_text_query() {
    let app = test_app();

    create_todo(&app, json!({"title": "Rotate falcon credentials"})).await;
    create_todo(
        &app,
        json!({"title": "Review audit trail", "status": "in_progress"}),
    )
    .await;
    create_todo(
        &app,
        json!({"title": "Escalate blocked finding", "status": "blocked"}),
    )
    .await;

    // 重复键与[]后缀混用
    let (status, json) = send(
        &app,
        Method::GET,
        &format!("{BASE}?status=in_progress&status%5B%5D=blocked"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total"], 2);

    let (_, json) = send(&app, Method::GET, &format!("{BASE}?query=falcon")).await;
    assert_eq!(json["data"]["total"], 1);
    assert_eq!(json["data"]["items"][0]["title"], "Rotate falcon credentials");
}

#[tokio::test]
async fn test_statistics_shape() {
    let app = test_app();

    // 6条planned（其中1条已逾期），4条completed_success
    for i in 0..6 {
        let mut body = json!({"title": format!("planned {i}"), "priority": "medium"});
        if i == 0 {
            body["dueDate"] = json!("2020-01-01T00:00:00Z");
        }
        create_todo(&app, body).await;
    }
    for i in 0..4 {
        create_todo(
            &app,
            json!({"title": format!("done {i}"), "status": "completed_success"}),
        )
        .await;
    }

    // 归档记录不参与任何统计
    let noise = create_todo(&app, json!({"title": "archived noise"})).await;
    let noise_id = noise["id"].as_str().unwrap();
    let (status, _) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/{noise_id}/archive"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, Method::GET, &format!("{BASE}/statistics")).await;
    assert_eq!(status, StatusCode::OK);

    let stats = &json["data"];
    assert_eq!(stats["total"], 10);
    assert_eq!(stats["completionRate"], 40.0);
    assert_eq!(stats["overdueCount"], 1);
    assert_eq!(stats["byStatus"]["planned"], 6);
    assert_eq!(stats["byStatus"]["completed_success"], 4);
    // 无记录的分组也要有零值
    assert_eq!(stats["byStatus"]["blocked"], 0);
    assert_eq!(stats["byPriority"]["critical"], 0);
    assert_eq!(stats["byComplianceStandard"]["gdpr"], 0);
}

#[tokio::test]
async fn test_bulk_archive_partial_failure() {
    let app = test_app();

    let a = create_todo(&app, json!({"title": "first"})).await;
    let c = create_todo(&app, json!({"title": "third"})).await;
    let a_id = a["id"].as_str().unwrap().to_string();
    let c_id = c["id"].as_str().unwrap().to_string();

    let (status, json) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/bulk/archive"),
        json!({"ids": [a_id, "ghost", c_id]}),
    )
    .await;

    // 部分失败是数据，不是HTTP错误
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["processed"], 2);
    assert_eq!(json["failed"], 1);
    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["id"], "ghost");
    assert!(errors[0]["error"].as_str().unwrap().contains("document missing"));

    // 其余条目照常归档
    let (_, json) = send(&app, Method::GET, &format!("{BASE}/{}", a["id"].as_str().unwrap())).await;
    assert_eq!(json["data"]["archived"], true);
    let (_, json) = send(&app, Method::GET, &format!("{BASE}/{}", c["id"].as_str().unwrap())).await;
    assert_eq!(json["data"]["archived"], true);
}

#[tokio::test]
async fn test_bulk_status_then_delete() {
    let app = test_app();

    let mut ids = Vec::new();
    for i in 0..3 {
        let record = create_todo(&app, json!({"title": format!("batch {i}")})).await;
        ids.push(record["id"].as_str().unwrap().to_string());
    }

    let (status, json) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/bulk/status"),
        json!({"ids": ids, "status": "in_progress"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["processed"], 3);
    assert_eq!(json["failed"], 0);
    assert!(json.get("errors").is_none());

    let (_, json) = send(&app, Method::GET, &format!("{BASE}/{}", ids[0])).await;
    assert_eq!(json["data"]["status"], "in_progress");

    let (status, json) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/bulk/delete"),
        json!({"ids": ids}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["processed"], 3);

    let (status, _) = send(&app, Method::GET, &format!("{BASE}/{}", ids[0])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_restore_clears_archived_at() {
    let app = test_app();

    let record = create_todo(&app, json!({"title": "to restore"})).await;
    let id = record["id"].as_str().unwrap().to_string();

    let (status, _) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/{id}/archive"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/bulk/restore"),
        json!({"ids": [id]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (_, json) = send(&app, Method::GET, &format!("{BASE}/{id}")).await;
    assert_eq!(json["data"]["archived"], false);
    assert!(json["data"].get("archivedAt").is_none());
}

#[tokio::test]
async fn test_seed_then_delete_all() {
    let app = test_app();

    let (status, json) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/seed"),
        json!({"count": 25}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["processed"], 25);
    assert_eq!(json["failed"], 0);

    // 活跃与归档合计等于播种数量
    let (_, active) = send(&app, Method::GET, &format!("{BASE}?size=100")).await;
    let (_, archived) = send(&app, Method::GET, &format!("{BASE}?size=100&archived=true")).await;
    let total = active["data"]["total"].as_u64().unwrap()
        + archived["data"]["total"].as_u64().unwrap();
    assert_eq!(total, 25);

    let (status, json) = send(&app, Method::DELETE, &format!("{BASE}/all")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["deleted"], 25);

    let (_, json) = send(&app, Method::GET, &format!("{BASE}?size=100")).await;
    assert_eq!(json["data"]["total"], 0);
}

#[tokio::test]
async fn test_reorder_moves_column_and_position() {
    let app = test_app();

    let record = create_todo(&app, json!({"title": "drag me"})).await;
    let id = record["id"].as_str().unwrap();

    let (status, json) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/{id}/reorder"),
        json!({"status": "in_progress", "position": 1500.5}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "in_progress");
    assert_eq!(json["data"]["position"], 1500.5);
}

#[tokio::test]
async fn test_validation_failures_return_400_envelope() {
    let app = test_app();

    let cases: Vec<(Method, String, Option<Value>)> = vec![
        (Method::POST, BASE.to_string(), Some(json!({"title": "  "}))),
        (
            Method::POST,
            format!("{BASE}/seed"),
            Some(json!({"count": 0})),
        ),
        (
            Method::POST,
            format!("{BASE}/bulk/status"),
            Some(json!({"ids": [], "status": "planned"})),
        ),
        (Method::GET, format!("{BASE}?page=0"), None),
        (Method::GET, format!("{BASE}?status=bogus"), None),
        (Method::GET, format!("{BASE}?archived=maybe"), None),
    ];

    for (method, uri, body) in cases {
        let (status, json) = match body {
            Some(body) => send_json(&app, method.clone(), &uri, body).await,
            None => send(&app, method.clone(), &uri).await,
        };
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(json["success"], false, "{method} {uri}");
        assert!(json["error"].is_string(), "{method} {uri}");
    }
}

#[tokio::test]
async fn test_update_rejects_empty_body() {
    let app = test_app();

    let record = create_todo(&app, json!({"title": "untouched"})).await;
    let id = record["id"].as_str().unwrap();

    let (status, json) = send_json(&app, Method::PUT, &format!("{BASE}/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    // 畸形JSON同样走统一信封
    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("{BASE}/{id}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{broken"))
        .unwrap();
    let (status, json) = dispatch(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_search_body_scalar_and_pagination() {
    let app = test_app();

    for i in 0..7 {
        create_todo(&app, json!({"title": format!("scan host {i}")})).await;
    }
    create_todo(
        &app,
        json!({"title": "separate", "status": "blocked"}),
    )
    .await;

    // 标量与列表等价
    let (status, json) = send_json(
        &app,
        Method::POST,
        &format!("{BASE}/search"),
        json!({"status": "planned", "page": 2, "size": 5, "sortField": "position", "sortOrder": "asc"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["total"], 7);
    assert_eq!(data["totalPages"], 2);
    assert_eq!(data["items"].as_array().unwrap().len(), 2);
    assert_eq!(data["items"][0]["title"], "scan host 5");
}
