//! 进程内的后端替身，基于 axum，监听随机端口

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use seo_writer_lib::{ApiClient, Config};
use tokio::net::TcpListener;

pub const GOOD_KEY: &str = "sk-good";

#[derive(Default)]
pub struct Recorded {
    pub key_checks: Vec<(HashMap<String, String>, Value)>,
    pub generate_bodies: Vec<Value>,
    pub history_queries: Vec<HashMap<String, String>>,
    /// 为 true 时 /content 返回 500
    pub history_fails: bool,
}

pub type Shared = Arc<Mutex<Recorded>>;

pub fn content_json(id: &str, keyword: &str) -> Value {
    json!({
        "id": id,
        "keyword": keyword,
        "title": format!("The Complete Guide to {keyword}"),
        "meta_description": format!("Everything about {keyword}."),
        "content": "# Intro\n\nBody text.",
        "h1_tag": format!("Complete Guide to {keyword}"),
        "h2_tags": ["Why it matters", "How to choose"],
        "h3_tags": ["Pricing"],
        "faq_section": "Q: Is it free?\nA: Some are.",
        "schema_markup": "{\"@type\": \"Article\"}",
        "word_count": 987,
        "provider": "openai",
        "model": "gpt-4o",
        "created_at": "2025-06-01T09:15:00.000123"
    })
}

async fn root() -> Json<Value> {
    Json(json!({"message": "AI SEO Writer API", "version": "1.0.0"}))
}

async fn models() -> Json<Value> {
    Json(json!({
        "models": {
            "openai": ["gpt-4o", "gpt-4o-mini"],
            "anthropic": ["claude-sonnet-4-20250514"],
            "gemini": ["gemini-2.0-flash"],
            "groq": ["llama-3.3-70b-versatile"],
            "grok": ["grok-beta"]
        }
    }))
}

async fn test_api_key(
    State(shared): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> Json<Value> {
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);
    shared
        .lock()
        .unwrap()
        .key_checks
        .push((params.clone(), body));

    if params.get("api_key").map(String::as_str) == Some(GOOD_KEY) {
        Json(json!({"valid": true, "provider": params.get("provider"), "model": params.get("model")}))
    } else {
        Json(json!({"valid": false, "error": "Incorrect API key provided"}))
    }
}

async fn generate(State(shared): State<Shared>, Json(body): Json<Value>) -> Response {
    shared.lock().unwrap().generate_bodies.push(body.clone());

    if body["model"] == "invalid-model" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Model invalid-model is not available for provider openai"})),
        )
            .into_response();
    }
    if body["api_key"] != GOOD_KEY {
        // 没有 detail 字段的错误
        return (StatusCode::BAD_GATEWAY, "upstream exploded").into_response();
    }
    let keyword = body["keyword"].as_str().unwrap_or_default();
    Json(content_json("generated-1", keyword)).into_response()
}

async fn history(
    State(shared): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut guard = shared.lock().unwrap();
    guard.history_queries.push(params);
    if guard.history_fails {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "database unavailable"})),
        )
            .into_response();
    }
    // 故意返回超过上限、且不按时间排序的数据
    let items: Vec<Value> = ["h-3", "h-1", "h-6", "h-2", "h-5", "h-4"]
        .iter()
        .map(|id| content_json(id, id))
        .collect();
    Json(items).into_response()
}

async fn content_by_id(Path(id): Path<String>) -> Response {
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Content not found"})),
        )
            .into_response();
    }
    Json(content_json(&id, "reloaded")).into_response()
}

/// 启动后端替身，返回客户端和请求记录
pub async fn spawn_backend() -> (ApiClient, Shared) {
    let shared: Shared = Arc::new(Mutex::new(Recorded::default()));
    let app = Router::new()
        .route("/api/", get(root))
        .route("/api/models", get(models))
        .route("/api/test-api-key", post(test_api_key))
        .route("/api/generate-content", post(generate))
        .route("/api/content", get(history))
        .route("/api/content/:id", get(content_by_id))
        .with_state(shared.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = Config {
        backend_url: format!("http://{addr}"),
        ..Config::default()
    };
    (ApiClient::new(&config).unwrap(), shared)
}
