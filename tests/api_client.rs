mod common;

use common::{spawn_backend, GOOD_KEY};
use seo_writer_lib::models::KeyCheckRequest;
use seo_writer_lib::{
    ApiClient, ApiError, Config, GenerationRequest, Provider, Tone, WordCount, HISTORY_LIMIT,
};

fn request(model: &str, api_key: &str) -> GenerationRequest {
    GenerationRequest {
        keyword: "best productivity apps 2025".into(),
        provider: Provider::OpenAi,
        model: model.into(),
        tone: Tone::Informative,
        word_count: "1000".parse().unwrap(),
        api_key: api_key.into(),
        include_faq: true,
        include_schema: true,
    }
}

#[tokio::test]
async fn generate_posts_integer_word_count() {
    let (api, shared) = spawn_backend().await;

    let content = api.generate_content(&request("gpt-4o", GOOD_KEY)).await.unwrap();
    assert_eq!(content.id, "generated-1");
    assert_eq!(content.keyword, "best productivity apps 2025");
    assert_eq!(content.h2_tags.len(), 2);
    assert!(content.schema_markup.is_some());

    let recorded = shared.lock().unwrap();
    let body = &recorded.generate_bodies[0];
    assert!(body["word_count"].is_u64());
    assert_eq!(body["word_count"], 1000);
    assert_eq!(body["provider"], "openai");
    assert_eq!(body["include_faq"], true);
}

#[tokio::test]
async fn backend_detail_is_surfaced() {
    let (api, _) = spawn_backend().await;

    let err = api
        .generate_content(&request("invalid-model", GOOD_KEY))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message(),
        "Model invalid-model is not available for provider openai"
    );
}

#[tokio::test]
async fn error_without_detail_uses_status_text() {
    let (api, _) = spawn_backend().await;

    let err = api
        .generate_content(&request("gpt-4o", "sk-bad"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Backend { status: 502, detail: None }));
    assert_eq!(err.user_message(), "Request failed with status code 502");
}

#[tokio::test]
async fn key_check_sends_query_and_body() {
    let (api, shared) = spawn_backend().await;

    let req = KeyCheckRequest {
        provider: Provider::Anthropic,
        api_key: GOOD_KEY.into(),
        model: "claude-sonnet-4-20250514".into(),
    };
    assert!(api.test_api_key(&req).await.unwrap().valid);

    let bad = KeyCheckRequest {
        api_key: "nope".into(),
        ..req
    };
    let resp = api.test_api_key(&bad).await.unwrap();
    assert!(!resp.valid);
    assert_eq!(resp.error.as_deref(), Some("Incorrect API key provided"));

    let recorded = shared.lock().unwrap();
    let (query, body) = &recorded.key_checks[0];
    assert_eq!(query["provider"], "anthropic");
    assert_eq!(query["model"], "claude-sonnet-4-20250514");
    assert_eq!(body["api_key"], GOOD_KEY);
}

#[tokio::test]
async fn history_requests_limit_and_keeps_order() {
    let (api, shared) = spawn_backend().await;

    let items = api.recent_content(HISTORY_LIMIT).await.unwrap();
    let ids: Vec<_> = items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["h-3", "h-1", "h-6", "h-2", "h-5", "h-4"]);
    assert_eq!(shared.lock().unwrap().history_queries[0]["limit"], "5");
}

#[tokio::test]
async fn content_lookup_and_missing_item() {
    let (api, _) = spawn_backend().await;

    let item = api.content("abc").await.unwrap();
    assert_eq!(item.id, "abc");
    assert_eq!(item.keyword, "reloaded");

    let err = api.content("missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Content not found");
}

#[tokio::test]
async fn models_and_info() {
    let (api, _) = spawn_backend().await;

    let info = api.api_info().await.unwrap();
    assert_eq!(info.message, "AI SEO Writer API");
    assert_eq!(info.version, "1.0.0");

    let models = api.models().await.unwrap();
    assert_eq!(models.models["openai"], ["gpt-4o", "gpt-4o-mini"]);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // 绑定后立即释放端口，保证连接被拒绝
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        backend_url: format!("http://{addr}"),
        ..Config::default()
    };
    let api = ApiClient::new(&config).unwrap();
    let err = api.recent_content(HISTORY_LIMIT).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.user_message().is_empty());
}

#[tokio::test]
async fn configured_timeout_applies_to_requests() {
    // 只接受连接、从不响应的服务端
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = Config {
        backend_url: format!("http://{addr}"),
        request_timeout_secs: Some(1),
        ..Config::default()
    };
    let api = ApiClient::new(&config).unwrap();
    let err = api.api_info().await.unwrap_err();
    match err {
        ApiError::Transport(e) => assert!(e.is_timeout(), "expected timeout, got {e}"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[test]
fn word_count_options_match_backend_contract() {
    let values: Vec<u32> = WordCount::ALL.iter().map(|w| w.value()).collect();
    assert_eq!(values, [500, 1000, 1500, 2000, 3000]);
}
