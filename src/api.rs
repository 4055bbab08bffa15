//! 后端 HTTP 客户端
//!
//! 所有请求都发往 `{backend_url}/api`。非 2xx 响应会解析 `{"detail": ...}`。

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::{ApiError, ConfigError};
use crate::models::{
    ApiInfo, ErrorBody, GeneratedContent, GenerationRequest, KeyCheckRequest, KeyCheckResponse,
    ModelsResponse,
};

/// 历史记录条数上限
pub const HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let base = config.api_base()?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    /// GET / —— 服务名称和版本
    pub async fn api_info(&self) -> Result<ApiInfo, ApiError> {
        let url = self.endpoint("")?;
        let resp = self.client.get(url).send().await?;
        decode(resp, "/").await
    }

    /// GET /models —— 供应商模型目录
    pub async fn models(&self) -> Result<ModelsResponse, ApiError> {
        let url = self.endpoint("models")?;
        let resp = self.client.get(url).send().await?;
        decode(resp, "/models").await
    }

    /// GET /content?limit=N —— 最近生成的内容，顺序由后端决定
    pub async fn recent_content(&self, limit: usize) -> Result<Vec<GeneratedContent>, ApiError> {
        let url = self.endpoint("content")?;
        let resp = self
            .client
            .get(url)
            .query(&[("limit", limit)])
            .send()
            .await?;
        decode(resp, "/content").await
    }

    /// GET /content/{id}
    pub async fn content(&self, id: &str) -> Result<GeneratedContent, ApiError> {
        let mut url = self.endpoint("content")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(id);
        let resp = self.client.get(url).send().await?;
        decode(resp, "/content/{id}").await
    }

    /// POST /test-api-key
    ///
    /// 参数同时作为 query 和 JSON body 发送：后端按 query 绑定。
    pub async fn test_api_key(&self, req: &KeyCheckRequest) -> Result<KeyCheckResponse, ApiError> {
        let url = self.endpoint("test-api-key")?;
        let resp = self
            .client
            .post(url)
            .query(&[
                ("provider", req.provider.as_str()),
                ("api_key", req.api_key.as_str()),
                ("model", req.model.as_str()),
            ])
            .json(req)
            .send()
            .await?;
        decode(resp, "/test-api-key").await
    }

    /// POST /generate-content
    pub async fn generate_content(
        &self,
        req: &GenerationRequest,
    ) -> Result<GeneratedContent, ApiError> {
        let url = self.endpoint("generate-content")?;
        log::info!(
            "[Api] generating content for '{}' with {}/{}",
            req.keyword,
            req.provider,
            req.model
        );
        let resp = self.client.post(url).json(req).send().await?;
        decode(resp, "/generate-content").await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response, endpoint: &str) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.bytes().await?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail_text());
        log::warn!(
            "[Api] {endpoint} returned {}: {}",
            status.as_u16(),
            detail.as_deref().unwrap_or("<no detail>")
        );
        return Err(ApiError::Backend {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
