//! 错误类型
//!
//! 库内统一使用 `thiserror` 定义错误，二进制入口再用 `anyhow` 汇总。

use std::path::PathBuf;

use thiserror::Error;

/// 调用后端 API 时可能出现的错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络层错误（连接失败、超时等）
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// 后端返回了非 2xx 状态码
    #[error("Request failed with status code {status}")]
    Backend {
        status: u16,
        /// 后端 `{"detail": ...}` 中的文本
        detail: Option<String>,
    },

    /// 响应体无法解析
    #[error("Failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// 展示给用户的文本：优先使用后端 detail，否则使用传输层错误信息
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid backend URL '{url}': {source}")]
    BackendUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// HTTP 客户端初始化失败（TLS 后端等）
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_detail_wins_over_status_text() {
        let err = ApiError::Backend {
            status: 400,
            detail: Some("Model gpt-x is not available for provider openai".into()),
        };
        assert_eq!(
            err.user_message(),
            "Model gpt-x is not available for provider openai"
        );
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn missing_detail_falls_back_to_generic_text() {
        let err = ApiError::Backend {
            status: 502,
            detail: None,
        };
        assert_eq!(err.user_message(), "Request failed with status code 502");
    }
}
