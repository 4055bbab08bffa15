use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 支持的 LLM 供应商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
    Gemini,
    Groq,
    Grok,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Self::OpenAi,
        Self::Anthropic,
        Self::Gemini,
        Self::Groq,
        Self::Grok,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Groq => "groq",
            Self::Grok => "grok",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Gemini => "Google Gemini",
            Self::Groq => "Groq",
            Self::Grok => "Grok (xAI)",
        }
    }

    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let i = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            "gemini" => Ok(Self::Gemini),
            "groq" => Ok(Self::Groq),
            "grok" => Ok(Self::Grok),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Informative,
    Professional,
    Casual,
    Persuasive,
    Friendly,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Self::Informative,
        Self::Professional,
        Self::Casual,
        Self::Persuasive,
        Self::Friendly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Informative => "informative",
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Persuasive => "persuasive",
            Self::Friendly => "friendly",
        }
    }

    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tone: {s}"))
    }
}

/// 目标字数，序列化为 JSON 整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum WordCount {
    W500,
    #[default]
    W1000,
    W1500,
    W2000,
    W3000,
}

impl WordCount {
    pub const ALL: [WordCount; 5] = [
        Self::W500,
        Self::W1000,
        Self::W1500,
        Self::W2000,
        Self::W3000,
    ];

    pub fn value(&self) -> u32 {
        match self {
            Self::W500 => 500,
            Self::W1000 => 1000,
            Self::W1500 => 1500,
            Self::W2000 => 2000,
            Self::W3000 => 3000,
        }
    }

    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|w| w == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let i = Self::ALL.iter().position(|w| w == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl From<WordCount> for u32 {
    fn from(value: WordCount) -> Self {
        value.value()
    }
}

impl TryFrom<u32> for WordCount {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|w| w.value() == value)
            .ok_or_else(|| format!("unsupported word count: {value}"))
    }
}

impl FromStr for WordCount {
    type Err = String;

    /// 表单里的字数可能是字符串，这里统一转成整数档位
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| format!("word count is not a number: {s}"))?;
        Self::try_from(n)
    }
}

/// POST /generate-content 请求体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub keyword: String,
    pub provider: Provider,
    pub model: String,
    pub tone: Tone,
    pub word_count: WordCount,
    pub api_key: String,
    pub include_faq: bool,
    pub include_schema: bool,
}

/// 后端生成并保存的 SEO 内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub id: String,
    pub keyword: String,
    pub title: String,
    pub meta_description: String,
    pub content: String,
    pub h1_tag: String,
    #[serde(default)]
    pub h2_tags: Vec<String>,
    #[serde(default)]
    pub h3_tags: Vec<String>,
    #[serde(default)]
    pub faq_section: Option<String>,
    #[serde(default)]
    pub schema_markup: Option<String>,
    pub word_count: u32,
    pub provider: String,
    #[serde(default)]
    pub model: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// POST /test-api-key 的参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCheckRequest {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyCheckResponse {
    pub valid: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// GET /models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: IndexMap<String, Vec<String>>,
}

/// GET / 返回的服务信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub message: String,
    #[serde(default)]
    pub version: String,
}

/// 后端错误响应 `{"detail": "..."}`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// detail 可能是字符串，也可能是校验错误数组
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// 同时接受 RFC 3339 和不带时区的 ISO-8601（按 UTC 处理）
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}
