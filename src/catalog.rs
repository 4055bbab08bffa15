//! 供应商 → 模型目录
//!
//! 内置一份与后端一致的静态表；启动后若 `GET /models` 成功，则以后端返回为准。

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::models::{ModelsResponse, Provider};

const BUILTIN_TABLE: &[(Provider, &[&str])] = &[
    (
        Provider::OpenAi,
        &[
            "gpt-4o",
            "gpt-4o-mini",
            "gpt-4.1",
            "gpt-4.1-mini",
            "gpt-4.1-nano",
            "o1",
            "o1-mini",
            "o1-pro",
            "o3",
            "o3-mini",
            "o4-mini",
        ],
    ),
    (
        Provider::Anthropic,
        &[
            "claude-sonnet-4-20250514",
            "claude-opus-4-20250514",
            "claude-3-7-sonnet-20250219",
            "claude-3-5-haiku-20241022",
            "claude-3-5-sonnet-20241022",
        ],
    ),
    (
        Provider::Gemini,
        &[
            "gemini-2.5-flash-preview-04-17",
            "gemini-2.5-pro-preview-05-06",
            "gemini-2.0-flash",
            "gemini-2.0-flash-preview-image-generation",
            "gemini-2.0-flash-lite",
            "gemini-1.5-flash",
            "gemini-1.5-flash-8b",
            "gemini-1.5-pro",
        ],
    ),
    (
        Provider::Groq,
        &[
            "llama-3.3-70b-versatile",
            "llama-3.1-70b-versatile",
            "llama-3.1-8b-instant",
            "mixtral-8x7b-32768",
            "gemma-7b-it",
        ],
    ),
    (Provider::Grok, &["grok-beta", "grok-vision-beta"]),
];

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    let models = BUILTIN_TABLE
        .iter()
        .map(|(provider, models)| {
            (
                *provider,
                models.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
            )
        })
        .collect();
    Catalog { models }
});

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    models: IndexMap<Provider, Vec<String>>,
}

impl Catalog {
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// 从后端 `/models` 响应构建目录。
    ///
    /// 未知供应商会被忽略；后端未列出的供应商模型列表为空。
    /// 如果响应里没有任何已知供应商，返回 `None`。
    pub fn from_response(response: &ModelsResponse) -> Option<Self> {
        let mut models = IndexMap::new();
        let mut known = 0;
        for provider in Provider::ALL {
            let list = response
                .models
                .get(provider.as_str())
                .cloned()
                .unwrap_or_default();
            if response.models.contains_key(provider.as_str()) {
                known += 1;
            }
            models.insert(provider, list);
        }

        for name in response.models.keys() {
            if name.parse::<Provider>().is_err() {
                log::debug!("[Catalog] ignoring unknown provider '{name}' from backend");
            }
        }

        (known > 0).then_some(Self { models })
    }

    pub fn models(&self, provider: Provider) -> &[String] {
        self.models
            .get(&provider)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    pub fn first_model(&self, provider: Provider) -> Option<&str> {
        self.models(provider).first().map(|s| s.as_str())
    }

    pub fn contains(&self, provider: Provider, model: &str) -> bool {
        self.models(provider).iter().any(|m| m == model)
    }
}
