use indexmap::IndexMap;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::models::{ApiInfo, GeneratedContent, GenerationRequest, Provider, Tone, WordCount};

/// 四个互斥的页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Settings,
    History,
    Result,
}

impl View {
    pub const ALL: [View; 4] = [Self::Home, Self::Settings, Self::History, Self::Result];

    pub fn index(&self) -> usize {
        match self {
            Self::Home => 0,
            Self::Settings => 1,
            Self::History => 2,
            Self::Result => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Generate",
            Self::Settings => "API Keys",
            Self::History => "History",
            Self::Result => "Result",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyStatus {
    /// 尚未输入
    #[default]
    Unchecked,
    /// 校验请求进行中
    Checking,
    Valid,
    /// 无效，附带后端或网络错误信息
    Invalid(Option<String>),
}

#[derive(Debug, Clone, Default)]
pub struct KeyEntry {
    pub key: String,
    pub status: KeyStatus,
    pub visible: bool,
    /// 每次编辑递增，用来丢弃过期的校验结果
    pub(crate) seq: u64,
}

impl KeyEntry {
    pub fn is_valid(&self) -> bool {
        self.status == KeyStatus::Valid
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateForm {
    pub keyword: String,
    pub provider: Provider,
    pub model: String,
    pub tone: Tone,
    pub word_count: WordCount,
    pub include_faq: bool,
    pub include_schema: bool,
}

/// 需要用户确认的错误提示框
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Online(ApiInfo),
    Offline(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub view: View,
    pub catalog: Catalog,
    pub keys: IndexMap<Provider, KeyEntry>,
    pub form: GenerateForm,
    pub current: Option<GeneratedContent>,
    pub history: Vec<GeneratedContent>,
    pub history_loading: bool,
    pub is_generating: bool,
    pub is_reloading: bool,
    pub notice: Option<Notice>,
    pub backend: BackendStatus,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let catalog = Catalog::builtin();
        let provider = config.defaults.provider;
        let model = catalog
            .first_model(provider)
            .unwrap_or_default()
            .to_string();

        Self {
            view: View::Home,
            keys: Provider::ALL
                .into_iter()
                .map(|p| (p, KeyEntry::default()))
                .collect(),
            form: GenerateForm {
                keyword: String::new(),
                provider,
                model,
                tone: config.defaults.tone,
                word_count: config.default_word_count(),
                include_faq: config.defaults.include_faq,
                include_schema: config.defaults.include_schema,
            },
            catalog,
            current: None,
            history: Vec::new(),
            history_loading: false,
            is_generating: false,
            is_reloading: false,
            notice: None,
            backend: BackendStatus::Unknown,
        }
    }

    pub fn key(&self, provider: Provider) -> Option<&KeyEntry> {
        self.keys.get(&provider)
    }

    pub fn is_validated(&self, provider: Provider) -> bool {
        self.key(provider).is_some_and(KeyEntry::is_valid)
    }

    /// 当前供应商的模型下拉框是否可用
    pub fn model_selectable(&self) -> bool {
        self.is_validated(self.form.provider)
    }

    /// 生成按钮是否可用：只看当前供应商的 Key 是否通过校验
    pub fn can_generate(&self) -> bool {
        !self.is_generating && self.is_validated(self.form.provider)
    }

    pub fn model_options(&self) -> &[String] {
        self.catalog.models(self.form.provider)
    }

    /// 模型列表中相邻的模型（循环）
    pub fn adjacent_model(&self, forward: bool) -> Option<&str> {
        let options = self.model_options();
        if options.is_empty() {
            return None;
        }
        let len = options.len();
        let next = match options.iter().position(|m| *m == self.form.model) {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        Some(options[next].as_str())
    }

    pub(crate) fn build_request(&self) -> GenerationRequest {
        let api_key = self
            .key(self.form.provider)
            .map(|k| k.key.clone())
            .unwrap_or_default();
        GenerationRequest {
            keyword: self.form.keyword.clone(),
            provider: self.form.provider,
            model: self.form.model.clone(),
            tone: self.form.tone,
            word_count: self.form.word_count,
            api_key,
            include_faq: self.form.include_faq,
            include_schema: self.form.include_schema,
        }
    }
}
