//! 状态容器
//!
//! 单向数据流：界面产生 [`Action`]，[`reduce`] 修改 [`AppState`] 并返回需要执行的
//! [`Effect`]；副作用完成后再以 `Action` 的形式回到 reducer。

mod reducer;
mod state;

pub use reducer::reduce;
pub use state::{
    AppState, BackendStatus, GenerateForm, KeyEntry, KeyStatus, Notice, View,
};

use crate::api::HISTORY_LIMIT;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    ApiInfo, GeneratedContent, GenerationRequest, KeyCheckRequest, KeyCheckResponse,
    ModelsResponse, Provider, Tone, WordCount,
};

#[derive(Debug)]
pub enum Action {
    Navigate(View),
    DismissNotice,

    // Settings
    SetApiKey { provider: Provider, key: String },
    ToggleKeyVisibility(Provider),
    KeyChecked {
        provider: Provider,
        seq: u64,
        result: Result<KeyCheckResponse, ApiError>,
    },

    // 生成表单
    SetKeyword(String),
    SelectProvider(Provider),
    SelectModel(String),
    SetTone(Tone),
    SetWordCount(WordCount),
    SetIncludeFaq(bool),
    SetIncludeSchema(bool),
    Generate,
    Generated(Result<GeneratedContent, ApiError>),

    // History
    RefreshHistory,
    HistoryLoaded(Result<Vec<GeneratedContent>, ApiError>),
    OpenHistoryItem(usize),

    // Result
    ReloadCurrent,
    CurrentReloaded(Result<GeneratedContent, ApiError>),

    // 启动时加载
    CatalogLoaded(Result<ModelsResponse, ApiError>),
    BackendInfoLoaded(Result<ApiInfo, ApiError>),
}

/// 需要访问后端的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CheckKey {
        provider: Provider,
        seq: u64,
        request: KeyCheckRequest,
    },
    Generate(GenerationRequest),
    FetchHistory { limit: usize },
    FetchContent { id: String },
    FetchCatalog,
    FetchBackendInfo,
}

pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new(config: &Config) -> Self {
        Self {
            state: AppState::new(config),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// 启动时需要执行的请求
    pub fn init(&mut self) -> Vec<Effect> {
        self.state.history_loading = true;
        vec![
            Effect::FetchBackendInfo,
            Effect::FetchCatalog,
            Effect::FetchHistory {
                limit: HISTORY_LIMIT,
            },
        ]
    }

    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        reduce(&mut self.state, action)
    }
}
