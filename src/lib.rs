//! AI SEO Writer 客户端核心库
//!
//! 包含状态容器、后端 HTTP 客户端、供应商模型目录和配置加载，
//! 与终端界面解耦，便于在无渲染环境下测试。

pub mod api;
pub mod catalog;
pub mod config;
pub mod effects;
pub mod error;
pub mod models;
pub mod store;

pub use api::{ApiClient, HISTORY_LIMIT};
pub use catalog::Catalog;
pub use config::Config;
pub use effects::EffectRunner;
pub use error::{ApiError, ConfigError};
pub use models::{GeneratedContent, GenerationRequest, Provider, Tone, WordCount};
pub use store::{Action, AppState, Effect, Store, View};
