//! 副作用执行器
//!
//! 每个 [`Effect`] 在独立的 tokio 任务中执行，完成后把结果作为 [`Action`]
//! 发回 UI 循环。请求之间互不等待，也不会被取消。

use tokio::sync::mpsc::UnboundedSender;

use crate::api::ApiClient;
use crate::store::{Action, Effect};

#[derive(Clone)]
pub struct EffectRunner {
    api: ApiClient,
    tx: UnboundedSender<Action>,
}

impl EffectRunner {
    pub fn new(api: ApiClient, tx: UnboundedSender<Action>) -> Self {
        Self { api, tx }
    }

    pub fn spawn_all(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.spawn(effect);
        }
    }

    pub fn spawn(&self, effect: Effect) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let action = execute(&api, effect).await;
            if tx.send(action).is_err() {
                log::debug!("[Effects] UI loop closed, dropping result");
            }
        });
    }
}

/// 执行单个副作用并返回对应的结果 Action
pub async fn execute(api: &ApiClient, effect: Effect) -> Action {
    match effect {
        Effect::CheckKey {
            provider,
            seq,
            request,
        } => {
            log::debug!("[Effects] checking {provider} key with model {}", request.model);
            Action::KeyChecked {
                provider,
                seq,
                result: api.test_api_key(&request).await,
            }
        }
        Effect::Generate(request) => Action::Generated(api.generate_content(&request).await),
        Effect::FetchHistory { limit } => Action::HistoryLoaded(api.recent_content(limit).await),
        Effect::FetchContent { id } => Action::CurrentReloaded(api.content(&id).await),
        Effect::FetchCatalog => Action::CatalogLoaded(api.models().await),
        Effect::FetchBackendInfo => Action::BackendInfoLoaded(api.api_info().await),
    }
}
