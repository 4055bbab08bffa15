use super::state::{AppState, BackendStatus, KeyStatus, Notice, View};
use super::{Action, Effect};
use crate::api::HISTORY_LIMIT;
use crate::catalog::Catalog;
use crate::models::{KeyCheckRequest, Provider};

/// 纯状态转换：只修改 `state`，网络请求以 [`Effect`] 返回
pub fn reduce(state: &mut AppState, action: Action) -> Vec<Effect> {
    match action {
        Action::Navigate(view) => {
            state.view = view;
            Vec::new()
        }
        Action::DismissNotice => {
            state.notice = None;
            Vec::new()
        }

        Action::SetApiKey { provider, key } => set_api_key(state, provider, key),
        Action::ToggleKeyVisibility(provider) => {
            if let Some(entry) = state.keys.get_mut(&provider) {
                entry.visible = !entry.visible;
            }
            Vec::new()
        }
        Action::KeyChecked {
            provider,
            seq,
            result,
        } => {
            let Some(entry) = state.keys.get_mut(&provider) else {
                return Vec::new();
            };
            if entry.seq != seq {
                log::debug!(
                    "[Store] dropping stale key check for {provider} (seq {seq}, latest {})",
                    entry.seq
                );
                return Vec::new();
            }
            entry.status = match result {
                Ok(resp) if resp.valid => KeyStatus::Valid,
                Ok(resp) => KeyStatus::Invalid(resp.error),
                Err(e) => {
                    log::warn!("[Store] key check for {provider} failed: {e}");
                    KeyStatus::Invalid(Some(e.user_message()))
                }
            };
            log::info!("[Store] {provider} key status: {:?}", entry.status);
            Vec::new()
        }

        Action::SetKeyword(keyword) => {
            state.form.keyword = keyword;
            Vec::new()
        }
        Action::SelectProvider(provider) => {
            state.form.provider = provider;
            state.form.model = state
                .catalog
                .first_model(provider)
                .unwrap_or_default()
                .to_string();
            Vec::new()
        }
        Action::SelectModel(model) => {
            // 模型下拉框只在 Key 通过校验后可用，且只能选目录中的模型
            if state.model_selectable() && state.catalog.contains(state.form.provider, &model) {
                state.form.model = model;
            }
            Vec::new()
        }
        Action::SetTone(tone) => {
            state.form.tone = tone;
            Vec::new()
        }
        Action::SetWordCount(word_count) => {
            state.form.word_count = word_count;
            Vec::new()
        }
        Action::SetIncludeFaq(value) => {
            state.form.include_faq = value;
            Vec::new()
        }
        Action::SetIncludeSchema(value) => {
            state.form.include_schema = value;
            Vec::new()
        }
        Action::Generate => generate(state),
        Action::Generated(result) => {
            state.is_generating = false;
            match result {
                Ok(content) => {
                    log::info!("[Store] generated content {} ({} words)", content.id, content.word_count);
                    state.current = Some(content);
                    state.view = View::Result;
                    state.history_loading = true;
                    vec![Effect::FetchHistory {
                        limit: HISTORY_LIMIT,
                    }]
                }
                Err(e) => {
                    log::error!("[Store] content generation failed: {e}");
                    state.notice = Some(Notice::error("Generation failed", e.user_message()));
                    Vec::new()
                }
            }
        }

        Action::RefreshHistory => {
            state.history_loading = true;
            vec![Effect::FetchHistory {
                limit: HISTORY_LIMIT,
            }]
        }
        Action::HistoryLoaded(result) => {
            state.history_loading = false;
            match result {
                Ok(mut items) => {
                    items.truncate(HISTORY_LIMIT);
                    state.history = items;
                }
                // 历史记录不是关键功能，失败只记日志
                Err(e) => log::warn!("[Store] failed to load history: {e}"),
            }
            Vec::new()
        }
        Action::OpenHistoryItem(index) => {
            if let Some(item) = state.history.get(index) {
                state.current = Some(item.clone());
                state.view = View::Result;
            }
            Vec::new()
        }

        Action::ReloadCurrent => match &state.current {
            Some(content) if !state.is_reloading => {
                state.is_reloading = true;
                vec![Effect::FetchContent {
                    id: content.id.clone(),
                }]
            }
            _ => Vec::new(),
        },
        Action::CurrentReloaded(result) => {
            state.is_reloading = false;
            match result {
                Ok(content) => {
                    // 请求期间用户可能已切换到别的条目
                    if state.current.as_ref().map(|c| c.id.as_str()) == Some(content.id.as_str()) {
                        state.current = Some(content);
                    }
                }
                Err(e) => {
                    state.notice = Some(Notice::error("Reload failed", e.user_message()));
                }
            }
            Vec::new()
        }

        Action::CatalogLoaded(result) => {
            match result {
                Ok(resp) => match Catalog::from_response(&resp) {
                    Some(catalog) => {
                        log::info!("[Store] model catalog loaded from backend");
                        state.catalog = catalog;
                        if !state.catalog.contains(state.form.provider, &state.form.model) {
                            state.form.model = state
                                .catalog
                                .first_model(state.form.provider)
                                .unwrap_or_default()
                                .to_string();
                        }
                    }
                    None => log::warn!("[Store] backend catalog lists no known providers, keeping built-in table"),
                },
                Err(e) => log::warn!("[Store] failed to load model catalog, keeping built-in table: {e}"),
            }
            Vec::new()
        }
        Action::BackendInfoLoaded(result) => {
            state.backend = match result {
                Ok(info) => BackendStatus::Online(info),
                Err(e) => {
                    log::warn!("[Store] backend unreachable: {e}");
                    BackendStatus::Offline(e.user_message())
                }
            };
            Vec::new()
        }
    }
}

fn set_api_key(state: &mut AppState, provider: Provider, key: String) -> Vec<Effect> {
    let first_model = state
        .catalog
        .first_model(provider)
        .map(|m| m.to_string());
    let entry = state.keys.entry(provider).or_default();
    entry.key = key;
    entry.seq += 1;

    if entry.key.is_empty() {
        entry.status = KeyStatus::Invalid(None);
        return Vec::new();
    }

    let Some(model) = first_model else {
        entry.status = KeyStatus::Invalid(Some(format!(
            "No models available for {}",
            provider.label()
        )));
        return Vec::new();
    };

    entry.status = KeyStatus::Checking;
    vec![Effect::CheckKey {
        provider,
        seq: entry.seq,
        request: KeyCheckRequest {
            provider,
            api_key: entry.key.clone(),
            model,
        },
    }]
}

fn generate(state: &mut AppState) -> Vec<Effect> {
    if state.is_generating {
        return Vec::new();
    }
    if state.form.keyword.trim().is_empty() {
        state.notice = Some(Notice::error("Missing keyword", "Please enter a keyword"));
        return Vec::new();
    }
    let provider = state.form.provider;
    if !state.is_validated(provider) {
        state.notice = Some(Notice::error(
            "API key required",
            format!(
                "Please add and validate your {} API key in Settings",
                provider.label()
            ),
        ));
        return Vec::new();
    }

    state.is_generating = true;
    vec![Effect::Generate(state.build_request())]
}
