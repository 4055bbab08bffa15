use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use seo_writer_lib::store::KeyStatus;
use seo_writer_lib::{Action, AppState, Provider};

use super::{centered_rect, mask_api_key, Theme, View};
use crate::tui::widgets::TextInput;

/// 各供应商 API Key 的输入与校验状态
pub struct SettingsView {
    list_state: ListState,
    // 编辑弹窗状态
    popup_editing: bool,
    popup_input: TextInput,
}

impl SettingsView {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            popup_editing: false,
            popup_input: TextInput::new(""),
        }
    }

    fn selected_provider(&self) -> Provider {
        let i = self.list_state.selected().unwrap_or(0);
        Provider::ALL[i.min(Provider::ALL.len() - 1)]
    }

    fn select_prev(&mut self) {
        let i = self.list_state.selected().unwrap_or(0).saturating_sub(1);
        self.list_state.select(Some(i));
    }

    fn select_next(&mut self) {
        let i = (self.list_state.selected().unwrap_or(0) + 1).min(Provider::ALL.len() - 1);
        self.list_state.select(Some(i));
    }

    fn open_popup(&mut self, state: &AppState) {
        let provider = self.selected_provider();
        let current = state.key(provider).map(|k| k.key.as_str()).unwrap_or("");
        self.popup_input = TextInput::with_value(&format!("{} API Key", provider.label()), current);
        self.popup_editing = true;
    }

    /// 弹窗内每次按键都会触发一次校验
    fn handle_popup_key(&mut self, key: KeyCode) -> Vec<Action> {
        match key {
            KeyCode::Esc | KeyCode::Enter => {
                self.popup_editing = false;
                Vec::new()
            }
            other => {
                if self.popup_input.handle_key(other) {
                    vec![Action::SetApiKey {
                        provider: self.selected_provider(),
                        key: self.popup_input.value.clone(),
                    }]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn render_popup(&self, frame: &mut Frame, state: &AppState, theme: &Theme) {
        let area = centered_rect(70, 7, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!("Edit {}", self.popup_input.label))
            .borders(Borders::ALL)
            .style(theme.highlight);
        frame.render_widget(block, area);

        let inner = area.inner(Margin::new(2, 1));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let provider = self.selected_provider();
        let visible = state.key(provider).is_some_and(|k| k.visible);
        let display = if visible {
            self.popup_input.display_with_cursor()
        } else {
            format!("{}│", "*".repeat(self.popup_input.value.chars().count()))
        };
        frame.render_widget(Paragraph::new(display).style(theme.selected), chunks[0]);

        let (text, style) = status_text(state.key(provider).map(|k| &k.status), theme);
        frame.render_widget(Paragraph::new(text).style(style), chunks[1]);

        let hints = Paragraph::new("Enter/Esc:Done").style(theme.inactive);
        frame.render_widget(hints, chunks[2]);
    }
}

fn status_text(status: Option<&KeyStatus>, theme: &Theme) -> (String, Style) {
    match status {
        Some(KeyStatus::Valid) => ("✓ Valid".to_string(), theme.success),
        Some(KeyStatus::Checking) => ("… Checking".to_string(), theme.warning),
        Some(KeyStatus::Invalid(Some(reason))) => (format!("✗ Invalid: {reason}"), theme.error),
        Some(KeyStatus::Invalid(None)) => ("✗ Invalid".to_string(), theme.error),
        Some(KeyStatus::Unchecked) | None => ("- Not set".to_string(), theme.inactive),
    }
}

impl View for SettingsView {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let items: Vec<ListItem> = Provider::ALL
            .iter()
            .map(|provider| {
                let entry = state.key(*provider);
                let key = entry.map(|k| k.key.as_str()).unwrap_or("");
                let shown = match entry {
                    Some(k) if k.visible => key.to_string(),
                    _ => mask_api_key(key),
                };
                let (status, style) = status_text(entry.map(|k| &k.status), theme);
                let line = Line::from(vec![
                    Span::styled(format!("{:<16}", provider.label()), theme.normal),
                    Span::styled(format!("{:<28}", shown), theme.normal),
                    Span::styled(status, style),
                ]);
                ListItem::new(line)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("API Keys (kept in memory only)"),
            )
            .highlight_style(theme.selected)
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);

        if self.popup_editing {
            self.render_popup(frame, state, theme);
        }
    }

    fn handle_key(&mut self, key: KeyCode, state: &AppState) -> Vec<Action> {
        if self.popup_editing {
            return self.handle_popup_key(key);
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                self.open_popup(state);
                Vec::new()
            }
            KeyCode::Char('v') => vec![Action::ToggleKeyVisibility(self.selected_provider())],
            KeyCode::Char('x') => vec![Action::SetApiKey {
                provider: self.selected_provider(),
                key: String::new(),
            }],
            _ => Vec::new(),
        }
    }

    fn is_editing(&self) -> bool {
        self.popup_editing
    }

    fn hints(&self) -> &'static str {
        if self.popup_editing {
            "Type key (validated as you type)  Enter/Esc:Done"
        } else {
            "↑↓:Select  e:Edit key  v:Show/Hide  x:Clear  1-4:View  q:Quit"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seo_writer_lib::store::reduce;
    use seo_writer_lib::Effect;

    #[test]
    fn each_keystroke_triggers_a_check() {
        let mut state = AppState::default();
        let mut view = SettingsView::new();
        view.handle_key(KeyCode::Down, &state);
        view.handle_key(KeyCode::Enter, &state);
        assert!(view.is_editing());

        let mut checks = 0;
        for c in "sk-1".chars() {
            for action in view.handle_key(KeyCode::Char(c), &state) {
                checks += reduce(&mut state, action)
                    .iter()
                    .filter(|e| matches!(e, Effect::CheckKey { provider: Provider::Anthropic, .. }))
                    .count();
            }
        }
        assert_eq!(checks, 4);
        assert_eq!(state.key(Provider::Anthropic).unwrap().key, "sk-1");

        // 删光后立即无效，不再请求
        view.handle_key(KeyCode::Home, &state);
        for _ in 0..4 {
            for action in view.handle_key(KeyCode::Delete, &state) {
                reduce(&mut state, action);
            }
        }
        assert_eq!(
            state.key(Provider::Anthropic).unwrap().status,
            KeyStatus::Invalid(None)
        );
    }

    #[test]
    fn selection_is_clamped() {
        let state = AppState::default();
        let mut view = SettingsView::new();
        view.handle_key(KeyCode::Up, &state);
        assert_eq!(view.selected_provider(), Provider::OpenAi);
        for _ in 0..10 {
            view.handle_key(KeyCode::Down, &state);
        }
        assert_eq!(view.selected_provider(), Provider::Grok);
    }
}
