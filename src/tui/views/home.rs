use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use seo_writer_lib::{Action, AppState};

use super::{Theme, View};
use crate::tui::widgets::TextInput;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum FormField {
    Keyword,
    Provider,
    Model,
    Tone,
    WordCount,
    IncludeFaq,
    IncludeSchema,
    Generate,
}

impl FormField {
    const ALL: [FormField; 8] = [
        Self::Keyword,
        Self::Provider,
        Self::Model,
        Self::Tone,
        Self::WordCount,
        Self::IncludeFaq,
        Self::IncludeSchema,
        Self::Generate,
    ];

    fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    fn prev(&self) -> Self {
        let i = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Keyword => "Focus Keyword",
            Self::Provider => "AI Provider",
            Self::Model => "Model",
            Self::Tone => "Tone",
            Self::WordCount => "Word Count",
            Self::IncludeFaq => "Include FAQ",
            Self::IncludeSchema => "Include Schema",
            Self::Generate => "",
        }
    }
}

/// 生成表单
pub struct HomeView {
    active_field: FormField,
    editing: bool,
    keyword: TextInput,
}

impl HomeView {
    pub fn new() -> Self {
        Self {
            active_field: FormField::Keyword,
            editing: false,
            keyword: TextInput::new("Focus Keyword"),
        }
    }

    fn start_editing(&mut self, state: &AppState) {
        // 以 store 中的值为准
        self.keyword = TextInput::with_value("Focus Keyword", &state.form.keyword);
        self.editing = true;
    }

    fn handle_edit_key(&mut self, key: KeyCode) -> Vec<Action> {
        match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => {
                self.editing = false;
                if key == KeyCode::Tab {
                    self.active_field = self.active_field.next();
                }
                Vec::new()
            }
            other => {
                if self.keyword.handle_key(other) {
                    vec![Action::SetKeyword(self.keyword.value.clone())]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// 左右键切换选项
    fn cycle(&self, state: &AppState, forward: bool) -> Vec<Action> {
        let form = &state.form;
        let action = match self.active_field {
            FormField::Provider => Some(Action::SelectProvider(if forward {
                form.provider.next()
            } else {
                form.provider.prev()
            })),
            FormField::Model if state.model_selectable() => state
                .adjacent_model(forward)
                .map(|m| Action::SelectModel(m.to_string())),
            FormField::Tone => Some(Action::SetTone(if forward {
                form.tone.next()
            } else {
                form.tone.prev()
            })),
            FormField::WordCount => Some(Action::SetWordCount(if forward {
                form.word_count.next()
            } else {
                form.word_count.prev()
            })),
            FormField::IncludeFaq => Some(Action::SetIncludeFaq(!form.include_faq)),
            FormField::IncludeSchema => Some(Action::SetIncludeSchema(!form.include_schema)),
            _ => None,
        };
        action.into_iter().collect()
    }

    fn field_value(&self, field: FormField, state: &AppState) -> String {
        let form = &state.form;
        match field {
            FormField::Keyword if self.editing => self.keyword.display_with_cursor(),
            FormField::Keyword if form.keyword.is_empty() => {
                "<e.g. best productivity apps 2025>".to_string()
            }
            FormField::Keyword => form.keyword.clone(),
            FormField::Provider => {
                let marker = if state.is_validated(form.provider) {
                    "✓"
                } else {
                    "(no validated key)"
                };
                format!("‹ {} › {}", form.provider.label(), marker)
            }
            FormField::Model if state.model_selectable() => format!("‹ {} ›", form.model),
            FormField::Model => format!("{} (disabled)", form.model),
            FormField::Tone => format!("‹ {} ›", form.tone.as_str()),
            FormField::WordCount => format!("‹ {} words ›", form.word_count.value()),
            FormField::IncludeFaq => checkbox(form.include_faq),
            FormField::IncludeSchema => checkbox(form.include_schema),
            FormField::Generate => {
                if state.is_generating {
                    "[ Generating... ]".to_string()
                } else {
                    "[ Generate SEO Content ]".to_string()
                }
            }
        }
    }

    fn field_style(&self, field: FormField, state: &AppState, theme: &Theme) -> Style {
        let disabled = match field {
            FormField::Model => !state.model_selectable(),
            FormField::Generate => !state.can_generate(),
            _ => false,
        };
        if self.active_field == field {
            theme.selected
        } else if disabled {
            theme.inactive
        } else {
            theme.normal
        }
    }
}

fn checkbox(value: bool) -> String {
    let mark = if value { "[x]" } else { "[ ]" };
    mark.to_string()
}

impl View for HomeView {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Generate SEO Content");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints = vec![Constraint::Length(2); FormField::ALL.len()];
        constraints.push(Constraint::Min(0));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner.inner(Margin::new(1, 0)));

        for (i, field) in FormField::ALL.into_iter().enumerate() {
            let value = self.field_value(field, state);
            let text = if field == FormField::Generate {
                value
            } else {
                format!("{:<16}{}", format!("{}:", field.label()), value)
            };
            let p = Paragraph::new(text).style(self.field_style(field, state, theme));
            frame.render_widget(p, chunks[i]);
        }

        if !state.can_generate() && !state.is_generating {
            let warning = Paragraph::new(format!(
                "Add and validate a {} API key in Settings [2] to enable generation.",
                state.form.provider.label()
            ))
            .style(theme.warning);
            frame.render_widget(warning, chunks[FormField::ALL.len()]);
        }
    }

    fn handle_key(&mut self, key: KeyCode, state: &AppState) -> Vec<Action> {
        if self.editing {
            return self.handle_edit_key(key);
        }

        match key {
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
                self.active_field = self.active_field.next();
                Vec::new()
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                self.active_field = self.active_field.prev();
                Vec::new()
            }
            KeyCode::Left | KeyCode::Char('h') => self.cycle(state, false),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => self.cycle(state, true),
            KeyCode::Char('e') | KeyCode::Enter if self.active_field == FormField::Keyword => {
                self.start_editing(state);
                Vec::new()
            }
            KeyCode::Enter if self.active_field == FormField::Generate => {
                if state.can_generate() {
                    vec![Action::Generate]
                } else {
                    Vec::new()
                }
            }
            KeyCode::Char('g') => {
                if state.can_generate() {
                    vec![Action::Generate]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn is_editing(&self) -> bool {
        self.editing
    }

    fn hints(&self) -> &'static str {
        if self.editing {
            "Type to edit  Enter/Esc:Done"
        } else {
            "↑↓:Field  ←→:Change  e:Edit keyword  g:Generate  1-4:View  q:Quit"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seo_writer_lib::store::reduce;
    use seo_writer_lib::{Effect, Provider};

    fn apply(state: &mut AppState, actions: Vec<Action>) -> Vec<Effect> {
        actions
            .into_iter()
            .flat_map(|a| reduce(state, a))
            .collect()
    }

    #[test]
    fn typing_keyword_updates_store_per_keystroke() {
        let mut state = AppState::default();
        let mut view = HomeView::new();
        let actions = view.handle_key(KeyCode::Enter, &state);
        apply(&mut state, actions);
        assert!(view.is_editing());
        for c in "seo".chars() {
            let actions = view.handle_key(KeyCode::Char(c), &state);
            apply(&mut state, actions);
        }
        assert_eq!(state.form.keyword, "seo");
        view.handle_key(KeyCode::Esc, &state);
        assert!(!view.is_editing());
    }

    #[test]
    fn generate_shortcut_ignored_without_validated_key() {
        let state = AppState::default();
        let mut view = HomeView::new();
        assert!(view.handle_key(KeyCode::Char('g'), &state).is_empty());
    }

    #[test]
    fn model_field_does_not_cycle_when_disabled() {
        let mut state = AppState::default();
        let mut view = HomeView::new();
        view.handle_key(KeyCode::Down, &state);
        let actions = view.handle_key(KeyCode::Right, &state);
        apply(&mut state, actions);
        assert_eq!(state.form.provider, Provider::Anthropic);

        view.handle_key(KeyCode::Down, &state);
        assert!(view.handle_key(KeyCode::Right, &state).is_empty());
    }
}
