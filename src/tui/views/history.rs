use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use seo_writer_lib::{Action, AppState};

use super::{Theme, View};

pub struct HistoryView {
    list_state: ListState,
}

impl HistoryView {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default(),
        }
    }

    fn select_prev(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }
}

impl View for HistoryView {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let title = if state.history_loading {
            "Recent Content (loading...)"
        } else {
            "Recent Content"
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if state.history.is_empty() {
            let p = Paragraph::new("No content generated yet.")
                .style(theme.inactive)
                .block(block);
            frame.render_widget(p, area);
            return;
        }

        // 刷新后列表可能变短
        match self.list_state.selected() {
            Some(i) if i >= state.history.len() => {
                self.list_state.select(Some(state.history.len() - 1))
            }
            None => self.list_state.select(Some(0)),
            _ => {}
        }

        let items: Vec<ListItem> = state
            .history
            .iter()
            .map(|item| {
                let line = Line::from(vec![
                    Span::styled(item.title.clone(), theme.normal),
                    Span::styled(
                        format!(
                            "  [{}] {} · {} words · {}",
                            item.keyword,
                            item.provider,
                            item.word_count,
                            item.created_at.format("%Y-%m-%d %H:%M")
                        ),
                        theme.inactive,
                    ),
                ]);
                ListItem::new(line)
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme.selected)
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn handle_key(&mut self, key: KeyCode, state: &AppState) -> Vec<Action> {
        let len = state.history.len();
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev(len);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next(len);
                Vec::new()
            }
            KeyCode::Enter => match self.list_state.selected() {
                Some(i) if i < len => vec![Action::OpenHistoryItem(i)],
                None if len > 0 => vec![Action::OpenHistoryItem(0)],
                _ => Vec::new(),
            },
            KeyCode::Char('r') => vec![Action::RefreshHistory],
            _ => Vec::new(),
        }
    }

    fn hints(&self) -> &'static str {
        "↑↓:Select  Enter:Open  r:Refresh  1-4:View  q:Quit"
    }
}
