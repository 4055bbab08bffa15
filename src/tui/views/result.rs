use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use seo_writer_lib::{Action, AppState, GeneratedContent};

use super::{Theme, View};

/// 生成结果：SEO 元数据、标题结构、FAQ、Schema 和正文
pub struct ResultView {
    scroll: u16,
    shown_id: Option<String>,
}

impl ResultView {
    pub fn new() -> Self {
        Self {
            scroll: 0,
            shown_id: None,
        }
    }
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &'a str, theme: &Theme) {
    if !lines.is_empty() {
        lines.push(Line::default());
    }
    lines.push(Line::styled(title, theme.heading));
}

fn content_lines<'a>(content: &'a GeneratedContent, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = Vec::new();

    section(&mut lines, "SEO Title", theme);
    lines.push(Line::styled(
        format!("{} ({} chars)", content.title, content.title.chars().count()),
        theme.normal,
    ));

    section(&mut lines, "Meta Description", theme);
    lines.push(Line::styled(
        format!(
            "{} ({} chars)",
            content.meta_description,
            content.meta_description.chars().count()
        ),
        theme.normal,
    ));

    section(&mut lines, "Details", theme);
    lines.push(Line::styled(
        format!(
            "Keyword: {}  Provider: {}{}  Words: {}  Created: {}",
            content.keyword,
            content.provider,
            if content.model.is_empty() {
                String::new()
            } else {
                format!(" / {}", content.model)
            },
            content.word_count,
            content.created_at.format("%Y-%m-%d %H:%M UTC")
        ),
        theme.inactive,
    ));

    section(&mut lines, "Heading Structure", theme);
    lines.push(Line::styled(format!("H1: {}", content.h1_tag), theme.normal));
    for h2 in &content.h2_tags {
        lines.push(Line::styled(format!("  H2: {h2}"), theme.normal));
    }
    for h3 in &content.h3_tags {
        lines.push(Line::styled(format!("    H3: {h3}"), theme.normal));
    }

    if let Some(faq) = content.faq_section.as_deref().filter(|s| !s.is_empty()) {
        section(&mut lines, "FAQ Section", theme);
        lines.extend(faq.lines().map(|l| Line::styled(l, theme.normal)));
    }

    if let Some(schema) = content.schema_markup.as_deref().filter(|s| !s.is_empty()) {
        section(&mut lines, "Schema Markup", theme);
        lines.extend(schema.lines().map(|l| Line::styled(l, theme.highlight)));
    }

    section(&mut lines, "Article", theme);
    lines.extend(content.content.lines().map(|l| Line::styled(l, theme.normal)));

    lines
}

impl View for ResultView {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
        let Some(content) = state.current.as_ref() else {
            let p = Paragraph::new("Nothing generated yet. Go to [1] Generate or [3] History.")
                .style(theme.inactive)
                .block(Block::default().borders(Borders::ALL).title("Result"));
            frame.render_widget(p, area);
            return;
        };

        if self.shown_id.as_deref() != Some(content.id.as_str()) {
            self.shown_id = Some(content.id.clone());
            self.scroll = 0;
        }

        let title = if state.is_reloading {
            format!("{} (reloading...)", content.keyword)
        } else {
            content.keyword.clone()
        };
        let p = Paragraph::new(content_lines(content, theme))
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(p, area);
    }

    fn handle_key(&mut self, key: KeyCode, _state: &AppState) -> Vec<Action> {
        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                Vec::new()
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                Vec::new()
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                Vec::new()
            }
            KeyCode::Home => {
                self.scroll = 0;
                Vec::new()
            }
            KeyCode::Char('r') => vec![Action::ReloadCurrent],
            _ => Vec::new(),
        }
    }

    fn hints(&self) -> &'static str {
        "↑↓/PgUp/PgDn:Scroll  r:Reload  Esc:Home  1-4:View  q:Quit"
    }
}
