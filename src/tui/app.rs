use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::terminal::{self, Tui};
use super::theme::Theme;
use super::views::{centered_rect, HistoryView, HomeView, ResultView, SettingsView, View};
use seo_writer_lib::store::BackendStatus;
use seo_writer_lib::{store, Action, ApiClient, Config, EffectRunner, Store};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct App {
    pub store: Store,
    pub theme: Theme,
    pub should_quit: bool,
    runner: EffectRunner,
    results: UnboundedReceiver<Action>,

    pub home_view: HomeView,
    pub settings_view: SettingsView,
    pub history_view: HistoryView,
    pub result_view: ResultView,
}

impl App {
    pub fn new(config: &Config, api: ApiClient) -> Self {
        let (tx, results) = mpsc::unbounded_channel();
        Self {
            store: Store::new(config),
            theme: Theme::default(),
            should_quit: false,
            runner: EffectRunner::new(api, tx),
            results,
            home_view: HomeView::new(),
            settings_view: SettingsView::new(),
            history_view: HistoryView::new(),
            result_view: ResultView::new(),
        }
    }

    fn dispatch(&mut self, action: Action) {
        let effects = self.store.dispatch(action);
        self.runner.spawn_all(effects);
    }

    /// 把已完成的后台请求结果交给 store
    fn drain_results(&mut self) {
        while let Ok(action) = self.results.try_recv() {
            self.dispatch(action);
        }
    }

    fn active_view(&mut self) -> &mut dyn View {
        match self.store.state().view {
            store::View::Home => &mut self.home_view,
            store::View::Settings => &mut self.settings_view,
            store::View::History => &mut self.history_view,
            store::View::Result => &mut self.result_view,
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(1), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_tabs(frame, chunks[1]);
        self.render_content(frame, chunks[2]);
        self.render_status_bar(frame, chunks[3]);

        // 提示框覆盖在最上层
        self.render_notice(frame);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let state = self.store.state();
        let backend = match &state.backend {
            BackendStatus::Unknown => Span::styled("connecting...", self.theme.inactive),
            BackendStatus::Online(info) => Span::styled(
                format!("online ({} {})", info.message, info.version),
                self.theme.success,
            ),
            BackendStatus::Offline(reason) => {
                Span::styled(format!("offline ({reason})"), self.theme.error)
            }
        };

        let mut spans = vec![
            Span::styled(format!(" AI SEO Writer TUI v{VERSION}    Backend: "), self.theme.title),
            backend,
        ];
        if state.is_generating {
            spans.push(Span::styled("    Generating content...", self.theme.warning));
        }

        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::BOTTOM));
        frame.render_widget(header, area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<String> = store::View::ALL
            .iter()
            .enumerate()
            .map(|(i, v)| format!("[{}]{}", i + 1, v.title()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.store.state().view.index())
            .style(self.theme.normal)
            .highlight_style(self.theme.selected);
        frame.render_widget(tabs, area);
    }

    fn render_content(&mut self, frame: &mut Frame, area: Rect) {
        let state = self.store.state();
        let theme = &self.theme;
        match state.view {
            store::View::Home => self.home_view.render(frame, area, state, theme),
            store::View::Settings => self.settings_view.render(frame, area, state, theme),
            store::View::History => self.history_view.render(frame, area, state, theme),
            store::View::Result => self.result_view.render(frame, area, state, theme),
        }
    }

    fn render_status_bar(&mut self, frame: &mut Frame, area: Rect) {
        let hints = if self.store.state().notice.is_some() {
            "Enter/Esc:Dismiss"
        } else {
            self.active_view().hints()
        };
        let status = Paragraph::new(hints).style(self.theme.inactive);
        frame.render_widget(status, area);
    }

    fn render_notice(&self, frame: &mut Frame) {
        let Some(notice) = &self.store.state().notice else {
            return;
        };

        let area = centered_rect(60, 7, frame.area());
        frame.render_widget(Clear, area);

        let p = Paragraph::new(notice.message.as_str())
            .style(self.theme.error)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(notice.title.as_str())
                    .borders(Borders::ALL),
            );
        frame.render_widget(p, area);
    }

    fn handle_key(&mut self, key: KeyCode) {
        // 提示框需要先确认
        if self.store.state().notice.is_some() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dispatch(Action::DismissNotice);
            }
            return;
        }

        // 编辑中的页面独占按键
        if self.active_view().is_editing() {
            self.handle_view_key(key);
            return;
        }

        // Global keys
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.dispatch(Action::Navigate(store::View::ALL[index]));
            }
            KeyCode::Esc => self.dispatch(Action::Navigate(store::View::Home)),
            _ => self.handle_view_key(key),
        }
    }

    fn handle_view_key(&mut self, key: KeyCode) {
        let actions = match self.store.state().view {
            store::View::Home => self.home_view.handle_key(key, self.store.state()),
            store::View::Settings => self.settings_view.handle_key(key, self.store.state()),
            store::View::History => self.history_view.handle_key(key, self.store.state()),
            store::View::Result => self.result_view.handle_key(key, self.store.state()),
        };
        for action in actions {
            self.dispatch(action);
        }
    }
}

pub async fn run(config: Config, api: ApiClient) -> Result<()> {
    let mut terminal = terminal::init()?;
    let mut app = App::new(&config, api);

    // 启动时加载服务信息、模型目录和历史记录
    let effects = app.store.init();
    app.runner.spawn_all(effects);

    let result = event_loop(&mut terminal, &mut app);
    finish(result, || terminal::restore(&mut terminal))?;
    log::info!("Exiting AI SEO Writer TUI");
    Ok(())
}

/// 无论循环是否出错都先恢复终端；两者都失败时返回循环的错误
fn finish<T>(result: Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        app.drain_results();
        terminal.draw(|frame| app.render(frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn terminal_is_restored_when_the_loop_fails() {
        let mut restored = 0;
        let result: Result<()> = finish(Err(anyhow!("draw failed")), || {
            restored += 1;
            Ok(())
        });
        assert_eq!(restored, 1);
        assert_eq!(result.unwrap_err().to_string(), "draw failed");
    }

    #[test]
    fn loop_error_wins_over_restore_error() {
        let result: Result<()> = finish(Err(anyhow!("poll failed")), || {
            Err(anyhow!("restore failed"))
        });
        assert_eq!(result.unwrap_err().to_string(), "poll failed");

        let result = finish(Ok(()), || Err(anyhow!("restore failed")));
        assert_eq!(result.unwrap_err().to_string(), "restore failed");
    }
}
