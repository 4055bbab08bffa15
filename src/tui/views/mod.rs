mod history;
mod home;
mod result;
mod settings;

pub use history::HistoryView;
pub use home::HomeView;
pub use result::ResultView;
pub use settings::SettingsView;

use crossterm::event::KeyCode;
use ratatui::prelude::*;
use seo_writer_lib::{Action, AppState};

use super::theme::Theme;

/// 页面只读取状态进行渲染，按键转换成 Action 交给 store
pub trait View {
    fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme);

    fn handle_key(&mut self, key: KeyCode, state: &AppState) -> Vec<Action>;

    /// 正在编辑文本时，全局快捷键不生效
    fn is_editing(&self) -> bool {
        false
    }

    fn hints(&self) -> &'static str;
}

pub(crate) fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

pub(crate) fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    // u32 计算，宽终端下 u16 乘法会溢出
    let popup_width = (u32::from(r.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let x = (r.width.saturating_sub(popup_width)) / 2;
    let y = (r.height.saturating_sub(height)) / 2;

    Rect::new(r.x + x, r.y + y, popup_width, height.min(r.height))
}
