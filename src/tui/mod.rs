mod app;
mod terminal;
mod theme;
mod views;
mod widgets;

pub use app::run;
