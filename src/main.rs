use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use seo_writer_lib::{config, ApiClient, Config};

mod tui;

/// AI SEO Writer terminal client
#[derive(Parser, Debug)]
#[command(name = "seo-writer-tui", version, about)]
struct Cli {
    /// Backend base URL (the client calls `<url>/api`)
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Config file (default: ~/.config/seo-writer/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file; the terminal is owned by the UI so logs never go to stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(config::default_log_path);
    init_logger(&log_path)?;

    log::info!("Starting AI SEO Writer TUI v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load(cli.config.as_deref())
        .and_then(|c| c.with_backend_url(cli.backend_url.clone()))
    {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return Err(e.into());
        }
    };

    let api = ApiClient::new(&config)?;
    log::info!("Using backend API at {}", api.base_url());

    tui::run(config, api).await
}

/// env_logger 写入文件，级别默认 info，可用 RUST_LOG 覆盖
fn init_logger(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}
