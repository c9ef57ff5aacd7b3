mod config;
mod package_manager;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;

/// 在终端中搜索和查看 yay / paru / pacman 软件包
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// 启动后立即搜索的关键词
    query: Option<String>,

    /// 使用的包管理器命令（覆盖配置文件）
    #[arg(short, long)]
    command: Option<String>,

    /// 配置文件路径，默认 ~/.config/lian-yay/config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load_or_default()?,
    };
    if let Some(command) = cli.command {
        config.command = Some(command);
    }

    init_logging(&config)?;

    let pm = package_manager::PackageManager::from_config(&config)?;
    log::info!("使用包管理器: {}", pm.name());

    tui::run(config, pm, cli.query).await
}

/// TUI 占用终端，日志写入配置的文件；未配置且未设置 RUST_LOG 时关闭日志
fn init_logging(config: &config::Config) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("无法打开日志文件: {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None if std::env::var_os("RUST_LOG").is_none() => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {}
    }

    builder.init();
    Ok(())
}
