pub mod controller;
pub mod input;
mod layout;
pub mod render;
pub mod state;
mod theme;
mod view;

use crate::config::Config;
use crate::package_manager::{InvokeError, PackageManager, SearchParser};
use anyhow::Result;
use controller::Controller;
use crossterm::{
    cursor::Show,
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::{AppEvent, Command};
use std::io;
use tokio::sync::mpsc;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

pub async fn run(config: Config, pm: PackageManager, initial_query: Option<String>) -> Result<()> {
    // 终端初始化
    enable_raw_mode()?;
    let mut terminal = setup_or_restore(init_terminal, || {
        let _ = restore_terminal();
    })?;
    install_panic_hook();

    let result = event_loop(&mut terminal, &config, &pm, initial_query).await;

    // 恢复终端
    let restored = restore_terminal();
    result?;
    restored?;
    Ok(())
}

fn init_terminal() -> Result<Tui> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

/// 初始化失败时先恢复终端再返回错误
fn setup_or_restore<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    match setup() {
        Ok(value) => Ok(value),
        Err(e) => {
            restore();
            Err(e)
        }
    }
}

/// panic 时先退出 raw mode 和备用屏幕，否则错误信息会被吞掉
fn install_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        hook(info);
    }));
}

async fn event_loop(
    terminal: &mut Tui,
    config: &Config,
    pm: &PackageManager,
    initial_query: Option<String>,
) -> Result<()> {
    let parser = SearchParser::new(config.foreign_markers.clone());
    let mut controller = Controller::new(parser, config.input_char_limit);

    let (tx, mut rx) = mpsc::channel(32);

    if let Some(query) = initial_query {
        let command = controller.submit_query(&query);
        dispatch(command, pm, &tx);
    }

    // 主循环
    loop {
        let term_size = terminal.size()?;
        controller.set_page_size(layout::visible_rows(term_size.height));

        let model = render::project(&controller);
        terminal.draw(|f| view::draw(f, &model))?;

        // 处理按键
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match controller.handle_key(key) {
                    Command::Quit => break,
                    command => dispatch(command, pm, &tx),
                }
            }
        }

        // 处理异步事件
        while let Ok(event) = rx.try_recv() {
            controller.handle_event(event);
        }
    }

    Ok(())
}

/// 在后台执行外部命令，完成后把结果作为一条事件投递回主循环
pub fn dispatch(command: Command, pm: &PackageManager, tx: &mpsc::Sender<AppEvent>) {
    match command {
        Command::Search(query) => {
            let pm = pm.clone();
            let tx_clone = tx.clone();
            tokio::spawn(async move {
                let result = run_blocking(move || pm.search(&query)).await;
                let _ = tx_clone.send(AppEvent::SearchFinished(result)).await;
            });
        }
        Command::Inspect(name) => {
            let pm = pm.clone();
            let tx_clone = tx.clone();
            tokio::spawn(async move {
                let target = name.clone();
                let result = run_blocking(move || pm.inspect(&target)).await;
                let _ = tx_clone
                    .send(AppEvent::InspectFinished { name, result })
                    .await;
            });
        }
        Command::None | Command::Quit => {}
    }
}

async fn run_blocking<F>(job: F) -> Result<Vec<String>, String>
where
    F: FnOnce() -> Result<Vec<String>, InvokeError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .unwrap_or_else(|e| Err(InvokeError::Join(e.to_string())))
        .map_err(|e| e.to_string())
}
