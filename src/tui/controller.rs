//! 交互状态机：焦点路由、查询派发、异步结果处理
//!
//! ```text
//! Idle/EditingQuery --Enter(非空 且 无进行中命令)--> Searching
//! Searching --SearchFinished(Ok)--> ShowingResults   (焦点 → 结果表)
//! Searching --SearchFinished(Err)--> ShowingError    (焦点 → 输入框)
//! ShowingResults/ShowingError --Enter--> Searching   (覆盖上一次结果)
//! ```
//!
//! Controller 不做任何 I/O，只返回 [`Command`] 交给主循环执行。

use super::input::InputBox;
use super::state::{
    AppEvent, Command, DetailPane, DetailState, Focus, Phase, Request, SearchSession,
};
use crate::package_manager::{parse_package_detail, PackageRecord, SearchParser};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct Controller {
    session: SearchSession,
    input: InputBox,
    parser: SearchParser,
    selected: Option<usize>,
    page_size: usize,
    detail: Option<DetailPane>,
    in_flight: Option<Request>,
}

impl Controller {
    pub fn new(parser: SearchParser, char_limit: usize) -> Self {
        Self {
            session: SearchSession::new(),
            input: InputBox::new(char_limit),
            parser,
            selected: None,
            page_size: 10,
            detail: None,
            in_flight: None,
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn input(&self) -> &InputBox {
        &self.input
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn detail(&self) -> Option<&DetailPane> {
        self.detail.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn selected_record(&self) -> Option<&PackageRecord> {
        self.selected.and_then(|i| self.session.records().get(i))
    }

    /// 翻页步长，随终端高度变化
    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
    }

    /// 以给定文本作为查询直接提交（命令行参数）
    pub fn submit_query(&mut self, text: &str) -> Command {
        self.input.set_content(text);
        self.session.focus = Focus::QueryInput;
        self.submit()
    }

    // ===== 按键 =====

    pub fn handle_key(&mut self, key: KeyEvent) -> Command {
        if key.kind == KeyEventKind::Release {
            return Command::None;
        }

        // 全局退出
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Command::Quit;
            }
            KeyCode::Esc => return Command::Quit,
            KeyCode::Char('q')
                if self.session.focus == Focus::ResultView && key.modifiers.is_empty() =>
            {
                return Command::Quit;
            }
            _ => {}
        }

        if self.detail.is_some() {
            self.handle_detail_key(key);
            return Command::None;
        }

        if key.code == KeyCode::Tab {
            self.session.focus = match self.session.focus {
                Focus::QueryInput => Focus::ResultView,
                Focus::ResultView => Focus::QueryInput,
            };
            return Command::None;
        }

        match self.session.focus {
            Focus::QueryInput => {
                if key.code == KeyCode::Enter {
                    return self.submit();
                }
                self.input.handle_key(key);
                Command::None
            }
            Focus::ResultView => self.handle_result_key(key),
        }
    }

    fn submit(&mut self) -> Command {
        let query = self.input.content().trim().to_string();
        if query.is_empty() {
            return Command::None;
        }
        if let Some(request) = &self.in_flight {
            log::debug!("已有命令在执行 ({:?})，忽略提交: {}", request, query);
            return Command::None;
        }

        log::info!("开始搜索: {}", query);
        self.session.query = query.clone();
        self.session.phase = Phase::Searching;
        self.session.focus = Focus::ResultView;
        self.selected = None;
        self.detail = None;
        self.in_flight = Some(Request::Search);
        Command::Search(query)
    }

    fn handle_result_key(&mut self, key: KeyEvent) -> Command {
        let page = self.page_size as isize;
        match key.code {
            KeyCode::Char('/') | KeyCode::Char('s') => {
                self.session.focus = Focus::QueryInput;
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-page),
            KeyCode::PageDown => self.move_selection(page),
            KeyCode::Home | KeyCode::Char('g') => self.select_edge(false),
            KeyCode::End | KeyCode::Char('G') => self.select_edge(true),
            KeyCode::Enter => return self.open_detail(),
            _ => {}
        }
        Command::None
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.session.records().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.selected = Some(next as usize);
    }

    fn select_edge(&mut self, last: bool) {
        let len = self.session.records().len();
        self.selected = match (len, last) {
            (0, _) => None,
            (_, false) => Some(0),
            (n, true) => Some(n - 1),
        };
    }

    fn open_detail(&mut self) -> Command {
        if self.in_flight.is_some() {
            return Command::None;
        }
        let Some(name) = self.selected_record().map(|r| r.name.clone()) else {
            return Command::None;
        };

        self.detail = Some(DetailPane {
            name: name.clone(),
            state: DetailState::Loading,
            scroll: 0,
        });
        self.in_flight = Some(Request::Inspect(name.clone()));
        Command::Inspect(name)
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        let page = self.page_size;
        let Some(pane) = self.detail.as_mut() else {
            return;
        };
        let max_scroll = match &pane.state {
            DetailState::Loaded(detail) => detail.fields.len().saturating_sub(1),
            _ => 0,
        };

        let loading = pane.state == DetailState::Loading;

        match key.code {
            // 加载期间浮层保持打开，直到结果返回
            KeyCode::Enter | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h')
                if !loading =>
            {
                self.detail = None;
            }
            KeyCode::Up | KeyCode::Char('k') => pane.scroll = pane.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => pane.scroll = (pane.scroll + 1).min(max_scroll),
            KeyCode::PageUp => pane.scroll = pane.scroll.saturating_sub(page),
            KeyCode::PageDown => pane.scroll = (pane.scroll + page).min(max_scroll),
            _ => {}
        }
    }

    // ===== 异步事件 =====

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchFinished(result) => {
                if self.in_flight != Some(Request::Search) || !self.session.is_searching() {
                    log::warn!("收到意外的搜索结果，已忽略");
                    return;
                }
                self.in_flight = None;

                match result {
                    Ok(lines) => {
                        let records = self.parser.parse(&lines);
                        log::info!(
                            "搜索 \"{}\" 完成: {} 行输出, {} 个包",
                            self.session.query,
                            lines.len(),
                            records.len()
                        );
                        self.selected = if records.is_empty() { None } else { Some(0) };
                        self.session.phase = Phase::ShowingResults(records);
                        self.session.focus = Focus::ResultView;
                    }
                    Err(detail) => {
                        log::warn!("搜索 \"{}\" 失败: {}", self.session.query, detail);
                        self.selected = None;
                        self.session.phase = Phase::ShowingError(detail);
                        self.session.focus = Focus::QueryInput;
                    }
                }
            }
            AppEvent::InspectFinished { name, result } => {
                if self.in_flight != Some(Request::Inspect(name.clone())) {
                    log::warn!("收到意外的详情结果: {}", name);
                    return;
                }
                self.in_flight = None;

                match self.detail.as_mut() {
                    Some(pane) if pane.name == name => {
                        pane.state = match result {
                            Ok(lines) => DetailState::Loaded(parse_package_detail(&lines)),
                            Err(detail) => DetailState::Failed(detail),
                        };
                    }
                    // 浮层已关闭
                    _ => log::debug!("详情浮层已关闭，丢弃结果: {}", name),
                }
            }
        }
    }
}
