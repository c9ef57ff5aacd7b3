//! 渲染模型：由 Controller 状态纯函数投影得到，绘制层只读它

use super::controller::Controller;
use super::state::{DetailState, Focus, Phase};

#[derive(Debug, Clone, PartialEq)]
pub struct RenderModel {
    pub input: InputEcho,
    pub body: Body,
    pub detail: Option<DetailView>,
    pub status: String,
    pub footer: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputEcho {
    pub text: String,
    pub cursor: usize,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Searching { query: String },
    Error { detail: String },
    Table {
        rows: Vec<TableRow>,
        selected: Option<usize>,
        focused: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub repository: String,
    pub name: String,
    pub version: String,
    /// 版本之后的附加信息，如 `(Installed)`、`(+12 0.50)`
    pub status: String,
    pub description: String,
    pub installed: bool,
    pub foreign: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub content: DetailContent,
    pub scroll: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailContent {
    Loading,
    Fields(Vec<(String, String)>),
    Error(String),
}

pub fn project(controller: &Controller) -> RenderModel {
    let session = controller.session();
    let focus = session.focus;

    let input = InputEcho {
        text: controller.input().content().to_string(),
        cursor: controller.input().cursor_pos(),
        focused: focus == Focus::QueryInput && controller.detail().is_none(),
    };

    let body = match &session.phase {
        Phase::Searching => Body::Searching {
            query: session.query.clone(),
        },
        Phase::ShowingError(detail) => Body::Error {
            detail: detail.clone(),
        },
        Phase::Idle | Phase::ShowingResults(_) => Body::Table {
            rows: session
                .records()
                .iter()
                .map(|r| TableRow {
                    repository: r.repository.clone(),
                    name: r.name.clone(),
                    version: r.version.clone(),
                    status: r.status.clone(),
                    description: r.description.clone().unwrap_or_default(),
                    installed: r.installed,
                    foreign: r.is_foreign(),
                })
                .collect(),
            selected: controller.selected(),
            focused: focus == Focus::ResultView,
        },
    };

    let detail = controller.detail().map(|pane| {
        let content = match &pane.state {
            DetailState::Loading => DetailContent::Loading,
            DetailState::Loaded(detail) => DetailContent::Fields(detail.fields.clone()),
            DetailState::Failed(err) => DetailContent::Error(err.clone()),
        };
        let title = match &pane.state {
            DetailState::Loaded(detail) => detail.get("Name").unwrap_or(&pane.name).to_string(),
            _ => pane.name.clone(),
        };
        DetailView {
            title,
            content,
            scroll: pane.scroll,
        }
    });

    let status = match &session.phase {
        Phase::Idle => String::new(),
        Phase::Searching => "搜索中...".to_string(),
        Phase::ShowingResults(records) => format!("\"{}\": {} 个结果", session.query, records.len()),
        Phase::ShowingError(_) => "搜索失败".to_string(),
    };

    let footer = match &detail {
        Some(view) if view.content == DetailContent::Loading => "正在获取包信息，请稍候 | Esc 退出",
        Some(_) => "↑↓ 滚动 | PgUp/PgDn 翻页 | Enter/Backspace 返回列表 | Esc 退出",
        None => match focus {
            Focus::QueryInput if !controller.in_flight() => {
                "Enter 搜索 | Tab 切换到结果 | Ctrl+U 清空 | Esc 退出"
            }
            Focus::QueryInput => "搜索进行中，请稍候 | Tab 切换到结果 | Esc 退出",
            Focus::ResultView => "↑↓/jk 选择 | Enter 查看详情 | / 或 Tab 编辑查询 | q 退出",
        },
    };

    RenderModel {
        input,
        body,
        detail,
        status,
        footer,
    }
}
