use super::input;
use super::layout;
use super::render::{Body, DetailContent, DetailView, RenderModel, TableRow};
use super::theme::{ACCENT, DIM, ERROR, FOREIGN, INSTALLED, REPO, SEL_BG};
use ratatui::{
    layout::{Constraint, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, TableState, Wrap,
    },
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn draw(f: &mut Frame, model: &RenderModel) {
    let chunks = layout::main_layout(f.area());

    let title = if model.status.is_empty() {
        "📦 软件包搜索".to_string()
    } else {
        format!("📦 软件包搜索 — {}", model.status)
    };
    layout::render_header(f, &title, chunks[0]);

    input::render_input_box(
        f,
        &model.input.text,
        model.input.cursor,
        ">",
        model.input.focused,
        chunks[1],
    );

    match &model.body {
        Body::Searching { query } => render_searching(f, query, chunks[2]),
        Body::Error { detail } => render_error(f, detail, chunks[2]),
        Body::Table {
            rows,
            selected,
            focused,
        } => render_table(f, rows, *selected, *focused, chunks[2]),
    }

    if let Some(detail) = &model.detail {
        render_detail(f, detail, layout::centered_rect(80, 80, chunks[2]));
    }

    layout::render_footer(f, model.footer, chunks[3]);
}

fn render_searching(f: &mut Frame, query: &str, area: Rect) {
    let text = Paragraph::new(Line::from(vec![
        Span::styled("⏳ 正在搜索 ", Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("\"{}\"", query),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ...", Style::default().fg(Color::Yellow)),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(DIM)));
    f.render_widget(text, area);
}

fn render_error(f: &mut Frame, detail: &str, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        "✗ 搜索失败",
        Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        detail
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(ERROR)))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "修改关键词后按 Enter 重试",
        Style::default().fg(DIM),
    )));

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(ERROR)));
    f.render_widget(paragraph, area);
}

fn render_table(
    f: &mut Frame,
    rows: &[TableRow],
    selected: Option<usize>,
    focused: bool,
    area: Rect,
) {
    let border_color = if focused { ACCENT } else { Color::DarkGray };
    let block = Block::default()
        .title(" 搜索结果 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if rows.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "无结果",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(["仓库", "包名", "版本", "已安装", "描述"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let body: Vec<Row> = rows
        .iter()
        .map(|r| {
            let repo_color = if r.foreign { FOREIGN } else { REPO };
            Row::new(vec![
                Cell::from(Span::styled(r.repository.clone(), Style::default().fg(repo_color))),
                Cell::from(Span::styled(
                    r.name.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )),
                Cell::from(Line::from(vec![
                    Span::raw(r.version.clone()),
                    Span::styled(format!(" {}", r.status), Style::default().fg(DIM)),
                ])),
                Cell::from(Span::styled(
                    if r.installed { "✓" } else { "" },
                    Style::default().fg(INSTALLED),
                )),
                Cell::from(Span::styled(r.description.clone(), Style::default().fg(DIM))),
            ])
        })
        .collect();

    let name_width = rows
        .iter()
        .map(|r| UnicodeWidthStr::width(r.name.as_str()))
        .max()
        .unwrap_or(0)
        .clamp(8, 32) as u16;

    let table = Table::new(
        body,
        [
            Constraint::Length(10),
            Constraint::Length(name_width),
            Constraint::Length(24),
            Constraint::Length(6),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(SEL_BG).add_modifier(Modifier::BOLD))
    .highlight_symbol("► ");

    let mut state = TableState::default().with_selected(selected);
    f.render_stateful_widget(table, area, &mut state);

    let visible = area.height.saturating_sub(3) as usize;
    if rows.len() > visible {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(rows.len()).position(selected.unwrap_or(0));
        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                horizontal: 0,
                vertical: 1,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_detail(f: &mut Frame, detail: &DetailView, area: Rect) {
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" 📦 {} ", detail.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let padded = inner.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let lines: Vec<Line> = match &detail.content {
        DetailContent::Loading => vec![Line::from(Span::styled(
            "⏳ 正在获取包信息...",
            Style::default().fg(Color::Yellow),
        ))],
        DetailContent::Error(err) => vec![Line::from(Span::styled(
            format!("✗ {}", err),
            Style::default().fg(ERROR),
        ))],
        DetailContent::Fields(fields) => {
            // CJK 对齐
            let target_width = fields
                .iter()
                .map(|(k, _)| UnicodeWidthStr::width(k.as_str()))
                .max()
                .unwrap_or(0);
            fields
                .iter()
                .skip(detail.scroll)
                .map(|(key, value)| {
                    let pad = target_width.saturating_sub(UnicodeWidthStr::width(key.as_str()));
                    Line::from(vec![
                        Span::styled(
                            format!("{}{} : ", key, " ".repeat(pad)),
                            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(value.clone(), Style::default().fg(Color::White)),
                    ])
                })
                .collect()
        }
    };

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), padded);
}
