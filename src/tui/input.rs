use super::theme::{ACCENT, DIM};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// 单行文本输入框，支持 UTF-8 (中英文)
#[derive(Debug, Clone)]
pub struct InputBox {
    /// 输入内容
    content: String,
    /// 光标位置（按字符计数，非字节）
    cursor: usize,
    char_limit: usize,
}

impl InputBox {
    pub fn new(char_limit: usize) -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            char_limit,
        }
    }

    /// 处理编辑按键：插入、删除、光标移动
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => self.clear(),
            KeyCode::Char(_)
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    || key.modifiers.contains(KeyModifiers::ALT) => {}
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.delete_back(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => {}
        }
    }

    /// 在光标处插入字符，超出长度限制时忽略
    pub fn insert(&mut self, c: char) {
        if self.content.chars().count() >= self.char_limit {
            return;
        }
        let byte_pos = char_to_byte(&self.content, self.cursor);
        self.content.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Backspace: 删除光标前的字符
    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte(&self.content, self.cursor);
            let next_byte_pos = char_to_byte(&self.content, self.cursor + 1);
            self.content.drain(byte_pos..next_byte_pos);
        }
    }

    /// Delete: 删除光标后的字符
    pub fn delete_forward(&mut self) {
        if self.cursor < self.content.chars().count() {
            let byte_pos = char_to_byte(&self.content, self.cursor);
            let next_byte_pos = char_to_byte(&self.content, self.cursor + 1);
            self.content.drain(byte_pos..next_byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// 替换全部内容，光标移到末尾
    pub fn set_content(&mut self, text: &str) {
        self.content = text.chars().take(self.char_limit).collect();
        self.move_end();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor_pos(&self) -> usize {
        self.cursor
    }
}

/// UTF-8 安全的字符位置转字节位置
fn char_to_byte(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// 渲染输入框
pub fn render_input_box(
    f: &mut Frame,
    text: &str,
    cursor_pos: usize,
    label: &str,
    focused: bool,
    area: Rect,
) {
    let border_color = if focused { ACCENT } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let mut spans = vec![Span::styled(
        format!("{label} "),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    if text.is_empty() && !focused {
        spans.push(Span::styled("输入包名后按 Enter 搜索...", Style::default().fg(DIM)));
        f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let cursor_pos = cursor_pos.min(chars.len());
    let before: String = chars[..cursor_pos].iter().collect();
    let cursor_char = chars
        .get(cursor_pos)
        .map(|c| c.to_string())
        .unwrap_or_else(|| " ".to_string());
    let after: String = chars.get(cursor_pos + 1..).unwrap_or_default().iter().collect();

    spans.push(Span::styled(before, Style::default().fg(Color::White)));
    if focused {
        spans.push(Span::styled(
            cursor_char,
            Style::default().fg(Color::Black).bg(Color::White),
        ));
    } else {
        spans.push(Span::styled(cursor_char, Style::default().fg(Color::White)));
    }
    spans.push(Span::styled(after, Style::default().fg(Color::White)));

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
