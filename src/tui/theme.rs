//! 结果表配色，全局统一使用

use ratatui::style::Color;

/// 焦点边框 / 强调色
pub const ACCENT: Color = Color::Rgb(245, 169, 184);
/// 仓库名
pub const REPO: Color = Color::Rgb(91, 206, 250);
/// AUR 等外部仓库
pub const FOREIGN: Color = Color::Rgb(255, 184, 108);
/// 已安装标记
pub const INSTALLED: Color = Color::Rgb(120, 220, 140);
/// 选中行背景色
pub const SEL_BG: Color = Color::Rgb(45, 35, 55);
/// 暗灰色（次要信息）
pub const DIM: Color = Color::Rgb(130, 130, 140);
/// 错误信息
pub const ERROR: Color = Color::Rgb(240, 98, 98);
