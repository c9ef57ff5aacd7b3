use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 包管理器命令，未设置时自动探测 yay / paru / pacman
    pub command: Option<String>,
    pub search_args: Vec<String>,
    pub inspect_args: Vec<String>,
    /// 视为外部（AUR）仓库的仓库名，第一个作为显示名
    pub foreign_markers: Vec<String>,
    pub input_char_limit: usize,
    /// 日志输出文件；TUI 占用终端，日志只能写文件
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: None,
            search_args: vec!["-Ss".to_string()],
            inspect_args: vec!["-Si".to_string()],
            foreign_markers: vec!["aur".to_string()],
            input_char_limit: 64,
            log_file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/lian-yay/config.toml")
    }

    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "command = \"paru\"").unwrap();
        writeln!(file, "foreign_markers = [\"aur\", \"chaotic-aur\"]").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.command.as_deref(), Some("paru"));
        assert_eq!(config.foreign_markers, vec!["aur", "chaotic-aur"]);
        assert_eq!(config.search_args, vec!["-Ss"]);
        assert_eq!(config.inspect_args, vec!["-Si"]);
        assert_eq!(config.input_char_limit, 64);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "input_char_limit = \"many\"").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("解析配置文件失败"));
    }
}
