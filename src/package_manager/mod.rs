//! 包管理器模块 — 对 yay / paru / pacman 的搜索与详情查询封装

pub mod error;
pub mod parser;
pub mod types;

// 重新导出常用类型
pub use error::InvokeError;
pub use parser::{parse_package_detail, SearchParser};
pub use types::{PackageDetail, PackageRecord};

use crate::config::Config;
use anyhow::{anyhow, Result};
use std::io::{BufRead, BufReader};

/// 按优先级探测的包管理器
const CANDIDATES: &[&str] = &["yay", "paru", "pacman"];

#[derive(Debug, Clone)]
pub struct PackageManager {
    pub command: String,
    pub search_args: Vec<String>,
    pub inspect_args: Vec<String>,
}

impl PackageManager {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            search_args: vec!["-Ss".to_string()],
            inspect_args: vec!["-Si".to_string()],
        }
    }

    pub fn detect() -> Result<Self> {
        for pm in CANDIDATES {
            let found = duct::cmd!("which", *pm)
                .stdout_null()
                .stderr_null()
                .unchecked()
                .run()
                .map(|o| o.status.success())
                .unwrap_or(false);
            if found {
                return Ok(Self::new(*pm));
            }
        }
        Err(anyhow!("未找到包管理器 (yay/paru/pacman)"))
    }

    /// 配置中指定了命令则直接使用，否则自动探测
    pub fn from_config(config: &Config) -> Result<Self> {
        let pm = match &config.command {
            Some(command) => Self::new(command.clone()),
            None => Self::detect()?,
        };
        Ok(pm.with_args(config.search_args.clone(), config.inspect_args.clone()))
    }

    pub fn with_args(mut self, search_args: Vec<String>, inspect_args: Vec<String>) -> Self {
        self.search_args = search_args;
        self.inspect_args = inspect_args;
        self
    }

    pub fn name(&self) -> &str {
        &self.command
    }

    /// 搜索远程仓库包 (`-Ss <query>`)，返回原始输出行
    pub fn search(&self, query: &str) -> Result<Vec<String>, InvokeError> {
        self.run(&self.search_args, query)
    }

    /// 获取包详情 (`-Si <name>`)，返回原始输出行
    pub fn inspect(&self, name: &str) -> Result<Vec<String>, InvokeError> {
        self.run(&self.inspect_args, name)
    }

    /// 逐行读取 stdout；非零退出时丢弃已读到的部分输出
    fn run(&self, base_args: &[String], operand: &str) -> Result<Vec<String>, InvokeError> {
        let mut args = base_args.to_vec();
        args.push(operand.to_string());
        log::info!("执行命令: {} {}", self.command, args.join(" "));

        let reader = duct::cmd(self.command.as_str(), args.iter())
            .stderr_capture()
            .unchecked()
            .reader()
            .map_err(|source| InvokeError::Spawn {
                program: self.command.clone(),
                source,
            })?;

        let mut lines = Vec::new();
        {
            let mut buffered = BufReader::new(&reader);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                if buffered.read_until(b'\n', &mut buf)? == 0 {
                    break;
                }
                let line = String::from_utf8_lossy(&buf);
                lines.push(line.trim_end_matches(['\n', '\r']).to_string());
            }
        }

        match reader.try_wait()? {
            Some(output) if !output.status.success() => {
                log::warn!(
                    "{} 退出异常 ({})，丢弃 {} 行输出",
                    self.command,
                    output.status,
                    lines.len()
                );
                Err(InvokeError::Exit {
                    program: self.command.clone(),
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                })
            }
            Some(_) => Ok(lines),
            None => {
                log::warn!("{} 的输出已结束但进程状态未知", self.command);
                Ok(lines)
            }
        }
    }
}
