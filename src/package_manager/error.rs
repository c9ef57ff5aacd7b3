//! 外部命令调用错误

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("无法启动 {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("读取输出失败: {0}")]
    Capture(#[from] io::Error),

    #[error("{program} 执行失败 ({status}){}", stderr_hint(.stderr))]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("后台任务异常: {0}")]
    Join(String),
}

fn stderr_hint(stderr: &str) -> String {
    match stderr.lines().map(str::trim).find(|l| !l.is_empty()) {
        Some(line) => format!(": {}", line),
        None => String::new(),
    }
}
