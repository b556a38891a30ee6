//! 运行工具的错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    /// 命令行解析失败（含 `--help`）
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("学习率调度不合法: {0}")]
    InvalidLrSchedule(String),

    #[error("参数不合法: {0}")]
    InvalidArgument(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),
}
