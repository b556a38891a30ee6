//! 数据加载错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 数据加载相关错误
#[derive(Debug, Error)]
pub enum DataError {
    /// 文件未找到
    #[error("文件未找到: {0}")]
    FileNotFound(PathBuf),

    /// IO 错误
    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 格式错误（如 magic number 不匹配、记录长度不对）
    #[error("格式错误: {0}")]
    FormatError(String),

    /// 索引越界
    #[error("索引越界: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// 形状不匹配
    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// 下载错误
    #[error("下载错误: {0}")]
    DownloadError(String),

    /// 校验和不匹配
    #[error("校验和不匹配: 期望 {expected}, 实际 {got}")]
    ChecksumMismatch { expected: String, got: String },

    /// 解压错误
    #[error("解压错误: {0}")]
    DecompressionError(String),

    /// 配置不合法（batch_size 为 0、train_eval_size 过大等）
    #[error("配置错误: {0}")]
    InvalidConfig(String),

    /// 未注册的数据集名称
    #[error("未知的数据集: {0}")]
    UnknownDataSet(String),

    /// 图像解码错误
    #[error("图像错误: {0}")]
    ImageError(#[from] image::ImageError),

    /// npy 文件读取错误
    #[error("npy 读取错误: {0}")]
    NpyError(#[from] ndarray_npy::ReadNpyError),

    /// 配置文件解析错误
    #[error("配置文件解析错误: {0}")]
    ConfigParseError(#[from] toml::de::Error),
}
