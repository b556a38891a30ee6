//! 文档索引页检查的错误类型

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocError {
    /// 正文声明的数据集数量与目录条目数不一致
    #[error("正文声明了 {stated} 个数据集，但目录中列出了 {listed} 个")]
    CountMismatch { stated: usize, listed: usize },

    #[error("页面中没有 toctree 指令")]
    MissingToctree,

    #[error("页面中没有声明数据集数量的句子")]
    MissingCount,

    /// 目录条目不是已注册的数据集
    #[error("目录条目 `{0}` 不是已注册的数据集")]
    UnknownEntry(String),
}
