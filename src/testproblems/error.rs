//! 测试问题相关错误

use thiserror::Error;

use crate::data::DataError;

#[derive(Debug, Error)]
pub enum TestProblemError {
    /// 尚未调用 `set_up()`
    #[error("测试问题 {0} 尚未 set_up")]
    NotSetUp(&'static str),

    /// 网络参数尚未初始化，携带第一个未初始化的参数名
    #[error("参数 {0} 尚未初始化")]
    NotInitialized(String),

    #[error("未知的参数: {0}")]
    UnknownParameter(String),

    #[error("形状不匹配: 期望 {expected:?}, 实际 {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("配置错误: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Data(#[from] DataError),
}
