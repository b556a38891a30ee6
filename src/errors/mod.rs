//! 张量层面的错误
//!
//! 张量运算的形状约定一旦被违反即视为调用方的编程错误，相关函数直接 panic，
//! panic 消息取自这里的 [`TensorError`]，测试中用 `assert_panic!` 比对。

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    #[error("形状不一致，无法{op}：左边为{lhs:?}，右边为{rhs:?}")]
    ShapeMismatch {
        op: BinaryOp,
        lhs: Vec<usize>,
        rhs: Vec<usize>,
    },
    #[error("正态分布的标准差须≥0")]
    NegativeStdDev,
    #[error("张量列表为空")]
    EmptyList,
    #[error("张量形状不一致")]
    InconsistentShape,
    #[error("张量形状不兼容")]
    IncompatibleShape,
    #[error("索引{index}越界：该维度长度为{len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("除数为零")]
    DivByZero,
}

/// 逐元素二元运算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinaryOp::Add => "相加",
            BinaryOp::Sub => "相减",
            BinaryOp::Mul => "相乘",
            BinaryOp::Div => "相除",
        })
    }
}
