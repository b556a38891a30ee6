//! 优化器运行的辅助工具
//!
//! - [`get_arguments`]: 预设值与命令行合并为 [`RunArgs`]
//! - [`make_run_name`]: 结果目录名与文件名
//! - [`LrSchedule`]: 分段常数学习率
//! - [`RunResults`]: 逐 epoch 的评估曲线及其 JSON 输出

mod args;
mod error;
mod output;
mod utils;

#[cfg(test)]
mod tests;

pub use args::{
    HyperparameterKind, HyperparameterSpec, HyperparameterValue, RunArgs, RunPreset, get_arguments,
};
pub use error::RunnerError;
pub use output::{EpochEval, Metrics, RunResults};
pub use utils::{LrSchedule, float2str, make_run_name, make_run_name_at};
