//! # optbench
//!
//! 深度学习优化器基准测试的底层部件：
//!
//! - [`data`]: 九个基准数据集（quadratic、two_d、mnist、fmnist、cifar10、cifar100、svhn、imagenet、tolstoi），
//!   统一提供 train / train_eval / valid / test 四个批量加载器；
//! - [`docs`]: 数据集文档索引页的生成与一致性检查；
//! - [`testproblems`]: 测试问题（数据集 + 网络参数 + 损失）；
//! - [`runner`]: 运行参数、学习率调度、结果目录命名与 JSON 输出。
//!
//! 网络的前向与反向计算不在本库范围内。

pub mod data;
pub mod docs;
pub mod errors;
pub mod runner;
pub mod tensor;
pub mod testproblems;
pub mod utils;

pub use data::{DataSet, DataSetConfig, DataSetKind, DataSets};
pub use tensor::Tensor;
