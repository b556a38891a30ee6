//! 测试问题
//!
//! 一个测试问题把数据集、网络结构、损失函数和权重衰减组合在一起，
//! 优化器在其上训练并比较。这里只负责组合与参数登记，前向/反向计算不在本 crate 内。

mod cifar10_vgg16;
mod error;
mod loss;
mod network;
mod testproblem;

#[cfg(test)]
mod tests;

pub use cifar10_vgg16::{Cifar10Vgg16, DEFAULT_WEIGHT_DECAY};
pub use error::TestProblemError;
pub use loss::{CrossEntropyLoss, accuracy};
pub use network::{Init, Network, net_vgg};
pub use testproblem::{TestProblem, l2_regularization};
