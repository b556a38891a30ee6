/*
 * @Description  : 测试问题 = 数据集 + 网络 + 损失函数 + 权重衰减
 */

use super::error::TestProblemError;
use super::loss::{CrossEntropyLoss, accuracy};
use super::network::Network;
use crate::data::DataSets;
use crate::tensor::Tensor;

/// 所有测试问题的公共接口
///
/// 构造时只记录批大小与权重衰减；`set_up()` 才会载入数据、登记网络。
pub trait TestProblem {
    /// 注册名，如 `"cifar10_vgg16"`
    fn name(&self) -> &'static str;

    fn batch_size(&self) -> usize;

    fn weight_decay(&self) -> f32;

    /// 载入数据集并构造网络
    fn set_up(&mut self) -> Result<(), TestProblemError>;

    fn data(&self) -> Result<&DataSets, TestProblemError>;

    fn net(&self) -> Result<&Network, TestProblemError>;

    fn net_mut(&mut self) -> Result<&mut Network, TestProblemError>;

    fn loss_function(&self) -> CrossEntropyLoss {
        CrossEntropyLoss::new()
    }

    /// 默认的正则项：`weight_decay * 0.5 * Σ‖w‖²`，只惩罚非偏置参数
    fn regularization_loss(&self) -> Result<f32, TestProblemError> {
        l2_regularization(self.net()?, self.weight_decay())
    }

    /// 一个批次的 (损失 + 正则项, 准确率)
    fn batch_loss_and_accuracy(
        &self,
        logits: &Tensor,
        labels: &Tensor,
    ) -> Result<(f32, f32), TestProblemError> {
        let loss = self.loss_function().forward(logits, labels)?;
        let acc = accuracy(logits, labels)?;
        Ok((loss + self.regularization_loss()?, acc))
    }
}

/// 对名称中不含 `bias` 的参数求 L2 正则
pub fn l2_regularization(net: &Network, weight_decay: f32) -> Result<f32, TestProblemError> {
    let squared = net
        .named_parameters()?
        .into_iter()
        .filter(|(name, _)| !name.contains("bias"))
        .map(|(_, p)| p.square_sum())
        .sum::<f32>();
    Ok(weight_decay * 0.5 * squared)
}
