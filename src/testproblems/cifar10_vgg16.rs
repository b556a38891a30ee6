/*
 * @Description  : CIFAR-10 上的 VGG16
 *
 * - 数据：cifar10（训练集带数据增强）
 * - 网络：VGG16，10 个输出
 * - 损失：交叉熵 + 权重衰减（默认 5e-4）
 */

use tracing::info;

use super::error::TestProblemError;
use super::network::{Network, net_vgg};
use super::testproblem::TestProblem;
use crate::data::{DataSetConfig, DataSetKind, DataSets};

pub const DEFAULT_WEIGHT_DECAY: f32 = 5e-4;

#[derive(Debug)]
pub struct Cifar10Vgg16 {
    weight_decay: f32,
    config: DataSetConfig,
    data: Option<DataSets>,
    net: Option<Network>,
}

impl Cifar10Vgg16 {
    /// 使用默认权重衰减与默认数据配置
    pub fn new(batch_size: usize) -> Self {
        Self::with_config(DataSetConfig::new(batch_size), DEFAULT_WEIGHT_DECAY)
    }

    pub fn with_weight_decay(batch_size: usize, weight_decay: f32) -> Self {
        Self::with_config(DataSetConfig::new(batch_size), weight_decay)
    }

    /// 自定义数据配置（数据目录、种子等）
    pub fn with_config(config: DataSetConfig, weight_decay: f32) -> Self {
        Self {
            weight_decay,
            config,
            data: None,
            net: None,
        }
    }
}

impl TestProblem for Cifar10Vgg16 {
    fn name(&self) -> &'static str {
        "cifar10_vgg16"
    }

    fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    fn weight_decay(&self) -> f32 {
        self.weight_decay
    }

    fn set_up(&mut self) -> Result<(), TestProblemError> {
        let data = DataSetKind::Cifar10.build(&self.config)?;
        let net = net_vgg(10, 16)?;
        info!(
            testproblem = self.name(),
            parameters = net.num_parameters(),
            weight_decay = self.weight_decay,
            "测试问题已就绪"
        );
        self.data = Some(data);
        self.net = Some(net);
        Ok(())
    }

    fn data(&self) -> Result<&DataSets, TestProblemError> {
        self.data.as_ref().ok_or(TestProblemError::NotSetUp(self.name()))
    }

    fn net(&self) -> Result<&Network, TestProblemError> {
        self.net.as_ref().ok_or(TestProblemError::NotSetUp(self.name()))
    }

    fn net_mut(&mut self) -> Result<&mut Network, TestProblemError> {
        let name = self.name();
        self.net.as_mut().ok_or(TestProblemError::NotSetUp(name))
    }
}
