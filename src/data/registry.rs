//! 数据集注册表：名称 ↔ 类型 ↔ 构造

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::DataSetConfig;
use super::dataset::DataSets;
use super::datasets::{Cifar10, Cifar100, Fmnist, Imagenet, Mnist, Quadratic, Svhn, Tolstoi, TwoD};
use super::error::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSetKind {
    Quadratic,
    TwoD,
    Mnist,
    Fmnist,
    Cifar10,
    Cifar100,
    Svhn,
    Imagenet,
    Tolstoi,
}

impl DataSetKind {
    /// 全部已注册的数据集，顺序即文档目录中的顺序
    pub const ALL: [DataSetKind; 9] = [
        DataSetKind::Quadratic,
        DataSetKind::TwoD,
        DataSetKind::Mnist,
        DataSetKind::Fmnist,
        DataSetKind::Cifar10,
        DataSetKind::Cifar100,
        DataSetKind::Svhn,
        DataSetKind::Imagenet,
        DataSetKind::Tolstoi,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DataSetKind::Quadratic => "quadratic",
            DataSetKind::TwoD => "two_d",
            DataSetKind::Mnist => "mnist",
            DataSetKind::Fmnist => "fmnist",
            DataSetKind::Cifar10 => "cifar10",
            DataSetKind::Cifar100 => "cifar100",
            DataSetKind::Svhn => "svhn",
            DataSetKind::Imagenet => "imagenet",
            DataSetKind::Tolstoi => "tolstoi",
        }
    }

    /// 一句话说明
    pub fn description(self) -> &'static str {
        match self {
            DataSetKind::Quadratic => "高斯噪声构成的 n 维二次型问题数据",
            DataSetKind::TwoD => "二维测试函数的高斯噪声数据，测试集无噪声",
            DataSetKind::Mnist => "MNIST 手写数字，28x28 灰度图，10 类",
            DataSetKind::Fmnist => "Fashion-MNIST 服饰图像，28x28 灰度图，10 类",
            DataSetKind::Cifar10 => "CIFAR-10 彩色图像，32x32，10 类",
            DataSetKind::Cifar100 => "CIFAR-100 彩色图像，32x32，100 类",
            DataSetKind::Svhn => "SVHN 街景门牌数字，32x32，10 类",
            DataSetKind::Imagenet => "ImageNet 彩色图像，224x224，1001 类（含背景类）",
            DataSetKind::Tolstoi => "《战争与和平》字符级序列，词表大小 83",
        }
    }

    /// 按配置构造数据集（会读取磁盘，必要时下载）
    pub fn build(self, config: &DataSetConfig) -> Result<DataSets, DataError> {
        config.validate()?;
        let data = match self {
            DataSetKind::Quadratic => Quadratic::new(config)?.into(),
            DataSetKind::TwoD => TwoD::new(config)?.into(),
            DataSetKind::Mnist => Mnist::new(config)?.into(),
            DataSetKind::Fmnist => Fmnist::new(config)?.into(),
            DataSetKind::Cifar10 => Cifar10::new(config)?.into(),
            DataSetKind::Cifar100 => Cifar100::new(config)?.into(),
            DataSetKind::Svhn => Svhn::new(config)?.into(),
            DataSetKind::Imagenet => Imagenet::new(config)?.into(),
            DataSetKind::Tolstoi => Tolstoi::new(config)?.into(),
        };
        Ok(data)
    }
}

impl fmt::Display for DataSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for DataSetKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| DataError::UnknownDataSet(s.to_string()))
    }
}
