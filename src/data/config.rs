//! 数据集配置
//!
//! 所有数据集共用一份 [`DataSetConfig`]，可以直接构造，也可以从 TOML 读取：
//!
//! ```toml
//! batch_size = 128
//! data_dir = "/data/optbench"
//! download = true
//!
//! [quadratic]
//! dim = 100
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::datasets::default_data_dir;
use super::error::DataError;

/// 数据集的公共配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSetConfig {
    /// 每个批次的样本数
    pub batch_size: usize,
    /// 数据根目录，各数据集位于其下同名子目录；None 则使用默认缓存目录
    pub data_dir: Option<PathBuf>,
    /// 缺失文件时是否允许下载（仅 mnist、fmnist 支持）
    pub download: bool,
    /// 用于训练集打乱、验证集划分的随机种子
    pub seed: u64,
    /// 是否对训练集做数据增强（仅 cifar10、cifar100、svhn、imagenet 有效）
    pub data_augmentation: bool,
    /// 覆盖数据集默认的 train_eval_size
    pub train_eval_size: Option<usize>,
    pub quadratic: QuadraticConfig,
    pub two_d: TwoDConfig,
    pub tolstoi: TolstoiConfig,
}

impl Default for DataSetConfig {
    fn default() -> Self {
        Self {
            batch_size: 128,
            data_dir: None,
            download: false,
            seed: 42,
            data_augmentation: true,
            train_eval_size: None,
            quadratic: QuadraticConfig::default(),
            two_d: TwoDConfig::default(),
            tolstoi: TolstoiConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadraticConfig {
    pub dim: usize,
    pub train_size: usize,
    pub noise_level: f32,
}

impl Default for QuadraticConfig {
    fn default() -> Self {
        Self {
            dim: 100,
            train_size: 1000,
            noise_level: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwoDConfig {
    pub train_size: usize,
    pub noise_level: f32,
}

impl Default for TwoDConfig {
    fn default() -> Self {
        Self {
            train_size: 10000,
            noise_level: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TolstoiConfig {
    pub seq_length: usize,
}

impl Default for TolstoiConfig {
    fn default() -> Self {
        Self { seq_length: 50 }
    }
}

impl DataSetConfig {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Self::default()
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(data_dir.into());
        self
    }

    pub fn with_download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_data_augmentation(mut self, data_augmentation: bool) -> Self {
        self.data_augmentation = data_augmentation;
        self
    }

    pub fn with_train_eval_size(mut self, train_eval_size: usize) -> Self {
        self.train_eval_size = Some(train_eval_size);
        self
    }

    /// 从 TOML 文本解析，解析后立即校验
    pub fn from_toml_str(text: &str) -> Result<Self, DataError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            return Err(DataError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.batch_size == 0 {
            return Err(DataError::InvalidConfig("batch_size 必须大于 0".to_string()));
        }
        if self.train_eval_size == Some(0) {
            return Err(DataError::InvalidConfig(
                "train_eval_size 必须大于 0".to_string(),
            ));
        }
        if self.quadratic.dim == 0 || self.quadratic.train_size == 0 {
            return Err(DataError::InvalidConfig(
                "quadratic 的 dim 与 train_size 必须大于 0".to_string(),
            ));
        }
        if self.two_d.train_size == 0 {
            return Err(DataError::InvalidConfig(
                "two_d 的 train_size 必须大于 0".to_string(),
            ));
        }
        if self.quadratic.noise_level < 0.0 || self.two_d.noise_level < 0.0 {
            return Err(DataError::InvalidConfig(
                "noise_level 不能为负数".to_string(),
            ));
        }
        if self.tolstoi.seq_length == 0 {
            return Err(DataError::InvalidConfig(
                "tolstoi 的 seq_length 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }

    /// 某个数据集所在的目录：`<data_dir>/<name>`
    pub fn data_dir_for(&self, name: &str) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(default_data_dir)
            .join(name)
    }

    /// 取配置覆盖值，否则使用数据集默认的 train_eval_size
    pub fn train_eval_size_or(&self, default: usize) -> usize {
        self.train_eval_size.unwrap_or(default)
    }
}
