//! 数据加载模块
//!
//! 提供优化器基准测试所用的全部数据集、数据变换和批处理功能。
//!
//! # 主要组件
//!
//! - [`DataSet`]: 所有数据集的公共接口（train / train_eval / valid / test 四个加载器）
//! - [`DataSetKind`]: 已注册数据集的名称与构造
//! - [`DataLoader`]: `PyTorch` 风格的数据批量加载器
//! - [`TensorDataset`]: 持有特征和标签的内存数据集
//! - [`transforms`]: 数据变换函数（归一化、one-hot、图像增强等）
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use optbench::data::{DataSet, DataSetConfig, DataSetKind};
//!
//! let config = DataSetConfig::new(128).with_download(true);
//! let mnist = DataSetKind::Mnist.build(&config)?;
//! for batch in mnist.train_loader().iter() {
//!     let (x, y) = batch?;
//!     // ...
//! }
//! ```

pub mod config;
mod dataloader;
mod dataset;
pub mod datasets;
pub mod download;
pub mod error;
mod registry;
mod sampler;
mod source;
pub mod transforms;

#[cfg(test)]
mod tests;

pub use config::DataSetConfig;
pub use dataloader::{DataLoader, DataLoaderIterator};
pub use dataset::{DataSet, DataSetSummary, DataSets, Splits, summarize};
pub use datasets::default_data_dir;
pub use error::DataError;
pub use registry::DataSetKind;
pub use sampler::Sampler;
pub use source::{SampleSource, TensorDataset};
pub use transforms::Augmentation;
