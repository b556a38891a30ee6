//! 内置数据集
//!
//! - 合成数据：quadratic、two_d
//! - 灰度图像：mnist、fmnist（IDX 格式，可自动下载）
//! - 彩色图像：cifar10、cifar100、svhn（定长二进制记录）、imagenet（图像目录）
//! - 字符序列：tolstoi（npy 格式）

use std::path::PathBuf;

mod cifar;
mod fmnist;
pub mod idx;
mod imagenet;
mod mnist;
mod quadratic;
pub mod records;
mod svhn;
mod tolstoi;
mod two_d;

pub use cifar::{Cifar10, Cifar100};
pub use fmnist::Fmnist;
pub use imagenet::{ImageFolder, ImageTransform, Imagenet};
pub use mnist::Mnist;
pub use quadratic::Quadratic;
pub use svhn::Svhn;
pub use tolstoi::{Tolstoi, batch_tokens, read_tokens};
pub use two_d::TwoD;

/// 获取默认数据目录
pub fn default_data_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("optbench")
        .join("datasets")
}
