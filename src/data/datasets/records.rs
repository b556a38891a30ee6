//! 定长二进制记录格式（CIFAR-10、CIFAR-100、SVHN 共用）
//!
//! 每条记录 = 若干字节标签 + C*H*W 字节像素（按通道平面排列，CHW）。
//! - CIFAR-10：1 字节标签
//! - CIFAR-100：1 字节粗类别 + 1 字节细类别，使用细类别
//! - SVHN：与 CIFAR-10 相同，但数字 0 的标签记为 10

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::data::error::DataError;
use crate::data::source::TensorDataset;
use crate::data::transforms::{normalize_pixels, one_hot_from_indices};
use crate::tensor::Tensor;

/// 一种记录格式的描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFormat {
    /// 每条记录开头的标签字节数
    pub label_bytes: usize,
    /// 使用第几个标签字节
    pub label_index: usize,
    pub num_classes: usize,
    /// (C, H, W)
    pub image_shape: [usize; 3],
    /// 等于该值的原始标签被视为类别 0（SVHN 的 10）
    pub wrap_label: Option<u8>,
}

impl RecordFormat {
    pub const CIFAR10: RecordFormat = RecordFormat {
        label_bytes: 1,
        label_index: 0,
        num_classes: 10,
        image_shape: [3, 32, 32],
        wrap_label: None,
    };

    pub const CIFAR100: RecordFormat = RecordFormat {
        label_bytes: 2,
        label_index: 1,
        num_classes: 100,
        image_shape: [3, 32, 32],
        wrap_label: None,
    };

    pub const SVHN: RecordFormat = RecordFormat {
        wrap_label: Some(10),
        ..RecordFormat::CIFAR10
    };

    pub fn image_bytes(&self) -> usize {
        self.image_shape.iter().product()
    }

    pub fn record_bytes(&self) -> usize {
        self.label_bytes + self.image_bytes()
    }

    fn class_of(&self, raw: u8) -> Result<usize, DataError> {
        if self.wrap_label == Some(raw) {
            return Ok(0);
        }
        let class = raw as usize;
        if class >= self.num_classes {
            return Err(DataError::FormatError(format!(
                "标签 {class} 超出类别数 {}",
                self.num_classes
            )));
        }
        Ok(class)
    }
}

/// 解析一段记录字节，返回 (原始像素, 类别)
pub fn parse_records(bytes: &[u8], format: &RecordFormat) -> Result<(Vec<u8>, Vec<usize>), DataError> {
    let record_bytes = format.record_bytes();
    if bytes.len() % record_bytes != 0 {
        return Err(DataError::FormatError(format!(
            "数据长度 {} 不是记录长度 {record_bytes} 的整数倍",
            bytes.len()
        )));
    }

    let count = bytes.len() / record_bytes;
    let mut pixels = Vec::with_capacity(count * format.image_bytes());
    let mut classes = Vec::with_capacity(count);
    for record in bytes.chunks_exact(record_bytes) {
        classes.push(format.class_of(record[format.label_index])?);
        pixels.extend_from_slice(&record[format.label_bytes..]);
    }
    Ok((pixels, classes))
}

/// 依次读取多个记录文件并拼接成一个数据集：
/// 图像 `[N, C, H, W]`，像素归一化到 [0, 1]；标签 one-hot `[N, num_classes]`
pub fn load_record_files(paths: &[PathBuf], format: &RecordFormat) -> Result<TensorDataset, DataError> {
    let mut pixels = Vec::new();
    let mut classes = Vec::new();
    for path in paths {
        let bytes = read_file(path)?;
        let (p, c) = parse_records(&bytes, format)?;
        debug!(path = %path.display(), records = c.len(), "已读取记录文件");
        pixels.extend(p);
        classes.extend(c);
    }
    if classes.is_empty() {
        return Err(DataError::FormatError("记录文件中没有任何样本".to_string()));
    }

    let [c, h, w] = format.image_shape;
    let raw = Tensor::from_vec(
        pixels.into_iter().map(f32::from).collect(),
        &[classes.len(), c, h, w],
    );
    let labels = one_hot_from_indices(&classes, format.num_classes);
    Ok(TensorDataset::new(normalize_pixels(&raw), labels))
}

fn read_file(path: &Path) -> Result<Vec<u8>, DataError> {
    if !path.exists() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read(path)?)
}

/// 在 `data_dir` 或其子目录 `subdir` 下找到包含全部 `files` 的目录
pub fn locate_dir(data_dir: &Path, subdir: &str, files: &[&str]) -> Result<PathBuf, DataError> {
    for dir in [data_dir.to_path_buf(), data_dir.join(subdir)] {
        if files.iter().all(|f| dir.join(f).exists()) {
            return Ok(dir);
        }
    }
    let missing = files
        .iter()
        .map(|f| data_dir.join(f))
        .find(|p| !p.exists())
        .unwrap_or_else(|| data_dir.to_path_buf());
    Err(DataError::FileNotFound(missing))
}
