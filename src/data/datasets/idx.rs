//! IDX 二进制格式（MNIST、Fashion-MNIST 共用）
//!
//! 支持：
//! - IDX 二进制格式解析（支持 .gz 压缩）
//! - 像素归一化 (0-255 → 0-1)
//! - 标签 one-hot 编码
//! - 可选自动下载并校验 MD5

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::data::config::DataSetConfig;
use crate::data::dataset::{Splits, make_image_splits};
use crate::data::download;
use crate::data::error::DataError;
use crate::data::source::{SampleSource, TensorDataset};
use crate::data::transforms::{normalize_pixels, one_hot};
use crate::tensor::Tensor;

const IMAGES_MAGIC: u32 = 2051;
const LABELS_MAGIC: u32 = 2049;

/// 一个 IDX 数据集的下载信息
#[derive(Debug, Clone, Copy)]
pub struct IdxSource {
    pub base_url: &'static str,
    /// (不含 .gz 的文件名, .gz 文件的 MD5)，顺序为训练图像、训练标签、测试图像、测试标签
    pub files: [(&'static str, &'static str); 4],
    pub num_classes: usize,
}

impl IdxSource {
    fn file_names(&self, train: bool) -> ((&'static str, &'static str), (&'static str, &'static str)) {
        if train {
            (self.files[0], self.files[1])
        } else {
            (self.files[2], self.files[3])
        }
    }
}

/// 载入一个划分，返回图像 `[N, 1, rows, cols]` 与 one-hot 标签 `[N, num_classes]`
pub fn load_split(
    data_dir: &Path,
    source: &IdxSource,
    train: bool,
    download: bool,
) -> Result<TensorDataset, DataError> {
    let ((images_file, images_md5), (labels_file, labels_md5)) = source.file_names(train);

    let images_path = ensure_file(data_dir, source, images_file, images_md5, download)?;
    let labels_path = ensure_file(data_dir, source, labels_file, labels_md5, download)?;

    let (images_raw, rows, cols) = parse_idx_images(&images_path)?;
    let labels_raw = parse_idx_labels(&labels_path)?;

    let len = labels_raw.shape()[0];
    if images_raw.shape()[0] != len {
        return Err(DataError::FormatError(format!(
            "图像数 {} 与标签数 {len} 不一致",
            images_raw.shape()[0]
        )));
    }
    debug!(path = %images_path.display(), len, rows, cols, "已解析 IDX 文件");

    // 归一化像素值 [0, 255] -> [0, 1]，并重塑为 [N, 1, rows, cols] (NCHW 格式)
    let images = normalize_pixels(&images_raw).reshape(&[len, 1, rows, cols]);
    if let Some(bad) = labels_raw.as_slice().iter().find(|&&l| l as usize >= source.num_classes) {
        return Err(DataError::FormatError(format!(
            "标签 {bad} 超出类别数 {}",
            source.num_classes
        )));
    }
    let labels = one_hot(&labels_raw, source.num_classes);

    Ok(TensorDataset::new(images, labels))
}

/// 确保文件存在，必要时下载
fn ensure_file(
    data_dir: &Path,
    source: &IdxSource,
    base_name: &str,
    md5: &str,
    download: bool,
) -> Result<PathBuf, DataError> {
    // 优先检查解压后的文件
    let uncompressed_path = data_dir.join(base_name);
    if uncompressed_path.exists() {
        return Ok(uncompressed_path);
    }

    // 检查 .gz 文件
    let gz_name = format!("{base_name}.gz");
    let gz_path = data_dir.join(&gz_name);
    if gz_path.exists() {
        return Ok(gz_path);
    }

    // 文件不存在，尝试下载
    if download {
        let url = format!("{}{}", source.base_url, gz_name);
        download::download_file(&url, &gz_path, Some(md5))?;
        Ok(gz_path)
    } else {
        Err(DataError::FileNotFound(uncompressed_path))
    }
}

fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>, DataError> {
    let file = File::open(path).map_err(|_| DataError::FileNotFound(path.to_path_buf()))?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(GzDecoder::new(BufReader::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn read_be_u32(header: &[u8], offset: usize) -> usize {
    u32::from_be_bytes([
        header[offset],
        header[offset + 1],
        header[offset + 2],
        header[offset + 3],
    ]) as usize
}

/// 读取头部声明的 `len` 个字节
///
/// 缓冲区随实际读到的数据增长，不按头部声明的长度预先分配。
fn read_payload(reader: Box<dyn Read>, len: usize, what: &str) -> Result<Vec<u8>, DataError> {
    let mut payload = Vec::new();
    reader
        .take(len as u64)
        .read_to_end(&mut payload)
        .map_err(|e| DataError::FormatError(format!("读取{what}数据失败: {e}")))?;
    if payload.len() != len {
        return Err(DataError::FormatError(format!(
            "{what}数据不完整: 头部声明 {len} 字节，实际 {} 字节",
            payload.len()
        )));
    }
    Ok(payload)
}

/// 解析 IDX 图像文件
///
/// IDX 格式：
/// - [0-3] magic number (0x00000803 = 2051)
/// - [4-7] number of images
/// - [8-11] number of rows
/// - [12-15] number of columns
/// - [16+] pixel data (unsigned byte)
///
/// 返回 ([N, rows*cols] 的原始像素, rows, cols)
pub fn parse_idx_images(path: &Path) -> Result<(Tensor, usize, usize), DataError> {
    let mut reader = open_maybe_gz(path)?;
    let mut header = [0u8; 16];
    reader
        .read_exact(&mut header)
        .map_err(|e| DataError::FormatError(format!("读取头部失败: {e}")))?;

    let magic = read_be_u32(&header, 0) as u32;
    if magic != IMAGES_MAGIC {
        return Err(DataError::FormatError(format!(
            "无效的 magic number: {magic} (期望 {IMAGES_MAGIC})"
        )));
    }

    let num_images = read_be_u32(&header, 4);
    let num_rows = read_be_u32(&header, 8);
    let num_cols = read_be_u32(&header, 12);
    if num_rows == 0 || num_cols == 0 {
        return Err(DataError::FormatError(format!(
            "无效的图像尺寸: {num_rows}x{num_cols}"
        )));
    }

    let total = num_images
        .checked_mul(num_rows)
        .and_then(|n| n.checked_mul(num_cols))
        .ok_or_else(|| {
            DataError::FormatError(format!(
                "图像头部尺寸溢出: {num_images}x{num_rows}x{num_cols}"
            ))
        })?;
    let pixels = read_payload(reader, total, "像素")?;

    let data: Vec<f32> = pixels.into_iter().map(f32::from).collect();
    Ok((
        Tensor::from_vec(data, &[num_images, num_rows * num_cols]),
        num_rows,
        num_cols,
    ))
}

/// 解析 IDX 标签文件
///
/// IDX 格式：
/// - [0-3] magic number (0x00000801 = 2049)
/// - [4-7] number of labels
/// - [8+] label data (unsigned byte)
pub fn parse_idx_labels(path: &Path) -> Result<Tensor, DataError> {
    let mut reader = open_maybe_gz(path)?;
    let mut header = [0u8; 8];
    reader
        .read_exact(&mut header)
        .map_err(|e| DataError::FormatError(format!("读取头部失败: {e}")))?;

    let magic = read_be_u32(&header, 0) as u32;
    if magic != LABELS_MAGIC {
        return Err(DataError::FormatError(format!(
            "无效的 magic number: {magic} (期望 {LABELS_MAGIC})"
        )));
    }

    let num_labels = read_be_u32(&header, 4);
    let labels = read_payload(reader, num_labels, "标签")?;

    let data: Vec<f32> = labels.into_iter().map(f32::from).collect();
    Ok(Tensor::from_vec(data, &[num_labels]))
}

/// 载入训练、测试两个划分并按图像数据集的规则切分出四个加载器
///
/// 返回 (四个加载器, 实际使用的 train_eval_size)
pub(crate) fn load_splits(
    name: &str,
    source: &IdxSource,
    config: &DataSetConfig,
    default_train_eval_size: usize,
) -> Result<(Splits, usize), DataError> {
    config.validate()?;
    let data_dir = config.data_dir_for(name);
    let train: Arc<dyn SampleSource> =
        Arc::new(load_split(&data_dir, source, true, config.download)?);
    let test: Arc<dyn SampleSource> =
        Arc::new(load_split(&data_dir, source, false, config.download)?);

    let train_eval_size = config.train_eval_size_or(default_train_eval_size);
    let splits = make_image_splits(
        name,
        train.clone(),
        train,
        test,
        config,
        train_eval_size,
        None,
        None,
    )?;
    Ok((splits, train_eval_size))
}
