//! 《战争与和平》字符级语言模型数据
//!
//! `<data_dir>/tolstoi/train.npy`、`test.npy` 保存整段文本的字符编号（一维整数数组）。
//! 目标序列是输入序列右移一位。批次按"连续行"排布：第 k 个批次的第 r 行
//! 紧接着第 k-1 个批次的第 r 行继续文本，因此所有加载器都按顺序取样、不打乱。

use std::path::Path;
use std::sync::Arc;

use ndarray::Array1;
use ndarray_npy::read_npy;
use tracing::{debug, warn};

use crate::data::config::DataSetConfig;
use crate::data::dataloader::DataLoader;
use crate::data::dataset::{DataSet, Splits};
use crate::data::error::DataError;
use crate::data::source::TensorDataset;
use crate::tensor::Tensor;

pub const TOLSTOI_VOCAB_SIZE: usize = 83;
const DEFAULT_TRAIN_EVAL_SIZE: usize = 653_237;

#[derive(Debug)]
pub struct Tolstoi {
    seq_length: usize,
    train_eval_size: usize,
    splits: Splits,
}

impl Tolstoi {
    pub fn new(config: &DataSetConfig) -> Result<Self, DataError> {
        config.validate()?;
        let dir = config.data_dir_for("tolstoi");
        let train = read_tokens(&dir.join("train.npy"))?;
        let test = read_tokens(&dir.join("test.npy"))?;
        Self::from_tokens(&train, &test, config)
    }

    /// 由已载入的字符编号构造：验证集取训练文本末尾的 `train_eval_size` 个字符，
    /// 其余用于训练；train_eval 取剩余训练文本开头的同样多字符
    pub fn from_tokens(train: &[f32], test: &[f32], config: &DataSetConfig) -> Result<Self, DataError> {
        config.validate()?;
        let seq_length = config.tolstoi.seq_length;
        let train_eval_size = config.train_eval_size_or(DEFAULT_TRAIN_EVAL_SIZE);
        if train_eval_size >= train.len() {
            return Err(DataError::InvalidConfig(format!(
                "tolstoi: train_eval_size ({train_eval_size}) 必须小于训练文本长度 ({})",
                train.len()
            )));
        }

        let (train_part, valid_part) = train.split_at(train.len() - train_eval_size);
        let train_eval_part = &train_part[..train_eval_size.min(train_part.len())];

        let make = |tokens: &[f32]| -> Result<DataLoader, DataError> {
            let source = batch_tokens(tokens, config.batch_size, seq_length)?;
            DataLoader::new(Arc::new(source), config.batch_size)
        };
        let splits = Splits {
            train: make(train_part)?,
            train_eval: make(train_eval_part)?,
            valid: make(valid_part)?,
            test: make(test)?,
        };
        debug!(
            train = train_part.len(),
            valid = valid_part.len(),
            test = test.len(),
            "tolstoi 文本切分完成"
        );

        Ok(Self {
            seq_length,
            train_eval_size,
            splits,
        })
    }

    pub fn seq_length(&self) -> usize {
        self.seq_length
    }
}

impl DataSet for Tolstoi {
    fn name(&self) -> &'static str {
        "tolstoi"
    }

    fn splits(&self) -> &Splits {
        &self.splits
    }

    fn train_eval_size(&self) -> usize {
        self.train_eval_size
    }

    fn num_classes(&self) -> Option<usize> {
        Some(TOLSTOI_VOCAB_SIZE)
    }
}

/// 读取一维整数 npy（先按 i32，失败再按 i64），转换为 f32 编号
pub fn read_tokens(path: &Path) -> Result<Vec<f32>, DataError> {
    if !path.exists() {
        return Err(DataError::FileNotFound(path.to_path_buf()));
    }
    match read_npy::<_, Array1<i32>>(path) {
        Ok(arr) => Ok(arr.iter().map(|&v| v as f32).collect()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "按 i32 读取失败，改按 i64 读取");
            let arr: Array1<i64> = read_npy(path)?;
            Ok(arr.iter().map(|&v| v as f32).collect())
        }
    }
}

/// 把一段字符编号排成语言模型的批次
///
/// 设 `num_batches = (n - 1) / (batch_size * seq_length)`，输入取前 `num_batches*batch_size*seq_length`
/// 个字符，目标取右移一位的同样多字符；二者都视作 `[batch_size, num_batches*seq_length]`
/// 的矩阵，再按宽度 `seq_length` 切成列块。返回的数据集按批次顺序存放，
/// 用顺序取样、批大小 `batch_size` 的加载器读取时，第 k 个批次就是第 k 个列块。
pub fn batch_tokens(tokens: &[f32], batch_size: usize, seq_length: usize) -> Result<TensorDataset, DataError> {
    let block = batch_size * seq_length;
    let num_batches = tokens.len().saturating_sub(1) / block.max(1);
    if num_batches == 0 {
        return Err(DataError::InvalidConfig(format!(
            "文本只有 {} 个字符，不足以构成一个 {batch_size}x{seq_length} 的批次",
            tokens.len()
        )));
    }

    let used = num_batches * block;
    let x = &tokens[..used];
    let y = &tokens[1..used + 1];
    let row_len = num_batches * seq_length;

    let mut features = Vec::with_capacity(used);
    let mut labels = Vec::with_capacity(used);
    for k in 0..num_batches {
        for r in 0..batch_size {
            let start = r * row_len + k * seq_length;
            features.extend_from_slice(&x[start..start + seq_length]);
            labels.extend_from_slice(&y[start..start + seq_length]);
        }
    }

    let rows = num_batches * batch_size;
    Ok(TensorDataset::new(
        Tensor::from_vec(features, &[rows, seq_length]),
        Tensor::from_vec(labels, &[rows, seq_length]),
    ))
}
