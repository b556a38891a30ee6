//! SVHN 街景门牌数字
//!
//! 预先转换成 CIFAR-10 风格的二进制记录：训练文件 `data_batch_*.bin`（按文件名排序读取），
//! 测试文件 `test_batch.bin`。原始标签 10 表示数字 0。
//! 训练增强与 CIFAR 相同，但不做水平翻转。

use std::path::{Path, PathBuf};

use crate::data::config::DataSetConfig;
use crate::data::dataset::{DataSet, Splits};
use crate::data::error::DataError;
use crate::data::transforms::Augmentation;

use super::cifar::{image_augmentations, record_splits};
use super::records::RecordFormat;

pub const SVHN_MEAN: [f32; 3] = [0.437_682_1, 0.443_769_7, 0.472_804_42];
pub const SVHN_STD: [f32; 3] = [0.198_030_12, 0.201_015_62, 0.197_036_14];

const DEFAULT_TRAIN_EVAL_SIZE: usize = 26032;
const TEST_BATCH_FILE: &str = "test_batch.bin";

#[derive(Debug)]
pub struct Svhn {
    train_eval_size: usize,
    splits: Splits,
}

impl Svhn {
    pub fn new(config: &DataSetConfig) -> Result<Self, DataError> {
        config.validate()?;
        let dir = config.data_dir_for("svhn");
        let train_paths = train_files(&dir)?;
        let test_path = dir.join(TEST_BATCH_FILE);
        if !test_path.exists() {
            return Err(DataError::FileNotFound(test_path));
        }

        let (train_aug, eval_aug) = image_augmentations(
            config,
            Augmentation::svhn(&SVHN_MEAN, &SVHN_STD),
            &SVHN_MEAN,
            &SVHN_STD,
        );
        let (splits, train_eval_size) = record_splits(
            "svhn",
            &RecordFormat::SVHN,
            &train_paths,
            &[test_path],
            config,
            DEFAULT_TRAIN_EVAL_SIZE,
            train_aug,
            eval_aug,
        )?;
        Ok(Self {
            train_eval_size,
            splits,
        })
    }
}

/// 目录下所有 `data_batch_*.bin`，按文件名排序
fn train_files(dir: &Path) -> Result<Vec<PathBuf>, DataError> {
    if !dir.is_dir() {
        return Err(DataError::FileNotFound(dir.to_path_buf()));
    }
    let mut files = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("data_batch_") && n.ends_with(".bin"))
        })
        .collect::<Vec<_>>();
    if files.is_empty() {
        return Err(DataError::FileNotFound(dir.join("data_batch_0.bin")));
    }
    files.sort();
    Ok(files)
}

impl DataSet for Svhn {
    fn name(&self) -> &'static str {
        "svhn"
    }

    fn splits(&self) -> &Splits {
        &self.splits
    }

    fn train_eval_size(&self) -> usize {
        self.train_eval_size
    }

    fn num_classes(&self) -> Option<usize> {
        Some(RecordFormat::SVHN.num_classes)
    }
}
