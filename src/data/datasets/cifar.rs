//! CIFAR-10 与 CIFAR-100（二进制版本）
//!
//! 目录布局（`<data_dir>/cifar10` 或其 `cifar-10-batches-bin` 子目录）：
//! `data_batch_1.bin` .. `data_batch_5.bin`、`test_batch.bin`；
//! CIFAR-100 为 `train.bin`、`test.bin`（或 `cifar-100-binary` 子目录）。

use std::path::PathBuf;
use std::sync::Arc;

use crate::data::config::DataSetConfig;
use crate::data::dataset::{DataSet, Splits, make_image_splits};
use crate::data::error::DataError;
use crate::data::source::SampleSource;
use crate::data::transforms::Augmentation;

use super::records::{RecordFormat, load_record_files, locate_dir};

pub const CIFAR10_MEAN: [f32; 3] = [0.491_399_68, 0.482_158_41, 0.446_530_91];
pub const CIFAR10_STD: [f32; 3] = [0.247_032_23, 0.243_485_13, 0.261_587_84];
pub const CIFAR100_MEAN: [f32; 3] = [0.507_075_16, 0.486_548_87, 0.440_917_84];
pub const CIFAR100_STD: [f32; 3] = [0.267_334_29, 0.256_438_46, 0.276_150_47];

const DEFAULT_TRAIN_EVAL_SIZE: usize = 10000;

const CIFAR10_TRAIN_FILES: [&str; 5] = [
    "data_batch_1.bin",
    "data_batch_2.bin",
    "data_batch_3.bin",
    "data_batch_4.bin",
    "data_batch_5.bin",
];
const CIFAR100_TRAIN_FILES: [&str; 1] = ["train.bin"];
const TEST_BATCH_FILE: &str = "test_batch.bin";

/// 按训练增强开关选出 (训练变换, 评估变换)
pub(crate) fn image_augmentations(
    config: &DataSetConfig,
    train_augmentation: Augmentation,
    mean: &[f32],
    std: &[f32],
) -> (Augmentation, Augmentation) {
    let eval = Augmentation::normalize_only(mean, std);
    let train = if config.data_augmentation {
        train_augmentation
    } else {
        eval.clone()
    };
    (train, eval)
}

/// 读取记录文件并构造四个加载器，返回 (加载器, train_eval_size)
#[allow(clippy::too_many_arguments)]
pub(crate) fn record_splits(
    name: &str,
    format: &RecordFormat,
    train_paths: &[PathBuf],
    test_paths: &[PathBuf],
    config: &DataSetConfig,
    default_train_eval_size: usize,
    train_augmentation: Augmentation,
    eval_augmentation: Augmentation,
) -> Result<(Splits, usize), DataError> {
    let train: Arc<dyn SampleSource> = Arc::new(load_record_files(train_paths, format)?);
    let test: Arc<dyn SampleSource> = Arc::new(load_record_files(test_paths, format)?);
    let train_eval_size = config.train_eval_size_or(default_train_eval_size);
    let splits = make_image_splits(
        name,
        train.clone(),
        train,
        test,
        config,
        train_eval_size,
        Some(train_augmentation),
        Some(eval_augmentation),
    )?;
    Ok((splits, train_eval_size))
}

#[derive(Debug)]
pub struct Cifar10 {
    train_eval_size: usize,
    splits: Splits,
}

impl Cifar10 {
    pub fn new(config: &DataSetConfig) -> Result<Self, DataError> {
        config.validate()?;
        let mut required = CIFAR10_TRAIN_FILES.to_vec();
        required.push(TEST_BATCH_FILE);
        let dir = locate_dir(&config.data_dir_for("cifar10"), "cifar-10-batches-bin", &required)?;

        let train_paths = CIFAR10_TRAIN_FILES.iter().map(|f| dir.join(f)).collect::<Vec<_>>();
        let (train_aug, eval_aug) = image_augmentations(
            config,
            Augmentation::cifar(&CIFAR10_MEAN, &CIFAR10_STD),
            &CIFAR10_MEAN,
            &CIFAR10_STD,
        );
        let (splits, train_eval_size) = record_splits(
            "cifar10",
            &RecordFormat::CIFAR10,
            &train_paths,
            &[dir.join(TEST_BATCH_FILE)],
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

impl DataSet for Cifar10 {
    fn name(&self) -> &'static str {
        "cifar10"
    }

    fn splits(&self) -> &Splits {
        &self.splits
    }

    fn train_eval_size(&self) -> usize {
        self.train_eval_size
    }

    fn num_classes(&self) -> Option<usize> {
        Some(RecordFormat::CIFAR10.num_classes)
    }
}

#[derive(Debug)]
pub struct Cifar100 {
    train_eval_size: usize,
    splits: Splits,
}

impl Cifar100 {
    pub fn new(config: &DataSetConfig) -> Result<Self, DataError> {
        config.validate()?;
        let dir = locate_dir(
            &config.data_dir_for("cifar100"),
            "cifar-100-binary",
            &[CIFAR100_TRAIN_FILES[0], "test.bin"],
        )?;

        let (train_aug, eval_aug) = image_augmentations(
            config,
            Augmentation::cifar(&CIFAR100_MEAN, &CIFAR100_STD),
            &CIFAR100_MEAN,
            &CIFAR100_STD,
        );
        let (splits, train_eval_size) = record_splits(
            "cifar100",
            &RecordFormat::CIFAR100,
            &[dir.join(CIFAR100_TRAIN_FILES[0])],
            &[dir.join("test.bin")],
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

impl DataSet for Cifar100 {
    fn name(&self) -> &'static str {
        "cifar100"
    }

    fn splits(&self) -> &Splits {
        &self.splits
    }

    fn train_eval_size(&self) -> usize {
        self.train_eval_size
    }

    fn num_classes(&self) -> Option<usize> {
        Some(RecordFormat::CIFAR100.num_classes)
    }
}
