//! DataSet 抽象
//!
//! 每个数据集都提供四个加载器：
//! - `train`：训练用，打乱并丢弃不完整批次
//! - `train_eval`：从训练数据中抽取的固定大小子集，用于评估训练集上的表现
//! - `valid`：从训练划分中预留出的验证集
//! - `test`：测试集

use std::sync::Arc;

use enum_dispatch::enum_dispatch;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::info;

use super::config::DataSetConfig;
use super::dataloader::DataLoader;
use super::datasets::{Cifar10, Cifar100, Fmnist, Imagenet, Mnist, Quadratic, Svhn, Tolstoi, TwoD};
use super::error::DataError;
use super::sampler::Sampler;
use super::source::SampleSource;
use super::transforms::Augmentation;

/// 一个数据集的四个加载器
#[derive(Debug)]
pub struct Splits {
    pub train: DataLoader,
    pub train_eval: DataLoader,
    pub valid: DataLoader,
    pub test: DataLoader,
}

/// 所有数据集的公共接口
#[enum_dispatch]
pub trait DataSet {
    /// 注册名，如 `"cifar10"`
    fn name(&self) -> &'static str;

    fn splits(&self) -> &Splits;

    /// 用于评估训练集表现的样本数（同时也是验证集大小）
    fn train_eval_size(&self) -> usize;

    /// 分类任务的类别数（字符级任务为词表大小），非分类任务为 None
    fn num_classes(&self) -> Option<usize>;

    fn batch_size(&self) -> usize {
        self.splits().train.batch_size()
    }

    fn train_loader(&self) -> &DataLoader {
        &self.splits().train
    }

    fn train_eval_loader(&self) -> &DataLoader {
        &self.splits().train_eval
    }

    fn valid_loader(&self) -> &DataLoader {
        &self.splits().valid
    }

    fn test_loader(&self) -> &DataLoader {
        &self.splits().test
    }
}

/// 全部已注册数据集，静态分发
#[enum_dispatch(DataSet)]
#[derive(Debug)]
pub enum DataSets {
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

/// 数据集概况，供命令行展示或写入日志
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSetSummary {
    pub name: String,
    pub batch_size: usize,
    pub train_eval_size: usize,
    pub num_classes: Option<usize>,
    pub sample_shape: Vec<usize>,
    pub label_shape: Vec<usize>,
    /// (样本数, 批次数)，顺序为 train、train_eval、valid、test
    pub train: (usize, usize),
    pub train_eval: (usize, usize),
    pub valid: (usize, usize),
    pub test: (usize, usize),
}

pub fn summarize<D: DataSet + ?Sized>(data: &D) -> DataSetSummary {
    let counts = |loader: &DataLoader| (loader.len(), loader.num_batches());
    let source = data.train_loader().source();
    DataSetSummary {
        name: data.name().to_string(),
        batch_size: data.batch_size(),
        train_eval_size: data.train_eval_size(),
        num_classes: data.num_classes(),
        sample_shape: source.sample_shape(),
        label_shape: source.label_shape(),
        train: counts(data.train_loader()),
        train_eval: counts(data.train_eval_loader()),
        valid: counts(data.valid_loader()),
        test: counts(data.test_loader()),
    }
}

/// 图像类数据集的划分方式：
/// - 用 `config.seed` 打乱训练划分的下标，前 `train_eval_size` 个作为验证集，其余用于训练；
/// - train_eval 从训练下标中无放回抽取 `train_eval_size` 个（不足则全取）；
/// - 训练相关加载器使用 `train_augmentation`，验证、测试使用 `eval_augmentation`。
///
/// `valid_source` 与 `train_source` 的样本必须一一对应（同一份数据，仅取样变换不同）。
#[allow(clippy::too_many_arguments)]
pub(crate) fn make_image_splits(
    name: &str,
    train_source: Arc<dyn SampleSource>,
    valid_source: Arc<dyn SampleSource>,
    test_source: Arc<dyn SampleSource>,
    config: &DataSetConfig,
    train_eval_size: usize,
    train_augmentation: Option<Augmentation>,
    eval_augmentation: Option<Augmentation>,
) -> Result<Splits, DataError> {
    config.validate()?;
    let n = train_source.len();
    if valid_source.len() != n {
        return Err(DataError::InvalidConfig(format!(
            "{name}: 验证来源样本数 {} 与训练来源 {n} 不一致",
            valid_source.len()
        )));
    }
    if train_eval_size >= n {
        return Err(DataError::InvalidConfig(format!(
            "{name}: train_eval_size ({train_eval_size}) 必须小于训练划分的样本数 ({n})"
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);
    let (valid_indices, train_indices) = indices.split_at(train_eval_size);
    let train_eval_indices = train_indices
        .choose_multiple(&mut rng, train_eval_size.min(train_indices.len()))
        .copied()
        .collect::<Vec<_>>();

    let with_augmentation = |loader: DataLoader, augmentation: &Option<Augmentation>| {
        match augmentation {
            Some(a) => loader.augment(a.clone()),
            None => loader,
        }
    };

    let train = DataLoader::new(train_source.clone(), config.batch_size)?
        .sampler(Sampler::SubsetRandom(train_indices.to_vec()))?
        .drop_last(true)
        .seed(config.seed);
    let train_eval = DataLoader::new(train_source, config.batch_size)?
        .sampler(Sampler::SubsetRandom(train_eval_indices))?
        .drop_last(true)
        .seed(config.seed.wrapping_add(1));
    let valid = DataLoader::new(valid_source, config.batch_size)?
        .sampler(Sampler::SubsetSequential(valid_indices.to_vec()))?
        .seed(config.seed.wrapping_add(2));
    let test = DataLoader::new(test_source, config.batch_size)?.seed(config.seed.wrapping_add(3));

    let splits = Splits {
        train: with_augmentation(train, &train_augmentation),
        train_eval: with_augmentation(train_eval, &train_augmentation),
        valid: with_augmentation(valid, &eval_augmentation),
        test: with_augmentation(test, &eval_augmentation),
    };
    info!(
        dataset = name,
        train = splits.train.len(),
        valid = splits.valid.len(),
        test = splits.test.len(),
        "数据集划分完成"
    );
    Ok(splits)
}
