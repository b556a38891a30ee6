//! n 维二次型问题的数据
//!
//! 每个样本是服从 N(0, noise_level²) 的 `dim` 维向量，没有标签。
//! 训练数据固定用种子 42 生成，测试数据固定用种子 43，保证不同运行看到的是同一个问题。
//! 验证集与 train_eval 都直接复用训练数据。

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::data::config::DataSetConfig;
use crate::data::dataloader::DataLoader;
use crate::data::dataset::{DataSet, Splits};
use crate::data::error::DataError;
use crate::data::source::TensorDataset;
use crate::tensor::Tensor;

const TRAIN_DATA_SEED: u64 = 42;
const TEST_DATA_SEED: u64 = 43;

#[derive(Debug)]
pub struct Quadratic {
    dim: usize,
    train_size: usize,
    noise_level: f32,
    splits: Splits,
}

impl Quadratic {
    pub fn new(config: &DataSetConfig) -> Result<Self, DataError> {
        config.validate()?;
        let params = &config.quadratic;
        if config.batch_size > params.train_size {
            return Err(DataError::InvalidConfig(format!(
                "quadratic: batch_size ({}) 不能大于 train_size ({})",
                config.batch_size, params.train_size
            )));
        }

        let train: Arc<TensorDataset> = Arc::new(Self::generate(
            params.train_size,
            params.dim,
            params.noise_level,
            TRAIN_DATA_SEED,
        ));
        let test: Arc<TensorDataset> = Arc::new(Self::generate(
            params.train_size,
            params.dim,
            params.noise_level,
            TEST_DATA_SEED,
        ));

        // 所有加载器都丢弃不完整批次，保证每个批次大小一致
        let make = |source: &Arc<TensorDataset>, shuffle: bool| -> Result<DataLoader, DataError> {
            Ok(DataLoader::new(source.clone(), config.batch_size)?
                .shuffle(shuffle)
                .drop_last(true)
                .seed(config.seed))
        };
        let splits = Splits {
            train: make(&train, true)?,
            train_eval: make(&train, false)?,
            valid: make(&train, false)?,
            test: make(&test, false)?,
        };

        Ok(Self {
            dim: params.dim,
            train_size: params.train_size,
            noise_level: params.noise_level,
            splits,
        })
    }

    /// 生成 `[size, dim]` 的高斯数据与 `[size, 0]` 的空标签
    pub fn generate(size: usize, dim: usize, noise_level: f32, seed: u64) -> TensorDataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let features = Tensor::new_normal_with_rng(0.0, noise_level, &[size, dim], &mut rng);
        TensorDataset::new(features, Tensor::zeros(&[size, 0]))
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn noise_level(&self) -> f32 {
        self.noise_level
    }
}

impl DataSet for Quadratic {
    fn name(&self) -> &'static str {
        "quadratic"
    }

    fn splits(&self) -> &Splits {
        &self.splits
    }

    fn train_eval_size(&self) -> usize {
        self.train_size
    }

    fn num_classes(&self) -> Option<usize> {
        None
    }
}
