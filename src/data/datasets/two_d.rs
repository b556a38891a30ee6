//! 二维测试函数（Rosenbrock、Beale、Branin 等）的数据
//!
//! 训练样本是一对独立的 N(0, noise_level²) 噪声 (x, y)，分别作为特征与标签；
//! 测试集全为零，即在无噪声的原函数上评估。

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

#[derive(Debug)]
pub struct TwoD {
    train_size: usize,
    splits: Splits,
}

impl TwoD {
    pub fn new(config: &DataSetConfig) -> Result<Self, DataError> {
        config.validate()?;
        let params = &config.two_d;
        if config.batch_size > params.train_size {
            return Err(DataError::InvalidConfig(format!(
                "two_d: batch_size ({}) 不能大于 train_size ({})",
                config.batch_size, params.train_size
            )));
        }

        let mut rng = StdRng::seed_from_u64(TRAIN_DATA_SEED);
        let x = Tensor::new_normal_with_rng(0.0, params.noise_level, &[params.train_size, 1], &mut rng);
        let y = Tensor::new_normal_with_rng(0.0, params.noise_level, &[params.train_size, 1], &mut rng);
        let train = Arc::new(TensorDataset::new(x, y));
        let test = Arc::new(TensorDataset::new(
            Tensor::zeros(&[params.train_size, 1]),
            Tensor::zeros(&[params.train_size, 1]),
        ));

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
            train_size: params.train_size,
            splits,
        })
    }
}

impl DataSet for TwoD {
    fn name(&self) -> &'static str {
        "two_d"
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
