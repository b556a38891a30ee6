//! Fashion-MNIST 服饰图像数据集，文件格式与 MNIST 完全相同

use crate::data::config::DataSetConfig;
use crate::data::dataset::{DataSet, Splits};
use crate::data::error::DataError;

use super::idx::{self, IdxSource};

pub const FMNIST_SOURCE: IdxSource = IdxSource {
    base_url: "http://fashion-mnist.s3-website.eu-central-1.amazonaws.com/",
    files: [
        ("train-images-idx3-ubyte", "8d4fb7e6c68d591d4c3dfef9ec88bf0d"),
        ("train-labels-idx1-ubyte", "25c81989df183df01b3e8a0aad5dffbe"),
        ("t10k-images-idx3-ubyte", "bef4ecab320f06d8554ea6380940ec79"),
        ("t10k-labels-idx1-ubyte", "bb300cfdad3c16e7a12a480ee83cd310"),
    ],
    num_classes: 10,
};

const DEFAULT_TRAIN_EVAL_SIZE: usize = 10000;

#[derive(Debug)]
pub struct Fmnist {
    train_eval_size: usize,
    splits: Splits,
}

impl Fmnist {
    pub fn new(config: &DataSetConfig) -> Result<Self, DataError> {
        let (splits, train_eval_size) =
            idx::load_splits("fmnist", &FMNIST_SOURCE, config, DEFAULT_TRAIN_EVAL_SIZE)?;
        Ok(Self {
            train_eval_size,
            splits,
        })
    }
}

impl DataSet for Fmnist {
    fn name(&self) -> &'static str {
        "fmnist"
    }

    fn splits(&self) -> &Splits {
        &self.splits
    }

    fn train_eval_size(&self) -> usize {
        self.train_eval_size
    }

    fn num_classes(&self) -> Option<usize> {
        Some(FMNIST_SOURCE.num_classes)
    }
}
