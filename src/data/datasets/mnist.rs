//! MNIST 手写数字数据集
//!
//! 60000 张训练图像、10000 张测试图像，28x28 灰度，10 类。
//! 文件缺失且 `download = true` 时从镜像下载 .gz 并校验 MD5。

use crate::data::config::DataSetConfig;
use crate::data::dataset::{DataSet, Splits};
use crate::data::error::DataError;

use super::idx::{self, IdxSource};

pub const MNIST_SOURCE: IdxSource = IdxSource {
    base_url: "https://ossci-datasets.s3.amazonaws.com/mnist/",
    files: [
        ("train-images-idx3-ubyte", "f68b3c2dcbeaaa9fbdd348bbdeb94873"),
        ("train-labels-idx1-ubyte", "d53e105ee54ea40749a09fcbcd1e9432"),
        ("t10k-images-idx3-ubyte", "9fb629c4189551a2d022fa330f9573f3"),
        ("t10k-labels-idx1-ubyte", "ec29112dd5afa0611ce80d1b7f02629c"),
    ],
    num_classes: 10,
};

const DEFAULT_TRAIN_EVAL_SIZE: usize = 10000;

#[derive(Debug)]
pub struct Mnist {
    train_eval_size: usize,
    splits: Splits,
}

impl Mnist {
    pub fn new(config: &DataSetConfig) -> Result<Self, DataError> {
        let (splits, train_eval_size) =
            idx::load_splits("mnist", &MNIST_SOURCE, config, DEFAULT_TRAIN_EVAL_SIZE)?;
        Ok(Self {
            train_eval_size,
            splits,
        })
    }
}

impl DataSet for Mnist {
    fn name(&self) -> &'static str {
        "mnist"
    }

    fn splits(&self) -> &Splits {
        &self.splits
    }

    fn train_eval_size(&self) -> usize {
        self.train_eval_size
    }

    fn num_classes(&self) -> Option<usize> {
        Some(MNIST_SOURCE.num_classes)
    }
}
