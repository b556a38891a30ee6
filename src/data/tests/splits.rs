//! 图像类数据集的划分规则

use std::collections::HashSet;
use std::sync::Arc;

use super::indexed_dataset;
use crate::assert_err;
use crate::data::dataset::make_image_splits;
use crate::data::{DataError, DataLoader, DataSetConfig, SampleSource, Sampler};

fn subset(loader: &DataLoader) -> HashSet<usize> {
    match loader.sampler_ref() {
        Sampler::SubsetRandom(s) | Sampler::SubsetSequential(s) => s.iter().copied().collect(),
        other => panic!("预期子集采样器，实际得到 {other:?}"),
    }
}

#[test]
fn test_image_splits_partition() {
    let source: Arc<dyn SampleSource> = Arc::new(indexed_dataset(20));
    let test: Arc<dyn SampleSource> = Arc::new(indexed_dataset(7));
    let config = DataSetConfig::new(3);
    let splits =
        make_image_splits("fixture", source.clone(), source, test, &config, 5, None, None).unwrap();

    let train = subset(&splits.train);
    let valid = subset(&splits.valid);
    let train_eval = subset(&splits.train_eval);
    assert_eq!(train.len(), 15);
    assert_eq!(valid.len(), 5);
    assert_eq!(train_eval.len(), 5);
    // 验证集与训练集互不相交，train_eval 取自训练集
    assert!(train.is_disjoint(&valid));
    assert!(train_eval.is_subset(&train));
    assert_eq!(train.union(&valid).count(), 20);

    // 训练相关加载器丢弃不完整批次，验证、测试不丢弃
    assert_eq!(splits.train.num_batches(), 5);
    assert_eq!(splits.train_eval.num_batches(), 1);
    assert_eq!(splits.valid.num_batches(), 2);
    assert_eq!(splits.test.num_batches(), 3);
}

#[test]
fn test_image_splits_reproducible() {
    let source: Arc<dyn SampleSource> = Arc::new(indexed_dataset(30));
    let config = DataSetConfig::new(4).with_seed(11);
    let a = make_image_splits("a", source.clone(), source.clone(), source.clone(), &config, 6, None, None)
        .unwrap();
    let b = make_image_splits("b", source.clone(), source.clone(), source, &config, 6, None, None)
        .unwrap();
    assert_eq!(a.valid.sampler_ref(), b.valid.sampler_ref());
    assert_eq!(a.train.sampler_ref(), b.train.sampler_ref());
}

#[test]
fn test_image_splits_train_eval_too_large() {
    let source: Arc<dyn SampleSource> = Arc::new(indexed_dataset(10));
    let config = DataSetConfig::new(2);
    let result = make_image_splits("fixture", source.clone(), source.clone(), source, &config, 10, None, None);
    assert_err!(result, DataError::InvalidConfig(_));
}

#[test]
fn test_image_splits_source_mismatch() {
    let train: Arc<dyn SampleSource> = Arc::new(indexed_dataset(10));
    let valid: Arc<dyn SampleSource> = Arc::new(indexed_dataset(9));
    let config = DataSetConfig::new(2);
    let result = make_image_splits("fixture", train.clone(), valid, train, &config, 2, None, None);
    assert_err!(result, DataError::InvalidConfig(_));
}
