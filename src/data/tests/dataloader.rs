//! DataLoader 单元测试

use std::sync::Arc;

use super::indexed_dataset;
use crate::assert_err;
use crate::data::transforms::Augmentation;
use crate::data::{DataError, DataLoader, SampleSource, Sampler, TensorDataset};
use crate::tensor::Tensor;

fn labels_of(loader: &DataLoader) -> Vec<f32> {
    loader
        .iter()
        .flat_map(|batch| batch.unwrap().1.to_vec())
        .collect()
}

#[test]
fn test_tensor_dataset() {
    let dataset = indexed_dataset(3);
    assert_eq!(dataset.len(), 3);
    assert!(!dataset.is_empty());
    assert_eq!(dataset.sample_shape(), vec![2]);
    assert_eq!(dataset.label_shape(), vec![1]);

    let (x, y) = dataset.get(2).unwrap();
    assert_eq!(x.to_vec(), vec![4., 5.]);
    assert_eq!(y.to_vec(), vec![2.]);
    assert_err!(dataset.get(3), DataError::IndexOutOfBounds { index: 3, len: 3 });
}

#[test]
#[should_panic]
fn test_tensor_dataset_len_mismatch() {
    TensorDataset::new(Tensor::zeros(&[3, 2]), Tensor::zeros(&[2, 1]));
}

#[test]
fn test_dataloader_basic() {
    let loader = DataLoader::new(Arc::new(indexed_dataset(10)), 3).unwrap();
    assert_eq!(loader.num_batches(), 4); // 10 / 3 = 3.33, 向上取整 = 4
    assert_eq!(loader.len(), 10);

    let batches: Vec<_> = loader.iter().map(|b| b.unwrap()).collect();
    assert_eq!(batches.len(), 4);

    // 前 3 个批次大小为 3
    assert_eq!(batches[0].0.shape(), &[3, 2]);
    assert_eq!(batches[1].0.shape()[0], 3);
    assert_eq!(batches[2].0.shape()[0], 3);
    // 最后一个批次大小为 1
    assert_eq!(batches[3].0.shape()[0], 1);
    assert_eq!(batches[3].1.to_vec(), vec![9.]);
}

#[test]
fn test_dataloader_zero_batch_size() {
    assert_err!(
        DataLoader::new(Arc::new(indexed_dataset(4)), 0),
        DataError::InvalidConfig(_)
    );
}

#[test]
fn test_dataloader_drop_last() {
    let loader = DataLoader::new(Arc::new(indexed_dataset(10)), 3)
        .unwrap()
        .drop_last(true);
    assert_eq!(loader.num_batches(), 3); // 10 / 3 = 3
    // 被丢弃的尾部样本不计入
    assert_eq!(loader.len(), 9);
    assert!(!loader.is_empty());

    let batches: Vec<_> = loader.iter().collect();
    assert_eq!(batches.len(), 3);
    assert_eq!(loader.iter().size_hint(), (3, Some(3)));
    let visited: usize = batches.iter().map(|b| b.as_ref().unwrap().0.shape()[0]).sum();
    assert_eq!(visited, loader.len());

    // 样本数不足一个批次时，整个 epoch 为空
    let tiny = DataLoader::new(Arc::new(indexed_dataset(2)), 3)
        .unwrap()
        .drop_last(true);
    assert_eq!(tiny.len(), 0);
    assert!(tiny.is_empty());
    assert_eq!(tiny.iter().count(), 0);
}

#[test]
fn test_dataloader_shuffle_with_seed() {
    let dataset = Arc::new(indexed_dataset(10));

    // 使用相同种子，两次构造应该产生相同的顺序
    let loader1 = DataLoader::new(dataset.clone(), 3).unwrap().shuffle(true).seed(42);
    let loader2 = DataLoader::new(dataset, 3).unwrap().shuffle(true).seed(42);

    let order1 = labels_of(&loader1);
    let order2 = labels_of(&loader2);
    assert_eq!(order1, order2);

    // 每个样本恰好出现一次
    let mut sorted = order1.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(sorted, (0..10).map(|x| x as f32).collect::<Vec<_>>());
}

#[test]
fn test_dataloader_epochs_differ() {
    let loader = DataLoader::new(Arc::new(indexed_dataset(32)), 8)
        .unwrap()
        .shuffle(true)
        .seed(7);
    assert_eq!(loader.epoch(), 0);
    let first = labels_of(&loader);
    let second = labels_of(&loader);
    assert_eq!(loader.epoch(), 2);
    assert_ne!(first, second, "不同 epoch 的打乱顺序应不同");
}

#[test]
fn test_dataloader_subset_sampler() {
    let loader = DataLoader::new(Arc::new(indexed_dataset(10)), 2)
        .unwrap()
        .sampler(Sampler::SubsetSequential(vec![7, 1, 4]))
        .unwrap();
    assert_eq!(loader.len(), 3);
    assert_eq!(loader.num_batches(), 2);
    assert_eq!(labels_of(&loader), vec![7., 1., 4.]);

    let out_of_range = DataLoader::new(Arc::new(indexed_dataset(10)), 2)
        .unwrap()
        .sampler(Sampler::SubsetRandom(vec![3, 10]));
    assert_err!(out_of_range, DataError::IndexOutOfBounds { index: 10, len: 10 });
}

#[test]
fn test_dataloader_with_augmentation() {
    // 4 张 3x2x2 的图像，像素全为 0.5
    let images = Tensor::full(0.5, &[4, 3, 2, 2]);
    let labels = Tensor::zeros(&[4, 1]);
    let loader = DataLoader::new(Arc::new(TensorDataset::new(images, labels)), 2)
        .unwrap()
        .augment(Augmentation::normalize_only(&[0.5, 0.5, 0.5], &[0.25, 0.25, 0.25]));

    for batch in loader.iter() {
        let (x, _) = batch.unwrap();
        assert_eq!(x.shape(), &[2, 3, 2, 2]);
        assert!(x.as_slice().iter().all(|&v| v == 0.0));
    }
    assert!(loader.augmentation().is_some());
}
