//! tolstoi 字符级数据的批次排布与切分

use ndarray::Array1;
use ndarray_npy::write_npy;

use crate::assert_err;
use crate::data::datasets::{Tolstoi, batch_tokens, read_tokens};
use crate::data::{DataError, DataSet, DataSetConfig, SampleSource};

fn ramp(n: usize) -> Vec<f32> {
    (0..n).map(|x| x as f32).collect()
}

fn tolstoi_config(batch_size: usize, seq_length: usize, train_eval_size: usize) -> DataSetConfig {
    let mut config = DataSetConfig::new(batch_size).with_train_eval_size(train_eval_size);
    config.tolstoi.seq_length = seq_length;
    config
}

#[test]
fn test_batch_tokens_layout() {
    // 20 个字符，batch 2，序列长 3：num_batches = 19 / 6 = 3，使用前 18 个字符
    let dataset = batch_tokens(&ramp(20), 2, 3).unwrap();
    assert_eq!(dataset.len(), 6);
    assert_eq!(dataset.features().shape(), &[6, 3]);

    // 第 0 个批次：两行分别从文本的 0 与 9 处开始
    assert_eq!(dataset.get(0).unwrap().0.to_vec(), vec![0., 1., 2.]);
    assert_eq!(dataset.get(1).unwrap().0.to_vec(), vec![9., 10., 11.]);
    // 第 1 个批次的每一行接着上一批次的同一行
    assert_eq!(dataset.get(2).unwrap().0.to_vec(), vec![3., 4., 5.]);
    assert_eq!(dataset.get(3).unwrap().0.to_vec(), vec![12., 13., 14.]);
    // 目标是输入右移一位
    assert_eq!(dataset.get(5).unwrap().1.to_vec(), vec![16., 17., 18.]);
}

#[test]
fn test_batch_tokens_too_short() {
    assert_err!(batch_tokens(&ramp(6), 2, 3), DataError::InvalidConfig(_));
    assert!(batch_tokens(&ramp(7), 2, 3).is_ok());
}

#[test]
fn test_tolstoi_splits() {
    let config = tolstoi_config(2, 5, 40);
    let data = Tolstoi::from_tokens(&ramp(200), &ramp(50), &config).unwrap();
    assert_eq!(data.name(), "tolstoi");
    assert_eq!(data.num_classes(), Some(83));
    assert_eq!(data.seq_length(), 5);

    assert_eq!(data.train_loader().num_batches(), 15);
    assert_eq!(data.train_eval_loader().num_batches(), 3);
    assert_eq!(data.valid_loader().num_batches(), 3);
    assert_eq!(data.test_loader().num_batches(), 4);

    // 验证集来自训练文本的末尾
    let (x, y) = data.valid_loader().iter().next().unwrap().unwrap();
    assert_eq!(x.shape(), &[2, 5]);
    assert_eq!(x[[0, 0]], 160.);
    assert_eq!(y[[0, 0]], 161.);

    // 训练集按顺序读取，两个 epoch 完全相同
    let first = data.train_loader().iter().next().unwrap().unwrap().0;
    let again = data.train_loader().iter().next().unwrap().unwrap().0;
    assert_eq!(first, again);
    assert_eq!(first[[0, 0]], 0.);
}

#[test]
fn test_tolstoi_train_eval_too_large() {
    let config = tolstoi_config(2, 5, 200);
    assert_err!(
        Tolstoi::from_tokens(&ramp(200), &ramp(50), &config),
        DataError::InvalidConfig(_)
    );
}

#[test]
fn test_tolstoi_from_npy() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("tolstoi");
    std::fs::create_dir_all(&dir).unwrap();
    write_npy(dir.join("train.npy"), &Array1::from_iter(0..300i32)).unwrap();
    // 测试集以 i64 保存
    write_npy(dir.join("test.npy"), &Array1::from_iter(0..100i64)).unwrap();

    let mut config = tolstoi_config(2, 5, 50).with_data_dir(root.path());
    config.seed = 1;
    let data = Tolstoi::new(&config).unwrap();
    assert_eq!(data.test_loader().len(), 18);
    assert_eq!(read_tokens(&dir.join("test.npy")).unwrap()[99], 99.);

    assert_err!(
        read_tokens(&dir.join("missing.npy")),
        DataError::FileNotFound(_)
    );
}
