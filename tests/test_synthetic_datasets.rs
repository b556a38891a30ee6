use approx::assert_abs_diff_eq;
use ndarray::Array1;
use ndarray_npy::write_npy;
use optbench::data::{DataSet, DataSetConfig, DataSetKind, summarize};

fn small_config() -> DataSetConfig {
    let mut config = DataSetConfig::new(32).with_seed(7);
    config.quadratic.train_size = 100;
    config.quadratic.dim = 10;
    config.two_d.train_size = 64;
    config
}

#[test]
fn test_quadratic_through_registry() {
    let data = DataSetKind::Quadratic.build(&small_config()).unwrap();
    let summary = summarize(&data);

    assert_eq!(summary.name, "quadratic");
    assert_eq!(summary.num_classes, None);
    assert_eq!(summary.sample_shape, vec![10]);
    // 100 个样本、批大小 32、丢弃不完整批次
    assert_eq!(summary.train, (96, 3));
    assert_eq!(summary.test, (96, 3));

    let batches = data
        .train_loader()
        .iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(batches.len(), 3);
    for (x, _) in &batches {
        assert_eq!(x.shape(), &[32, 10]);
    }
}

#[test]
fn test_two_d_test_split_is_noise_free() {
    let data = DataSetKind::TwoD.build(&small_config()).unwrap();
    assert_eq!(data.name(), "two_d");
    assert_eq!(data.train_eval_size(), 64);

    for batch in data.test_loader().iter() {
        let (x, y) = batch.unwrap();
        assert_eq!(x.shape(), &[32, 1]);
        assert_abs_diff_eq!(x.square_sum(), 0.0);
        assert_abs_diff_eq!(y.square_sum(), 0.0);
    }
    let (x, _) = data.train_loader().iter().next().unwrap().unwrap();
    assert!(x.square_sum() > 0.0);
}

#[test]
fn test_same_seed_same_batches() {
    let first = DataSetKind::Quadratic.build(&small_config()).unwrap();
    let second = DataSetKind::Quadratic.build(&small_config()).unwrap();
    let (a, _) = first.train_loader().iter().next().unwrap().unwrap();
    let (b, _) = second.train_loader().iter().next().unwrap().unwrap();
    assert_eq!(a.to_vec(), b.to_vec());
}

#[test]
fn test_tolstoi_from_npy_files() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("tolstoi");
    std::fs::create_dir_all(&dir).unwrap();
    write_npy(dir.join("train.npy"), &Array1::from_iter((0..1000).map(|i| i % 83))).unwrap();
    write_npy(dir.join("test.npy"), &Array1::from_iter((0..300).map(|i| i % 83))).unwrap();

    let mut config = DataSetConfig::new(2)
        .with_data_dir(root.path())
        .with_train_eval_size(100);
    config.tolstoi.seq_length = 10;
    let data = DataSetKind::Tolstoi.build(&config).unwrap();
    let summary = summarize(&data);

    assert_eq!(summary.num_classes, Some(83));
    // 训练部分 900 个字符：(900 - 1) / 20 = 44 个批次
    assert_eq!(summary.train, (88, 44));
    assert_eq!(summary.train_eval, (8, 4));
    assert_eq!(summary.valid, (8, 4));
    assert_eq!(summary.test, (28, 14));

    let (x, y) = data.train_loader().iter().next().unwrap().unwrap();
    assert_eq!(x.shape(), &[2, 10]);
    assert_eq!(&x.to_vec()[..3], &[0., 1., 2.]);
    assert_eq!(&y.to_vec()[..3], &[1., 2., 3.]);
}

#[test]
fn test_image_data_set_without_files() {
    let root = tempfile::tempdir().unwrap();
    let config = DataSetConfig::new(8).with_data_dir(root.path());
    for kind in [DataSetKind::Cifar10, DataSetKind::Svhn, DataSetKind::Mnist] {
        assert!(kind.build(&config).is_err(), "{kind} 不应在空目录下构造成功");
    }
}
