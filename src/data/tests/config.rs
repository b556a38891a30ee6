use std::path::PathBuf;

use crate::assert_err;
use crate::data::{DataError, DataSetConfig};

#[test]
fn test_default_config() {
    let config = DataSetConfig::default();
    assert_eq!(config.batch_size, 128);
    assert_eq!(config.seed, 42);
    assert!(!config.download);
    assert!(config.data_augmentation);
    assert_eq!(config.quadratic.dim, 100);
    assert_eq!(config.quadratic.train_size, 1000);
    assert_eq!(config.two_d.train_size, 10000);
    assert_eq!(config.tolstoi.seq_length, 50);
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder_methods() {
    let config = DataSetConfig::new(32)
        .with_data_dir("/tmp/optbench")
        .with_download(true)
        .with_seed(7)
        .with_data_augmentation(false)
        .with_train_eval_size(100);
    assert_eq!(config.batch_size, 32);
    assert_eq!(config.data_dir_for("mnist"), PathBuf::from("/tmp/optbench/mnist"));
    assert_eq!(config.train_eval_size_or(10000), 100);
    assert_eq!(DataSetConfig::new(1).train_eval_size_or(10000), 10000);
}

#[test]
fn test_from_toml_str() {
    let config = DataSetConfig::from_toml_str(
        r#"
        batch_size = 64
        seed = 3

        [quadratic]
        dim = 10
        "#,
    )
    .unwrap();
    assert_eq!(config.batch_size, 64);
    assert_eq!(config.seed, 3);
    assert_eq!(config.quadratic.dim, 10);
    // 未给出的字段取默认值
    assert_eq!(config.quadratic.train_size, 1000);
    assert_eq!(config.tolstoi.seq_length, 50);
}

#[test]
fn test_invalid_config() {
    assert_err!(
        DataSetConfig::from_toml_str("batch_size = 0"),
        DataError::InvalidConfig("batch_size 必须大于 0")
    );
    assert_err!(
        DataSetConfig::from_toml_str("batch_size = \"many\""),
        DataError::ConfigParseError(_)
    );
    assert_err!(
        DataSetConfig::new(8).with_train_eval_size(0).validate(),
        DataError::InvalidConfig(_)
    );
}

#[test]
fn test_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.toml");
    std::fs::write(&path, "batch_size = 16\ndownload = true\n").unwrap();
    let config = DataSetConfig::from_toml_file(&path).unwrap();
    assert_eq!(config.batch_size, 16);
    assert!(config.download);

    assert_err!(
        DataSetConfig::from_toml_file(&dir.path().join("missing.toml")),
        DataError::FileNotFound(_)
    );
}
