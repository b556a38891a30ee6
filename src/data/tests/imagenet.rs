//! 图像目录来源与 imagenet 数据集（使用临时目录中的小尺寸 PNG）

use std::path::Path;

use image::{Rgb, RgbImage};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::assert_err;
use crate::data::datasets::{ImageFolder, ImageTransform, Imagenet};
use crate::data::{DataError, DataSet, DataSetConfig, SampleSource, summarize};

fn small_transform(random: bool) -> ImageTransform {
    ImageTransform {
        resize: 8,
        crop: 6,
        random,
        mean: vec![0.0; 3],
        std: vec![1.0; 3],
    }
}

/// 在 `root/<class>/` 下写出 `per_class` 张纯色 PNG，颜色的红色分量为类别序号 * 50
fn write_image_folder(root: &Path, classes: &[&str], per_class: usize) {
    for (k, class) in classes.iter().enumerate() {
        let dir = root.join(class);
        std::fs::create_dir_all(&dir).unwrap();
        for i in 0..per_class {
            let image = RgbImage::from_pixel(12, 10, Rgb([(k * 50) as u8, 100, 200]));
            image.save(dir.join(format!("img_{i}.png"))).unwrap();
        }
        std::fs::write(dir.join("notes.txt"), "skip me").unwrap();
    }
}

#[test]
fn test_image_folder_scan() {
    let root = tempfile::tempdir().unwrap();
    write_image_folder(root.path(), &["n02", "n01"], 3);

    let folder = ImageFolder::new(root.path(), 1, 1001, small_transform(false)).unwrap();
    assert_eq!(folder.len(), 6);
    assert_eq!(folder.classes(), &["n01".to_string(), "n02".to_string()]);
    assert_eq!(folder.sample_shape(), vec![3, 6, 6]);
    assert_eq!(folder.label_shape(), vec![1001]);

    // 类别按目录名排序，整体后移一位
    let (path, label) = folder.sample(0).unwrap();
    assert!(path.to_string_lossy().contains("n01"));
    assert_eq!(label, 1);
    assert_eq!(folder.sample(5).unwrap().1, 2);
    assert!(folder.sample(6).is_none());
}

#[test]
fn test_image_folder_fetch() {
    let root = tempfile::tempdir().unwrap();
    write_image_folder(root.path(), &["a", "b"], 2);
    let folder = ImageFolder::new(root.path(), 0, 2, small_transform(true)).unwrap();

    let mut rng = StdRng::seed_from_u64(0);
    let (x, y) = folder.fetch(&[3, 0], &mut rng).unwrap();
    assert_eq!(x.shape(), &[2, 3, 6, 6]);
    assert_eq!(y.to_vec(), vec![0., 1., 1., 0.]);
    // 纯色图像经过缩放裁剪后仍是纯色
    assert!((x[[0, 0, 2, 2]] - 50.0 / 255.0).abs() < 1e-2);
    assert!((x[[1, 2, 0, 0]] - 200.0 / 255.0).abs() < 1e-2);

    // 同一种子得到同样的批次
    let (x2, _) = folder.fetch(&[3, 0], &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(x, x2);

    assert_err!(
        folder.fetch(&[4], &mut rng),
        DataError::IndexOutOfBounds { index: 4, len: 4 }
    );
}

#[test]
fn test_image_folder_unknown_class() {
    let root = tempfile::tempdir().unwrap();
    write_image_folder(&root.path().join("train"), &["a"], 1);
    write_image_folder(&root.path().join("validation"), &["a", "z"], 1);
    let classes = vec!["a".to_string()];
    assert_err!(
        ImageFolder::with_classes(&root.path().join("validation"), &classes, 1, 1001, small_transform(false)),
        DataError::FormatError(_)
    );
    assert_err!(
        ImageFolder::new(&root.path().join("missing"), 1, 1001, small_transform(false)),
        DataError::FileNotFound(_)
    );
}

#[test]
fn test_imagenet_from_dirs() {
    let root = tempfile::tempdir().unwrap();
    write_image_folder(&root.path().join("train"), &["n01", "n02", "n03"], 4);
    write_image_folder(&root.path().join("validation"), &["n01", "n03"], 2);

    let config = DataSetConfig::new(2).with_train_eval_size(3);
    let data = Imagenet::from_dirs(
        &root.path().join("train"),
        &root.path().join("validation"),
        &config,
        small_transform(true),
        small_transform(false),
    )
    .unwrap();
    assert_eq!(data.name(), "imagenet");
    assert_eq!(data.num_classes(), Some(1001));

    let summary = summarize(&data);
    assert_eq!(summary.sample_shape, vec![3, 6, 6]);
    assert_eq!(summary.train, (8, 4));
    assert_eq!(summary.valid, (3, 2));
    assert_eq!(summary.test, (4, 2));

    // 验证目录沿用训练目录的类别编号：n03 → 3
    let labels = data
        .test_loader()
        .iter()
        .flat_map(|batch| {
            let (_, y) = batch.unwrap();
            y.argmax(1).to_vec()
        })
        .collect::<Vec<_>>();
    assert_eq!(labels, vec![1., 1., 3., 3.]);
}

#[test]
fn test_imagenet_missing_dirs() {
    let root = tempfile::tempdir().unwrap();
    let config = DataSetConfig::new(2).with_data_dir(root.path());
    assert_err!(Imagenet::new(&config), DataError::FileNotFound(_));
}
