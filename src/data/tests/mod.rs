mod config;
mod dataloader;
mod imagenet;
mod sampler;
mod splits;
mod tolstoi;

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::data::TensorDataset;
use crate::tensor::Tensor;

/// 特征为 `[n, 2]`、标签为 `[n, 1]` 的小数据集，第 i 个样本的标签就是 i
pub(super) fn indexed_dataset(n: usize) -> TensorDataset {
    let features = Tensor::new(
        &(0..2 * n).map(|x| x as f32).collect::<Vec<_>>(),
        &[n, 2],
    );
    let labels = Tensor::new(&(0..n).map(|x| x as f32).collect::<Vec<_>>(), &[n, 1]);
    TensorDataset::new(features, labels)
}

/// 写出一对 IDX 文件（图像 + 标签），像素值为 `(i + p) % 256`，标签为 `i % 10`
pub(super) fn write_idx_pair(dir: &Path, images: &str, labels: &str, n: usize, gz: bool) {
    let (rows, cols) = (4usize, 3usize);
    let mut image_bytes = Vec::new();
    image_bytes.extend_from_slice(&2051u32.to_be_bytes());
    image_bytes.extend_from_slice(&(n as u32).to_be_bytes());
    image_bytes.extend_from_slice(&(rows as u32).to_be_bytes());
    image_bytes.extend_from_slice(&(cols as u32).to_be_bytes());
    for i in 0..n {
        for p in 0..rows * cols {
            image_bytes.push(((i + p) % 256) as u8);
        }
    }

    let mut label_bytes = Vec::new();
    label_bytes.extend_from_slice(&2049u32.to_be_bytes());
    label_bytes.extend_from_slice(&(n as u32).to_be_bytes());
    label_bytes.extend((0..n).map(|i| (i % 10) as u8));

    write_maybe_gz(&dir.join(images), &image_bytes, gz);
    write_maybe_gz(&dir.join(labels), &label_bytes, gz);
}

fn write_maybe_gz(path: &Path, bytes: &[u8], gz: bool) {
    if gz {
        let file = std::fs::File::create(format!("{}.gz", path.display())).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap();
    } else {
        std::fs::write(path, bytes).unwrap();
    }
}

/// 写出 `labels.len()` 条 3x32x32 的记录，每条记录的像素全部等于其标签字节
pub(super) fn write_records(path: &Path, labels: &[Vec<u8>]) {
    let mut bytes = Vec::new();
    for label in labels {
        bytes.extend_from_slice(label);
        bytes.extend(std::iter::repeat_n(label[label.len() - 1], 3 * 32 * 32));
    }
    std::fs::write(path, bytes).unwrap();
}
