//! 样本来源
//!
//! [`DataLoader`](super::DataLoader) 只通过 [`SampleSource`] 按下标取批次，
//! 因此既能包装整块载入内存的张量（[`TensorDataset`]），
//! 也能包装按需解码的图像目录（`ImageFolder`）。

use rand::rngs::StdRng;

use super::error::DataError;
use crate::tensor::Tensor;

/// 可按下标批量取样的数据来源
pub trait SampleSource: Send + Sync {
    /// 样本数量
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 单个样本特征的形状（不含 batch 维度）
    fn sample_shape(&self) -> Vec<usize>;

    /// 单个样本标签的形状（不含 batch 维度）
    fn label_shape(&self) -> Vec<usize>;

    /// 按`indices`取出一个批次，特征与标签均沿首个维度堆叠。
    /// `rng`供需要在取样时做随机变换的来源使用（如图像的随机裁剪）。
    fn fetch(&self, indices: &[usize], rng: &mut StdRng) -> Result<(Tensor, Tensor), DataError>;
}

/// TensorDataset - 持有特征和标签的数据集
///
/// # 示例
/// ```ignore
/// let dataset = TensorDataset::new(features, labels);
/// println!("样本数: {}", dataset.len());
/// ```
#[derive(Debug, Clone)]
pub struct TensorDataset {
    features: Tensor,
    labels: Tensor,
    len: usize,
}

impl TensorDataset {
    /// 创建新的 TensorDataset
    ///
    /// # 参数
    /// - `features`: 特征张量，第一维为样本数
    /// - `labels`: 标签张量，第一维为样本数（必须与 features 一致）；
    ///   无监督目标（如 quadratic）可传入形状为 `[N, 0]` 的空标签
    ///
    /// # Panics
    /// 如果 features 和 labels 的样本数不一致
    pub fn new(features: Tensor, labels: Tensor) -> Self {
        let len = features.shape()[0];
        assert_eq!(
            len,
            labels.shape()[0],
            "TensorDataset: features 和 labels 的样本数必须一致，得到 {} vs {}",
            len,
            labels.shape()[0]
        );
        Self {
            features,
            labels,
            len,
        }
    }

    /// 获取特征张量引用
    pub fn features(&self) -> &Tensor {
        &self.features
    }

    /// 获取标签张量引用
    pub fn labels(&self) -> &Tensor {
        &self.labels
    }

    /// 获取第 index 个样本
    pub fn get(&self, index: usize) -> Result<(Tensor, Tensor), DataError> {
        if index >= self.len {
            return Err(DataError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok((self.features.sample(index), self.labels.sample(index)))
    }
}

impl SampleSource for TensorDataset {
    fn len(&self) -> usize {
        self.len
    }

    fn sample_shape(&self) -> Vec<usize> {
        self.features.shape()[1..].to_vec()
    }

    fn label_shape(&self) -> Vec<usize> {
        self.labels.shape()[1..].to_vec()
    }

    fn fetch(&self, indices: &[usize], _rng: &mut StdRng) -> Result<(Tensor, Tensor), DataError> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.len) {
            return Err(DataError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok((self.features.select(indices), self.labels.select(indices)))
    }
}
