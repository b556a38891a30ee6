use super::Tensor;
use crate::errors::TensorError;
use ndarray::{Axis, IxDyn};

impl Tensor {
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数，如：形状为`[]`的标量阶数为0，向量阶数为1
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量
    pub fn is_scalar(&self) -> bool {
        self.shape().is_empty() || self.shape().iter().all(|x| *x == 1)
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f32> {
        if self.is_scalar() {
            let index_array = self.generate_index_array(self.shape());
            Some(self.data[&index_array[..]])
        } else {
            None
        }
    }

    pub fn reshape(&self, shape: &[usize]) -> Self {
        let new_total_elements: usize = shape.iter().product();
        assert!(
            self.size() == new_total_elements,
            "{}",
            TensorError::IncompatibleShape
        );
        // `as_standard_layout`保证按行优先顺序重排，即使原数据是转置等视图的结果
        let data = self.data.as_standard_layout().into_owned();
        Self {
            data: data
                .into_shape(IxDyn(shape))
                .unwrap_or_else(|_| panic!("{}", TensorError::IncompatibleShape)),
        }
    }

    /// 展平为一维张量
    pub fn flatten(&self) -> Self {
        self.reshape(&[self.size()])
    }

    /// 按行优先顺序返回全部元素的切片
    pub fn as_slice(&self) -> &[f32] {
        self.data
            .as_slice()
            .unwrap_or_else(|| panic!("{}", TensorError::InconsistentShape))
    }

    /// 按行优先顺序拷贝出全部元素
    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 将多个张量沿着首个维度堆叠起来，返回一个新的张量。
    /// * `tensors` - 一个包含多个张量的数组的引用。
    /// * `new_dim` - 为`true`时新增首个维度（所有张量形状须一致）；
    ///   为`false`时沿已有首个维度拼接（除首个维度外其余维度须一致）。
    pub fn stack(tensors: &[&Self], new_dim: bool) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);

        let first_shape = tensors[0].shape();
        let skip = if new_dim { 0 } else { 1 };
        let compatible = tensors.iter().all(|t| {
            let t_shape = t.shape();
            t_shape.len() == first_shape.len()
                && t_shape
                    .iter()
                    .skip(skip)
                    .zip(first_shape.iter().skip(skip))
                    .all(|(a, b)| a == b)
        });
        assert!(compatible, "{}", TensorError::InconsistentShape);

        let data = tensors
            .iter()
            .flat_map(|t| t.data.iter())
            .copied()
            .collect::<Vec<_>>();

        let shape = if new_dim {
            let mut shape = first_shape.to_vec();
            shape.insert(0, tensors.len());
            shape
        } else {
            let mut shape = first_shape.to_vec();
            shape[0] = tensors.iter().map(|t| t.shape()[0]).sum();
            shape
        };

        Self::from_vec(data, &shape)
    }

    /// 沿首个维度按`indices`收集样本，返回形状为`[indices.len(), ...]`的新张量
    pub fn select(&self, indices: &[usize]) -> Self {
        let len = self.shape()[0];
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            panic!("{}", TensorError::IndexOutOfRange { index, len });
        }
        Self {
            data: self.data.select(Axis(0), indices),
        }
    }

    /// 取首个维度上的第`index`个元素（去掉首个维度）
    pub fn sample(&self, index: usize) -> Self {
        let len = self.shape()[0];
        assert!(
            index < len,
            "{}",
            TensorError::IndexOutOfRange { index, len }
        );
        Self {
            data: self.data.index_axis(Axis(0), index).to_owned(),
        }
    }

    /// 取首个维度上`[start, end)`区间的连续切片
    pub fn narrow(&self, start: usize, end: usize) -> Self {
        let len = self.shape()[0];
        assert!(
            start <= end && end <= len,
            "{}",
            TensorError::IndexOutOfRange { index: end, len }
        );
        Self {
            data: self
                .data
                .slice_axis(Axis(0), ndarray::Slice::from(start..end))
                .to_owned(),
        }
    }
}
