use ndarray::{Array, IxDyn};
use rand::Rng;

use crate::errors::TensorError;

mod ops {
    pub mod add;
    pub mod div;
    pub mod index;
    pub mod mul;
    pub mod others;
    pub mod sub;
}

mod print;
mod shape;

#[cfg(test)]
mod tests;

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 数据集中的样本、批次、网络参数均以张量表示，元素类型固定为`f32`。
#[derive(Debug, Clone)]
pub struct Tensor {
    data: Array<f32, IxDyn>,
}

impl Tensor {
    /// 创建一个张量，若为标量，`shape`可以是[]、[1]、[1,1]...
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Tensor {
        Self::from_vec(data.to_vec(), shape)
    }

    /// 同`new`，但直接接管`data`的所有权，避免大批量数据（如整张图像集）的二次拷贝
    pub fn from_vec(data: Vec<f32>, shape: &[usize]) -> Tensor {
        let expected: usize = shape.iter().product();
        assert!(
            data.len() == expected,
            "{}",
            TensorError::IncompatibleShape
        );
        let data = Array::from_shape_vec(IxDyn(shape), data)
            .unwrap_or_else(|_| panic!("{}", TensorError::IncompatibleShape));
        Tensor { data }
    }

    /// 创建一个全零张量
    pub fn zeros(shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::zeros(IxDyn(shape)),
        }
    }

    /// 创建一个所有元素均为`value`的张量
    pub fn full(value: f32, shape: &[usize]) -> Tensor {
        Tensor {
            data: Array::from_elem(IxDyn(shape), value),
        }
    }

    /// 用给定的随机数生成器创建一个服从正态分布N(mean, std_dev²)的张量。
    /// 采用Box-Muller变换，同一个（已设种子的）`rng`总能得到相同的结果。
    pub fn new_normal_with_rng<R: Rng + ?Sized>(
        mean: f32,
        std_dev: f32,
        shape: &[usize],
        rng: &mut R,
    ) -> Tensor {
        assert!(std_dev >= 0.0, "{}", TensorError::NegativeStdDev);
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            // u1取(0, 1]，避免ln(0)
            let u1: f32 = 1.0 - rng.r#gen::<f32>();
            let u2: f32 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Tensor::from_vec(data, shape)
    }

    /// 创建一个服从正态分布的随机张量（线程随机数，不可复现）
    pub fn new_normal(mean: f32, std_dev: f32, shape: &[usize]) -> Tensor {
        Self::new_normal_with_rng(mean, std_dev, shape, &mut rand::thread_rng())
    }
}

// 私有方法
impl Tensor {
    fn has_zero_value(&self) -> bool {
        self.data.iter().any(|&x| x == 0.)
    }

    fn generate_index_array(&self, shape: &[usize]) -> Vec<usize> {
        shape.iter().map(|_| 0).collect()
    }
}
