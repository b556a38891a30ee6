use crate::tensor::Tensor;
use ndarray::Axis;
use std::cmp::PartialEq;

impl From<f32> for Tensor {
    /// 实现 From<f32> trait 用于将`f32`类型转换为形状为`[1]`的张量
    fn from(scalar: f32) -> Self {
        Tensor::new(&[scalar], &[1])
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Tensor {
    /// 对张量中的所有元素求和并返回一个形状为[1]的标量。
    pub fn sum(&self) -> Tensor {
        Tensor::from(self.data.sum())
    }

    /// 所有元素的平方和（L2范数的平方）
    pub fn square_sum(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum()
    }

    /// 所有元素的均值，空张量返回0
    pub fn mean(&self) -> f32 {
        if self.size() == 0 {
            0.0
        } else {
            self.data.sum() / self.size() as f32
        }
    }

    pub fn min_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::INFINITY, f32::min)
    }

    pub fn max_value(&self) -> f32 {
        self.data.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// 沿`axis`取最大值所在的下标（多个相同最大值时取第一个），结果去掉该维度
    pub fn argmax(&self, axis: usize) -> Tensor {
        assert!(axis < self.dimension(), "维度超出范围");
        let result = self.data.map_axis(Axis(axis), |lane| {
            let mut best_index = 0;
            let mut best_value = f32::NEG_INFINITY;
            for (i, &v) in lane.iter().enumerate() {
                if v > best_value {
                    best_value = v;
                    best_index = i;
                }
            }
            best_index as f32
        });
        Tensor { data: result }
    }

    /// 对每个元素应用`f`，返回新张量
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Tensor {
        Tensor {
            data: self.data.mapv(f),
        }
    }

    /// 将所有元素限制在`[min, max]`区间内
    pub fn clamp(&self, min: f32, max: f32) -> Tensor {
        self.map(|x| x.clamp(min, max))
    }
}
