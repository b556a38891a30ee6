use crate::errors::{BinaryOp, TensorError};
use crate::tensor::Tensor;
use std::ops::Div;

//↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓（不）带引用的张量 / f32↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
impl Div<f32> for Tensor {
    type Output = Tensor;

    fn div(self, scalar: f32) -> Tensor {
        assert!(scalar != 0., "{}", TensorError::DivByZero);
        Tensor {
            data: self.data / scalar,
        }
    }
}
impl<'a> Div<f32> for &'a Tensor {
    type Output = Tensor;

    fn div(self, scalar: f32) -> Tensor {
        assert!(scalar != 0., "{}", TensorError::DivByZero);
        Tensor {
            data: &self.data / scalar,
        }
    }
}
//↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑（不）带引用的张量 / f32↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑

//↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓带引用的张量 / 带引用的张量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓
impl<'a, 'b> Div<&'b Tensor> for &'a Tensor {
    type Output = Tensor;

    fn div(self, other: &'b Tensor) -> Tensor {
        assert!(
            self.is_same_shape(other),
            "{}",
            TensorError::ShapeMismatch {
                op: BinaryOp::Div,
                lhs: self.shape().to_vec(),
                rhs: other.shape().to_vec(),
            }
        );
        assert!(!other.has_zero_value(), "{}", TensorError::DivByZero);
        Tensor {
            data: &self.data / &other.data,
        }
    }
}
//↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑带引用的张量 / 带引用的张量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑
