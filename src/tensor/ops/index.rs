use std::ops::{Index, IndexMut};

use crate::tensor::Tensor;

// 形如`tensor[[i, j]]`的定长索引，索引维数须与张量阶数一致
impl<const N: usize> Index<[usize; N]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; N]) -> &Self::Output {
        assert_eq!(N, self.dimension(), "索引维数与张量阶数不一致");
        &self.data[&index[..]]
    }
}

impl<const N: usize> IndexMut<[usize; N]> for Tensor {
    fn index_mut(&mut self, index: [usize; N]) -> &mut Self::Output {
        assert_eq!(N, self.dimension(), "索引维数与张量阶数不一致");
        &mut self.data[&index[..]]
    }
}
