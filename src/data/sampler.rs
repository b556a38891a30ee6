//! 采样器：决定一个 epoch 内以何种顺序访问哪些样本

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sampler {
    /// 按 `0..n` 顺序访问全部样本
    Sequential,
    /// 每个 epoch 重新打乱全部样本
    Shuffle,
    /// 每个 epoch 打乱后访问固定的子集
    SubsetRandom(Vec<usize>),
    /// 按给定顺序访问固定的子集
    SubsetSequential(Vec<usize>),
}

impl Sampler {
    /// 一个 epoch 内访问的样本数
    pub fn len(&self, source_len: usize) -> usize {
        match self {
            Sampler::Sequential | Sampler::Shuffle => source_len,
            Sampler::SubsetRandom(subset) | Sampler::SubsetSequential(subset) => subset.len(),
        }
    }

    pub fn is_empty(&self, source_len: usize) -> bool {
        self.len(source_len) == 0
    }

    /// 生成本 epoch 的访问顺序
    pub fn indices(&self, source_len: usize, rng: &mut StdRng) -> Vec<usize> {
        match self {
            Sampler::Sequential => (0..source_len).collect(),
            Sampler::Shuffle => {
                let mut indices: Vec<usize> = (0..source_len).collect();
                indices.shuffle(rng);
                indices
            }
            Sampler::SubsetRandom(subset) => {
                let mut indices = subset.clone();
                indices.shuffle(rng);
                indices
            }
            Sampler::SubsetSequential(subset) => subset.clone(),
        }
    }

    /// 子集中最大的下标，供与数据来源长度做越界检查
    pub(crate) fn max_index(&self) -> Option<usize> {
        match self {
            Sampler::Sequential | Sampler::Shuffle => None,
            Sampler::SubsetRandom(subset) | Sampler::SubsetSequential(subset) => {
                subset.iter().copied().max()
            }
        }
    }
}
