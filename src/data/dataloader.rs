/*
 * @Description  : DataLoader - PyTorch 风格的数据批量加载器
 *
 * 提供统一的数据迭代 API，支持：
 * - 自动分批 (batch_size)
 * - 采样器（顺序、打乱、子集）
 * - 丢弃不完整批次 (drop_last)
 * - 逐样本的数据增强
 * - 每次 iter() 视为一个新 epoch，设置种子后各 epoch 的顺序可复现
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use super::error::DataError;
use super::sampler::Sampler;
use super::source::SampleSource;
use super::transforms::Augmentation;
use crate::tensor::Tensor;

/// DataLoader - PyTorch 风格的数据批量加载器
///
/// # 示例
/// ```ignore
/// let dataset = Arc::new(TensorDataset::new(train_x, train_y));
/// let loader = DataLoader::new(dataset, 32)?
///     .shuffle(true)
///     .drop_last(true);
///
/// for batch in loader.iter() {
///     let (x_batch, y_batch) = batch?;
///     // ...
/// }
/// ```
pub struct DataLoader {
    source: Arc<dyn SampleSource>,
    batch_size: usize,
    sampler: Sampler,
    drop_last: bool,
    seed: Option<u64>,
    augmentation: Option<Augmentation>,
    epoch: AtomicU64,
}

impl std::fmt::Debug for DataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataLoader")
            .field("source_len", &self.source.len())
            .field("batch_size", &self.batch_size)
            .field("sampler", &self.sampler)
            .field("drop_last", &self.drop_last)
            .field("seed", &self.seed)
            .field("augmentation", &self.augmentation)
            .field("epoch", &self.epoch())
            .finish()
    }
}

impl DataLoader {
    /// 创建新的 DataLoader
    ///
    /// # 参数
    /// - `source`: 数据来源
    /// - `batch_size`: 批大小，必须大于 0
    pub fn new(source: Arc<dyn SampleSource>, batch_size: usize) -> Result<Self, DataError> {
        if batch_size == 0 {
            return Err(DataError::InvalidConfig("batch_size 必须大于 0".to_string()));
        }
        Ok(Self {
            source,
            batch_size,
            sampler: Sampler::Sequential,
            drop_last: false,
            seed: None,
            augmentation: None,
            epoch: AtomicU64::new(0),
        })
    }

    /// 设置是否打乱数据（覆盖之前设置的采样器）
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.sampler = if shuffle {
            Sampler::Shuffle
        } else {
            Sampler::Sequential
        };
        self
    }

    /// 设置采样器。子集中的下标必须小于数据来源的长度
    pub fn sampler(mut self, sampler: Sampler) -> Result<Self, DataError> {
        if let Some(max) = sampler.max_index() {
            if max >= self.source.len() {
                return Err(DataError::IndexOutOfBounds {
                    index: max,
                    len: self.source.len(),
                });
            }
        }
        self.sampler = sampler;
        Ok(self)
    }

    /// 设置是否丢弃最后一个不完整的批次
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// 设置随机种子（用于打乱与数据增强）
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 设置逐样本的数据增强
    pub fn augment(mut self, augmentation: Augmentation) -> Self {
        self.augmentation = Some(augmentation);
        self
    }

    /// 获取批次数量
    pub fn num_batches(&self) -> usize {
        let n = self.num_samples();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    /// 一个 epoch 内实际访问的样本数（drop_last 时不含被丢弃的尾部）
    pub fn len(&self) -> usize {
        if self.drop_last {
            self.num_batches() * self.batch_size
        } else {
            self.num_samples()
        }
    }

    /// 采样器选中的样本数
    fn num_samples(&self) -> usize {
        self.sampler.len(self.source.len())
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn sampler_ref(&self) -> &Sampler {
        &self.sampler
    }

    pub fn source(&self) -> &Arc<dyn SampleSource> {
        &self.source
    }

    pub fn augmentation(&self) -> Option<&Augmentation> {
        self.augmentation.as_ref()
    }

    /// 已开始的 epoch 数
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Relaxed)
    }

    /// 创建迭代器，开始一个新的 epoch
    pub fn iter(&self) -> DataLoaderIterator<'_> {
        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(epoch)),
            None => StdRng::from_entropy(),
        };
        let indices = self.sampler.indices(self.source.len(), &mut rng);
        debug!(
            epoch,
            samples = indices.len(),
            batches = self.num_batches(),
            "DataLoader 开始新的 epoch"
        );

        DataLoaderIterator {
            loader: self,
            indices,
            current_batch: 0,
            rng,
        }
    }
}

/// DataLoader 迭代器
pub struct DataLoaderIterator<'a> {
    loader: &'a DataLoader,
    indices: Vec<usize>,
    current_batch: usize,
    rng: StdRng,
}

impl Iterator for DataLoaderIterator<'_> {
    type Item = Result<(Tensor, Tensor), DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.indices.len();
        let batch_size = self.loader.batch_size;
        let start = self.current_batch * batch_size;

        // 检查是否还有数据
        if start >= n {
            return None;
        }

        let end = (start + batch_size).min(n);

        // 如果 drop_last 且批次不完整，则结束
        if self.loader.drop_last && end - start < batch_size {
            return None;
        }

        self.current_batch += 1;

        let batch_indices = self.indices[start..end].to_vec();
        Some(self.extract_batch(&batch_indices))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.loader.num_batches().saturating_sub(self.current_batch);
        (remaining, Some(remaining))
    }
}

impl DataLoaderIterator<'_> {
    /// 从数据来源中按索引提取批次，并逐样本做数据增强
    fn extract_batch(&mut self, indices: &[usize]) -> Result<(Tensor, Tensor), DataError> {
        let (features, labels) = self.loader.source.fetch(indices, &mut self.rng)?;
        let Some(augmentation) = &self.loader.augmentation else {
            return Ok((features, labels));
        };

        let augmented = (0..features.shape()[0])
            .map(|i| augmentation.apply(&features.sample(i), &mut self.rng))
            .collect::<Vec<_>>();
        let refs = augmented.iter().collect::<Vec<_>>();
        Ok((Tensor::stack(&refs, true), labels))
    }
}
