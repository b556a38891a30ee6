/*
 * @Description  : 损失与准确率（在给定的 logits 上计算，不建计算图）
 */

use super::error::TestProblemError;
use crate::tensor::Tensor;

/// 交叉熵损失，内置 Softmax，目标为 one-hot 编码
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    pub fn new() -> Self {
        Self
    }

    /// 批次平均的 softmax 交叉熵
    ///
    /// # 参数
    /// - `logits`: `[N, C]`
    /// - `target`: `[N, C]` 的 one-hot（也接受软标签）
    pub fn forward(&self, logits: &Tensor, target: &Tensor) -> Result<f32, TestProblemError> {
        let (n, c) = check_shapes(logits, target)?;
        let logits = logits.as_slice();
        let target = target.as_slice();

        let total = (0..n)
            .map(|i| {
                let row = &logits[i * c..(i + 1) * c];
                // log-sum-exp 减去最大值，避免溢出
                let max = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let log_sum = row.iter().map(|&z| (z - max).exp()).sum::<f32>().ln() + max;
                row.iter()
                    .zip(&target[i * c..(i + 1) * c])
                    .map(|(&z, &t)| t * (log_sum - z))
                    .sum::<f32>()
            })
            .sum::<f32>();
        Ok(total / n as f32)
    }
}

/// 预测类别（logits 最大处）与目标类别一致的比例
pub fn accuracy(logits: &Tensor, target: &Tensor) -> Result<f32, TestProblemError> {
    let (n, _) = check_shapes(logits, target)?;
    let predicted = logits.argmax(1).to_vec();
    let expected = target.argmax(1).to_vec();
    let correct = predicted
        .iter()
        .zip(&expected)
        .filter(|(p, e)| p == e)
        .count();
    Ok(correct as f32 / n as f32)
}

fn check_shapes(logits: &Tensor, target: &Tensor) -> Result<(usize, usize), TestProblemError> {
    if logits.dimension() != 2 || logits.shape() != target.shape() || logits.shape()[0] == 0 {
        return Err(TestProblemError::ShapeMismatch {
            expected: logits.shape().to_vec(),
            got: target.shape().to_vec(),
        });
    }
    Ok((logits.shape()[0], logits.shape()[1]))
}
