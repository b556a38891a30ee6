/*
 * @Description  : 运行名称与学习率调度
 */

use chrono::{Local, NaiveDateTime};

use super::args::RunArgs;
use super::error::RunnerError;

/// 10 位小数的科学计数法，去掉尾数末尾的 0；指数至少两位并带符号
///
/// `0.001 -> "1.e-03"`，`0.5 -> "5.e-01"`，`123.0 -> "1.23e+02"`
pub fn float2str(x: f64) -> String {
    let s = format!("{x:.10e}");
    let Some((mantissa, exponent)) = s.split_once('e') else {
        return s;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return s;
    };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!(
        "{}e{sign}{:02}",
        mantissa.trim_end_matches('0'),
        exponent.abs()
    )
}

/// 运行目录名与结果文件名（时间戳取当前本地时间）
pub fn make_run_name(args: &RunArgs) -> Result<(String, String), RunnerError> {
    make_run_name_at(args, Local::now().naive_local())
}

/// 同 [`make_run_name`]，但使用给定的时间戳
///
/// 目录名：`num_epochs__{N}__batch_size__{B}__[weight_decay__{wd}__]{超参数}__{值}__...`
/// 后接 `lr__{lr}` 或 `lr_schedule__0_{lr}_{e1}_{f1*lr}...`；超参数按名称排序，浮点数经过 [`float2str`]。
/// 文件名：`random_seed__{seed}__{%Y-%m-%d-%H-%M-%S}`
pub fn make_run_name_at(args: &RunArgs, timestamp: NaiveDateTime) -> Result<(String, String), RunnerError> {
    let mut folder = format!(
        "num_epochs__{}__batch_size__{}__",
        args.num_epochs, args.batch_size
    );
    if let Some(wd) = args.weight_decay {
        folder.push_str(&format!("weight_decay__{}__", float2str(wd)));
    }

    // BTreeMap 已按名称排序
    for (name, value) in &args.optimizer_hyperparams {
        folder.push_str(&format!("{name}__{value}__"));
    }

    let schedule = args.lr_schedule()?;
    if schedule.is_constant() {
        folder.push_str(&format!("lr__{}", float2str(args.learning_rate)));
    } else {
        folder.push_str(&format!("lr_schedule__0_{}", float2str(args.learning_rate)));
        for (epoch, factor) in schedule.milestones() {
            folder.push_str(&format!(
                "_{epoch}_{}",
                float2str(factor * args.learning_rate)
            ));
        }
    }

    let file = format!(
        "random_seed__{}__{}",
        args.random_seed,
        timestamp.format("%Y-%m-%d-%H-%M-%S")
    );
    Ok((folder, file))
}

/// 分段常数的学习率调度
///
/// 训练满 `epochs[i]` 个 epoch 后，学习率变为 `factors[i] * 基础学习率`。
/// 例：`epochs = [50, 100]`、`factors = [0.1, 0.01]`、基础学习率 0.5 时，
/// epoch 0..49 用 0.5，50..99 用 0.05，100 之后用 0.005。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LrSchedule {
    epochs: Vec<usize>,
    factors: Vec<f64>,
}

impl LrSchedule {
    /// 不变的学习率
    pub fn constant() -> Self {
        Self::default()
    }

    pub fn new(epochs: Vec<usize>, factors: Vec<f64>) -> Result<Self, RunnerError> {
        if epochs.is_empty() {
            return Err(RunnerError::InvalidLrSchedule(
                "至少需要一个切换点".to_string(),
            ));
        }
        if epochs.len() != factors.len() {
            return Err(RunnerError::InvalidLrSchedule(format!(
                "切换 epoch 有 {} 个，但因子有 {} 个",
                epochs.len(),
                factors.len()
            )));
        }
        if epochs.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RunnerError::InvalidLrSchedule(format!(
                "切换 epoch 必须严格递增: {epochs:?}"
            )));
        }
        if let Some(f) = factors.iter().find(|f| !f.is_finite() || **f < 0.0) {
            return Err(RunnerError::InvalidLrSchedule(format!(
                "因子必须是非负有限数，得到 {f}"
            )));
        }
        Ok(Self { epochs, factors })
    }

    /// 两者都未给出时为常数调度；只给出其一视为错误
    pub fn from_options(epochs: Option<&[usize]>, factors: Option<&[f64]>) -> Result<Self, RunnerError> {
        match (epochs, factors) {
            (None, None) => Ok(Self::constant()),
            (Some(e), Some(f)) => Self::new(e.to_vec(), f.to_vec()),
            (Some(_), None) => Err(RunnerError::InvalidLrSchedule(
                "给出了 lr_sched_epochs 但缺少 lr_sched_factors".to_string(),
            )),
            (None, Some(_)) => Err(RunnerError::InvalidLrSchedule(
                "给出了 lr_sched_factors 但缺少 lr_sched_epochs".to_string(),
            )),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.epochs.is_empty()
    }

    /// (切换 epoch, 因子)
    pub fn milestones(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.epochs.iter().copied().zip(self.factors.iter().copied())
    }

    /// 第一个切换点之前为 1，之后取最后一个不超过`epoch`的切换点的因子
    pub fn factor(&self, epoch: usize) -> f64 {
        match self.epochs.partition_point(|&e| e <= epoch) {
            0 => 1.0,
            k => self.factors[k - 1],
        }
    }

    pub fn learning_rate(&self, base: f64, epoch: usize) -> f64 {
        base * self.factor(epoch)
    }
}
