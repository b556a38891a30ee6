//! 运行结果的 JSON 输出

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::args::RunArgs;
use super::error::RunnerError;
use super::utils::make_run_name_at;

/// 一个 epoch 结束后在某个数据切分上的评估
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochEval {
    pub loss: f64,
    /// 回归类问题没有准确率
    pub accuracy: Option<f64>,
}

impl EpochEval {
    pub fn new(loss: f64, accuracy: Option<f64>) -> Self {
        Self { loss, accuracy }
    }
}

/// 逐 epoch 的评估曲线
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub train_losses: Vec<f64>,
    pub valid_losses: Vec<f64>,
    pub test_losses: Vec<f64>,
    pub train_accuracies: Vec<f64>,
    pub valid_accuracies: Vec<f64>,
    pub test_accuracies: Vec<f64>,
    /// 每隔 `train_log_interval` 步记录的小批量训练损失
    pub minibatch_train_losses: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResults {
    pub optimizer: String,
    pub args: RunArgs,
    pub metrics: Metrics,
}

impl RunResults {
    pub fn new(optimizer: impl Into<String>, args: RunArgs) -> Self {
        Self {
            optimizer: optimizer.into(),
            args,
            metrics: Metrics::default(),
        }
    }

    /// 记录一个 epoch 在 train_eval / valid / test 上的评估
    ///
    /// 准确率要么每个切分、每个 epoch 都有，要么全都没有，
    /// 以保证准确率曲线与损失曲线逐 epoch 对齐。
    pub fn record_epoch(
        &mut self,
        train: EpochEval,
        valid: EpochEval,
        test: EpochEval,
    ) -> Result<(), RunnerError> {
        let has_accuracy = train.accuracy.is_some();
        if valid.accuracy.is_some() != has_accuracy || test.accuracy.is_some() != has_accuracy {
            return Err(RunnerError::InvalidArgument(
                "train_eval / valid / test 必须同时给出或同时省略准确率".to_string(),
            ));
        }
        let m = &mut self.metrics;
        if !m.train_losses.is_empty() && m.train_accuracies.is_empty() == has_accuracy {
            return Err(RunnerError::InvalidArgument(format!(
                "第 {} 个 epoch 的准确率与之前的 epoch 不一致",
                m.train_losses.len()
            )));
        }
        m.train_losses.push(train.loss);
        m.valid_losses.push(valid.loss);
        m.test_losses.push(test.loss);
        m.train_accuracies.extend(train.accuracy);
        m.valid_accuracies.extend(valid.accuracy);
        m.test_accuracies.extend(test.accuracy);
        Ok(())
    }

    /// 按 `train_log_interval` 记录小批量损失，返回本步是否被记录
    pub fn record_minibatch_loss(&mut self, step: usize, loss: f64) -> bool {
        if step % self.args.train_log_interval.max(1) != 0 {
            return false;
        }
        if self.args.print_train_iter {
            info!(step, loss, "小批量训练损失");
        }
        self.metrics.minibatch_train_losses.push(loss);
        true
    }

    pub fn num_recorded_epochs(&self) -> usize {
        self.metrics.train_losses.len()
    }

    /// `<output_dir>/<testproblem>/<optimizer>/<运行目录>/<文件名>.json`
    pub fn output_path_at(&self, timestamp: NaiveDateTime) -> Result<PathBuf, RunnerError> {
        let (folder, file) = make_run_name_at(&self.args, timestamp)?;
        Ok(self
            .args
            .output_dir
            .join(&self.args.testproblem)
            .join(&self.optimizer)
            .join(folder)
            .join(format!("{file}.json")))
    }

    /// 写出结果；`no_logs`时不写并返回 `None`
    pub fn write_at(&self, timestamp: NaiveDateTime) -> Result<Option<PathBuf>, RunnerError> {
        if self.args.no_logs {
            return Ok(None);
        }
        let path = self.output_path_at(timestamp)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(writer, self)?;
        info!(path = %path.display(), "运行结果已写出");
        Ok(Some(path))
    }

    pub fn write(&self) -> Result<Option<PathBuf>, RunnerError> {
        self.write_at(Local::now().naive_local())
    }

    pub fn read(path: &Path) -> Result<Self, RunnerError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
