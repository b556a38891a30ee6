/*
 * @Description  : 优化器运行参数：预设值优先，其余从命令行读取
 */

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::RunnerError;
use super::utils::{LrSchedule, float2str};

const DEFAULT_RANDOM_SEED: u64 = 42;
const DEFAULT_OUTPUT_DIR: &str = "results";
const DEFAULT_TRAIN_LOG_INTERVAL: usize = 10;

/// 内置参数占用的名称（含别名），优化器超参数不能与之重名
const RESERVED_NAMES: [&str; 17] = [
    "testproblem",
    "weight_decay",
    "wd",
    "batch_size",
    "bs",
    "num_epochs",
    "learning_rate",
    "lr",
    "lr_sched_epochs",
    "lr_sched_factors",
    "random_seed",
    "data_dir",
    "output_dir",
    "train_log_interval",
    "print_train_iter",
    "no_logs",
    "help",
];

/// 优化器超参数的取值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperparameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl HyperparameterValue {
    pub fn kind(&self) -> HyperparameterKind {
        match self {
            Self::Bool(_) => HyperparameterKind::Bool,
            Self::Int(_) => HyperparameterKind::Int,
            Self::Float(_) => HyperparameterKind::Float,
            Self::Str(_) => HyperparameterKind::Str,
        }
    }
}

/// 浮点数按运行名称的格式输出，其余按原样
impl fmt::Display for HyperparameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{}", float2str(*v)),
            Self::Str(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HyperparameterKind {
    Float,
    Int,
    Bool,
    Str,
}

impl fmt::Display for HyperparameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Str => "str",
        };
        f.write_str(name)
    }
}

/// 优化器的一个超参数：无默认值时在命令行上必填
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperparameterSpec {
    pub name: String,
    pub kind: HyperparameterKind,
    #[serde(default)]
    pub default: Option<HyperparameterValue>,
}

impl HyperparameterSpec {
    pub fn new(name: impl Into<String>, kind: HyperparameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, default: HyperparameterValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// 代码中预先给定的参数；给定的项不再出现在命令行上
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunPreset {
    pub testproblem: Option<String>,
    pub weight_decay: Option<f64>,
    pub batch_size: Option<usize>,
    pub num_epochs: Option<usize>,
    pub learning_rate: Option<f64>,
    pub lr_sched_epochs: Option<Vec<usize>>,
    pub lr_sched_factors: Option<Vec<f64>>,
    pub random_seed: Option<u64>,
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub train_log_interval: Option<usize>,
    pub print_train_iter: Option<bool>,
    pub no_logs: Option<bool>,
    pub hyperparams: BTreeMap<String, HyperparameterValue>,
}

/// 一次优化器运行的完整参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunArgs {
    pub testproblem: String,
    /// 未给出时使用测试问题自身的默认值
    pub weight_decay: Option<f64>,
    pub batch_size: usize,
    pub num_epochs: usize,
    pub learning_rate: f64,
    pub lr_sched_epochs: Option<Vec<usize>>,
    pub lr_sched_factors: Option<Vec<f64>>,
    pub random_seed: u64,
    pub data_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub train_log_interval: usize,
    pub print_train_iter: bool,
    pub no_logs: bool,
    pub optimizer_hyperparams: BTreeMap<String, HyperparameterValue>,
}

impl RunArgs {
    /// 只含必需项的参数，其余取默认值
    pub fn new(testproblem: impl Into<String>, batch_size: usize, num_epochs: usize, learning_rate: f64) -> Self {
        Self {
            testproblem: testproblem.into(),
            weight_decay: None,
            batch_size,
            num_epochs,
            learning_rate,
            lr_sched_epochs: None,
            lr_sched_factors: None,
            random_seed: DEFAULT_RANDOM_SEED,
            data_dir: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            train_log_interval: DEFAULT_TRAIN_LOG_INTERVAL,
            print_train_iter: false,
            no_logs: false,
            optimizer_hyperparams: BTreeMap::new(),
        }
    }

    pub fn lr_schedule(&self) -> Result<LrSchedule, RunnerError> {
        LrSchedule::from_options(
            self.lr_sched_epochs.as_deref(),
            self.lr_sched_factors.as_deref(),
        )
    }

    fn validate(&self) -> Result<(), RunnerError> {
        if self.batch_size == 0 {
            return Err(RunnerError::InvalidArgument(
                "batch_size 必须为正整数".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(RunnerError::InvalidArgument(format!(
                "learning_rate 必须为正数，得到 {}",
                self.learning_rate
            )));
        }
        if self.train_log_interval == 0 {
            return Err(RunnerError::InvalidArgument(
                "train_log_interval 必须为正整数".to_string(),
            ));
        }
        self.lr_schedule()?;
        Ok(())
    }
}

/// 组装运行参数
///
/// `preset`中给出的项直接采用，其余各项（包括`hyperparams`中预设未覆盖的超参数）
/// 变成命令行参数，从`argv`解析（`argv[0]`为程序名）。`--help`同样以 [`RunnerError::Cli`] 返回。
pub fn get_arguments<I, T>(
    optimizer_name: &str,
    hyperparams: &[HyperparameterSpec],
    preset: &RunPreset,
    argv: I,
) -> Result<RunArgs, RunnerError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    check_hyperparameter_names(hyperparams)?;
    for name in preset.hyperparams.keys() {
        if !hyperparams.iter().any(|hp| hp.name == *name) {
            warn!(name = %name, optimizer = optimizer_name, "预设了优化器没有的超参数，已忽略");
        }
    }

    let command = build_command(optimizer_name, hyperparams, preset);
    let matches = command.try_get_matches_from(argv)?;

    let args = RunArgs {
        testproblem: required(pick(&preset.testproblem, &matches, "testproblem"), "testproblem")?,
        weight_decay: pick(&preset.weight_decay, &matches, "weight_decay"),
        batch_size: required(pick(&preset.batch_size, &matches, "batch_size"), "batch_size")?,
        num_epochs: required(pick(&preset.num_epochs, &matches, "num_epochs"), "num_epochs")?,
        learning_rate: required(
            pick(&preset.learning_rate, &matches, "learning_rate"),
            "learning_rate",
        )?,
        lr_sched_epochs: pick_many(&preset.lr_sched_epochs, &matches, "lr_sched_epochs"),
        lr_sched_factors: pick_many(&preset.lr_sched_factors, &matches, "lr_sched_factors"),
        random_seed: pick(&preset.random_seed, &matches, "random_seed").unwrap_or(DEFAULT_RANDOM_SEED),
        data_dir: pick(&preset.data_dir, &matches, "data_dir"),
        output_dir: pick(&preset.output_dir, &matches, "output_dir")
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        train_log_interval: pick(&preset.train_log_interval, &matches, "train_log_interval")
            .unwrap_or(DEFAULT_TRAIN_LOG_INTERVAL),
        print_train_iter: pick_flag(preset.print_train_iter, &matches, "print_train_iter"),
        no_logs: pick_flag(preset.no_logs, &matches, "no_logs"),
        optimizer_hyperparams: collect_hyperparameters(hyperparams, preset, &matches)?,
    };
    args.validate()?;
    debug!(optimizer = optimizer_name, testproblem = %args.testproblem, "运行参数已解析");
    Ok(args)
}

fn check_hyperparameter_names(hyperparams: &[HyperparameterSpec]) -> Result<(), RunnerError> {
    for (i, hp) in hyperparams.iter().enumerate() {
        if RESERVED_NAMES.contains(&hp.name.as_str()) {
            return Err(RunnerError::InvalidArgument(format!(
                "超参数名 {} 与内置参数重名",
                hp.name
            )));
        }
        if hyperparams[..i].iter().any(|other| other.name == hp.name) {
            return Err(RunnerError::InvalidArgument(format!(
                "超参数 {} 重复定义",
                hp.name
            )));
        }
        if let Some(default) = &hp.default {
            if !kind_accepts(hp.kind, default) {
                return Err(RunnerError::InvalidArgument(format!(
                    "超参数 {} 的默认值 {default} 不是 {} 类型",
                    hp.name, hp.kind
                )));
            }
        }
    }
    Ok(())
}

/// 整数可以充当浮点数
fn kind_accepts(kind: HyperparameterKind, value: &HyperparameterValue) -> bool {
    value.kind() == kind
        || (kind == HyperparameterKind::Float && matches!(value, HyperparameterValue::Int(_)))
}

fn build_command(optimizer_name: &str, hyperparams: &[HyperparameterSpec], preset: &RunPreset) -> Command {
    let mut cmd = Command::new(optimizer_name.to_string())
        .about(format!("在测试问题上运行 {optimizer_name}"));

    if preset.testproblem.is_none() {
        cmd = cmd.arg(
            Arg::new("testproblem")
                .required(true)
                .help("测试问题名称（如 cifar10_vgg16）"),
        );
    }
    if preset.weight_decay.is_none() {
        cmd = cmd.arg(
            Arg::new("weight_decay")
                .long("weight_decay")
                .visible_alias("wd")
                .value_parser(value_parser!(f64))
                .help("权重衰减系数；不给出时使用测试问题的默认值"),
        );
    }
    if preset.batch_size.is_none() {
        cmd = cmd.arg(
            Arg::new("batch_size")
                .long("batch_size")
                .visible_alias("bs")
                .required(true)
                .value_parser(value_parser!(usize))
                .help("批大小（正整数）"),
        );
    }
    if preset.num_epochs.is_none() {
        cmd = cmd.arg(
            Arg::new("num_epochs")
                .short('N')
                .long("num_epochs")
                .required(true)
                .value_parser(value_parser!(usize))
                .help("训练的 epoch 总数"),
        );
    }
    if preset.learning_rate.is_none() {
        cmd = cmd.arg(
            Arg::new("learning_rate")
                .long("learning_rate")
                .visible_alias("lr")
                .required(true)
                .value_parser(value_parser!(f64))
                .help("学习率；配合 --lr_sched_epochs 与 --lr_sched_factors 时作为基础学习率"),
        );
    }
    if preset.lr_sched_epochs.is_none() {
        cmd = cmd.arg(
            Arg::new("lr_sched_epochs")
                .long("lr_sched_epochs")
                .num_args(1..)
                .value_parser(value_parser!(usize))
                .help("学习率切换的 epoch，例：--lr 0.3 --lr_sched_epochs 50 100 --lr_sched_factors 0.1 0.01"),
        );
    }
    if preset.lr_sched_factors.is_none() {
        cmd = cmd.arg(
            Arg::new("lr_sched_factors")
                .long("lr_sched_factors")
                .num_args(1..)
                .value_parser(value_parser!(f64))
                .help("各切换点上乘到基础学习率上的因子"),
        );
    }
    if preset.random_seed.is_none() {
        cmd = cmd.arg(
            Arg::new("random_seed")
                .short('r')
                .long("random_seed")
                .value_parser(value_parser!(u64))
                .default_value("42")
                .help("随机种子"),
        );
    }
    if preset.data_dir.is_none() {
        cmd = cmd.arg(
            Arg::new("data_dir")
                .long("data_dir")
                .value_parser(value_parser!(PathBuf))
                .help("数据根目录；不给出时使用默认缓存目录"),
        );
    }
    if preset.output_dir.is_none() {
        cmd = cmd.arg(
            Arg::new("output_dir")
                .long("output_dir")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_OUTPUT_DIR)
                .help("结果根目录，其下按 测试问题/优化器 分子目录"),
        );
    }
    if preset.train_log_interval.is_none() {
        cmd = cmd.arg(
            Arg::new("train_log_interval")
                .long("train_log_interval")
                .value_parser(value_parser!(usize))
                .default_value("10")
                .help("每隔多少步记录一次训练损失"),
        );
    }
    if preset.print_train_iter.is_none() {
        cmd = cmd.arg(
            Arg::new("print_train_iter")
                .long("print_train_iter")
                .action(ArgAction::SetTrue)
                .help("每次记录时打印小批量训练损失"),
        );
    }
    if preset.no_logs.is_none() {
        cmd = cmd.arg(
            Arg::new("no_logs")
                .long("no_logs")
                .action(ArgAction::SetTrue)
                .help("不写出 JSON 结果文件"),
        );
    }

    for hp in hyperparams {
        if preset.hyperparams.contains_key(&hp.name) {
            continue;
        }
        let mut arg = Arg::new(hp.name.clone())
            .long(hp.name.clone())
            .required(hp.default.is_none());
        arg = match hp.kind {
            HyperparameterKind::Float => arg.value_parser(value_parser!(f64)).allow_negative_numbers(true),
            HyperparameterKind::Int => arg.value_parser(value_parser!(i64)).allow_negative_numbers(true),
            HyperparameterKind::Bool => arg.value_parser(BoolishValueParser::new()),
            HyperparameterKind::Str => arg.value_parser(value_parser!(String)),
        };
        let help = match &hp.default {
            Some(default) => format!("{optimizer_name} 的超参数 {}（{}，默认 {default}）", hp.name, hp.kind),
            None => format!("{optimizer_name} 的超参数 {}（{}）", hp.name, hp.kind),
        };
        cmd = cmd.arg(arg.help(help));
    }
    cmd
}

fn collect_hyperparameters(
    hyperparams: &[HyperparameterSpec],
    preset: &RunPreset,
    matches: &ArgMatches,
) -> Result<BTreeMap<String, HyperparameterValue>, RunnerError> {
    let mut values = BTreeMap::new();
    for hp in hyperparams {
        let value = match preset.hyperparams.get(&hp.name) {
            Some(value) => {
                if !kind_accepts(hp.kind, value) {
                    return Err(RunnerError::InvalidArgument(format!(
                        "预设的超参数 {} = {value} 不是 {} 类型",
                        hp.name, hp.kind
                    )));
                }
                // 原样保留：浮点超参数的整数预设值在运行名称中仍按整数书写
                Some(value.clone())
            }
            None => from_matches(hp, matches).or_else(|| hp.default.clone()),
        };
        let value = required(value, &hp.name)?;
        values.insert(hp.name.clone(), value);
    }
    Ok(values)
}

fn from_matches(hp: &HyperparameterSpec, matches: &ArgMatches) -> Option<HyperparameterValue> {
    let id = hp.name.as_str();
    match hp.kind {
        HyperparameterKind::Float => matches.get_one::<f64>(id).map(|v| HyperparameterValue::Float(*v)),
        HyperparameterKind::Int => matches.get_one::<i64>(id).map(|v| HyperparameterValue::Int(*v)),
        HyperparameterKind::Bool => matches.get_one::<bool>(id).map(|v| HyperparameterValue::Bool(*v)),
        HyperparameterKind::Str => matches
            .get_one::<String>(id)
            .map(|v| HyperparameterValue::Str(v.clone())),
    }
}

/// 预设值优先；没有预设时该参数一定已注册到命令上
fn pick<T>(preset: &Option<T>, matches: &ArgMatches, id: &str) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    match preset {
        Some(value) => Some(value.clone()),
        None => matches.get_one::<T>(id).cloned(),
    }
}

fn pick_many<T>(preset: &Option<Vec<T>>, matches: &ArgMatches, id: &str) -> Option<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
{
    match preset {
        Some(values) => Some(values.clone()),
        None => matches.get_many::<T>(id).map(|v| v.cloned().collect()),
    }
}

fn pick_flag(preset: Option<bool>, matches: &ArgMatches, id: &str) -> bool {
    preset.unwrap_or_else(|| matches.get_flag(id))
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, RunnerError> {
    value.ok_or_else(|| RunnerError::InvalidArgument(format!("缺少参数 {name}")))
}
