use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use optbench::data::{DataSetConfig, DataSetKind, summarize};
use optbench::docs::{parse_index_page, render_index_page};
use optbench::runner::{
    HyperparameterSpec, RunPreset, RunnerError, get_arguments, make_run_name,
};
use optbench::utils::logger;

#[derive(Parser, Debug)]
#[command(name = "optbench", version, about = "优化器基准测试的数据集与运行工具")]
struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 列出已注册的数据集
    List,

    /// 数据集文档索引页
    Docs {
        #[command(subcommand)]
        command: DocsCommand,
    },

    /// 构造一个数据集并以 JSON 打印各切分的样本数与批次数
    Inspect {
        dataset: String,
        /// TOML 配置文件
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        batch_size: Option<usize>,
        /// 缺失文件时下载（仅 mnist、fmnist）
        #[arg(long)]
        download: bool,
        #[arg(long)]
        seed: Option<u64>,
    },

    /// 打印一次运行的结果目录名与文件名，其后的参数按运行参数解析
    RunName {
        #[arg(long, default_value = "optimizer")]
        optimizer: String,
        /// 超参数定义（JSON 数组，元素形如 {"name": "momentum", "kind": "float"}）
        #[arg(long)]
        hyperparams: Option<PathBuf>,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum DocsCommand {
    /// 按注册表生成索引页
    Render {
        /// 写入文件；缺省输出到标准输出
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 检查已有索引页：声明数量与目录是否一致、条目是否均已注册
    Check { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);
    tracing::debug!("命令行参数: {:?}", cli);

    match cli.command {
        Commands::List => {
            for kind in DataSetKind::ALL {
                println!("{:<10} {}", kind.name(), kind.description());
            }
        }
        Commands::Docs { command } => run_docs(command)?,
        Commands::Inspect {
            dataset,
            config,
            data_dir,
            batch_size,
            download,
            seed,
        } => {
            let kind: DataSetKind = dataset.parse()?;
            let mut config = match config {
                Some(path) => DataSetConfig::from_toml_file(&path)
                    .with_context(|| format!("读取配置 {} 失败", path.display()))?,
                None => DataSetConfig::default(),
            };
            if let Some(dir) = data_dir {
                config.data_dir = Some(dir);
            }
            if let Some(batch_size) = batch_size {
                config.batch_size = batch_size;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            config.download |= download;

            tracing::info!(dataset = %kind, "正在构造数据集");
            let data = kind.build(&config)?;
            println!("{}", serde_json::to_string_pretty(&summarize(&data))?);
        }
        Commands::RunName {
            optimizer,
            hyperparams,
            args,
        } => {
            let specs: Vec<HyperparameterSpec> = match hyperparams {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("读取 {} 失败", path.display()))?;
                    serde_json::from_str(&text)?
                }
                None => Vec::new(),
            };
            let argv = std::iter::once("run-name".to_string()).chain(args);
            let run_args = match get_arguments(&optimizer, &specs, &RunPreset::default(), argv) {
                Err(RunnerError::Cli(e)) => e.exit(),
                other => other?,
            };
            let (folder, file) = make_run_name(&run_args)?;
            println!(
                "{}",
                run_args
                    .output_dir
                    .join(&run_args.testproblem)
                    .join(&optimizer)
                    .join(folder)
                    .join(format!("{file}.json"))
                    .display()
            );
        }
    }

    Ok(())
}

fn run_docs(command: DocsCommand) -> anyhow::Result<()> {
    match command {
        DocsCommand::Render { output } => {
            let page = render_index_page(&DataSetKind::ALL);
            match output {
                Some(path) => {
                    std::fs::write(&path, page)?;
                    tracing::info!("索引页已写入 {}", path.display());
                }
                None => print!("{page}"),
            }
        }
        DocsCommand::Check { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("读取 {} 失败", file.display()))?;
            let page = parse_index_page(&text)?;
            println!("标题: {}", page.title);
            println!("目录条目 ({}): {}", page.entries.len(), page.entry_names().join(", "));

            let mut problems = Vec::new();
            if let Err(e) = page.check_consistency() {
                problems.push(e.to_string());
            }
            if let Err(e) = page.check_against_registry() {
                problems.push(e.to_string());
            }
            let missing = page.missing_from_registry();
            if !missing.is_empty() {
                problems.push(format!("目录缺少已注册的数据集: {}", missing.join(", ")));
            }

            if !problems.is_empty() {
                for problem in &problems {
                    eprintln!("❌ {problem}");
                }
                bail!("{} 存在 {} 处问题", file.display(), problems.len());
            }
            println!("✅ 索引页与注册表一致");
        }
    }
    Ok(())
}
