use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 初始化命令行日志。`RUST_LOG`环境变量优先，否则按`verbose`选择级别
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "optbench=debug,info"
    } else {
        "optbench=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // 重复初始化（如多个集成测试共用进程）时忽略错误
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .try_init();
}
