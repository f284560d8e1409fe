// apps/mp_cli/src/main.rs

//! mptrack 命令行界面
//!
//! 在已求解的稳态流场中追踪无质量粒子。
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：
//! - 通过 `TrackConfig` 读取配置，`load_case` 读取算例
//! - 追踪由 `TrackingSession` 完成，结果由 `ResultEmitter` 写出
//! - 各层错误在命令边界转换为 `MpError`，决定进程退出码

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mp_foundation::{MpError, EXIT_FAILURE};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// mptrack 无质量粒子追踪命令行工具
#[derive(Parser)]
#[command(name = "mp_cli")]
#[command(author = "mptrack Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Massless particle tracking on steady unstructured flow fields", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 追踪粒子
    Track(commands::track::TrackArgs),
    /// 显示算例信息
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
    /// 生成演示算例
    Demo(commands::demo::DemoArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("错误: {:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // 初始化日志
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 执行命令
    match cli.command {
        Commands::Track(args) => commands::track::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Demo(args) => commands::demo::execute(args),
    }
}

/// 错误链中第一个 `MpError` 的退出码，没有则为 [`EXIT_FAILURE`]
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<MpError>())
        .map_or(EXIT_FAILURE, MpError::exit_code)
}
