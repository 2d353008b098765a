//! # exprplot
//!
//! 表达式采样工具 - 在数值区间上求值表达式，输出 (x, y) 采样点。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p host-cli -- "x^2-3"
//! cargo run -p host-cli -- "sqrt(x)" --lower 0 --upper 10 --step 0.5 --format json
//! cargo run -p host-cli -- "-x^3" --strategy shunting_yard --show-tree
//! cargo run -p host-cli -- --config sampler.json
//! # 省略表达式时从标准输入读取
//! cargo run -p host-cli
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use expr_runtime::{Session, Strategy};
use host_cli::{OutputFormat, Overrides, SamplerConfig, render, sample};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "exprplot")]
#[command(about = "表达式采样工具 - 在数值区间上求值表达式")]
#[command(version)]
struct Cli {
    /// 表达式（省略时从标准输入读取）
    #[arg(allow_hyphen_values = true)]
    expression: Option<String>,

    /// 配置文件（JSON）
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 区间下界（包含，默认：-100）
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<f64>,

    /// 区间上界（不包含，默认：100）
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<f64>,

    /// 采样步长（默认：1）
    #[arg(long)]
    step: Option<f64>,

    /// 自变量名（默认：x）
    #[arg(long = "var")]
    variable: Option<String>,

    /// 解析策略：recursive / shunting_yard
    #[arg(long)]
    strategy: Option<Strategy>,

    /// 输出格式：table / json
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// 在标准错误输出表达式树
    #[arg(long)]
    show_tree: bool,

    /// 日志详细程度（-v info，-vv debug，-vvv trace）
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let log_level = match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        };
        Overrides {
            lower: self.lower,
            upper: self.upper,
            step: self.step,
            variable: self.variable.clone(),
            strategy: self.strategy,
            format: self.format,
            log_level: log_level.map(str::to_string),
        }
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("exprplot error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SamplerConfig::load_required(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => SamplerConfig::default(),
    };
    config.apply(cli.overrides());
    config.validate()?;

    init_logging(&config.log_level)?;
    debug!(config = ?config, "配置已加载");

    let expression = match cli.expression {
        Some(text) => text,
        None => prompt_expression()?,
    };

    let mut session = Session::with_options(config.compile.clone());
    session.environment_mut().declare(config.variable.as_str());

    let tree = session
        .compile(&expression)
        .with_context(|| format!("无法编译表达式 '{expression}'"))?;
    if cli.show_tree {
        eprintln!("{tree}");
    }
    if !tree.references().contains(config.variable.as_str()) {
        info!(variable = %config.variable, "表达式不含自变量，所有采样点相同");
    }

    let samples = sample(&mut session, &tree, &config);
    info!(count = samples.len(), strategy = %config.compile.strategy, "采样完成");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&samples, config.format, &mut out).context("写入输出失败")?;
    out.flush()?;
    Ok(())
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let level: tracing::Level = level
        .parse()
        .map_err(|_| anyhow::anyhow!("未知日志级别 '{level}'"))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn prompt_expression() -> anyhow::Result<String> {
    eprint!("Enter the equation: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("读取标准输入失败")?;

    let line = line.trim().to_string();
    if line.is_empty() {
        anyhow::bail!("表达式为空");
    }
    Ok(line)
}
