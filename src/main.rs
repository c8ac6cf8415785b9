use anyhow::{bail, Result};
use std::path::PathBuf;
use std::str::FromStr;

use math_router::error::ConfigError;
use math_router::utils::logging;
use math_router::{App, AppError, Config, EvaluatorKind, ProblemKind, SolverMode};

const USAGE: &str = concat!(
    "用法: math_router [--expression|--proof|--word] [--json] [--mode local|remote]\n",
    "                  [--evaluator symbolic|arithmetic|unsupported] <题目...>\n",
    "       math_router --batch <题目文件.toml>\n",
    "       math_router            (使用 PROBLEMS_FILE 批量求解)"
);

/// 命令行动作
#[derive(Debug, PartialEq)]
enum Command {
    Single {
        kind: ProblemKind,
        text: String,
        json: bool,
    },
    Batch(Option<PathBuf>),
}

/// 命令行参数，`mode` / `evaluator` 覆盖环境变量配置
#[derive(Debug)]
struct Cli {
    command: Command,
    mode: Option<SolverMode>,
    evaluator: Option<EvaluatorKind>,
}

fn flag_value<T>(iter: &mut impl Iterator<Item = String>, flag: &str) -> Result<T>
where
    T: FromStr<Err = ConfigError>,
{
    let Some(raw) = iter.next() else {
        bail!("{flag} 需要一个取值\n{USAGE}");
    };
    let value = raw.parse::<T>().map_err(AppError::from)?;
    Ok(value)
}

fn parse_args(args: Vec<String>) -> Result<Cli> {
    let mut kind = ProblemKind::Word;
    let mut json = false;
    let mut batch = None;
    let mut mode = None;
    let mut evaluator = None;
    let mut words = Vec::new();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--expression" => kind = ProblemKind::Expression,
            "--proof" => kind = ProblemKind::Proof,
            "--word" => kind = ProblemKind::Word,
            "--json" => json = true,
            "--mode" => mode = Some(flag_value(&mut iter, "--mode")?),
            "--evaluator" => evaluator = Some(flag_value(&mut iter, "--evaluator")?),
            "--batch" => match iter.next() {
                Some(path) => batch = Some(PathBuf::from(path)),
                None => bail!("--batch 需要一个文件路径\n{USAGE}"),
            },
            "-h" | "--help" => bail!("{USAGE}"),
            _ => words.push(arg),
        }
    }

    let command = match batch {
        Some(path) => Command::Batch(Some(path)),
        None if words.is_empty() => Command::Batch(None),
        None => Command::Single {
            kind,
            text: words.join(" "),
            json,
        },
    };

    Ok(Cli {
        command,
        mode,
        evaluator,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let mut config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    let cli = parse_args(std::env::args().skip(1).collect())?;
    if let Some(mode) = cli.mode {
        config.solver_mode = mode;
    }
    if let Some(evaluator) = cli.evaluator {
        config.evaluator = evaluator;
    }

    // 初始化并运行应用
    let app = App::initialize(config)?;

    match cli.command {
        Command::Single { kind, text, json } => {
            let outcome = app.solve_one(kind, &text).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{}", outcome.text);
            }
            if !outcome.succeeded {
                std::process::exit(1);
            }
        }
        Command::Batch(path) => {
            let stats = match path {
                Some(path) => app.run_file(&path).await?,
                None => app.run().await?,
            };
            if stats.failed > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
