use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;

use without_rowid::annotation::AnnotationReader;
use without_rowid::config::Config;
use without_rowid::rewrite::rewrite_file;
use without_rowid::utils::logging;

/// Mark annotated tables in a generated SQL schema as WITHOUT ROWID
#[derive(Parser, Debug)]
#[clap(version, author = "GraphDB Contributors")]
struct Cli {
    /// Annotation source containing `// WITHOUT-ROWID: <table>` lines
    schema: PathBuf,
    /// Generated SQL file to rewrite; the result goes to stdout
    sql_file: PathBuf,
    /// TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Fail when a CREATE TABLE block is still open at end of input
    #[clap(long)]
    strict: bool,
    /// Log specification, e.g. `info` or `without_rowid=debug`
    #[clap(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                // 参数错误：用法写到标准错误，退出码 1
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => Config::default(),
    };
    if cli.strict {
        config.strict = true;
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }

    logging::init(&config.log)?;
    // 错误由 main 的返回值统一输出到标准错误
    let result = run(&cli, &config);
    logging::shutdown();
    result
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    let reader = AnnotationReader::with_marker(&config.marker)?;
    let annotations = reader
        .read_file(&cli.schema)
        .with_context(|| format!("读取注释文件失败: {}", cli.schema.display()))?;
    eprintln!("WITHOUT-ROWID: {}", annotations);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = rewrite_file(&cli.sql_file, &annotations, &mut out)
        .with_context(|| format!("改写 SQL 文件失败: {}", cli.sql_file.display()))?;

    if config.strict {
        summary.ensure_terminated()?;
    }
    Ok(())
}
