//! ZCAG 命令行程序
//!
//! 读取形状文件，执行布尔运算并输出结果或查询信息。

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use zcag_core::area::Area;
use zcag_core::config::EngineConfig;
use zcag_core::rules::{self, OperationKind};
use zcag_file::{format_shape, open_document, save_document, ShapeDocument};

#[derive(Parser)]
#[command(name = "zcag")]
#[command(about = "Constructive area geometry on 2D shapes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Registered name of the default area rules
    #[arg(long, global = true)]
    rules: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a boolean operation to two shape files
    Combine {
        /// add, subtract, intersect or xor
        #[arg(long)]
        op: OperationKind,

        lhs: PathBuf,

        rhs: PathBuf,

        /// Output file (.shapes, .zcag or .json); prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the relationship between two shape files
    Relate { lhs: PathBuf, rhs: PathBuf },
    /// Print bounds, area and flags
    Info { file: PathBuf },
    /// Test whether a point lies inside
    Contains { file: PathBuf, x: f64, y: f64 },
}

/// 读取文件中的全部形状并求并集
fn load_area(path: &Path) -> Result<Area> {
    let document = open_document(path).with_context(|| format!("Failed to read {}", path.display()))?;
    document
        .union_area()
        .with_context(|| format!("Invalid geometry in {}", path.display()))
}

fn combine(op: OperationKind, lhs: &Path, rhs: &Path, output: Option<&Path>) -> Result<()> {
    let area = load_area(lhs)?;
    let other = load_area(rhs)?;
    area.enqueue(op, zcag_core::rules::Operand::Body(other.body()));
    info!("{} {} {}", lhs.display(), op, rhs.display());

    match output {
        Some(out) => {
            let mut document = ShapeDocument::new();
            document.metadata.title = format!("{op} result");
            document.add_shape("result", zcag_core::path::Path::from_source(&area, None));
            save_document(&document, out).with_context(|| format!("Failed to write {}", out.display()))?;
        }
        None => println!("{}", format_shape(&area)),
    }
    Ok(())
}

fn relate(lhs: &Path, rhs: &Path) -> Result<()> {
    let area = load_area(lhs)?;
    let other = load_area(rhs)?;
    println!("{}", area.relationship(None, &other, None));
    Ok(())
}

fn show_info(file: &Path) -> Result<()> {
    let area = load_area(file)?;
    let b = area.bounds();
    println!("bounds: {} {} {} {}", b.min.x, b.min.y, b.width(), b.height());
    println!("area: {}", area.area());
    println!("empty: {}", area.is_empty());
    println!("polygonal: {}", area.is_polygonal());
    println!("rectangular: {}", area.is_rectangular());
    println!("singular: {}", area.is_singular());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish(),
    )?;

    if let Some(name) = &cli.rules {
        rules::configure(EngineConfig::from_env().with_rules(name.as_str()))?;
    }

    match cli.command {
        Commands::Combine { op, lhs, rhs, output } => combine(op, &lhs, &rhs, output.as_deref()),
        Commands::Relate { lhs, rhs } => relate(&lhs, &rhs),
        Commands::Info { file } => show_info(&file),
        Commands::Contains { file, x, y } => {
            let area = load_area(&file)?;
            println!("{}", area.contains_point(x, y));
            Ok(())
        }
    }
}
