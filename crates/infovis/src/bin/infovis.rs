use clap::{Args, Parser, Subcommand, ValueEnum};
use infovis::core::{ReferenceModel, ReferenceModelSpec};
use infovis::replay_file;
use log::LevelFilter;
use std::path::PathBuf;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "infovis")]
#[command(about = "Replay AR measurement sessions and inspect reference models")]
#[command(version)]
struct Cli {
    /// Log verbosity.
    #[arg(long, value_enum, default_value_t = LogLevelArg::Info, global = true)]
    log_level: LogLevelArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON session script and write a report.
    Replay(ReplayArgs),

    /// Print the reference model as JSON.
    ModelInfo {
        /// Model points file (JSON `{ "points": [[x, y, z], ...] }`); the unit square when omitted.
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct ReplayArgs {
    /// Path to the session script (JSON).
    #[arg(long)]
    script: PathBuf,

    /// Path to write the report (JSON); overrides the script's `output_path`.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(value: LogLevelArg) -> Self {
        match value {
            LogLevelArg::Off => LevelFilter::Off,
            LogLevelArg::Error => LevelFilter::Error,
            LogLevelArg::Warn => LevelFilter::Warn,
            LogLevelArg::Info => LevelFilter::Info,
            LogLevelArg::Debug => LevelFilter::Debug,
            LogLevelArg::Trace => LevelFilter::Trace,
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(level: LevelFilter) -> CliResult<()> {
    infovis::core::init_tracing(false, level);
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: LevelFilter) -> CliResult<()> {
    infovis::core::init_with_level(level)?;
    Ok(())
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.into())?;

    match cli.command {
        Commands::Replay(args) => run_replay(&args),
        Commands::ModelInfo { model } => run_model_info(model),
    }
}

fn run_replay(args: &ReplayArgs) -> CliResult<()> {
    let (report, out_path) = replay_file(&args.script, args.out.as_deref())?;
    println!(
        "frames: {}, confirmed markers: {}, highlight visible: {}, overlay placed: {}",
        report.frames.len(),
        report.confirmed_markers,
        report.highlight_visible,
        report.overlay.is_some()
    );
    println!("report: {}", out_path.display());
    Ok(())
}

fn run_model_info(path: Option<PathBuf>) -> CliResult<()> {
    let model = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            let spec: ReferenceModelSpec = serde_json::from_str(&raw)?;
            ReferenceModel::from_spec(&spec)?
        }
        None => ReferenceModel::unit_square(),
    };
    println!("points: {}", model.point_count());
    println!("{}", serde_json::to_string_pretty(&model.to_spec())?);
    Ok(())
}
