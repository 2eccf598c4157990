use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coderbot::commands::{self, AnalyzeArgs, Context, GenerateArgs, StoriesArgs};
use coderbot::config::Config;

#[derive(Parser)]
#[command(name = "coderbot")]
#[command(about = "Generate code, tests, documentation and stories from plain-text requirements")]
struct Cli {
    /// Path to a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Simulated work delay in milliseconds (overrides config)
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code, unit tests and/or docs from a story file
    Generate(GenerateArgs),
    /// Generate unit tests and/or docs from a source directory
    Analyze(AnalyzeArgs),
    /// Generate a story breakdown for an epic
    Stories(StoriesArgs),
}

/// Initialize tracing on stderr so stdout carries only the report
fn init_tracing(verbose: bool) {
    let default = if verbose { "coderbot=debug" } else { "coderbot=info" };
    let filter =
        tracing_subscriber::EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> coderbot::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(ms) = cli.delay_ms {
        config.delay_ms = ms;
    }
    let ctx = Context::system(config);
    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::Generate(args) => {
            commands::generate(&ctx, &args, &mut stdout).await?;
        }
        Commands::Analyze(args) => {
            commands::analyze(&ctx, &args, &mut stdout).await?;
        }
        Commands::Stories(args) => {
            commands::stories(&ctx, &args, &mut stdout).await?;
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Usage errors exit with 1 like every other handled failure
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind(), "run failed");
            println!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
