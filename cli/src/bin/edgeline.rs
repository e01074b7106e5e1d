use clap::{Parser, Subcommand};
use cli::{CliError, SessionScript};
use session::{CommandOutcome, DrawingSession, InMemorySurface, SessionCommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a command script against a fresh session
    Run {
        /// Path to the TOML or JSON script file
        #[arg(short, long)]
        script: PathBuf,
        /// Write the final polyline generation as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Trace a single image and print its polylines as JSON
    Trace {
        /// Path to the input image file
        #[arg(short, long)]
        input: PathBuf,
        /// Low Canny hysteresis threshold
        #[arg(long, default_value = "70.0")]
        low: f32,
        /// High Canny hysteresis threshold
        #[arg(long, default_value = "150.0")]
        high: f32,
        /// Write the polylines to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the JSON schema of the session command surface
    Schema,
}

fn main() -> ExitCode {
    let _ = color_eyre::install();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run { script, output } => run_script(script, output.as_deref()),
        Commands::Trace {
            input,
            low,
            high,
            output,
        } => trace_image(input, *low, *high, output.as_deref()),
        Commands::Schema => print_schema(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run_script(script_path: &Path, output: Option<&Path>) -> Result<(), CliError> {
    let script = SessionScript::from_file(script_path)?;
    if let Some(description) = &script.description {
        info!("Running script: {description}");
    }

    let mut session = DrawingSession::new(InMemorySurface::new());
    for command in script.commands {
        match session.execute(command)? {
            CommandOutcome::Bound { description } => info!("Bound {description}"),
            CommandOutcome::Advanced(outcome) => info!("Advance: {outcome:?}"),
            CommandOutcome::ThresholdsSet(pair) => {
                info!("Thresholds set to ({}, {})", pair.low, pair.high)
            }
            CommandOutcome::Cleared { removed } => info!("Cleared {removed} polylines"),
            CommandOutcome::Closed => info!("Session closed"),
        }
    }

    if let Some(output) = output {
        let snapshot = session.surface().snapshot();
        std::fs::write(output, serde_json::to_string_pretty(&snapshot)?)?;
        info!("Wrote {} polylines to {}", snapshot.len(), output.display());
    }
    Ok(())
}

fn trace_image(input: &Path, low: f32, high: f32, output: Option<&Path>) -> Result<(), CliError> {
    let mut session = DrawingSession::new(InMemorySurface::new());
    session.set_thresholds(low, high)?;
    session.execute(SessionCommand::BindImage {
        path: input.to_string_lossy().to_string(),
    })?;
    session.advance()?;

    let snapshot = session.surface().snapshot();
    info!(
        "Traced {} polylines from {}",
        snapshot.len(),
        input.display()
    );

    let json = serde_json::to_string_pretty(&snapshot)?;
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn print_schema() -> Result<(), CliError> {
    let schema = SessionCommand::schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
