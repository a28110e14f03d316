use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use cf_component::Registry;
use cf_model::{CompositeModel, Settings};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "cosimflow")]
#[command(about = "cosimflow - co-simulation of coupled simulation units", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a composite model description
    Validate {
        /// Path to the description (YAML or JSON)
        description: PathBuf,
    },
    /// Print instances, settings and update order
    Describe {
        /// Path to the description (YAML or JSON)
        description: PathBuf,
    },
    /// Initialize, simulate and terminate a composite model
    Run {
        /// Path to the description (YAML or JSON)
        description: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Write the dependency graphs as Graphviz files
    ExportGraph {
        /// Path to the description (YAML or JSON)
        description: PathBuf,
        /// Output prefix; `_initialization.dot` and `_simulation.dot` are appended
        #[arg(short, long)]
        prefix: Option<String>,
    },
    /// List the models available to `model_file`
    Models,
}

#[derive(Args, Default)]
struct Overrides {
    /// YAML file with experiment settings replacing the description's
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Result file (.csv or .jsonl)
    #[arg(short, long)]
    result_file: Option<PathBuf>,
    /// Start time in seconds
    #[arg(long)]
    start: Option<f64>,
    /// Stop time in seconds
    #[arg(long)]
    stop: Option<f64>,
    /// Relative tolerance
    #[arg(long)]
    tolerance: Option<f64>,
    /// Communication interval in seconds
    #[arg(long)]
    interval: Option<f64>,
    /// Record only signals whose `instance.variable` name matches this regex
    #[arg(long)]
    filter: Option<String>,
}

impl Overrides {
    fn apply(&self, mut settings: Settings) -> CliResult<Settings> {
        if let Some(path) = &self.settings {
            let content = std::fs::read_to_string(path)?;
            settings = serde_yaml::from_str(&content)?;
        }
        if let Some(path) = &self.result_file {
            settings.result_file = Some(path.clone());
        }
        if let Some(start) = self.start {
            settings.start_time = start;
        }
        if let Some(stop) = self.stop {
            settings.stop_time = stop;
        }
        if let Some(tolerance) = self.tolerance {
            settings.tolerance = tolerance;
        }
        if let Some(interval) = self.interval {
            settings.communication_interval = interval;
        }
        if let Some(filter) = &self.filter {
            settings.variable_filter = Some(filter.clone());
        }
        debug!("effective settings: {settings:?}");
        Ok(settings)
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { description } => cmd_validate(&description),
        Commands::Describe { description } => cmd_describe(&description),
        Commands::Run {
            description,
            overrides,
        } => cmd_run(&description, &overrides),
        Commands::ExportGraph {
            description,
            prefix,
        } => cmd_export_graph(&description, prefix),
        Commands::Models => cmd_models(),
    }
}

fn cmd_validate(description: &Path) -> CliResult<()> {
    println!("Validating description: {}", description.display());
    let def = cf_project::load(description)?;
    println!(
        "✓ Description is valid ({} submodels, {} connections)",
        def.submodels.len(),
        def.connections.len()
    );
    Ok(())
}

fn cmd_describe(description: &Path) -> CliResult<()> {
    let model = CompositeModel::load(description)?;
    print!("{}", model.describe());
    Ok(())
}

fn cmd_run(description: &Path, overrides: &Overrides) -> CliResult<()> {
    let mut model = CompositeModel::load(description)?;
    let settings = overrides.apply(model.settings().clone())?;
    model.set_settings(settings)?;

    let s = model.settings();
    println!("Running {}", model.name());
    println!(
        "  t = {} .. {} s, interval = {} s, tolerance = {:e}",
        s.start_time, s.stop_time, s.communication_interval, s.tolerance
    );

    let started = Instant::now();
    model.initialize()?;
    let outcome = model.simulate();
    let time = model.current_time().unwrap_or(f64::NAN);
    if let Err(e) = &outcome {
        error!("{}: simulation stopped at t={time}: {e}", model.name());
    }
    // Terminate even after a failed step so the result file is closed.
    model.terminate()?;
    outcome?;

    println!(
        "✓ Simulation completed at t = {time} in {:.3} s",
        started.elapsed().as_secs_f64()
    );
    match &model.settings().result_file {
        Some(path) => println!("  Results: {}", path.display()),
        None => println!("  Results: not recorded"),
    }
    Ok(())
}

fn cmd_export_graph(description: &Path, prefix: Option<String>) -> CliResult<()> {
    let model = CompositeModel::load(description)?;
    let prefix = prefix.unwrap_or_else(|| model.name().to_string());
    let (initialization, simulation) = model.export_dependency_graph(&prefix)?;
    println!("✓ Wrote {}", initialization.display());
    println!("✓ Wrote {}", simulation.display());
    Ok(())
}

fn cmd_models() -> CliResult<()> {
    println!("Available models:");
    for path in Registry::with_builtins().paths() {
        println!("  {path}");
    }
    Ok(())
}
