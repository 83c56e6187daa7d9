// std imports
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

// 3rd party imports
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, Level};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// internal imports
use crux_pilot::analysis::analysis_config::AnalysisConfig;
use crux_pilot::analysis::known_analyses::KnownAnalyses;
use crux_pilot::analysis::stage::{PipelineStage, RunStatus};
use crux_pilot::analysis::utils::sanatize_analysis_name;
use crux_pilot::configuration::Configuration;
use crux_pilot::pipeline::observer::TracingObserver;
use crux_pilot::pipeline::process::SystemProcessLauncher;
use crux_pilot::pipeline::runner::PipelineRunner;

/// Target for tracing
///
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum TracingTarget {
    File,
    Terminal,
    All,
}

/// Log rotation values for CLI
///
#[derive(clap::ValueEnum, Clone, Debug)]
enum TracingLogRotation {
    Minutely,
    Hourly,
    Daily,
    Never,
}

impl From<TracingLogRotation> for Rotation {
    fn from(rotation: TracingLogRotation) -> Self {
        match rotation {
            TracingLogRotation::Minutely => Rotation::MINUTELY,
            TracingLogRotation::Hourly => Rotation::HOURLY,
            TracingLogRotation::Daily => Rotation::DAILY,
            TracingLogRotation::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints a new configuration to stdout
    Config {},
    /// Creates a new analysis with default parameters
    New {
        /// Analysis name, also the directory name. Letters, digits, `-` and `_` only.
        name: String,
    },
    /// Lists the known analyses
    List {},
    /// Prints stages, run status and parameters of an analysis
    Show {
        /// Analysis name
        name: String,
    },
    /// Sets a parameter by its parameter file key, e.g. `enzyme trypsin` or `min-length 7`
    Set {
        /// Analysis name
        name: String,
        /// Parameter key
        key: String,
        /// Parameter value
        value: String,
    },
    /// Selects or deselects a stage or toggles its advanced parameters
    Stage {
        /// Analysis name
        name: String,
        /// Stage, the crux subcommand, e.g. `search-for-matches`
        stage: PipelineStage,
        /// Run the stage
        #[arg(short, long)]
        run: Option<bool>,
        /// Show advanced parameters of the stage
        #[arg(short, long)]
        advanced: Option<bool>,
    },
    /// Overrides the run status of a stage, e.g. to re-run a completed stage
    Status {
        /// Analysis name
        name: String,
        /// Stage, the crux subcommand
        stage: PipelineStage,
        /// `not-run`, `completed` or `failed`
        status: RunStatus,
    },
    /// Restores defaults of the whole analysis or a single stage
    Reset {
        /// Analysis name
        name: String,
        /// Only reset this stage
        #[arg(short, long)]
        stage: Option<PipelineStage>,
    },
    /// Checks if the analysis can be run
    Validate {
        /// Analysis name
        name: String,
    },
    /// Prints the crux parameter file of the analysis
    Params {
        /// Analysis name
        name: String,
    },
    /// Prints the crux command line of a stage
    Command {
        /// Analysis name
        name: String,
        /// Stage, the crux subcommand
        stage: PipelineStage,
    },
    /// Runs all selected stages which have not completed yet
    Run {
        /// Path to the crux executable, stored in the analysis
        #[arg(short, long)]
        tool: Option<PathBuf>,
        /// Analysis name
        name: String,
    },
}

#[derive(Debug, Parser)]
#[command(name = "crux-pilot")]
struct Cli {
    /// Verbosity level
    /// 0 - Error
    /// 1 - Warn
    /// 2 - Info
    /// 3 - Debug
    /// > 3 - Trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// How to log tracing. Can be used multiple times
    #[arg(short, long, value_enum, action = clap::ArgAction::Append, default_value = "terminal")]
    tracing_target: Vec<TracingTarget>,
    /// Tracing log file. Only used if `file` is set in `tracing_target`.
    #[arg(short, long, default_value = "./logs/crux-pilot.log")]
    file: PathBuf,
    /// Tracing log rotation. Only used if `file` is set in `tracing_target`.
    #[arg(short, long, value_enum, default_value = "never")]
    rotation: TracingLogRotation,
    /// Path to the configuration file, defaults are used if not given
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

/// Reads the configuration file or returns the default configuration
///
/// # Arguments
/// * `path` - Optional path to the configuration file
///
fn read_configuration(path: Option<&Path>) -> Result<Configuration> {
    match path {
        Some(path) => toml::from_str(
            &read_to_string(path)
                .with_context(|| format!("Reading config file `{}`", path.display()))?,
        )
        .context("Deserialize config"),
        None => Ok(Configuration::default()),
    }
}

/// Loads an analysis from the analyses directory
///
/// # Arguments
/// * `config` - Driver configuration
/// * `name` - Analysis name
///
fn load_analysis(config: &Configuration, name: &str) -> Result<AnalysisConfig> {
    AnalysisConfig::load(&config.analyses_dir, name)
        .with_context(|| format!("Loading analysis `{}`", name))
}

/// Saves the analysis if it has unsaved changes
///
fn save_analysis(analysis: &mut AnalysisConfig) -> Result<()> {
    if analysis.needs_saving() {
        analysis.save().context("Saving analysis")?;
    }
    Ok(())
}

/// Prints name, tool, stages and parameter file of the analysis
///
fn print_analysis(analysis: &AnalysisConfig) {
    println!("name: {}", analysis.name().unwrap_or_default());
    match analysis.path_to_tool() {
        Some(tool) => println!("crux: {}", tool.display()),
        None => println!("crux: <not set>"),
    }
    println!("protein source: {}", analysis.protein_source());
    println!("spectra source: {}", analysis.spectra_source());
    println!("verbosity: {}", analysis.verbosity());
    println!("output directory: {}", analysis.output_dir());
    println!("stages:");
    for stage in PipelineStage::ALL {
        println!(
            "\t{:<20} run: {:<5} advanced: {:<5} status: {}",
            stage.subcommand(),
            analysis.run_stage(stage),
            analysis.show_advanced(stage),
            analysis.run_status(stage)
        );
    }
    println!();
    print!("{}", analysis.render_parameter_file());
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    //// Set up tracing
    let verbosity = match args.verbose {
        0 => Level::ERROR,
        1 => Level::WARN,
        2 => Level::INFO,
        3 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(verbosity.into());

    // Tracing layers
    let mut tracing_terminal_layer = None;
    let mut tracing_file_layer = None;

    // Tracing guards, flushes the log file when dropped at the end of main
    let mut _tracing_log_writer_guard = None;

    if args.tracing_target.contains(&TracingTarget::Terminal)
        || args.tracing_target.contains(&TracingTarget::All)
    {
        tracing_terminal_layer =
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    }

    if args.tracing_target.contains(&TracingTarget::File)
        || args.tracing_target.contains(&TracingTarget::All)
    {
        let log_dir = args
            .file
            .parent()
            .context("Log file has no parent directory")?;
        let log_file_name = args.file.file_name().context("Log file has no file name")?;
        let file_appender = RollingFileAppender::new(args.rotation.into(), log_dir, log_file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        tracing_file_layer = Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking),
        );
        _tracing_log_writer_guard = Some(guard);
    }

    tracing_subscriber::registry()
        .with(tracing_terminal_layer)
        .with(tracing_file_layer)
        .with(filter)
        .init();

    let config = read_configuration(args.config.as_deref())?;
    debug!("Analyses directory: {}", config.analyses_dir.display());

    match args.command {
        Commands::Config {} => {
            let new_config = Configuration::new();
            println!("{}", toml::to_string_pretty(&new_config)?);
        }
        Commands::New { name } => {
            let sanatized_name = sanatize_analysis_name(&name);
            if sanatized_name != name {
                bail!(
                    "`{}` is not usable as analysis name, try `{}`",
                    name,
                    sanatized_name
                );
            }
            let mut analysis = AnalysisConfig::create(&config.analyses_dir, &name)
                .with_context(|| format!("Creating analysis `{}`", name))?;
            if let Some(crux_path) = config.crux_path.as_ref() {
                analysis.set_path_to_tool(Some(crux_path.clone()));
                save_analysis(&mut analysis)?;
            }
            println!(
                "Created {}",
                analysis
                    .analysis_dir()
                    .unwrap_or_default()
                    .display()
            );
        }
        Commands::List {} => {
            let known_analyses =
                KnownAnalyses::load(&config.analyses_dir).context("Loading known analyses")?;
            for name in known_analyses.names() {
                println!("{}", name);
            }
        }
        Commands::Show { name } => {
            let analysis = load_analysis(&config, &name)?;
            print_analysis(&analysis);
        }
        Commands::Set { name, key, value } => {
            let mut analysis = load_analysis(&config, &name)?;
            analysis
                .set_parameter(&key, &value)
                .with_context(|| format!("Setting `{}`", key))?;
            save_analysis(&mut analysis)?;
        }
        Commands::Stage {
            name,
            stage,
            run,
            advanced,
        } => {
            let mut analysis = load_analysis(&config, &name)?;
            if let Some(run) = run {
                analysis.set_run_stage(stage, run);
            }
            if let Some(advanced) = advanced {
                analysis.set_show_advanced(stage, advanced);
            }
            save_analysis(&mut analysis)?;
            println!(
                "{}: run {}, advanced {}",
                stage.subcommand(),
                analysis.run_stage(stage),
                analysis.show_advanced(stage)
            );
        }
        Commands::Status {
            name,
            stage,
            status,
        } => {
            let mut analysis = load_analysis(&config, &name)?;
            analysis.set_run_status(stage, status);
            // run status alone does not mark the analysis as changed
            analysis.save().context("Saving analysis")?;
        }
        Commands::Reset { name, stage } => {
            let mut analysis = load_analysis(&config, &name)?;
            match stage {
                Some(stage) => analysis.restore_stage_defaults(stage),
                None => analysis.restore_defaults(),
            }
            save_analysis(&mut analysis)?;
        }
        Commands::Validate { name } => {
            let analysis = load_analysis(&config, &name)?;
            analysis
                .validate_with(&config.validation_policy())
                .with_context(|| format!("Analysis `{}` is not valid", name))?;
            println!("Analysis `{}` is valid", name);
        }
        Commands::Params { name } => {
            let analysis = load_analysis(&config, &name)?;
            print!("{}", analysis.render_parameter_file());
        }
        Commands::Command { name, stage } => {
            let analysis = load_analysis(&config, &name)?;
            match analysis
                .build_command(stage)
                .with_context(|| format!("Building command for {}", stage))?
            {
                Some(argv) => println!("{}", argv.join(" ")),
                None => println!(
                    "{} is not selected or already completed",
                    stage.subcommand()
                ),
            }
        }
        Commands::Run { tool, name } => {
            let mut analysis = load_analysis(&config, &name)?;
            match (tool, config.crux_path.as_ref()) {
                (Some(tool), _) => analysis.set_path_to_tool(Some(tool)),
                (None, Some(crux_path)) if analysis.path_to_tool().is_none() => {
                    analysis.set_path_to_tool(Some(crux_path.clone()))
                }
                _ => (),
            }
            save_analysis(&mut analysis)?;

            let runner = PipelineRunner::new(SystemProcessLauncher, config.validation_policy());
            let report = runner
                .run(&mut analysis, &TracingObserver)
                .await
                .with_context(|| format!("Running analysis `{}`", name))?;
            analysis.save().context("Saving run status")?;

            for outcome in report.executed.iter() {
                println!("{}: {}", outcome.stage.subcommand(), outcome.status);
            }
            if let Some(stage) = report.halted_at {
                bail!("Run halted at {}", stage);
            }
            info!("Analysis `{}` finished", name);
        }
    }

    Ok(())
}
