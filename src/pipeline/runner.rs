// 3rd party imports
use tracing::{debug, error, info};

// internal imports
use crate::{
    analysis::{
        analysis_config::AnalysisConfig,
        stage::{PipelineStage, RunStatus},
        validation::ValidationPolicy,
    },
    errors::run_error::RunError,
    pipeline::{observer::RunObserver, process::ProcessLauncher},
};

/// Outcome of one executed stage
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOutcome {
    pub stage: PipelineStage,
    pub status: RunStatus,
    /// `None` if the process could not be launched or waited for
    pub exit_code: Option<i32>,
}

/// Summary of a pipeline run
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Stages which were launched, in execution order
    pub executed: Vec<StageOutcome>,
    /// Stage which stopped the run
    pub halted_at: Option<PipelineStage>,
}

impl RunReport {
    /// True if no stage stopped the run
    pub fn is_success(&self) -> bool {
        self.halted_at.is_none()
    }
}

/// Runs the selected stages of an analysis one after another.
///
/// Stages which are deselected or already completed are skipped,
/// the first failing stage stops the run. Statuses are written to the
/// analysis, the caller saves it afterwards.
///
/// # Generics
/// * `L` - Process launcher
///
pub struct PipelineRunner<L>
where
    L: ProcessLauncher,
{
    launcher: L,
    policy: ValidationPolicy,
}

impl<L> PipelineRunner<L>
where
    L: ProcessLauncher,
{
    /// Creates a new runner
    ///
    /// # Arguments
    /// * `launcher` - Starts the crux processes
    /// * `policy` - Validation policy checked before the run
    ///
    pub fn new(launcher: L, policy: ValidationPolicy) -> Self {
        Self { launcher, policy }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Runs the pipeline.
    /// Refuses to start if the analysis has unsaved changes, no crux path or
    /// is not valid. Writes the parameter file before the first stage.
    ///
    /// # Arguments
    /// * `config` - Analysis to run, receives the run statuses
    /// * `observer` - Receives the progress
    ///
    pub async fn run<O>(
        &self,
        config: &mut AnalysisConfig,
        observer: &O,
    ) -> Result<RunReport, RunError>
    where
        O: RunObserver + ?Sized,
    {
        if config.needs_saving() {
            return Err(RunError::UnsavedChangesError);
        }
        if config.path_to_tool().is_none() {
            return Err(RunError::MissingToolPathError);
        }
        config
            .validate_with(&self.policy)
            .map_err(RunError::InvalidAnalysisError)?;
        config
            .write_parameter_file()
            .map_err(RunError::ParameterFileError)?;

        info!("Running analysis `{}`", config.display_name());
        let mut report = RunReport::default();

        for stage in PipelineStage::ALL {
            let argv = match config.build_command(stage) {
                Ok(Some(argv)) => argv,
                Ok(None) => {
                    debug!("Skipping {} ({})", stage, config.run_status(stage));
                    continue;
                }
                Err(err) => {
                    error!("Unable to build command for {}: {}", stage, err);
                    report.halted_at = Some(stage);
                    break;
                }
            };

            observer.stage_started(stage, &argv);
            let (status, exit_code) = match self.launcher.launch(&argv) {
                Ok(mut process) => {
                    while let Some(line) = process.output.recv().await {
                        observer.output_line(stage, &line);
                    }
                    match process.exit.await {
                        Ok(Ok(exit_code)) => (RunStatus::from_exit_code(exit_code), Some(exit_code)),
                        Ok(Err(err)) => {
                            error!("Unable to wait for {}: {}", stage, err);
                            (RunStatus::Failed, None)
                        }
                        Err(err) => {
                            error!("Unable to wait for {}: {}", stage, err);
                            (RunStatus::Failed, None)
                        }
                    }
                }
                Err(err) => {
                    error!("Unable to launch {}: {}", stage, err);
                    observer.launch_failed(stage, &err);
                    (RunStatus::Failed, None)
                }
            };

            config.set_run_status(stage, status);
            observer.stage_finished(stage, status, exit_code);
            report.executed.push(StageOutcome {
                stage,
                status,
                exit_code,
            });

            if status == RunStatus::Failed {
                error!("{} failed, skipping remaining stages", stage);
                report.halted_at = Some(stage);
                break;
            }
            info!("{} completed", stage);
        }

        observer.run_finished(config, &report);
        Ok(report)
    }
}
