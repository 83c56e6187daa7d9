// std imports
use std::io::Error as IoError;

// 3rd party imports
use tracing::{error, info};

// internal imports
use crate::{
    analysis::{
        analysis_config::AnalysisConfig,
        stage::{PipelineStage, RunStatus},
    },
    pipeline::{
        process::{OutputLine, OutputStream},
        runner::RunReport,
    },
};

/// Receives progress of a pipeline run, e.g. to display it.
/// All callbacks default to doing nothing.
///
pub trait RunObserver {
    /// A stage is about to be launched
    fn stage_started(&self, _stage: PipelineStage, _argv: &[String]) {}

    /// The running stage printed a line
    fn output_line(&self, _stage: PipelineStage, _line: &OutputLine) {}

    /// The stage could not be launched, it counts as failed
    fn launch_failed(&self, _stage: PipelineStage, _error: &IoError) {}

    /// The stage ended, `exit_code` is `None` if no exit code is known
    fn stage_finished(&self, _stage: PipelineStage, _status: RunStatus, _exit_code: Option<i32>) {}

    /// The run ended, completely or halted, with the final state of the analysis
    fn run_finished(&self, _config: &AnalysisConfig, _report: &RunReport) {}
}

/// Ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Forwards the run progress to the log
///
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn stage_started(&self, stage: PipelineStage, argv: &[String]) {
        info!("{} started: {}", stage, argv.join(" "));
    }

    fn output_line(&self, stage: PipelineStage, line: &OutputLine) {
        // crux reports its progress on stderr
        let stream = match line.stream {
            OutputStream::Stdout => "stdout",
            OutputStream::Stderr => "stderr",
        };
        info!(stage = stage.subcommand(), stream, "{}", line.line);
    }

    fn launch_failed(&self, stage: PipelineStage, error: &IoError) {
        error!("{} could not be launched: {}", stage, error);
    }

    fn stage_finished(&self, stage: PipelineStage, status: RunStatus, exit_code: Option<i32>) {
        match status {
            RunStatus::Completed => info!("{} completed", stage),
            _ => error!("{} {} (exit code {:?})", stage, status, exit_code),
        }
    }

    fn run_finished(&self, config: &AnalysisConfig, report: &RunReport) {
        match report.halted_at {
            Some(stage) => error!(
                "Run of `{}` halted at {}",
                config.display_name(),
                stage
            ),
            None => info!(
                "Run of `{}` finished, {} stage(s) executed",
                config.display_name(),
                report.executed.len()
            ),
        }
        for stage in PipelineStage::ALL {
            info!("\t{}: {}", stage, config.run_status(stage));
        }
    }
}
