use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::vocabulary_error::VocabularyError;

/// Stages of the crux pipeline in execution order.
/// Every stage after `CreateIndex` may consume the index it produces.
///
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PipelineStage {
    CreateIndex,
    SearchForMatches,
    ComputeQValues,
    Percolator,
    QRanker,
}

impl PipelineStage {
    /// All stages in execution order
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::CreateIndex,
        PipelineStage::SearchForMatches,
        PipelineStage::ComputeQValues,
        PipelineStage::Percolator,
        PipelineStage::QRanker,
    ];

    /// Crux subcommand
    pub fn subcommand(&self) -> &'static str {
        match self {
            PipelineStage::CreateIndex => "create-index",
            PipelineStage::SearchForMatches => "search-for-matches",
            PipelineStage::ComputeQValues => "compute-q-values",
            PipelineStage::Percolator => "percolator",
            PipelineStage::QRanker => "qranker",
        }
    }

    /// Human readable name
    pub fn label(&self) -> &'static str {
        match self {
            PipelineStage::CreateIndex => "Create index",
            PipelineStage::SearchForMatches => "Search for matches",
            PipelineStage::ComputeQValues => "Compute q-values",
            PipelineStage::Percolator => "Percolator",
            PipelineStage::QRanker => "Q-ranker",
        }
    }

    /// True for every stage which reads the index instead of producing it
    pub fn needs_index(&self) -> bool {
        !matches!(self, PipelineStage::CreateIndex)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PipelineStage {
    type Err = VocabularyError;

    /// Accepts the crux subcommand name
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        PipelineStage::ALL
            .iter()
            .copied()
            .find(|stage| stage.subcommand().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| VocabularyError::UnknownValueError("PipelineStage", value.to_string()))
    }
}

/// Outcome of a stage in the current run
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RunStatus {
    #[default]
    NotRun,
    Completed,
    Failed,
}

impl RunStatus {
    /// Maps a process exit code, zero is success
    ///
    /// # Arguments
    /// * `exit_code` - Exit code of the crux process
    ///
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::NotRun => "not-run",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunStatus {
    type Err = VocabularyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "not-run" => Ok(RunStatus::NotRun),
            "completed" => Ok(RunStatus::Completed),
            "failed" => Ok(RunStatus::Failed),
            _ => Err(VocabularyError::UnknownValueError(
                "RunStatus",
                value.to_string(),
            )),
        }
    }
}

/// One value per pipeline stage.
/// Backed by a `BTreeMap` so iteration follows the stage order.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageMap<T> {
    values: BTreeMap<PipelineStage, T>,
}

impl<T: Clone> StageMap<T> {
    /// Creates a map with the same value for every stage
    ///
    /// # Arguments
    /// * `value` - Value for all stages
    ///
    pub fn filled(value: T) -> Self {
        Self {
            values: PipelineStage::ALL
                .iter()
                .map(|stage| (*stage, value.clone()))
                .collect(),
        }
    }
}

impl<T: Copy + Default> StageMap<T> {
    pub fn get(&self, stage: PipelineStage) -> T {
        self.values.get(&stage).copied().unwrap_or_default()
    }
}

impl<T> StageMap<T> {
    pub fn set(&mut self, stage: PipelineStage, value: T) {
        self.values.insert(stage, value);
    }

    /// Iterates in stage order
    pub fn iter(&self) -> impl Iterator<Item = (&PipelineStage, &T)> {
        self.values.iter()
    }
}
