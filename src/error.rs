//! Error types for the analysis engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Invalid option detected while building an analysis
    #[error("Configuration error: {0}")]
    Config(String),

    /// The cluster partition does not cover every particle exactly once
    #[error("cluster partition covers {covered} particle slots, expected {expected}")]
    PartitionInvariant { covered: usize, expected: usize },

    /// A partition was built for a different particle count than the snapshot
    #[error("partition covers {partition} particles but the snapshot has {particles}")]
    PartitionMismatch { partition: usize, particles: usize },

    /// Requested snapshot does not exist
    #[error("snapshot {index} requested, scenario has {len}")]
    SnapshotOutOfRange { index: usize, len: usize },

    /// A contact names a particle that is not part of the snapshot
    #[error("contact ({i}, {j}) is outside the particle range 0..{n}")]
    ContactOutOfRange { i: usize, j: usize, n: usize },

    /// The spatial index was built with a cutoff that would miss neighbours
    #[error("spatial index cutoff {actual} is smaller than the required {required}")]
    IndexCutoff { required: f64, actual: f64 },
}

impl AnalysisError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        AnalysisError::Config(message.into())
    }
}
