//! Error taxonomy for the route pipeline.
//!
//! Provider, solver and materialization errors are scoped to a single patrol
//! group and end up in [`RouteError`]. Configuration errors abort the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::location::GroupId;

/// The external matrix or directions call did not return usable data.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Transport failures, rate limiting and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Http(_) => true,
            ProviderError::Api { status, .. } => *status == 429 || *status >= 500,
            ProviderError::MalformedResponse(_) => false,
        }
    }
}

/// No usable matrix, or a matrix the solver cannot route over.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("malformed duration matrix: {0}")]
    MalformedMatrix(String),

    #[error("matrix has {actual} rows but the group has {expected} locations")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("origin {origin} is outside a matrix of size {size}")]
    OriginOutOfRange { origin: usize, size: usize },
}

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("tour for group {group} does not index its {size} locations: {reason}")]
    TourMismatch {
        group: GroupId,
        size: usize,
        reason: String,
    },
}

/// Malformed or missing static location data. Fatal to the whole run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse location data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("location set is empty")]
    Empty,

    #[error("location {name:?} has invalid coordinates")]
    InvalidCoordinate { name: String },

    #[error("location name {name:?} appears more than once in group {group}")]
    DuplicateName { name: String, group: GroupId },

    #[error("configured group {0} has no locations")]
    UnknownGroup(GroupId),
}

/// Why a single group's pipeline stopped.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("provider failure: {0}")]
    Provider(#[from] ProviderError),

    #[error("solver infeasible: {0}")]
    Solver(#[from] SolverError),

    #[error("materialization failure: {0}")]
    Materialize(#[from] MaterializeError),
}
