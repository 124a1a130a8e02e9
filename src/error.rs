//! Error taxonomy for montage loading and application.
//!
//! Per-channel matching failures during [`apply`](crate::transform::apply) are
//! not errors; they are reported as [`Diagnostic`](crate::Diagnostic)s.
use thiserror::Error;

/// Failures raised by the montage core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MontageError {
    /// A directive row could not be decomposed into index, name and operands,
    /// or it repeats a derived channel name while duplicates are rejected.
    #[error("malformed montage definition at line {line}: {reason}")]
    MalformedDefinition { line: usize, reason: String },

    /// The source parsed cleanly but contained no directive rows.
    #[error("montage definition contains no '{directive}' rows")]
    EmptyDefinition { directive: String },

    /// An accessor was used before any definition was loaded.
    #[error("no montage definition has been loaded")]
    NotLoaded,

    /// Minuend and subtrahend resolved to vectors of different lengths.
    #[error(
        "derived channel '{channel}': minuend has {minuend} samples, subtrahend has {subtrahend}"
    )]
    DimensionMismatch {
        channel: String,
        minuend: usize,
        subtrahend: usize,
    },

    /// The completeness gate found operands that are not exact channel labels.
    #[error("{} montage operand(s) missing from recording: {}", missing.len(), missing.join(", "))]
    MissingChannels { missing: Vec<String> },

    /// More derived channels were omitted than the configured limit allows.
    #[error("{omitted} derived channel(s) omitted, limit is {limit}")]
    IncompleteMontage { omitted: usize, limit: usize },

    #[error("invalid signal: {0}")]
    InvalidSignal(String),
}

pub type Result<T> = std::result::Result<T, MontageError>;
