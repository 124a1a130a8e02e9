//! Structured, non-fatal diagnostics.
//!
//! The loader and the transformer never print. Anything worth telling the
//! caller about that does not abort the operation (an omitted derived channel,
//! an overwritten duplicate row) goes to a [`DiagnosticSink`] supplied by the
//! caller, who decides whether it matters for a given recording.
use std::fmt;

/// Why a diagnostic was raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// No recording channel matched the minuend key.
    UnmatchedMinuend { expected: String },
    /// No recording channel matched the subtrahend key.
    UnmatchedSubtrahend { expected: String },
    /// Neither operand key matched.
    UnmatchedOperands { minuend: String, subtrahend: String },
    /// A later row replaced an earlier one with the same derived name.
    DuplicateOverwritten { line: usize },
}

/// A single diagnostic, attributed to a derived channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub channel: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(channel: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self { channel: channel.into(), kind }
    }

    /// `true` when this diagnostic means the channel is absent from the output.
    pub fn is_omission(&self) -> bool {
        !matches!(self.kind, DiagnosticKind::DuplicateOverwritten { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnmatchedMinuend { expected } => write!(
                f,
                "{}: omitted, no channel matches minuend '{expected}'",
                self.channel
            ),
            DiagnosticKind::UnmatchedSubtrahend { expected } => write!(
                f,
                "{}: omitted, no channel matches subtrahend '{expected}'",
                self.channel
            ),
            DiagnosticKind::UnmatchedOperands { minuend, subtrahend } => write!(
                f,
                "{}: omitted, no channel matches minuend '{minuend}' or subtrahend '{subtrahend}'",
                self.channel
            ),
            DiagnosticKind::DuplicateOverwritten { line } => write!(
                f,
                "{}: redefined at line {line}, earlier row overwritten",
                self.channel
            ),
        }
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards every diagnostic to the `log` facade at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}
