//! Montage transformer: derive referenced channels from a raw recording.
//!
//! Two checks exist and they deliberately disagree:
//!
//! - [`validate`] asks whether every operand is an *exact* channel label.
//! - [`apply`] matches on tokens, so a montage operand `EEG FP1-REF` finds a
//!   recording channel `EEG FP1-LE`, and an operand `FP1` finds `EEG FP1-REF`.
//!
//! A recording can therefore fail [`validate`] and still be montaged in full by
//! [`apply`]. Callers that need exact labels use [`Montage::process`] with
//! [`MontageConfig::require_complete`].
use ndarray::Array1;

use crate::config::MontageConfig;
use crate::definition::{self, MontageDefinition};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::error::{MontageError, Result};
use crate::signal::{DerivedSignal, RawSignal};

// ── Label matching ───────────────────────────────────────────────────────

/// Result of searching a recording for an operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChannelMatch<'a> {
    Found { label: &'a str, samples: &'a Array1<f32> },
    NotFound,
}

/// Match key of an operand: the text before its first `-`, trimmed.
///
/// `"EEG FP1-REF"` → `"EEG FP1"`, `"FP1"` → `"FP1"`.
pub fn match_key(operand: &str) -> &str {
    operand.split('-').next().unwrap_or(operand).trim()
}

/// Tokens of a channel label: dashes become spaces, then split on whitespace.
pub fn label_tokens(label: &str) -> Vec<&str> {
    label
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

/// `true` when the whitespace tokens of `key` occur as a contiguous run in
/// the tokens of `label`. For single-token keys this is plain token
/// membership: `FP1` matches `EEG FP1-REF` but not `EEG FP10-REF`.
pub fn label_matches(label: &str, key: &str) -> bool {
    let want: Vec<&str> = key.split_whitespace().collect();
    if want.is_empty() {
        return false;
    }
    label_tokens(label).windows(want.len()).any(|w| w == want.as_slice())
}

/// First channel of `signal`, in recording order, whose label matches `key`.
pub fn match_channel<'a>(signal: &'a RawSignal, key: &str) -> ChannelMatch<'a> {
    signal
        .iter()
        .find(|(label, _)| label_matches(label, key))
        .map_or(ChannelMatch::NotFound, |(label, samples)| ChannelMatch::Found { label, samples })
}

// ── Validation ───────────────────────────────────────────────────────────

/// Outcome of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    /// Operands that are not exact labels of the recording, first-seen order,
    /// without repeats.
    pub missing: Vec<String>,
}

impl Validation {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Convert into a `Result`, failing with [`MontageError::MissingChannels`].
    pub fn into_result(self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(MontageError::MissingChannels { missing: self.missing })
        }
    }
}

/// Check every operand of `definition` for exact membership among the
/// labels of `signal`. All missing operands are collected.
pub fn validate(signal: &RawSignal, definition: &MontageDefinition) -> Validation {
    let missing = definition
        .channel_order()
        .iter()
        .filter(|op| !signal.contains(op))
        .cloned()
        .collect();
    Validation { missing }
}

// ── Application ──────────────────────────────────────────────────────────

/// Apply `definition` to `signal`.
///
/// Derived channels are produced in definition order. A row whose operands
/// cannot all be matched is left out of the output and reported to `sink`.
/// Fails only when both operands resolve to vectors of different lengths.
pub fn apply(
    signal: &RawSignal,
    definition: &MontageDefinition,
    sink: &mut dyn DiagnosticSink,
) -> Result<DerivedSignal> {
    let mut out = DerivedSignal::with_capacity(definition.len());

    for entry in definition.entries() {
        let minuend_key = match_key(&entry.minuend);
        let minuend = match_channel(signal, minuend_key);

        match entry.subtrahend.as_deref().map(match_key) {
            None => match minuend {
                ChannelMatch::Found { samples, .. } => out.push(&entry.name, samples.clone()),
                ChannelMatch::NotFound => sink.report(Diagnostic::new(
                    entry.name.clone(),
                    DiagnosticKind::UnmatchedMinuend { expected: minuend_key.to_string() },
                )),
            },
            Some(subtrahend_key) => match (minuend, match_channel(signal, subtrahend_key)) {
                (
                    ChannelMatch::Found { samples: a, .. },
                    ChannelMatch::Found { samples: b, .. },
                ) => {
                    if a.len() != b.len() {
                        return Err(MontageError::DimensionMismatch {
                            channel: entry.name.clone(),
                            minuend: a.len(),
                            subtrahend: b.len(),
                        });
                    }
                    out.push(&entry.name, a - b);
                }
                (ChannelMatch::Found { .. }, ChannelMatch::NotFound) => {
                    sink.report(Diagnostic::new(
                        entry.name.clone(),
                        DiagnosticKind::UnmatchedSubtrahend {
                            expected: subtrahend_key.to_string(),
                        },
                    ));
                }
                (ChannelMatch::NotFound, ChannelMatch::Found { .. }) => {
                    sink.report(Diagnostic::new(
                        entry.name.clone(),
                        DiagnosticKind::UnmatchedMinuend { expected: minuend_key.to_string() },
                    ));
                }
                (ChannelMatch::NotFound, ChannelMatch::NotFound) => {
                    sink.report(Diagnostic::new(
                        entry.name.clone(),
                        DiagnosticKind::UnmatchedOperands {
                            minuend: minuend_key.to_string(),
                            subtrahend: subtrahend_key.to_string(),
                        },
                    ));
                }
            },
        }
    }

    log::debug!(
        "applied montage: {}/{} derived channels from {} recording channels",
        out.len(),
        definition.len(),
        signal.len()
    );
    Ok(out)
}

// ── Stateful transformer ─────────────────────────────────────────────────

/// A montage transformer bound to a configuration and, once loaded, a
/// definition.
///
/// The definition is immutable after loading, so a `Montage` can be shared
/// by reference across threads and applied to many recordings at once.
#[derive(Debug, Clone, Default)]
pub struct Montage {
    config: MontageConfig,
    definition: Option<MontageDefinition>,
}

impl Montage {
    /// A transformer with no definition loaded yet.
    pub fn new(config: MontageConfig) -> Self {
        Self { config, definition: None }
    }

    pub fn with_definition(config: MontageConfig, definition: MontageDefinition) -> Self {
        Self { config, definition: Some(definition) }
    }

    pub fn config(&self) -> &MontageConfig {
        &self.config
    }

    /// Parse `source` and replace the current definition.
    ///
    /// On failure the previously loaded definition, if any, is kept.
    pub fn load(&mut self, source: &str, sink: &mut dyn DiagnosticSink) -> Result<&MontageDefinition> {
        let def = definition::load(source, &self.config, sink)?;
        Ok(&*self.definition.insert(def))
    }

    pub fn definition(&self) -> Result<&MontageDefinition> {
        self.definition.as_ref().ok_or(MontageError::NotLoaded)
    }

    pub fn minuends(&self) -> Result<Vec<&str>> {
        Ok(self.definition()?.minuends())
    }

    pub fn subtrahends(&self, fill_missing: bool) -> Result<Vec<Option<&str>>> {
        Ok(self.definition()?.subtrahends(fill_missing))
    }

    pub fn channel_order(&self) -> Result<&[String]> {
        Ok(self.definition()?.channel_order())
    }

    pub fn montage_order(&self) -> Result<&[String]> {
        Ok(self.definition()?.montage_order())
    }

    pub fn validate(&self, signal: &RawSignal) -> Result<Validation> {
        Ok(validate(signal, self.definition()?))
    }

    pub fn apply(&self, signal: &RawSignal, sink: &mut dyn DiagnosticSink) -> Result<DerivedSignal> {
        apply(signal, self.definition()?, sink)
    }

    /// [`apply`](Self::apply) with the completeness policy of the config.
    ///
    /// - `require_complete`: fail with [`MontageError::MissingChannels`] if
    ///   [`validate`](Self::validate) finds any missing operand.
    /// - `max_omitted`: fail with [`MontageError::IncompleteMontage`] if more
    ///   derived channels than allowed were left out.
    ///
    /// Diagnostics are forwarded to `sink` in either case.
    pub fn process(&self, signal: &RawSignal, sink: &mut dyn DiagnosticSink) -> Result<DerivedSignal> {
        let def = self.definition()?;
        if self.config.require_complete {
            validate(signal, def).into_result()?;
        }

        let derived = apply(signal, def, sink)?;
        let omitted = def.len() - derived.len();
        if let Some(limit) = self.config.max_omitted {
            if omitted > limit {
                return Err(MontageError::IncompleteMontage { omitted, limit });
            }
        }
        Ok(derived)
    }
}
