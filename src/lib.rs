//! # exg-montage — EEG montage engine
//!
//! Converts multichannel EEG recordings from their native electrode
//! referencing into the montage a scoring pipeline expects. A montage is a
//! list of derived channels, each the difference of two recorded channels or
//! a straight pass-through of one.
//!
//! ## Flow
//!
//! ```text
//! montage file (text)
//!   │
//!   ├─ definition::load()     rows → ordered MontageDefinition
//!   │                         (+ cached channel / montage order)
//!   │
//! raw recording (label → samples)
//!   │
//!   ├─ transform::validate()  exact-label pre-flight check
//!   ├─ transform::apply()     token matching, minuend − subtrahend
//!   │
//!   └─→ DerivedSignal         derived name → samples, montage order
//!                             (+ diagnostics for omitted channels)
//! ```
//!
//! ## Quick start
//!
//! ```
//! use exg_montage::{Montage, MontageConfig, RawSignal};
//! use ndarray::array;
//!
//! let mut montage = Montage::new(MontageConfig::default());
//! montage.load(
//!     "montage = 0, FP1-F7: EEG FP1-REF -- EEG F7-REF\n\
//!      montage = 1, F7-T3:  EEG F7-REF  -- EEG T3-REF\n",
//!     &mut exg_montage::NullSink,
//! ).unwrap();
//!
//! let mut raw = RawSignal::new();
//! raw.insert("EEG FP1-REF", array![3.0, 2.0]).unwrap();
//! raw.insert("EEG F7-REF",  array![1.0, 1.0]).unwrap();
//! raw.insert("EEG T3-REF",  array![0.5, 0.0]).unwrap();
//!
//! let mut diagnostics: Vec<exg_montage::Diagnostic> = Vec::new();
//! let derived = montage.apply(&raw, &mut diagnostics).unwrap();
//! assert_eq!(derived.channel_names(), ["FP1-F7", "F7-T3"]);
//! assert_eq!(derived.get("FP1-F7").unwrap(), &array![2.0, 1.0]);
//! assert!(diagnostics.is_empty());
//! ```
//!
//! A loaded [`MontageDefinition`] is immutable and `Sync`; share it by
//! reference across threads that montage different recordings.

pub mod config;
pub mod definition;
pub mod diagnostics;
pub mod error;
pub mod io;
pub mod presets;
pub mod signal;
pub mod transform;

// ── Crate-root re-exports ─────────────────────────────────────────────────

// config
pub use config::{DuplicatePolicy, MontageConfig};

// definition
pub use definition::{load, MontageDefinition, MontageEntry};

// diagnostics
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, LogSink, NullSink};

// error
pub use error::{MontageError, Result};

// io
pub use io::{read_definition, write_derived, RawRecording, StWriter};

// presets
pub use presets::{preset, TCP_AR, TCP_LE};

// signal
pub use signal::{DerivedSignal, RawSignal};

// transform
pub use transform::{apply, match_channel, validate, ChannelMatch, Montage, Validation};
