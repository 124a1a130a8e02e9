//! Labelled multichannel signals.
//!
//! [`RawSignal`] is a recording as handed over by the loader: channel label →
//! samples, in recording order. [`DerivedSignal`] is what a montage produces:
//! derived channel name → samples, in montage order.
use indexmap::IndexMap;
use ndarray::{Array1, Array2, Axis};

use crate::error::{MontageError, Result};

/// A recording keyed by its native channel labels.
///
/// Insertion order is preserved and is the order in which label matching
/// visits channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSignal {
    channels: IndexMap<String, Array1<f32>>,
}

impl RawSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from channel names and a `[C, T]` matrix (one row per channel).
    ///
    /// Every label must be unique; a repeated label is an error rather than a
    /// silently dropped row.
    pub fn from_rows(ch_names: &[String], data: &Array2<f32>) -> Result<Self> {
        if ch_names.len() != data.nrows() {
            return Err(MontageError::InvalidSignal(format!(
                "{} channel names for {} data rows",
                ch_names.len(),
                data.nrows()
            )));
        }
        let mut signal = Self::new();
        for (name, row) in ch_names.iter().zip(data.rows()) {
            if signal.contains(name) {
                return Err(MontageError::InvalidSignal(format!(
                    "repeated channel label '{name}'"
                )));
            }
            signal.insert(name.clone(), row.to_owned())?;
        }
        Ok(signal)
    }

    /// Add a channel. An existing label keeps its position and gets the new samples.
    pub fn insert(&mut self, label: impl Into<String>, samples: Array1<f32>) -> Result<()> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(MontageError::InvalidSignal("empty channel label".into()));
        }
        self.channels.insert(label, samples);
        Ok(())
    }

    pub fn get(&self, label: &str) -> Option<&Array1<f32>> {
        self.channels.get(label)
    }

    /// Exact label membership.
    pub fn contains(&self, label: &str) -> bool {
        self.channels.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array1<f32>)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Output of a montage: derived channels in montage order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedSignal {
    channels: IndexMap<String, Array1<f32>>,
}

impl DerivedSignal {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self { channels: IndexMap::with_capacity(n) }
    }

    pub(crate) fn push(&mut self, name: &str, samples: Array1<f32>) {
        self.channels.insert(name.to_string(), samples);
    }

    pub fn get(&self, name: &str) -> Option<&Array1<f32>> {
        self.channels.get(name)
    }

    /// Derived channel names in output order.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array1<f32>)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, Array1<f32>> {
        self.channels
    }

    /// Stack into channel names and a `[C, T]` matrix.
    ///
    /// Fails when the signal is empty or channels differ in length.
    pub fn to_array2(&self) -> Result<(Vec<String>, Array2<f32>)> {
        let n_t = match self.channels.values().next() {
            Some(first) => first.len(),
            None => return Err(MontageError::InvalidSignal("no derived channels".into())),
        };
        if let Some((name, v)) = self.channels.iter().find(|(_, v)| v.len() != n_t) {
            return Err(MontageError::InvalidSignal(format!(
                "channel '{name}' has {} samples, expected {n_t}",
                v.len()
            )));
        }
        let views: Vec<_> = self.channels.values().map(|v| v.view()).collect();
        let data = ndarray::stack(Axis(0), &views)
            .map_err(|e| MontageError::InvalidSignal(e.to_string()))?;
        Ok((self.channels.keys().cloned().collect(), data))
    }
}
