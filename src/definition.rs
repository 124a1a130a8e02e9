//! Montage definition loader.
//!
//! A montage file is line-oriented. Rows look like
//!
//! ```text
//! montage =  0, FP1-F7: EEG FP1-REF -- EEG F7-REF
//! montage = 22, EKG:    EEG EKG1-REF
//! ```
//!
//! i.e. `<directive> = <index>, <derived name>: <minuend> [-- <subtrahend>]`.
//! Lines that do not start with the directive key, blank lines and `#`
//! comments are ignored. Row order is the output channel order.
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use std::fmt::Write as _;

use crate::config::{DuplicatePolicy, MontageConfig};
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::error::{MontageError, Result};

/// Binary subtraction marker between minuend and subtrahend.
pub const OPERATOR: &str = "--";

/// One montage row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MontageEntry {
    /// Index as written in the source row.
    pub index: usize,
    /// Derived channel name.
    pub name: String,
    pub minuend: String,
    pub subtrahend: Option<String>,
}

impl MontageEntry {
    /// The one or two operand strings, minuend first.
    pub fn operands(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.minuend.as_str()).chain(self.subtrahend.as_deref())
    }

    /// `true` for a single-operand (pass-through) row.
    pub fn is_passthrough(&self) -> bool {
        self.subtrahend.is_none()
    }
}

/// A parsed montage: derived channel name → operands, in row order.
///
/// Immutable once loaded. The operand visitation order and the derived
/// channel order are computed at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct MontageDefinition {
    entries: IndexMap<String, MontageEntry>,
    channel_order: Vec<String>,
    montage_order: Vec<String>,
}

impl MontageDefinition {
    /// Parse with the default configuration, discarding diagnostics.
    ///
    /// ```
    /// use exg_montage::MontageDefinition;
    ///
    /// let def = MontageDefinition::parse(
    ///     "montage = 0, FP1-F7: EEG FP1-REF -- EEG F7-REF\n\
    ///      montage = 1, F7-T3: EEG F7-REF -- EEG T3-REF\n",
    /// ).unwrap();
    /// assert_eq!(def.montage_order(), ["FP1-F7", "F7-T3"]);
    /// assert_eq!(def.channel_order(), ["EEG FP1-REF", "EEG F7-REF", "EEG T3-REF"]);
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        load(source, &MontageConfig::default(), &mut crate::NullSink)
    }

    /// Build from already-decomposed entries, applying the same duplicate
    /// policy and emptiness check as the text loader.
    pub fn from_entries(
        entries: impl IntoIterator<Item = MontageEntry>,
        duplicates: DuplicatePolicy,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self> {
        let mut map = IndexMap::new();
        for (i, entry) in entries.into_iter().enumerate() {
            insert_entry(&mut map, entry, i + 1, duplicates, sink)?;
        }
        Self::finish(map, "montage")
    }

    fn finish(entries: IndexMap<String, MontageEntry>, directive: &str) -> Result<Self> {
        if entries.is_empty() {
            return Err(MontageError::EmptyDefinition { directive: directive.to_string() });
        }
        let mut seen: IndexSet<&str> = IndexSet::new();
        for entry in entries.values() {
            for op in entry.operands() {
                seen.insert(op);
            }
        }
        let channel_order = seen.into_iter().map(str::to_string).collect();
        let montage_order = entries.keys().cloned().collect();
        Ok(Self { entries, channel_order, montage_order })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a loaded definition; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&MontageEntry> {
        self.entries.get(name)
    }

    /// Rows in definition order.
    pub fn entries(&self) -> impl Iterator<Item = &MontageEntry> {
        self.entries.values()
    }

    /// First operand of every row, in definition order.
    pub fn minuends(&self) -> Vec<&str> {
        self.entries.values().map(|e| e.minuend.as_str()).collect()
    }

    /// Second operand of every row.
    ///
    /// With `fill_missing` the result is index-aligned with [`minuends`](Self::minuends):
    /// pass-through rows contribute `None`. Without it those rows are skipped
    /// and every element is `Some`.
    pub fn subtrahends(&self, fill_missing: bool) -> Vec<Option<&str>> {
        self.entries
            .values()
            .map(|e| e.subtrahend.as_deref())
            .filter(|s| fill_missing || s.is_some())
            .collect()
    }

    /// De-duplicated operands in first-appearance order.
    pub fn channel_order(&self) -> &[String] {
        &self.channel_order
    }

    /// Derived channel names in definition order.
    pub fn montage_order(&self) -> &[String] {
        &self.montage_order
    }

    /// Render back into the row grammar using `directive` as the key.
    ///
    /// Loading the result yields an equal definition.
    pub fn to_text(&self, directive: &str) -> String {
        let mut out = String::new();
        for e in self.entries.values() {
            let _ = write!(out, "{directive} = {:2}, {}: {}", e.index, e.name, e.minuend);
            if let Some(sub) = &e.subtrahend {
                let _ = write!(out, " {OPERATOR} {sub}");
            }
            out.push('\n');
        }
        out
    }
}

/// Parse `source` into a [`MontageDefinition`].
///
/// Any malformed directive row aborts the whole parse; no partial definition
/// is ever returned. Duplicate derived names are handled per
/// [`MontageConfig::duplicates`].
pub fn load(
    source: &str,
    config: &MontageConfig,
    sink: &mut dyn DiagnosticSink,
) -> Result<MontageDefinition> {
    let mut entries: IndexMap<String, MontageEntry> = IndexMap::new();

    for (i, line) in source.lines().enumerate() {
        let line_no = i + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        if !config.is_directive(key) {
            continue;
        }
        let entry = parse_row(value, line_no)?;
        insert_entry(&mut entries, entry, line_no, config.duplicates, sink)?;
    }

    let def = MontageDefinition::finish(entries, &config.directive)?;
    log::debug!(
        "loaded montage: {} derived channels over {} operands",
        def.len(),
        def.channel_order().len()
    );
    Ok(def)
}

fn insert_entry(
    entries: &mut IndexMap<String, MontageEntry>,
    entry: MontageEntry,
    line: usize,
    policy: DuplicatePolicy,
    sink: &mut dyn DiagnosticSink,
) -> Result<()> {
    match entries.entry(entry.name.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(entry);
        }
        Entry::Occupied(mut slot) => match policy {
            DuplicatePolicy::Reject => {
                return Err(MontageError::MalformedDefinition {
                    line,
                    reason: format!("duplicate derived channel '{}'", entry.name),
                });
            }
            DuplicatePolicy::Overwrite => {
                sink.report(Diagnostic::new(
                    entry.name.clone(),
                    DiagnosticKind::DuplicateOverwritten { line },
                ));
                slot.insert(entry);
            }
        },
    }
    Ok(())
}

/// Decompose the value part of a row: `<index>, <name>: <operands>`.
fn parse_row(value: &str, line: usize) -> Result<MontageEntry> {
    let malformed = |reason: &str| MontageError::MalformedDefinition {
        line,
        reason: reason.to_string(),
    };

    let (index, rest) = value
        .split_once(',')
        .ok_or_else(|| malformed("missing ',' after row index"))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| malformed("row index is not a non-negative integer"))?;

    let (name, expr) = rest
        .split_once(':')
        .ok_or_else(|| malformed("missing ':' after derived channel name"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed("empty derived channel name"));
    }

    let expr = expr.trim();
    if expr.is_empty() {
        return Err(malformed("empty operand expression"));
    }

    let (minuend, subtrahend) = match expr.split_once(OPERATOR) {
        None => (expr, None),
        Some((lhs, rhs)) => {
            let (lhs, rhs) = (lhs.trim(), rhs.trim());
            if lhs.is_empty() {
                return Err(malformed("empty minuend before '--'"));
            }
            if rhs.is_empty() {
                return Err(malformed("empty subtrahend after '--'"));
            }
            if rhs.contains(OPERATOR) {
                return Err(malformed("more than two operands"));
            }
            (lhs, Some(rhs.to_string()))
        }
    };

    Ok(MontageEntry {
        index,
        name: name.to_string(),
        minuend: minuend.to_string(),
        subtrahend,
    })
}
