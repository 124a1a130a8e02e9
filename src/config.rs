//! Montage configuration.
//!
//! [`MontageConfig`] holds every tunable parameter for loading a montage
//! definition and applying it to recordings. All fields have defaults that
//! match the strict behaviour expected by the scoring pipeline.

/// What the loader does when a derived channel name is defined twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`MontageError::MalformedDefinition`](crate::MontageError::MalformedDefinition).
    #[default]
    Reject,
    /// Keep the channel at its first position but take the later row's
    /// operands. A [`DiagnosticKind::DuplicateOverwritten`](crate::DiagnosticKind)
    /// is reported for every replaced row.
    Overwrite,
}

/// Configuration for the montage loader and transformer.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use exg_montage::{DuplicatePolicy, MontageConfig};
///
/// let cfg = MontageConfig {
///     duplicates:  DuplicatePolicy::Overwrite, // accept legacy files
///     max_omitted: Some(2),                    // tolerate two lost channels
///     ..MontageConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct MontageConfig {
    /// Directive key that introduces a montage row.
    ///
    /// A line is a montage row when the text before its first `=` equals this
    /// key (trimmed, ASCII case-insensitive). Every other line is ignored.
    ///
    /// Default: `"montage"`.
    pub directive: String,

    /// Handling of repeated derived channel names.
    ///
    /// Default: [`DuplicatePolicy::Reject`].
    pub duplicates: DuplicatePolicy,

    /// Require every operand to be an exact channel label before applying.
    ///
    /// When set, [`Montage::process`](crate::Montage::process) runs the
    /// exact-match validation first and fails with
    /// [`MontageError::MissingChannels`](crate::MontageError::MissingChannels)
    /// instead of falling back to token matching.
    ///
    /// Default: `false`.
    pub require_complete: bool,

    /// Maximum number of derived channels that may be omitted from one
    /// recording before [`Montage::process`](crate::Montage::process) fails
    /// with [`MontageError::IncompleteMontage`](crate::MontageError::IncompleteMontage).
    ///
    /// Default: `None` (any number of omissions is tolerated).
    pub max_omitted: Option<usize>,
}

impl Default for MontageConfig {
    fn default() -> Self {
        Self {
            directive: "montage".to_string(),
            duplicates: DuplicatePolicy::Reject,
            require_complete: false,
            max_omitted: None,
        }
    }
}

impl MontageConfig {
    /// `true` when `key` names this config's directive.
    ///
    /// ```
    /// use exg_montage::MontageConfig;
    /// let cfg = MontageConfig::default();
    /// assert!(cfg.is_directive(" Montage "));
    /// assert!(!cfg.is_directive("montage_name"));
    /// ```
    pub fn is_directive(&self, key: &str) -> bool {
        key.trim().eq_ignore_ascii_case(&self.directive)
    }
}
