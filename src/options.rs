//! Configuration for template compilation.

/// The marker character that introduces a placeholder when none is configured.
pub const DEFAULT_MARKER: char = '%';

/// Options controlling how a template is read.
///
/// ```rust
/// use scan_rust::{ScanOptions, Template};
///
/// let options = ScanOptions::new().with_marker('$');
/// let template = Template::with_options("cost: $d yen", &options).unwrap();
/// let result = template.scan("cost: 409 yen");
/// assert_eq!(result.get(0).and_then(|v| v.as_int()), Some(409));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    pub marker: char,
}

impl ScanOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `marker` instead of `%` to introduce placeholders.
    #[must_use]
    pub fn with_marker(mut self, marker: char) -> Self {
        self.marker = marker;
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            marker: DEFAULT_MARKER,
        }
    }
}
