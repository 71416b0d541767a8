//! Reverse printf: given a template such as `"Hello %s, my number is %d"` and
//! a string produced from it, recover the values that were filled in.
//!
//! ```rust
//! use scan_rust::{scan, slots};
//!
//! let mut name = String::new();
//! let mut number = 0i64;
//! scan("Hello %s, my number is %d", "Hello iorin, my number is 9753")
//!     .bind_all(&mut slots![&mut name, &mut number])
//!     .unwrap();
//! assert_eq!(name, "iorin");
//! assert_eq!(number, 9753);
//! ```
//!
//! Supported placeholders are `%s` (string), `%d`/`%o`/`%b` (integer in base
//! 10/8/2), `%t` (boolean), `%f` (float) and `%v` (detected from the text,
//! including braced records such as `{Hello 123 true}`).
//!
//! Every placeholder must be followed by literal text (or end the template):
//! that text is what ends the capture, so `%s%s` is rejected as ambiguous.

mod bind;
mod error;
mod options;
mod scanner;
mod value;

pub use bind::{Member, Record, ScanResult, Slot};
pub use error::{DecodeError, Error, Result};
pub use options::{ScanOptions, DEFAULT_MARKER};
pub use scanner::{locate_literal, Template};
pub use value::{Kind, Value, Verb};

/// Scan `subject` against `template` with the default `%` marker.
pub fn scan(template: &str, subject: &str) -> ScanResult {
    scan_with_options(template, subject, &ScanOptions::default())
}

pub fn scan_with_options(template: &str, subject: &str, options: &ScanOptions) -> ScanResult {
    match Template::with_options(template, options) {
        Ok(template) => template.scan(subject),
        Err(err) => ScanResult::from(Err(err)),
    }
}
