use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::value::Kind;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure to cut or decode the capture of a single placeholder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("[{subject}] does not contain [{fragment}]")]
    NoMatch { fragment: String, subject: String },
    #[error("{text:?} is not a base {radix} integer")]
    NotANumber {
        text: String,
        radix: u32,
        #[source]
        source: ParseIntError,
    },
    #[error("{text:?} is not a boolean")]
    NotABoolean { text: String },
    #[error("{text:?} is not a float")]
    NotAFloat {
        text: String,
        #[source]
        source: ParseFloatError,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid string ({subject}) with ({template}): expected {expected:?} but found {}", found_char(.found))]
    InvalidString {
        template: String,
        subject: String,
        expected: char,
        found: Option<char>,
    },
    #[error("ambiguous format ({template}): placeholders at byte {position} have no literal text between them")]
    AmbiguousFormat { template: String, position: usize },
    #[error("unknown verb {} at byte {position} of ({template})", found_char(.verb))]
    UnknownVerb {
        template: String,
        position: usize,
        verb: Option<char>,
    },
    #[error("{marker} on ({template}, {subject}) failed: {source}")]
    Placeholder {
        marker: String,
        template: String,
        subject: String,
        #[source]
        source: DecodeError,
    },
    #[error("{actual} destinations given but {expected} values were scanned")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("index {index} out of range for {len} scanned values")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("{value} overflows {slot}")]
    Overflow { value: i64, slot: &'static str },
    #[error("{value} underflows {slot}")]
    Underflow { value: i64, slot: &'static str },
    #[error("{value} is out of range for {slot}")]
    FloatOverflow { value: f64, slot: &'static str },
    #[error("cannot assign {value} value to {slot}")]
    UnsupportedAssignment { value: Kind, slot: &'static str },
    #[error("field {field} expects {expected} but the scanned field is {actual}")]
    FieldTypeMismatch {
        field: &'static str,
        expected: &'static str,
        actual: Kind,
    },
    #[error("field {field} is not assignable")]
    FieldNotAssignable { field: &'static str },
}

fn found_char(c: &Option<char>) -> String {
    match c {
        Some(c) => format!("{:?}", c),
        None => "end of input".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_string_message() {
        let err = Error::InvalidString {
            template: "Hello".into(),
            subject: "Help".into(),
            expected: 'l',
            found: Some('p'),
        };
        assert_eq!(
            err.to_string(),
            "invalid string (Help) with (Hello): expected 'l' but found 'p'"
        );
    }

    #[test]
    fn test_placeholder_chains_source() {
        let source = DecodeError::NoMatch {
            fragment: "_".into(),
            subject: "He".into(),
        };
        let err = Error::Placeholder {
            marker: "%s".into(),
            template: "%s_".into(),
            subject: "He".into(),
            source: source.clone(),
        };
        let chained = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(chained, Some(source.to_string()));
        assert!(err.to_string().ends_with("[He] does not contain [_]"));
    }
}
