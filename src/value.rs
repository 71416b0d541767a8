use std::fmt;

use regex::Regex;

use crate::error::DecodeError;

lazy_static::lazy_static! {
    // A `%v` capture that looks like a flattened struct: `{field field ...}`.
    static ref RECORD: Regex = Regex::new(r"(?s)^\{(.*)\}$").unwrap();
}

/// The kind of a scanned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Int,
    Bool,
    Float,
    Record,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::String => "string",
            Kind::Int => "int",
            Kind::Bool => "bool",
            Kind::Float => "float",
            Kind::Record => "record",
        };
        f.write_str(name)
    }
}

/// A value recovered from one placeholder.
///
/// `Record` only ever holds primitive values; it is produced by `%v` when the
/// capture is wrapped in braces.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    Float(f64),
    Record(Vec<Value>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Int(_) => Kind::Int,
            Value::Bool(_) => Kind::Bool,
            Value::Float(_) => Kind::Float,
            Value::Record(_) => Kind::Record,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&[Value]> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Formats the value the way a `%v` verb would have written it.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Float(x) => write!(f, "{}", x),
            Value::Record(fields) => {
                f.write_str("{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", field)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// The kind selector that follows the marker in a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `s`
    String,
    /// `d`
    Decimal,
    /// `o`
    Octal,
    /// `b`
    Binary,
    /// `t`
    Bool,
    /// `f`
    Float,
    /// `v`
    Auto,
}

impl Verb {
    pub fn from_char(c: char) -> Option<Verb> {
        match c {
            's' => Some(Verb::String),
            'd' => Some(Verb::Decimal),
            'o' => Some(Verb::Octal),
            'b' => Some(Verb::Binary),
            't' => Some(Verb::Bool),
            'f' => Some(Verb::Float),
            'v' => Some(Verb::Auto),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Verb::String => 's',
            Verb::Decimal => 'd',
            Verb::Octal => 'o',
            Verb::Binary => 'b',
            Verb::Bool => 't',
            Verb::Float => 'f',
            Verb::Auto => 'v',
        }
    }

    /// Decode an already delimited capture.
    pub fn decode(self, text: &str) -> Result<Value, DecodeError> {
        match self {
            Verb::String => Ok(Value::String(text.to_string())),
            Verb::Decimal => parse_int(text, 10).map(Value::Int),
            Verb::Octal => parse_int(text, 8).map(Value::Int),
            Verb::Binary => parse_int(text, 2).map(Value::Int),
            Verb::Bool => parse_bool(text)
                .map(Value::Bool)
                .ok_or_else(|| DecodeError::NotABoolean {
                    text: text.to_string(),
                }),
            Verb::Float => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|source| DecodeError::NotAFloat {
                    text: text.to_string(),
                    source,
                }),
            Verb::Auto => Ok(decode_auto(text)),
        }
    }
}

fn parse_int(text: &str, radix: u32) -> Result<i64, DecodeError> {
    i64::from_str_radix(text, radix).map_err(|source| DecodeError::NotANumber {
        text: text.to_string(),
        radix,
        source,
    })
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

// Integer first, so "1" and "0" are never read as booleans.
fn classify(text: &str) -> Option<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Int(n));
    }
    if let Some(b) = parse_bool(text) {
        return Some(Value::Bool(b));
    }
    text.parse::<f64>().ok().map(Value::Float)
}

fn decode_auto(text: &str) -> Value {
    if let Some(value) = classify(text) {
        return value;
    }
    if let Some(caps) = RECORD.captures(text) {
        let inner = caps.get(1).map_or("", |m| m.as_str());
        if inner.is_empty() {
            return Value::Record(Vec::new());
        }
        let fields = inner
            .split(' ')
            .map(|field| classify(field).unwrap_or_else(|| Value::String(field.to_string())))
            .collect();
        return Value::Record(fields);
    }
    Value::String(text.to_string())
}
