use std::fmt;

use tracing::trace;

use crate::error::{Error, Result};
use crate::value::{Kind, Value};

/// The outcome of one scan: every value in placeholder order, or the error
/// that stopped the scan.
///
/// Binding never consumes the result, so values can be bound one at a time
/// or all at once, any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    inner: std::result::Result<Vec<Value>, Error>,
}

impl From<std::result::Result<Vec<Value>, Error>> for ScanResult {
    fn from(inner: std::result::Result<Vec<Value>, Error>) -> Self {
        ScanResult { inner }
    }
}

impl ScanResult {
    pub fn is_ok(&self) -> bool {
        self.inner.is_ok()
    }

    pub fn error(&self) -> Option<&Error> {
        self.inner.as_ref().err()
    }

    pub fn values(&self) -> std::result::Result<&[Value], &Error> {
        self.inner.as_deref()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.inner.as_ref().ok().and_then(|values| values.get(index))
    }

    /// Number of scanned values; zero when the scan failed.
    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_result(self) -> Result<Vec<Value>> {
        self.inner
    }

    /// Assign every scanned value to the slot at the same position.
    ///
    /// ```rust
    /// use scan_rust::{scan, slots};
    ///
    /// let (mut name, mut number) = (String::new(), 0i32);
    /// scan("Hello %s, my number is %d", "Hello iorin, my number is 9753")
    ///     .bind_all(&mut slots![&mut name, &mut number])
    ///     .unwrap();
    /// assert_eq!((name.as_str(), number), ("iorin", 9753));
    /// ```
    pub fn bind_all(&self, slots: &mut [Slot<'_>]) -> Result<()> {
        let values = self.inner.as_ref().map_err(Clone::clone)?;
        if slots.len() != values.len() {
            return Err(Error::ArityMismatch {
                expected: values.len(),
                actual: slots.len(),
            });
        }
        for (index, (slot, value)) in slots.iter_mut().zip(values).enumerate() {
            trace!(index, slot = slot.describe(), "bind");
            slot.assign(value)?;
        }
        Ok(())
    }

    /// Assign the value at `index` to a single slot.
    pub fn bind_one<'a>(&self, index: usize, slot: impl Into<Slot<'a>>) -> Result<()> {
        let values = self.inner.as_ref().map_err(Clone::clone)?;
        let value = values.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: values.len(),
        })?;
        let mut slot = slot.into();
        trace!(index, slot = slot.describe(), "bind");
        slot.assign(value)
    }
}

/// A caller-owned destination for one scanned value.
pub enum Slot<'a> {
    Text(&'a mut String),
    Bytes(&'a mut Vec<u8>),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    Bool(&'a mut bool),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Record(&'a mut dyn Record),
}

impl Slot<'_> {
    pub fn describe(&self) -> &'static str {
        match self {
            Slot::Text(_) => "&mut String",
            Slot::Bytes(_) => "&mut Vec<u8>",
            Slot::I8(_) => "&mut i8",
            Slot::I16(_) => "&mut i16",
            Slot::I32(_) => "&mut i32",
            Slot::I64(_) => "&mut i64",
            Slot::Isize(_) => "&mut isize",
            Slot::Bool(_) => "&mut bool",
            Slot::F32(_) => "&mut f32",
            Slot::F64(_) => "&mut f64",
            Slot::Record(_) => "&mut dyn Record",
        }
    }

    pub fn accepts(&self, kind: Kind) -> bool {
        matches!(
            (self, kind),
            (Slot::Text(_) | Slot::Bytes(_), Kind::String)
                | (
                    Slot::I8(_) | Slot::I16(_) | Slot::I32(_) | Slot::I64(_) | Slot::Isize(_),
                    Kind::Int
                )
                | (Slot::Bool(_), Kind::Bool)
                | (Slot::F32(_) | Slot::F64(_), Kind::Float)
                | (Slot::Record(_), Kind::Record)
        )
    }

    pub fn assign(&mut self, value: &Value) -> Result<()> {
        let slot = self.describe();
        match (self, value) {
            (Slot::Text(dest), Value::String(s)) => **dest = s.clone(),
            (Slot::Bytes(dest), Value::String(s)) => **dest = s.as_bytes().to_vec(),
            (Slot::I8(dest), Value::Int(n)) => **dest = narrow(*n, slot)?,
            (Slot::I16(dest), Value::Int(n)) => **dest = narrow(*n, slot)?,
            (Slot::I32(dest), Value::Int(n)) => **dest = narrow(*n, slot)?,
            (Slot::I64(dest), Value::Int(n)) => **dest = *n,
            (Slot::Isize(dest), Value::Int(n)) => **dest = narrow(*n, slot)?,
            (Slot::Bool(dest), Value::Bool(b)) => **dest = *b,
            (Slot::F32(dest), Value::Float(x)) => **dest = narrow_float(*x, slot)?,
            (Slot::F64(dest), Value::Float(x)) => **dest = *x,
            (Slot::Record(dest), Value::Record(fields)) => assign_record(&mut **dest, fields)?,
            (_, value) => {
                return Err(Error::UnsupportedAssignment {
                    value: value.kind(),
                    slot,
                })
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

fn narrow<T: TryFrom<i64>>(value: i64, slot: &'static str) -> Result<T> {
    T::try_from(value).map_err(|_| {
        if value < 0 {
            Error::Underflow { value, slot }
        } else {
            Error::Overflow { value, slot }
        }
    })
}

// Infinity and NaN carry over; only finite values too large for f32 fail.
fn narrow_float(value: f64, slot: &'static str) -> Result<f32> {
    let narrowed = value as f32;
    if narrowed.is_infinite() && value.is_finite() {
        return Err(Error::FloatOverflow { value, slot });
    }
    Ok(narrowed)
}

fn assign_record(record: &mut (dyn Record + '_), fields: &[Value]) -> Result<()> {
    let mut members = record.members();
    if members.len() != fields.len() {
        return Err(Error::ArityMismatch {
            expected: fields.len(),
            actual: members.len(),
        });
    }
    for (member, field) in members.iter_mut().zip(fields) {
        let slot = member
            .slot
            .as_mut()
            .ok_or(Error::FieldNotAssignable { field: member.name })?;
        if !slot.accepts(field.kind()) || matches!(slot, Slot::Record(_)) {
            return Err(Error::FieldTypeMismatch {
                field: member.name,
                expected: slot.describe(),
                actual: field.kind(),
            });
        }
        slot.assign(field)?;
    }
    Ok(())
}

macro_rules! impl_from_slot {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a mut $ty> for Slot<'a> {
                fn from(dest: &'a mut $ty) -> Self {
                    Slot::$variant(dest)
                }
            }
        )*
    };
}

impl_from_slot! {
    String => Text,
    Vec<u8> => Bytes,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    bool => Bool,
    f32 => F32,
    f64 => F64,
}

/// A structure that a braced `%v` capture can be bound into.
///
/// Members are listed in declaration order; the record's fields are assigned
/// to them by position. Use [`record!`](crate::record) to implement it for a
/// plain struct.
pub trait Record {
    fn members(&mut self) -> Vec<Member<'_>>;
}

/// One member of a [`Record`]. A member without a slot is read-only.
pub struct Member<'a> {
    pub name: &'static str,
    pub slot: Option<Slot<'a>>,
}

impl<'a> Member<'a> {
    pub fn new(name: &'static str, slot: impl Into<Slot<'a>>) -> Self {
        Member {
            name,
            slot: Some(slot.into()),
        }
    }

    pub fn read_only(name: &'static str) -> Self {
        Member { name, slot: None }
    }
}

/// Implement [`Record`] for a struct by listing its fields in order.
///
/// ```rust
/// use scan_rust::{record, scan, Slot};
///
/// #[derive(Default)]
/// struct Sample {
///     text: String,
///     number: i32,
///     flag: bool,
///     ratio: f64,
/// }
/// record!(Sample { text, number, flag, ratio });
///
/// let mut sample = Sample::default();
/// scan("sample %v", "sample {Hello 123 true 123.456}")
///     .bind_one(0, Slot::Record(&mut sample))
///     .unwrap();
/// assert_eq!(sample.text, "Hello");
/// assert_eq!(sample.number, 123);
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn members(&mut self) -> ::std::vec::Vec<$crate::Member<'_>> {
                ::std::vec![$($crate::Member::new(::std::stringify!($field), &mut self.$field)),*]
            }
        }
    };
}

/// Build an array of [`Slot`]s for [`ScanResult::bind_all`].
#[macro_export]
macro_rules! slots {
    ($($dest:expr),* $(,)?) => {
        [$($crate::Slot::from($dest)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(values: Vec<Value>) -> ScanResult {
        ScanResult::from(Ok(values))
    }

    #[test]
    fn test_bind_all_arity() {
        let result = ok(vec![Value::String("a".into()), Value::String("b".into())]);
        let mut a = String::new();
        assert_eq!(
            result.bind_all(&mut [Slot::from(&mut a)]),
            Err(Error::ArityMismatch { expected: 2, actual: 1 })
        );
    }

    #[test]
    fn test_bind_one_out_of_range() {
        let result = ok(vec![Value::Int(1)]);
        let mut n = 0i64;
        assert_eq!(
            result.bind_one(1, &mut n),
            Err(Error::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn test_failed_scan_reports_error_on_every_bind() {
        let err = Error::ArityMismatch { expected: 0, actual: 0 };
        let result = ScanResult::from(Err(err.clone()));
        let mut s = String::new();
        assert_eq!(result.bind_one(0, &mut s), Err(err.clone()));
        assert_eq!(result.bind_all(&mut []), Err(err));
        assert!(result.is_empty());
    }

    #[test]
    fn test_narrowing() {
        let mut small = 0i8;
        assert_eq!(Slot::from(&mut small).assign(&Value::Int(127)), Ok(()));
        assert_eq!(small, 127);
        assert_eq!(
            Slot::from(&mut small).assign(&Value::Int(128)),
            Err(Error::Overflow { value: 128, slot: "&mut i8" })
        );
        assert_eq!(
            Slot::from(&mut small).assign(&Value::Int(-129)),
            Err(Error::Underflow { value: -129, slot: "&mut i8" })
        );
        assert_eq!(small, 127);
    }

    #[test]
    fn test_unsupported_assignment() {
        let mut s = String::new();
        assert_eq!(
            Slot::from(&mut s).assign(&Value::Int(1)),
            Err(Error::UnsupportedAssignment { value: Kind::Int, slot: "&mut String" })
        );
        let mut b = false;
        assert_eq!(
            Slot::from(&mut b).assign(&Value::String("true".into())),
            Err(Error::UnsupportedAssignment { value: Kind::String, slot: "&mut bool" })
        );
    }

    #[test]
    fn test_bytes_and_f32() {
        let mut bytes = Vec::new();
        Slot::from(&mut bytes).assign(&Value::String("iorin".into())).unwrap();
        assert_eq!(bytes, b"iorin".to_vec());
        let mut x = 0f32;
        Slot::from(&mut x).assign(&Value::Float(1.5)).unwrap();
        assert_eq!(x, 1.5);
    }

    #[test]
    fn test_f32_range() {
        let mut x = 0f32;
        assert_eq!(
            Slot::from(&mut x).assign(&Value::Float(1e300)),
            Err(Error::FloatOverflow { value: 1e300, slot: "&mut f32" })
        );
        assert_eq!(
            Slot::from(&mut x).assign(&Value::Float(-1e300)),
            Err(Error::FloatOverflow { value: -1e300, slot: "&mut f32" })
        );
        assert_eq!(x, 0.0);
        Slot::from(&mut x).assign(&Value::Float(f64::INFINITY)).unwrap();
        assert_eq!(x, f32::INFINITY);
        Slot::from(&mut x).assign(&Value::Float(3.0e38)).unwrap();
        assert_eq!(x, 3.0e38f32);
    }

    struct Locked {
        id: i64,
    }

    impl Record for Locked {
        fn members(&mut self) -> Vec<Member<'_>> {
            vec![Member::read_only("id")]
        }
    }

    #[test]
    fn test_record_read_only_member() {
        let mut locked = Locked { id: 7 };
        let err = Slot::Record(&mut locked).assign(&Value::Record(vec![Value::Int(1)]));
        assert_eq!(err, Err(Error::FieldNotAssignable { field: "id" }));
        assert_eq!(locked.id, 7);
    }

    #[derive(Default)]
    struct Pair {
        left: i32,
        right: String,
    }
    crate::record!(Pair { left, right });

    #[test]
    fn test_record_members() {
        let mut pair = Pair::default();
        Slot::Record(&mut pair)
            .assign(&Value::Record(vec![Value::Int(3), Value::String("x".into())]))
            .unwrap();
        assert_eq!((pair.left, pair.right.as_str()), (3, "x"));

        assert_eq!(
            Slot::Record(&mut pair).assign(&Value::Record(vec![
                Value::String("x".into()),
                Value::Int(3),
            ])),
            Err(Error::FieldTypeMismatch {
                field: "left",
                expected: "&mut i32",
                actual: Kind::String,
            })
        );
        assert_eq!(
            Slot::Record(&mut pair).assign(&Value::Record(vec![Value::Int(3)])),
            Err(Error::ArityMismatch { expected: 1, actual: 2 })
        );
    }
}
