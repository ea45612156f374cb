//! Runtime values passed into and returned from tested methods
//!
//! Provides the `Value` enum plus the conversion traits used at the
//! method boundary:
//! - `IntoValue` - convert a Rust return type into a `Value`
//! - `TestReturn` - convert a method's return into `Result<Value, Fault>`

use crate::error::Fault;
use std::fmt;

/// A typed value as seen by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absence of a value (unit-returning methods)
    Null,
    Text(String),
    Int(i32),
    Long(i64),
    /// Unsigned integers too wide for `Long`
    Unsigned(u64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
}

impl Value {
    /// True for the integer and floating variants
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::Long(_) | Value::Unsigned(_) | Value::Float(_) | Value::Double(_)
        )
    }

    /// Widen a numeric value to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Unsigned(n) => Some(*n as f64),
            Value::Float(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Name of the variant, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Unsigned(_) => "unsigned",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
        }
    }
}

/// Canonical text of a floating value: integral values keep a trailing `.0`
fn write_float<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    value: T,
    nan: bool,
    infinite: bool,
    negative: bool,
    integral: bool,
) -> fmt::Result {
    if nan {
        write!(f, "NaN")
    } else if infinite {
        write!(f, "{}Infinity", if negative { "-" } else { "" })
    } else if integral {
        write!(f, "{:.1}", value)
    } else {
        write!(f, "{}", value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Text(s) => write!(f, "{}", s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Unsigned(n) => write!(f, "{}", n),
            Value::Float(n) => write_float(
                f,
                n,
                n.is_nan(),
                n.is_infinite(),
                n.is_sign_negative(),
                n.fract() == 0.0,
            ),
            Value::Double(n) => write_float(
                f,
                n,
                n.is_nan(),
                n.is_infinite(),
                n.is_sign_negative(),
                n.fract() == 0.0,
            ),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
        }
    }
}

/// Trait for converting Rust return types into a `Value`
pub trait IntoValue {
    fn into_value(self) -> Value;
}

macro_rules! impl_into_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

impl_into_value! {
    String => Text,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    bool => Bool,
    char => Char,
}

// Lossless widening of the remaining integer types
macro_rules! impl_widening_into_value {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::$variant(self as $target)
                }
            }
        )*
    };
}

impl_widening_into_value! {
    i8 => Int as i32,
    i16 => Int as i32,
    u8 => Int as i32,
    u16 => Int as i32,
    u32 => Long as i64,
    isize => Long as i64,
    u64 => Unsigned as u64,
    usize => Unsigned as u64,
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

/// Return wrapper for any `Display` type, compared by its rendered text
///
/// ```
/// use tagtest_engine::{IntoValue, Rendered, Value};
///
/// let value = Rendered(std::net::Ipv4Addr::LOCALHOST).into_value();
/// assert_eq!(value, Value::Text("127.0.0.1".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendered<T>(pub T);

impl<T: fmt::Display> IntoValue for Rendered<T> {
    fn into_value(self) -> Value {
        Value::Text(self.0.to_string())
    }
}

impl<T: fmt::Display> TestReturn for Rendered<T> {
    fn into_test_result(self) -> Result<Value, Fault> {
        Ok(self.into_value())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

/// What a tested method may return
///
/// Plain values always succeed. A `Result` whose `Err` arm is taken becomes
/// a raised fault, classified as ERROR by the runner.
pub trait TestReturn {
    fn into_test_result(self) -> Result<Value, Fault>;
}

macro_rules! impl_test_return {
    ($($ty:ty),* $(,)?) => {
        $(
            impl TestReturn for $ty {
                fn into_test_result(self) -> Result<Value, Fault> {
                    Ok(self.into_value())
                }
            }
        )*
    };
}

impl_test_return!(
    (), String, &str, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char,
    Value,
);

impl<T: IntoValue> TestReturn for Option<T> {
    fn into_test_result(self) -> Result<Value, Fault> {
        Ok(self.into_value())
    }
}

impl<T: IntoValue, E: fmt::Display> TestReturn for Result<T, E> {
    fn into_test_result(self) -> Result<Value, Fault> {
        match self {
            Ok(v) => Ok(v.into_value()),
            Err(e) => Err(Fault::raised(&e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;
    use rstest::rstest;

    #[rstest]
    #[case::null(Value::Null, "null")]
    #[case::text(Value::Text("HELLO".to_string()), "HELLO")]
    #[case::int(Value::Int(-25), "-25")]
    #[case::long(Value::Long(9_000_000_000), "9000000000")]
    #[case::unsigned(Value::Unsigned(u64::MAX), "18446744073709551615")]
    #[case::double_fraction(Value::Double(1.75), "1.75")]
    #[case::double_integral(Value::Double(100.0), "100.0")]
    #[case::float_fraction(Value::Float(2.5), "2.5")]
    #[case::float_integral(Value::Float(3.0), "3.0")]
    #[case::negative_zero(Value::Double(-0.0), "-0.0")]
    #[case::nan(Value::Double(f64::NAN), "NaN")]
    #[case::infinity(Value::Float(f32::INFINITY), "Infinity")]
    #[case::neg_infinity(Value::Double(f64::NEG_INFINITY), "-Infinity")]
    #[case::bool(Value::Bool(false), "false")]
    #[case::char(Value::Char('x'), "x")]
    fn test_canonical_text(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }

    #[test]
    fn test_numeric_widening() {
        assert_eq!(Value::Int(5).as_f64(), Some(5.0));
        assert_eq!(Value::Long(-7).as_f64(), Some(-7.0));
        assert_eq!(Value::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::Unsigned(12).as_f64(), Some(12.0));
        assert_eq!(Value::Char('5').as_f64(), None);
        assert!(!Value::Bool(true).is_numeric());
        assert!(!Value::Null.is_numeric());
    }

    #[test]
    fn test_integer_widths_widen() {
        assert_eq!(200u8.into_value(), Value::Int(200));
        assert_eq!((-3i16).into_value(), Value::Int(-3));
        assert_eq!(4_000_000_000u32.into_value(), Value::Long(4_000_000_000));
        assert_eq!(3usize.into_value(), Value::Unsigned(3));
        assert!(u64::MAX.into_value().is_numeric());
    }

    #[test]
    fn test_rendered_uses_display() {
        struct Point(i32, i32);

        impl fmt::Display for Point {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "({}, {})", self.0, self.1)
            }
        }

        assert_eq!(
            Rendered(Point(1, -2)).into_test_result(),
            Ok(Value::Text("(1, -2)".to_string()))
        );
    }

    #[test]
    fn test_unit_and_option_map_to_null() {
        assert_eq!(().into_value(), Value::Null);
        assert_eq!(None::<i32>.into_value(), Value::Null);
        assert_eq!(Some(4).into_value(), Value::Int(4));
    }

    #[test]
    fn test_result_return_becomes_raised_fault() {
        let ok: Result<i32, String> = Ok(3);
        assert_eq!(ok.into_test_result(), Ok(Value::Int(3)));

        let err: Result<i32, std::num::ParseIntError> = "x".parse::<i32>();
        let fault = err.into_test_result().unwrap_err();
        assert_eq!(fault.kind, FaultKind::Raised);
        assert_eq!(fault.category, "ParseIntError");
    }
}
