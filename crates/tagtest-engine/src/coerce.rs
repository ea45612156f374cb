//! Type coercion - convert parameter literals into typed arguments
//!
//! Each supported parameter type carries a `ParamKind` tag. Conversion is a
//! total function from `(ParamKind, literal)` to either a `Value` or a
//! coercion `Fault`.
//!
//! | kind     | rule                                        |
//! |----------|---------------------------------------------|
//! | `Text`   | identity                                    |
//! | `Int`    | base-10 `i32`                               |
//! | `Double` | decimal `f64`                               |
//! | `Float`  | decimal `f32`                               |
//! | `Long`   | base-10 `i64`                               |
//! | `Unsigned` | base-10 `u64`                             |
//! | `Bool`   | `"true"` (any case) is true, anything else false |
//! | `Char`   | first character, or `'\0'` for an empty literal |
//! | `Other`  | passed through as text                      |
//!
//! Narrower integer parameters (`i8`, `u16`, `u32`, `usize`, ...) coerce
//! through the widest kind that holds them and are range-checked on
//! extraction.

use crate::error::{short_type_name, Fault};
use crate::value::Value;
use std::fmt;
use std::num::TryFromIntError;
use std::str::FromStr;

/// Declared kind of a test method's parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Text,
    Int,
    Double,
    Float,
    Long,
    Unsigned,
    Bool,
    Char,
    Other,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Text => "text",
            ParamKind::Int => "int",
            ParamKind::Double => "double",
            ParamKind::Float => "float",
            ParamKind::Long => "long",
            ParamKind::Unsigned => "unsigned",
            ParamKind::Bool => "bool",
            ParamKind::Char => "char",
            ParamKind::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Convert one literal into a value of the given kind
pub fn coerce(kind: ParamKind, literal: &str) -> Result<Value, Fault> {
    match kind {
        ParamKind::Text | ParamKind::Other => Ok(Value::Text(literal.to_string())),
        ParamKind::Int => parse_literal::<i32>(kind, literal, literal).map(Value::Int),
        ParamKind::Long => parse_literal::<i64>(kind, literal, literal).map(Value::Long),
        ParamKind::Unsigned => parse_literal::<u64>(kind, literal, literal).map(Value::Unsigned),
        ParamKind::Double => parse_literal::<f64>(kind, literal, literal.trim()).map(Value::Double),
        ParamKind::Float => parse_literal::<f32>(kind, literal, literal.trim()).map(Value::Float),
        ParamKind::Bool => Ok(Value::Bool(literal.eq_ignore_ascii_case("true"))),
        ParamKind::Char => Ok(Value::Char(literal.chars().next().unwrap_or('\0'))),
    }
}

fn parse_literal<T>(kind: ParamKind, literal: &str, text: &str) -> Result<T, Fault>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.parse::<T>().map_err(|e| {
        Fault::coercion(
            short_type_name::<T::Err>(),
            format!("cannot convert \"{}\" to {}: {}", literal, kind, e),
        )
    })
}

/// Trait for parameter types a test method may declare
///
/// `KIND` selects the coercion rule; `from_value` extracts the typed
/// argument from the coerced value.
pub trait FromParam: Sized {
    const KIND: ParamKind;

    /// # Errors
    ///
    /// Returns a coercion `Fault` if the value does not hold this type.
    fn from_value(value: Value) -> Result<Self, Fault>;
}

fn mismatch(kind: ParamKind, value: &Value) -> Fault {
    Fault::coercion(
        "TypeMismatch",
        format!("expected {}, found {}", kind, value.type_name()),
    )
}

macro_rules! impl_from_param {
    ($($ty:ty => $kind:ident, $variant:ident);* $(;)?) => {
        $(
            impl FromParam for $ty {
                const KIND: ParamKind = ParamKind::$kind;

                fn from_value(value: Value) -> Result<Self, Fault> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch(Self::KIND, &other)),
                    }
                }
            }
        )*
    };
}

impl_from_param! {
    String => Text, Text;
    i32 => Int, Int;
    f64 => Double, Double;
    f32 => Float, Float;
    i64 => Long, Long;
    bool => Bool, Bool;
    char => Char, Char;
}

macro_rules! impl_narrowing_from_param {
    ($($ty:ty => $kind:ident, $variant:ident);* $(;)?) => {
        $(
            impl FromParam for $ty {
                const KIND: ParamKind = ParamKind::$kind;

                fn from_value(value: Value) -> Result<Self, Fault> {
                    match value {
                        Value::$variant(v) => <$ty>::try_from(v).map_err(|e| {
                            Fault::coercion(
                                short_type_name::<TryFromIntError>(),
                                format!("cannot convert {} to {}: {}", v, stringify!($ty), e),
                            )
                        }),
                        other => Err(mismatch(Self::KIND, &other)),
                    }
                }
            }
        )*
    };
}

impl_narrowing_from_param! {
    i8 => Int, Int;
    i16 => Int, Int;
    u8 => Int, Int;
    u16 => Int, Int;
    u32 => Long, Long;
    isize => Long, Long;
    usize => Unsigned, Unsigned;
}

impl FromParam for u64 {
    const KIND: ParamKind = ParamKind::Unsigned;

    fn from_value(value: Value) -> Result<Self, Fault> {
        match value {
            Value::Unsigned(v) => Ok(v),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

/// Receives the literal unconverted
impl FromParam for Value {
    const KIND: ParamKind = ParamKind::Other;

    fn from_value(value: Value) -> Result<Self, Fault> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FaultKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::text(ParamKind::Text, "hello", Value::Text("hello".to_string()))]
    #[case::int(ParamKind::Int, "-5", Value::Int(-5))]
    #[case::int_plus(ParamKind::Int, "+7", Value::Int(7))]
    #[case::long(ParamKind::Long, "9000000000", Value::Long(9_000_000_000))]
    #[case::unsigned(ParamKind::Unsigned, "18446744073709551615", Value::Unsigned(u64::MAX))]
    #[case::double(ParamKind::Double, "6.25e-3", Value::Double(0.00625))]
    #[case::double_padded(ParamKind::Double, " 2.5 ", Value::Double(2.5))]
    #[case::float(ParamKind::Float, "1.125", Value::Float(1.125))]
    #[case::bool_true(ParamKind::Bool, "TRUE", Value::Bool(true))]
    #[case::bool_other(ParamKind::Bool, "yes", Value::Bool(false))]
    #[case::char(ParamKind::Char, "xyz", Value::Char('x'))]
    #[case::char_empty(ParamKind::Char, "", Value::Char('\0'))]
    #[case::other(ParamKind::Other, "raw", Value::Text("raw".to_string()))]
    fn test_coercion_table(#[case] kind: ParamKind, #[case] literal: &str, #[case] expected: Value) {
        assert_eq!(coerce(kind, literal).unwrap(), expected);
    }

    #[rstest]
    #[case::int_word(ParamKind::Int, "abc", "ParseIntError")]
    #[case::int_overflow(ParamKind::Int, "3000000000", "ParseIntError")]
    #[case::int_padded(ParamKind::Int, " 5", "ParseIntError")]
    #[case::long_fraction(ParamKind::Long, "1.5", "ParseIntError")]
    #[case::unsigned_negative(ParamKind::Unsigned, "-1", "ParseIntError")]
    #[case::double_word(ParamKind::Double, "pi", "ParseFloatError")]
    #[case::float_empty(ParamKind::Float, "", "ParseFloatError")]
    fn test_coercion_faults(#[case] kind: ParamKind, #[case] literal: &str, #[case] category: &str) {
        let fault = coerce(kind, literal).unwrap_err();
        assert_eq!(fault.kind, FaultKind::Coercion);
        assert_eq!(fault.category, category);
        assert!(fault.message.contains(&format!("\"{}\"", literal)));
    }

    #[test]
    fn test_from_param_extracts_matching_variant() {
        assert_eq!(i32::from_value(Value::Int(3)).unwrap(), 3);
        assert_eq!(String::from_value(Value::Text("a".into())).unwrap(), "a");
        assert_eq!(
            Value::from_value(Value::Text("raw".into())).unwrap(),
            Value::Text("raw".into())
        );
    }

    #[test]
    fn test_from_param_mismatch() {
        let fault = i32::from_value(Value::Text("5".into())).unwrap_err();
        assert_eq!(fault.category, "TypeMismatch");
        assert_eq!(fault.message, "expected int, found text");
    }

    #[test]
    fn test_narrow_integers_are_range_checked() {
        assert_eq!(u8::from_value(Value::Int(255)).unwrap(), 255);
        assert_eq!(i16::from_value(Value::Int(-300)).unwrap(), -300);
        assert_eq!(u32::from_value(Value::Long(4_000_000_000)).unwrap(), 4_000_000_000);
        assert_eq!(usize::from_value(Value::Unsigned(7)).unwrap(), 7);

        let fault = u8::from_value(Value::Int(300)).unwrap_err();
        assert_eq!(fault.kind, FaultKind::Coercion);
        assert_eq!(fault.category, "TryFromIntError");
        assert!(fault.message.starts_with("cannot convert 300 to u8"));

        let fault = u32::from_value(Value::Long(-1)).unwrap_err();
        assert_eq!(fault.category, "TryFromIntError");
    }

    #[test]
    fn test_declared_kinds() {
        assert_eq!(<String as FromParam>::KIND, ParamKind::Text);
        assert_eq!(<i64 as FromParam>::KIND, ParamKind::Long);
        assert_eq!(<f32 as FromParam>::KIND, ParamKind::Float);
        assert_eq!(<u16 as FromParam>::KIND, ParamKind::Int);
        assert_eq!(<usize as FromParam>::KIND, ParamKind::Unsigned);
        assert_eq!(<Value as FromParam>::KIND, ParamKind::Other);
    }
}
