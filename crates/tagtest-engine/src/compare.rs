//! Result comparison - match an actual value against an expected literal

use crate::value::Value;

/// How a comparison was decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// No expected literal was supplied; any return value is accepted
    NoExpectation,
    /// Canonical text equals the expected literal
    Exact,
    /// Numeric value lies within the tolerance of the parsed literal
    WithinTolerance { delta: f64 },
    Mismatch,
}

impl Verdict {
    pub fn is_match(&self) -> bool {
        !matches!(self, Verdict::Mismatch)
    }
}

/// Compare an actual value against an optional expected literal
///
/// Checked in order: missing expectation, null handling, exact canonical
/// text, then numeric distance against `tolerance`.
pub fn compare(actual: &Value, expected: Option<&str>, tolerance: f64) -> Verdict {
    let Some(expected) = expected else {
        return Verdict::NoExpectation;
    };

    if actual.is_null() {
        return if expected == "null" {
            Verdict::Exact
        } else {
            Verdict::Mismatch
        };
    }

    if actual.to_string() == expected {
        return Verdict::Exact;
    }

    let (Some(actual_num), Ok(expected_num)) = (actual.as_f64(), expected.trim().parse::<f64>())
    else {
        return Verdict::Mismatch;
    };

    let delta = (actual_num - expected_num).abs();
    if delta <= tolerance {
        Verdict::WithinTolerance { delta }
    } else {
        Verdict::Mismatch
    }
}
