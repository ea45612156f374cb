//! Error types for the engine
//!
//! Two layers exist:
//! - `EngineError` - configuration faults that abort a run before any case executes
//! - `Fault` - a contained per-case fault that becomes an ERROR outcome

use std::fmt;
use thiserror::Error;

/// Configuration fault raised while resolving or constructing a test subject
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// No registered subject matches the requested name
    #[error("Unknown test subject: {name}")]
    UnknownSubject { name: String, known: Vec<String> },
    /// A short name matched more than one registered subject
    #[error("Ambiguous test subject '{name}', candidates: {}", candidates.join(", "))]
    AmbiguousSubject {
        name: String,
        candidates: Vec<String>,
    },
    /// The subject exists but could not be constructed
    #[error("Unable to create instance of {subject}: {reason}")]
    Instantiation { subject: String, reason: String },
}

/// Where a contained fault originated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A parameter literal could not be converted to the declared type
    Coercion,
    /// The method was invoked with the wrong number of arguments
    Arity,
    /// The tested method panicked
    Panic,
    /// The tested method returned an `Err`
    Raised,
}

/// A fault captured at the single-case boundary
#[derive(Debug, Clone, PartialEq)]
pub struct Fault {
    pub kind: FaultKind,
    /// Short category name, e.g. `ParseIntError` or `panic`
    pub category: String,
    pub message: String,
}

impl Fault {
    pub fn new(kind: FaultKind, category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            category: category.into(),
            message: message.into(),
        }
    }

    pub fn coercion(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FaultKind::Coercion, category, message)
    }

    pub fn arity(expected: usize, got: usize) -> Self {
        Self::new(
            FaultKind::Arity,
            "ArityMismatch",
            format!(
                "expected {} argument{}, got {}",
                expected,
                if expected == 1 { "" } else { "s" },
                got
            ),
        )
    }

    /// Build a fault from a panic payload
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "test method panicked".to_string()
        };
        Self::new(FaultKind::Panic, "panic", message)
    }

    /// Build a fault from an error value returned by a tested method
    pub fn raised<E: fmt::Display>(err: &E) -> Self {
        Self::new(FaultKind::Raised, short_type_name::<E>(), err.to_string())
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

const POINTER_WRAPPERS: [&str; 3] = ["alloc::boxed::Box<", "alloc::rc::Rc<", "alloc::sync::Arc<"];

/// Last path segment of a type name, generics stripped
///
/// Smart pointers are looked through, so `Box<dyn Error + Send>` names
/// `Error` and `Box<Overdrawn>` names `Overdrawn`.
pub(crate) fn short_type_name<T: ?Sized>() -> String {
    let mut name = std::any::type_name::<T>();
    while let Some(inner) = POINTER_WRAPPERS
        .iter()
        .find_map(|wrapper| name.strip_prefix(wrapper))
        .and_then(|rest| rest.strip_suffix('>'))
    {
        name = inner;
    }
    let name = name.trim_start_matches('&').trim_start_matches("dyn ");
    let base = name.split(['<', ' ', '+']).next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
