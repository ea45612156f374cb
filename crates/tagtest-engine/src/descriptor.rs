//! Test descriptors - one discovered test method plus its metadata

use crate::coerce::{FromParam, ParamKind};
use crate::error::Fault;
use crate::value::{TestReturn, Value};
use std::fmt;

/// Type alias for a boxed method invoker
type Invoker<S> = Box<dyn Fn(&mut S, Option<Value>) -> Result<Value, Fault>>;

/// A discovered test method
///
/// Holds the invoker for the method together with its parameter literals,
/// expected-result literals and numeric tolerance. The expected sequence may
/// be shorter than the parameter sequence; missing entries mean "no
/// expectation".
pub struct TestDescriptor<S> {
    name: String,
    param_kind: Option<ParamKind>,
    params: Vec<String>,
    expected: Vec<String>,
    tolerance: f64,
    invoker: Invoker<S>,
}

impl<S: 'static> TestDescriptor<S> {
    /// Describe a method that takes no parameter
    pub fn nullary<F, R>(name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&mut S) -> R + 'static,
        R: TestReturn + 'static,
    {
        Self::with_invoker(
            name,
            None,
            Box::new(move |subject, _arg| method(subject).into_test_result()),
        )
    }

    /// Describe a method that takes exactly one parameter
    ///
    /// The parameter type decides the coercion rule applied to each literal.
    pub fn unary<F, P, R>(name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&mut S, P) -> R + 'static,
        P: FromParam + 'static,
        R: TestReturn + 'static,
    {
        Self::with_invoker(
            name,
            Some(P::KIND),
            Box::new(move |subject, arg| {
                let Some(value) = arg else {
                    return Err(Fault::arity(1, 0));
                };
                let param = P::from_value(value)?;
                method(subject, param).into_test_result()
            }),
        )
    }

    fn with_invoker(name: impl Into<String>, param_kind: Option<ParamKind>, invoker: Invoker<S>) -> Self {
        Self {
            name: name.into(),
            param_kind,
            params: Vec::new(),
            expected: Vec::new(),
            tolerance: 0.0,
            invoker,
        }
    }
}

impl<S> TestDescriptor<S> {
    /// Set the parameter literals, one case per literal
    pub fn with_params<I, T>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// Set the expected-result literals, matched to cases by index
    pub fn with_expected<I, T>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.expected = expected.into_iter().map(Into::into).collect();
        self
    }

    /// Set the tolerance used for numeric comparison
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameter kind, `None` for methods without a parameter
    pub fn param_kind(&self) -> Option<ParamKind> {
        self.param_kind
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Number of invocations: one per parameter literal, at least one
    pub fn case_count(&self) -> usize {
        self.params.len().max(1)
    }

    /// Expand into concrete cases in parameter-index order
    pub fn cases(&self) -> impl Iterator<Item = TestCase<'_>> + '_ {
        (0..self.case_count()).map(move |index| TestCase {
            index,
            param: self.params.get(index).map(String::as_str),
            expected: self.expected.get(index).map(String::as_str),
        })
    }

    pub fn plan(&self) -> DescriptorPlan {
        DescriptorPlan {
            name: self.name.clone(),
            case_count: self.case_count(),
        }
    }

    /// Invoke the method on the subject with at most one argument
    pub fn invoke(&self, subject: &mut S, arg: Option<Value>) -> Result<Value, Fault> {
        (self.invoker)(subject, arg)
    }
}

impl<S> fmt::Debug for TestDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestDescriptor")
            .field("name", &self.name)
            .field("param_kind", &self.param_kind)
            .field("params", &self.params)
            .field("expected", &self.expected)
            .field("tolerance", &self.tolerance)
            .finish_non_exhaustive()
    }
}

/// One concrete invocation of a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase<'a> {
    pub index: usize,
    pub param: Option<&'a str>,
    pub expected: Option<&'a str>,
}

/// Name and case count of a descriptor, as shown in discovery output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorPlan {
    pub name: String,
    pub case_count: usize,
}
