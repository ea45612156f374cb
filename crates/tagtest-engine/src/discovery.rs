//! Test discovery - enumerate the marked test methods of a subject

use crate::contain::contain;
use crate::descriptor::{DescriptorPlan, TestDescriptor};
use crate::error::{EngineError, Fault};
use tracing::debug;

/// A type whose instances carry test methods
///
/// Usually implemented through `#[suite]` on an inherent `impl` block, which
/// lists every method marked with `#[tagtest(...)]`.
pub trait TestSubject: Sized + 'static {
    /// Fully-qualified name used to select the subject
    fn subject_name() -> &'static str;

    /// Build a fresh instance with no arguments
    fn instantiate() -> Result<Self, EngineError>;

    /// Marked test methods, in a stable order
    fn test_methods(&self) -> Vec<TestDescriptor<Self>>;
}

/// Construct a subject, turning a panicking constructor into a configuration fault
pub fn instantiate<S: TestSubject>() -> Result<S, EngineError> {
    contain(S::instantiate).unwrap_or_else(|payload| {
        Err(EngineError::Instantiation {
            subject: S::subject_name().to_string(),
            reason: Fault::from_panic(payload.as_ref()).message,
        })
    })
}

/// The ordered test methods discovered on one subject instance
#[derive(Debug)]
pub struct Suite<S> {
    descriptors: Vec<TestDescriptor<S>>,
}

impl<S: TestSubject> Suite<S> {
    /// Discover the test methods of a live instance
    pub fn discover(subject: &S) -> Self {
        let descriptors = subject.test_methods();
        debug!(
            subject = S::subject_name(),
            count = descriptors.len(),
            "discovered test methods"
        );
        Self { descriptors }
    }
}

impl<S> Suite<S> {
    pub fn from_descriptors(descriptors: Vec<TestDescriptor<S>>) -> Self {
        Self { descriptors }
    }

    pub fn descriptors(&self) -> &[TestDescriptor<S>] {
        &self.descriptors
    }

    /// Check if suite has any tests
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Get count of test methods
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Total invocations across all descriptors
    pub fn case_count(&self) -> usize {
        self.descriptors.iter().map(TestDescriptor::case_count).sum()
    }

    pub fn plans(&self) -> Vec<DescriptorPlan> {
        self.descriptors.iter().map(TestDescriptor::plan).collect()
    }
}
