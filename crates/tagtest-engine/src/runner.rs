//! Test runner - execute discovered test methods case by case

use crate::coerce::coerce;
use crate::compare::{compare, Verdict};
use crate::contain::contain;
use crate::descriptor::{DescriptorPlan, TestCase, TestDescriptor};
use crate::discovery::{Suite, TestSubject};
use crate::error::Fault;
use crate::value::Value;
use std::fmt;
use tracing::{debug, trace, warn};

/// Classification of one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "PASS"),
            Outcome::Fail => write!(f, "FAIL"),
            Outcome::Error => write!(f, "ERROR"),
        }
    }
}

/// What happened when a case ran
#[derive(Debug, Clone, PartialEq)]
pub enum CaseDetail {
    /// The method returned normally
    Returned { value: Value, verdict: Verdict },
    /// Coercion or invocation faulted
    Faulted(Fault),
}

/// Outcome record for one case
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub descriptor: String,
    pub index: usize,
    pub param: Option<String>,
    pub expected: Option<String>,
    pub outcome: Outcome,
    pub detail: CaseDetail,
}

impl CaseRecord {
    /// Returned value, if the method did not fault
    pub fn value(&self) -> Option<&Value> {
        match &self.detail {
            CaseDetail::Returned { value, .. } => Some(value),
            CaseDetail::Faulted(_) => None,
        }
    }

    pub fn fault(&self) -> Option<&Fault> {
        match &self.detail {
            CaseDetail::Faulted(fault) => Some(fault),
            CaseDetail::Returned { .. } => None,
        }
    }
}

impl fmt::Display for CaseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor)?;
        if let Some(param) = &self.param {
            write!(f, " [param: {}]", param)?;
        }
        write!(f, " {}", self.outcome)?;
        match (&self.detail, &self.expected) {
            (CaseDetail::Faulted(fault), _) => write!(f, " -> {}", fault),
            (CaseDetail::Returned { value, .. }, Some(expected)) if self.outcome == Outcome::Fail => {
                write!(f, " -> expected: {}, got: {}", expected, value)
            }
            (CaseDetail::Returned { value, .. }, _) => write!(f, " -> result: {}", value),
        }
    }
}

/// Aggregate counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail => self.failed += 1,
            Outcome::Error => self.errors += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errors
    }

    /// Percentage of passing cases, 0.0 for an empty run
    pub fn success_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.passed as f64 * 100.0 / total as f64
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// Everything a run produced, in execution order
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub subject: String,
    pub plans: Vec<DescriptorPlan>,
    pub records: Vec<CaseRecord>,
    pub summary: RunSummary,
}

/// Hooks invoked while a run progresses
///
/// Implement this trait to render results as they happen. Every hook has a
/// no-op default.
pub trait RunObserver {
    /// Called once the selected test methods are known
    fn on_discovery(&mut self, _subject: &str, _plans: &[DescriptorPlan]) {}

    /// Called before the first case of a test method
    fn on_descriptor_start(&mut self, _plan: &DescriptorPlan) {}

    /// Called when a case completes
    fn on_case_complete(&mut self, _record: &CaseRecord) {}

    /// Called after the last case of a test method
    fn on_descriptor_complete(&mut self, _plan: &DescriptorPlan) {}

    /// Called when all cases have completed
    fn on_run_complete(&mut self, _summary: &RunSummary) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl RunObserver for NullObserver {}

/// Test runner with configuration
#[derive(Debug, Default, Clone)]
pub struct TestRunner {
    /// Only run test methods whose name contains this pattern
    filter: Option<String>,
}

impl TestRunner {
    /// Create a new test runner with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the run to test methods whose name contains `pattern`
    pub fn with_filter(mut self, pattern: Option<String>) -> Self {
        self.filter = pattern;
        self
    }

    fn selects(&self, name: &str) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |pattern| name.contains(pattern))
    }

    /// Run every selected test method of the suite against one instance
    ///
    /// The instance is reused across all cases, so state mutated by one case
    /// is visible to the next. Faults are contained per case; the run always
    /// completes.
    pub fn run<S: TestSubject>(
        &self,
        subject: &mut S,
        suite: &Suite<S>,
        observer: &mut dyn RunObserver,
    ) -> RunReport {
        let selected: Vec<&TestDescriptor<S>> = suite
            .descriptors()
            .iter()
            .filter(|d| self.selects(d.name()))
            .collect();
        let plans: Vec<DescriptorPlan> = selected.iter().map(|d| d.plan()).collect();

        observer.on_discovery(S::subject_name(), &plans);

        let mut records = Vec::new();
        let mut summary = RunSummary::default();

        for (descriptor, plan) in selected.iter().zip(&plans) {
            debug!(test = plan.name.as_str(), cases = plan.case_count, "running test method");
            observer.on_descriptor_start(plan);

            for case in descriptor.cases() {
                let record = run_case(subject, descriptor, &case);
                summary.record(record.outcome);
                observer.on_case_complete(&record);
                records.push(record);
            }

            observer.on_descriptor_complete(plan);
        }

        observer.on_run_complete(&summary);

        RunReport {
            subject: S::subject_name().to_string(),
            plans,
            records,
            summary,
        }
    }
}

/// Run a single case: coerce, invoke, compare, classify
fn run_case<S>(subject: &mut S, descriptor: &TestDescriptor<S>, case: &TestCase<'_>) -> CaseRecord {
    let (outcome, detail) = match invoke_case(subject, descriptor, case.param) {
        Ok(value) => {
            let verdict = compare(&value, case.expected, descriptor.tolerance());
            let outcome = if verdict.is_match() {
                Outcome::Pass
            } else {
                Outcome::Fail
            };
            (outcome, CaseDetail::Returned { value, verdict })
        }
        Err(fault) => {
            warn!(
                test = descriptor.name(),
                case = case.index,
                category = fault.category.as_str(),
                "{}",
                fault.message
            );
            (Outcome::Error, CaseDetail::Faulted(fault))
        }
    };

    trace!(test = descriptor.name(), case = case.index, %outcome, "case complete");

    CaseRecord {
        descriptor: descriptor.name().to_string(),
        index: case.index,
        param: case.param.map(str::to_string),
        expected: case.expected.map(str::to_string),
        outcome,
        detail,
    }
}

fn invoke_case<S>(
    subject: &mut S,
    descriptor: &TestDescriptor<S>,
    param: Option<&str>,
) -> Result<Value, Fault> {
    let arg = match (param, descriptor.param_kind()) {
        (Some(literal), Some(kind)) => Some(coerce(kind, literal)?),
        _ => None,
    };

    contain(|| descriptor.invoke(subject, arg))
        .unwrap_or_else(|payload| Err(Fault::from_panic(payload.as_ref())))
}
