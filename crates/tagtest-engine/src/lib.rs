//! tagtest engine - discover and run marker-tagged test methods
//!
//! A test subject is a type whose methods are tagged with parameter
//! literals, expected-result literals and a numeric tolerance. The engine
//! instantiates the subject once, expands every tagged method into cases,
//! coerces each literal to the declared parameter type, invokes the method,
//! and classifies the outcome as PASS, FAIL or ERROR.
//!
//! # Example
//!
//! ```
//! use tagtest_engine::{suite, NullObserver, Suite, TestRunner};
//!
//! #[derive(Default)]
//! struct Arithmetic;
//!
//! #[suite]
//! impl Arithmetic {
//!     #[tagtest(params = ["5", "10"], expected = ["25", "100"])]
//!     fn square(&self, n: i32) -> i32 {
//!         n * n
//!     }
//! }
//!
//! let mut subject = Arithmetic;
//! let suite = Suite::discover(&subject);
//! let report = TestRunner::new().run(&mut subject, &suite, &mut NullObserver);
//! assert_eq!(report.summary.passed, 2);
//! ```

pub mod coerce;
pub mod compare;
pub mod contain;
pub mod descriptor;
pub mod discovery;
pub mod error;
pub mod registry;
pub mod runner;
pub mod value;

pub use coerce::{coerce, FromParam, ParamKind};
pub use compare::{compare, Verdict};
pub use contain::is_panic_contained;
pub use descriptor::{DescriptorPlan, TestCase, TestDescriptor};
pub use discovery::{instantiate, Suite, TestSubject};
pub use error::{EngineError, Fault, FaultKind};
pub use registry::{SubjectEntry, SubjectRegistry};
pub use runner::{
    CaseDetail, CaseRecord, NullObserver, Outcome, RunObserver, RunReport, RunSummary, TestRunner,
};
pub use value::{IntoValue, Rendered, TestReturn, Value};

pub use tagtest_macros::suite;

// Lets `#[suite]` expansions name this crate from inside it
extern crate self as tagtest_engine;
