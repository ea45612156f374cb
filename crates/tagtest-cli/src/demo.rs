//! Demonstration subjects shipped with the binary

use std::fmt;
use tagtest_engine::{suite, SubjectRegistry};
use tracing::info;

/// Registry of every subject the binary can run
pub fn registry() -> SubjectRegistry {
    let mut registry = SubjectRegistry::new();
    registry
        .register::<ShowcaseSuite>()
        .register::<CounterSuite>()
        .register::<EmptySuite>()
        .register::<MisconfiguredSuite>();
    registry
}

/// Error returned on purpose by `ShowcaseSuite::test_that_throws_error`
#[derive(Debug)]
pub struct IntentionalError;

impl fmt::Display for IntentionalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Intentional error for testing")
    }
}

/// Tour of every marker shape: no params, params, expected results,
/// tolerance, a wrong expectation and two faulting methods
#[derive(Debug, Default)]
pub struct ShowcaseSuite;

#[suite]
impl ShowcaseSuite {
    #[tagtest]
    pub fn simple_test(&self) {
        info!("executing simple test without parameters");
    }

    #[tagtest(params = [10, 20, 30])]
    pub fn test_with_multiple_params(&self, value: i32) {
        info!(value, "processing value");
    }

    #[allow(dead_code)]
    pub fn not_annotated_method(&self) {
        info!("this method should not be executed");
    }

    #[tagtest]
    pub fn test_that_throws_error(&self) -> Result<(), IntentionalError> {
        Err(IntentionalError)
    }

    #[tagtest(params = [5, 10], expected = [25, 100])]
    pub fn square(&self, num: i32) -> i32 {
        num * num
    }

    #[tagtest(params = ["hello", "world"], expected = ["HELLO", "WORLD"])]
    pub fn convert_to_upper_case(&self, text: String) -> String {
        text.to_uppercase()
    }

    #[tagtest(params = [-5, 0, 7], expected = [false, false, true])]
    pub fn is_positive(&self, number: i32) -> bool {
        number > 0
    }

    #[tagtest(params = ["3.14159", "2.71828"], expected = ["3.14", "2.72"], tolerance = 0.01)]
    pub fn round_to_two_decimals(&self, value: f64) -> f64 {
        (value * 100.0).round() / 100.0
    }

    #[tagtest(params = [10, 5], expected = [50, 999])]
    pub fn multiply_by_five(&self, num: i32) -> i32 {
        num * 5
    }

    #[tagtest(expected = [42])]
    pub fn return_constant(&self) -> i32 {
        42
    }

    #[tagtest(params = ["test"])]
    pub fn void_method_with_param(&self, text: String) {
        info!(%text, "void method called");
    }

    #[tagtest]
    pub fn another_error_test(&self) -> i32 {
        100 / std::hint::black_box(0)
    }
}

/// Counter whose state carries from one case to the next
#[derive(Debug, Default)]
pub struct CounterSuite {
    count: i64,
}

#[suite]
impl CounterSuite {
    #[tagtest(params = [1, 2, 3], expected = [1, 3, 6])]
    pub fn add(&mut self, amount: i64) -> i64 {
        self.count += amount;
        self.count
    }

    #[tagtest(expected = [6])]
    pub fn current(&self) -> i64 {
        self.count
    }

    #[tagtest(expected = [0])]
    pub fn reset(&mut self) -> i64 {
        self.count = 0;
        self.count
    }
}

/// Subject without any marked method
#[derive(Debug, Default)]
pub struct EmptySuite;

#[suite]
impl EmptySuite {
    #[allow(dead_code)]
    pub fn helper(&self) -> &'static str {
        "not a test"
    }
}

/// Subject whose construction fails, so the run stops before discovery
#[derive(Debug)]
pub struct MisconfiguredSuite {
    fixture: String,
}

impl Default for MisconfiguredSuite {
    fn default() -> Self {
        match std::env::var("TAGTEST_DEMO_FIXTURE") {
            Ok(fixture) if !fixture.is_empty() => Self { fixture },
            _ => panic!("missing fixture file"),
        }
    }
}

#[suite]
impl MisconfiguredSuite {
    #[tagtest(expected = [true])]
    pub fn fixture_is_csv(&self) -> bool {
        self.fixture.ends_with(".csv")
    }
}
