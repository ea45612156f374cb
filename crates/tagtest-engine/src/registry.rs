//! Subject registry - resolve a subject name to something runnable
//!
//! Subjects are registered explicitly at startup. A name resolves by exact
//! match on the fully-qualified name, or by an unambiguous last path segment.
//! Dotted names (`demo.ShowcaseSuite`) are accepted as `::`-separated paths.

use crate::discovery::{instantiate, Suite, TestSubject};
use crate::error::EngineError;
use crate::runner::{RunObserver, RunReport, TestRunner};
use tracing::{debug, info};

type RunFn = fn(&TestRunner, &mut dyn RunObserver) -> Result<RunReport, EngineError>;

/// A registered subject
#[derive(Clone, Copy)]
pub struct SubjectEntry {
    name: &'static str,
    run: RunFn,
}

impl SubjectEntry {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the name
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    /// Instantiate, discover and run this subject
    pub fn run(
        &self,
        runner: &TestRunner,
        observer: &mut dyn RunObserver,
    ) -> Result<RunReport, EngineError> {
        (self.run)(runner, observer)
    }
}

impl std::fmt::Debug for SubjectEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubjectEntry").field("name", &self.name).finish()
    }
}

fn run_subject<S: TestSubject>(
    runner: &TestRunner,
    observer: &mut dyn RunObserver,
) -> Result<RunReport, EngineError> {
    let mut subject = instantiate::<S>()?;
    let suite = Suite::discover(&subject);
    Ok(runner.run(&mut subject, &suite, observer))
}

/// Known test subjects, in registration order
#[derive(Debug, Default)]
pub struct SubjectRegistry {
    entries: Vec<SubjectEntry>,
}

impl SubjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subject type; registering the same name again replaces it
    pub fn register<S: TestSubject>(&mut self) -> &mut Self {
        let entry = SubjectEntry {
            name: S::subject_name(),
            run: run_subject::<S>,
        };
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        debug!(subject = entry.name, "registered test subject");
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Find the subject a name refers to
    pub fn resolve(&self, name: &str) -> Result<&SubjectEntry, EngineError> {
        let wanted = name.trim().replace('.', "::");

        if let Some(entry) = self.entries.iter().find(|e| e.name == wanted) {
            return Ok(entry);
        }

        let matches: Vec<&SubjectEntry> = self
            .entries
            .iter()
            .filter(|e| e.short_name() == wanted || e.name.ends_with(&format!("::{}", wanted)))
            .collect();

        match matches.as_slice() {
            [entry] => Ok(*entry),
            [] => Err(EngineError::UnknownSubject {
                name: name.trim().to_string(),
                known: self.names().map(str::to_string).collect(),
            }),
            many => Err(EngineError::AmbiguousSubject {
                name: name.trim().to_string(),
                candidates: many.iter().map(|e| e.name.to_string()).collect(),
            }),
        }
    }

    /// Resolve and run a subject by name
    ///
    /// Only configuration faults are returned as errors; every test case
    /// outcome is part of the report.
    pub fn run(
        &self,
        name: &str,
        runner: &TestRunner,
        observer: &mut dyn RunObserver,
    ) -> Result<RunReport, EngineError> {
        let entry = self.resolve(name)?;
        info!(subject = entry.name, "running test subject");
        entry.run(runner, observer)
    }
}
