//! Console reporter - render a run as it progresses

use colored::*;
use std::fmt::Display;
use std::io::{self, Write};
use tagtest_engine::{CaseDetail, CaseRecord, DescriptorPlan, Outcome, RunObserver, RunSummary, Verdict};

const WIDTH: usize = 70;

/// Writes the human-readable report for one run
pub struct ConsoleReporter<W: Write> {
    out: W,
    /// Show how each match was decided
    verbose: bool,
    /// First write failure, surfaced by `finish`
    error: Option<io::Error>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Self::new(io::stdout(), verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            error: None,
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl Display) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out, "{}", text) {
            self.error = Some(err);
        }
    }

    /// Flush the output and report the first write failure, if any
    pub fn finish(mut self) -> io::Result<()> {
        match self.error.take() {
            Some(err) => Err(err),
            None => self.out.flush(),
        }
    }

    /// Banner and subject line printed before anything runs
    pub fn header(&mut self, subject: &str) {
        self.line("");
        self.line("═".repeat(WIDTH));
        self.line(format!("{:^w$}", "TEST ENGINE", w = WIDTH).bold());
        self.line("═".repeat(WIDTH));
        self.line("");
        self.line(format!("Subject under test: {}", subject.bold()));
        self.line("");
    }

    fn rule(&mut self, title: &str) {
        self.line("─".repeat(WIDTH));
        self.line(title.bold());
        self.line("─".repeat(WIDTH));
    }

    fn discovery_box(&mut self, plans: &[DescriptorPlan]) {
        let inner = WIDTH - 2;
        self.line(format!("╔{}╗", "═".repeat(inner)));
        self.line(format!("║ {:<w$} ║", "TEST DISCOVERY", w = inner - 2));
        self.line(format!("╠{}╣", "═".repeat(inner)));
        self.line(format!(
            "║ {:<w$} ║",
            format!("Found {} test method(s):", plans.len()),
            w = inner - 2
        ));
        self.line(format!("╠{}╣", "═".repeat(inner)));
        for (i, plan) in plans.iter().enumerate() {
            let info = format!(
                "  {}. {} → {} test case(s)",
                i + 1,
                plan.name,
                plan.case_count
            );
            self.line(format!("║ {:<w$} ║", info, w = inner - 2));
        }
        self.line(format!("╚{}╝", "═".repeat(inner)));
    }

    fn case_line(&self, record: &CaseRecord) -> String {
        let param = record
            .param
            .as_ref()
            .map(|p| format!(" [param: {}]", p))
            .unwrap_or_default();

        match (&record.detail, record.outcome) {
            (CaseDetail::Faulted(fault), _) => {
                format!("  {}{} → {}", "⚠ ERROR".yellow().bold(), param, fault)
            }
            (CaseDetail::Returned { verdict, .. }, Outcome::Pass)
                if *verdict == Verdict::NoExpectation =>
            {
                format!(
                    "  {}{} {}",
                    "✓ PASS".green().bold(),
                    param,
                    "(no expected result defined)".dimmed()
                )
            }
            (CaseDetail::Returned { value, verdict }, Outcome::Pass) => {
                let mut line = format!("  {}{} → result: {}", "✓ PASS".green().bold(), param, value);
                if self.verbose {
                    line.push_str(&format!(" {}", describe(verdict).dimmed()));
                }
                line
            }
            (CaseDetail::Returned { value, .. }, _) => format!(
                "  {}{} → expected: {}, got: {}",
                "✗ FAIL".red().bold(),
                param,
                record.expected.as_deref().unwrap_or("null"),
                value
            ),
        }
    }

    fn summary(&mut self, summary: &RunSummary) {
        self.rule("RESULTS SUMMARY");
        self.line(format!("Total executed: {}", summary.total()));
        self.line(format!("  {}  {}", "✓ PASSED:".green(), summary.passed));
        self.line(format!("  {}  {}", "✗ FAILED:".red(), summary.failed));
        self.line(format!("  {}  {}", "⚠ ERRORS:".yellow(), summary.errors));
        self.line("");
        self.line(format!("Success rate: {:.1}%", summary.success_rate()));
        self.line("─".repeat(WIDTH));
        self.line("");

        if summary.is_success() {
            self.line("🎉 All tests passed successfully!".green().bold());
        } else if summary.errors > 0 {
            self.line("⚠ Some tests encountered errors.".yellow().bold());
        } else {
            self.line("✗ Some tests failed.".red().bold());
        }
    }
}

fn describe(verdict: &Verdict) -> String {
    match verdict {
        Verdict::NoExpectation => "(no expectation)".to_string(),
        Verdict::Exact => "(exact match)".to_string(),
        Verdict::WithinTolerance { delta } => format!("(within tolerance, delta {})", delta),
        Verdict::Mismatch => "(mismatch)".to_string(),
    }
}

impl<W: Write> RunObserver for ConsoleReporter<W> {
    fn on_discovery(&mut self, _subject: &str, plans: &[DescriptorPlan]) {
        if plans.is_empty() {
            self.line("No test methods discovered.".yellow());
            return;
        }
        self.discovery_box(plans);
        self.line("");
        self.rule("EXECUTING TESTS");
        self.line("");
    }

    fn on_descriptor_start(&mut self, plan: &DescriptorPlan) {
        self.line(format!("▶ Test: {}", plan.name.bold()));
    }

    fn on_case_complete(&mut self, record: &CaseRecord) {
        let line = self.case_line(record);
        self.line(line);
    }

    fn on_descriptor_complete(&mut self, _plan: &DescriptorPlan) {
        self.line("");
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        if summary.total() > 0 {
            self.summary(summary);
        }
    }
}
