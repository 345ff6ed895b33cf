// src/summary.rs
//! Per-case outcomes and the suite tally.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::error::CollaboratorError;
use crate::report::RULE;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "harness_cases_total",
            "Cases recorded, labelled by suite and status."
        );
        describe_counter!(
            "harness_items_observed_total",
            "Items returned by collaborators across cases."
        );
        describe_histogram!("harness_case_seconds", "Wall-clock time per case.");
    });
}

/// Diagnostic for a collaborator fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub kind: String,
    pub message: String,
}

impl From<&CollaboratorError> for Fault {
    fn from(e: &CollaboratorError) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseOutcome {
    pub case_id: String,
    pub success: bool,
    pub observed_count: usize,
    pub elapsed: Duration,
    pub fault: Option<Fault>,
}

impl TestCaseOutcome {
    pub fn completed(
        case_id: impl Into<String>,
        success: bool,
        observed: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            success,
            observed_count: observed,
            elapsed,
            fault: None,
        }
    }

    pub fn faulted(case_id: impl Into<String>, fault: Fault, elapsed: Duration) -> Self {
        Self {
            case_id: case_id.into(),
            success: false,
            observed_count: 0,
            elapsed,
            fault: Some(fault),
        }
    }

    /// One-line diagnostic for a faulted case.
    pub fn diagnostic(&self) -> Option<String> {
        self.fault
            .as_ref()
            .map(|f| format!("FAILED {}: {} ({})", self.case_id, f.message, f.kind))
    }
}

/// Successful / total; 0 for an empty list.
pub fn success_rate(outcomes: &[TestCaseOutcome]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let ok = outcomes.iter().filter(|o| o.success).count();
    ok as f64 / outcomes.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuiteState {
    NotStarted,
    Running(usize),
    Passed(usize),
    Failed(usize),
    Summarized,
    Done,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SuiteError {
    #[error("case {0} started while another case is running")]
    Overlap(String),
    #[error("no case is running")]
    NotRunning,
    #[error("suite is already summarized")]
    Closed,
}

/// Ordered outcomes of one suite plus its run state.
#[derive(Debug)]
pub struct Suite {
    name: String,
    state: SuiteState,
    outcomes: Vec<TestCaseOutcome>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        ensure_metrics_described();
        Self {
            name: name.into(),
            state: SuiteState::NotStarted,
            outcomes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SuiteState {
        self.state
    }

    pub fn outcomes(&self) -> &[TestCaseOutcome] {
        &self.outcomes
    }

    /// Enter `Running(i)` for the next case.
    pub fn begin(&mut self, case_id: &str) -> Result<(), SuiteError> {
        match self.state {
            SuiteState::Summarized | SuiteState::Done => Err(SuiteError::Closed),
            SuiteState::Running(_) => Err(SuiteError::Overlap(case_id.to_string())),
            _ => {
                self.state = SuiteState::Running(self.outcomes.len());
                Ok(())
            }
        }
    }

    /// Leave `Running(i)` with the case's outcome.
    pub fn finish(&mut self, outcome: TestCaseOutcome) -> Result<(), SuiteError> {
        let SuiteState::Running(i) = self.state else {
            return Err(match self.state {
                SuiteState::Summarized | SuiteState::Done => SuiteError::Closed,
                _ => SuiteError::NotRunning,
            });
        };

        let status = if outcome.success { "passed" } else { "failed" };
        counter!("harness_cases_total", "suite" => self.name.clone(), "status" => status)
            .increment(1);
        counter!("harness_items_observed_total", "suite" => self.name.clone())
            .increment(outcome.observed_count as u64);
        histogram!("harness_case_seconds", "suite" => self.name.clone())
            .record(outcome.elapsed.as_secs_f64());
        tracing::info!(
            suite = %self.name,
            case = %outcome.case_id,
            success = outcome.success,
            observed = outcome.observed_count,
            "case finished"
        );

        self.state = if outcome.success {
            SuiteState::Passed(i)
        } else {
            SuiteState::Failed(i)
        };
        self.outcomes.push(outcome);
        Ok(())
    }

    /// Close the suite and render its tally. Further `begin` calls fail.
    pub fn summarize(&mut self) -> Summary {
        self.state = SuiteState::Summarized;
        let summary = Summary::of(&self.name, &self.outcomes);
        self.state = SuiteState::Done;
        summary
    }

    pub fn completed_without_fault(&self) -> bool {
        self.outcomes.iter().all(|o| o.fault.is_none())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub suite: String,
    pub successful: usize,
    pub total: usize,
    pub items_observed: usize,
    pub success_rate: f64,
    pub all_completed: bool,
    pub lines: Vec<String>,
}

impl Summary {
    pub fn of(suite: &str, outcomes: &[TestCaseOutcome]) -> Self {
        let successful = outcomes.iter().filter(|o| o.success).count();
        let total = outcomes.len();
        let items_observed = outcomes.iter().map(|o| o.observed_count).sum();
        let rate = success_rate(outcomes);

        let mut lines: Vec<String> = outcomes
            .iter()
            .map(|o| {
                format!(
                    "   {}: {} items - {}",
                    o.case_id,
                    o.observed_count,
                    if o.success { "PASSED" } else { "FAILED" }
                )
            })
            .collect();
        lines.push(format!(
            "{suite}: {successful}/{total} successful, {items_observed} items observed, success rate {:.1}%",
            rate * 100.0
        ));

        Self {
            suite: suite.to_string(),
            successful,
            total,
            items_observed,
            success_rate: rate,
            all_completed: outcomes.iter().all(|o| o.fault.is_none()),
            lines,
        }
    }

    pub fn render(&self) -> String {
        let mut out = vec![
            RULE.to_string(),
            format!("SUMMARY REPORT: {}", self.suite),
            RULE.to_string(),
        ];
        out.extend(self.lines.iter().cloned());
        out.join("\n")
    }
}
