//! Lifecycle driver.
//!
//! Runs one scenario against every tool in the catalogue. Each (scenario, tool)
//! case walks the same linear sequence of steps and stops at the first failing
//! step; a failing case never affects the cases after it.
//!
//! The one exception to "stop at the first failure" is verification: when the
//! callback fails, `down` is still attempted so the deployment does not leak
//! into the next tool's cleanup check. The case is reported as failed at the
//! verify step either way.

use crate::catalogue::{self, CatalogueEntry};
use crate::config::HarnessConfig;
use crate::descriptor::ToolDescriptor;
use crate::errors::HarnessError;
use crate::process::{self, ExpectedOutcome};
use crate::scenario::Scenario;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// Steps of a single case, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Setup,
    Up,
    Verify,
    Down,
    CleanupCheck,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Setup => "setup",
            Step::Up => "up",
            Step::Verify => "verify",
            Step::Down => "down",
            Step::CleanupCheck => "cleanup check",
        };
        f.write_str(name)
    }
}

/// A case that failed, identified by scenario, descriptor file, tool and step.
#[derive(Debug, Error)]
#[error("{scenario}/{descriptor} ({tool}) failed during {step}: {source}")]
pub struct CaseFailure {
    pub scenario: String,
    pub descriptor: String,
    pub tool: String,
    pub step: Step,
    #[source]
    pub source: HarnessError,
}

#[derive(Debug)]
pub enum CaseOutcome {
    Passed,
    Skipped,
    Failed(CaseFailure),
}

/// Result of one (scenario, tool) case.
#[derive(Debug)]
pub struct CaseReport {
    /// Descriptor file name.
    pub descriptor: String,
    /// Tool name, once the descriptor has been loaded.
    pub tool: Option<String>,
    pub outcome: CaseOutcome,
}

/// Results of running a scenario against the whole catalogue.
#[derive(Debug)]
pub struct ScenarioReport {
    pub scenario: String,
    pub cases: Vec<CaseReport>,
}

impl ScenarioReport {
    pub fn passed(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| matches!(c.outcome, CaseOutcome::Passed))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.cases
            .iter()
            .filter(|c| matches!(c.outcome, CaseOutcome::Skipped))
            .count()
    }

    pub fn failures(&self) -> Vec<&CaseFailure> {
        self.cases
            .iter()
            .filter_map(|c| match &c.outcome {
                CaseOutcome::Failed(failure) => Some(failure),
                _ => None,
            })
            .collect()
    }

    /// Look up the case for a descriptor file.
    pub fn case(&self, descriptor: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|c| c.descriptor == descriptor)
    }

    /// Fail the calling test with every failed case's diagnostic.
    #[allow(clippy::panic)]
    #[track_caller]
    pub fn assert_all_passed(&self) {
        let failures = self.failures();
        if failures.is_empty() {
            return;
        }

        let details = failures
            .iter()
            .map(|f| format!("{:#}", FailureDisplay(f)))
            .collect::<Vec<_>>()
            .join("\n\n");
        panic!(
            "{} of {} case(s) failed for scenario '{}':\n\n{}",
            failures.len(),
            self.cases.len(),
            self.scenario,
            details
        );
    }
}

/// Renders a failure followed by its full source chain.
struct FailureDisplay<'a>(&'a CaseFailure);

impl fmt::Display for FailureDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = std::error::Error::source(&self.0.source);
        while let Some(cause) = source {
            write!(f, "\n  caused by: {}", cause)?;
            source = cause.source();
        }
        Ok(())
    }
}

/// Number of resources listed by a status command, excluding its header line.
///
/// Leading and trailing blank lines are ignored; empty output counts as zero.
pub fn residual_records(status_output: &str) -> usize {
    status_output
        .trim_matches(|c| c == '\n' || c == '\r')
        .lines()
        .count()
        .saturating_sub(1)
}

/// Drives every tool in the catalogue through up, verify, down and cleanup check.
#[derive(Debug, Clone)]
pub struct LifecycleDriver {
    config: HarnessConfig,
}

impl LifecycleDriver {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Driver configured from the environment.
    pub fn from_env() -> Self {
        Self::new(HarnessConfig::from_env())
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run `scenario` against every descriptor in the commands directory.
    ///
    /// Cases run one after another; `verify` is awaited once per executed case.
    /// Only catalogue problems (unreadable or empty commands directory) are
    /// returned as errors; case failures are collected in the report.
    pub async fn run_up_down<F, Fut>(
        &self,
        scenario: &Scenario,
        mut verify: F,
    ) -> Result<ScenarioReport, HarnessError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), HarnessError>>,
    {
        let entries = catalogue::discover(&self.config.commands_dir)?;
        if entries.is_empty() {
            return Err(HarnessError::EmptyCatalogue {
                dir: self.config.commands_dir.clone(),
            });
        }

        let mut seen = HashMap::new();
        let mut cases = Vec::with_capacity(entries.len());
        for entry in &entries {
            cases.push(self.run_case(scenario, entry, &mut seen, &mut verify).await);
        }

        let report = ScenarioReport {
            scenario: scenario.fixture().to_string(),
            cases,
        };
        info!(
            scenario = %report.scenario,
            passed = report.passed(),
            skipped = report.skipped(),
            failed = report.failures().len(),
            "Scenario finished"
        );
        Ok(report)
    }

    #[instrument(name = "harness.case", skip_all, fields(scenario = %scenario.fixture(), descriptor = %entry.file_name))]
    async fn run_case<F, Fut>(
        &self,
        scenario: &Scenario,
        entry: &CatalogueEntry,
        seen: &mut HashMap<String, String>,
        verify: &mut F,
    ) -> CaseReport
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), HarnessError>>,
    {
        // Setup
        let descriptor = match ToolDescriptor::load(&entry.path) {
            Ok(descriptor) => descriptor,
            Err(e) => return failed(scenario, entry, None, Step::Setup, e),
        };
        let tool = descriptor.name.as_str();

        if let Some(first) = seen.insert(tool.to_string(), entry.file_name.clone()) {
            let e = HarnessError::DuplicateTool {
                name: tool.to_string(),
                first,
                second: entry.file_name.clone(),
            };
            return failed(scenario, entry, Some(tool), Step::Setup, e);
        }

        if scenario.skips(tool) {
            info!(tool, "Tool cannot support this scenario, skipping");
            return CaseReport {
                descriptor: entry.file_name.clone(),
                tool: Some(tool.to_string()),
                outcome: CaseOutcome::Skipped,
            };
        }

        let dir = self.config.fixture_dir(scenario.fixture());
        if !dir.is_dir() {
            let e = HarnessError::Io {
                path: dir,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "fixture directory does not exist",
                ),
            };
            return failed(scenario, entry, Some(tool), Step::Setup, e);
        }

        // Up
        info!(tool, step = %Step::Up, "Running step");
        if let Err(e) = run_tool(&descriptor, &descriptor.up_args(), &dir).await {
            return failed(scenario, entry, Some(tool), Step::Up, e);
        }

        // Verify
        info!(tool, step = %Step::Verify, "Running step");
        if let Err(e) = verify().await {
            warn!(tool, "Verification failed, tearing down before reporting");
            if let Err(down_err) = run_tool(&descriptor, &descriptor.down_args(), &dir).await {
                error!(tool, error = %down_err, "Teardown after failed verification also failed");
            }
            return failed(scenario, entry, Some(tool), Step::Verify, e);
        }

        // Down
        info!(tool, step = %Step::Down, "Running step");
        if let Err(e) = run_tool(&descriptor, &descriptor.down_args(), &dir).await {
            return failed(scenario, entry, Some(tool), Step::Down, e);
        }

        // Cleanup check
        info!(tool, step = %Step::CleanupCheck, "Running step");
        if let Err(e) = check_clean_up(&descriptor, &dir, scenario).await {
            return failed(scenario, entry, Some(tool), Step::CleanupCheck, e);
        }

        info!(tool, "Case passed");
        CaseReport {
            descriptor: entry.file_name.clone(),
            tool: Some(tool.to_string()),
            outcome: CaseOutcome::Passed,
        }
    }
}

async fn run_tool(
    descriptor: &ToolDescriptor,
    args: &[String],
    dir: &Path,
) -> Result<(), HarnessError> {
    process::run(&descriptor.command, args, dir, ExpectedOutcome::Success)
        .await
        .map(|_| ())
}

/// Run the status command and require that it lists nothing but its header.
pub async fn check_clean_up(
    descriptor: &ToolDescriptor,
    dir: &Path,
    scenario: &Scenario,
) -> Result<(), HarnessError> {
    let (program, args) = descriptor.status_invocation();
    let output = process::run(&program, &args, dir, ExpectedOutcome::Success).await?;

    let count = residual_records(&output.stdout);
    if count != 0 {
        return Err(HarnessError::ResidualState {
            count,
            status_output: output.stdout,
            reference: scenario.spec_reference(),
        });
    }
    Ok(())
}

fn failed(
    scenario: &Scenario,
    entry: &CatalogueEntry,
    tool: Option<&str>,
    step: Step,
    source: HarnessError,
) -> CaseReport {
    let failure = CaseFailure {
        scenario: scenario.fixture().to_string(),
        descriptor: entry.file_name.clone(),
        tool: tool.unwrap_or("<unloaded>").to_string(),
        step,
        source,
    };
    error!(%failure, "Case failed");

    CaseReport {
        descriptor: entry.file_name.clone(),
        tool: tool.map(str::to_string),
        outcome: CaseOutcome::Failed(failure),
    }
}
