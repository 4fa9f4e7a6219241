//! Scenario definitions.
//!
//! A scenario names a fixture directory, the tools that cannot support it,
//! and the section of the compose specification it exercises. The section is
//! only used to point failure messages at the relevant text.

use crate::errors::HarnessError;

/// Base URL of the compose specification text.
pub const COMPOSE_SPEC_REFERENCE: &str =
    "https://github.com/compose-spec/compose-spec/blob/master/spec.md";

/// One deployment fixture run against every tool in the catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    fixture: String,
    skip: Vec<String>,
    spec_ref: Option<String>,
}

impl Scenario {
    /// Scenario deployed from `fixtures/<fixture>/`.
    pub fn new(fixture: impl Into<String>) -> Self {
        Self {
            fixture: fixture.into(),
            skip: Vec::new(),
            spec_ref: None,
        }
    }

    /// Exclude tools (by descriptor `name`) that cannot support this scenario.
    pub fn skipping(mut self, tools: &[&str]) -> Self {
        self.skip.extend(tools.iter().map(|t| t.to_string()));
        self
    }

    /// Anchor of the compose spec section this scenario checks.
    pub fn with_spec_ref(mut self, anchor: impl Into<String>) -> Self {
        self.spec_ref = Some(anchor.into());
        self
    }

    pub fn fixture(&self) -> &str {
        &self.fixture
    }

    /// Whether the tool named `tool` is excluded.
    pub fn skips(&self, tool: &str) -> bool {
        self.skip.iter().any(|s| s == tool)
    }

    /// Link to the relevant compose spec section.
    pub fn spec_reference(&self) -> String {
        match &self.spec_ref {
            Some(anchor) if !anchor.is_empty() => format!("{}#{}", COMPOSE_SPEC_REFERENCE, anchor),
            _ => COMPOSE_SPEC_REFERENCE.to_string(),
        }
    }

    /// Compare an observed value with the expected literal.
    pub fn check(&self, expected: &str, actual: &str) -> Result<(), HarnessError> {
        if expected == actual {
            return Ok(());
        }
        Err(HarnessError::Mismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
            reference: self.spec_reference(),
        })
    }
}
