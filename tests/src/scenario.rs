//! Named scenarios of transport calls.
//!
//! A scenario opens one transport over a fresh [`Fixture`] and runs its
//! steps in order. Action steps call the transport and compare the outcome
//! with an [`Expect`]; check steps inspect the repository.

use arbor_core::{TransportError, TransportResult};
use arbor_transport::{MemoryTransport, TransportConfig};
use std::fmt;

use crate::error::{ScenarioError, ScenarioResult};
use crate::fixture::Fixture;

/// Expected outcome of an action step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Ok,
    InvalidName,
    PathNotFound,
    ItemExists,
    RepositoryError,
}

impl Expect {
    fn matches(&self, result: &TransportResult<()>) -> bool {
        matches!(
            (self, result),
            (Expect::Ok, Ok(()))
                | (Expect::InvalidName, Err(TransportError::InvalidName { .. }))
                | (Expect::PathNotFound, Err(TransportError::PathNotFound(_)))
                | (Expect::ItemExists, Err(TransportError::ItemExists(_)))
                | (Expect::RepositoryError, Err(TransportError::Repository { .. }))
        )
    }
}

impl fmt::Display for Expect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Expect::Ok => "success",
            Expect::InvalidName => "InvalidName",
            Expect::PathNotFound => "PathNotFound",
            Expect::ItemExists => "ItemExists",
            Expect::RepositoryError => "RepositoryError",
        };
        f.write_str(name)
    }
}

type Action = Box<dyn FnOnce(&mut MemoryTransport) -> TransportResult<()>>;
type Check = Box<dyn FnOnce(&Fixture) -> Result<(), String>>;

enum StepKind {
    Action(Action, Expect),
    Check(Check),
}

struct Step {
    name: String,
    kind: StepKind,
}

/// A sequence of steps against one transport.
pub struct Scenario {
    name: String,
    config: TransportConfig,
    workspaces: Vec<String>,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: TransportConfig::default(),
            workspaces: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Create an extra workspace before the transport is opened.
    pub fn workspace(mut self, name: impl Into<String>) -> Self {
        self.workspaces.push(name.into());
        self
    }

    /// A step that must succeed.
    pub fn step<F>(self, name: impl Into<String>, action: F) -> Self
    where
        F: FnOnce(&mut MemoryTransport) -> TransportResult<()> + 'static,
    {
        self.expect(name, Expect::Ok, action)
    }

    /// A step with the given expected outcome.
    pub fn expect<F>(mut self, name: impl Into<String>, expect: Expect, action: F) -> Self
    where
        F: FnOnce(&mut MemoryTransport) -> TransportResult<()> + 'static,
    {
        self.steps.push(Step {
            name: name.into(),
            kind: StepKind::Action(Box::new(action), expect),
        });
        self
    }

    /// A step that inspects the repository.
    pub fn check<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: FnOnce(&Fixture) -> Result<(), String> + 'static,
    {
        self.steps.push(Step {
            name: name.into(),
            kind: StepKind::Check(Box::new(check)),
        });
        self
    }

    /// Run every step, stopping at the first mismatch. Returns the fixture
    /// for further inspection.
    pub fn run(self) -> ScenarioResult<Fixture> {
        let fixture = Fixture::with_config(self.config);
        for name in &self.workspaces {
            fixture.add_workspace(name)?;
        }
        let mut transport = fixture.transport()?;

        for step in self.steps {
            match step.kind {
                StepKind::Action(action, expect) => {
                    let result = action(&mut transport);
                    if !expect.matches(&result) {
                        return Err(ScenarioError::StepFailed {
                            scenario: self.name,
                            step: step.name,
                            expected: expect.to_string(),
                            actual: describe(&result),
                        });
                    }
                }
                StepKind::Check(check) => {
                    if let Err(reason) = check(&fixture) {
                        return Err(ScenarioError::CheckFailed {
                            scenario: self.name,
                            step: step.name,
                            reason,
                        });
                    }
                }
            }
        }
        drop(transport);
        Ok(fixture)
    }
}

fn describe(result: &TransportResult<()>) -> String {
    match result {
        Ok(()) => "success".to_string(),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::path;
    use arbor_core::NodeSnapshot;
    use arbor_mutation::AddNodeOperation;
    use arbor_transport::BatchApplier;

    #[test]
    fn test_scenario_reports_unexpected_outcome() {
        // GIVEN a step expected to fail that succeeds
        let scenario = Scenario::new("mismatch").expect("store", Expect::ItemExists, |t| {
            t.store_nodes(&[AddNodeOperation::new(path("/a"), NodeSnapshot::new("nt:unstructured"))])
        });

        // WHEN
        let result = scenario.run();

        // THEN
        assert!(matches!(result, Err(ScenarioError::StepFailed { .. })));
    }

    #[test]
    fn test_scenario_checks_see_applied_state() {
        let fixture = Scenario::new("checks")
            .step("store", |t| {
                t.store_nodes(&[AddNodeOperation::new(path("/a"), NodeSnapshot::new("nt:unstructured"))])
            })
            .check("exists", |f| {
                if f.exists("default", "/a") {
                    Ok(())
                } else {
                    Err("node /a missing".to_string())
                }
            })
            .run()
            .unwrap();

        assert!(fixture.exists("default", "/a"));
    }
}
