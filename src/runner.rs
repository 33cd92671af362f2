use std::io::{self, BufRead, Write};
use std::process::Command;

use crate::menu::ActionRef;
use crate::report::{report, Severity};
use crate::resolver::{Resolve, RunnableCommand};
use crate::surface::{Surface, SurfaceError};

/// Outcome of one external action. Failures are reported, never escalated;
/// only surface faults travel separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure(String),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub status: Status,
    pub exit_code: Option<i32>,
}

impl ActionOutcome {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            exit_code: Some(0),
        }
    }

    #[must_use]
    pub fn failure(detail: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            status: Status::Failure(detail.into()),
            exit_code,
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            exit_code: None,
        }
    }
}

/// What one runner invocation produced. `surface` carries the resume fault,
/// if any, so outcomes survive a broken terminal.
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<(String, ActionOutcome)>,
    pub surface: Result<(), SurfaceError>,
}

impl RunReport {
    /// Worst status across the batch: any failure or missing action makes
    /// the whole report a failure.
    #[must_use]
    pub fn overall(&self) -> Status {
        let mut worst = Status::Success;
        for (label, outcome) in &self.outcomes {
            match &outcome.status {
                Status::Success => {}
                Status::NotFound => worst = Status::Failure(format!("{label}: not found")),
                Status::Failure(detail) => {
                    worst = Status::Failure(format!("{label}: {detail}"));
                }
            }
        }
        worst
    }
}

/// Spawns a resolved command in the foreground with inherited stdio.
pub trait Execute {
    fn execute(&mut self, cmd: &RunnableCommand) -> ActionOutcome;
}

#[derive(Debug, Default)]
pub struct ProcessExecutor;

impl Execute for ProcessExecutor {
    fn execute(&mut self, cmd: &RunnableCommand) -> ActionOutcome {
        // Streams stay attached to the real terminal; SIGINT is not masked,
        // so the user can still interrupt the child.
        match Command::new(&cmd.program).args(&cmd.args).status() {
            Ok(status) => match status.code() {
                Some(0) => ActionOutcome::success(),
                Some(code) => {
                    ActionOutcome::failure(format!("exited with code {code}"), Some(code))
                }
                None => ActionOutcome::failure("terminated by signal", None),
            },
            Err(e) => ActionOutcome::failure(format!("failed to start: {e}"), None),
        }
    }
}

/// Resolve each task and execute it, continuing past individual failures.
/// Declaration order is preserved; every task is attempted exactly once.
/// The terminal surface must already be suspended.
pub fn dispatch<R: Resolve, E: Execute>(
    resolver: &R,
    executor: &mut E,
    tasks: &[(String, ActionRef)],
) -> Vec<(String, ActionOutcome)> {
    let mut outcomes = Vec::with_capacity(tasks.len());
    for (label, action) in tasks {
        let outcome = match resolver.resolve(action) {
            None => {
                report(Severity::Error, &format!("{label}: action not found"));
                ActionOutcome::not_found()
            }
            Some(cmd) => execute_one(executor, label, &cmd),
        };
        outcomes.push((label.clone(), outcome));
    }
    outcomes
}

fn execute_one<E: Execute>(executor: &mut E, label: &str, cmd: &RunnableCommand) -> ActionOutcome {
    report(Severity::Info, &format!("Running {label}"));
    let outcome = executor.execute(cmd);
    match &outcome.status {
        Status::Success => report(Severity::Success, &format!("{label} completed")),
        Status::Failure(detail) => report(Severity::Warn, &format!("{label}: {detail}")),
        Status::NotFound => {}
    }
    outcome
}

/// Runs selected actions outside the terminal surface: suspend, execute with
/// live output on the real terminal, wait for ENTER, resume.
pub struct Runner<R, E> {
    resolver: R,
    executor: E,
}

impl<R: Resolve, E: Execute> Runner<R, E> {
    pub fn new(resolver: R, executor: E) -> Self {
        Self { resolver, executor }
    }

    /// Run one action. Resolution happens before the surface is touched, so
    /// a missing action never disturbs the screen.
    pub fn run(&mut self, surface: &mut Surface, label: &str, action: &ActionRef) -> RunReport {
        let Some(cmd) = self.resolver.resolve(action) else {
            return RunReport {
                outcomes: vec![(label.to_string(), ActionOutcome::not_found())],
                surface: Ok(()),
            };
        };
        // The surface must be down before the child starts; a full-screen
        // child inside the alternate screen corrupts output.
        if let Err(e) = surface.suspend() {
            return RunReport {
                outcomes: Vec::new(),
                surface: Err(e),
            };
        }
        let outcome = execute_one(&mut self.executor, label, &cmd);
        wait_for_ack();
        RunReport {
            outcomes: vec![(label.to_string(), outcome)],
            surface: surface.resume(),
        }
    }

    /// Run a batch of tasks under one suspension, with a single
    /// acknowledgement at the end.
    pub fn run_batch(
        &mut self,
        surface: &mut Surface,
        tasks: &[(String, ActionRef)],
    ) -> RunReport {
        if let Err(e) = surface.suspend() {
            return RunReport {
                outcomes: Vec::new(),
                surface: Err(e),
            };
        }
        let outcomes = dispatch(&self.resolver, &mut self.executor, tasks);
        wait_for_ack();
        RunReport {
            outcomes,
            surface: surface.resume(),
        }
    }
}

/// Block until the user presses ENTER, keeping command output visible
/// before the screen is repainted.
pub fn wait_for_ack() {
    print!("\nPress ENTER to return to the menu...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeResolver {
        missing: Vec<String>,
    }

    impl Resolve for FakeResolver {
        fn resolve(&self, action: &ActionRef) -> Option<RunnableCommand> {
            match action {
                ActionRef::Script(name) if self.missing.contains(name) => None,
                ActionRef::Script(name) => Some(RunnableCommand {
                    program: name.clone().into(),
                    args: Vec::new(),
                }),
                _ => None,
            }
        }
    }

    struct FakeExecutor {
        ran: Vec<String>,
        failing: Vec<String>,
    }

    impl Execute for FakeExecutor {
        fn execute(&mut self, cmd: &RunnableCommand) -> ActionOutcome {
            let name = cmd.program.to_string_lossy().to_string();
            self.ran.push(name.clone());
            if self.failing.contains(&name) {
                ActionOutcome::failure("exited with code 1", Some(1))
            } else {
                ActionOutcome::success()
            }
        }
    }

    fn tasks(names: &[&str]) -> Vec<(String, ActionRef)> {
        names
            .iter()
            .map(|n| ((*n).to_string(), ActionRef::Script((*n).to_string())))
            .collect()
    }

    #[test]
    fn dispatch_runs_everything_in_order_despite_failures() {
        let resolver = FakeResolver { missing: vec![] };
        let mut executor = FakeExecutor {
            ran: Vec::new(),
            failing: vec!["b".to_string()],
        };
        let outcomes = dispatch(&resolver, &mut executor, &tasks(&["a", "b", "c"]));
        assert_eq!(executor.ran.as_slice(), ["a", "b", "c"]);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].1.status, Status::Success);
        assert!(matches!(outcomes[1].1.status, Status::Failure(_)));
        assert_eq!(outcomes[2].1.status, Status::Success);
    }

    #[test]
    fn dispatch_reports_missing_actions_and_continues() {
        let resolver = FakeResolver {
            missing: vec!["b".to_string()],
        };
        let mut executor = FakeExecutor {
            ran: Vec::new(),
            failing: vec![],
        };
        let outcomes = dispatch(&resolver, &mut executor, &tasks(&["a", "b", "c"]));
        assert_eq!(executor.ran.as_slice(), ["a", "c"]);
        assert_eq!(outcomes[1].1.status, Status::NotFound);
    }

    #[test]
    fn overall_is_worst_of_parts() {
        let ok = RunReport {
            outcomes: vec![
                ("a".to_string(), ActionOutcome::success()),
                ("b".to_string(), ActionOutcome::success()),
            ],
            surface: Ok(()),
        };
        assert_eq!(ok.overall(), Status::Success);

        let bad = RunReport {
            outcomes: vec![
                ("a".to_string(), ActionOutcome::success()),
                ("b".to_string(), ActionOutcome::failure("exited with code 1", Some(1))),
                ("c".to_string(), ActionOutcome::success()),
            ],
            surface: Ok(()),
        };
        assert!(matches!(bad.overall(), Status::Failure(_)));
    }
}
