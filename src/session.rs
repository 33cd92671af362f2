use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::menu::{ActionRef, Menu};
use crate::navigator::{navigate, Selection};
use crate::report::{report, Severity};
use crate::resolver::Resolve;
use crate::runner::{wait_for_ack, Execute, RunReport, Runner, Status};
use crate::surface::{Surface, SurfaceError};
use crate::theme::ThemeTokens;

/// Bounded recovery policy: one retry per healthy stretch. A second fault
/// before the surface has proven itself again means the terminal is not
/// coming back, so the session degrades instead of looping on resume.
#[derive(Debug, Default)]
struct FaultBudget {
    spent: bool,
}

impl FaultBudget {
    fn reset(&mut self) {
        self.spent = false;
    }

    /// Returns true when the retry budget is exhausted.
    fn charge(&mut self) -> bool {
        if self.spent {
            return true;
        }
        self.spent = true;
        false
    }
}

/// Top-level interactive loop: acquire the terminal surface, then
/// navigate, dispatch and repaint until the user exits. The surface is
/// restored on every exit path, including errors.
pub struct SessionController<R, E> {
    menu: Menu,
    runner: Runner<R, E>,
    theme: ThemeTokens,
}

impl<R: Resolve, E: Execute> SessionController<R, E> {
    pub fn new(menu: Menu, resolver: R, executor: E) -> Self {
        Self {
            menu,
            runner: Runner::new(resolver, executor),
            theme: ThemeTokens::default(),
        }
    }

    /// Run the session to completion and return the process exit code.
    ///
    /// # Errors
    /// Returns an error only when the terminal surface cannot be acquired
    /// at startup; everything after that is handled in-loop.
    pub fn run(mut self) -> Result<i32> {
        let mut surface = Surface::acquire().context("could not acquire the terminal")?;
        let mut budget = FaultBudget::default();

        let code = loop {
            let selection = match navigate(&mut surface, &self.menu, &self.theme) {
                Ok(sel) => {
                    // A completed navigation round proves the surface is
                    // healthy again, so a later fault earns a fresh retry.
                    budget.reset();
                    sel
                }
                Err(e) => {
                    if budget.charge() || self.recover(&mut surface, e).is_err() {
                        break self.degrade(&mut surface);
                    }
                    continue;
                }
            };

            let idx = match selection {
                Selection::Cancelled => break self.shutdown(&mut surface),
                Selection::Item(idx) => idx,
            };
            let item = self.menu.items()[idx].clone();
            let mut missed = false;
            let entry_report = match &item.action {
                ActionRef::Exit => break self.shutdown(&mut surface),
                ActionRef::Aggregate => {
                    let tasks = self.menu.concrete_tasks();
                    self.runner.run_batch(&mut surface, &tasks)
                }
                action => {
                    let rep = self.runner.run(&mut surface, &item.label, action);
                    missed = rep
                        .outcomes
                        .iter()
                        .any(|(_, o)| o.status == Status::NotFound);
                    rep
                }
            };
            self.conclude(&item.label, &entry_report);

            let fault = if let Err(e) = entry_report.surface {
                Some(e)
            } else if missed {
                // The runner never touches the surface for a missing single
                // action, so surface the message here before the menu
                // repaints. Batch misses are reported in-line.
                self.announce(
                    &mut surface,
                    Severity::Error,
                    &format!("{}: action not found", item.label),
                )
                .err()
            } else {
                None
            };
            if let Some(e) = fault {
                if budget.charge() || self.recover(&mut surface, e).is_err() {
                    break self.degrade(&mut surface);
                }
            }
        };
        Ok(code)
    }

    fn conclude(&self, label: &str, entry_report: &RunReport) {
        match entry_report.overall() {
            Status::Success => {
                if !entry_report.outcomes.is_empty() {
                    info!(item = label, "action completed");
                }
            }
            Status::Failure(detail) => warn!(item = label, detail = %detail, "action failed"),
            Status::NotFound => warn!(item = label, "action not found"),
        }
    }

    /// Short suspend/acknowledge cycle for a message that must reach the
    /// user before the menu repaints. Surface faults propagate so the
    /// caller applies the usual recovery policy.
    fn announce(
        &self,
        surface: &mut Surface,
        severity: Severity,
        msg: &str,
    ) -> Result<(), SurfaceError> {
        surface.suspend()?;
        report(severity, msg);
        wait_for_ack();
        surface.resume()
    }

    /// One bounded recovery attempt for a broken surface.
    fn recover(&self, surface: &mut Surface, fault: SurfaceError) -> Result<(), SurfaceError> {
        warn!(error = %fault, "terminal surface fault, retrying once");
        surface.resume()
    }

    /// The terminal could not be restored to full-screen mode. Drop to a
    /// plain listing so the user is never stuck with a raw, promptless
    /// terminal, and end the session.
    fn degrade(&self, surface: &mut Surface) -> i32 {
        let _ = surface.release();
        report(
            Severity::Error,
            "terminal could not be restored; leaving interactive mode",
        );
        println!("Available tasks:");
        for item in self.menu.items() {
            match &item.desc {
                Some(desc) => println!("  - {}  ({desc})", item.label),
                None => println!("  - {}", item.label),
            }
        }
        1
    }

    fn shutdown(&self, surface: &mut Surface) -> i32 {
        if let Err(e) = surface.release() {
            warn!(error = %e, "terminal release failed on shutdown");
        }
        info!("session finished");
        0
    }
}

#[cfg(test)]
mod tests {
    use super::FaultBudget;

    #[test]
    fn budget_allows_one_retry_then_degrades() {
        let mut budget = FaultBudget::default();
        assert!(!budget.charge());
        assert!(budget.charge());
        assert!(budget.charge());
    }

    #[test]
    fn healthy_stretch_restores_the_retry() {
        let mut budget = FaultBudget::default();
        assert!(!budget.charge());
        budget.reset();
        assert!(!budget.charge());
        assert!(budget.charge());
    }
}
