use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warn,
    Error,
}

/// Print a severity-prefixed line for the user and mirror it to the log.
/// Only called while the terminal surface is suspended or released, so the
/// output lands on the normal screen.
pub fn report(severity: Severity, msg: &str) {
    match severity {
        Severity::Info => {
            println!("\x1b[36m[INFO]\x1b[0m {msg}");
            info!("{msg}");
        }
        Severity::Success => {
            println!("\x1b[32m[OK]\x1b[0m {msg}");
            info!("{msg}");
        }
        Severity::Warn => {
            println!("\x1b[33m[WARN]\x1b[0m {msg}");
            warn!("{msg}");
        }
        Severity::Error => {
            println!("\x1b[31m[ERROR]\x1b[0m {msg}");
            error!("{msg}");
        }
    }
}
