use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::menu::ActionRef;

/// A concrete, ready-to-execute program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnableCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl RunnableCommand {
    fn bare(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    fn with_arg(program: impl Into<OsString>, arg: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: vec![arg.into()],
        }
    }
}

/// Maps an action identifier to a runnable command, or nothing.
pub trait Resolve {
    fn resolve(&self, action: &ActionRef) -> Option<RunnableCommand>;
}

/// Locates scripts by name and decides how to invoke them. Candidate paths
/// are tried in a fixed order (scripts dir first, `.py` before bare name);
/// the first existing one wins.
#[derive(Debug, Clone)]
pub struct ScriptResolver {
    scripts_dir: PathBuf,
    root: PathBuf,
}

impl ScriptResolver {
    #[must_use]
    pub fn new(scripts_dir: PathBuf, root: PathBuf) -> Self {
        Self { scripts_dir, root }
    }

    fn candidates(&self, name: &str) -> [PathBuf; 4] {
        [
            self.scripts_dir.join(format!("{name}.py")),
            self.scripts_dir.join(name),
            self.root.join(format!("{name}.py")),
            self.root.join(name),
        ]
    }
}

impl Resolve for ScriptResolver {
    fn resolve(&self, action: &ActionRef) -> Option<RunnableCommand> {
        match action {
            ActionRef::Script(name) => self
                .candidates(name)
                .iter()
                .find(|p| p.is_file())
                .map(|p| invocation_for(p)),
            ActionRef::Executable(path) => path.is_file().then(|| invocation_for(path)),
            ActionRef::Aggregate | ActionRef::Exit => None,
        }
    }
}

/// Fixed invocation precedence: Python entry point, then direct execution
/// when the file carries an executable bit, then a bash fallback.
fn invocation_for(path: &Path) -> RunnableCommand {
    if path.extension().and_then(|e| e.to_str()) == Some("py") {
        return RunnableCommand::with_arg("python3", path);
    }
    if is_executable(path) {
        return RunnableCommand::bare(path);
    }
    RunnableCommand::with_arg("bash", path)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    false
}
