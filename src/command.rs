//! External tool execution with captured output.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::error::{RepoError, Result};

/// Run an external tool and return its captured stdout.
///
/// The working directory is passed explicitly; the process-wide working
/// directory is never changed. A non-zero exit surfaces as
/// [`RepoError::ExternalTool`] carrying the captured stderr. Failures are
/// never retried: repeating an indexing or signing invocation could leave
/// ambiguous partial state on disk.
pub fn run_tool<I, S>(program: &Path, args: I, cwd: &Path) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!("running command: {:?}", cmd);

    let output = cmd.output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let code = output.status.code().unwrap_or(-1);
        Err(RepoError::ExternalTool {
            program: program.display().to_string(),
            code,
            stderr,
        })
    }
}

/// Like [`run_tool`], but removes `target` if the invocation fails.
///
/// Callers use this to guarantee that no partial artifact survives a failed
/// external invocation, e.g. a half-written signature file.
pub fn run_tool_with_cleanup<I, S>(
    program: &Path,
    args: I,
    cwd: &Path,
    target: &Path,
) -> Result<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    match run_tool(program, args, cwd) {
        Ok(stdout) => Ok(stdout),
        Err(err) => {
            remove_if_exists(target);
            Err(err)
        }
    }
}

/// Best-effort file removal; a missing file is not an error.
///
/// Only for error-path cleanup, where the original failure is what must
/// propagate. Removals an operation depends on go through
/// [`remove_existing`] instead.
pub(crate) fn remove_if_exists(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        if err.kind() != std::io::ErrorKind::NotFound {
            debug!("failed to remove {}: {}", path.display(), err);
        }
    }
}

/// Remove a file, treating a missing file as success.
///
/// Any other failure is propagated: a removal the caller relies on (such as
/// deleting a stale signature before regenerating a release) must not fail
/// silently.
pub(crate) fn remove_existing(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}
