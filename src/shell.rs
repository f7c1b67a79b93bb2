//! Default interactive shell and its per-session startup file.

use crate::command::CommandLine;
use crate::env::Environment;
use crate::error::LaunchError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[cfg(windows)]
const SHELL_VAR: &str = "COMSPEC";
#[cfg(windows)]
const FALLBACK_SHELL: &str = r"C:\WINDOWS\system32\cmd.exe";

#[cfg(not(windows))]
const SHELL_VAR: &str = "SHELL";
#[cfg(not(windows))]
const FALLBACK_SHELL: &str = "/bin/sh";

/// The shell to start when no command was given.
///
/// Uses `COMSPEC` on Windows and `SHELL` elsewhere, read from `env`; the
/// fallback path is resolved through symlinks when possible.
pub fn default_shell(env: &Environment) -> PathBuf {
    match env.get_var(SHELL_VAR) {
        Some(shell) if !shell.is_empty() => PathBuf::from(shell),
        _ => fs::canonicalize(FALLBACK_SHELL).unwrap_or_else(|_| PathBuf::from(FALLBACK_SHELL)),
    }
}

/// Whether `shell` looks like bash, which accepts `--rcfile`.
pub fn is_bash(shell: &Path) -> bool {
    shell.to_string_lossy().contains("bash")
}

/// A shell invocation plus the startup file that must outlive the child.
#[derive(Debug)]
pub struct ShellSession {
    pub command: CommandLine,
    /// Removed from disk when dropped.
    pub rcfile: Option<NamedTempFile>,
}

impl ShellSession {
    /// Plan an interactive session in `shell` whose prompt shows `env_name`.
    ///
    /// For bash a temporary copy of `user_rc` (when it exists) is written with
    /// a prompt override appended and handed over via `--rcfile`.
    pub fn new(
        shell: PathBuf,
        env_name: &str,
        user_rc: Option<&Path>,
    ) -> Result<Self, LaunchError> {
        let mut command = CommandLine::new(shell.as_os_str());
        if !is_bash(&shell) {
            return Ok(Self {
                command,
                rcfile: None,
            });
        }

        let rcfile = write_rcfile(env_name, user_rc).map_err(LaunchError::StartupFile)?;
        command = command.arg("--rcfile").arg(rcfile.path());
        Ok(Self {
            command,
            rcfile: Some(rcfile),
        })
    }
}

/// The user's bash startup file, `~/.bashrc`.
pub fn user_bashrc() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".bashrc"))
}

fn write_rcfile(env_name: &str, user_rc: Option<&Path>) -> std::io::Result<NamedTempFile> {
    let mut tmp = tempfile::Builder::new()
        .prefix("gst-uninstalled-")
        .suffix(".bashrc")
        .tempfile()?;
    if let Some(rc) = user_rc.filter(|rc| rc.is_file()) {
        let mut src = fs::File::open(rc)?;
        std::io::copy(&mut src, &mut tmp)?;
    }
    write!(tmp, "\nexport PS1=\"[{}] $PS1\"\n", env_name)?;
    tmp.flush()?;
    Ok(tmp)
}
