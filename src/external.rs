use crate::command::{CommandLine, ExitCode};
use crate::env::Environment;
use crate::error::LaunchError;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Run `command` with exactly the variables and working directory of `env`
/// and wait for it to finish.
///
/// Bare program names are searched on the `PATH` of `env`, with the
/// platform's own rules (executable bit, `.exe`). Returns the child's exit
/// code; a child killed by a signal maps to `128 + signal` on Unix.
pub fn execute(command: &CommandLine, env: &Environment) -> Result<ExitCode, LaunchError> {
    let name = command.program.to_string_lossy().into_owned();
    let program = program_path(&command.program, &env.current_dir);

    log::info!("running `{}` in {}", command, env.current_dir.display());
    let mut child = Command::new(&*program)
        .args(&command.args)
        .env_clear()
        .envs(env.child_vars())
        .current_dir(&env.current_dir)
        .spawn()
        .map_err(|source| spawn_error(name.clone(), source))?;
    let status = child.wait().map_err(|source| LaunchError::Wait {
        program: name,
        source,
    })?;
    Ok(exit_code(status))
}

/// The program to hand to [`Command`].
///
/// A relative program with a directory part (`./run.sh`, `tools/gst-launch`)
/// is anchored at the child's working directory. Bare names are left for the
/// `PATH` search.
fn program_path<'a>(program: &'a OsStr, current_dir: &Path) -> Cow<'a, OsStr> {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        Cow::Owned(current_dir.join(path).into_os_string())
    } else {
        Cow::Borrowed(program)
    }
}

fn spawn_error(program: String, source: io::Error) -> LaunchError {
    if source.kind() == io::ErrorKind::NotFound {
        LaunchError::NotFound(program)
    } else {
        LaunchError::Spawn { program, source }
    }
}

fn exit_code(status: ExitStatus) -> ExitCode {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[cfg(unix)]
    fn unix_env(dir: &Path) -> Environment {
        Environment::from_vars([("PATH", "/usr/bin:/bin")], dir)
    }

    #[test]
    #[cfg(unix)]
    fn relative_program_is_anchored_at_child_dir() {
        let cwd = Path::new("/src/gst");
        assert_eq!(
            Path::new(&*program_path(OsStr::new("./run.sh"), cwd)),
            Path::new("/src/gst/run.sh")
        );
        assert_eq!(
            Path::new(&*program_path(OsStr::new("tools/gst-launch"), cwd)),
            Path::new("/src/gst/tools/gst-launch")
        );
        assert_eq!(
            program_path(OsStr::new("gst-inspect-1.0"), cwd),
            OsStr::new("gst-inspect-1.0")
        );
    }

    #[test]
    #[cfg(unix)]
    fn absolute_program_is_kept() {
        assert_eq!(
            program_path(OsStr::new("/bin/sh"), Path::new("/src")),
            OsStr::new("/bin/sh")
        );
    }

    #[test]
    #[cfg(unix)]
    fn propagates_exit_code() {
        let tmp = TempDir::new().unwrap();
        let cmd = CommandLine::from_argv(["sh", "-c", "exit 3"]).unwrap();
        assert_eq!(execute(&cmd, &unix_env(tmp.path())).unwrap(), 3);

        let cmd = CommandLine::from_argv(["echo", "hi"]).unwrap();
        assert_eq!(execute(&cmd, &unix_env(tmp.path())).unwrap(), 0);
    }

    #[test]
    #[cfg(unix)]
    fn dot_slash_program_runs_from_child_dir() {
        let tmp = TempDir::new().unwrap();
        std::os::unix::fs::symlink("/bin/sh", tmp.path().join("run.sh")).unwrap();

        let cmd = CommandLine::from_argv(["./run.sh", "-c", "exit 7"]).unwrap();
        assert_eq!(execute(&cmd, &unix_env(tmp.path())).unwrap(), 7);
    }

    #[test]
    #[cfg(unix)]
    fn non_executable_file_on_path_does_not_hide_program() {
        let tmp = TempDir::new().unwrap();
        let tools = tmp.path().join("tools");
        fs::create_dir(&tools).unwrap();
        File::create(tools.join("echo")).unwrap();

        let search = format!("{}:/usr/bin:/bin", tools.display());
        let env = Environment::from_vars([("PATH", search)], tmp.path());
        let cmd = CommandLine::from_argv(["echo", "hi"]).unwrap();
        assert_eq!(execute(&cmd, &env).unwrap(), 0);
    }

    #[test]
    #[cfg(unix)]
    fn child_sees_only_given_environment_and_cwd() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("out.txt");
        let mut env = unix_env(tmp.path());
        env.set_var("GST_PLUGIN_SYSTEM_PATH", "");
        env.set_var("GST_ENV", "gst-master");

        let script = format!(
            "printf '%s|%s|%s|%s' \"$GST_ENV\" \"${{GST_PLUGIN_SYSTEM_PATH-unset}}\" \"${{HOME-unset}}\" \"$(pwd)\" > {}",
            out.display()
        );
        let cmd = CommandLine::from_argv(["sh", "-c", script.as_str()]).unwrap();
        assert_eq!(execute(&cmd, &env).unwrap(), 0);

        let written = fs::read_to_string(&out).unwrap();
        let cwd = fs::canonicalize(tmp.path()).unwrap();
        assert_eq!(written, format!("gst-master||unset|{}", cwd.display()));
    }

    #[test]
    #[cfg(unix)]
    fn child_receives_non_utf8_variables() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let tmp = TempDir::new().unwrap();
        let mut env = unix_env(tmp.path());
        env.raw_vars.insert(
            OsString::from("LANG_HINT"),
            OsString::from_vec(b"caf\xe9".to_vec()),
        );

        let cmd = CommandLine::from_argv(["sh", "-c", "test -n \"$LANG_HINT\" && exit 4"]).unwrap();
        assert_eq!(execute(&cmd, &env).unwrap(), 4);
    }

    #[test]
    #[cfg(unix)]
    fn killed_child_maps_to_128_plus_signal() {
        let tmp = TempDir::new().unwrap();
        let cmd = CommandLine::from_argv(["sh", "-c", "kill -9 $$"]).unwrap();
        assert_eq!(execute(&cmd, &unix_env(tmp.path())).unwrap(), 128 + 9);
    }

    #[test]
    fn unknown_command_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let env = Environment::from_vars([("PATH", tmp.path().to_string_lossy())], tmp.path());
        let cmd = CommandLine::new("definitely-not-a-real-command-xyz");
        let err = execute(&cmd, &env).unwrap_err();
        assert!(matches!(err, LaunchError::NotFound(_)));
        assert_eq!(err.exit_code(), 127);
    }

    #[test]
    #[cfg(unix)]
    fn missing_relative_program_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let cmd = CommandLine::new("./no-such-script.sh");
        let err = execute(&cmd, &unix_env(tmp.path())).unwrap_err();
        assert_eq!(err.exit_code(), 127);
    }
}
