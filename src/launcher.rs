use crate::command::{CommandLine, ExitCode};
use crate::env::Environment;
use crate::error::LaunchError;
use crate::external;
use crate::options::Options;
use crate::shell::{self, ShellSession};

/// Start the requested command, or an interactive shell when none was given,
/// inside `env` and return its exit code.
///
/// The shell is picked from the variables in `env`. A temporary startup file
/// created for it is removed once the shell exits.
pub fn run(options: &Options, env: &Environment) -> Result<ExitCode, LaunchError> {
    if let Some(command) = CommandLine::from_argv(&options.command) {
        return external::execute(&command, env);
    }

    let session = ShellSession::new(
        shell::default_shell(env),
        &options.env_name(),
        shell::user_bashrc().as_deref(),
    )?;
    let code = external::execute(&session.command, env);
    drop(session);
    code
}
