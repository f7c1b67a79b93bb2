//! Run tools from an uninstalled GStreamer build tree.
//!
//! The crate composes a process environment that points search paths, plugin
//! paths and the registry at a local meson build directory, then starts an
//! interactive shell or a given command inside it.
//!
//! The main entry points are [`compose`], which turns resolved [`Options`]
//! into an [`Environment`], and [`launch`], which runs the child process in
//! that environment and reports its exit code.

mod artifacts;
pub mod command;
pub mod composer;
pub mod env;
pub mod error;
mod external;
mod launcher;
pub mod options;
mod python;
mod shell;

pub use command::ExitCode;
pub use composer::compose;
pub use env::Environment;
pub use error::{ConfigError, LaunchError};
pub use launcher::run as launch;
pub use options::{Args, Options};

/// Validate `options`, compose the environment and run the child process.
///
/// Returns the child's exit code. Errors are [`ConfigError`] or [`LaunchError`].
pub fn run(options: &Options) -> anyhow::Result<ExitCode> {
    options.validate()?;
    let env = compose(options)?;
    Ok(launch(options, &env)?)
}

/// Exit status for an error returned by [`run`].
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    if let Some(err) = err.downcast_ref::<ConfigError>() {
        err.exit_code()
    } else if let Some(err) = err.downcast_ref::<LaunchError>() {
        err.exit_code()
    } else {
        1
    }
}
