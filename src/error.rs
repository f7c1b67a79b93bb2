use crate::command::ExitCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The build tree cannot be used to compose an environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GStreamer not built in {}\n\nBuild it and try again", .0.display())]
    MissingBuildDir(PathBuf),

    #[error("The specified source dir {} does not exist", .0.display())]
    MissingSourceDir(PathBuf),

    #[error(
        "Subproject {name} does not exist in {}.\n Make sure to build everything properly and try again.",
        .path.display()
    )]
    MissingSubproject { name: String, path: PathBuf },

    #[error("cannot list subprojects in {}: {source}", .path.display())]
    ListSubprojects {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    pub fn exit_code(&self) -> ExitCode {
        1
    }
}

/// The child process could not be started or waited for.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("command not found: {0}")]
    NotFound(String),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot write shell startup file: {0}")]
    StartupFile(#[source] io::Error),
}

impl LaunchError {
    /// Status this program exits with when the launch fails.
    ///
    /// Follows the shell convention of 127 for a missing command and 126 for
    /// one that cannot be executed.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            LaunchError::NotFound(_) => 127,
            LaunchError::Spawn { source, .. } if source.kind() == io::ErrorKind::PermissionDenied => {
                126
            }
            LaunchError::Spawn { .. } | LaunchError::Wait { .. } | LaunchError::StartupFile(_) => 1,
        }
    }
}
