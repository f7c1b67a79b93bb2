use crate::error::ConfigError;
use argh::FromArgs;
use std::path::{Path, PathBuf};

pub const DEFAULT_GST_VERSION: &str = "master";

#[derive(FromArgs, Debug, PartialEq)]
/// Run a shell or a command inside an environment set up to use an
/// uninstalled GStreamer build tree.
pub struct Args {
    #[argh(option)]
    /// the meson build directory. Defaults to `build` next to this program.
    pub builddir: Option<PathBuf>,

    #[argh(option)]
    /// the top level source directory. Defaults to the directory of this program.
    pub srcdir: Option<PathBuf>,

    #[argh(option, default = "String::from(DEFAULT_GST_VERSION)")]
    /// the GStreamer major version.
    pub gst_version: String,

    #[argh(positional, greedy)]
    /// command to run instead of an interactive shell, with its arguments.
    pub command: Vec<String>,
}

/// Fully resolved invocation settings. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub builddir: PathBuf,
    pub srcdir: PathBuf,
    pub gst_version: String,
    pub command: Vec<String>,
}

impl Args {
    /// Fill in defaults relative to `program_dir` and make both directories absolute.
    pub fn resolve(self, program_dir: &Path) -> Options {
        let builddir = self.builddir.unwrap_or_else(|| program_dir.join("build"));
        let srcdir = self.srcdir.unwrap_or_else(|| program_dir.to_path_buf());
        Options {
            builddir: absolute(builddir),
            srcdir: absolute(srcdir),
            gst_version: self.gst_version,
            command: self.command,
        }
    }
}

impl Options {
    /// Name shown in prompts and exported as `GST_ENV`.
    pub fn env_name(&self) -> String {
        format!("gst-{}", self.gst_version)
    }

    /// Check that the build and source directories exist.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.builddir.exists() {
            return Err(ConfigError::MissingBuildDir(self.builddir.clone()));
        }
        if !self.srcdir.exists() {
            return Err(ConfigError::MissingSourceDir(self.srcdir.clone()));
        }
        Ok(())
    }
}

/// Directory holding the running executable, falling back to the current directory.
pub fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}
