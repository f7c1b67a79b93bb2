//! Host Python interpreter probing.

use crate::env::PATH_LIST_SEPARATOR;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

const INTERPRETERS: [&str; 2] = ["python3", "python"];

const SITE_PACKAGES_SCRIPT: &str =
    "import os, site; print(os.pathsep.join(site.getsitepackages()))";

/// Site-package directories of the first Python interpreter found on `search_paths`.
///
/// Returns an empty list when no interpreter can be found or queried.
pub fn site_packages(search_paths: &str) -> Vec<PathBuf> {
    for name in INTERPRETERS {
        let output = Command::new(name)
            .args(["-c", SITE_PACKAGES_SCRIPT])
            .env("PATH", search_paths)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output();
        match output {
            Ok(output) if output.status.success() => {
                return parse_site_packages(&String::from_utf8_lossy(&output.stdout));
            }
            Ok(output) => log::warn!("{} could not report site-packages: {}", name, output.status),
            Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
            Err(err) => log::warn!("cannot run {}: {}", name, err),
        }
    }
    log::warn!("no Python interpreter found, PYTHONPATH gets no site-packages");
    Vec::new()
}

fn parse_site_packages(stdout: &str) -> Vec<PathBuf> {
    stdout
        .trim()
        .split(PATH_LIST_SEPARATOR)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .collect()
}
