//! Composition of the uninstalled environment from a meson build tree.

use crate::artifacts;
use crate::env::Environment;
use crate::error::ConfigError;
use crate::options::Options;
use crate::python;
use std::fs;
use std::path::{Path, PathBuf};

/// Variable names read by the GStreamer tools.
pub mod vars {
    pub const PATH: &str = "PATH";
    pub const PLUGIN_PATH: &str = "GST_PLUGIN_PATH";
    pub const PLUGIN_SYSTEM_PATH: &str = "GST_PLUGIN_SYSTEM_PATH";
    pub const PLUGIN_SCANNER: &str = "GST_PLUGIN_SCANNER";
    pub const PTP_HELPER: &str = "GST_PTP_HELPER";
    pub const REGISTRY: &str = "GST_REGISTRY";
    pub const VERSION: &str = "GST_VERSION";
    pub const ENV_NAME: &str = "GST_ENV";
    pub const CURRENT_GST: &str = "CURRENT_GST";
    pub const VALIDATE_SCENARIOS_PATH: &str = "GST_VALIDATE_SCENARIOS_PATH";
    pub const VALIDATE_PLUGIN_PATH: &str = "GST_VALIDATE_PLUGIN_PATH";
    pub const VALIDATE_APPS_DIR: &str = "GST_VALIDATE_APPS_DIR";
    pub const PYTHONPATH: &str = "PYTHONPATH";
    pub const TYPELIB_PATH: &str = "GI_TYPELIB_PATH";
    pub const LD_LIBRARY_PATH: &str = "LD_LIBRARY_PATH";
    pub const DYLD_LIBRARY_PATH: &str = "DYLD_LIBRARY_PATH";
}

const SUBPROJECTS: &str = "subprojects";
const VALIDATE_SCENARIOS: &str = "subprojects/gst-devtools/validate/data/scenarios";
const VALIDATE_PLUGINS: &str = "subprojects/gst-devtools/validate/plugins";
const VALIDATE_TOOLS: &str = "subprojects/gst-devtools/validate/tools";
const GES_VALIDATE_APPS: &str = "subprojects/gst-editing-services/tests/validate";
const PLUGIN_SCANNER: &str = "subprojects/gstreamer/libs/gst/helpers/gst-plugin-scanner";
const PTP_HELPER: &str = "subprojects/gstreamer/libs/gst/helpers/gst-ptp-helper";
const REGISTRY: &str = "registry.dat";
const PYTHON_BINDINGS: &str = "subprojects/gst-python";
const HELPER_SCRIPTS: &str = "meson";

/// A directory listed under `<builddir>/subprojects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subproject {
    pub name: String,
    pub path: PathBuf,
}

/// Compose the environment for `options` from the running process.
///
/// Site-packages are taken from the Python interpreter found on the inherited `PATH`.
pub fn compose(options: &Options) -> Result<Environment, ConfigError> {
    let inherited = Environment::inherited(&options.srcdir);
    let site_packages = python::site_packages(inherited.get_var(vars::PATH).unwrap_or_default());
    compose_with(options, inherited, &site_packages)
}

/// Compose the environment for `options` on top of `inherited`.
///
/// Fails without returning anything if a listed subproject is missing.
pub fn compose_with(
    options: &Options,
    inherited: Environment,
    site_packages: &[PathBuf],
) -> Result<Environment, ConfigError> {
    let mut env = inherited;
    env.current_dir = options.srcdir.clone();
    let original_path = env.get_var(vars::PATH).unwrap_or_default().to_owned();

    let subprojects = list_subprojects(&options.builddir)?;
    register_subprojects(&mut env, &subprojects)?;

    let (build, src) = (&options.builddir, &options.srcdir);
    env.set_path(vars::CURRENT_GST, src);
    env.set_path(vars::VALIDATE_SCENARIOS_PATH, &src.join(VALIDATE_SCENARIOS));
    env.set_path(vars::VALIDATE_PLUGIN_PATH, &build.join(VALIDATE_PLUGINS));
    env.set_path(vars::VALIDATE_APPS_DIR, &src.join(GES_VALIDATE_APPS));
    env.prepend_path(vars::PATH, &build.join(VALIDATE_TOOLS));
    env.prepend_path(vars::PATH, &src.join(HELPER_SCRIPTS));
    env.append_var(vars::PATH, &original_path);

    env.set_var(vars::VERSION, options.gst_version.as_str());
    env.set_var(vars::ENV_NAME, options.env_name());
    env.set_var(vars::PLUGIN_SYSTEM_PATH, "");
    env.set_path(vars::PLUGIN_SCANNER, &build.join(PLUGIN_SCANNER));
    env.set_path(vars::PTP_HELPER, &build.join(PTP_HELPER));
    env.set_path(vars::REGISTRY, &build.join(REGISTRY));

    // Joined first so the site directories keep their own order at the front.
    if let Ok(site) = std::env::join_paths(site_packages) {
        env.prepend_var(vars::PYTHONPATH, &site.to_string_lossy());
    }
    env.append_path(vars::PYTHONPATH, &build.join(PYTHON_BINDINGS));

    register_artifacts(&mut env, &build.join(SUBPROJECTS));

    Ok(env)
}

/// List the entries of `<builddir>/subprojects`, sorted by name.
///
/// Regular files are ignored; directories and symlinks are kept.
pub fn list_subprojects(builddir: &Path) -> Result<Vec<Subproject>, ConfigError> {
    let dir = builddir.join(SUBPROJECTS);
    let list_err = |source| ConfigError::ListSubprojects {
        path: dir.clone(),
        source,
    };

    let mut subprojects = Vec::new();
    for entry in fs::read_dir(&dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let is_candidate = entry
            .file_type()
            .map(|t| t.is_dir() || t.is_symlink())
            .unwrap_or(false);
        if !is_candidate {
            continue;
        }
        subprojects.push(Subproject {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
        });
    }
    subprojects.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(subprojects)
}

/// Add each subproject to the plugin path and its `tools` directory to `PATH`.
///
/// A listed subproject whose path no longer resolves (e.g. a dangling symlink
/// in a half built tree) is an error.
pub fn register_subprojects(
    env: &mut Environment,
    subprojects: &[Subproject],
) -> Result<(), ConfigError> {
    for subproject in subprojects {
        if !subproject.path.exists() {
            return Err(ConfigError::MissingSubproject {
                name: subproject.name.clone(),
                path: subproject.path.clone(),
            });
        }

        let tools = subproject.path.join("tools");
        if tools.exists() {
            log::debug!("{}: adding {} to PATH", subproject.name, tools.display());
            env.prepend_path(vars::PATH, &tools);
        }

        log::debug!("{}: adding to {}", subproject.name, vars::PLUGIN_PATH);
        env.prepend_path(vars::PLUGIN_PATH, &subproject.path);
    }
    Ok(())
}

/// Put every directory under `root` holding typelibs or shared libraries on
/// the matching search paths, once per directory.
pub fn register_artifacts(env: &mut Environment, root: &Path) {
    for dir in artifacts::find_artifact_dirs(root) {
        if dir.has_typelib {
            log::debug!("adding {} to {}", dir.path.display(), vars::TYPELIB_PATH);
            env.prepend_path(vars::TYPELIB_PATH, &dir.path);
        }
        if dir.has_shared_library {
            log::debug!("adding {} to library paths", dir.path.display());
            env.prepend_path(vars::LD_LIBRARY_PATH, &dir.path);
            env.prepend_path(vars::DYLD_LIBRARY_PATH, &dir.path);
        }
    }
}
