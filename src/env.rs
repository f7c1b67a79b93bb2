use std::collections::BTreeMap;
use std::env as stdenv;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Separator between entries of a search-path variable on this platform.
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// The environment handed to the launched child process.
///
/// The environment contains:
/// - `vars`: variables visible to the child, kept sorted by name.
/// - `raw_vars`: inherited variables that are not valid UTF-8, passed through untouched.
/// - `current_dir`: the working directory the child is started in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, GST_PLUGIN_PATH).
    pub vars: BTreeMap<String, String>,
    /// Variables whose name or value is not UTF-8. Shadowed by `vars` on a name clash.
    pub raw_vars: BTreeMap<OsString, OsString>,
    /// The working directory for the child process.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Build an environment from an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I, current_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            raw_vars: BTreeMap::new(),
            current_dir: current_dir.into(),
        }
    }

    /// Capture the variables of the running process.
    pub fn inherited(current_dir: impl Into<PathBuf>) -> Self {
        Self::from_os_vars(stdenv::vars_os(), current_dir)
    }

    /// Build an environment from raw OS strings.
    ///
    /// Names and values that are not UTF-8 go to `raw_vars`; they reach the
    /// child unchanged but cannot be edited as search paths.
    pub fn from_os_vars(
        vars_os: impl IntoIterator<Item = (OsString, OsString)>,
        current_dir: impl Into<PathBuf>,
    ) -> Self {
        let mut env = Self {
            current_dir: current_dir.into(),
            ..Self::default()
        };
        for (k, v) in vars_os {
            match (k.into_string(), v.into_string()) {
                (Ok(k), Ok(v)) => {
                    env.vars.insert(k, v);
                }
                (k, v) => {
                    let k = k.map_or_else(|raw| raw, OsString::from);
                    let v = v.map_or_else(|raw| raw, OsString::from);
                    log::debug!("passing non UTF-8 variable {:?} through as is", k);
                    env.raw_vars.insert(k, v);
                }
            }
        }
        env
    }

    /// Every variable the child process should see, raw ones first so that
    /// composed values win on a name clash.
    pub fn child_vars(&self) -> impl Iterator<Item = (OsString, OsString)> + '_ {
        let raw = self
            .raw_vars
            .iter()
            .filter(|(k, _)| k.to_str().is_none_or(|k| !self.vars.contains_key(k)))
            .map(|(k, v)| (k.clone(), v.clone()));
        let utf8 = self
            .vars
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)));
        raw.chain(utf8)
    }

    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Set a variable to a path, converted lossily to a string.
    pub fn set_path(&mut self, key: impl Into<String>, path: &Path) {
        self.set_var(key, path.to_string_lossy());
    }

    /// Put `value` in front of the search-path list stored under `key`.
    pub fn prepend_var(&mut self, key: &str, value: &str) {
        let current = self.get_var(key).unwrap_or_default();
        let joined = prepend_path_list(current, value);
        self.set_var(key, joined);
    }

    /// Put `path` in front of the search-path list stored under `key`.
    pub fn prepend_path(&mut self, key: &str, path: &Path) {
        self.prepend_var(key, &path.to_string_lossy());
    }

    /// Put `value` at the end of the search-path list stored under `key`.
    pub fn append_var(&mut self, key: &str, value: &str) {
        let current = self.get_var(key).unwrap_or_default();
        let joined = append_path_list(current, value);
        self.set_var(key, joined);
    }

    pub fn append_path(&mut self, key: &str, path: &Path) {
        self.append_var(key, &path.to_string_lossy());
    }
}

/// Join `value` in front of `list`, dropping empty segments.
///
/// The result never starts or ends with [`PATH_LIST_SEPARATOR`] and never
/// contains two separators in a row. Entries already in `list` keep their order.
pub fn prepend_path_list(list: &str, value: &str) -> String {
    join_segments([value, list])
}

/// Join `value` after `list`, with the same normalization as [`prepend_path_list`].
pub fn append_path_list(list: &str, value: &str) -> String {
    join_segments([list, value])
}

fn join_segments<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for segment in parts
        .into_iter()
        .flat_map(|part| part.split(PATH_LIST_SEPARATOR))
        .filter(|segment| !segment.is_empty())
    {
        if !out.is_empty() {
            out.push(PATH_LIST_SEPARATOR);
        }
        out.push_str(segment);
    }
    out
}
