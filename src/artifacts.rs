//! Discovery of build outputs under `<builddir>/subprojects`.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static SHARED_LIBRARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.so$|\.dylib$").expect("valid shared library pattern"));
static TYPELIB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.typelib$").expect("valid typelib pattern"));

/// What a file in the build tree is useful for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    SharedLibrary,
    Typelib,
}

impl ArtifactKind {
    pub fn classify(file_name: &str) -> Option<Self> {
        if TYPELIB.is_match(file_name) {
            Some(ArtifactKind::Typelib)
        } else if SHARED_LIBRARY.is_match(file_name) {
            Some(ArtifactKind::SharedLibrary)
        } else {
            None
        }
    }
}

/// A directory holding at least one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDir {
    pub path: PathBuf,
    pub has_shared_library: bool,
    pub has_typelib: bool,
}

/// Look at the immediate files of `dir` and note which artifact kinds it holds.
///
/// Stops reading as soon as both kinds have been seen. Returns `None` if the
/// directory holds neither or cannot be read.
pub fn scan_dir(dir: &Path) -> Option<ArtifactDir> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("skipping unreadable directory {}: {}", dir.display(), err);
            return None;
        }
    };

    let mut found = ArtifactDir {
        path: dir.to_path_buf(),
        has_shared_library: false,
        has_typelib: false,
    };
    for entry in entries.filter_map(Result::ok) {
        // Follows symlinks: `libfoo.so` is usually a link to the versioned file.
        if entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name();
        match ArtifactKind::classify(&name.to_string_lossy()) {
            Some(ArtifactKind::SharedLibrary) => found.has_shared_library = true,
            Some(ArtifactKind::Typelib) => found.has_typelib = true,
            None => {}
        }
        if found.has_shared_library && found.has_typelib {
            break;
        }
    }

    (found.has_shared_library || found.has_typelib).then_some(found)
}

/// Walk `root` top-down, including `root` itself, and report every directory
/// holding artifacts in walk order.
///
/// Siblings are visited sorted by file name. Directory symlinks are not
/// followed and unreadable entries are skipped.
pub fn find_artifact_dirs(root: &Path) -> Vec<ArtifactDir> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("skipping entry during walk: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| scan_dir(entry.path()))
        .collect()
}
