//! Shared plumbing for the LV2 metadata command-line tools.

use std::path::PathBuf;

use plugmeta_world::SearchPath;

/// The search path from `LV2_PATH` (or the standard locations), with any
/// `--path` directories appended after it.
pub fn search_path_with_extras(extra_paths: &[PathBuf]) -> SearchPath {
    let mut search = SearchPath::from_env();
    for path in extra_paths {
        search.push(path.clone());
    }
    search
}
