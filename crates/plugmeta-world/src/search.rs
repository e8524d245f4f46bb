use std::env;
use std::path::PathBuf;

/// Ordered sequence of directories to scan for LV2 bundles.
///
/// Order matters: when two locations declare the same plugin URI, the
/// earlier location wins.
#[derive(Debug, Clone)]
pub struct SearchPath {
    pub locations: Vec<PathBuf>,
    /// How deep below each location bundle manifests may sit.
    pub max_depth: usize,
}

impl SearchPath {
    pub const DEFAULT_MAX_DEPTH: usize = 2;

    pub fn from_locations(locations: Vec<PathBuf>) -> Self {
        Self {
            locations,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// The locations named by `LV2_PATH` when set, otherwise the standard
    /// system and user directories.
    pub fn from_env() -> Self {
        let locations = match env::var_os("LV2_PATH") {
            Some(paths) => env::split_paths(&paths).collect(),
            None => Self::default_locations(),
        };
        Self::from_locations(locations)
    }

    pub fn push(&mut self, location: PathBuf) {
        self.locations.push(location);
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut locations = Vec::new();
        if let Some(home) = dirs::home_dir() {
            locations.push(home.join(".lv2"));
        }
        locations.push(PathBuf::from("/usr/local/lib/lv2"));
        locations.push(PathBuf::from("/usr/lib/lv2"));
        locations
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self::from_locations(Self::default_locations())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn explicit_locations_keep_their_order() {
        let search = SearchPath::from_locations(vec![
            PathBuf::from("/first"),
            PathBuf::from("/second"),
        ]);
        assert_eq!(
            search.locations,
            vec![PathBuf::from("/first"), PathBuf::from("/second")]
        );
        assert_eq!(search.max_depth, SearchPath::DEFAULT_MAX_DEPTH);
    }
}
