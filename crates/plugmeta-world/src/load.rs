use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use plugmeta_graph::{parse_document, Graph, Uri};

use crate::{ns, SearchPath};

/// A non-fatal, per-document failure recorded while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub document: PathBuf,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents_loaded: usize,
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    fn warn(&mut self, document: &Path, message: String) {
        log::warn!("{}: {}", document.display(), message);
        self.warnings.push(LoadWarning {
            document: document.to_path_buf(),
            message,
        });
    }
}

/// Discovers manifest documents and merges their statements into one graph.
///
/// Every document is loaded at most once, keyed by canonical path, which
/// makes repeated loads of the same resource idempotent.
#[derive(Debug, Default)]
pub(crate) struct Loader {
    pub(crate) graph: Graph,
    pub(crate) report: LoadReport,
    loaded: HashSet<PathBuf>,
    /// Which bundle declared each plugin, first declaration wins.
    pub(crate) bundles: HashMap<Uri, Uri>,
}

impl Loader {
    pub(crate) fn load_search_path(&mut self, search: &SearchPath) {
        for location in &search.locations {
            if !location.is_dir() {
                continue;
            }
            for manifest in discover_manifests(location, search.max_depth) {
                self.load_manifest(&manifest);
            }
        }
    }

    fn load_manifest(&mut self, path: &Path) {
        let path = canonical(path);
        if !self.loaded.insert(path.clone()) {
            return;
        }
        let Some(document) = self.parse_file(&path) else {
            return;
        };
        let bundle = bundle_uri(&path);
        let rdf_type = ns::rdf_type();
        let lv2_plugin = ns::lv2_plugin();
        for statement in document.with_predicate(&rdf_type) {
            if statement.object.uri() == Some(&lv2_plugin) {
                self.bundles
                    .entry(statement.subject.clone())
                    .or_insert_with(|| bundle.clone());
            }
        }
        self.graph.merge(document);
        self.report.documents_loaded += 1;
    }

    /// Loads one auxiliary document, returning how many statements it
    /// added. Already-loaded documents add nothing.
    pub(crate) fn load_document(&mut self, path: &Path) -> usize {
        let path = canonical(path);
        if !self.loaded.insert(path.clone()) {
            return 0;
        }
        let Some(document) = self.parse_file(&path) else {
            return 0;
        };
        self.report.documents_loaded += 1;
        self.graph.merge(document)
    }

    /// Parses one document into its own graph so a malformed document
    /// contributes nothing at all.
    fn parse_file(&mut self, path: &Path) -> Option<Graph> {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                self.report.warn(path, format!("failed to read document: {err}"));
                return None;
            }
        };
        let mut document = Graph::new();
        match parse_document(&source, &file_uri(path), &mut document) {
            Ok(_) => Some(document),
            Err(err) => {
                self.report
                    .warn(path, format!("skipping malformed document: {err}"));
                None
            }
        }
    }
}

fn discover_manifests(location: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut manifests = Vec::new();
    let walker = WalkDir::new(location)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(io) = err.io_error() {
                    log::debug!(
                        "skipping entry while scanning {}: {}",
                        location.display(),
                        io
                    );
                }
                continue;
            }
        };
        if entry.file_type().is_file() && entry.file_name() == "manifest.ttl" {
            manifests.push(entry.into_path());
        }
    }
    manifests
}

pub(crate) fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

pub(crate) fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    uri.strip_prefix("file://").map(PathBuf::from)
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// The bundle directory's base URI, with a trailing slash.
fn bundle_uri(manifest: &Path) -> Uri {
    match manifest.parent() {
        Some(directory) => Uri::new_unchecked(format!("file://{}/", directory.display())),
        None => Uri::new_unchecked(file_uri(manifest)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn write_bundle(root: &Path, name: &str, manifest: &str) -> PathBuf {
        let bundle = root.join(name);
        create_dir_all(&bundle).unwrap();
        fs::write(bundle.join("manifest.ttl"), manifest).unwrap();
        bundle
    }

    const AMP_MANIFEST: &str = "@prefix lv2: <http://lv2plug.in/ns/lv2core#> .\n\
        <http://ex.org/amp> a lv2:Plugin .\n";

    #[test]
    fn load_merges_all_manifests_on_the_search_path() {
        let dir = tempdir().unwrap();
        write_bundle(dir.path(), "amp.lv2", AMP_MANIFEST);
        write_bundle(
            dir.path(),
            "comp.lv2",
            "@prefix lv2: <http://lv2plug.in/ns/lv2core#> .\n\
             <http://ex.org/comp> a lv2:Plugin .\n",
        );
        let mut loader = Loader::default();
        loader.load_search_path(&SearchPath::from_locations(vec![dir.path().to_path_buf()]));
        assert_eq!(loader.report.documents_loaded, 2);
        assert_eq!(loader.graph.len(), 2);
        assert!(loader.report.warnings.is_empty());
        assert_eq!(loader.bundles.len(), 2);
    }

    #[test]
    fn malformed_documents_are_skipped_with_a_warning() {
        let dir = tempdir().unwrap();
        write_bundle(dir.path(), "amp.lv2", AMP_MANIFEST);
        write_bundle(dir.path(), "broken.lv2", "this is not turtle at all\n");
        let mut loader = Loader::default();
        loader.load_search_path(&SearchPath::from_locations(vec![dir.path().to_path_buf()]));
        assert_eq!(loader.report.documents_loaded, 1);
        assert_eq!(loader.report.warnings.len(), 1);
        assert_eq!(loader.graph.len(), 1);
    }

    #[test]
    fn duplicate_locations_load_each_document_once() {
        let dir = tempdir().unwrap();
        write_bundle(dir.path(), "amp.lv2", AMP_MANIFEST);
        let location = dir.path().to_path_buf();
        let mut loader = Loader::default();
        loader.load_search_path(&SearchPath::from_locations(vec![
            location.clone(),
            location,
        ]));
        assert_eq!(loader.report.documents_loaded, 1);
        assert_eq!(loader.graph.len(), 1);
    }

    #[test]
    fn missing_locations_are_ignored() {
        let dir = tempdir().unwrap();
        let mut loader = Loader::default();
        loader.load_search_path(&SearchPath::from_locations(vec![
            dir.path().join("does-not-exist")
        ]));
        assert_eq!(loader.report.documents_loaded, 0);
        assert!(loader.graph.is_empty());
    }

    #[test]
    fn load_document_is_idempotent() {
        let dir = tempdir().unwrap();
        let bundle = write_bundle(dir.path(), "amp.lv2", AMP_MANIFEST);
        let manifest = bundle.join("manifest.ttl");
        let mut loader = Loader::default();
        assert_eq!(loader.load_document(&manifest), 1);
        assert_eq!(loader.load_document(&manifest), 0);
        assert_eq!(loader.graph.len(), 1);
    }
}
