use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;

use plugmeta_graph::{Graph, Uri};

use crate::load::{file_uri_to_path, LoadReport, Loader};
use crate::{ns, PluginDescriptor, PluginIndex, SearchPath};

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("no plugin with URI <{0}>")]
    NotFound(Uri),
    #[error("malformed graph: {0}")]
    MalformedGraph(String),
}

/// The query facade over the merged graph and the plugin index.
///
/// Built once from a search path, then read-only: every query takes
/// `&self`. The one exception is [`World::load_resource`], which may
/// append to the graph and therefore takes `&mut self`.
#[derive(Debug)]
pub struct World {
    loader: Loader,
    index: PluginIndex,
}

impl World {
    /// Loads every manifest discovered on the search path and builds the
    /// plugin index. Per-document failures become warnings on the
    /// [`LoadReport`]; only a structurally broken graph fails the build.
    pub fn load(search: &SearchPath) -> Result<Self, WorldError> {
        let mut loader = Loader::default();
        loader.load_search_path(search);
        let index = PluginIndex::build(&loader.graph, &loader.bundles)?;
        Ok(Self { loader, index })
    }

    /// Every discovered plugin, in URI order. Finite and restartable.
    pub fn plugins(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.index.iter()
    }

    pub fn plugin(&self, uri: &Uri) -> Result<&PluginDescriptor, WorldError> {
        self.index
            .get(uri)
            .ok_or_else(|| WorldError::NotFound(uri.clone()))
    }

    /// Every object URI related to `subject` through `relation`. Empty,
    /// never an error, when no such statement exists.
    pub fn related(&self, subject: &Uri, relation: &Uri) -> BTreeSet<Uri> {
        self.loader
            .graph
            .objects(subject, relation)
            .filter_map(|term| term.uri().cloned())
            .collect()
    }

    /// The first `rdfs:label` of `uri` in textual form, if any. Callers
    /// fall back to the URI's own text for display.
    pub fn label(&self, uri: &Uri) -> Option<String> {
        let predicate = ns::rdfs_label();
        let label = self
            .loader
            .graph
            .objects(uri, &predicate)
            .next()
            .map(|term| term.lexical().to_string());
        label
    }

    /// Follows the resource's `rdfs:seeAlso` links and merges the referenced
    /// documents into the graph, returning how many statements were added.
    ///
    /// Idempotent: each document is parsed at most once per world, and
    /// duplicate statements never re-enter the graph. Unreadable or
    /// malformed documents become warnings on the load report.
    pub fn load_resource(&mut self, uri: &Uri) -> usize {
        let see_also = ns::rdfs_see_also();
        let documents: Vec<PathBuf> = self
            .loader
            .graph
            .objects(uri, &see_also)
            .filter_map(|term| term.uri())
            .filter_map(|target| {
                let path = file_uri_to_path(target.as_str());
                if path.is_none() {
                    log::debug!("not loading non-file resource <{target}>");
                }
                path
            })
            .collect();
        documents
            .iter()
            .map(|path| self.loader.load_document(path))
            .sum()
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.loader.report
    }

    pub fn graph(&self) -> &Graph {
        &self.loader.graph
    }
}
