use std::collections::{BTreeMap, HashMap};

use plugmeta_graph::{Graph, Uri};

use crate::{ns, WorldError};

/// The index's record for one discovered plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDescriptor {
    pub uri: Uri,
    /// Base URI of the bundle whose manifest declared the plugin.
    pub bundle: Uri,
}

/// Mapping from plugin URI to descriptor. Built once from the merged
/// graph, never mutated afterwards.
#[derive(Debug, Default)]
pub struct PluginIndex {
    plugins: BTreeMap<Uri, PluginDescriptor>,
}

impl PluginIndex {
    /// Scans the graph for subjects typed `lv2:Plugin`, keeping the first
    /// declaration of each URI.
    ///
    /// The graph is externally sourced, so every plugin subject is
    /// re-validated even though the parser only emits URI subjects.
    pub fn build(graph: &Graph, bundles: &HashMap<Uri, Uri>) -> Result<Self, WorldError> {
        let rdf_type = ns::rdf_type();
        let lv2_plugin = ns::lv2_plugin();
        let mut plugins = BTreeMap::new();
        for statement in graph.with_predicate(&rdf_type) {
            if statement.object.uri() != Some(&lv2_plugin) {
                continue;
            }
            let subject = &statement.subject;
            if Uri::parse(subject.as_str()).is_err() {
                return Err(WorldError::MalformedGraph(format!(
                    "plugin subject '{subject}' is not a valid URI"
                )));
            }
            let bundle = bundles.get(subject).cloned().ok_or_else(|| {
                WorldError::MalformedGraph(format!("plugin <{subject}> has no known bundle"))
            })?;
            plugins.entry(subject.clone()).or_insert_with(|| PluginDescriptor {
                uri: subject.clone(),
                bundle,
            });
        }
        Ok(Self { plugins })
    }

    pub fn get(&self, uri: &Uri) -> Option<&PluginDescriptor> {
        self.plugins.get(uri)
    }

    /// All descriptors in URI order.
    pub fn iter(&self) -> impl Iterator<Item = &PluginDescriptor> {
        self.plugins.values()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use plugmeta_graph::Statement;
    use pretty_assertions::assert_eq;

    use super::*;

    fn plugin_statement(subject: Uri) -> Statement {
        Statement::new(subject, ns::rdf_type(), ns::lv2_plugin())
    }

    fn bundle() -> Uri {
        Uri::new_unchecked("file:///lv2/amp.lv2/")
    }

    #[test]
    fn build_indexes_each_plugin_once() {
        let mut graph = Graph::new();
        let amp = Uri::parse("http://ex.org/amp").unwrap();
        graph.insert(plugin_statement(amp.clone()));
        let bundles = HashMap::from([(amp.clone(), bundle())]);
        let index = PluginIndex::build(&graph, &bundles).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&amp).unwrap().uri, amp);
        assert_eq!(index.get(&amp).unwrap().bundle, bundle());
    }

    #[test]
    fn invalid_plugin_subject_is_a_malformed_graph() {
        let mut graph = Graph::new();
        let bad = Uri::new_unchecked("not a uri");
        graph.insert(plugin_statement(bad.clone()));
        let bundles = HashMap::from([(bad, bundle())]);
        let err = PluginIndex::build(&graph, &bundles).unwrap_err();
        assert!(matches!(err, WorldError::MalformedGraph(_)));
    }

    #[test]
    fn plugin_without_bundle_attribution_is_a_malformed_graph() {
        let mut graph = Graph::new();
        graph.insert(plugin_statement(Uri::parse("http://ex.org/amp").unwrap()));
        let err = PluginIndex::build(&graph, &HashMap::new()).unwrap_err();
        assert!(matches!(err, WorldError::MalformedGraph(_)));
    }
}
