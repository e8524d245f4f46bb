//! The RDF and LV2 vocabulary the index and the tools rely on.

use plugmeta_graph::Uri;

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const LV2: &str = "http://lv2plug.in/ns/lv2core#";
pub const PRESETS: &str = "http://lv2plug.in/ns/ext/presets#";

pub fn rdf_type() -> Uri {
    Uri::new_unchecked(format!("{RDF}type"))
}

pub fn rdfs_label() -> Uri {
    Uri::new_unchecked(format!("{RDFS}label"))
}

pub fn rdfs_see_also() -> Uri {
    Uri::new_unchecked(format!("{RDFS}seeAlso"))
}

pub fn lv2_plugin() -> Uri {
    Uri::new_unchecked(format!("{LV2}Plugin"))
}

/// The relation linking a plugin to one of its presets.
pub fn pset_preset() -> Uri {
    Uri::new_unchecked(format!("{PRESETS}preset"))
}
