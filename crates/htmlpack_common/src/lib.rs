mod bundler_options;
mod dom;
mod strategy;
mod types;

pub use bundler_options::{normalized_bundler_options::NormalizedBundlerOptions, BundlerOptions};

pub use crate::{
  dom::{
    analyzer::{extract_references, RefKind, Reference},
    matchers, Document, Node, NodeData,
  },
  strategy::{BundleSpec, BundleStrategy, BundleUrlMapper, EntryUrlMapper, SharedBundleStrategy},
  types::{
    bundle::Bundle,
    dep_graph::DepGraph,
    manifest::BundleManifest,
    raw_idx::{BundleIdx, NodeIdx},
    resource_url::ResourceUrl,
  },
};
