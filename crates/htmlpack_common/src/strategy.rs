use arcstr::ArcStr;
use htmlpack_utils::indexmap::{FxIndexMap, FxIndexSet};

use crate::{DepGraph, ResourceUrl};

/// One planned bundle before it has an output url: the entry point it serves
/// (if any) and the files it will carry. Shared bundles have no entry.
#[derive(Debug, Clone)]
pub struct BundleSpec {
  pub entry: Option<ResourceUrl>,
  pub files: FxIndexSet<ResourceUrl>,
}

/// Sharding policy: decides which files co-reside in which bundle. Must be a
/// pure function of the dependency graph so that substituting policies never
/// affects the assembler.
pub trait BundleStrategy: Send + Sync {
  fn shard(&self, graph: &DepGraph) -> Vec<BundleSpec>;
}

/// Output url policy for the bundles a strategy produced.
pub trait BundleUrlMapper: Send + Sync {
  fn url_for(&self, spec: &BundleSpec, graph: &DepGraph) -> ResourceUrl;
}

/// Default policy: a file referenced by two or more entry points is hoisted
/// into one shared bundle; everything else stays with its entry point.
/// Files that are themselves entry points are never hoisted — they already
/// own a bundle and other entries reach them as cross-bundle references.
#[derive(Debug, Default)]
pub struct SharedBundleStrategy;

impl BundleStrategy for SharedBundleStrategy {
  fn shard(&self, graph: &DepGraph) -> Vec<BundleSpec> {
    let mut ref_counts: FxIndexMap<&ResourceUrl, u32> = FxIndexMap::default();
    for deps in graph.values() {
      for dep in deps {
        if !graph.contains_key(dep) {
          *ref_counts.entry(dep).or_insert(0) += 1;
        }
      }
    }

    let shared: FxIndexSet<ResourceUrl> = ref_counts
      .iter()
      .filter_map(|(url, count)| (*count >= 2).then(|| (*url).clone()))
      .collect();

    let mut specs: Vec<BundleSpec> = graph
      .iter()
      .map(|(entry, deps)| BundleSpec {
        entry: Some(entry.clone()),
        files: deps
          .iter()
          .filter(|dep| !shared.contains(*dep) && !graph.contains_key(*dep))
          .cloned()
          .collect(),
      })
      .collect();

    if !shared.is_empty() {
      specs.push(BundleSpec { entry: None, files: shared });
    }

    specs
  }
}

/// Default policy: entry bundles keep their entry point's url; the shared
/// bundle gets a synthetic url next to the first entry point.
#[derive(Debug)]
pub struct EntryUrlMapper {
  pub shared_name: ArcStr,
}

impl Default for EntryUrlMapper {
  fn default() -> Self {
    Self { shared_name: arcstr::literal!("shared_bundle.html") }
  }
}

impl BundleUrlMapper for EntryUrlMapper {
  fn url_for(&self, spec: &BundleSpec, graph: &DepGraph) -> ResourceUrl {
    match &spec.entry {
      Some(entry) => entry.clone(),
      None => {
        let first_entry = graph.keys().next().expect("shared bundle implies at least one entry");
        first_entry.sibling(&self.shared_name)
      }
    }
  }
}
