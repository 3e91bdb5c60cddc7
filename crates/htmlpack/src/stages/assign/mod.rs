use htmlpack_common::{
  Bundle, BundleManifest, BundleSpec, BundleStrategy, BundleUrlMapper, DepGraph,
};
use htmlpack_error::BuildResult;
use oxc_index::IndexVec;

use crate::types::SharedOptions;

/// Turns the dependency graph into the bundle manifest by applying the
/// sharding strategy and the url mapper, then removing excluded files.
pub struct AssignStage<'a> {
  options: &'a SharedOptions,
}

impl<'a> AssignStage<'a> {
  pub fn new(options: &'a SharedOptions) -> Self {
    Self { options }
  }

  pub fn assign(
    &self,
    dep_graph: &DepGraph,
    strategy: &dyn BundleStrategy,
    url_mapper: &dyn BundleUrlMapper,
  ) -> BuildResult<BundleManifest> {
    // A single entry point needs no sharding policy: everything it reaches
    // rides along with it.
    let mut specs = if dep_graph.len() == 1 {
      let (entry, deps) = dep_graph.first().expect("just checked one entry");
      vec![BundleSpec { entry: Some(entry.clone()), files: deps.clone() }]
    } else {
      strategy.shard(dep_graph)
    };

    for spec in &mut specs {
      // The entry document itself always lives in its own bundle.
      if let Some(entry) = &spec.entry {
        spec.files.shift_insert(0, entry.clone());
      }
      // Excluded files stay out of every file set; their links survive in
      // the documents and resolve externally at runtime.
      spec.files.retain(|file| !self.options.is_excluded(file) && !self.options.is_stripped(file));
    }

    let bundles: IndexVec<_, Bundle> = specs
      .iter()
      .filter(|spec| !spec.files.is_empty())
      .map(|spec| Bundle::new(url_mapper.url_for(spec, dep_graph), spec.files.clone()))
      .collect();

    BundleManifest::new(bundles)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use htmlpack_common::{
    BundlerOptions, EntryUrlMapper, ResourceUrl, SharedBundleStrategy,
  };
  use htmlpack_utils::indexmap::FxIndexSet;

  use super::AssignStage;
  use crate::{types::SharedOptions, utils::normalize_options::normalize_options};

  fn url(value: &str) -> ResourceUrl {
    ResourceUrl::parse(value).unwrap()
  }

  fn options(raw: BundlerOptions) -> SharedOptions {
    Arc::new(normalize_options(raw).unwrap())
  }

  fn graph(entries: &[(&str, &[&str])]) -> htmlpack_common::DepGraph {
    entries
      .iter()
      .map(|(entry, deps)| (url(entry), deps.iter().map(|d| url(d)).collect::<FxIndexSet<_>>()))
      .collect()
  }

  #[test]
  fn single_entry_bypasses_strategy() {
    struct PanicStrategy;
    impl htmlpack_common::BundleStrategy for PanicStrategy {
      fn shard(&self, _: &htmlpack_common::DepGraph) -> Vec<htmlpack_common::BundleSpec> {
        panic!("strategy must not run for a single entry point");
      }
    }

    let options = options(BundlerOptions::default());
    let graph = graph(&[("https://a.test/a.html", &["https://a.test/b.html"])]);
    let manifest =
      AssignStage::new(&options).assign(&graph, &PanicStrategy, &EntryUrlMapper::default()).unwrap();

    assert_eq!(manifest.bundles.len(), 1);
    let bundle = manifest.bundle_for_url(&url("https://a.test/a.html")).unwrap();
    assert!(bundle.files.contains(&url("https://a.test/a.html")));
    assert!(bundle.files.contains(&url("https://a.test/b.html")));
  }

  #[test]
  fn single_ownership_across_bundles() {
    let options = options(BundlerOptions::default());
    let graph = graph(&[
      ("https://a.test/x.html", &["https://a.test/common.html", "https://a.test/x1.html"]),
      ("https://a.test/y.html", &["https://a.test/common.html"]),
    ]);

    let manifest = AssignStage::new(&options)
      .assign(&graph, &SharedBundleStrategy, &EntryUrlMapper::default())
      .unwrap();

    // Every reachable file appears in exactly one bundle.
    for file in
      ["https://a.test/x.html", "https://a.test/x1.html", "https://a.test/common.html"]
    {
      let owners = manifest
        .bundles
        .iter()
        .filter(|bundle| bundle.files.contains(&url(file)))
        .count();
      assert_eq!(owners, 1, "{file} should have exactly one owner");
    }

    let shared = manifest.bundle_for_url(&url("https://a.test/shared_bundle.html")).unwrap();
    assert!(shared.files.contains(&url("https://a.test/common.html")));
  }

  #[test]
  fn excluded_files_are_not_assigned() {
    let options = options(BundlerOptions {
      excludes: Some(vec!["https://a.test/b.html".to_string()]),
      ..Default::default()
    });
    let graph = graph(&[("https://a.test/a.html", &["https://a.test/b.html"])]);

    let manifest = AssignStage::new(&options)
      .assign(&graph, &SharedBundleStrategy, &EntryUrlMapper::default())
      .unwrap();
    assert!(manifest.bundle_for_file(&url("https://a.test/b.html")).is_none());
  }
}
