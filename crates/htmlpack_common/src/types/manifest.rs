use htmlpack_error::{BuildResult, BundleError};
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;

use crate::{Bundle, BundleIdx, ResourceUrl};

/// The authoritative file-to-bundle assignment for one bundling invocation.
///
/// Built once, validated once, then shared read-only across every concurrent
/// bundle assembly.
#[derive(Debug, Default)]
pub struct BundleManifest {
  pub bundles: IndexVec<BundleIdx, Bundle>,
  file_to_bundle: FxHashMap<ResourceUrl, BundleIdx>,
  url_to_bundle: FxHashMap<ResourceUrl, BundleIdx>,
}

impl BundleManifest {
  pub fn new(bundles: IndexVec<BundleIdx, Bundle>) -> BuildResult<Self> {
    let mut file_to_bundle = FxHashMap::default();
    let mut url_to_bundle = FxHashMap::default();

    for (idx, bundle) in bundles.iter_enumerated() {
      if url_to_bundle.insert(bundle.url.clone(), idx).is_some() {
        return Err(BundleError::DuplicateBundleUrl { url: bundle.url.inner().clone() });
      }

      for file in &bundle.files {
        if let Some(owner) = file_to_bundle.insert(file.clone(), idx) {
          return Err(BundleError::config(format!(
            "`{file}` is claimed by both bundle `{}` and bundle `{}`",
            bundles[owner].url, bundle.url
          )));
        }
      }
    }

    // A bundle url doubling as a member file of some other bundle would make
    // cross-bundle links ambiguous.
    for (url, idx) in &url_to_bundle {
      if let Some(owner) = file_to_bundle.get(url) {
        if owner != idx {
          return Err(BundleError::config(format!(
            "bundle url `{url}` is also a source file of bundle `{}`",
            bundles[*owner].url
          )));
        }
      }
    }

    Ok(Self { bundles, file_to_bundle, url_to_bundle })
  }

  /// The bundle that owns `file`, i.e. the one whose output document will
  /// carry its inlined content.
  pub fn bundle_for_file(&self, file: &ResourceUrl) -> Option<&Bundle> {
    self.file_to_bundle.get(file).map(|idx| &self.bundles[*idx])
  }

  pub fn bundle_for_url(&self, url: &ResourceUrl) -> Option<&Bundle> {
    self.url_to_bundle.get(url).map(|idx| &self.bundles[*idx])
  }
}

#[cfg(test)]
mod tests {
  use htmlpack_error::BundleError;
  use htmlpack_utils::indexmap::FxIndexSet;
  use oxc_index::IndexVec;

  use super::BundleManifest;
  use crate::{Bundle, ResourceUrl};

  fn url(value: &str) -> ResourceUrl {
    ResourceUrl::parse(value).unwrap()
  }

  fn bundle(own: &str, files: &[&str]) -> Bundle {
    Bundle::new(url(own), files.iter().map(|f| url(f)).collect::<FxIndexSet<_>>())
  }

  #[test]
  fn lookups() {
    let manifest = BundleManifest::new(IndexVec::from_iter([
      bundle("https://a.test/a.html", &["https://a.test/a.html", "https://a.test/b.html"]),
      bundle("https://a.test/shared_bundle.html", &["https://a.test/c.html"]),
    ]))
    .unwrap();

    let owner = manifest.bundle_for_file(&url("https://a.test/c.html")).unwrap();
    assert_eq!(&*owner.url, "https://a.test/shared_bundle.html");
    assert!(manifest.bundle_for_file(&url("https://a.test/d.html")).is_none());
    assert!(manifest.bundle_for_url(&url("https://a.test/a.html")).is_some());
  }

  #[test]
  fn rejects_duplicate_bundle_url() {
    let err = BundleManifest::new(IndexVec::from_iter([
      bundle("https://a.test/a.html", &["https://a.test/a.html"]),
      bundle("https://a.test/a.html", &["https://a.test/b.html"]),
    ]))
    .unwrap_err();
    assert!(matches!(err, BundleError::DuplicateBundleUrl { .. }));
  }

  #[test]
  fn rejects_shared_ownership() {
    let err = BundleManifest::new(IndexVec::from_iter([
      bundle("https://a.test/a.html", &["https://a.test/x.html"]),
      bundle("https://a.test/b.html", &["https://a.test/x.html"]),
    ]))
    .unwrap_err();
    assert!(matches!(err, BundleError::Config { .. }));
  }

  #[test]
  fn rejects_bundle_url_owned_elsewhere() {
    let err = BundleManifest::new(IndexVec::from_iter([
      bundle("https://a.test/a.html", &["https://a.test/b.html"]),
      bundle("https://a.test/b.html", &["https://a.test/c.html"]),
    ]))
    .unwrap_err();
    assert!(matches!(err, BundleError::Config { .. }));
  }
}
