use htmlpack_utils::indexmap::FxIndexSet;

use crate::ResourceUrl;

/// One output document: its eventual url plus every source file whose content
/// will live inside it.
#[derive(Debug, Clone)]
pub struct Bundle {
  pub url: ResourceUrl,
  pub files: FxIndexSet<ResourceUrl>,
}

impl Bundle {
  pub fn new(url: ResourceUrl, files: FxIndexSet<ResourceUrl>) -> Self {
    Self { url, files }
  }

  /// Whether the bundle starts from an existing document rather than an
  /// empty shell.
  pub fn has_own_document(&self) -> bool {
    self.files.contains(&self.url)
  }

  /// The href an import link inside this bundle's document should carry to
  /// point at `file`.
  pub fn href_for(&self, file: &ResourceUrl) -> String {
    self.url.relative(file)
  }
}
