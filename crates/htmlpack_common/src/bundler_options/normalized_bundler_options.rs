use arcstr::ArcStr;
use htmlpack_utils::indexmap::FxIndexSet;

use crate::ResourceUrl;

#[allow(clippy::struct_excessive_bools)] // Using raw booleans is more clear in this case
#[derive(Debug, Default)]
pub struct NormalizedBundlerOptions {
  pub base_path: Option<ResourceUrl>,
  pub excludes: FxIndexSet<ResourceUrl>,
  /// Fully resolved strip set: the explicit `strip_excludes` plus, unless
  /// `no_implicit_strip` was set, every excluded url.
  pub strip_excludes: FxIndexSet<ResourceUrl>,
  pub inline_css: bool,
  pub inline_scripts: bool,
  pub strip_comments: bool,
  pub added_imports: Vec<ArcStr>,
}

impl NormalizedBundlerOptions {
  pub fn is_excluded(&self, url: &ResourceUrl) -> bool {
    self.excludes.contains(url)
  }

  pub fn is_stripped(&self, url: &ResourceUrl) -> bool {
    self.strip_excludes.contains(url)
  }
}
