use htmlpack_common::{Document, ResourceUrl};
use htmlpack_error::BundleError;
use htmlpack_utils::indexmap::FxIndexMap;

/// One assembled output document plus the source files merged into it.
#[derive(Debug)]
pub struct AssembledBundle {
  pub url: ResourceUrl,
  pub document: Document,
  pub files: Vec<ResourceUrl>,
}

/// Result of one `bundle()` invocation. A failed bundle never removes its
/// siblings from `bundles`; its error is collected here instead.
#[derive(Debug, Default)]
pub struct BundleOutput {
  pub bundles: FxIndexMap<ResourceUrl, AssembledBundle>,
  pub errors: Vec<BundleError>,
  pub warnings: Vec<anyhow::Error>,
}
