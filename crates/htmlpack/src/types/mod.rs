pub mod bundle_output;

use std::sync::Arc;

use htmlpack_accessor::ResourceAccessor;
use htmlpack_common::NormalizedBundlerOptions;

pub type SharedOptions = Arc<NormalizedBundlerOptions>;
pub type SharedAccessor = Arc<dyn ResourceAccessor>;
