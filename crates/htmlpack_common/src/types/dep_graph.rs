use htmlpack_utils::indexmap::{FxIndexMap, FxIndexSet};

use crate::ResourceUrl;

/// Entry point url -> the set of urls transitively reachable from it via
/// html imports, external scripts and external stylesheets. The entry point
/// itself is not a member of its own set.
pub type DepGraph = FxIndexMap<ResourceUrl, FxIndexSet<ResourceUrl>>;
