mod bundler;
mod stages;
mod types;
mod utils;

pub use crate::{
  bundler::Bundler,
  types::bundle_output::{AssembledBundle, BundleOutput},
};
pub use htmlpack_accessor::{LoadedResource, MemoryAccessor, ResourceAccessor, ResourceContent};
pub use htmlpack_common::*;
pub use htmlpack_error::{BuildResult, BundleError};
