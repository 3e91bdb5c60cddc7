use std::sync::Arc;

use htmlpack_common::{
  BundleStrategy, BundleUrlMapper, BundlerOptions, EntryUrlMapper, ResourceUrl,
  SharedBundleStrategy,
};
use htmlpack_error::{BuildResult, BundleError};
use rayon::prelude::*;

use crate::{
  stages::{assemble::AssembleStage, assign::AssignStage, scan::ScanStage},
  types::{SharedAccessor, SharedOptions},
  utils::normalize_options::normalize_options,
  AssembledBundle, BundleOutput,
};

pub struct Bundler {
  options: SharedOptions,
  accessor: SharedAccessor,
  strategy: Box<dyn BundleStrategy>,
  url_mapper: Box<dyn BundleUrlMapper>,
}

impl Bundler {
  pub fn new(options: BundlerOptions, accessor: SharedAccessor) -> BuildResult<Self> {
    let options = normalize_options(options)?;
    Ok(Self {
      options: Arc::new(options),
      accessor,
      strategy: Box::new(SharedBundleStrategy),
      url_mapper: Box::new(EntryUrlMapper::default()),
    })
  }

  /// Substitutes the sharding policy without touching the assembler.
  pub fn with_strategy(mut self, strategy: Box<dyn BundleStrategy>) -> Self {
    self.strategy = strategy;
    self
  }

  pub fn with_url_mapper(mut self, url_mapper: Box<dyn BundleUrlMapper>) -> Self {
    self.url_mapper = url_mapper;
    self
  }

  /// Scan -> assign -> assemble. Scan and assignment failures fail the whole
  /// invocation; a failure inside one bundle's assembly only withholds that
  /// bundle and is reported next to its siblings' results.
  pub fn bundle(&self, entries: &[&str]) -> BuildResult<BundleOutput> {
    let entries = entries
      .iter()
      .map(|raw| {
        ResourceUrl::parse(raw).map_err(|err| BundleError::Resolution {
          url: (*raw).into(),
          reason: err.to_string(),
        })
      })
      .collect::<BuildResult<Vec<_>>>()?;

    let scan_output = ScanStage::new(Arc::clone(&self.accessor)).scan(&entries)?;
    let manifest = AssignStage::new(&self.options).assign(
      &scan_output.dep_graph,
      &*self.strategy,
      &*self.url_mapper,
    )?;

    // Each assembly owns its document tree and reached sets; the manifest
    // and the accessor's memo are the only shared state, both read-only.
    let results: Vec<_> = manifest
      .bundles
      .raw
      .par_iter()
      .map(|bundle| {
        let result =
          AssembleStage::new(&self.options, &self.accessor, &manifest, bundle).assemble();
        (bundle.url.clone(), bundle.files.iter().cloned().collect::<Vec<_>>(), result)
      })
      .collect();

    let mut output = BundleOutput { warnings: scan_output.warnings, ..Default::default() };
    for (url, files, result) in results {
      match result {
        Ok(document) => {
          output.bundles.insert(url.clone(), AssembledBundle { url, document, files });
        }
        Err(error) => output.errors.push(error),
      }
    }

    Ok(output)
  }
}
