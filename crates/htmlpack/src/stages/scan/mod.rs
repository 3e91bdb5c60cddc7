use htmlpack_common::{DepGraph, RefKind, ResourceUrl};
use htmlpack_error::{BuildResult, BundleError};
use htmlpack_utils::indexmap::FxIndexSet;

use crate::types::SharedAccessor;

#[derive(Debug)]
pub struct ScanStageOutput {
  pub dep_graph: DepGraph,
  pub warnings: Vec<anyhow::Error>,
}

/// Builds the per-entry-point transitive dependency sets by walking html
/// import references through the accessor. Scripts and stylesheets join the
/// sets as leaves; only imports are descended into.
pub struct ScanStage {
  accessor: SharedAccessor,
}

impl ScanStage {
  pub fn new(accessor: SharedAccessor) -> Self {
    Self { accessor }
  }

  pub fn scan(&self, entries: &[ResourceUrl]) -> BuildResult<ScanStageOutput> {
    let mut dep_graph = DepGraph::default();
    let mut warnings = Vec::new();

    for entry in entries {
      // An unreadable entry point is fatal; nothing sensible can be bundled
      // without it.
      let resource = self.accessor.load(entry).map_err(|err| BundleError::Resolution {
        url: entry.inner().clone(),
        reason: err.to_string(),
      })?;

      let mut deps = FxIndexSet::default();
      self.collect(entry, &resource.references, &mut deps, &mut warnings);
      deps.shift_remove(entry);
      dep_graph.insert(entry.clone(), deps);
    }

    Ok(ScanStageOutput { dep_graph, warnings })
  }

  fn collect(
    &self,
    referrer: &ResourceUrl,
    references: &[htmlpack_common::Reference],
    deps: &mut FxIndexSet<ResourceUrl>,
    warnings: &mut Vec<anyhow::Error>,
  ) {
    for reference in references {
      let Some(resolved) = referrer.join(&reference.href) else {
        warnings.push(anyhow::anyhow!(
          "reference `{}` in `{referrer}` cannot be resolved",
          reference.href
        ));
        continue;
      };

      // Diamonds and cycles: each url is visited once per entry point.
      if !deps.insert(resolved.clone()) {
        continue;
      }

      if reference.kind != RefKind::Import {
        continue;
      }

      // A missing transitive dependency is best-effort: it is dropped from
      // the set so no bundle claims ownership of it, its import link stays
      // live, and the runtime surfaces the failure at load time.
      match self.accessor.load(&resolved) {
        Ok(resource) => {
          self.collect(&resolved, &resource.references, deps, warnings);
        }
        Err(err) => {
          deps.shift_remove(&resolved);
          warnings.push(anyhow::anyhow!("failed to load `{resolved}`: {err}"));
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use htmlpack_accessor::MemoryAccessor;
  use htmlpack_common::{Document, ResourceUrl};
  use htmlpack_error::BundleError;

  use super::ScanStage;

  fn url(value: &str) -> ResourceUrl {
    ResourceUrl::parse(value).unwrap()
  }

  fn doc_importing(hrefs: &[&str]) -> Document {
    let mut doc = Document::shell();
    let head = doc.head().unwrap();
    for href in hrefs {
      let link = doc.create_element("link", [("rel", "import"), ("href", href)]);
      doc.append_child(head, link);
    }
    doc
  }

  #[test]
  fn walks_imports_transitively() {
    let accessor = MemoryAccessor::new();
    accessor.insert_document(url("https://a.test/a.html"), doc_importing(&["b.html", "c.html"]));
    accessor.insert_document(url("https://a.test/b.html"), doc_importing(&[]));
    accessor.insert_document(url("https://a.test/c.html"), doc_importing(&["b.html"]));

    let output = ScanStage::new(Arc::new(accessor)).scan(&[url("https://a.test/a.html")]).unwrap();
    let deps = &output.dep_graph[&url("https://a.test/a.html")];
    assert_eq!(deps.len(), 2);
    assert!(output.warnings.is_empty());
  }

  #[test]
  fn cyclic_imports_terminate() {
    let accessor = MemoryAccessor::new();
    accessor.insert_document(url("https://a.test/a.html"), doc_importing(&["b.html"]));
    accessor.insert_document(url("https://a.test/b.html"), doc_importing(&["a.html"]));

    let output = ScanStage::new(Arc::new(accessor)).scan(&[url("https://a.test/a.html")]).unwrap();
    // The entry itself is not a member of its own dependency set.
    let deps = &output.dep_graph[&url("https://a.test/a.html")];
    assert_eq!(deps.len(), 1);
  }

  #[test]
  fn missing_entry_is_fatal() {
    let accessor = MemoryAccessor::new();
    let err =
      ScanStage::new(Arc::new(accessor)).scan(&[url("https://a.test/missing.html")]).unwrap_err();
    assert!(matches!(err, BundleError::Resolution { .. }));
  }

  #[test]
  fn missing_transitive_dependency_is_a_warning() {
    let accessor = MemoryAccessor::new();
    accessor.insert_document(url("https://a.test/a.html"), doc_importing(&["missing.html"]));

    let output = ScanStage::new(Arc::new(accessor)).scan(&[url("https://a.test/a.html")]).unwrap();
    assert_eq!(output.warnings.len(), 1);
    // No bundle may own a url that cannot be loaded.
    assert!(output.dep_graph[&url("https://a.test/a.html")].is_empty());
  }
}
