use std::sync::Arc;

use dashmap::DashMap;
use htmlpack_common::{extract_references, Document, ResourceUrl};

use crate::{LoadedResource, ResourceAccessor, ResourceContent};

/// In-memory accessor: the resource universe is registered up front and
/// every load hands out the same memoized `Arc`. Doubles as the test double
/// for the whole engine.
#[derive(Debug, Default)]
pub struct MemoryAccessor {
  resources: DashMap<ResourceUrl, Arc<LoadedResource>>,
}

impl MemoryAccessor {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers an html document. Reference extraction runs once, here, so
  /// the stored resource already carries its analyzed reference list.
  pub fn insert_document(&self, url: ResourceUrl, document: Document) {
    let references = extract_references(&document);
    self.resources.insert(
      url.clone(),
      Arc::new(LoadedResource { url, content: ResourceContent::Html(document), references }),
    );
  }

  /// Registers an opaque text resource (script or stylesheet).
  pub fn insert_text(&self, url: ResourceUrl, text: &str) {
    self.resources.insert(
      url.clone(),
      Arc::new(LoadedResource {
        url,
        content: ResourceContent::Text(text.into()),
        references: Vec::new(),
      }),
    );
  }
}

impl ResourceAccessor for MemoryAccessor {
  fn load(&self, url: &ResourceUrl) -> anyhow::Result<Arc<LoadedResource>> {
    self
      .resources
      .get(url)
      .map(|entry| Arc::clone(entry.value()))
      .ok_or_else(|| anyhow::anyhow!("no resource registered for `{url}`"))
  }
}

#[cfg(test)]
mod tests {
  use htmlpack_common::{Document, ResourceUrl};

  use super::MemoryAccessor;
  use crate::ResourceAccessor;

  #[test]
  fn load_is_memoized() {
    let accessor = MemoryAccessor::new();
    let url = ResourceUrl::parse("https://a.test/a.html").unwrap();
    accessor.insert_document(url.clone(), Document::shell());

    let first = accessor.load(&url).unwrap();
    let second = accessor.load(&url).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
  }

  #[test]
  fn missing_resource_errors() {
    let accessor = MemoryAccessor::new();
    let url = ResourceUrl::parse("https://a.test/missing.html").unwrap();
    assert!(accessor.load(&url).is_err());
  }

  #[test]
  fn inserted_documents_carry_references() {
    let accessor = MemoryAccessor::new();
    let mut doc = Document::shell();
    let head = doc.head().unwrap();
    let link = doc.create_element("link", [("rel", "import"), ("href", "b.html")]);
    doc.append_child(head, link);

    let url = ResourceUrl::parse("https://a.test/a.html").unwrap();
    accessor.insert_document(url.clone(), doc);
    assert_eq!(accessor.load(&url).unwrap().references.len(), 1);
  }
}
