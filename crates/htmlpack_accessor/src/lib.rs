mod memory;

pub use memory::MemoryAccessor;

use std::sync::Arc;

use arcstr::ArcStr;
use htmlpack_common::{Document, Reference, ResourceUrl};

/// Parsed content of one resource. Html documents come with the reference
/// list the analyzer discovered in them; scripts and stylesheets are opaque
/// text.
#[derive(Debug, Clone)]
pub enum ResourceContent {
  Html(Document),
  Text(ArcStr),
}

#[derive(Debug, Clone)]
pub struct LoadedResource {
  pub url: ResourceUrl,
  pub content: ResourceContent,
  pub references: Vec<Reference>,
}

impl LoadedResource {
  /// A private mutable copy of the html content, or `None` for text
  /// resources.
  pub fn document(&self) -> Option<Document> {
    match &self.content {
      ResourceContent::Html(doc) => Some(doc.clone()),
      ResourceContent::Text(_) => None,
    }
  }

  pub fn text(&self) -> Option<&ArcStr> {
    match &self.content {
      ResourceContent::Text(text) => Some(text),
      ResourceContent::Html(_) => None,
    }
  }
}

/// Resolves a url to parsed, analyzed content. Implementations must be
/// idempotent and memoized per url; concurrent loads of the same url must be
/// safe, since bundle assemblies run in parallel over one shared accessor.
pub trait ResourceAccessor: Send + Sync {
  fn load(&self, url: &ResourceUrl) -> anyhow::Result<Arc<LoadedResource>>;
}
