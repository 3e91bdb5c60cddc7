use arcstr::ArcStr;

use crate::{dom::matchers, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
  Import,
  Script,
  Stylesheet,
}

/// One outgoing reference of a document, href kept exactly as authored.
/// Resolution against the referencing document's url happens at the graph
/// building stage.
#[derive(Debug, Clone)]
pub struct Reference {
  pub href: ArcStr,
  pub kind: RefKind,
}

/// Document-order extraction of every import / external script / stylesheet
/// reference. Css-typed import links count as stylesheets: they carry css
/// and the graph must not descend into them.
pub fn extract_references(doc: &Document) -> Vec<Reference> {
  let mut refs = Vec::new();

  for idx in doc.descendants() {
    let node = doc.node(idx);
    if matchers::is_html_import_link(node) {
      if let Some(href) = node.attr("href") {
        refs.push(Reference { href: href.into(), kind: RefKind::Import });
      }
    } else if matchers::is_css_import_link(node) || matchers::is_stylesheet_link(node) {
      if let Some(href) = node.attr("href") {
        refs.push(Reference { href: href.into(), kind: RefKind::Stylesheet });
      }
    } else if matchers::is_external_script(node) {
      if let Some(src) = node.attr("src") {
        refs.push(Reference { href: src.into(), kind: RefKind::Script });
      }
    }
  }

  refs
}
