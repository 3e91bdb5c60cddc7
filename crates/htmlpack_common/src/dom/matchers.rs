//! Pure predicates over [`Node`] used by every stage of the assembler.

use crate::Node;

/// The deprecated first-generation custom element declaration form. Bundling
/// it would silently produce broken output, so its presence anywhere fails
/// the bundle.
pub const LEGACY_ELEMENT_TAG: &str = "element";

/// Wrapper element of the legacy component model whose `<template>` is
/// expected to carry the component's styles.
pub const COMPONENT_WRAPPER_TAG: &str = "polymer-element";

/// Marker attribute of the synthetic, non-rendering element that holds
/// relocated import content.
pub const HIDDEN_CONTAINER_ATTR: &str = "import-batch";

pub fn is_import_link(node: &Node) -> bool {
  node.tag() == Some("link") && node.attr("rel") == Some("import") && node.attr("href").is_some()
}

/// The deprecated form of stylesheet import: an import-typed link carrying
/// css. Handled by the style inlining pass, not the import pass.
pub fn is_css_import_link(node: &Node) -> bool {
  is_import_link(node) && node.attr("type") == Some("css")
}

pub fn is_html_import_link(node: &Node) -> bool {
  is_import_link(node) && !is_css_import_link(node)
}

pub fn is_stylesheet_link(node: &Node) -> bool {
  node.tag() == Some("link")
    && node.attr("rel") == Some("stylesheet")
    && node.attr("href").is_some()
}

pub fn is_external_script(node: &Node) -> bool {
  node.tag() == Some("script") && node.attr("src").is_some()
}

pub fn is_inline_script(node: &Node) -> bool {
  node.tag() == Some("script") && node.attr("src").is_none()
}

pub fn is_style(node: &Node) -> bool {
  node.tag() == Some("style")
}

/// An import, inline script or inline style whose execution order relative
/// to its siblings is semantically significant.
pub fn is_ordered_imperative(node: &Node) -> bool {
  is_import_link(node) || node.tag() == Some("script") || is_style(node)
}

pub fn is_legacy_element(node: &Node) -> bool {
  node.tag() == Some(LEGACY_ELEMENT_TAG)
}

pub fn is_component_wrapper(node: &Node) -> bool {
  node.tag() == Some(COMPONENT_WRAPPER_TAG)
}

pub fn is_template(node: &Node) -> bool {
  node.tag() == Some("template")
}

pub fn is_hidden_container(node: &Node) -> bool {
  node.tag() == Some("div") && node.has_attr("hidden") && node.has_attr(HIDDEN_CONTAINER_ATTR)
}

pub fn is_comment(node: &Node) -> bool {
  matches!(node.data, crate::NodeData::Comment(_))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Document;

  #[test]
  fn import_link_flavours() {
    let mut doc = Document::new();
    let import = doc.create_element("link", [("rel", "import"), ("href", "a.html")]);
    let css_import =
      doc.create_element("link", [("rel", "import"), ("type", "css"), ("href", "a.css")]);
    let stylesheet = doc.create_element("link", [("rel", "stylesheet"), ("href", "a.css")]);
    let bare = doc.create_element("link", [("rel", "import")]);

    assert!(is_html_import_link(doc.node(import)));
    assert!(!is_css_import_link(doc.node(import)));
    assert!(is_css_import_link(doc.node(css_import)));
    assert!(!is_html_import_link(doc.node(css_import)));
    assert!(is_stylesheet_link(doc.node(stylesheet)));
    assert!(!is_import_link(doc.node(stylesheet)));
    // An import link without an href is not followable.
    assert!(!is_import_link(doc.node(bare)));
  }

  #[test]
  fn scripts_and_imperatives() {
    let mut doc = Document::new();
    let external = doc.create_element("script", [("src", "a.js")]);
    let inline = doc.create_element("script", []);
    let style = doc.create_element("style", []);
    let div = doc.create_element("div", []);

    assert!(is_external_script(doc.node(external)));
    assert!(is_inline_script(doc.node(inline)));
    assert!(is_ordered_imperative(doc.node(external)));
    assert!(is_ordered_imperative(doc.node(inline)));
    assert!(is_ordered_imperative(doc.node(style)));
    assert!(!is_ordered_imperative(doc.node(div)));
  }
}
