use arcstr::ArcStr;
use htmlpack_common::{matchers, NodeIdx, ResourceUrl};
use htmlpack_error::{BuildResult, BundleError};

use crate::utils::rewrite_urls::rewrite_css_text;

use super::AssembleStage;

impl AssembleStage<'_> {
  /// Replaces external scripts owned by this bundle with inline scripts.
  /// Script content is opaque text; it is never url-rewritten.
  pub(crate) fn inline_scripts(&mut self) -> BuildResult<()> {
    for script in self.doc.find_all(matchers::is_external_script) {
      if !self.doc.is_attached(script) {
        continue;
      }

      let src = self.doc.node(script).attr("src").unwrap_or_default().to_string();
      let Some(resolved) = self.bundle.url.join(&src) else { continue };
      if !self.owned_here(&resolved) || self.options.is_excluded(&resolved) {
        continue;
      }

      let text = self.load_text(&resolved)?;
      let inline = self.doc.create_element("script", []);
      self.copy_attrs(script, inline, &["src"]);
      let content = self.doc.create_text(text.to_string());
      self.doc.append_child(inline, content);
      self.doc.insert_before(inline, script);
      self.doc.detach(script);
    }
    Ok(())
  }

  /// Replaces stylesheet links and css-typed import links with `<style>`
  /// elements whose internal urls are rewritten for the bundle document.
  pub(crate) fn inline_styles(&mut self) -> BuildResult<()> {
    for link in self.doc.find_all(matchers::is_stylesheet_link) {
      if !self.doc.is_attached(link) {
        continue;
      }

      let Some(resolved) = self.resolved_href(link) else { continue };
      if !self.owned_here(&resolved) || self.options.is_excluded(&resolved) {
        continue;
      }

      self.replace_with_style(link, &resolved, &["rel", "href"])?;
    }

    // The deprecated stylesheet import form. These are import links, so they
    // deduplicate through the reached set like any other import.
    for link in self.doc.find_all(matchers::is_css_import_link) {
      if !self.doc.is_attached(link) {
        continue;
      }

      let Some(resolved) = self.resolved_href(link) else { continue };
      if self.reached_files.contains(&resolved) {
        self.doc.detach(link);
        continue;
      }
      if !self.owned_here(&resolved) || self.options.is_excluded(&resolved) {
        continue;
      }

      let style = self.replace_with_style(link, &resolved, &["rel", "href", "type"])?;
      self.reached_files.insert(resolved);

      // Legacy components expect their styles inside the wrapper's template.
      if let Some(wrapper) = self.doc.ancestor(style, matchers::is_component_wrapper) {
        let template = self.wrapper_template(wrapper);
        self.doc.append_child(template, style);
      }
    }

    Ok(())
  }

  /// Loads `resolved`, swaps `link` for a `<style>` element carrying the
  /// rewritten css, and returns the new element.
  fn replace_with_style(
    &mut self,
    link: NodeIdx,
    resolved: &ResourceUrl,
    dropped_attrs: &[&str],
  ) -> BuildResult<NodeIdx> {
    let text = self.load_text(resolved)?;
    let css =
      rewrite_css_text(&text, resolved, &self.bundle.url, self.options.base_path.as_ref());

    let style = self.doc.create_element("style", []);
    self.copy_attrs(link, style, dropped_attrs);
    let content = self.doc.create_text(css);
    self.doc.append_child(style, content);
    self.doc.insert_before(style, link);
    self.doc.detach(link);
    Ok(style)
  }

  /// The `<template>` of a legacy component wrapper, created on demand.
  fn wrapper_template(&mut self, wrapper: NodeIdx) -> NodeIdx {
    let existing = self
      .doc
      .node(wrapper)
      .children
      .iter()
      .copied()
      .find(|idx| matchers::is_template(self.doc.node(*idx)));

    existing.unwrap_or_else(|| {
      let template = self.doc.create_element("template", []);
      self.doc.append_child(wrapper, template);
      template
    })
  }

  fn resolved_href(&self, link: NodeIdx) -> Option<ResourceUrl> {
    let href = self.doc.node(link).attr("href")?;
    self.bundle.url.join(href)
  }

  /// Whether this bundle owns the file, i.e. inlining it here cannot
  /// duplicate content another bundle is responsible for.
  fn owned_here(&self, url: &ResourceUrl) -> bool {
    self.manifest.bundle_for_file(url).is_some_and(|owner| owner.url == self.bundle.url)
  }

  /// An owned file that cannot be loaded as text is a hard failure: the
  /// manifest declared it part of this bundle.
  fn load_text(&self, url: &ResourceUrl) -> BuildResult<ArcStr> {
    let resource =
      self.accessor.load(url).map_err(|err| BundleError::inline(url, &self.bundle.url, err))?;
    resource
      .text()
      .cloned()
      .ok_or_else(|| BundleError::inline(url, &self.bundle.url, "resource is not a text file"))
  }

  fn copy_attrs(&mut self, from: NodeIdx, to: NodeIdx, dropped: &[&str]) {
    let attrs: Vec<(ArcStr, ArcStr)> = match &self.doc.node(from).data {
      htmlpack_common::NodeData::Element { attrs, .. } => attrs
        .iter()
        .filter(|(name, _)| !dropped.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect(),
      _ => Vec::new(),
    };
    for (name, value) in attrs {
      self.doc.set_attr(to, &name, &value);
    }
  }
}
