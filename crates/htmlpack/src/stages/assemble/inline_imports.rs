use htmlpack_common::{matchers, Document, NodeIdx};
use htmlpack_error::{BuildResult, BundleError};

use crate::utils::rewrite_urls::rewrite_subtree_urls;

use super::AssembleStage;

impl AssembleStage<'_> {
  /// Document-order scan over import links, restarted after every inline so
  /// freshly spliced content is seen. Recursion below keeps expansion
  /// strictly depth-first: a nested import is fully resolved before the
  /// enclosing scan continues.
  pub(crate) fn inline_imports(&mut self) -> BuildResult<()> {
    while let Some(link) = self.next_import_link() {
      self.inline_import(link)?;
    }
    Ok(())
  }

  fn next_import_link(&self) -> Option<NodeIdx> {
    self
      .doc
      .find_all(matchers::is_html_import_link)
      .into_iter()
      .find(|idx| !self.kept_links.contains(idx))
  }

  fn inline_import(&mut self, link: NodeIdx) -> BuildResult<()> {
    // A recursive pass may already have deduplicated this link away.
    if !self.doc.is_attached(link) {
      return Ok(());
    }

    let href =
      self.doc.node(link).attr("href").map(ToString::to_string).unwrap_or_default();
    let Some(resolved) = self.bundle.url.join(&href) else {
      // Unresolvable href: not ours to fix, leave it for the runtime.
      self.kept_links.insert(link);
      return Ok(());
    };

    // Already handled through another path.
    if self.reached_files.contains(&resolved) {
      self.doc.detach(link);
      return Ok(());
    }

    // Strip-excluded: unlink entirely, nothing is loaded.
    if self.options.is_stripped(&resolved) {
      self.reached_files.insert(resolved);
      self.doc.detach(link);
      return Ok(());
    }

    // Unmapped: the runtime loads it externally; keep the first link.
    let Some(target) = self.manifest.bundle_for_file(&resolved) else {
      self.reached_files.insert(resolved);
      self.kept_links.insert(link);
      return Ok(());
    };

    // Self-import is a no-op.
    if resolved == self.bundle.url {
      self.reached_files.insert(resolved);
      self.doc.detach(link);
      return Ok(());
    }

    // The target bundle's content is already represented here.
    if self.reached_bundles.contains(&target.url) {
      self.doc.detach(link);
      return Ok(());
    }

    // Another bundle owns the file: rewrite into a cross-bundle reference.
    if target.url != self.bundle.url {
      let target_url = target.url.clone();
      let href = self.bundle.url.relative(&target_url);
      self.doc.set_attr(link, "href", &href);
      self.reached_bundles.insert(target_url);
      self.kept_links.insert(link);
      return Ok(());
    }

    // Same bundle, not yet reached: merge the file's content in place.
    let resource = self
      .accessor
      .load(&resolved)
      .map_err(|err| BundleError::inline(&resolved, &self.bundle.url, err))?;
    let mut fragment = resource.document().ok_or_else(|| {
      BundleError::inline(&resolved, &self.bundle.url, "resource is not an html document")
    })?;

    self.guard_legacy_markup(&fragment, &resolved)?;

    let roots = fragment_content_nodes(&fragment);
    rewrite_subtree_urls(
      &mut fragment,
      &roots,
      &resolved,
      &self.bundle.url,
      self.options.base_path.as_ref(),
    );

    let adopted = self.doc.adopt(fragment, &roots);
    for node in &adopted {
      self.doc.insert_before(*node, link);
    }
    self.doc.detach(link);
    self.reached_files.insert(resolved);

    let nested: Vec<NodeIdx> = adopted
      .iter()
      .flat_map(|node| self.doc.subtree(*node))
      .filter(|idx| matchers::is_html_import_link(self.doc.node(*idx)))
      .collect();
    for nested_link in nested {
      self.inline_import(nested_link)?;
    }

    Ok(())
  }
}

/// The nodes an import contributes to its importer. A fragment carrying a
/// full `<html>` shell contributes its head and body children; anything
/// else contributes its top-level nodes.
fn fragment_content_nodes(doc: &Document) -> Vec<NodeIdx> {
  let root_children = &doc.node(doc.root()).children;
  let html = root_children.iter().copied().find(|idx| doc.node(*idx).tag() == Some("html"));

  match html {
    Some(html) => {
      let mut out = Vec::new();
      for child in &doc.node(html).children {
        match doc.node(*child).tag() {
          Some("head" | "body") => out.extend(doc.node(*child).children.iter().copied()),
          _ => out.push(*child),
        }
      }
      out
    }
    None => root_children.clone(),
  }
}
