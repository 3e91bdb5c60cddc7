mod inline_assets;
mod inline_imports;
mod strip_comments;

use htmlpack_accessor::ResourceContent;
use htmlpack_common::{
  matchers, Bundle, BundleManifest, Document, NodeIdx, ResourceUrl,
};
use htmlpack_error::{BuildResult, BundleError};
use rustc_hash::FxHashSet;

use crate::types::{SharedAccessor, SharedOptions};

/// Assembles one bundle into one merged output document.
///
/// Owns the document tree and the reached sets for the whole assembly; the
/// only shared state is the read-only manifest and the memoized accessor,
/// which is what makes sibling assemblies safe to run in parallel.
pub struct AssembleStage<'a> {
  pub(crate) options: &'a SharedOptions,
  pub(crate) accessor: &'a SharedAccessor,
  pub(crate) manifest: &'a BundleManifest,
  pub(crate) bundle: &'a Bundle,
  pub(crate) doc: Document,
  /// Source urls already inlined or otherwise resolved in this document.
  pub(crate) reached_files: FxHashSet<ResourceUrl>,
  /// Bundle urls whose content is already represented in this document.
  pub(crate) reached_bundles: FxHashSet<ResourceUrl>,
  /// Import links examined and deliberately kept (unmapped externals and
  /// cross-bundle references); the document-order scan skips them.
  pub(crate) kept_links: FxHashSet<NodeIdx>,
  hidden_container: Option<NodeIdx>,
}

impl<'a> AssembleStage<'a> {
  pub fn new(
    options: &'a SharedOptions,
    accessor: &'a SharedAccessor,
    manifest: &'a BundleManifest,
    bundle: &'a Bundle,
  ) -> Self {
    Self {
      options,
      accessor,
      manifest,
      bundle,
      doc: Document::shell(),
      reached_files: FxHashSet::default(),
      reached_bundles: FxHashSet::default(),
      kept_links: FxHashSet::default(),
      hidden_container: None,
    }
  }

  /// Prepare -> NormalizeStructure -> InlineImports -> InlineScripts? ->
  /// InlineStyles? -> StripComments? -> Done.
  pub fn assemble(mut self) -> BuildResult<Document> {
    self.prepare()?;
    self.guard_legacy_markup(&self.doc, &self.bundle.url)?;
    self.normalize_structure();
    self.append_bundle_imports();
    self.inline_imports()?;
    if self.options.inline_scripts {
      self.inline_scripts()?;
    }
    if self.options.inline_css {
      self.inline_styles()?;
    }
    if self.options.strip_comments {
      self.strip_comments();
    }
    Ok(self.doc)
  }

  /// Starts from the bundle's own document when the file set contains the
  /// bundle url, from an empty shell otherwise (shared bundles).
  fn prepare(&mut self) -> BuildResult<()> {
    if !self.bundle.has_own_document() {
      return Ok(());
    }

    let resource = self.accessor.load(&self.bundle.url).map_err(|err| {
      BundleError::inline(&self.bundle.url, &self.bundle.url, err)
    })?;
    self.doc = resource.document().ok_or_else(|| {
      BundleError::inline(&self.bundle.url, &self.bundle.url, "resource is not an html document")
    })?;
    Ok(())
  }

  /// The deprecated `<element>` declaration form cannot be merged; bundling
  /// it would produce broken output, so fail loudly instead.
  pub(crate) fn guard_legacy_markup(&self, doc: &Document, url: &ResourceUrl) -> BuildResult<()> {
    if doc.find(matchers::is_legacy_element).is_some() {
      return Err(BundleError::LegacyMarkup { url: url.inner().clone() });
    }
    Ok(())
  }

  /// Relocates order-sensitive head content and every html import link into
  /// the hidden container, so that inlining can deduplicate and append
  /// freely without disturbing visible structure.
  fn normalize_structure(&mut self) {
    // Pass 1: the first import link in head drags every ordered imperative
    // that follows it along, preserving relative order.
    if let Some(head) = self.doc.head() {
      let children = self.doc.node(head).children.clone();
      let first_import =
        children.iter().position(|idx| matchers::is_html_import_link(self.doc.node(*idx)));

      if let Some(first_import) = first_import {
        let moved: Vec<NodeIdx> = children[first_import..]
          .iter()
          .filter(|idx| matchers::is_ordered_imperative(self.doc.node(**idx)))
          .copied()
          .collect();
        for idx in moved {
          let container = self.hidden_container();
          self.doc.append_child(container, idx);
        }
      }
    }

    // Pass 2: any remaining import link joins the container too.
    let strays: Vec<NodeIdx> = self
      .doc
      .find_all(matchers::is_html_import_link)
      .into_iter()
      .filter(|idx| !self.is_inside_hidden_container(*idx))
      .collect();
    for idx in strays {
      let container = self.hidden_container();
      self.doc.append_child(container, idx);
    }
  }

  /// Guarantees every bundled html file has at least one import link, even
  /// when the strategy moved it into this bundle without an existing
  /// reference. Duplicates are expected; the inliner deduplicates them.
  /// Scripts and stylesheets ride along in the file set for ownership only;
  /// they are never import targets, their authored tags carry them.
  fn append_bundle_imports(&mut self) {
    let added: Vec<String> = self.options.added_imports.iter().map(ToString::to_string).collect();
    for href in added {
      self.append_import_link(&href);
    }

    let hrefs: Vec<String> = self
      .bundle
      .files
      .iter()
      .filter(|file| self.is_html_resource(file))
      .map(|file| self.bundle.href_for(file))
      .collect();
    for href in hrefs {
      self.append_import_link(&href);
    }
  }

  fn is_html_resource(&self, url: &ResourceUrl) -> bool {
    self
      .accessor
      .load(url)
      .is_ok_and(|resource| matches!(resource.content, ResourceContent::Html(_)))
  }

  fn append_import_link(&mut self, href: &str) {
    let container = self.hidden_container();
    let link = self.doc.create_element("link", [("rel", "import"), ("href", href)]);
    self.doc.append_child(container, link);
  }

  /// Lazily created once per assembly; a container left over from an
  /// earlier bundling run is reused rather than duplicated.
  pub(crate) fn hidden_container(&mut self) -> NodeIdx {
    if let Some(container) = self.hidden_container {
      return container;
    }

    let container = self.doc.find(matchers::is_hidden_container).unwrap_or_else(|| {
      let container = self
        .doc
        .create_element("div", [("hidden", ""), (matchers::HIDDEN_CONTAINER_ATTR, "")]);
      let parent = self.doc.body().or_else(|| self.doc.head()).unwrap_or(self.doc.root());
      self.doc.prepend_child(parent, container);
      container
    });

    self.hidden_container = Some(container);
    container
  }

  pub(crate) fn is_inside_hidden_container(&self, idx: NodeIdx) -> bool {
    self.doc.ancestor(idx, matchers::is_hidden_container).is_some()
  }
}
