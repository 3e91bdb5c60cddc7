use htmlpack_common::{matchers, NodeData};
use htmlpack_utils::indexmap::FxIndexSet;

use super::AssembleStage;

const LICENSE_MARKER: &str = "@license";

impl AssembleStage<'_> {
  /// Removes every comment, deduplicates by exact text, and re-inserts only
  /// the license-bearing ones at the front of head, once each, in first
  /// encounter order.
  pub(crate) fn strip_comments(&mut self) {
    let mut seen: FxIndexSet<String> = FxIndexSet::default();
    let mut licenses: Vec<String> = Vec::new();

    for idx in self.doc.find_all(matchers::is_comment) {
      let NodeData::Comment(text) = &self.doc.node(idx).data else { continue };
      if !seen.contains(text.as_str()) {
        seen.insert(text.clone());
        if text.contains(LICENSE_MARKER) {
          licenses.push(text.clone());
        }
      }
      self.doc.detach(idx);
    }

    let parent = self.doc.head().unwrap_or(self.doc.root());
    for text in licenses.into_iter().rev() {
      let comment = self.doc.create_comment(text);
      self.doc.prepend_child(parent, comment);
    }
  }
}
