pub mod analyzer;
pub mod matchers;

use arcstr::ArcStr;
use htmlpack_utils::indexmap::FxIndexMap;
use oxc_index::IndexVec;

use crate::NodeIdx;

/// Closed set of node kinds. "Matchers" over elements live in
/// [`matchers`] as pure predicates instead of ad hoc attribute probing.
#[derive(Debug, Clone)]
pub enum NodeData {
  Element { tag: ArcStr, attrs: FxIndexMap<ArcStr, ArcStr> },
  Text(String),
  Comment(String),
}

#[derive(Debug, Clone)]
pub struct Node {
  pub data: NodeData,
  pub parent: Option<NodeIdx>,
  pub children: Vec<NodeIdx>,
}

impl Node {
  pub fn tag(&self) -> Option<&str> {
    match &self.data {
      NodeData::Element { tag, .. } => Some(tag),
      _ => None,
    }
  }

  pub fn attr(&self, name: &str) -> Option<&str> {
    match &self.data {
      NodeData::Element { attrs, .. } => attrs.get(name).map(ArcStr::as_str),
      _ => None,
    }
  }

  pub fn has_attr(&self, name: &str) -> bool {
    matches!(&self.data, NodeData::Element { attrs, .. } if attrs.contains_key(name))
  }
}

/// In-memory document tree backed by an index arena.
///
/// Nodes are never deallocated during an assembly; [`Document::detach`]
/// unlinks a node from its parent, which is enough to drop it from every
/// document-order traversal. Owned exclusively by the single assembly that
/// mutates it.
#[derive(Debug, Clone)]
pub struct Document {
  nodes: IndexVec<NodeIdx, Node>,
  root: NodeIdx,
}

impl Document {
  /// An empty document: just the synthetic `#document` root.
  pub fn new() -> Self {
    let mut nodes = IndexVec::new();
    let root = nodes.push(Node {
      data: NodeData::Element { tag: arcstr::literal!("#document"), attrs: FxIndexMap::default() },
      parent: None,
      children: Vec::new(),
    });
    Self { nodes, root }
  }

  /// `#document > html > (head, body)` — the starting point for bundles
  /// whose file set does not include their own url.
  pub fn shell() -> Self {
    let mut doc = Self::new();
    let html = doc.create_element("html", []);
    let head = doc.create_element("head", []);
    let body = doc.create_element("body", []);
    doc.append_child(doc.root, html);
    doc.append_child(html, head);
    doc.append_child(html, body);
    doc
  }

  pub fn root(&self) -> NodeIdx {
    self.root
  }

  pub fn node(&self, idx: NodeIdx) -> &Node {
    &self.nodes[idx]
  }

  pub fn node_mut(&mut self, idx: NodeIdx) -> &mut Node {
    &mut self.nodes[idx]
  }

  pub fn create_element<'a>(
    &mut self,
    tag: &str,
    attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
  ) -> NodeIdx {
    let attrs =
      attrs.into_iter().map(|(name, value)| (ArcStr::from(name), ArcStr::from(value))).collect();
    self.push_detached(NodeData::Element { tag: ArcStr::from(tag), attrs })
  }

  pub fn create_text(&mut self, text: impl Into<String>) -> NodeIdx {
    self.push_detached(NodeData::Text(text.into()))
  }

  pub fn create_comment(&mut self, text: impl Into<String>) -> NodeIdx {
    self.push_detached(NodeData::Comment(text.into()))
  }

  fn push_detached(&mut self, data: NodeData) -> NodeIdx {
    self.nodes.push(Node { data, parent: None, children: Vec::new() })
  }

  pub fn set_attr(&mut self, idx: NodeIdx, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &mut self.nodes[idx].data {
      attrs.insert(ArcStr::from(name), ArcStr::from(value));
    }
  }

  pub fn remove_attr(&mut self, idx: NodeIdx, name: &str) {
    if let NodeData::Element { attrs, .. } = &mut self.nodes[idx].data {
      attrs.shift_remove(name);
    }
  }

  pub fn append_child(&mut self, parent: NodeIdx, child: NodeIdx) {
    self.detach(child);
    self.nodes[child].parent = Some(parent);
    self.nodes[parent].children.push(child);
  }

  pub fn prepend_child(&mut self, parent: NodeIdx, child: NodeIdx) {
    self.detach(child);
    self.nodes[child].parent = Some(parent);
    self.nodes[parent].children.insert(0, child);
  }

  /// Inserts `new` as a sibling immediately before `reference`.
  pub fn insert_before(&mut self, new: NodeIdx, reference: NodeIdx) {
    let parent = self.nodes[reference].parent.expect("insert_before target must be attached");
    self.detach(new);
    let pos = self.position_in_parent(parent, reference);
    self.nodes[new].parent = Some(parent);
    self.nodes[parent].children.insert(pos, new);
  }

  /// Unlinks the node (and, implicitly, its subtree) from the document.
  /// No-op for already detached nodes.
  pub fn detach(&mut self, idx: NodeIdx) {
    if let Some(parent) = self.nodes[idx].parent.take() {
      self.nodes[parent].children.retain(|child| *child != idx);
    }
  }

  pub fn is_attached(&self, idx: NodeIdx) -> bool {
    let mut current = idx;
    while let Some(parent) = self.nodes[current].parent {
      current = parent;
    }
    current == self.root
  }

  fn position_in_parent(&self, parent: NodeIdx, child: NodeIdx) -> usize {
    self.nodes[parent]
      .children
      .iter()
      .position(|c| *c == child)
      .expect("child must be present in its parent")
  }

  /// Pre-order traversal of the whole document, root excluded.
  pub fn descendants(&self) -> Vec<NodeIdx> {
    self.descendants_of(self.root)
  }

  /// Pre-order traversal of a subtree, `idx` itself included.
  pub fn subtree(&self, idx: NodeIdx) -> Vec<NodeIdx> {
    let mut out = vec![idx];
    out.extend(self.descendants_of(idx));
    out
  }

  fn descendants_of(&self, idx: NodeIdx) -> Vec<NodeIdx> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeIdx> = self.nodes[idx].children.iter().rev().copied().collect();
    while let Some(current) = stack.pop() {
      out.push(current);
      stack.extend(self.nodes[current].children.iter().rev().copied());
    }
    out
  }

  /// First document-order node matching `pred`.
  pub fn find(&self, pred: impl Fn(&Node) -> bool) -> Option<NodeIdx> {
    self.descendants().into_iter().find(|idx| pred(&self.nodes[*idx]))
  }

  pub fn find_all(&self, pred: impl Fn(&Node) -> bool) -> Vec<NodeIdx> {
    self.descendants().into_iter().filter(|idx| pred(&self.nodes[*idx])).collect()
  }

  pub fn head(&self) -> Option<NodeIdx> {
    self.find(|node| node.tag() == Some("head"))
  }

  pub fn body(&self) -> Option<NodeIdx> {
    self.find(|node| node.tag() == Some("body"))
  }

  /// Nearest ancestor (excluding `idx` itself) matching `pred`.
  pub fn ancestor(&self, idx: NodeIdx, pred: impl Fn(&Node) -> bool) -> Option<NodeIdx> {
    let mut current = self.nodes[idx].parent;
    while let Some(parent) = current {
      if pred(&self.nodes[parent]) {
        return Some(parent);
      }
      current = self.nodes[parent].parent;
    }
    None
  }

  /// Concatenated text of the node's direct text children.
  pub fn text_content(&self, idx: NodeIdx) -> String {
    let mut out = String::new();
    for child in &self.nodes[idx].children {
      if let NodeData::Text(text) = &self.nodes[*child].data {
        out.push_str(text);
      }
    }
    out
  }

  /// Moves every node of `fragment` into this arena, remapping indices.
  /// Returns the remapped `roots`, detached and ready to splice.
  pub fn adopt(&mut self, fragment: Document, roots: &[NodeIdx]) -> Vec<NodeIdx> {
    let offset = self.nodes.len();
    let remap = |idx: NodeIdx| NodeIdx::from_usize(idx.index() + offset);

    for node in fragment.nodes.raw {
      self.nodes.push(Node {
        data: node.data,
        parent: node.parent.map(remap),
        children: node.children.into_iter().map(remap).collect(),
      });
    }

    let roots: Vec<NodeIdx> = roots.iter().copied().map(remap).collect();
    for root in &roots {
      self.nodes[*root].parent = None;
    }
    roots
  }
}

impl Default for Document {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::Document;

  #[test]
  fn shell_layout() {
    let doc = Document::shell();
    let head = doc.head().unwrap();
    let body = doc.body().unwrap();
    assert!(doc.is_attached(head));
    assert!(doc.is_attached(body));
    assert_ne!(head, body);
  }

  #[test]
  fn detach_drops_subtree_from_traversal() {
    let mut doc = Document::shell();
    let body = doc.body().unwrap();
    let div = doc.create_element("div", []);
    let span = doc.create_element("span", []);
    doc.append_child(body, div);
    doc.append_child(div, span);

    assert!(doc.is_attached(span));
    doc.detach(div);
    assert!(!doc.is_attached(span));
    assert!(doc.find(|node| node.tag() == Some("span")).is_none());
  }

  #[test]
  fn insert_before_preserves_order() {
    let mut doc = Document::shell();
    let body = doc.body().unwrap();
    let a = doc.create_element("a", []);
    let c = doc.create_element("c", []);
    doc.append_child(body, a);
    doc.append_child(body, c);
    let b = doc.create_element("b", []);
    doc.insert_before(b, c);

    let tags: Vec<_> =
      doc.node(body).children.iter().map(|idx| doc.node(*idx).tag().unwrap().to_string()).collect();
    assert_eq!(tags, ["a", "b", "c"]);
  }

  #[test]
  fn adopt_remaps_fragment_indices() {
    let mut target = Document::shell();
    let mut fragment = Document::new();
    let div = fragment.create_element("div", [("id", "x")]);
    let text = fragment.create_text("hello");
    fragment.append_child(fragment.root(), div);
    fragment.append_child(div, text);

    let roots = fragment.node(fragment.root()).children.clone();
    let adopted = target.adopt(fragment, &roots);
    assert_eq!(adopted.len(), 1);

    let body = target.body().unwrap();
    target.append_child(body, adopted[0]);

    let div = target.find(|node| node.attr("id") == Some("x")).unwrap();
    assert_eq!(target.text_content(div), "hello");
  }
}
