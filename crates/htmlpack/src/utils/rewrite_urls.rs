use std::sync::LazyLock;

use htmlpack_common::{Document, NodeData, NodeIdx, ResourceUrl};
use regex::{Captures, Regex};

/// Attributes that may carry a url. `assetpath` is the resolution base some
/// legacy components record for themselves.
const URL_ATTRS: &[&str] = &["href", "src", "action", "poster", "background", "assetpath"];

static CSS_URL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"url\(\s*['"]?([^)'"]+)['"]?\s*\)"#).unwrap());

/// Re-expresses one as-authored reference so it still resolves to the same
/// resource after its carrier moves from `from` to `to`. `None` means the
/// value must stay untouched.
pub fn rewrite_value(
  value: &str,
  from: &ResourceUrl,
  to: &ResourceUrl,
  base_path: Option<&ResourceUrl>,
) -> Option<String> {
  if value.is_empty() || value.starts_with('#') {
    return None;
  }
  // Scheme-ful and protocol-relative urls already resolve the same from
  // anywhere.
  if value.starts_with("//") || url::Url::parse(value).is_ok() {
    return None;
  }
  if let Some(site_absolute) = value.strip_prefix('/') {
    let base = base_path?;
    let absolute = base.join(site_absolute)?;
    return Some(to.relative(&absolute));
  }

  let absolute = from.join(value)?;
  Some(to.relative(&absolute))
}

/// Rewrites every `url(...)` occurrence in a css text.
pub fn rewrite_css_text(
  text: &str,
  from: &ResourceUrl,
  to: &ResourceUrl,
  base_path: Option<&ResourceUrl>,
) -> String {
  CSS_URL
    .replace_all(text, |caps: &Captures| {
      match rewrite_value(&caps[1], from, to, base_path) {
        Some(rewritten) => format!("url(\"{rewritten}\")"),
        None => caps[0].to_string(),
      }
    })
    .into_owned()
}

/// Rewrites every url-bearing attribute, inline `style` attribute and
/// `<style>` text found under `roots`. Must run before the nodes are spliced
/// into a document living at `to`; applying it twice to the same
/// (content, base) pair is a no-op.
pub fn rewrite_subtree_urls(
  doc: &mut Document,
  roots: &[NodeIdx],
  from: &ResourceUrl,
  to: &ResourceUrl,
  base_path: Option<&ResourceUrl>,
) {
  let mut attr_edits: Vec<(NodeIdx, &str, String)> = Vec::new();
  let mut text_edits: Vec<(NodeIdx, String)> = Vec::new();

  for root in roots {
    for idx in doc.subtree(*root) {
      let node = doc.node(idx);
      let Some(tag) = node.tag() else { continue };

      for name in URL_ATTRS {
        if let Some(value) = node.attr(name) {
          if let Some(rewritten) = rewrite_value(value, from, to, base_path) {
            attr_edits.push((idx, name, rewritten));
          }
        }
      }

      if let Some(style) = node.attr("style") {
        let rewritten = rewrite_css_text(style, from, to, base_path);
        if rewritten != style {
          attr_edits.push((idx, "style", rewritten));
        }
      }

      if tag == "style" {
        for child in &node.children {
          if let NodeData::Text(text) = &doc.node(*child).data {
            let rewritten = rewrite_css_text(text, from, to, base_path);
            if rewritten != *text {
              text_edits.push((*child, rewritten));
            }
          }
        }
      }
    }
  }

  for (idx, name, value) in attr_edits {
    doc.set_attr(idx, name, &value);
  }
  for (idx, text) in text_edits {
    doc.node_mut(idx).data = NodeData::Text(text);
  }
}
