pub mod normalized_bundler_options;

/// Caller-facing configuration. Everything is optional; see
/// `normalize_options` in the `htmlpack` crate for the defaults.
#[derive(Default, Debug, Clone)]
pub struct BundlerOptions {
  // --- Rewriting
  /// Root url for rewriting site-absolute (`/...`) references found inside
  /// relocated content. Unset leaves them untouched.
  pub base_path: Option<String>,

  // --- Exclusions
  /// Absolute urls that are never inlined. Their import links stay live so
  /// the runtime loads them independently.
  pub excludes: Option<Vec<String>>,
  /// Absolute urls whose import links are removed from the output entirely.
  pub strip_excludes: Option<Vec<String>>,
  /// By default every excluded url is also stripped. Setting this keeps
  /// excluded import links in the document and strips only the explicit
  /// `strip_excludes`.
  pub no_implicit_strip: Option<bool>,

  // --- Inlining
  pub inline_css: Option<bool>,
  pub inline_scripts: Option<bool>,
  pub strip_comments: Option<bool>,

  // --- Extra content
  /// Hrefs, relative to each bundle's output url, forced into the bundle
  /// document as additional import links.
  pub added_imports: Option<Vec<String>>,
}
