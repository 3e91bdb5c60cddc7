use arcstr::ArcStr;
use htmlpack_common::{BundlerOptions, NormalizedBundlerOptions, ResourceUrl};
use htmlpack_error::{BuildResult, BundleError};
use htmlpack_utils::indexmap::FxIndexSet;

fn parse_url_list(urls: Option<Vec<String>>, option: &str) -> BuildResult<FxIndexSet<ResourceUrl>> {
  urls
    .unwrap_or_default()
    .iter()
    .map(|raw| {
      ResourceUrl::parse(raw)
        .map_err(|err| BundleError::config(format!("`{option}` entry `{raw}` is not absolute: {err}")))
    })
    .collect()
}

pub fn normalize_options(raw_options: BundlerOptions) -> BuildResult<NormalizedBundlerOptions> {
  let base_path = raw_options
    .base_path
    .map(|raw| {
      ResourceUrl::parse(&raw)
        .map_err(|err| BundleError::config(format!("`base_path` `{raw}` is not absolute: {err}")))
    })
    .transpose()?;

  let excludes = parse_url_list(raw_options.excludes, "excludes")?;
  let mut strip_excludes = parse_url_list(raw_options.strip_excludes, "strip_excludes")?;

  // Excluded imports are stripped from the output by default; only an
  // explicit `no_implicit_strip` keeps their links alive.
  if !raw_options.no_implicit_strip.unwrap_or(false) {
    strip_excludes.extend(excludes.iter().cloned());
  }

  Ok(NormalizedBundlerOptions {
    base_path,
    excludes,
    strip_excludes,
    inline_css: raw_options.inline_css.unwrap_or(false),
    inline_scripts: raw_options.inline_scripts.unwrap_or(false),
    strip_comments: raw_options.strip_comments.unwrap_or(false),
    added_imports: raw_options
      .added_imports
      .unwrap_or_default()
      .into_iter()
      .map(ArcStr::from)
      .collect(),
  })
}
