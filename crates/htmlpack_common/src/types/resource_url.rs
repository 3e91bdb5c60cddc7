use arcstr::ArcStr;
use url::Url;

/// `ResourceUrl` is the unique string identity of a fetchable resource.
/// - Always absolute; two urls are equal iff their normalized forms are equal.
/// - Normalization is whatever `url::Url` produces when re-serializing.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ResourceUrl(ArcStr);

impl ResourceUrl {
  pub fn parse(value: &str) -> Result<Self, url::ParseError> {
    Url::parse(value).map(|url| Self(ArcStr::from(url.as_str())))
  }

  fn as_url(&self) -> Url {
    Url::parse(&self.0).unwrap_or_else(|_| panic!("ResourceUrl holds a parsed url: {}", self.0))
  }

  /// Resolves an as-authored reference against this url. `None` means the
  /// reference is not something a bundler can follow (malformed, or a
  /// relative reference without enough context).
  pub fn join(&self, href: &str) -> Option<ResourceUrl> {
    self.as_url().join(href).ok().map(|url| Self(ArcStr::from(url.as_str())))
  }

  /// Re-expresses `target` relative to this url. Falls back to the absolute
  /// form when the two urls do not share an origin.
  pub fn relative(&self, target: &ResourceUrl) -> String {
    self.as_url().make_relative(&target.as_url()).unwrap_or_else(|| target.0.to_string())
  }

  /// A url next to this one, e.g. the synthetic shared bundle of an entry
  /// point directory.
  pub fn sibling(&self, file_name: &str) -> ResourceUrl {
    self.join(file_name).unwrap_or_else(|| self.clone())
  }

  pub fn inner(&self) -> &ArcStr {
    &self.0
  }
}

impl std::ops::Deref for ResourceUrl {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ResourceUrl {
  fn as_ref(&self) -> &str {
    self
  }
}

impl std::fmt::Display for ResourceUrl {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

#[cfg(test)]
mod tests {
  use super::ResourceUrl;

  #[test]
  fn join_and_normalize() {
    let base = ResourceUrl::parse("https://app.test/components/a.html").unwrap();
    let joined = base.join("../shared/b.html").unwrap();
    assert_eq!(&*joined, "https://app.test/shared/b.html");

    // Equality goes through the normalized form.
    let direct = ResourceUrl::parse("https://app.test/shared/./b.html").unwrap();
    assert_eq!(joined, direct);
  }

  #[test]
  fn join_rejects_garbage() {
    let base = ResourceUrl::parse("https://app.test/a.html").unwrap();
    assert!(base.join("https://[bad").is_none());
  }

  #[test]
  fn relative_within_origin() {
    let base = ResourceUrl::parse("https://app.test/pages/index.html").unwrap();
    let target = ResourceUrl::parse("https://app.test/components/x.html").unwrap();
    assert_eq!(base.relative(&target), "../components/x.html");
  }

  #[test]
  fn relative_cross_origin_stays_absolute() {
    let base = ResourceUrl::parse("https://app.test/index.html").unwrap();
    let target = ResourceUrl::parse("https://cdn.test/x.html").unwrap();
    assert_eq!(base.relative(&target), "https://cdn.test/x.html");
  }

  #[test]
  fn parse_rejects_relative() {
    assert!(ResourceUrl::parse("components/a.html").is_err());
  }
}
