use arcstr::ArcStr;

/// Failure taxonomy for one bundling invocation.
///
/// `Resolution` aborts the whole build, `Inline` and `LegacyMarkup` abort only
/// the bundle whose assembly raised them. Unresolvable transitive references
/// are not errors at all; they surface as warnings on the bundle output.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
  #[error("failed to resolve entry point `{url}`: {reason}")]
  Resolution { url: ArcStr, reason: String },

  #[error("failed to inline `{url}` into bundle `{bundle}`: {reason}")]
  Inline { url: ArcStr, bundle: ArcStr, reason: String },

  #[error("`{url}` contains deprecated <element> markup, which cannot be bundled")]
  LegacyMarkup { url: ArcStr },

  #[error("bundle url `{url}` is assigned to more than one bundle")]
  DuplicateBundleUrl { url: ArcStr },

  #[error("invalid bundler configuration: {reason}")]
  Config { reason: String },
}

impl BundleError {
  pub fn inline(url: &str, bundle: &str, reason: impl ToString) -> Self {
    Self::Inline {
      url: url.into(),
      bundle: bundle.into(),
      reason: reason.to_string(),
    }
  }

  pub fn config(reason: impl ToString) -> Self {
    Self::Config { reason: reason.to_string() }
  }
}

pub type BuildResult<T> = Result<T, BundleError>;
