use std::{collections::BTreeMap, str::FromStr};

use serde::Deserialize;

use crate::{key::PrivateKey, transformation::TransformationStep};

/// Errors surfaced while assembling a delivery URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    /// The transformation position was neither `path` nor `query`.
    #[error("invalid transformation position `{0}`: expected `path` or `query`")]
    InvalidTransformationPosition(String),
}

/// Where the serialized transformation chain is placed in the URL.
///
/// Parsing anything other than `path` or `query` fails with
/// [`UrlError::InvalidTransformationPosition`]:
///
/// ```rust
/// use imagekit_url::TransformationPosition;
///
/// let position: TransformationPosition = "query".parse().unwrap();
/// assert_eq!(position, TransformationPosition::Query);
/// assert!("segment".parse::<TransformationPosition>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum TransformationPosition {
    /// Inline the chain into the URL path, immediately before the resource.
    #[default]
    Path,

    /// Append the chain as the `tr` query parameter.
    Query,
}

impl FromStr for TransformationPosition {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" => Ok(Self::Path),
            "query" => Ok(Self::Query),
            other => Err(UrlError::InvalidTransformationPosition(other.to_string())),
        }
    }
}

impl TryFrom<String> for TransformationPosition {
    type Error = UrlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for TransformationPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Path => "path",
            Self::Query => "query",
        })
    }
}

/// Account-level defaults supplied by the surrounding application.
///
/// Typically deserialized from configuration. Its defaults are merged under
/// caller options by [`RequestContext::extend_url_options`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestContext {
    /// Public API key of the delivery account.
    pub public_key: String,

    /// Private API key used for URL signing.
    pub private_key: PrivateKey,

    /// Base delivery origin, e.g. `https://ik.imagekit.io/demo/`.
    pub url_endpoint: String,

    /// Default placement of the transformation chain.
    pub transformation_position: TransformationPosition,
}

impl RequestContext {
    /// Merges context defaults under `options`.
    ///
    /// Caller-supplied values win on collision; the context only fills in
    /// `public_key`, `private_key`, `url_endpoint` and
    /// `transformation_position` where the caller left them unset.
    pub fn extend_url_options(&self, mut options: UrlOptions) -> UrlOptions {
        if options.public_key.is_none() {
            options.public_key = Some(self.public_key.clone());
        }
        if options.private_key.is_none() {
            options.private_key = Some(self.private_key.clone());
        }
        if options.url_endpoint.is_none() {
            options.url_endpoint = Some(self.url_endpoint.clone());
        }
        if options.transformation_position.is_none() {
            options.transformation_position = Some(self.transformation_position);
        }
        options
    }
}

/// Per-call inputs to [`UrlBuilder::generate_url`](crate::UrlBuilder::generate_url).
///
/// Exactly one of [`path`](Self::path) and [`src`](Self::src) drives host and
/// path resolution; when both are empty the generated URL is the empty
/// string. Unset fields fall back to the [`RequestContext`] defaults.
#[derive(Debug, Clone, Default)]
pub struct UrlOptions {
    /// Relative resource path on the delivery endpoint.
    pub path: Option<String>,

    /// Absolute source URL; takes precedence over `path` and forces the
    /// transformation chain into the query.
    pub src: Option<String>,

    /// Base delivery origin, overriding the context default.
    pub url_endpoint: Option<String>,

    /// Public API key, overriding the context default.
    pub public_key: Option<String>,

    /// Signing key, overriding the context default.
    pub private_key: Option<PrivateKey>,

    /// Ordered transformation chain.
    pub transformation: Vec<TransformationStep>,

    /// Placement of the serialized chain, overriding the context default.
    pub transformation_position: Option<TransformationPosition>,

    /// Extra query parameters merged into the URL, overwriting parameters of
    /// the same name carried by `path`/`src`.
    pub query_parameters: BTreeMap<String, String>,

    /// Whether to sign the generated URL.
    pub signed: bool,

    /// Signature lifetime in seconds; `0` means the signature never expires.
    pub expire_seconds: u64,
}

impl UrlOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relative resource path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the absolute source URL.
    pub fn src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    /// Overrides the delivery origin for this call.
    pub fn url_endpoint(mut self, url_endpoint: impl Into<String>) -> Self {
        self.url_endpoint = Some(url_endpoint.into());
        self
    }

    /// Overrides the signing key for this call.
    pub fn private_key(mut self, private_key: impl Into<PrivateKey>) -> Self {
        self.private_key = Some(private_key.into());
        self
    }

    /// Appends one step to the transformation chain.
    pub fn step(mut self, step: TransformationStep) -> Self {
        self.transformation.push(step);
        self
    }

    /// Sets the placement of the transformation chain.
    pub fn transformation_position(mut self, position: TransformationPosition) -> Self {
        self.transformation_position = Some(position);
        self
    }

    /// Adds an extra query parameter.
    pub fn query_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters.insert(key.into(), value.into());
        self
    }

    /// Requests a signed URL.
    pub fn signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// Sets the signature lifetime in seconds; `0` means no expiry.
    pub fn expire_seconds(mut self, expire_seconds: u64) -> Self {
        self.expire_seconds = expire_seconds;
        self
    }
}
