//! # Overview
//!
//! This crate builds, and optionally cryptographically signs, URLs that
//! request transformed images from a remote image-delivery endpoint. Given a
//! relative resource path or an absolute source URL plus an ordered chain of
//! transformation steps, it deterministically produces one well-formed URL
//! string, with an HMAC-SHA1 signature and expiry embedded as query
//! parameters when signing is requested.
//!
//! Network transport, credential storage and server-side verification are
//! out of scope; the crate is a pure function library.
//!
//! # Usage
//!
//! ```rust
//! use imagekit_url::{RequestContext, TransformationStep, UrlBuilder, UrlOptions};
//!
//! let builder = UrlBuilder::new(RequestContext {
//!     url_endpoint: "https://ik.imagekit.io/demo/".into(),
//!     ..Default::default()
//! });
//!
//! let url = builder.generate_url(
//!     UrlOptions::new()
//!         .path("/default-image.jpg")
//!         .step(TransformationStep::new().add("height", 300).add("width", 400)),
//! );
//!
//! assert_eq!(
//!     url,
//!     "https://ik.imagekit.io/demo/tr:h-300,w-400/default-image.jpg"
//! );
//! ```
#![warn(
    clippy::all,
    nonstandard_style,
    future_incompatible,
    missing_docs,
    missing_debug_implementations
)]
#![forbid(unsafe_code)]

pub mod transform_code;

mod key;
mod options;
mod signer;
mod transformation;
mod url_builder;

pub use key::PrivateKey;
pub use options::{RequestContext, TransformationPosition, UrlError, UrlOptions};
pub use signer::DEFAULT_TIMESTAMP;
pub use transformation::{TransformationStep, FLAG};
pub use url_builder::UrlBuilder;
