//! URL assembly: scheme, domain, encoded path, query string, signature.
//!
//! ```text
//! https://assets.example.net/photos/cat.jpg?fit=crop&w=640&ixlib=rust-0.1.0&s=<md5>
//! └─────┘ └────────────────┘└─────────────┘ └──────────────┘ └────────────┘ └─────┘
//!  scheme      domain        encoded path     sorted params    library      signature
//! ```
//!
//! The signature is `md5(token + path + "?" + query)` over the encoded path
//! and the final query (library parameter included), or `md5(token + path)`
//! when the query is empty. It is only attached when the source has a token.

use crate::registry::SourceConfig;
use crate::types::{Params, VariantDescriptor};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters that must be percent-encoded in a relative path.
const PATH_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters that must be percent-encoded in query keys and values, and in
/// fully-qualified (proxied) paths, where `/` and `:` are encoded too.
const COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Name of the library-identification query parameter.
pub const LIBRARY_PARAM: &str = "ixlib";

/// Name of the signature query parameter.
pub const SIGNATURE_PARAM: &str = "s";

/// Value of the library-identification parameter.
pub fn library_value() -> String {
    format!("rust-{}", env!("CARGO_PKG_VERSION"))
}

/// Source-independent switches for URL assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlOptions {
    pub use_https: bool,
    pub include_library_param: bool,
    /// When false the path is used as given (only a leading `/` is added).
    pub encode_path: bool,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            use_https: true,
            include_library_param: true,
            encode_path: true,
        }
    }
}

/// Percent-encode a request path and root it at `/`.
///
/// A fully-qualified `http(s)://` path is a proxied origin URL and is
/// encoded as a single segment.
pub fn encode_path(path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return format!("/{}", utf8_percent_encode(path, COMPONENT_SET));
    }
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    format!("/{}", utf8_percent_encode(trimmed, PATH_SET))
}

fn rooted(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT_SET).to_string()
}

/// Serialize params (in key order) plus the library parameter, if enabled.
pub fn query_string(params: &Params, include_library_param: bool) -> String {
    let mut pairs: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect();
    if include_library_param {
        pairs.push(format!("{LIBRARY_PARAM}={}", encode_component(&library_value())));
    }
    pairs.join("&")
}

/// Signature over an already-encoded path and query.
pub fn sign(token: &str, path: &str, query: &str) -> String {
    let payload = if query.is_empty() {
        format!("{token}{path}")
    } else {
        format!("{token}{path}?{query}")
    };
    format!("{:x}", md5::compute(payload.as_bytes()))
}

/// Build the final URL for one parameter set on a resolved source.
pub fn build_url(source: &SourceConfig, path: &str, params: &Params, options: &UrlOptions) -> String {
    let scheme = if options.use_https { "https" } else { "http" };
    let path = if options.encode_path {
        encode_path(path)
    } else {
        rooted(path)
    };
    let mut query = query_string(params, options.include_library_param);
    if let Some(token) = source.signing_token() {
        let signature = sign(token, &path, &query);
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&format!("{SIGNATURE_PARAM}={signature}"));
    }

    if query.is_empty() {
        format!("{scheme}://{}{path}", source.domain())
    } else {
        format!("{scheme}://{}{path}?{query}", source.domain())
    }
}

/// Join descriptors into a `srcset` attribute value.
pub fn join_srcset(variants: &[VariantDescriptor]) -> String {
    variants
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
