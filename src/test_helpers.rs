//! Shared test utilities for the ix-srcset test suite.
//!
//! Config fixtures for each registry mode, and a tiny query-string reader
//! for asserting on generated URLs.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let urls = ImageUrls::new(bare_source("a.com")).unwrap();
//! let url = urls.build_url(&ImageRequest::new("x.jpg").param("w", 100)).unwrap();
//! assert_eq!(query_pairs(&url)["w"], "100");
//! ```

use std::collections::BTreeMap;

use crate::config::{CdnConfig, ShardStrategy, SourceSetting};

// =========================================================================
// Config fixtures
// =========================================================================

/// Single-source config with every default in place (library param on).
pub fn single_source(domain: &str) -> CdnConfig {
    CdnConfig::single(domain)
}

/// Single-source config without the library param, for exact URL asserts.
pub fn bare_source(domain: &str) -> CdnConfig {
    CdnConfig {
        include_library_param: false,
        ..CdnConfig::single(domain)
    }
}

/// Sharded single-source config.
pub fn sharded_source(domains: &[&str], strategy: Option<ShardStrategy>) -> CdnConfig {
    CdnConfig {
        source: Some(SourceSetting::Sharded(
            domains.iter().map(|d| d.to_string()).collect(),
        )),
        shard_strategy: strategy,
        include_library_param: false,
        ..CdnConfig::default()
    }
}

/// Unsigned multi-source config without a default source.
pub fn multi_source(domains: &[&str]) -> CdnConfig {
    CdnConfig {
        include_library_param: false,
        ..CdnConfig::multi(domains.iter().map(|d| (*d, None)))
    }
}

/// The `ixlib=...` pair this build appends.
pub fn ixlib() -> String {
    format!("ixlib=rust-{}", env!("CARGO_PKG_VERSION"))
}

// =========================================================================
// URL inspection
// =========================================================================

/// Query parameters of `url` as a map. Values are returned still encoded.
pub fn query_pairs(url: &str) -> BTreeMap<String, String> {
    let Some((_, query)) = url.split_once('?') else {
        return BTreeMap::new();
    };
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
