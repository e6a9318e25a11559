//! Endpoint registry: which CDN domain and signing token serve a request.
//!
//! A registry is built from a validated [`CdnConfig`] and is in exactly one
//! of two modes:
//!
//! - **Single source**: one domain (or a list of shard domains) sharing the
//!   top-level `secure_url_token`. Every request resolves to it, whatever
//!   source id it names.
//! - **Multi source**: a map of domain → token. Requests name a domain, or
//!   fall back to `default_source`; anything else is an
//!   [`Error::UnknownSource`].
//!
//! Rebuilding from a new config replaces the whole registry; nothing is
//! merged with the previous state.

use crate::config::{CdnConfig, ShardStrategy, SourceSetting};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// One CDN domain plus its optional signing token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    domain: String,
    signing_token: Option<String>,
}

impl SourceConfig {
    /// Empty tokens are treated as absent.
    pub fn new(domain: impl Into<String>, signing_token: Option<String>) -> Self {
        Self {
            domain: domain.into(),
            signing_token: signing_token.filter(|t| !t.is_empty()),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn signing_token(&self) -> Option<&str> {
        self.signing_token.as_deref()
    }
}

#[derive(Debug)]
enum Mode {
    Single {
        shards: Vec<SourceConfig>,
        strategy: Option<ShardStrategy>,
        cursor: AtomicUsize,
    },
    Multi {
        sources: BTreeMap<String, SourceConfig>,
        default_source: Option<String>,
    },
}

#[derive(Debug)]
pub struct EndpointRegistry {
    mode: Mode,
}

impl EndpointRegistry {
    /// Build the registry for `config`.
    ///
    /// Fails with [`Error::Configuration`] when the config does not select
    /// exactly one mode or names an unknown `default_source`.
    pub fn from_config(config: &CdnConfig) -> Result<Self> {
        let mode = match (&config.source, &config.sources) {
            (Some(source), None) => {
                let token = config.secure_url_token.clone();
                let shards: Vec<SourceConfig> = match source {
                    SourceSetting::Single(domain) => vec![SourceConfig::new(domain, token)],
                    SourceSetting::Sharded(domains) => domains
                        .iter()
                        .map(|d| SourceConfig::new(d, token.clone()))
                        .collect(),
                };
                if shards.is_empty() {
                    return Err(Error::Configuration("source must not be empty".into()));
                }
                Mode::Single {
                    shards,
                    strategy: config.shard_strategy,
                    cursor: AtomicUsize::new(0),
                }
            }
            (None, Some(sources)) => {
                let sources: BTreeMap<String, SourceConfig> = sources
                    .iter()
                    .map(|(domain, token)| {
                        (domain.clone(), SourceConfig::new(domain, Some(token.clone())))
                    })
                    .collect();
                if let Some(default) = &config.default_source
                    && !sources.contains_key(default)
                {
                    return Err(Error::Configuration(format!(
                        "default_source '{default}' is not one of the configured sources"
                    )));
                }
                Mode::Multi {
                    sources,
                    default_source: config.default_source.clone(),
                }
            }
            _ => {
                return Err(Error::Configuration(
                    "exactly one of `source`, `sources` is required".into(),
                ));
            }
        };
        Ok(Self { mode })
    }

    pub fn is_multi_source(&self) -> bool {
        matches!(self.mode, Mode::Multi { .. })
    }

    /// Resolve the source for a request.
    ///
    /// Single-source mode ignores `source_id` and returns the primary domain.
    /// Multi-source mode looks `source_id` up, or `default_source` when it is
    /// `None`.
    pub fn resolve(&self, source_id: Option<&str>) -> Result<&SourceConfig> {
        match &self.mode {
            Mode::Single { shards, .. } => Ok(&shards[0]),
            Mode::Multi {
                sources,
                default_source,
            } => {
                let id = source_id
                    .or(default_source.as_deref())
                    .ok_or(Error::UnknownSource(None))?;
                let resolved = sources
                    .get(id)
                    .ok_or_else(|| Error::UnknownSource(Some(id.to_string())))?;
                debug!(source = id, "resolved source");
                Ok(resolved)
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but spreads a sharded single source
    /// across its domains according to the shard strategy.
    pub fn resolve_for_path(&self, source_id: Option<&str>, path: &str) -> Result<&SourceConfig> {
        let Mode::Single {
            shards,
            strategy,
            cursor,
        } = &self.mode
        else {
            return self.resolve(source_id);
        };
        let index = match strategy {
            _ if shards.len() == 1 => 0,
            Some(ShardStrategy::Crc) => crc_shard(path, shards.len()),
            Some(ShardStrategy::Cycle) => cursor.fetch_add(1, Ordering::Relaxed) % shards.len(),
            None => 0,
        };
        Ok(&shards[index])
    }
}

fn crc_shard(path: &str, shard_count: usize) -> usize {
    crc32fast::hash(path.as_bytes()) as usize % shard_count
}

/// Rehome a fully-qualified URL on one of `hostnames` to a bare path.
///
/// `https://cdn.example.com/image.jpg` becomes `/image.jpg` when
/// `cdn.example.com` is listed. The host must sit at the very start of the
/// path (optionally behind `http://`, `https://` or `//`) and be followed by
/// a non-empty `/`-rooted remainder; any other path is returned unchanged.
pub fn replace_hostname<'a>(path: &'a str, hostnames: &[String]) -> &'a str {
    let after_scheme = ["https://", "http://", "//"]
        .iter()
        .find_map(|scheme| path.strip_prefix(scheme))
        .unwrap_or(path);

    for hostname in hostnames {
        if let Some(rest) = after_scheme.strip_prefix(hostname.as_str())
            && rest.len() > 1
            && rest.starts_with('/')
        {
            debug!(%hostname, "replaced hostname");
            return rest;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    // =========================================================================
    // SourceConfig
    // =========================================================================

    #[test]
    fn empty_token_is_no_token() {
        let source = SourceConfig::new("a.com", Some(String::new()));
        assert_eq!(source.signing_token(), None);
    }

    // =========================================================================
    // Single-source mode
    // =========================================================================

    #[test]
    fn single_source_resolves_any_id_to_the_domain() {
        let registry = EndpointRegistry::from_config(&single_source("assets.example.net")).unwrap();
        assert!(!registry.is_multi_source());
        for id in [None, Some("assets.example.net"), Some("other.com")] {
            assert_eq!(registry.resolve(id).unwrap().domain(), "assets.example.net");
        }
    }

    #[test]
    fn single_source_carries_top_level_token() {
        let mut config = single_source("assets.example.net");
        config.secure_url_token = Some("FACEBEEF".into());
        let registry = EndpointRegistry::from_config(&config).unwrap();
        assert_eq!(registry.resolve(None).unwrap().signing_token(), Some("FACEBEEF"));
    }

    #[test]
    fn crc_sharding_is_stable_per_path() {
        let config = sharded_source(&["a.com", "b.com", "c.com"], Some(ShardStrategy::Crc));
        let registry = EndpointRegistry::from_config(&config).unwrap();
        let first = registry.resolve_for_path(None, "/cat.jpg").unwrap().domain().to_string();
        for _ in 0..5 {
            assert_eq!(registry.resolve_for_path(None, "/cat.jpg").unwrap().domain(), first);
        }
        let expected = ["a.com", "b.com", "c.com"][crc32fast::hash(b"/cat.jpg") as usize % 3];
        assert_eq!(first, expected);
    }

    #[test]
    fn cycle_sharding_rotates_through_domains() {
        let config = sharded_source(&["a.com", "b.com"], Some(ShardStrategy::Cycle));
        let registry = EndpointRegistry::from_config(&config).unwrap();
        let picked: Vec<String> = (0..4)
            .map(|_| registry.resolve_for_path(None, "/x.jpg").unwrap().domain().to_string())
            .collect();
        assert_eq!(picked, vec!["a.com", "b.com", "a.com", "b.com"]);
    }

    #[test]
    fn sharded_without_strategy_uses_primary() {
        let config = sharded_source(&["a.com", "b.com"], None);
        let registry = EndpointRegistry::from_config(&config).unwrap();
        assert_eq!(registry.resolve_for_path(None, "/x.jpg").unwrap().domain(), "a.com");
    }

    // =========================================================================
    // Multi-source mode
    // =========================================================================

    #[test]
    fn multi_source_without_default_fails_when_id_omitted() {
        let registry = EndpointRegistry::from_config(&multi_source(&["a.com", "b.com"])).unwrap();
        assert!(matches!(registry.resolve(None), Err(Error::UnknownSource(None))));
    }

    #[test]
    fn multi_source_resolves_named_source() {
        let registry = EndpointRegistry::from_config(&multi_source(&["a.com", "b.com"])).unwrap();
        assert_eq!(registry.resolve(Some("b.com")).unwrap().domain(), "b.com");
    }

    #[test]
    fn multi_source_unknown_id_fails() {
        let registry = EndpointRegistry::from_config(&multi_source(&["a.com", "b.com"])).unwrap();
        let err = registry.resolve(Some("c.com")).unwrap_err();
        assert!(matches!(err, Error::UnknownSource(Some(ref id)) if id == "c.com"));
    }

    #[test]
    fn multi_source_uses_default_when_id_omitted() {
        let mut config = multi_source(&["a.com", "b.com"]);
        config.default_source = Some("a.com".into());
        let registry = EndpointRegistry::from_config(&config).unwrap();
        assert_eq!(registry.resolve(None).unwrap().domain(), "a.com");
        assert_eq!(registry.resolve_for_path(None, "/x.jpg").unwrap().domain(), "a.com");
    }

    #[test]
    fn multi_source_tokens_are_per_domain() {
        let config = CdnConfig::multi([("a.com", Some("ta".to_string())), ("b.com", None)]);
        let registry = EndpointRegistry::from_config(&config).unwrap();
        assert_eq!(registry.resolve(Some("a.com")).unwrap().signing_token(), Some("ta"));
        assert_eq!(registry.resolve(Some("b.com")).unwrap().signing_token(), None);
    }

    #[test]
    fn neither_mode_is_configuration_error() {
        let err = EndpointRegistry::from_config(&CdnConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    // =========================================================================
    // replace_hostname
    // =========================================================================

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strips_matching_hostname() {
        let path = "https://cdn.example.com/image.jpg";
        assert_eq!(replace_hostname(path, &hosts(&["cdn.example.com"])), "/image.jpg");
    }

    #[test]
    fn different_hostname_leaves_path_unchanged() {
        let path = "https://cdn.example.com/image.jpg";
        assert_eq!(replace_hostname(path, &hosts(&["other.example.com"])), path);
    }

    #[test]
    fn any_of_several_hostnames_matches() {
        let path = "http://static.example.com/a/b.png";
        let names = hosts(&["cdn.example.com", "static.example.com"]);
        assert_eq!(replace_hostname(path, &names), "/a/b.png");
    }

    #[test]
    fn protocol_relative_and_bare_hosts_are_stripped() {
        let names = hosts(&["cdn.example.com"]);
        assert_eq!(replace_hostname("//cdn.example.com/x.jpg", &names), "/x.jpg");
        assert_eq!(replace_hostname("cdn.example.com/x.jpg", &names), "/x.jpg");
    }

    #[test]
    fn hostname_without_remainder_is_not_stripped() {
        let names = hosts(&["cdn.example.com"]);
        assert_eq!(replace_hostname("https://cdn.example.com", &names), "https://cdn.example.com");
        assert_eq!(replace_hostname("https://cdn.example.com/", &names), "https://cdn.example.com/");
    }

    #[test]
    fn unanchored_hostname_is_not_stripped() {
        let names = hosts(&["cdn.example.com"]);
        let proxied = "https://other.net/cdn.example.com/x.jpg";
        assert_eq!(replace_hostname(proxied, &names), proxied);
        let lookalike = "https://cdn.example.com.evil.net/x.jpg";
        assert_eq!(replace_hostname(lookalike, &names), lookalike);
    }

    #[test]
    fn relative_paths_pass_through() {
        assert_eq!(replace_hostname("/image.jpg", &hosts(&["cdn.example.com"])), "/image.jpg");
        assert_eq!(replace_hostname("/image.jpg", &[]), "/image.jpg");
    }
}
