//! CDN configuration: loading, shape validation, and typed settings.
//!
//! Configuration lives in a TOML file (default `ix-srcset.toml`). Exactly one
//! of `source` (a single domain, or an array of shard domains) and `sources`
//! (a table of domain → signing token) must be present.
//!
//! ## Configuration Options
//!
//! ```toml
//! source = "assets.example.net"      # or ["a.example.net", "b.example.net"]
//! secure_url_token = "FACEBEEF"      # signs every URL of `source`
//! shard_strategy = "crc"             # crc | cycle (sharded `source` only)
//!
//! # Alternatively, several accounts with their own tokens:
//! # default_source = "a.example.net"
//! # [sources]
//! # "a.example.net" = "token-a"
//! # "b.example.net" = ""             # empty token = unsigned
//!
//! use_https = true
//! include_library_param = true
//! hostnames_to_replace = ["cdn.example.com"]
//! srcset_width_tolerance = 0.08
//! responsive_resolutions = [1, 2]
//! variable_quality = true
//! ```
//!
//! ## Two-step validation
//!
//! [`validate_configuration`] checks the raw table: key names, the
//! `source`/`sources` exclusivity, value shapes, and the shard strategy.
//! Only then is the table deserialized into [`CdnConfig`], whose
//! [`validate`](CdnConfig::validate) method enforces the remaining semantic
//! rules. Programmatically built configs go through `validate` alone.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Default config file name looked up by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "ix-srcset.toml";

/// Default width tolerance for the standard width ladder.
pub const DEFAULT_WIDTH_TOLERANCE: f64 = 0.08;

/// Every top-level key the crate understands, aliases included.
const KNOWN_KEYS: &[&str] = &[
    "source",
    "sources",
    "default_source",
    "secure_url_token",
    "use_https",
    "secure",
    "include_library_param",
    "shard_strategy",
    "hostname_to_replace",
    "hostnames_to_replace",
    "srcset_width_tolerance",
    "responsive_resolutions",
    "variable_quality",
];

/// How a sharded single source spreads paths across its domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShardStrategy {
    /// Stable: the same path always lands on the same domain.
    Crc,
    /// Round-robin over the domains, one step per URL.
    Cycle,
}

impl FromStr for ShardStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "crc" => Ok(Self::Crc),
            "cycle" => Ok(Self::Cycle),
            other => Err(Error::Configuration(format!("{other} is not supported"))),
        }
    }
}

impl fmt::Display for ShardStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crc => f.write_str("crc"),
            Self::Cycle => f.write_str("cycle"),
        }
    }
}

/// The `source` key: one domain, or a list of shard domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceSetting {
    Single(String),
    Sharded(Vec<String>),
}

impl SourceSetting {
    pub fn domains(&self) -> Vec<&str> {
        match self {
            Self::Single(domain) => vec![domain.as_str()],
            Self::Sharded(domains) => domains.iter().map(String::as_str).collect(),
        }
    }
}

/// CDN configuration.
///
/// All fields except the source selection have defaults. Unknown keys are
/// rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CdnConfig {
    /// Single-source mode: one domain or a list of shard domains.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceSetting>,
    /// Multi-source mode: domain → signing token (`""` for none).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<BTreeMap<String, String>>,
    /// Source used when a multi-source request names none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_source: Option<String>,
    /// Signing token for single-source mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_url_token: Option<String>,
    #[serde(alias = "secure")]
    pub use_https: bool,
    /// Append `ixlib=rust-<version>` to every URL.
    pub include_library_param: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_strategy: Option<ShardStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname_to_replace: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hostnames_to_replace: Vec<String>,
    /// Maximum relative over/under-fetch between neighbouring ladder widths.
    pub srcset_width_tolerance: f64,
    /// Pixel-density multipliers for resolution srcsets.
    pub responsive_resolutions: Vec<f64>,
    /// Lower `q` as variants get larger, unless the request sets `q` itself.
    pub variable_quality: bool,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            source: None,
            sources: None,
            default_source: None,
            secure_url_token: None,
            use_https: true,
            include_library_param: true,
            shard_strategy: None,
            hostname_to_replace: None,
            hostnames_to_replace: Vec::new(),
            srcset_width_tolerance: DEFAULT_WIDTH_TOLERANCE,
            responsive_resolutions: vec![1.0, 2.0],
            variable_quality: true,
        }
    }
}

impl CdnConfig {
    /// Single-source config for `domain`, everything else default.
    pub fn single(domain: impl Into<String>) -> Self {
        Self {
            source: Some(SourceSetting::Single(domain.into())),
            ..Self::default()
        }
    }

    /// Multi-source config from `(domain, token)` pairs.
    pub fn multi<I, D>(sources: I) -> Self
    where
        I: IntoIterator<Item = (D, Option<String>)>,
        D: Into<String>,
    {
        let sources = sources
            .into_iter()
            .map(|(domain, token)| (domain.into(), token.unwrap_or_default()))
            .collect();
        Self {
            sources: Some(sources),
            ..Self::default()
        }
    }

    /// Parse, shape-check, deserialize, and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        Self::from_table(table)
    }

    /// Shape-check a raw table, then deserialize and validate it.
    pub fn from_table(table: toml::Table) -> Result<Self> {
        validate_configuration(&table)?;
        let config: CdnConfig = toml::Value::Table(table).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate a typed config: source exclusivity and value ranges.
    pub fn validate(&self) -> Result<()> {
        match (&self.source, &self.sources) {
            (Some(_), Some(_)) | (None, None) => {
                return Err(Error::Configuration(
                    "exactly one of `source`, `sources` is required".into(),
                ));
            }
            (Some(source), None) => {
                let domains = source.domains();
                if domains.is_empty() {
                    return Err(Error::Configuration("source must not be empty".into()));
                }
                if domains.iter().any(|d| d.trim().is_empty()) {
                    return Err(Error::Configuration("source domains must be non-empty".into()));
                }
            }
            (None, Some(sources)) => {
                if sources.is_empty() {
                    return Err(Error::Configuration("sources must not be empty".into()));
                }
                if let Some(default) = &self.default_source
                    && !sources.contains_key(default)
                {
                    return Err(Error::Configuration(format!(
                        "default_source '{default}' is not one of the configured sources"
                    )));
                }
            }
        }
        if !(self.srcset_width_tolerance.is_finite() && self.srcset_width_tolerance > 0.0) {
            return Err(Error::Configuration(
                "srcset_width_tolerance must be greater than 0".into(),
            ));
        }
        if self.responsive_resolutions.is_empty() {
            return Err(Error::Configuration(
                "responsive_resolutions must not be empty".into(),
            ));
        }
        if self
            .responsive_resolutions
            .iter()
            .any(|m| !(m.is_finite() && *m > 0.0))
        {
            return Err(Error::Configuration(
                "responsive_resolutions values must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Every hostname configured for [`replace_hostname`](crate::registry::replace_hostname),
    /// from both the singular and plural keys.
    pub fn replaced_hostnames(&self) -> Vec<String> {
        self.hostname_to_replace
            .iter()
            .chain(self.hostnames_to_replace.iter())
            .filter(|h| !h.is_empty())
            .cloned()
            .collect()
    }
}

/// Check a raw configuration table before it is turned into a [`CdnConfig`].
///
/// Fails with [`Error::InvalidArgument`] for unrecognized keys and with
/// [`Error::Configuration`] when the source selection is missing, ambiguous,
/// or of the wrong type, or when `shard_strategy` is not `crc` or `cycle`.
pub fn validate_configuration(raw: &toml::Table) -> Result<()> {
    let unknown: Vec<&str> = raw
        .keys()
        .map(String::as_str)
        .filter(|k| !KNOWN_KEYS.contains(k))
        .collect();
    if !unknown.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "unsupported configuration key(s): {}",
            unknown.join(", ")
        )));
    }

    let source = raw.get("source");
    let sources = raw.get("sources");
    if source.is_some() == sources.is_some() {
        return Err(Error::Configuration(
            "exactly one of `source`, `sources` is required".into(),
        ));
    }

    if let Some(source) = source {
        let well_formed = match source {
            toml::Value::String(_) => true,
            toml::Value::Array(items) => items.iter().all(toml::Value::is_str),
            _ => false,
        };
        if !well_formed {
            return Err(Error::Configuration(
                "source must be a string or an array of strings".into(),
            ));
        }
    }

    if let Some(sources) = sources
        && !sources.is_table()
    {
        return Err(Error::Configuration("sources must be a table".into()));
    }

    if let Some(strategy) = raw.get("shard_strategy") {
        match strategy.as_str() {
            Some(name) => {
                name.parse::<ShardStrategy>()?;
            }
            None => {
                return Err(Error::Configuration(format!("{strategy} is not supported")));
            }
        }
    }

    Ok(())
}

/// Load and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<CdnConfig> {
    let content = fs::read_to_string(path)?;
    CdnConfig::from_toml_str(&content)
}

/// Returns a fully-commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# ix-srcset configuration
# =======================
# Exactly one of `source` or `sources` is required. Everything else is
# optional; values shown are the defaults. Unknown keys are rejected.

# ---------------------------------------------------------------------------
# Source selection
# ---------------------------------------------------------------------------
# A single CDN domain...
source = "assets.example.net"
# ...or a list of shard domains sharing one token:
# source = ["assets1.example.net", "assets2.example.net"]

# How sharded domains are picked: "crc" (stable per path) or "cycle".
# shard_strategy = "crc"

# Signing token for `source`. URLs get an `s=` signature when set.
# secure_url_token = "FACEBEEF"

# Several accounts, each with its own token ("" = unsigned). Replaces
# `source`; requests pick one by domain or fall back to `default_source`.
# default_source = "a.example.net"
# [sources]
# "a.example.net" = "token-a"
# "b.example.net" = ""

# ---------------------------------------------------------------------------
# URL shape
# ---------------------------------------------------------------------------
use_https = true

# Append ixlib=rust-<version> to every URL.
include_library_param = true

# Fully-qualified paths on these hosts are rehomed onto the CDN by path.
# hostname_to_replace = "cdn.example.com"
# hostnames_to_replace = ["cdn.example.com", "static.example.com"]

# ---------------------------------------------------------------------------
# Responsive sets
# ---------------------------------------------------------------------------
# Maximum relative difference between neighbouring srcset widths.
srcset_width_tolerance = 0.08

# Pixel-density multipliers for resolution (1x, 2x, ...) srcsets.
responsive_resolutions = [1, 2]

# Lower the `q` parameter as variants grow, unless a request sets `q`.
variable_quality = true
"##
}
