//! # ix-srcset
//!
//! Ready-to-use URLs for an imgix-style image CDN: single URLs, responsive
//! width sets (`srcset` with `w` descriptors) and resolution sets (`x`
//! descriptors), signed when the source carries a token.
//!
//! ```
//! use ix_srcset::{BaseDimensions, CdnConfig, ImageRequest, ImageUrls, WidthBounds};
//!
//! let urls = ImageUrls::new(CdnConfig::single("assets.example.net"))?;
//! let request = ImageRequest::new("/photos/cat.jpg").param("fit", "crop");
//!
//! let src = urls.build_url(&request)?;
//! assert!(src.starts_with("https://assets.example.net/photos/cat.jpg?fit=crop"));
//!
//! let srcset = urls.build_width_srcset(
//!     &request,
//!     &WidthBounds::between(300, 1200),
//!     &BaseDimensions::default(),
//! )?;
//! assert_eq!(srcset.first().map(|d| d.label.as_str()), Some("320w"));
//! # Ok::<(), ix_srcset::Error>(())
//! ```
//!
//! # Pipeline
//!
//! ```text
//! config ──validate──▶ EndpointRegistry ─┐
//!                                        ▼
//! request ─▶ WidthSetGenerator ─▶ variants ─▶ assemble ─▶ [(url, label)]
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | TOML loading, raw-shape validation, typed [`CdnConfig`] |
//! | [`registry`] | Source resolution, shard selection, hostname replacement |
//! | [`widths`] | Standard width ladder, bounds filtering, ladder cache |
//! | [`variants`] | Per-variant params: width, scaled height, `dpr`, quality tiers |
//! | [`assemble`] | URL assembly, path/query encoding, signing, `srcset` joining |
//! | [`client`] | [`ImageUrls`], the public operations over a configuration |
//! | [`compat`] | Positional-argument call shapes mapped onto [`ImageRequest`] |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## A Fixed Width Ladder
//!
//! Widths are not derived from each page's layout. Every request picks from
//! one geometric ladder (100px to 8192px, steps of `1 + 2 × tolerance`), so
//! the CDN caches a small, shared set of variants while no browser is ever
//! more than `tolerance` away from the width it wants. Bounds filter the
//! ladder; they never shift it.
//!
//! ## Snapshots Over Locks
//!
//! [`ImageUrls`] keeps configuration and registry together in one `Arc`
//! snapshot. Reconfiguring swaps the `Arc`; every request reads one snapshot
//! from start to finish, so it never sees half of an update.

pub mod assemble;
pub mod client;
pub mod compat;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod registry;
pub mod types;
pub mod variants;
pub mod widths;

pub use client::{ImageRequest, ImageUrls};
pub use config::{CdnConfig, ShardStrategy, SourceSetting, validate_configuration};
pub use error::{Error, Result};
pub use registry::{EndpointRegistry, SourceConfig};
pub use types::{Params, VariantDescriptor};
pub use widths::{BaseDimensions, Tolerance, WidthBounds, WidthSetGenerator};

#[cfg(test)]
pub(crate) mod test_helpers;
