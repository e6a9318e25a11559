//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## srcset / dpr-srcset
//!
//! ```text
//! https://assets.example.net/cat.jpg?w=100 100w,
//! https://assets.example.net/cat.jpg?w=116 116w
//! ```
//!
//! One candidate per line, comma-terminated except for the last, so the
//! block can be pasted into a `srcset` attribute as is. `--json` prints the
//! descriptors as a JSON array instead.
//!
//! ## check
//!
//! ```text
//! Sources (multi)
//!     a.example.net (signed) [default]
//!     b.example.net
//! Hostnames replaced
//!     cdn.example.com
//! Width tolerance: 0.08 (31 standard widths)
//! Resolutions: 1x, 2x
//! ```

use crate::config::{CdnConfig, SourceSetting};
use crate::types::VariantDescriptor;
use crate::variants::format_multiplier;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// srcset
// ============================================================================

/// One descriptor per line, comma-separated.
pub fn format_srcset(variants: &[VariantDescriptor]) -> Vec<String> {
    let last = variants.len().saturating_sub(1);
    variants
        .iter()
        .enumerate()
        .map(|(i, d)| {
            if i == last {
                d.to_string()
            } else {
                format!("{d},")
            }
        })
        .collect()
}

/// Descriptors as a pretty-printed JSON array.
pub fn format_srcset_json(variants: &[VariantDescriptor]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(variants)
}

pub fn print_srcset(variants: &[VariantDescriptor]) {
    for line in format_srcset(variants) {
        println!("{}", line);
    }
}

// ============================================================================
// ladder
// ============================================================================

/// The standard widths, ten per line.
pub fn format_ladder(tolerance: f64, widths: &[u32]) -> Vec<String> {
    let mut lines = vec![format!(
        "Tolerance {} ({} widths)",
        tolerance,
        widths.len()
    )];
    for chunk in widths.chunks(10) {
        let row: Vec<String> = chunk.iter().map(u32::to_string).collect();
        lines.push(format!("{}{}", indent(1), row.join(" ")));
    }
    lines
}

pub fn print_ladder(tolerance: f64, widths: &[u32]) {
    for line in format_ladder(tolerance, widths) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Summary of a validated configuration.
pub fn format_check(config: &CdnConfig, ladder_len: usize) -> Vec<String> {
    let mut lines = Vec::new();

    match (&config.source, &config.sources) {
        (Some(source), _) => {
            let signed = if config.secure_url_token.is_some() {
                " (signed)"
            } else {
                ""
            };
            match source {
                SourceSetting::Single(domain) => {
                    lines.push("Source (single)".to_string());
                    lines.push(format!("{}{}{}", indent(1), domain, signed));
                }
                SourceSetting::Sharded(domains) => {
                    let strategy = config
                        .shard_strategy
                        .map_or("primary only".to_string(), |s| s.to_string());
                    lines.push(format!("Source (sharded, {})", strategy));
                    for domain in domains {
                        lines.push(format!("{}{}{}", indent(1), domain, signed));
                    }
                }
            }
        }
        (None, Some(sources)) => {
            lines.push("Sources (multi)".to_string());
            for (domain, token) in sources {
                let signed = if token.is_empty() { "" } else { " (signed)" };
                let default = if config.default_source.as_deref() == Some(domain.as_str()) {
                    " [default]"
                } else {
                    ""
                };
                lines.push(format!("{}{}{}{}", indent(1), domain, signed, default));
            }
        }
        (None, None) => lines.push("No source configured".to_string()),
    }

    let hostnames = config.replaced_hostnames();
    if !hostnames.is_empty() {
        lines.push("Hostnames replaced".to_string());
        for hostname in hostnames {
            lines.push(format!("{}{}", indent(1), hostname));
        }
    }

    lines.push(format!(
        "Width tolerance: {} ({} standard widths)",
        config.srcset_width_tolerance, ladder_len
    ));
    let resolutions: Vec<String> = config
        .responsive_resolutions
        .iter()
        .map(|m| format!("{}x", format_multiplier(*m)))
        .collect();
    lines.push(format!("Resolutions: {}", resolutions.join(", ")));
    lines
}

pub fn print_check(config: &CdnConfig, ladder_len: usize) {
    for line in format_check(config, ladder_len) {
        println!("{}", line);
    }
}
