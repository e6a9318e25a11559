//! Per-variant parameter sets for responsive images.
//!
//! Expands a width set (or a list of pixel-density multipliers) into one
//! [`Params`] map per variant, plus the `srcset` label that goes with it.
//! No URLs are built here; see [`assemble`](crate::assemble).
//!
//! ## Width variants
//!
//! Each width `w` sets `w=<w>`. With a known base aspect ratio the height is
//! scaled along: `h = round(w × height / width)`, computed in `f64` and
//! rounded half away from zero (`f64::round`).
//!
//! ## Resolution variants
//!
//! Each multiplier `m` other than 1 sets `dpr=<m>`; the 1× variant carries
//! no `dpr` at all.
//!
//! ## Variable quality
//!
//! Larger variants tolerate more compression. When enabled and the caller
//! did not pick a `q` of its own, a tier-based `q` is attached. The smallest
//! tier attaches nothing, leaving the CDN's default quality (75) in effect.
//!
//! | Width tier | DPR tier | `q` |
//! |---|---|---|
//! | ≤ 1280 | 1× | (default) |
//! | ≤ 2560 | ≤ 2× | 50 |
//! | ≤ 3840 | ≤ 3× | 35 |
//! | ≤ 5120 | ≤ 4× | 23 |
//! | larger | larger | 20 |

use crate::types::Params;
use crate::widths::BaseDimensions;

/// Quality tiers by variant width: `(max width, q)`.
const WIDTH_QUALITY_TIERS: &[(u32, u32)] = &[(2560, 50), (3840, 35), (5120, 23)];

/// Width up to which the CDN's default quality is kept.
const DEFAULT_QUALITY_MAX_WIDTH: u32 = 1280;

/// Quality tiers by pixel density: `(max multiplier, q)`.
const DPR_QUALITY_TIERS: &[(f64, u32)] = &[(2.0, 50), (3.0, 35), (4.0, 23)];

/// `q` for the largest tier, in both modes.
const MIN_VARIABLE_QUALITY: u32 = 20;

/// One variant before URL assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantPlan {
    pub params: Params,
    pub label: String,
}

/// Height preserving `base`'s aspect ratio at `width`, if it has one:
/// `round(width × h / w)`, multiplied before dividing so exact halves round up.
pub fn scaled_height(width: u32, base: &BaseDimensions) -> Option<u32> {
    match (base.width, base.height) {
        (Some(w), Some(h)) if w > 0 => {
            Some((width as f64 * h as f64 / w as f64).round() as u32)
        }
        _ => None,
    }
}

/// Tier quality for a width variant; `None` keeps the CDN default.
pub fn width_quality(width: u32) -> Option<u32> {
    if width <= DEFAULT_QUALITY_MAX_WIDTH {
        return None;
    }
    let q = WIDTH_QUALITY_TIERS
        .iter()
        .find(|(max, _)| width <= *max)
        .map_or(MIN_VARIABLE_QUALITY, |(_, q)| *q);
    Some(q)
}

/// Tier quality for a resolution variant; `None` keeps the CDN default.
pub fn dpr_quality(multiplier: f64) -> Option<u32> {
    if multiplier <= 1.0 {
        return None;
    }
    let q = DPR_QUALITY_TIERS
        .iter()
        .find(|(max, _)| multiplier <= *max)
        .map_or(MIN_VARIABLE_QUALITY, |(_, q)| *q);
    Some(q)
}

/// Format a multiplier the way it appears in `dpr=` and `x` labels:
/// `2.0` → `"2"`, `1.5` → `"1.5"`.
pub fn format_multiplier(multiplier: f64) -> String {
    multiplier.to_string()
}

fn is_unit(multiplier: f64) -> bool {
    (multiplier - 1.0).abs() < f64::EPSILON
}

/// Parameter sets for a width srcset, one per width, in order.
pub fn width_variants(
    widths: &[u32],
    base: &BaseDimensions,
    params: &Params,
    variable_quality: bool,
) -> Vec<VariantPlan> {
    let caller_quality = params.contains_key("q");
    widths
        .iter()
        .map(|&w| {
            let mut variant = params.clone();
            variant.insert("w".into(), w.to_string());
            if let Some(h) = scaled_height(w, base) {
                variant.insert("h".into(), h.to_string());
            }
            if variable_quality
                && !caller_quality
                && let Some(q) = width_quality(w)
            {
                variant.insert("q".into(), q.to_string());
            }
            VariantPlan {
                params: variant,
                label: format!("{w}w"),
            }
        })
        .collect()
}

/// Parameter sets for a resolution srcset, one per multiplier, in order.
pub fn resolution_variants(
    multipliers: &[f64],
    params: &Params,
    variable_quality: bool,
) -> Vec<VariantPlan> {
    let caller_quality = params.contains_key("q");
    multipliers
        .iter()
        .map(|&m| {
            let mut variant = params.clone();
            let label = format_multiplier(m);
            if is_unit(m) {
                variant.remove("dpr");
            } else {
                variant.insert("dpr".into(), label.clone());
                if variable_quality
                    && !caller_quality
                    && let Some(q) = dpr_quality(m)
                {
                    variant.insert("q".into(), q.to_string());
                }
            }
            VariantPlan {
                params: variant,
                label: format!("{label}x"),
            }
        })
        .collect()
}
