use super::bounds::{BaseDimensions, Tolerance, WidthBounds};
use super::cache::LadderCache;
use super::ladder::{filter_to_bounds, with_pixel_ratios};
use crate::error::Result;
use std::sync::Arc;
use tracing::warn;

/// Computes the widths to request for a `w`-descriptor srcset.
///
/// Owns (or shares, via [`with_cache`](Self::with_cache)) the ladder cache,
/// so repeated requests at the same tolerance reuse one ladder.
#[derive(Debug, Clone, Default)]
pub struct WidthSetGenerator {
    ladders: Arc<LadderCache>,
}

impl WidthSetGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(ladders: Arc<LadderCache>) -> Self {
        Self { ladders }
    }

    pub fn cache(&self) -> &LadderCache {
        &self.ladders
    }

    /// The full standard ladder for `tolerance`.
    pub fn standard_widths(&self, tolerance: Tolerance) -> Arc<[u32]> {
        self.ladders.get(tolerance)
    }

    /// Widths for one request.
    ///
    /// Explicit widths win and are returned verbatim. Otherwise the ladder
    /// for the request's tolerance (or `default_tolerance`) is filtered to
    /// the bounds and the base width's 1×/2×/3× multiples are merged in.
    /// Inverted bounds produce an empty set.
    pub fn generate(
        &self,
        bounds: &WidthBounds,
        base: &BaseDimensions,
        default_tolerance: Tolerance,
    ) -> Result<Vec<u32>> {
        if let Some(widths) = &bounds.widths {
            return Ok(widths.clone());
        }
        let tolerance = bounds.tolerance_or(default_tolerance)?;
        if bounds.is_inverted() {
            warn!(
                min_width = bounds.min_width,
                max_width = bounds.max_width,
                "min_width exceeds max_width; no widths generated"
            );
            return Ok(Vec::new());
        }

        let ladder = self.standard_widths(tolerance);
        let filtered = filter_to_bounds(&ladder, bounds.min_width, bounds.max_width);
        Ok(with_pixel_ratios(filtered, base.width))
    }
}
