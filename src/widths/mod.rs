//! Responsive width sets.
//!
//! The module is split into:
//! - **Ladder**: pure functions computing and filtering the standard widths
//! - **Bounds**: request-side parameter types ([`WidthBounds`], [`BaseDimensions`], [`Tolerance`])
//! - **Cache**: [`LadderCache`], one memoized ladder per tolerance
//! - **Generator**: [`WidthSetGenerator`], combining the three for a request

mod bounds;
mod cache;
mod generator;
mod ladder;

pub use bounds::{BaseDimensions, Tolerance, WidthBounds};
pub use cache::LadderCache;
pub use generator::WidthSetGenerator;
pub use ladder::{MAX_WIDTH, MIN_WIDTH, filter_to_bounds, standard_widths, with_pixel_ratios};
