//! Pure calculation functions for responsive width sets.
//!
//! All functions here are pure and testable without any configuration or
//! caching in place.

/// Narrowest width of the standard ladder.
pub const MIN_WIDTH: u32 = 100;

/// Widest width of the standard ladder.
pub const MAX_WIDTH: u32 = 8192;

/// Slack absorbed when flooring a product such as `6100 × 1.16` that is
/// mathematically even but lands a hair below it in `f64`.
const ROUNDING_SLACK: f64 = 1e-9;

/// Compute the standard width ladder for a tolerance.
///
/// Starts at [`MIN_WIDTH`]; each step multiplies the previous width by
/// `1 + 2 × tolerance` and takes the largest even integer not above the
/// product, advancing by at least 2px. [`MAX_WIDTH`] always closes the
/// ladder.
///
/// For any tolerance ≥ 0.01 every element is even, the sequence is strictly
/// increasing, and neighbouring widths differ by a factor of at most
/// `1 + 2 × tolerance`. The loop is bounded by [`MAX_WIDTH`], so tiny
/// tolerances still terminate.
///
/// # Examples
/// ```
/// # use ix_srcset::widths::standard_widths;
/// let ladder = standard_widths(0.08);
/// assert_eq!(&ladder[..5], &[100, 116, 134, 154, 178]);
/// assert_eq!(ladder.last(), Some(&8192));
/// ```
pub fn standard_widths(tolerance: f64) -> Vec<u32> {
    let factor = 1.0 + 2.0 * tolerance;
    let mut widths = vec![MIN_WIDTH];
    let mut prev = MIN_WIDTH;

    loop {
        let product = prev as f64 * factor;
        if product >= MAX_WIDTH as f64 {
            break;
        }
        let next = floor_to_even(product).max(prev + 2);
        if next >= MAX_WIDTH {
            break;
        }
        widths.push(next);
        prev = next;
    }

    widths.push(MAX_WIDTH);
    widths
}

fn floor_to_even(value: f64) -> u32 {
    ((value / 2.0 + ROUNDING_SLACK).floor() as u32) * 2
}

/// Keep the ladder entries inside `[min, max]`, substituting
/// [`MIN_WIDTH`]/[`MAX_WIDTH`] for absent bounds. Inverted bounds yield an
/// empty set.
pub fn filter_to_bounds(ladder: &[u32], min: Option<u32>, max: Option<u32>) -> Vec<u32> {
    let min = min.unwrap_or(MIN_WIDTH);
    let max = max.unwrap_or(MAX_WIDTH);
    ladder
        .iter()
        .copied()
        .filter(|w| (min..=max).contains(w))
        .collect()
}

/// Add the exact 1×, 2× and 3× multiples of `base_width`, then sort and
/// deduplicate.
pub fn with_pixel_ratios(mut widths: Vec<u32>, base_width: Option<u32>) -> Vec<u32> {
    if let Some(base) = base_width.filter(|&b| b > 0) {
        widths.extend([1, 2, 3].map(|ratio| base.saturating_mul(ratio)));
    }
    widths.sort_unstable();
    widths.dedup();
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // standard_widths tests
    // =========================================================================

    #[test]
    fn default_ladder_matches_known_values() {
        assert_eq!(
            standard_widths(0.08),
            vec![
                100, 116, 134, 154, 178, 206, 238, 276, 320, 370, 428, 496, 574, 664, 770, 892,
                1034, 1198, 1388, 1610, 1866, 2164, 2510, 2910, 3374, 3912, 4536, 5260, 6100,
                7076, 8192,
            ]
        );
    }

    #[test]
    fn ladder_starts_at_floor_and_ends_at_ceiling() {
        for tolerance in [0.01, 0.05, 0.08, 0.2, 1.0] {
            let ladder = standard_widths(tolerance);
            assert_eq!(ladder.first(), Some(&MIN_WIDTH));
            assert_eq!(ladder.last(), Some(&MAX_WIDTH));
        }
    }

    #[test]
    fn wider_tolerance_gives_fewer_widths() {
        assert!(standard_widths(0.2).len() < standard_widths(0.08).len());
        assert!(standard_widths(0.08).len() < standard_widths(0.02).len());
    }

    #[test]
    fn huge_tolerance_collapses_to_floor_and_ceiling() {
        assert_eq!(standard_widths(100.0), vec![MIN_WIDTH, MAX_WIDTH]);
    }

    #[test]
    fn astronomical_tolerance_does_not_overflow() {
        assert_eq!(standard_widths(1e8), vec![MIN_WIDTH, MAX_WIDTH]);
        assert_eq!(standard_widths(f64::MAX / 4.0), vec![MIN_WIDTH, MAX_WIDTH]);
    }

    #[test]
    fn tiny_tolerance_terminates_with_two_pixel_steps() {
        let ladder = standard_widths(1e-9);
        assert_eq!(ladder[1], 102);
        assert_eq!(ladder.last(), Some(&MAX_WIDTH));
        assert!(ladder.windows(2).all(|w| w[0] < w[1]));
    }

    // =========================================================================
    // filter_to_bounds tests
    // =========================================================================

    #[test]
    fn filter_max_at_floor_yields_single_width() {
        let ladder = standard_widths(0.08);
        assert_eq!(filter_to_bounds(&ladder, None, Some(100)), vec![100]);
    }

    #[test]
    fn filter_keeps_inclusive_range() {
        let ladder = standard_widths(0.08);
        assert_eq!(
            filter_to_bounds(&ladder, Some(320), Some(664)),
            vec![320, 370, 428, 496, 574, 664]
        );
    }

    #[test]
    fn filter_without_bounds_keeps_everything() {
        let ladder = standard_widths(0.08);
        assert_eq!(filter_to_bounds(&ladder, None, None), ladder);
    }

    #[test]
    fn filter_inverted_bounds_is_empty() {
        let ladder = standard_widths(0.08);
        assert!(filter_to_bounds(&ladder, Some(1000), Some(500)).is_empty());
    }

    // =========================================================================
    // with_pixel_ratios tests
    // =========================================================================

    #[test]
    fn pixel_ratios_are_appended_sorted() {
        assert_eq!(
            with_pixel_ratios(vec![100, 500, 1000], Some(300)),
            vec![100, 300, 500, 600, 900, 1000]
        );
    }

    #[test]
    fn pixel_ratios_deduplicate_existing_widths() {
        assert_eq!(with_pixel_ratios(vec![320, 640], Some(320)), vec![320, 640, 960]);
    }

    #[test]
    fn no_base_width_only_sorts() {
        assert_eq!(with_pixel_ratios(vec![300, 100, 300], None), vec![100, 300]);
    }
}
