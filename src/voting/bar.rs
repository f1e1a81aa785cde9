const BAR_WIDTH: usize = 15;

/// Draws `value` out of `max` as a fixed-width bar, e.g. `[=====----------]`.
///
/// A zero `max` draws an empty bar.
pub fn draw_bar(value: u32, max: u32) -> String {
    let filled = if max == 0 {
        0
    } else {
        let units = (f64::from(value) * BAR_WIDTH as f64 / f64::from(max)).round() as usize;
        units.min(BAR_WIDTH)
    };

    format!("[{}{}]", "=".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner(bar: &str) -> &str {
        &bar[1..bar.len() - 1]
    }

    #[test]
    fn test_empty_max_draws_empty_bar() {
        assert_eq!(draw_bar(0, 0), "[---------------]");
    }

    #[test]
    fn test_full_share_draws_full_bar() {
        for max in [1, 2, 7, 15, 1000] {
            assert_eq!(draw_bar(max, max), "[===============]");
        }
    }

    #[test]
    fn test_half_share_rounds_up() {
        // 7.5 units
        assert_eq!(draw_bar(1, 2), "[========-------]");
    }

    #[test]
    fn test_width_is_always_fifteen() {
        for max in 0..20 {
            for value in 0..=max {
                let bar = draw_bar(value, max);
                assert!(bar.starts_with('[') && bar.ends_with(']'));
                assert_eq!(inner(&bar).len(), BAR_WIDTH, "value={value} max={max}");
            }
        }
    }

    #[test]
    fn test_value_above_max_is_clamped() {
        assert_eq!(draw_bar(5, 2), "[===============]");
    }
}
