//! Switcher grid sizing.

/// Width of one switcher tile in points.
pub const TILE_WIDTH: f64 = 160.0;
/// Horizontal padding around the grid.
pub const PANEL_PADDING: f64 = 32.0;
/// Largest share of the screen width the panel may take.
pub const MAX_SCREEN_FRACTION: f64 = 0.9;

/// Most columns that fit on a screen `screen_width` points wide. At least 1.
pub fn max_columns(screen_width: f64) -> usize {
    let fit = ((MAX_SCREEN_FRACTION * screen_width - PANEL_PADDING) / TILE_WIDTH).floor();
    // NaN and negatives land on 1.
    fit.max(1.0) as usize
}

/// Columns for a session of `count` entries.
///
/// Uses the screen width when it is known, else the configured hint; never
/// more columns than entries and never fewer than one.
pub fn columns_for(screen_width: Option<f64>, hint: usize, count: usize) -> usize {
    let max = screen_width.map_or(hint.max(1), max_columns);
    max.min(count).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_screen_fits_many() {
        // 0.9 * 1440 - 32 = 1264; 1264 / 160 = 7.9
        assert_eq!(max_columns(1440.0), 7);
        assert_eq!(columns_for(Some(1440.0), 4, 20), 7);
    }

    #[test]
    fn few_windows_limit_columns() {
        assert_eq!(columns_for(Some(1440.0), 4, 3), 3);
        assert_eq!(columns_for(None, 4, 2), 2);
    }

    #[test]
    fn unknown_width_uses_hint() {
        assert_eq!(columns_for(None, 4, 10), 4);
        assert_eq!(columns_for(None, 0, 10), 1);
    }

    #[test]
    fn tiny_or_bogus_screens_get_one_column() {
        assert_eq!(max_columns(100.0), 1);
        assert_eq!(max_columns(-5.0), 1);
        assert_eq!(max_columns(f64::NAN), 1);
        assert_eq!(columns_for(Some(100.0), 4, 0), 1);
    }
}
