//! Pure calculation functions for upload dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the dimensions an image is scaled to before upload.
///
/// The longer edge is capped at `max_edge` and the aspect ratio preserved.
/// Images already within the limit are returned unchanged (never upscaled).
/// Neither edge rounds down to zero.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `max_edge` - Maximum length of the longer edge in pixels
///
/// # Returns
/// * `(width, height)` - Upload dimensions
pub fn fit_within(source: (u32, u32), max_edge: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let longer_edge = src_w.max(src_h);

    if longer_edge <= max_edge {
        return source;
    }

    if src_w >= src_h {
        // Landscape or square: width is the longer edge
        let ratio = max_edge as f64 / src_w as f64;
        let h = ((src_h as f64 * ratio).round() as u32).max(1);
        (max_edge, h)
    } else {
        // Portrait: height is the longer edge
        let ratio = max_edge as f64 / src_h as f64;
        let w = ((src_w as f64 * ratio).round() as u32).max(1);
        (w, max_edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_leaves_small_image_unchanged() {
        assert_eq!(fit_within((800, 600), 2048), (800, 600));
    }

    #[test]
    fn fit_exact_limit_unchanged() {
        assert_eq!(fit_within((2048, 1536), 2048), (2048, 1536));
    }

    #[test]
    fn fit_landscape_caps_width() {
        assert_eq!(fit_within((4000, 3000), 2000), (2000, 1500));
    }

    #[test]
    fn fit_portrait_caps_height() {
        // Typical phone shot of a card held upright
        assert_eq!(fit_within((3024, 4032), 1008), (756, 1008));
    }

    #[test]
    fn fit_square() {
        assert_eq!(fit_within((3000, 3000), 1000), (1000, 1000));
    }

    #[test]
    fn fit_extreme_aspect_never_zero() {
        assert_eq!(fit_within((10000, 2), 100), (100, 1));
        assert_eq!(fit_within((2, 10000), 100), (1, 100));
    }
}
