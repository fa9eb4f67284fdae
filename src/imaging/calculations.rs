//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Results are rounded to the nearest pixel and never drop below 1.

use crate::types::ResizeMode;

/// Scale `(w, h)` by `scale`, rounding each axis and flooring at 1px.
fn scale_dimensions(current: (u32, u32), scale: f64) -> (u32, u32) {
    let (w, h) = current;
    (
        ((w as f64 * scale).round() as u32).max(1),
        ((h as f64 * scale).round() as u32).max(1),
    )
}

/// Calculate the target dimensions for one image of a batch run.
///
/// # Arguments
/// * `mode` - How to scale against the bounds
/// * `current` - The image's current dimensions (width, height)
/// * `max_width`, `max_height` - Bounds; a resize needs both
/// * `maintain_aspect` - Only consulted by [`ResizeMode::Fill`]
///
/// # Returns
/// * `(width, height)` - Target dimensions
///
/// # Examples
/// ```
/// # use imgshift::imaging::calculate_batch_dimensions;
/// # use imgshift::types::ResizeMode;
/// // 800x600 fit into 400x400 → scale 0.5
/// assert_eq!(
///     calculate_batch_dimensions(ResizeMode::Fit, (800, 600), Some(400), Some(400), true),
///     (400, 300)
/// );
///
/// // Already inside the bounds → untouched, never upscaled
/// assert_eq!(
///     calculate_batch_dimensions(ResizeMode::Fit, (300, 300), Some(400), Some(400), true),
///     (300, 300)
/// );
/// ```
pub fn calculate_batch_dimensions(
    mode: ResizeMode,
    current: (u32, u32),
    max_width: Option<u32>,
    max_height: Option<u32>,
    maintain_aspect: bool,
) -> (u32, u32) {
    let (Some(max_w), Some(max_h)) = (max_width, max_height) else {
        // Missing a bound: nothing to scale against
        return current;
    };
    let (cur_w, cur_h) = current;
    let scale_w = max_w as f64 / cur_w as f64;
    let scale_h = max_h as f64 / cur_h as f64;

    match mode {
        ResizeMode::None => current,
        ResizeMode::Fit => {
            let scale = scale_w.min(scale_h);
            if scale < 1.0 {
                scale_dimensions(current, scale)
            } else {
                current
            }
        }
        ResizeMode::Fill if maintain_aspect => scale_dimensions(current, scale_w.max(scale_h)),
        ResizeMode::Fill => (max_w.max(1), max_h.max(1)),
    }
}

/// Resolve the target dimensions of a single-image conversion.
///
/// An explicit pair always wins. With only one side given and the aspect lock
/// on, the other side is derived from `aspect_ratio` (original width / height),
/// not from the current dimensions.
///
/// ```
/// # use imgshift::imaging::calculate_explicit_dimensions;
/// // 1000x500 (2:1), width 400 → height 200
/// assert_eq!(calculate_explicit_dimensions((1000, 500), 2.0, Some(400), None, true), (400, 200));
/// ```
pub fn calculate_explicit_dimensions(
    current: (u32, u32),
    aspect_ratio: f64,
    width: Option<u32>,
    height: Option<u32>,
    maintain_aspect: bool,
) -> (u32, u32) {
    let (cur_w, cur_h) = current;
    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) if maintain_aspect => {
            (w, ((w as f64 / aspect_ratio).round() as u32).max(1))
        }
        (None, Some(h)) if maintain_aspect => {
            (((h as f64 * aspect_ratio).round() as u32).max(1), h)
        }
        (Some(w), None) => (w, cur_h),
        (None, Some(h)) => (cur_w, h),
        (None, None) => current,
    }
}
