//! Outlook (MSO) workarounds for anchor-as-button padding.
//!
//! Outlook's Word-based renderer ignores CSS padding on `<a>`. The visible
//! padding is faked with runs of hair spaces inside MSO-only conditional
//! comments, stretched with `mso-font-width` until the run is as wide as the
//! requested padding.

use crate::config::DEFAULT_MSO_MAX_FONT_WIDTH;

/// Hair space, the thinnest space entity Outlook renders.
pub const HAIR_SPACE: &str = "&#8202;";
/// Zero-width space closing the right-hand run.
pub const ZERO_WIDTH_SPACE: &str = "&#8203;";

/// Largest count that still converts to `f64` exactly. Past this the
/// search below can no longer step one space at a time.
const MAX_EXACT_SPACE_COUNT: f64 = 9_007_199_254_740_992.0;

/// Smallest hair-space count whose scaled width covers `expected_width` px,
/// with the `mso-font-width` ratio that makes it exact.
///
/// Returns `Some((0.0, 0))` when no padding is needed (zero, negative or
/// non-finite input) and `None` when the count is too large to represent.
pub fn compute_font_width_and_space_count(expected_width: f64) -> Option<(f64, usize)> {
    compute_font_width_and_space_count_with_max(expected_width, DEFAULT_MSO_MAX_FONT_WIDTH)
}

pub fn compute_font_width_and_space_count_with_max(
    expected_width: f64,
    max_font_width: f64,
) -> Option<(f64, usize)> {
    if !expected_width.is_finite() || expected_width <= 0.0 {
        return Some((0.0, 0));
    }
    let max_font_width = if max_font_width.is_finite() && max_font_width > 0.0 {
        max_font_width
    } else {
        DEFAULT_MSO_MAX_FONT_WIDTH
    };

    let estimate = (expected_width / 2.0 / max_font_width).ceil().max(1.0);
    if estimate > MAX_EXACT_SPACE_COUNT || estimate > usize::MAX as f64 {
        return None;
    }

    let required = |count: usize| expected_width / count as f64 / 2.0;

    // Start from the estimate, then settle on the smallest count that satisfies the bound.
    let mut count = estimate as usize;
    while count > 1 && required(count - 1) <= max_font_width {
        count -= 1;
    }
    while required(count) > max_font_width {
        count = count.checked_add(1)?;
    }

    Some((required(count), count))
}

/// Pixels to points, as Outlook measures `mso-text-raise`.
pub fn px_to_pt(px: f64) -> f64 {
    px * 3.0 / 4.0
}

/// Conditional run placed before the button label.
pub fn left_space_run(font_width: f64, space_count: usize, text_raise_pt: f64) -> String {
    format!(
        "<!--[if mso]><i style=\"mso-font-width:{}%;mso-text-raise:{}\" hidden>{}</i><![endif]-->",
        font_width * 100.0,
        text_raise_pt,
        HAIR_SPACE.repeat(space_count)
    )
}

/// Conditional run placed after the button label.
pub fn right_space_run(font_width: f64, space_count: usize) -> String {
    format!(
        "<!--[if mso]><i style=\"mso-font-width:{}%\" hidden>{}{}</i><![endif]-->",
        font_width * 100.0,
        HAIR_SPACE.repeat(space_count),
        ZERO_WIDTH_SPACE
    )
}
