//! Hidden inbox preview text.

use crate::markup::escape_html;

/// Number of characters inbox previews are padded or truncated to.
pub const PREVIEW_MAX_LENGTH: usize = 150;

/// Invisible filler repeated once per missing character so that clients do
/// not pull body text into the preview window.
pub const PREVIEW_FILLER: &str = "\u{a0}\u{200C}\u{200B}\u{200D}\u{200E}\u{200F}\u{FEFF}";

const PREVIEW_STYLE: &str =
    "display: none; overflow: hidden; line-height: 1px; opacity: 0; max-height: 0; max-width: 0";

/// First [`PREVIEW_MAX_LENGTH`] characters of `text`.
pub fn truncate_preview(text: &str) -> &str {
    match text.char_indices().nth(PREVIEW_MAX_LENGTH) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// Filler for a preview of `visible_len` characters, empty once the budget is used up.
pub fn preview_padding(visible_len: usize) -> String {
    PREVIEW_FILLER.repeat(PREVIEW_MAX_LENGTH.saturating_sub(visible_len))
}

pub fn render_preview(text: &str) -> String {
    let visible = truncate_preview(text);
    let padding = preview_padding(visible.chars().count());
    let filler = if padding.is_empty() {
        String::new()
    } else {
        format!("<div>{}</div>", padding)
    };
    format!(
        "<div style=\"{}\" data-skip-in-text=\"true\">{}{}</div>",
        PREVIEW_STYLE,
        escape_html(visible),
        filler
    )
}
