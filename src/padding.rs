//! CSS padding resolution for elements whose padding has to be known in pixels.

use regex::Regex;
use std::sync::OnceLock;

use crate::config::DEFAULT_PADDING_REFERENCE_WIDTH;
use crate::style::{StyleMap, StyleValue};

/// Pixel size of one `em`/`rem`.
pub const EM_PX: f64 = 16.0;

/// Per-edge padding in pixels. `None` means the edge was not specified.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: Some(value),
            right: Some(value),
            bottom: Some(value),
            left: Some(value),
        }
    }

    /// `top + bottom`, treating missing edges as zero.
    pub fn vertical(&self) -> f64 {
        self.top.unwrap_or(0.0) + self.bottom.unwrap_or(0.0)
    }
}

fn length_regex() -> &'static Regex {
    static LENGTH_REGEX: OnceLock<Regex> = OnceLock::new();
    LENGTH_REGEX.get_or_init(|| Regex::new(r"^([\d.]+)(px|em|rem|%)?$").unwrap())
}

/// Parse a single length token (`"12"`, `"12px"`, `"1.5em"`, `"10%"`) into px.
pub fn parse_length(token: &str, reference_width: f64) -> Option<f64> {
    let caps = length_regex().captures(token.trim())?;
    let number: f64 = caps.get(1)?.as_str().parse().ok()?;
    let px = match caps.get(2).map(|m| m.as_str()) {
        Some("em") | Some("rem") => number * EM_PX,
        Some("%") => number / 100.0 * reference_width,
        _ => number,
    };
    Some(px)
}

fn edge_value(value: Option<&StyleValue>, reference_width: f64) -> Option<f64> {
    match value? {
        StyleValue::Number(n) => Some(*n),
        StyleValue::Text(s) => parse_length(s, reference_width),
    }
}

fn parse_shorthand(value: &StyleValue, reference_width: f64) -> Padding {
    let text = match value {
        StyleValue::Number(n) => return Padding::uniform(*n),
        StyleValue::Text(s) => s,
    };
    // Unparseable tokens count as zero so the positional mapping still holds.
    let values: Vec<f64> = text
        .split_whitespace()
        .map(|token| parse_length(token, reference_width).unwrap_or(0.0))
        .collect();
    match values.as_slice() {
        [all] => Padding::uniform(*all),
        [vertical, horizontal] => Padding {
            top: Some(*vertical),
            right: Some(*horizontal),
            bottom: Some(*vertical),
            left: Some(*horizontal),
        },
        [top, horizontal, bottom] => Padding {
            top: Some(*top),
            right: Some(*horizontal),
            bottom: Some(*bottom),
            left: Some(*horizontal),
        },
        [top, right, bottom, left] => Padding {
            top: Some(*top),
            right: Some(*right),
            bottom: Some(*bottom),
            left: Some(*left),
        },
        _ => Padding::default(),
    }
}

/// Resolve `padding` shorthand plus `paddingTop`/`Right`/`Bottom`/`Left`
/// into explicit pixel values. Explicit edges always win over the shorthand.
pub fn parse_padding(style: &StyleMap) -> Padding {
    parse_padding_with_reference(style, DEFAULT_PADDING_REFERENCE_WIDTH)
}

pub fn parse_padding_with_reference(style: &StyleMap, reference_width: f64) -> Padding {
    let mut padding = Padding {
        top: edge_value(style.get("paddingTop"), reference_width),
        right: edge_value(style.get("paddingRight"), reference_width),
        bottom: edge_value(style.get("paddingBottom"), reference_width),
        left: edge_value(style.get("paddingLeft"), reference_width),
    };

    if let Some(shorthand) = style.get("padding") {
        let fallback = parse_shorthand(shorthand, reference_width);
        padding.top = padding.top.or(fallback.top);
        padding.right = padding.right.or(fallback.right);
        padding.bottom = padding.bottom.or(fallback.bottom);
        padding.left = padding.left.or(fallback.left);
    }

    padding
}

/// Leading-number parse: `"12px"` -> 12, `"-3.5em"` -> -3.5, `"auto"` -> None.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    static FLOAT_PREFIX: OnceLock<Regex> = OnceLock::new();
    let re = FLOAT_PREFIX
        .get_or_init(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").unwrap());
    re.find(input.trim_start())
        .and_then(|m| m.as_str().parse().ok())
}
