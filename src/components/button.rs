use serde::Deserialize;

use super::STYLE_PROP;
use crate::config::RenderOptions;
use crate::error::{EmailError, EmailResult};
use crate::markup::{escape_html, style_attr};
use crate::mso::{
    compute_font_width_and_space_count_with_max, left_space_run, px_to_pt, right_space_run,
};
use crate::padding::parse_padding_with_reference;
use crate::registry::{Category, ChildrenMode, Component, Contract, PropDef, PropType};
use crate::style::StyleMap;

/// Anchor styled as a button. Padding is real CSS for most clients and
/// hair-space runs inside MSO conditionals for Outlook.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Button {
    pub href: String,
    pub children: String,
    pub target: Option<String>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Button {
    fn space_run(&self, padding: f64, options: &RenderOptions) -> EmailResult<(f64, usize)> {
        let overflow = |count: String| EmailError::RenderOverflow {
            limit: options.max_mso_space_count,
            reason: format!("button padding of {}px needs {} MSO spaces", padding, count),
        };
        let (font_width, count) =
            compute_font_width_and_space_count_with_max(padding, options.mso_max_font_width)
                .ok_or_else(|| overflow("too many".to_string()))?;
        if count > options.max_mso_space_count {
            return Err(overflow(count.to_string()));
        }
        Ok((font_width, count))
    }
}

impl Component for Button {
    const CONTRACT: Contract = Contract {
        name: "button",
        category: Category::Content,
        description: "Call-to-action link with Outlook-safe padding",
        children: ChildrenMode::Text,
        props: &[
            PropDef::required("href", PropType::String, "Link target URL"),
            PropDef::required("children", PropType::String, "Button label"),
            PropDef::optional("target", PropType::String, "Browsing context").with_default("_blank"),
            STYLE_PROP,
        ],
    };

    fn render(self, options: &RenderOptions) -> EmailResult<String> {
        let padding = parse_padding_with_reference(&self.style, options.padding_reference_width);
        let text_raise = px_to_pt(padding.vertical());

        let (left_width, left_count) = self.space_run(padding.left.unwrap_or(0.0), options)?;
        let (right_width, right_count) = self.space_run(padding.right.unwrap_or(0.0), options)?;

        let mut link_style = StyleMap::new()
            .with("lineHeight", "100%")
            .with("textDecoration", "none")
            .with("display", "inline-block")
            .with("maxWidth", "100%")
            .with("msoPaddingAlt", "0px");
        link_style.extend(&self.style);
        for (key, value) in [
            ("paddingTop", padding.top),
            ("paddingRight", padding.right),
            ("paddingBottom", padding.bottom),
            ("paddingLeft", padding.left),
        ] {
            if let Some(px) = value {
                link_style.insert(key, px);
            }
        }

        let mut label_style = StyleMap::new()
            .with("maxWidth", "100%")
            .with("display", "inline-block")
            .with("lineHeight", "120%")
            .with("msoPaddingAlt", "0px");
        if let Some(bottom) = padding.bottom {
            label_style.insert("msoTextRaise", px_to_pt(bottom));
        }

        Ok(format!(
            "<a href=\"{}\" target=\"{}\"{}><span>{}</span><span{}>{}</span><span>{}</span></a>",
            escape_html(&self.href),
            escape_html(self.target.as_deref().unwrap_or("_blank")),
            style_attr(&link_style.to_css()),
            left_space_run(left_width, left_count, text_raise),
            style_attr(&label_style.to_css()),
            escape_html(&self.children),
            right_space_run(right_width, right_count)
        ))
    }
}
