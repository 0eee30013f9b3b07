use serde::Deserialize;

use super::{MARKUP_CHILDREN_PROP, STYLE_PROP};
use crate::config::RenderOptions;
use crate::error::{EmailError, EmailResult};
use crate::markup::{escape_html, style_attr};
use crate::padding::parse_float_prefix;
use crate::registry::{Category, ChildrenMode, Component, Contract, PropDef, PropType};
use crate::style::{StyleMap, StyleValue};

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Number values are pixels; strings pass through untouched.
fn css_length(value: &StyleValue) -> String {
    match value {
        StyleValue::Number(n) => format!("{}px", n),
        StyleValue::Text(s) => s.clone(),
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(default)]
    pub children: String,
    pub color: Option<String>,
    pub font_size: Option<StyleValue>,
    pub font_weight: Option<StyleValue>,
    pub align: Option<String>,
    pub line_height: Option<StyleValue>,
    pub margin_top: Option<StyleValue>,
    pub margin_bottom: Option<StyleValue>,
    pub margin_left: Option<StyleValue>,
    pub margin_right: Option<StyleValue>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Component for Text {
    const CONTRACT: Contract = Contract {
        name: "text",
        category: Category::Content,
        description: "Paragraph of text; children may mix strings and nodes",
        children: ChildrenMode::Markup,
        props: &[
            MARKUP_CHILDREN_PROP,
            PropDef::optional("color", PropType::String, "Text color").with_default("#000000"),
            PropDef::optional("fontSize", PropType::Length, "Font size").with_default("14px"),
            PropDef::optional("fontWeight", PropType::Length, "Font weight").with_default("normal"),
            PropDef::optional("align", PropType::Enum(&["left", "center", "right"]), "Text alignment")
                .with_default("left"),
            PropDef::optional("lineHeight", PropType::Length, "Line height").with_default("24px"),
            PropDef::optional("marginTop", PropType::Length, "Top margin").with_default("16px"),
            PropDef::optional("marginBottom", PropType::Length, "Bottom margin")
                .with_default("16px"),
            PropDef::optional("marginLeft", PropType::Length, "Left margin"),
            PropDef::optional("marginRight", PropType::Length, "Right margin"),
            STYLE_PROP,
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        let or = |value: &Option<StyleValue>, default: &str| {
            value.as_ref().map(css_length).unwrap_or_else(|| default.to_string())
        };
        // font-weight and line-height keep bare numbers.
        let unitless = |value: &Option<StyleValue>, default: &str| {
            value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| default.to_string())
        };

        let mut declarations = vec![
            format!("color: {}", self.color.as_deref().unwrap_or("#000000")),
            format!("font-size: {}", or(&self.font_size, "14px")),
            format!("font-weight: {}", unitless(&self.font_weight, "normal")),
            format!("text-align: {}", self.align.as_deref().unwrap_or("left")),
            format!("line-height: {}", unitless(&self.line_height, "24px")),
            "margin: 0".to_string(),
            "padding: 0".to_string(),
            format!("margin-top: {}", or(&self.margin_top, "16px")),
            format!("margin-bottom: {}", or(&self.margin_bottom, "16px")),
        ];
        if let Some(left) = &self.margin_left {
            declarations.push(format!("margin-left: {}", css_length(left)));
        }
        if let Some(right) = &self.margin_right {
            declarations.push(format!("margin-right: {}", css_length(right)));
        }
        if !self.style.is_empty() {
            declarations.push(self.style.to_css());
        }

        Ok(format!(
            "<p style=\"{}\">{}</p>",
            escape_html(&declarations.join("; ")),
            self.children
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    #[serde(default)]
    pub children: String,
    #[serde(rename = "as")]
    pub tag: Option<String>,
    pub level: Option<f64>,
    pub content: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<StyleValue>,
    pub font_weight: Option<StyleValue>,
    pub m: Option<StyleValue>,
    pub mx: Option<StyleValue>,
    pub my: Option<StyleValue>,
    pub mt: Option<StyleValue>,
    pub mr: Option<StyleValue>,
    pub mb: Option<StyleValue>,
    pub ml: Option<StyleValue>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Heading {
    fn tag_name(&self) -> EmailResult<String> {
        if let Some(tag) = &self.tag {
            return Ok(tag.clone());
        }
        match self.level {
            None => Ok("h1".to_string()),
            Some(level) if level.fract() == 0.0 && (1.0..=6.0).contains(&level) => {
                Ok(format!("h{}", level as u8))
            }
            Some(level) => Err(EmailError::invalid_property(
                "heading",
                "level",
                format!("expected an integer between 1 and 6, got {}", level),
            )),
        }
    }

    /// Margin shorthands as pixel declarations. Values that do not start
    /// with a number are skipped.
    fn margins(&self) -> StyleMap {
        let mut margins = StyleMap::new();
        let shorthands: [(&Option<StyleValue>, &[&str]); 7] = [
            (&self.m, &["margin"]),
            (&self.mx, &["marginLeft", "marginRight"]),
            (&self.my, &["marginTop", "marginBottom"]),
            (&self.mt, &["marginTop"]),
            (&self.mr, &["marginRight"]),
            (&self.mb, &["marginBottom"]),
            (&self.ml, &["marginLeft"]),
        ];
        for (value, properties) in shorthands {
            let px = match value {
                Some(StyleValue::Number(n)) => Some(*n),
                Some(StyleValue::Text(s)) => parse_float_prefix(s),
                None => None,
            };
            if let Some(px) = px.filter(|n| n.is_finite()) {
                for property in properties {
                    margins.insert(*property, format!("{}px", px));
                }
            }
        }
        margins
    }
}

impl Component for Heading {
    const CONTRACT: Contract = Contract {
        name: "heading",
        category: Category::Content,
        description: "Heading element h1 to h6 with margin shorthands",
        children: ChildrenMode::Markup,
        props: &[
            MARKUP_CHILDREN_PROP,
            PropDef::optional("as", PropType::Enum(HEADING_TAGS), "Heading tag; wins over level")
                .with_default("h1"),
            PropDef::optional("level", PropType::Number, "Heading level 1 to 6"),
            PropDef::optional("content", PropType::String, "Heading text; wins over children"),
            PropDef::optional("color", PropType::String, "Text color"),
            PropDef::optional("fontSize", PropType::Length, "Font size"),
            PropDef::optional("fontWeight", PropType::Length, "Font weight"),
            PropDef::optional("m", PropType::Length, "Margin on all sides, in px"),
            PropDef::optional("mx", PropType::Length, "Left and right margin, in px"),
            PropDef::optional("my", PropType::Length, "Top and bottom margin, in px"),
            PropDef::optional("mt", PropType::Length, "Top margin, in px"),
            PropDef::optional("mr", PropType::Length, "Right margin, in px"),
            PropDef::optional("mb", PropType::Length, "Bottom margin, in px"),
            PropDef::optional("ml", PropType::Length, "Left margin, in px"),
            STYLE_PROP,
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        let tag = self.tag_name()?;

        let mut style = self.margins();
        if let Some(color) = &self.color {
            style.insert("color", color.as_str());
        }
        if let Some(size) = &self.font_size {
            style.insert("fontSize", size.clone());
        }
        if let Some(weight) = &self.font_weight {
            style.insert("fontWeight", weight.clone());
        }
        style.extend(&self.style);

        let content = match &self.content {
            Some(content) => escape_html(content),
            None => self.children,
        };
        Ok(format!(
            "<{tag}{}>{}</{tag}>",
            style_attr(&style.to_css()),
            content
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(default)]
    pub children: String,
    pub href: String,
    pub target: Option<String>,
    pub color: Option<String>,
    pub text_decoration: Option<String>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Component for Link {
    const CONTRACT: Contract = Contract {
        name: "link",
        category: Category::Content,
        description: "Anchor; children may mix strings and nodes",
        children: ChildrenMode::Markup,
        props: &[
            PropDef::required("href", PropType::String, "Link target URL"),
            MARKUP_CHILDREN_PROP,
            PropDef::optional("target", PropType::String, "Browsing context").with_default("_blank"),
            PropDef::optional("color", PropType::String, "Text color").with_default("#067df7"),
            PropDef::optional("textDecoration", PropType::String, "Text decoration")
                .with_default("none"),
            STYLE_PROP,
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        let mut style = StyleMap::new()
            .with("color", non_empty(&self.color).unwrap_or("#067df7"))
            .with("textDecoration", non_empty(&self.text_decoration).unwrap_or("none"));
        style.extend(&self.style);

        Ok(format!(
            "<a href=\"{}\" target=\"{}\"{}>{}</a>",
            escape_html(&self.href),
            escape_html(self.target.as_deref().unwrap_or("_blank")),
            style_attr(&style.to_css()),
            self.children
        ))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub width: Option<StyleValue>,
    pub height: Option<StyleValue>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Component for Image {
    const CONTRACT: Contract = Contract {
        name: "image",
        category: Category::Content,
        description: "Block image with email-safe reset styles",
        children: ChildrenMode::None,
        props: &[
            PropDef::required("src", PropType::String, "Image URL"),
            PropDef::required("alt", PropType::String, "Alternative text"),
            PropDef::optional("width", PropType::Length, "width attribute"),
            PropDef::optional("height", PropType::Length, "height attribute"),
            STYLE_PROP,
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        let mut style = StyleMap::new()
            .with("display", "block")
            .with("outline", "none")
            .with("border", "none")
            .with("textDecoration", "none");
        style.extend(&self.style);

        let dimension = |name: &str, value: &Option<StyleValue>| match value {
            Some(value) if !value.to_string().is_empty() => {
                format!(" {}=\"{}\"", name, escape_html(&value.to_string()))
            }
            _ => String::new(),
        };

        Ok(format!(
            "<img src=\"{}\" alt=\"{}\"{}{}{} />",
            escape_html(&self.src),
            escape_html(&self.alt),
            dimension("width", &self.width),
            dimension("height", &self.height),
            style_attr(&style.to_css())
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Hr {
    pub color: Option<String>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Component for Hr {
    const CONTRACT: Contract = Contract {
        name: "hr",
        category: Category::Content,
        description: "Horizontal rule drawn as a 1px top border",
        children: ChildrenMode::None,
        props: &[
            PropDef::optional("color", PropType::String, "Border color").with_default("#eaeaea"),
            STYLE_PROP,
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        let mut style = StyleMap::new()
            .with("width", "100%")
            .with("border", "none")
            .with(
                "borderTop",
                format!("1px solid {}", non_empty(&self.color).unwrap_or("#eaeaea")),
            );
        style.extend(&self.style);
        Ok(format!("<hr{} />", style_attr(&style.to_css())))
    }
}
