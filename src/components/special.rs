use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::config::RenderOptions;
use crate::error::{EmailError, EmailResult};
use crate::markdown::render_markdown;
use crate::preview::render_preview;
use crate::registry::{Category, ChildrenMode, Component, Contract, PropDef, PropType};
use crate::style::{StyleMap, StyleValue};

pub const FALLBACK_FONTS: &[&str] = &[
    "Arial",
    "Helvetica",
    "Verdana",
    "Georgia",
    "Times New Roman",
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
];

/// Characters that would let a value escape its CSS string or the `<style>` element.
const CSS_UNSAFE: &[char] = &['<', '>', '\'', '"', '{', '}', '\\'];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FallbackFonts {
    One(String),
    Many(Vec<String>),
}

impl FallbackFonts {
    fn first(&self) -> &str {
        match self {
            FallbackFonts::One(font) => font,
            FallbackFonts::Many(fonts) => fonts.first().map(String::as_str).unwrap_or_default(),
        }
    }

    fn joined(&self) -> String {
        match self {
            FallbackFonts::One(font) => font.clone(),
            FallbackFonts::Many(fonts) => fonts.join(", "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum WebFontFormat {
    #[serde(rename = "woff")]
    Woff,
    #[serde(rename = "woff2")]
    Woff2,
    #[serde(rename = "truetype")]
    TrueType,
    #[serde(rename = "opentype")]
    OpenType,
    #[serde(rename = "embedded-opentype")]
    EmbeddedOpenType,
    #[serde(rename = "svg")]
    Svg,
}

impl fmt::Display for WebFontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WebFontFormat::Woff => "woff",
            WebFontFormat::Woff2 => "woff2",
            WebFontFormat::TrueType => "truetype",
            WebFontFormat::OpenType => "opentype",
            WebFontFormat::EmbeddedOpenType => "embedded-opentype",
            WebFontFormat::Svg => "svg",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebFont {
    pub url: String,
    pub format: WebFontFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Font {
    pub font_family: String,
    pub fallback_font_family: FallbackFonts,
    pub web_font: Option<WebFont>,
    pub font_style: Option<String>,
    pub font_weight: Option<StyleValue>,
}

fn css_safe<'a>(property: &str, value: &'a str, extra: &[char]) -> EmailResult<&'a str> {
    match value.chars().find(|c| CSS_UNSAFE.contains(c) || extra.contains(c)) {
        Some(c) => Err(EmailError::invalid_property(
            "font",
            property,
            format!("character '{}' is not allowed", c),
        )),
        None => Ok(value),
    }
}

impl Component for Font {
    const CONTRACT: Contract = Contract {
        name: "font",
        category: Category::Special,
        description: "@font-face declaration applied to the whole email; place it inside head",
        children: ChildrenMode::None,
        props: &[
            PropDef::required("fontFamily", PropType::String, "Name of the font family"),
            PropDef::required(
                "fallbackFontFamily",
                PropType::EnumList(FALLBACK_FONTS),
                "Fallback font or list of fallbacks",
            ),
            PropDef::optional("webFont", PropType::Object, "{ url, format } of the font file"),
            PropDef::optional("fontStyle", PropType::String, "Font style").with_default("normal"),
            PropDef::optional("fontWeight", PropType::Length, "Font weight").with_default("400"),
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        let family = css_safe("fontFamily", &self.font_family, &[';'])?;
        let font_style = css_safe("fontStyle", self.font_style.as_deref().unwrap_or("normal"), &[';'])?;
        let font_weight = match &self.font_weight {
            Some(weight) => weight.to_string(),
            None => "400".to_string(),
        };
        let font_weight = css_safe("fontWeight", &font_weight, &[';'])?;
        let src = match &self.web_font {
            Some(web_font) => format!(
                " src: url({}) format('{}');",
                css_safe("webFont", &web_font.url, &['(', ')', ' '])?,
                web_font.format
            ),
            None => String::new(),
        };

        Ok(format!(
            "<style>@font-face {{ font-family: '{}'; font-style: {}; font-weight: {}; mso-font-alt: '{}';{} }} * {{ font-family: '{}', {}; }}</style>",
            family,
            font_style,
            font_weight,
            self.fallback_font_family.first(),
            src,
            family,
            self.fallback_font_family.joined()
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Preview {
    pub children: String,
}

impl Component for Preview {
    const CONTRACT: Contract = Contract {
        name: "preview",
        category: Category::Special,
        description: "Hidden inbox preview text, padded or cut to 150 characters",
        children: ChildrenMode::Text,
        props: &[PropDef::required("children", PropType::String, "Preview text")],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        Ok(render_preview(&self.children))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Markdown {
    pub children: String,
    pub markdown_custom_styles: Option<BTreeMap<String, StyleMap>>,
    pub markdown_container_styles: Option<StyleMap>,
}

impl Component for Markdown {
    const CONTRACT: Contract = Contract {
        name: "markdown",
        category: Category::Special,
        description: "Markdown converted to styled HTML",
        children: ChildrenMode::Text,
        props: &[
            PropDef::required("children", PropType::String, "Markdown source"),
            PropDef::optional(
                "markdownCustomStyles",
                PropType::StyleTable,
                "Per-element style overrides (h1..h6, bold, italic, link, codeInline, codeBlock, ul, ol, li, blockQuote)",
            ),
            PropDef::optional(
                "markdownContainerStyles",
                PropType::Style,
                "Style of the wrapping div",
            ),
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        Ok(render_markdown(
            &self.children,
            self.markdown_custom_styles.as_ref(),
            self.markdown_container_styles.as_ref(),
        ))
    }
}
