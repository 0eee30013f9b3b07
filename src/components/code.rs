use serde::Deserialize;
use std::sync::OnceLock;

use regex::Regex;

use super::STYLE_PROP;
use crate::config::RenderOptions;
use crate::error::EmailResult;
use crate::markup::{escape_html, style_attr};
use crate::registry::{Category, ChildrenMode, Component, Contract, PropDef, PropType};
use crate::style::StyleMap;

/// Orange.fr drops `<code>`; it also keeps `<meta>` siblings, which lets the
/// span copy be swapped in for that client only.
const ORANGE_FIX_STYLE: &str = "<style>meta ~ .cino {display: none !important; opacity: 0 !important;} meta ~ .cio {display: block !important;}</style>";

/// Replacement for a literal space inside code lines, so clients cannot collapse runs.
const CODE_SPACE: &str = "\u{a0}\u{200D}\u{200B}";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeInline {
    pub children: String,
    pub class_name: Option<String>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Component for CodeInline {
    const CONTRACT: Contract = Contract {
        name: "code-inline",
        category: Category::Content,
        description: "Inline code, rendered twice to work around Orange.fr",
        children: ChildrenMode::Text,
        props: &[
            PropDef::required("children", PropType::String, "Code text"),
            PropDef::optional("className", PropType::String, "Extra CSS classes"),
            STYLE_PROP,
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        let class_prefix = match self.class_name.as_deref() {
            Some(class) if !class.is_empty() => format!("{} ", escape_html(class)),
            _ => String::new(),
        };
        let css = self.style.to_css();
        let span_css = if css.is_empty() {
            "display: none".to_string()
        } else {
            format!("display: none; {}", css)
        };
        let content = escape_html(&self.children);

        Ok(format!(
            "{}<code class=\"{}cino\"{}>{}</code><span class=\"{}cio\"{}>{}</span>",
            ORANGE_FIX_STYLE,
            class_prefix,
            style_attr(&css),
            content,
            class_prefix,
            style_attr(&span_css),
            content
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CodeTheme {
    #[serde(default)]
    pub base: Option<StyleMap>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    pub code: String,
    pub language: Option<String>,
    #[serde(default)]
    pub line_numbers: bool,
    pub font_family: Option<String>,
    pub theme: Option<CodeTheme>,
    #[serde(default)]
    pub style: StyleMap,
}

fn default_theme_base() -> StyleMap {
    StyleMap::new()
        .with("backgroundColor", "#f5f5f5")
        .with("color", "#333")
        .with("fontFamily", "monospace")
        .with("padding", "16px")
        .with("borderRadius", "4px")
        .with("overflow", "auto")
}

fn line_break_regex() -> &'static Regex {
    static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    LINE_BREAK.get_or_init(|| Regex::new(r"\r\n|\r|\n").unwrap())
}

impl Component for CodeBlock {
    const CONTRACT: Contract = Contract {
        name: "code-block",
        category: Category::Content,
        description: "Preformatted code block with optional line numbers",
        children: ChildrenMode::None,
        props: &[
            PropDef::required("code", PropType::String, "Source code to display"),
            PropDef::optional("language", PropType::String, "Language label")
                .with_default("javascript"),
            PropDef::optional("lineNumbers", PropType::Boolean, "Prefix lines with numbers")
                .with_default("false"),
            PropDef::optional("fontFamily", PropType::String, "Font for code and numbers")
                .with_default("monospace"),
            PropDef::optional("theme", PropType::Object, "Theme; `base` replaces the block style"),
            STYLE_PROP,
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        let mut pre_style = self
            .theme
            .as_ref()
            .and_then(|theme| theme.base.clone())
            .unwrap_or_else(default_theme_base);
        pre_style.insert("width", "100%");
        pre_style.extend(&self.style);

        let font_family = escape_html(self.font_family.as_deref().unwrap_or("monospace"));
        let lines: Vec<String> = line_break_regex()
            .split(&self.code)
            .enumerate()
            .map(|(index, line)| {
                let number = if self.line_numbers {
                    format!(
                        "<span style=\"width: 2em; height: 1em; display: inline-block; font-family: {}\">{}</span>",
                        font_family,
                        index + 1
                    )
                } else {
                    String::new()
                };
                format!(
                    "{}<span style=\"font-family: {}\">{}</span><br />",
                    number,
                    font_family,
                    escape_html(&line.replace(' ', CODE_SPACE))
                )
            })
            .collect();

        Ok(format!(
            "<pre data-language=\"{}\"{}><code>{}</code></pre>",
            escape_html(self.language.as_deref().unwrap_or("javascript")),
            style_attr(&pre_style.to_css()),
            lines.join("\n")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::render_props;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_code_inline_renders_both_copies() {
        let html = render_props::<CodeInline>(json!({ "children": "a < b" })).unwrap();
        assert_eq!(
            html,
            format!(
                "{}<code class=\"cino\">a &lt; b</code><span class=\"cio\" style=\"display: none\">a &lt; b</span>",
                ORANGE_FIX_STYLE
            )
        );
    }

    #[test]
    fn test_code_inline_class_and_style() {
        let html = render_props::<CodeInline>(json!({
            "children": "x",
            "className": "mono",
            "style": { "color": "red" }
        }))
        .unwrap();
        assert!(html.contains("<code class=\"mono cino\" style=\"color: red\">x</code>"));
        assert!(html.contains("<span class=\"mono cio\" style=\"display: none; color: red\">x</span>"));
    }

    #[test]
    fn test_code_block_lines() {
        let html = render_props::<CodeBlock>(json!({ "code": "a b\r\nc" })).unwrap();
        assert_eq!(
            html,
            "<pre data-language=\"javascript\" style=\"background-color: #f5f5f5; color: #333; font-family: monospace; padding: 16px; border-radius: 4px; overflow: auto; width: 100%\"><code><span style=\"font-family: monospace\">a\u{a0}\u{200D}\u{200B}b</span><br />\n<span style=\"font-family: monospace\">c</span><br /></code></pre>"
        );
    }

    #[test]
    fn test_code_block_line_numbers_and_theme() {
        let html = render_props::<CodeBlock>(json!({
            "code": "x\ny",
            "language": "rust",
            "lineNumbers": true,
            "fontFamily": "Menlo",
            "theme": { "base": { "background": "#000" } }
        }))
        .unwrap();
        assert!(html.starts_with("<pre data-language=\"rust\" style=\"background: #000; width: 100%\">"));
        assert!(html.contains("font-family: Menlo\">2</span><span style=\"font-family: Menlo\">y</span>"));
    }
}
