//! A small markdown-to-HTML transcoder for email bodies.
//!
//! The transcoder is a fixed sequence of regex substitutions rather than a
//! parser. Later passes see the output of earlier ones, so the order below is
//! part of the output format: headings, bold, italic, fenced code, inline
//! code, links, ordered lists, unordered lists, paragraph breaks, line breaks.
//! Markdown text is trusted markup; only link targets are escaped.

use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use log::debug;
use regex::{Captures, Regex};

use crate::markup::escape_html;
use crate::style::StyleMap;

/// Element keys that accept a style override.
pub const MARKDOWN_STYLE_KEYS: &[&str] = &[
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "bold",
    "italic",
    "blockQuote",
    "codeInline",
    "codeBlock",
    "link",
    "ul",
    "ol",
    "li",
];

const CODE_FONT_STACK: &str = "SFMono-Regular,Menlo,Monaco,Consolas,monospace";

/// Per-element inline styles used by the transcoder.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownStyles {
    styles: HashMap<String, StyleMap>,
}

fn heading_style(font_size: &str) -> StyleMap {
    StyleMap::new()
        .with("fontSize", font_size)
        .with("fontWeight", "500")
        .with("paddingTop", "20px")
}

fn list_style() -> StyleMap {
    StyleMap::new()
        .with("paddingLeft", "20px")
        .with("marginTop", "10px")
        .with("marginBottom", "10px")
}

impl Default for MarkdownStyles {
    fn default() -> Self {
        let mut styles = HashMap::new();
        for (key, size) in [
            ("h1", "2.5rem"),
            ("h2", "2rem"),
            ("h3", "1.75rem"),
            ("h4", "1.5rem"),
            ("h5", "1.25rem"),
            ("h6", "1rem"),
        ] {
            styles.insert(key.to_string(), heading_style(size));
        }
        styles.insert("bold".to_string(), StyleMap::new().with("fontWeight", "bold"));
        styles.insert("italic".to_string(), StyleMap::new().with("fontStyle", "italic"));
        styles.insert(
            "blockQuote".to_string(),
            StyleMap::new()
                .with("background", "#f9f9f9")
                .with("borderLeft", "10px solid #ccc")
                .with("margin", "1.5em 10px")
                .with("padding", "1em 10px"),
        );
        styles.insert(
            "codeInline".to_string(),
            StyleMap::new()
                .with("color", "#212529")
                .with("fontSize", "87.5%")
                .with("display", "inline")
                .with("background", "#f8f8f8")
                .with("fontFamily", CODE_FONT_STACK)
                .with("wordWrap", "break-word"),
        );
        styles.insert(
            "codeBlock".to_string(),
            StyleMap::new()
                .with("color", "#212529")
                .with("fontSize", "87.5%")
                .with("display", "block")
                .with("paddingTop", "10px")
                .with("paddingRight", "10px")
                .with("paddingLeft", "10px")
                .with("paddingBottom", "1px")
                .with("marginBottom", "20px")
                .with("background", "#f8f8f8")
                .with("fontFamily", CODE_FONT_STACK)
                .with("wordWrap", "break-word"),
        );
        styles.insert(
            "link".to_string(),
            StyleMap::new()
                .with("color", "#007bff")
                .with("textDecoration", "underline")
                .with("backgroundColor", "transparent"),
        );
        styles.insert("ul".to_string(), list_style());
        styles.insert("ol".to_string(), list_style());
        styles.insert("li".to_string(), StyleMap::new().with("marginBottom", "5px"));
        Self { styles }
    }
}

impl MarkdownStyles {
    /// Defaults with caller overrides applied. An override replaces the
    /// default for its key entirely; it is not merged.
    pub fn with_overrides(overrides: &BTreeMap<String, StyleMap>) -> Self {
        let mut styles = Self::default();
        for (key, style) in overrides {
            if !MARKDOWN_STYLE_KEYS.contains(&key.as_str()) {
                debug!("ignoring style override for unknown markdown element '{}'", key);
                continue;
            }
            styles.styles.insert(key.clone(), style.clone());
        }
        styles
    }

    pub fn get(&self, key: &str) -> Option<&StyleMap> {
        self.styles.get(key)
    }

    fn css(&self, key: &str) -> String {
        self.get(key)
            .map(|style| escape_html(&style.to_compact_css()))
            .unwrap_or_default()
    }
}

struct Passes {
    h3: Regex,
    h2: Regex,
    h1: Regex,
    bold: Regex,
    italic: Regex,
    code_block: Regex,
    code_inline: Regex,
    link: Regex,
    ordered_list: Regex,
    ordered_item: Regex,
    unordered_list: Regex,
    unordered_item: Regex,
}

fn passes() -> &'static Passes {
    static PASSES: OnceLock<Passes> = OnceLock::new();
    PASSES.get_or_init(|| Passes {
        h3: Regex::new(r"(?mi)^### (.*)$").unwrap(),
        h2: Regex::new(r"(?mi)^## (.*)$").unwrap(),
        h1: Regex::new(r"(?mi)^# (.*)$").unwrap(),
        bold: Regex::new(r"\*\*(.*?)\*\*").unwrap(),
        italic: Regex::new(r"\*(.*?)\*").unwrap(),
        code_block: Regex::new(r"(?s)```(.*?)```").unwrap(),
        code_inline: Regex::new(r"`([^`]+)`").unwrap(),
        link: Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap(),
        ordered_list: Regex::new(r"(?mi)(?:^\d+\.\s+.+$\n?)+").unwrap(),
        ordered_item: Regex::new(r"^\d+\.\s+").unwrap(),
        unordered_list: Regex::new(r"(?mi)(?:^[-*+]\s+.+$\n?)+").unwrap(),
        unordered_item: Regex::new(r"^[-*+]\s+").unwrap(),
    })
}

fn wrap_each(re: &Regex, input: &str, tag: &str, css: &str) -> String {
    re.replace_all(input, |caps: &Captures| {
        format!("<{tag} style=\"{css}\">{}</{tag}>", &caps[1])
    })
    .into_owned()
}

fn list(re: &Regex, item: &Regex, input: &str, tag: &str, styles: &MarkdownStyles) -> String {
    let list_css = styles.css(tag);
    let item_css = styles.css("li");
    re.replace_all(input, |caps: &Captures| {
        let items: String = caps[0]
            .trim()
            .split('\n')
            .map(|line| {
                format!(
                    "<li style=\"{}\">{}</li>",
                    item_css,
                    item.replace(line, "")
                )
            })
            .collect();
        format!("<{tag} style=\"{}\">{}</{tag}>", list_css, items)
    })
    .into_owned()
}

/// Run every substitution pass over `markdown` and return the HTML body.
pub fn markdown_to_html(markdown: &str, styles: &MarkdownStyles) -> String {
    let p = passes();

    let html = wrap_each(&p.h3, markdown, "h3", &styles.css("h3"));
    let html = wrap_each(&p.h2, &html, "h2", &styles.css("h2"));
    let html = wrap_each(&p.h1, &html, "h1", &styles.css("h1"));
    let html = wrap_each(&p.bold, &html, "strong", &styles.css("bold"));
    let html = wrap_each(&p.italic, &html, "em", &styles.css("italic"));

    let code_block_css = styles.css("codeBlock");
    let html = p
        .code_block
        .replace_all(&html, |caps: &Captures| {
            format!(
                "<pre style=\"{}\"><code>{}</code></pre>",
                code_block_css,
                caps[1].trim()
            )
        })
        .into_owned();

    let html = wrap_each(&p.code_inline, &html, "code", &styles.css("codeInline"));

    let link_css = styles.css("link");
    let html = p
        .link
        .replace_all(&html, |caps: &Captures| {
            format!(
                "<a href=\"{}\" target=\"_blank\" style=\"{}\">{}</a>",
                escape_html(&caps[2]),
                link_css,
                &caps[1]
            )
        })
        .into_owned();

    let html = list(&p.ordered_list, &p.ordered_item, &html, "ol", styles);
    let html = list(&p.unordered_list, &p.unordered_item, &html, "ul", styles);

    let html = html.replace("\n\n", "</p><p>").replace('\n', "<br />");

    if html.starts_with('<') {
        html
    } else {
        format!("<p>{}</p>", html)
    }
}

/// Full markdown block: transcoded body inside the markdown container `<div>`.
pub fn render_markdown(
    markdown: &str,
    custom_styles: Option<&BTreeMap<String, StyleMap>>,
    container_style: Option<&StyleMap>,
) -> String {
    let styles = match custom_styles {
        Some(overrides) => MarkdownStyles::with_overrides(overrides),
        None => MarkdownStyles::default(),
    };
    let container = match container_style {
        Some(style) if !style.is_empty() => {
            format!(" style=\"{}\"", escape_html(&style.to_compact_css()))
        }
        _ => String::new(),
    };
    format!(
        "<div data-id=\"react-email-markdown\"{}>{}</div>",
        container,
        markdown_to_html(markdown, &styles)
    )
}
