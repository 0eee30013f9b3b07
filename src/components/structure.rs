use serde::Deserialize;

use super::{MARKUP_CHILDREN_PROP, STYLE_PROP};
use crate::config::RenderOptions;
use crate::error::EmailResult;
use crate::markup::{escape_html, style_attr};
use crate::registry::{Category, ChildrenMode, Component, Contract, PropDef, PropType};
use crate::style::{StyleMap, StyleValue};

/// Margin properties that mail clients apply inconsistently on `<body>`.
const BODY_MARGIN_KEYS: &[&str] = &[
    "margin",
    "marginTop",
    "marginBottom",
    "marginRight",
    "marginLeft",
    "marginInline",
    "marginBlock",
    "marginBlockStart",
    "marginBlockEnd",
    "marginInlineStart",
    "marginInlineEnd",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Html {
    #[serde(default)]
    pub children: String,
    pub lang: Option<String>,
    pub dir: Option<String>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Component for Html {
    const CONTRACT: Contract = Contract {
        name: "html",
        category: Category::Structure,
        description: "Root element of the email document",
        children: ChildrenMode::Markup,
        props: &[
            MARKUP_CHILDREN_PROP,
            PropDef::optional("lang", PropType::String, "Language code of the document")
                .with_default("en"),
            PropDef::optional("dir", PropType::Enum(&["ltr", "rtl"]), "Text direction")
                .with_default("ltr"),
            STYLE_PROP,
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        Ok(format!(
            "<html lang=\"{}\" dir=\"{}\"{}>{}</html>",
            escape_html(self.lang.as_deref().unwrap_or("en")),
            self.dir.as_deref().unwrap_or("ltr"),
            style_attr(&self.style.to_css()),
            self.children
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Head {
    #[serde(default)]
    pub children: String,
}

impl Component for Head {
    const CONTRACT: Contract = Contract {
        name: "head",
        category: Category::Structure,
        description: "Document head with the email-safe meta tags; place font here",
        children: ChildrenMode::Markup,
        props: &[MARKUP_CHILDREN_PROP],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        Ok(format!(
            "<head><meta content=\"text/html; charset=UTF-8\" http-equiv=\"Content-Type\" /><meta name=\"x-apple-disable-message-reformatting\" />{}</head>",
            self.children
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Body {
    #[serde(default)]
    pub children: String,
    #[serde(default)]
    pub style: StyleMap,
}

impl Body {
    /// Style for the `<body>` tag itself: backgrounds are copied and any
    /// margin the caller set is zeroed. The full style goes on the inner cell.
    fn body_style(&self) -> StyleMap {
        let mut body = StyleMap::new();
        for key in ["background", "backgroundColor"] {
            if let Some(value) = self.style.get(key) {
                if !is_blank(value) {
                    body.insert(key, value.clone());
                }
            }
        }
        for key in BODY_MARGIN_KEYS {
            if self.style.contains_key(key) {
                body.insert(*key, 0.0);
            }
        }
        body
    }
}

fn is_blank(value: &StyleValue) -> bool {
    match value {
        StyleValue::Text(s) => s.is_empty(),
        StyleValue::Number(n) => *n == 0.0,
    }
}

impl Component for Body {
    const CONTRACT: Contract = Contract {
        name: "body",
        category: Category::Structure,
        description: "Email body wrapped in a full-width presentation table",
        children: ChildrenMode::Markup,
        props: &[MARKUP_CHILDREN_PROP, STYLE_PROP],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        Ok(format!(
            "<body{}><table border=\"0\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" align=\"center\"><tbody><tr><td{}>{}</td></tr></tbody></table></body>",
            style_attr(&self.body_style().to_css()),
            style_attr(&self.style.to_css()),
            self.children
        ))
    }
}
