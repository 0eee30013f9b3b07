//! HTML escaping and attribute serialization shared by all renderers.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::document::Props;
use crate::error::{EmailError, EmailResult};
use crate::style::{camel_to_kebab, check_scalar};

/// Void elements rendered as `<tag />` (compared case-insensitively).
pub const SELF_CLOSING_TAGS: &[&str] = &["img", "br", "hr", "input", "meta", "link"];

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn is_self_closing(tag: &str) -> bool {
    SELF_CLOSING_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

pub fn is_valid_tag_name(tag: &str) -> bool {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    TAG_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9-]*$").unwrap())
        .is_match(tag)
}

pub fn is_valid_attribute_name(name: &str) -> bool {
    static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
    ATTR_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z_:][A-Za-z0-9_.:-]*$").unwrap())
        .is_match(name)
}

/// Serialize a raw `style` object for a passthrough tag. Keys are converted
/// to kebab-case, values are written verbatim.
fn raw_style(object: &serde_json::Map<String, Value>) -> EmailResult<String> {
    let mut declarations = Vec::with_capacity(object.len());
    for (key, value) in object {
        check_scalar(key, value)?;
        match value {
            Value::String(s) => declarations.push(format!("{}: {}", camel_to_kebab(key), s)),
            Value::Number(n) => declarations.push(format!("{}: {}", camel_to_kebab(key), n)),
            _ => {}
        }
    }
    Ok(declarations.join("; "))
}

/// Turn passthrough props into an attribute list (without leading space).
///
/// Strings are escaped, `true` emits a bare attribute, `false` and `null`
/// are dropped, and `style` objects become inline CSS.
pub fn passthrough_attributes(tag: &str, props: &Props) -> EmailResult<String> {
    let mut attrs = Vec::with_capacity(props.len());
    for (key, value) in props {
        if !is_valid_attribute_name(key) {
            return Err(EmailError::invalid_property(
                tag,
                key,
                "not a valid HTML attribute name",
            ));
        }
        match value {
            Value::Object(object) if key == "style" => {
                attrs.push(format!("style=\"{}\"", escape_html(&raw_style(object)?)));
            }
            Value::String(s) => attrs.push(format!("{}=\"{}\"", key, escape_html(s))),
            Value::Bool(true) => attrs.push(key.clone()),
            Value::Bool(false) | Value::Null => {}
            Value::Number(n) => attrs.push(format!("{}=\"{}\"", key, n)),
            other => check_scalar(key, other)?,
        }
    }
    Ok(attrs.join(" "))
}

/// Generic element with already-rendered children.
pub fn element(tag: &str, attrs: &str, children: &str) -> String {
    let open = if attrs.is_empty() {
        tag.to_string()
    } else {
        format!("{} {}", tag, attrs)
    };
    if is_self_closing(tag) {
        format!("<{} />", open)
    } else {
        format!("<{}>{}</{}>", open, children, tag)
    }
}

/// ` style="..."` when the declaration string is non-empty, else nothing.
pub fn style_attr(css: &str) -> String {
    if css.is_empty() {
        String::new()
    } else {
        format!(" style=\"{}\"", escape_html(css))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Props {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_self_closing_is_case_insensitive() {
        assert!(is_self_closing("img"));
        assert!(is_self_closing("BR"));
        assert!(!is_self_closing("strong"));
    }

    #[test]
    fn test_tag_and_attribute_names() {
        assert!(is_valid_tag_name("strong"));
        assert!(is_valid_tag_name("my-widget"));
        assert!(!is_valid_tag_name("a onclick=x"));
        assert!(!is_valid_tag_name(""));
        assert!(is_valid_attribute_name("data-id"));
        assert!(is_valid_attribute_name("xml:lang"));
        assert!(!is_valid_attribute_name("on\"click"));
    }

    #[test]
    fn test_passthrough_attributes() {
        let attrs = passthrough_attributes(
            "input",
            &props(json!({
                "type": "checkbox",
                "checked": true,
                "disabled": false,
                "tabindex": 2,
                "title": "a \"quoted\" title",
                "style": { "backgroundColor": "red", "fontSize": 12 },
                "data-note": null
            })),
        )
        .unwrap();
        assert_eq!(
            attrs,
            "type=\"checkbox\" checked tabindex=\"2\" title=\"a &quot;quoted&quot; title\" style=\"background-color: red; font-size: 12\""
        );
    }

    #[test]
    fn test_passthrough_rejects_nested_values() {
        let err = passthrough_attributes("div", &props(json!({ "data": [1, 2] }))).unwrap_err();
        assert!(matches!(err, EmailError::UnsupportedStyleValue { .. }));

        let err = passthrough_attributes("div", &props(json!({ "style": { "color": true } })))
            .unwrap_err();
        assert_eq!(
            err,
            EmailError::UnsupportedStyleValue {
                property: "color".to_string(),
                kind: "boolean".to_string(),
            }
        );
    }

    #[test]
    fn test_passthrough_rejects_bad_attribute_name() {
        let err = passthrough_attributes("div", &props(json!({ "a b": "x" }))).unwrap_err();
        assert!(matches!(err, EmailError::InvalidProperty { .. }));
    }

    #[test]
    fn test_element() {
        assert_eq!(element("strong", "", "x"), "<strong>x</strong>");
        assert_eq!(element("br", "", "ignored"), "<br />");
        assert_eq!(element("img", "src=\"a.png\"", ""), "<img src=\"a.png\" />");
    }

    #[test]
    fn test_style_attr() {
        assert_eq!(style_attr(""), "");
        assert_eq!(style_attr("color: red"), " style=\"color: red\"");
    }
}
