//! Table-based layout types. Email clients do not support flex or grid, so
//! every layout primitive is a presentation table or cell.

use serde::Deserialize;

use super::{MARKUP_CHILDREN_PROP, PRESENTATION_TABLE, STYLE_PROP};
use crate::config::RenderOptions;
use crate::error::EmailResult;
use crate::markup::style_attr;
use crate::registry::{Category, ChildrenMode, Component, Contract, PropDef, PropType};
use crate::style::StyleMap;

/// Overlay the convenience props on top of `style`, skipping empty values.
fn overlay(style: &mut StyleMap, pairs: &[(&str, &Option<String>)]) {
    for (key, value) in pairs {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            style.insert(*key, value);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default)]
    pub children: String,
    pub background_color: Option<String>,
    pub padding: Option<String>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Component for Container {
    const CONTRACT: Contract = Contract {
        name: "container",
        category: Category::Layout,
        description: "Centered content column, 37.5em wide unless overridden",
        children: ChildrenMode::Markup,
        props: &[
            MARKUP_CHILDREN_PROP,
            PropDef::optional("backgroundColor", PropType::String, "Background color"),
            PropDef::optional("padding", PropType::String, "CSS padding, e.g. '20px'"),
            STYLE_PROP,
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        let mut style = StyleMap::new().with("maxWidth", "37.5em");
        style.extend(&self.style);
        overlay(
            &mut style,
            &[
                ("backgroundColor", &self.background_color),
                ("padding", &self.padding),
            ],
        );
        Ok(format!(
            "<table {}{}><tbody><tr style=\"width: 100%\"><td>{}</td></tr></tbody></table>",
            PRESENTATION_TABLE,
            style_attr(&style.to_css()),
            self.children
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub children: String,
    pub background_color: Option<String>,
    pub padding: Option<String>,
    pub text_align: Option<String>,
    #[serde(default)]
    pub style: StyleMap,
}

impl Component for Section {
    const CONTRACT: Contract = Contract {
        name: "section",
        category: Category::Layout,
        description: "Full-width block; the style attribute is omitted when empty",
        children: ChildrenMode::Markup,
        props: &[
            MARKUP_CHILDREN_PROP,
            PropDef::optional("backgroundColor", PropType::String, "Background color"),
            PropDef::optional("padding", PropType::String, "CSS padding"),
            PropDef::optional("textAlign", PropType::String, "Text alignment of the content"),
            STYLE_PROP,
        ],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        let mut style = self.style.clone();
        overlay(
            &mut style,
            &[
                ("backgroundColor", &self.background_color),
                ("padding", &self.padding),
                ("textAlign", &self.text_align),
            ],
        );
        Ok(format!(
            "<table {}{}><tbody><tr><td>{}</td></tr></tbody></table>",
            PRESENTATION_TABLE,
            style_attr(&style.to_css()),
            self.children
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub children: String,
    #[serde(default)]
    pub style: StyleMap,
}

impl Component for Row {
    const CONTRACT: Contract = Contract {
        name: "row",
        category: Category::Layout,
        description: "Horizontal row; its children are usually columns",
        children: ChildrenMode::Markup,
        props: &[MARKUP_CHILDREN_PROP, STYLE_PROP],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        Ok(format!(
            "<table {}{}><tbody style=\"width: 100%\"><tr style=\"width: 100%\">{}</tr></tbody></table>",
            PRESENTATION_TABLE,
            style_attr(&self.style.to_css()),
            self.children
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub children: String,
    #[serde(default)]
    pub style: StyleMap,
}

impl Component for Column {
    const CONTRACT: Contract = Contract {
        name: "column",
        category: Category::Layout,
        description: "Table cell inside a row",
        children: ChildrenMode::Markup,
        props: &[MARKUP_CHILDREN_PROP, STYLE_PROP],
    };

    fn render(self, _options: &RenderOptions) -> EmailResult<String> {
        Ok(format!(
            "<td data-id=\"__react-email-column\"{}>{}</td>",
            style_attr(&self.style.to_css()),
            self.children
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
    fn test_container_default_max_width() {
        let html = render_props::<Container>(json!({ "children": "x" })).unwrap();
        assert_eq!(
            html,
            "<table align=\"center\" width=\"100%\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"max-width: 37.5em\"><tbody><tr style=\"width: 100%\"><td>x</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_container_overrides() {
        let html = render_props::<Container>(json!({
            "backgroundColor": "#fafafa",
            "padding": "20px",
            "style": { "maxWidth": "600px", "borderRadius": 4 }
        }))
        .unwrap();
        assert!(html.contains(
            "style=\"max-width: 600px; border-radius: 4px; background-color: #fafafa; padding: 20px\""
        ));
    }

    #[test]
    fn test_section_omits_empty_style() {
        let html = render_props::<Section>(json!({ "children": "x" })).unwrap();
        assert_eq!(
            html,
            "<table align=\"center\" width=\"100%\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\"><tbody><tr><td>x</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_section_text_align() {
        let html = render_props::<Section>(json!({ "textAlign": "center", "padding": "" })).unwrap();
        assert!(html.contains("role=\"presentation\" style=\"text-align: center\">"));
    }

    #[test]
    fn test_row_and_column() {
        let column = render_props::<Column>(json!({ "children": "a", "style": { "width": 50 } }))
            .unwrap();
        assert_eq!(
            column,
            "<td data-id=\"__react-email-column\" style=\"width: 50px\">a</td>"
        );
        let row = render_props::<Row>(json!({ "children": column })).unwrap();
        assert!(row.contains("<tbody style=\"width: 100%\"><tr style=\"width: 100%\"><td data-id="));
        assert!(!row.contains("role=\"presentation\" style="));
    }
}
