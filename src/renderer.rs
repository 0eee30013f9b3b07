//! The dispatch engine: turns a node tree into an HTML fragment.
//!
//! Traversal is post-order. Every child is reduced to a string before its
//! parent's renderer runs, and built-in types receive their children as
//! one pre-rendered `children` property. Unregistered types are emitted as
//! literal HTML tags.

use log::{debug, trace, warn};
use serde_json::Value;

use crate::config::{Budget, RenderOptions};
use crate::document::{children_from_value_with, Child, Node, Props};
use crate::error::{EmailError, EmailResult};
use crate::markup::{element, escape_html, is_self_closing, is_valid_tag_name, passthrough_attributes};
use crate::registry::{ChildrenMode, Registration, Registry};

/// Render a node or text with default options.
pub fn render(child: &Child) -> EmailResult<String> {
    render_with(child, &RenderOptions::default())
}

pub fn render_with(child: &Child, options: &RenderOptions) -> EmailResult<String> {
    Renderer::new(Registry::global(), options).render_child(child, 0, "component")
}

/// Render a single node with default options.
pub fn render_node(node: &Node) -> EmailResult<String> {
    render_node_with(node, &RenderOptions::default())
}

pub fn render_node_with(node: &Node, options: &RenderOptions) -> EmailResult<String> {
    Renderer::new(Registry::global(), options).render_node(node, 0, "component")
}

/// Per-call traversal state. Only the budget is mutable.
struct Renderer<'a> {
    registry: &'a Registry,
    options: &'a RenderOptions,
    budget: Budget,
}

impl<'a> Renderer<'a> {
    fn new(registry: &'a Registry, options: &'a RenderOptions) -> Self {
        Self {
            registry,
            options,
            budget: Budget::new(options),
        }
    }

    fn render_child(&mut self, child: &Child, depth: usize, path: &str) -> EmailResult<String> {
        match child {
            Child::Text(text) => Ok(escape_html(text)),
            Child::Node(node) => self.render_node(node, depth, path),
        }
    }

    fn render_children(&mut self, children: &[Child], depth: usize, path: &str) -> EmailResult<String> {
        let mut html = String::new();
        for (index, child) in children.iter().enumerate() {
            let child_path = format!("{}.children[{}]", path, index);
            html.push_str(&self.render_child(child, depth + 1, &child_path)?);
        }
        Ok(html)
    }

    fn render_node(&mut self, node: &Node, depth: usize, path: &str) -> EmailResult<String> {
        self.budget.enter(depth)?;
        if node.kind.is_empty() {
            return Err(EmailError::InvalidNode {
                path: path.to_string(),
                reason: "missing 'type'".to_string(),
            });
        }
        trace!("rendering '{}' at {}", node.kind, path);

        // Children given through props only count when the node has none of its own.
        let mut props = node.props.clone();
        let prop_children = props.remove("children");
        let fallback;
        let children: &[Child] = match prop_children {
            Some(value) if node.children.is_empty() => {
                fallback = children_from_value_with(
                    &value,
                    &format!("{}.props.children", path),
                    depth,
                    self.options,
                )?;
                &fallback
            }
            _ => &node.children,
        };

        let registry = self.registry;
        match registry.get(&node.kind) {
            Some(registration) => {
                self.render_registered(registration, props, children, depth, path)
            }
            None => self.render_passthrough(&node.kind, &props, children, depth, path),
        }
    }

    fn render_registered(
        &mut self,
        registration: &Registration,
        mut props: Props,
        children: &[Child],
        depth: usize,
        path: &str,
    ) -> EmailResult<String> {
        let contract = &registration.contract;
        match contract.children {
            ChildrenMode::Markup => {
                let html = self.render_children(children, depth, path)?;
                props.insert("children".to_string(), Value::String(html));
            }
            ChildrenMode::Text if !children.is_empty() => {
                let mut text = String::new();
                for (index, child) in children.iter().enumerate() {
                    match child {
                        Child::Text(part) => text.push_str(part),
                        Child::Node(nested) => {
                            return Err(EmailError::invalid_property(
                                contract.name,
                                "children",
                                format!(
                                    "expects text only, found a '{}' node at {}.children[{}]",
                                    nested.kind, path, index
                                ),
                            ))
                        }
                    }
                }
                props.insert("children".to_string(), Value::String(text));
            }
            ChildrenMode::Text => {}
            ChildrenMode::None => {
                if !children.is_empty() {
                    warn!(
                        "{}: ignoring {} children at {}",
                        contract.name,
                        children.len(),
                        path
                    );
                }
            }
        }
        registration.render(props, self.options)
    }

    fn render_passthrough(
        &mut self,
        tag: &str,
        props: &Props,
        children: &[Child],
        depth: usize,
        path: &str,
    ) -> EmailResult<String> {
        if !is_valid_tag_name(tag) {
            return Err(EmailError::InvalidNode {
                path: path.to_string(),
                reason: format!("'{}' is not a registered type or a valid tag name", tag),
            });
        }
        debug!("passing '{}' through as a literal tag", tag);

        let attrs = passthrough_attributes(tag, props)?;
        let inner = if is_self_closing(tag) {
            if !children.is_empty() {
                warn!("<{}> cannot have children; ignoring them at {}", tag, path);
            }
            String::new()
        } else {
            self.render_children(children, depth, path)?
        };
        Ok(element(tag, &attrs, &inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn node(value: serde_json::Value) -> Node {
        Node::from_value(&value, "component").unwrap()
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(render(&Child::from("a < b & c")).unwrap(), "a &lt; b &amp; c");
    }

    #[test]
    fn test_unknown_type_passthrough() {
        let html = render_node(&node(json!({ "type": "strong", "children": "x" }))).unwrap();
        assert_eq!(html, "<strong>x</strong>");
    }

    #[test]
    fn test_passthrough_self_closing_and_attributes() {
        let html = render_node(&node(json!({
            "type": "IMG",
            "props": { "src": "a.png", "hidden": true, "style": { "maxWidth": "100%" } }
        })))
        .unwrap();
        assert_eq!(html, "<IMG src=\"a.png\" hidden style=\"max-width: 100%\" />");
    }

    #[test]
    fn test_passthrough_nested_in_text() {
        let html = render_node(&node(json!({
            "type": "text",
            "children": ["Hello ", { "type": "strong", "children": "world" }, " & bye"]
        })))
        .unwrap();
        assert!(html.ends_with(">Hello <strong>world</strong> &amp; bye</p>"));
    }

    #[test]
    fn test_empty_type_is_invalid_node() {
        let err = render_node(&Node::new("").child("x")).unwrap_err();
        assert_eq!(
            err,
            EmailError::InvalidNode {
                path: "component".to_string(),
                reason: "missing 'type'".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_tag_name() {
        let err = render_node(&Node::new("div onclick=alert(1)")).unwrap_err();
        assert!(matches!(err, EmailError::InvalidNode { .. }));
    }

    #[test]
    fn test_props_children_are_used_when_node_has_none() {
        let html = render_node(
            &Node::new("button")
                .prop("href", "#")
                .prop("children", "Go"),
        )
        .unwrap();
        assert!(html.contains(">Go</span>"));
    }

    #[test]
    fn test_text_mode_rejects_nodes() {
        let err = render_node(&node(json!({
            "type": "preview",
            "children": ["a", { "type": "strong", "children": "b" }]
        })))
        .unwrap_err();
        assert!(matches!(err, EmailError::InvalidProperty { ref property, .. } if property == "children"));
    }

    #[test]
    fn test_text_mode_joins_unescaped() {
        let html = render_node(&node(json!({
            "type": "code-inline",
            "children": ["a", " < ", "b"]
        })))
        .unwrap();
        assert!(html.contains("<code class=\"cino\">a &lt; b</code>"));
    }

    #[test]
    fn test_depth_limit() {
        let mut tree = Node::new("span").child("leaf");
        for _ in 0..10 {
            tree = Node::new("div").child(tree);
        }
        let options = RenderOptions {
            max_depth: 5,
            ..RenderOptions::default()
        };
        let err = render_node_with(&tree, &options).unwrap_err();
        assert!(matches!(err, EmailError::RenderOverflow { limit: 5, .. }));
        assert!(render_node(&tree).is_ok());
    }

    #[test]
    fn test_node_limit() {
        let mut row = Node::new("row");
        for _ in 0..20 {
            row = row.child(Node::new("column").child("x"));
        }
        let options = RenderOptions {
            max_nodes: 10,
            ..RenderOptions::default()
        };
        let err = render_node_with(&row, &options).unwrap_err();
        assert!(matches!(err, EmailError::RenderOverflow { limit: 10, .. }));
    }

    #[test]
    fn test_errors_abort_whole_render() {
        let err = render_node(&node(json!({
            "type": "container",
            "children": [
                { "type": "text", "children": "fine" },
                { "type": "link", "children": "no href" }
            ]
        })))
        .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_render_is_deterministic() {
        let tree = node(json!({
            "type": "section",
            "props": { "style": { "padding": "10px" } },
            "children": [{ "type": "button", "props": { "href": "#", "style": { "padding": "8px 16px" } }, "children": "Go" }]
        }));
        assert_eq!(render_node(&tree).unwrap(), render_node(&tree).unwrap());
    }
}
