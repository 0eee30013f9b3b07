use serde_json::{Map, Value};

use crate::config::{Budget, RenderOptions};
use crate::error::{EmailError, EmailResult};
use crate::style::value_kind;

/// Raw node properties, in input order.
pub type Props = Map<String, Value>;

/// One entry of a node's children: literal text or a nested node.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Text(String),
    Node(Node),
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

/// A requested element: a type name, its properties and its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: String,
    pub props: Props,
    pub children: Vec<Child>,
}

impl Node {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Build a node from untrusted JSON. `path` locates the value in the
    /// input and is reported back in [`EmailError::InvalidNode`].
    pub fn from_value(value: &Value, path: &str) -> EmailResult<Node> {
        Node::from_value_with(value, path, &RenderOptions::default())
    }

    /// Like [`Node::from_value`], but with the depth and node limits of `options`.
    pub fn from_value_with(value: &Value, path: &str, options: &RenderOptions) -> EmailResult<Node> {
        Reader::new(options).node(value, path, 0)
    }
}

/// Normalize a `children` value (string, array or null) into a child list.
pub fn children_from_value(value: &Value, path: &str) -> EmailResult<Vec<Child>> {
    children_from_value_with(value, path, 0, &RenderOptions::default())
}

/// Children of a node sitting at `depth`, within the limits of `options`.
pub fn children_from_value_with(
    value: &Value,
    path: &str,
    depth: usize,
    options: &RenderOptions,
) -> EmailResult<Vec<Child>> {
    Reader::new(options).children(value, path, depth)
}

/// JSON to node conversion, bounded like rendering is.
struct Reader {
    budget: Budget,
}

impl Reader {
    fn new(options: &RenderOptions) -> Self {
        Self {
            budget: Budget::new(options),
        }
    }

    fn node(&mut self, value: &Value, path: &str, depth: usize) -> EmailResult<Node> {
        self.budget.enter(depth)?;
        let object = value.as_object().ok_or_else(|| EmailError::InvalidNode {
            path: path.to_string(),
            reason: format!("expected an object with a 'type', got {}", value_kind(value)),
        })?;

        let kind = match object.get("type") {
            Some(Value::String(kind)) if !kind.is_empty() => kind.clone(),
            Some(Value::String(_)) => {
                return Err(EmailError::InvalidNode {
                    path: path.to_string(),
                    reason: "'type' must not be empty".to_string(),
                })
            }
            Some(other) => {
                return Err(EmailError::InvalidNode {
                    path: path.to_string(),
                    reason: format!("'type' must be a string, got {}", value_kind(other)),
                })
            }
            None => {
                return Err(EmailError::InvalidNode {
                    path: path.to_string(),
                    reason: "missing 'type'".to_string(),
                })
            }
        };

        let mut props = match object.get("props") {
            None | Some(Value::Null) => Props::new(),
            Some(Value::Object(props)) => props.clone(),
            Some(other) => {
                return Err(EmailError::InvalidNode {
                    path: path.to_string(),
                    reason: format!("'props' must be an object, got {}", value_kind(other)),
                })
            }
        };

        // Node-level children win; `props.children` is only a fallback.
        let prop_children = props.remove("children");
        let children = match object.get("children") {
            Some(value) if !value.is_null() => {
                self.children(value, &format!("{}.children", path), depth)?
            }
            _ => match prop_children {
                Some(value) => self.children(&value, &format!("{}.props.children", path), depth)?,
                None => Vec::new(),
            },
        };

        Ok(Node {
            kind,
            props,
            children,
        })
    }

    fn children(&mut self, value: &Value, path: &str, depth: usize) -> EmailResult<Vec<Child>> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::String(text) => Ok(vec![Child::Text(text.clone())]),
            Value::Array(items) => {
                let mut children = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, index);
                    let child = match item {
                        Value::String(text) => Child::Text(text.clone()),
                        Value::Object(_) => Child::Node(self.node(item, &item_path, depth + 1)?),
                        other => {
                            return Err(EmailError::InvalidNode {
                                path: item_path,
                                reason: format!(
                                    "a child must be a string or a node, got {}",
                                    value_kind(other)
                                ),
                            })
                        }
                    };
                    children.push(child);
                }
                Ok(children)
            }
            other => Err(EmailError::InvalidNode {
                path: path.to_string(),
                reason: format!(
                    "children must be a string or an array, got {}",
                    value_kind(other)
                ),
            }),
        }
    }
}

/// A render request: optional subject line plus the root component.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub subject: Option<String>,
    pub component: Node,
}

impl Document {
    pub fn new(component: Node) -> Self {
        Self {
            subject: None,
            component,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn from_json(json: &str) -> EmailResult<Document> {
        Document::from_json_with(json, &RenderOptions::default())
    }

    /// Parse a document, applying the depth and node limits of `options`.
    ///
    /// The JSON parser stops at 128 nested arrays and objects, which is
    /// about 63 node levels. Hitting that is reported as an overflow too.
    pub fn from_json_with(json: &str, options: &RenderOptions) -> EmailResult<Document> {
        let value: Value = serde_json::from_str(json).map_err(|err| {
            if err.to_string().starts_with("recursion limit exceeded") {
                Budget::new(options).too_deep()
            } else {
                EmailError::from(err)
            }
        })?;
        Document::from_value_with(value, options)
    }

    pub fn from_value_with(value: Value, options: &RenderOptions) -> EmailResult<Document> {
        let object = value.as_object().ok_or_else(|| {
            EmailError::ValidationError(format!(
                "document must be an object, got {}",
                value_kind(&value)
            ))
        })?;

        let subject = match object.get("subject") {
            None | Some(Value::Null) => None,
            Some(Value::String(subject)) => Some(subject.clone()),
            Some(other) => {
                return Err(EmailError::invalid_property(
                    "document",
                    "subject",
                    format!("expected a string, got {}", value_kind(other)),
                ))
            }
        };

        let component = object
            .get("component")
            .ok_or_else(|| EmailError::ValidationError("missing 'component'".to_string()))?;

        Ok(Document {
            subject,
            component: Node::from_value_with(component, "component", options)?,
        })
    }
}

impl TryFrom<Value> for Document {
    type Error = EmailError;

    fn try_from(value: Value) -> EmailResult<Document> {
        Document::from_value_with(value, &RenderOptions::default())
    }
}
