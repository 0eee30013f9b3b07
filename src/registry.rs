//! Built-in component registry.
//!
//! Every built-in type pairs a static [`Contract`] describing its properties
//! with a typed render function. The registry is built on first use and
//! never changes afterwards, so lookups need no locking.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::components;
use crate::config::RenderOptions;
use crate::document::Props;
use crate::error::{EmailError, EmailResult};
use crate::style::{value_kind, StyleMap};

/// How a component consumes its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildrenMode {
    /// Children are rendered first and passed in as one HTML string.
    Markup,
    /// Children must be plain strings; they are passed in unescaped and joined.
    Text,
    /// Children are ignored.
    None,
}

impl fmt::Display for ChildrenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildrenMode::Markup => f.write_str("markup"),
            ChildrenMode::Text => f.write_str("text"),
            ChildrenMode::None => f.write_str("none"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Structure,
    Layout,
    Content,
    Special,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Structure => f.write_str("Structure"),
            Category::Layout => f.write_str("Layout"),
            Category::Content => f.write_str("Content"),
            Category::Special => f.write_str("Special"),
        }
    }
}

/// Accepted JSON shape of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropType {
    String,
    Number,
    /// CSS length: a string, or a number meaning pixels.
    Length,
    Boolean,
    /// Object of CSS properties with string or number values.
    Style,
    /// Object of style objects keyed by element name.
    StyleTable,
    Enum(&'static [&'static str]),
    /// One of the allowed values, or an array of them.
    EnumList(&'static [&'static str]),
    Object,
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropType::String => f.write_str("string"),
            PropType::Number => f.write_str("number"),
            PropType::Length => f.write_str("string | number"),
            PropType::Boolean => f.write_str("boolean"),
            PropType::Style => f.write_str("style"),
            PropType::StyleTable => f.write_str("map of styles"),
            PropType::Enum(values) => write!(f, "{}", values.join(" | ")),
            PropType::EnumList(values) => write!(f, "({})[]", values.join(" | ")),
            PropType::Object => f.write_str("object"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropDef {
    pub name: &'static str,
    pub prop_type: PropType,
    pub required: bool,
    pub default: Option<&'static str>,
    pub description: &'static str,
}

impl PropDef {
    pub const fn optional(name: &'static str, prop_type: PropType, description: &'static str) -> Self {
        Self {
            name,
            prop_type,
            required: false,
            default: None,
            description,
        }
    }

    pub const fn required(name: &'static str, prop_type: PropType, description: &'static str) -> Self {
        Self {
            name,
            prop_type,
            required: true,
            default: None,
            description,
        }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        PropDef {
            default: Some(default),
            ..self
        }
    }
}

/// Static description of a built-in type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contract {
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub children: ChildrenMode,
    pub props: &'static [PropDef],
}

impl Contract {
    pub fn prop(&self, name: &str) -> Option<&PropDef> {
        self.props.iter().find(|p| p.name == name)
    }

    /// Check raw props against the contract. `null` counts as absent.
    pub fn validate(&self, props: &Props) -> EmailResult<()> {
        for def in self.props {
            match props.get(def.name) {
                None | Some(Value::Null) => {
                    if def.required {
                        return Err(EmailError::MissingProperty {
                            component: self.name.to_string(),
                            property: def.name.to_string(),
                        });
                    }
                }
                Some(value) => self.check_type(def, value)?,
            }
        }

        for key in props.keys() {
            if self.prop(key).is_none() {
                debug!("{}: ignoring unknown property '{}'", self.name, key);
            }
        }
        Ok(())
    }

    fn check_type(&self, def: &PropDef, value: &Value) -> EmailResult<()> {
        let mismatch = || {
            EmailError::invalid_property(
                self.name,
                def.name,
                format!("expected {}, got {}", def.prop_type, value_kind(value)),
            )
        };
        match def.prop_type {
            PropType::String => value.is_string().then_some(()).ok_or_else(mismatch),
            PropType::Number => value.is_number().then_some(()).ok_or_else(mismatch),
            PropType::Length => (value.is_string() || value.is_number())
                .then_some(())
                .ok_or_else(mismatch),
            PropType::Boolean => value.is_boolean().then_some(()).ok_or_else(mismatch),
            PropType::Object => value.is_object().then_some(()).ok_or_else(mismatch),
            PropType::Style => {
                if !value.is_object() {
                    return Err(mismatch());
                }
                StyleMap::from_value(def.name, value).map(|_| ())
            }
            PropType::StyleTable => {
                let table = value.as_object().ok_or_else(mismatch)?;
                for (key, style) in table {
                    if !style.is_object() {
                        return Err(EmailError::invalid_property(
                            self.name,
                            def.name,
                            format!("entry '{}' must be a style object", key),
                        ));
                    }
                    StyleMap::from_value(key, style)?;
                }
                Ok(())
            }
            PropType::Enum(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => Ok(()),
                _ => Err(EmailError::invalid_property(
                    self.name,
                    def.name,
                    format!("expected one of: {}", allowed.join(", ")),
                )),
            },
            PropType::EnumList(allowed) => {
                let valid = |v: &Value| v.as_str().map_or(false, |s| allowed.contains(&s));
                let ok = match value {
                    Value::Array(items) => !items.is_empty() && items.iter().all(valid),
                    other => valid(other),
                };
                if ok {
                    Ok(())
                } else {
                    Err(EmailError::invalid_property(
                        self.name,
                        def.name,
                        format!("expected one or more of: {}", allowed.join(", ")),
                    ))
                }
            }
        }
    }
}

/// A built-in type: a typed property set that knows how to render itself.
pub trait Component: DeserializeOwned {
    const CONTRACT: Contract;

    fn render(self, options: &RenderOptions) -> EmailResult<String>;
}

type RenderFn = fn(Props, &RenderOptions) -> EmailResult<String>;

fn render_as<C: Component>(props: Props, options: &RenderOptions) -> EmailResult<String> {
    let component: C = serde_json::from_value(Value::Object(props)).map_err(|e| {
        EmailError::ValidationError(format!("{}: {}", C::CONTRACT.name, e))
    })?;
    component.render(options)
}

#[derive(Clone, Copy)]
pub struct Registration {
    pub contract: Contract,
    render: RenderFn,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("contract", &self.contract.name)
            .finish()
    }
}

impl Registration {
    /// Validate `props` against the contract and render.
    pub fn render(&self, props: Props, options: &RenderOptions) -> EmailResult<String> {
        self.contract.validate(&props)?;
        (self.render)(props, options)
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Registration>,
    index: HashMap<&'static str, usize>,
}

impl Registry {
    /// The process-wide registry of built-in types.
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let mut registry = Registry::default();
            components::register_builtins(&mut registry);
            registry
        })
    }

    pub(crate) fn register<C: Component>(&mut self) {
        let contract = C::CONTRACT;
        let registration = Registration {
            contract,
            render: render_as::<C>,
        };
        match self.index.get(contract.name) {
            Some(&slot) => self.entries[slot] = registration,
            None => {
                self.index.insert(contract.name, self.entries.len());
                self.entries.push(registration);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Registration> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Contracts in registration order.
    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.entries.iter().map(|r| &r.contract)
    }
}
