//! Built-in email components.
//!
//! Each component is a typed property struct deserialized from the node's
//! validated props, plus a [`Component`] impl that turns it into markup.
//! Children have already been rendered by the time a component sees them.

mod button;
mod code;
mod content;
mod layout;
mod special;
mod structure;

pub use button::Button;
pub use code::{CodeBlock, CodeInline};
pub use content::{Heading, Hr, Image, Link, Text};
pub use layout::{Column, Container, Row, Section};
pub use special::{Font, Markdown, Preview};
pub use structure::{Body, Head, Html};

use crate::registry::{PropDef, PropType, Registry};

/// Shared `style` property definition.
pub(crate) const STYLE_PROP: PropDef =
    PropDef::optional("style", PropType::Style, "Inline CSS applied to the element");

/// Shared `children` property for types whose children are rendered markup.
pub(crate) const MARKUP_CHILDREN_PROP: PropDef = PropDef::optional(
    "children",
    PropType::String,
    "Content rendered inside the element",
);

/// Shared attribute fragment used by every table-based layout type.
pub(crate) const PRESENTATION_TABLE: &str =
    "align=\"center\" width=\"100%\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\"";

pub(crate) fn register_builtins(registry: &mut Registry) {
    registry.register::<Html>();
    registry.register::<Head>();
    registry.register::<Body>();
    registry.register::<Container>();
    registry.register::<Section>();
    registry.register::<Row>();
    registry.register::<Column>();
    registry.register::<Text>();
    registry.register::<Heading>();
    registry.register::<Link>();
    registry.register::<Button>();
    registry.register::<Image>();
    registry.register::<Hr>();
    registry.register::<Preview>();
    registry.register::<Font>();
    registry.register::<CodeInline>();
    registry.register::<CodeBlock>();
    registry.register::<Markdown>();
}

#[cfg(test)]
pub(crate) fn render_props<C: crate::registry::Component>(
    props: serde_json::Value,
) -> crate::error::EmailResult<String> {
    let props = props.as_object().cloned().unwrap_or_default();
    C::CONTRACT.validate(&props)?;
    let component: C = serde_json::from_value(serde_json::Value::Object(props))?;
    component.render(&crate::config::RenderOptions::default())
}
