//! # Vane email renderer
//!
//! Compiles a JSON document tree describing an email layout into a single
//! HTML string that mail clients render consistently.
//!
//! ## Features
//! - Table-based layout types (`container`, `section`, `row`, `column`)
//! - Typed, validated properties for every built-in type
//! - Outlook padding workaround for buttons, hidden preview text, markdown
//! - Unknown types pass through as literal HTML tags
//! - Depth and node limits for untrusted input
//!
//! ## Example
//! ```ignore
//! use vane_email::render_email;
//!
//! let json = r#"{
//!   "subject": "Welcome",
//!   "component": {
//!     "type": "container",
//!     "children": [{ "type": "text", "children": "Hello!" }]
//!   }
//! }"#;
//!
//! let html = render_email(json).expect("Failed to render email");
//! ```

pub mod components;
pub mod config;
pub mod document;
pub mod email;
pub mod error;
pub mod guide;
pub mod markdown;
pub mod markup;
pub mod mso;
pub mod padding;
pub mod preview;
pub mod registry;
pub mod renderer;
pub mod style;

// --- Core types ---
pub use config::RenderOptions;
pub use document::{Child, Document, Node, Props};
pub use error::{EmailError, EmailResult, ErrorKind};
pub use registry::{Component, Contract, Registry};
pub use style::{StyleMap, StyleValue};

// --- Rendering ---
pub use email::{generate_email_html, render_document, render_document_with};
pub use guide::component_guide;
pub use renderer::{render, render_node, render_node_with, render_with};

/// Parse a document from JSON and render the full email with default options.
pub fn render_email(json: &str) -> EmailResult<String> {
    render_email_with(json, &RenderOptions::default())
}

pub fn render_email_with(json: &str, options: &RenderOptions) -> EmailResult<String> {
    let document = Document::from_json_with(json, options)?;
    render_document_with(&document, options)
}
