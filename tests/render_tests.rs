use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use vane_email::padding::{parse_padding, Padding};
use vane_email::preview::{PREVIEW_FILLER, PREVIEW_MAX_LENGTH};
use vane_email::{
    mso, render, render_document, render_email, render_email_with, render_node, render_node_with,
    Child, Document, EmailError, ErrorKind, Node, RenderOptions, StyleMap,
};

fn get_fixture_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(filename);
    path
}

fn load_fixture(filename: &str) -> String {
    fs::read_to_string(get_fixture_path(filename)).unwrap()
}

fn node(value: serde_json::Value) -> Node {
    Node::from_value(&value, "component").unwrap()
}

// End-to-end scenarios
#[test]
fn test_container_wraps_text_in_table() {
    let html = render_node(&node(json!({
        "type": "container",
        "children": [{ "type": "text", "children": "Hi" }]
    })))
    .unwrap();
    assert!(html.starts_with("<table "));
    assert!(html.contains("<tbody><tr style=\"width: 100%\"><td><p style="));
    assert!(html.contains(">Hi</p></td></tr></tbody></table>"));
}

#[test]
fn test_button_with_padding_shorthand() {
    let html = render_node(&node(json!({
        "type": "button",
        "props": { "href": "https://x.com", "children": "Go", "style": { "padding": "10px 20px" } }
    })))
    .unwrap();
    assert!(html.contains("padding-top: 10px"));
    assert!(html.contains("<!--[if mso]>"));
    assert!(html.contains("href=\"https://x.com\""));
}

#[test]
fn test_markdown_heading_and_bold() {
    let html = render_node(&node(json!({
        "type": "markdown",
        "children": "# Hi\n\n**bold**"
    })))
    .unwrap();
    let h1 = html.find("<h1").unwrap();
    let paragraph = html.find("</p><p>").unwrap();
    assert!(h1 < paragraph);
    assert!(html.contains("<strong style=\"font-weight:bold\">bold</strong>"));
}

#[test]
fn test_unknown_type_is_passed_through() {
    let html = render_node(&node(json!({ "type": "strong", "children": "x" }))).unwrap();
    assert_eq!(html, "<strong>x</strong>");
}

#[test]
fn test_plain_string_is_escaped() {
    assert_eq!(render(&Child::from("<b>")).unwrap(), "&lt;b&gt;");
}

// Properties
#[test]
fn test_rendering_is_idempotent() {
    let json = load_fixture("welcome.json");
    let first = render_email(&json).unwrap();
    let second = render_email(&json).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_children_keep_input_order() {
    let html = render_node(&node(json!({
        "type": "row",
        "children": [
            { "type": "column", "children": "first" },
            { "type": "column", "children": "second" },
            { "type": "column", "children": "third" }
        ]
    })))
    .unwrap();
    let first = html.find("first").unwrap();
    let second = html.find("second").unwrap();
    let third = html.find("third").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn test_render_does_not_mutate_input() {
    let tree = node(json!({
        "type": "button",
        "props": { "href": "#", "children": "Go" }
    }));
    let before = tree.clone();
    render_node(&tree).unwrap();
    assert_eq!(tree, before);
}

#[test]
fn test_padding_laws() {
    let style = |padding: &str| StyleMap::new().with("padding", padding);
    assert_eq!(parse_padding(&style("15px")), Padding::uniform(15.0));

    let two = parse_padding(&style("10px 20px"));
    assert_eq!((two.top, two.bottom), (Some(10.0), Some(10.0)));
    assert_eq!((two.left, two.right), (Some(20.0), Some(20.0)));

    let four = parse_padding(&style("10px 15px 20px 25px"));
    assert_eq!(
        four,
        Padding {
            top: Some(10.0),
            right: Some(15.0),
            bottom: Some(20.0),
            left: Some(25.0),
        }
    );

    let explicit = parse_padding(&style("10px 20px").with("paddingLeft", "3px"));
    assert_eq!(explicit.left, Some(3.0));
}

#[test]
fn test_mso_bound() {
    assert_eq!(mso::compute_font_width_and_space_count(0.0), Some((0.0, 0)));
    for px in [1.0, 7.5, 12.0, 48.0, 333.0, 1e9, 1e15] {
        let (font_width, _) = mso::compute_font_width_and_space_count(px).unwrap();
        assert!(font_width <= 5.0);
    }
    // Counts too large to represent are reported instead of searched for.
    for px in [1e20, 1e21, 1e300, f64::MAX] {
        assert_eq!(mso::compute_font_width_and_space_count(px), None);
    }
}

#[test]
fn test_button_padding_past_space_limit_overflows() {
    for padding in ["1000000000000000000000000px", "10px 20000px"] {
        let err = render_node(&node(json!({
            "type": "button",
            "props": { "href": "#", "children": "Go", "style": { "padding": padding } }
        })))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RenderOverflow, "padding {}", padding);
        assert_eq!(err.status_code(), 500);
    }
}

#[test]
fn test_preview_length() {
    let html = render_node(&node(json!({ "type": "preview", "children": ["Order ", "#1234 shipped"] })))
        .unwrap();
    let visible = "Order #1234 shipped";
    assert!(html.contains(visible));
    // One filler sequence per missing character.
    let fillers = html.matches(PREVIEW_FILLER).count();
    assert_eq!(visible.chars().count() + fillers, PREVIEW_MAX_LENGTH);
}

// Errors
#[test]
fn test_missing_type_is_invalid_node() {
    let err = render_email(&load_fixture("invalid-missing-type.json")).unwrap_err();
    assert_eq!(
        err,
        EmailError::InvalidNode {
            path: "component.children[1]".to_string(),
            reason: "missing 'type'".to_string(),
        }
    );
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_missing_href_is_validation_error() {
    let err = render_email(&load_fixture("invalid-missing-href.json")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let body = err.response_body();
    assert_eq!(body["error"], "Validation error");
    assert_eq!(
        body["details"],
        "Missing required property 'href' for component 'button'"
    );
}

#[test]
fn test_unsupported_style_value_is_server_error() {
    let err = render_node(&node(json!({
        "type": "container",
        "props": { "style": { "padding": { "top": 4 } } }
    })))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedStyleValue);
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.response_body()["error"], "Internal server error");
}

#[test]
fn test_deep_tree_overflows() {
    let mut tree = Node::new("span").child("deep");
    for _ in 0..100 {
        tree = Node::new("div").child(tree);
    }
    let err = render_node(&tree).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RenderOverflow);

    let options = RenderOptions {
        max_depth: 200,
        ..RenderOptions::default()
    };
    assert!(render_node_with(&tree, &options).is_ok());
}

#[test]
fn test_deep_json_document_overflows() {
    let nested = |levels: usize| {
        let mut component = json!({ "type": "span", "children": "deep" });
        for _ in 0..levels {
            component = json!({ "type": "div", "children": [component] });
        }
        json!({ "component": component }).to_string()
    };

    for levels in [40, 80, 200] {
        let options = RenderOptions {
            max_depth: 30,
            ..RenderOptions::default()
        };
        let err = render_email_with(&nested(levels), &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RenderOverflow, "{} levels", levels);
        assert_eq!(err.status_code(), 500);
    }

    let err = render_email(&nested(80)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RenderOverflow);
    assert!(render_email(&nested(20)).is_ok());
}

#[test]
fn test_malformed_json_is_client_error() {
    let err = render_email("{\"component\": ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert_eq!(err.status_code(), 400);
}

// Fixtures
#[test]
fn test_welcome_fixture() {
    let html = render_email(&load_fixture("welcome.json")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Welcome to Vane</title>"));
    assert!(html.contains("data-skip-in-text=\"true\">Your account is ready<div>"));
    assert!(html.contains("<h1 style=\"margin-bottom: 12px\">Welcome aboard</h1>"));
    assert!(html.contains("Thanks for signing up, <strong>Ada</strong>. Your workspace is ready.</p>"));
    assert!(html.contains("href=\"https://app.example.com/start?ref=welcome&amp;utm=email\""));
    assert!(html.contains("border-radius: 6px"));
    assert!(html.contains("<img src=\"https://cdn.example.com/logo.png\" alt=\"Vane\" width=\"96\""));
    assert!(html.contains(">Help center</a></td>"));
}

#[test]
fn test_footer_fixture() {
    let document = Document::from_json(&load_fixture("footer.json")).unwrap();
    assert!(document.subject.is_none());
    let html = render_node(&document.component).unwrap();
    assert_eq!(
        html,
        "<table align=\"center\" width=\"100%\" border=\"0\" cellpadding=\"0\" cellspacing=\"0\" role=\"presentation\" style=\"background-color: #f4f4f5; padding: 16px\"><tbody><tr><td><p style=\"color: #71717a; font-size: 12px; font-weight: normal; text-align: center; line-height: 24px; margin: 0; padding: 0; margin-top: 16px; margin-bottom: 16px\">You received this email because you signed up. <a href=\"https://example.com/unsubscribe\" target=\"_blank\" style=\"color: #71717a; text-decoration: none\">Unsubscribe</a><br />Example Inc, 1 Market St</p></td></tr></tbody></table>"
    );
}

#[test]
fn test_release_notes_fixture() {
    let document = Document::from_json(&load_fixture("release-notes.json")).unwrap();
    let html = render_document(&document).unwrap();
    assert!(html.contains("<html lang=\"en\" dir=\"ltr\"><head><meta content=\"text/html; charset=UTF-8\""));
    assert!(html.contains("mso-font-alt: 'Helvetica';"));
    assert!(html.contains("<body style=\"background-color: #fafafa; margin: 0px\">"));
    assert!(html.contains("<div data-id=\"react-email-markdown\" style=\"padding:12px\"><h1 "));
    assert!(html.contains("<strong style=\"font-weight:bold\">dark mode</strong>"));
    assert!(html.contains("<li style=\"margin-bottom:5px\">smaller output</li></ul>"));
    assert!(html.contains("<pre data-language=\"bash\""));
    assert!(html.contains(">1</span><span style=\"font-family: monospace\">cargo"));
    assert!(html.contains("<code class=\"cino\">RUST_LOG=debug</code>"));
}

#[test]
fn test_builder_matches_json() {
    let built = Node::new("container").child(Node::new("text").child("Hi"));
    let parsed = node(json!({ "type": "container", "children": [{ "type": "text", "children": "Hi" }] }));
    assert_eq!(render_node(&built).unwrap(), render_node(&parsed).unwrap());
}
