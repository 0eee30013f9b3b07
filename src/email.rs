//! Full email documents: the rendered component inside a fixed-width scaffold.

use log::debug;

use crate::config::RenderOptions;
use crate::document::{Document, Node};
use crate::error::EmailResult;
use crate::markup::escape_html;
use crate::renderer::render_node_with;

const BASE_STYLE: &str = "<style>
    body {
      margin: 0;
      padding: 0;
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
      background-color: #f5f5f5;
    }
    table {
      border-spacing: 0;
      border-collapse: collapse;
    }
  </style>";

/// Render `component` and wrap it in the outer document: doctype, head with
/// the charset, viewport and compatibility metas, optional `<title>`, and a
/// centered 600px content table.
pub fn generate_email_html(
    component: &Node,
    subject: Option<&str>,
    options: &RenderOptions,
) -> EmailResult<String> {
    let content = render_node_with(component, options)?;
    let title = subject
        .map(|subject| format!("<title>{}</title>", escape_html(subject)))
        .unwrap_or_default();
    debug!("assembled email body of {} bytes", content.len());

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <meta http-equiv="X-UA-Compatible" content="IE=edge">
  {title}
  {style}
</head>
<body>
  <table role="presentation" width="100%" cellpadding="0" cellspacing="0" border="0">
    <tr>
      <td align="center" style="padding: 20px 0;">
        <table role="presentation" width="600" cellpadding="0" cellspacing="0" border="0" style="max-width: 600px; background-color: #ffffff;">
          <tr>
            <td style="padding: 20px;">
              {content}
            </td>
          </tr>
        </table>
      </td>
    </tr>
  </table>
</body>
</html>"#,
        lang = escape_html(&options.lang),
        title = title,
        style = BASE_STYLE,
        content = content,
    ))
}

pub fn render_document(document: &Document) -> EmailResult<String> {
    render_document_with(document, &RenderOptions::default())
}

pub fn render_document_with(document: &Document, options: &RenderOptions) -> EmailResult<String> {
    generate_email_html(&document.component, document.subject.as_deref(), options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold() {
        let html = generate_email_html(
            &Node::new("text").child("Hi"),
            Some("Hello & welcome"),
            &RenderOptions::default(),
        )
        .unwrap();
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<title>Hello &amp; welcome</title>"));
        assert!(html.contains("style=\"max-width: 600px; background-color: #ffffff;\""));
        assert!(html.contains(">Hi</p>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_no_title_without_subject() {
        let options = RenderOptions {
            lang: "zh-CN".to_string(),
            ..RenderOptions::default()
        };
        let html = generate_email_html(&Node::new("hr"), None, &options).unwrap();
        assert!(!html.contains("<title>"));
        assert!(html.contains("<html lang=\"zh-CN\">"));
    }

    #[test]
    fn test_errors_produce_no_output() {
        let doc = Document::new(Node::new("button").child("Go"));
        assert!(render_document(&doc).is_err());
    }
}
