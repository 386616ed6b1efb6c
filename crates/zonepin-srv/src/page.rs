//! HTML page rendering.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::SrvError;
use crate::status::Status;

const INDEX: &str = "index";

/// Data rendered into the index page.
#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub domain: &'a str,
    pub host: &'a str,
    pub addresses: &'a [String],
    pub status: String,
    pub is_error: bool,
}

impl<'a> PageView<'a> {
    pub fn new(domain: &'a str, host: &'a str, addresses: &'a [String], status: &Status) -> Self {
        Self {
            domain,
            host,
            addresses,
            status: status.message(),
            is_error: status.is_error(),
        }
    }
}

/// Compiled page templates.
pub struct Page {
    handlebars: Handlebars<'static>,
}

impl Page {
    pub fn new() -> crate::Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string(INDEX, include_str!("../templates/index.html.hbs"))
            .map_err(|e| SrvError::Template(e.to_string()))?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, view: &PageView<'_>) -> crate::Result<String> {
        self.handlebars
            .render(INDEX, view)
            .map_err(|e| SrvError::Template(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_addresses_and_status() {
        let page = Page::new().unwrap();
        let addresses = vec!["10.0.0.1".to_string(), "2001:db8::1".to_string()];
        let html = page
            .render(&PageView::new(
                "example.com",
                "www",
                &addresses,
                &Status::Done {
                    backup_failed: false,
                },
            ))
            .unwrap();

        assert!(html.contains("www.example.com"));
        assert!(html.contains("<li><code>10.0.0.1</code></li>"));
        assert!(html.contains("<li><code>2001:db8::1</code></li>"));
        assert!(html.contains("All done"));
        assert!(!html.contains("status error"));
    }

    #[test]
    fn test_render_escapes_submitted_token() {
        let page = Page::new().unwrap();
        let html = page
            .render(&PageView::new(
                "example.com",
                "www",
                &[],
                &Status::InvalidAddress("<script>".into()),
            ))
            .unwrap();

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("status error"));
        assert!(html.contains("No records."));
    }
}
