//! RenderSurface trait for abstracting the page-rendering engine.
//!
//! The print pipeline drives a single, shared rendering surface (typically a
//! hidden browser view). It never looks inside the surface: everything goes
//! through the six operations of [`RenderSurface`], which lets tests and
//! alternative engines stand in for the real one.

use async_trait::async_trait;
use printdesk_margins::PdfMarginOptions;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Error type for render surface operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SurfaceError {
    #[error("Failed to load '{url}': {message}")]
    Load { url: String, message: String },

    #[error("Script execution failed: {0}")]
    Script(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    /// Device print failure. Carries the engine's reason text verbatim.
    #[error("{0}")]
    Print(String),

    #[error("Failed to reset render surface: {0}")]
    Reset(String),

    #[error("Render surface was not ready after {0:?}")]
    Timeout(Duration),

    #[error("Render surface unavailable: {0}")]
    Unavailable(String),
}

/// What the surface should navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// A remote URL or a `data:` URI.
    pub url: String,
    /// Client identifier to present while fetching, if any.
    pub user_agent: Option<String>,
}

/// A style element to (re)place in the loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageStyle {
    /// Id of the `<style>` element. Any existing element with this id is
    /// removed before the new one is inserted.
    pub element_id: String,
    pub css: String,
}

impl PageStyle {
    pub fn new(element_id: impl Into<String>, css: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            css: css.into(),
        }
    }

    /// A self-contained script performing the replacement, for engines that
    /// are driven through script evaluation.
    ///
    /// Both the id and the CSS are embedded as JSON string literals.
    pub fn to_script(&self) -> String {
        let id = json_literal(&self.element_id);
        let css = json_literal(&self.css);
        format!(
            "(function() {{\n\
             \x20 const existing = document.getElementById({id});\n\
             \x20 if (existing) existing.remove();\n\
             \x20 const style = document.createElement('style');\n\
             \x20 style.id = {id};\n\
             \x20 style.textContent = {css};\n\
             \x20 document.head.appendChild(style);\n\
             }})();"
        )
    }
}

fn json_literal(value: &str) -> String {
    // Serializing a &str cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

/// Options for rendering the current page to PDF bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOptions {
    pub print_background: bool,
    pub landscape: bool,
    #[serde(flatten)]
    pub margins: PdfMarginOptions,
}

/// Options for a silent print to a physical device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceOptions {
    /// Always true: the pipeline never shows a print dialog.
    pub silent: bool,
    /// Target printer; `None` selects the system default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    pub landscape: bool,
    pub copies: u32,
    pub print_background: bool,
}

/// The page-rendering engine consumed by the print pipeline.
///
/// Implementations are shared by every job but are only ever driven by one
/// job at a time; callers serialize access, so implementations need no
/// locking of their own for correctness.
#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// Navigate to `request.url`. Resolves once the navigation was accepted.
    async fn load(&self, request: &LoadRequest) -> Result<(), SurfaceError>;

    /// Resolve once the current document reports it has completely loaded,
    /// immediately if it already has.
    async fn await_ready(&self) -> Result<(), SurfaceError>;

    /// Replace the style element identified by `style.element_id`.
    async fn inject_style(&self, style: &PageStyle) -> Result<(), SurfaceError>;

    /// Render the current document to PDF bytes.
    async fn render_to_pdf(&self, options: &PdfOptions) -> Result<Vec<u8>, SurfaceError>;

    /// Print the current document. Resolves when the device accepted or
    /// rejected the job; rejections carry the reason in
    /// [`SurfaceError::Print`].
    async fn print(&self, options: &DeviceOptions) -> Result<(), SurfaceError>;

    /// Return to a blank document.
    async fn reset(&self) -> Result<(), SurfaceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use printdesk_margins::{MarginKind, PointMargins};
    use serde_json::json;

    #[test]
    fn style_script_replaces_element_by_id() {
        let style = PageStyle::new("print-margins", "@page { margin: 0 }");
        let script = style.to_script();

        assert!(script.contains(r#"document.getElementById("print-margins")"#));
        assert!(script.contains("existing.remove()"));
        assert!(script.contains(r#"style.id = "print-margins";"#));
        assert!(script.contains(r#"style.textContent = "@page { margin: 0 }";"#));
        assert!(script.contains("document.head.appendChild(style)"));
    }

    #[test]
    fn style_script_escapes_css_text() {
        let style = PageStyle::new("m", "@page { margin: 1cm\"; } </style>`${x}`");
        let script = style.to_script();
        assert!(script.contains(r#"\"; } </style>`${x}`"#));
        assert!(!script.contains("1cm\";"));
    }

    #[test]
    fn pdf_options_flatten_margin_fields() {
        let options = PdfOptions {
            print_background: true,
            landscape: false,
            margins: printdesk_margins::PdfMarginOptions {
                kind: MarginKind::Custom,
                points: Some(PointMargins {
                    top: 10.0,
                    right: 10.0,
                    bottom: 10.0,
                    left: 10.0,
                }),
            },
        };
        assert_eq!(
            serde_json::to_value(options).unwrap(),
            json!({
                "printBackground": true,
                "landscape": false,
                "marginsType": 3,
                "margins": { "top": 10.0, "right": 10.0, "bottom": 10.0, "left": 10.0 }
            })
        );
    }

    #[test]
    fn device_options_omit_default_printer() {
        let options = DeviceOptions {
            silent: true,
            device_name: None,
            landscape: true,
            copies: 2,
            print_background: true,
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "silent": true, "landscape": true, "copies": 2, "printBackground": true })
        );
    }
}
