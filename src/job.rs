// src/job.rs
//! Print requests: the loose wire payload and the validated job built from it.
use crate::error::PrintError;
use printdesk_margins::{MarginSpec, MarginType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A print request as submitted by a client.
///
/// Every field is coerced the way a lenient client expects: wrong types fall
/// back to the field's default instead of rejecting the request. Text fields
/// also accept numbers. A request is only refused when neither `html` nor
/// `url` carries content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintPayload {
    pub html: Option<Value>,
    pub url: Option<Value>,
    pub printer_name: Option<Value>,
    pub copies: Option<Value>,
    pub landscape: Option<Value>,
    pub print_background: Option<Value>,
    pub preview: Option<Value>,
    pub margin_type: Option<Value>,
    pub margins: Option<Value>,
}

/// Where the page content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    Html(String),
    Url(String),
}

/// A validated print job.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintJob {
    pub content: ContentSource,
    /// `None` prints to the system default printer.
    pub printer_name: Option<String>,
    /// Always at least 1.
    pub copies: u32,
    pub landscape: bool,
    pub print_background: bool,
    pub preview: bool,
    pub margin_type: MarginType,
    /// Only consulted for [`MarginType::Custom`].
    pub margins: Option<MarginSpec>,
}

impl PrintJob {
    /// A job with every option at its default.
    pub fn new(content: ContentSource) -> Self {
        Self {
            content,
            printer_name: None,
            copies: 1,
            landscape: false,
            print_background: true,
            preview: false,
            margin_type: MarginType::Default,
            margins: None,
        }
    }

    pub fn from_html(html: impl Into<String>) -> Self {
        Self::new(ContentSource::Html(html.into()))
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self::new(ContentSource::Url(url.into()))
    }

    /// Short description for log lines.
    pub fn describe(&self) -> String {
        let target = match &self.content {
            ContentSource::Url(url) => url.clone(),
            ContentSource::Html(html) => format!("inline html ({} bytes)", html.len()),
        };
        let path = if self.preview { "preview" } else { "print" };
        format!("{} of {}", path, target)
    }
}

impl TryFrom<PrintPayload> for PrintJob {
    type Error = PrintError;

    /// Fails only when neither `url` nor `html` carries content. When both
    /// do, the URL is used.
    fn try_from(payload: PrintPayload) -> Result<Self, Self::Error> {
        let content = match (text(payload.url), text(payload.html)) {
            (Some(url), _) => ContentSource::Url(url),
            (None, Some(html)) => ContentSource::Html(html),
            (None, None) => return Err(PrintError::InvalidPayload),
        };

        let margin_type = match payload.margin_type {
            Some(Value::String(name)) => MarginType::from_name(&name),
            _ => MarginType::Default,
        };

        let margins = payload
            .margins
            .filter(Value::is_object)
            .and_then(|value| serde_json::from_value::<MarginSpec>(value).ok());

        Ok(PrintJob {
            content,
            printer_name: text(payload.printer_name),
            copies: copies_from(payload.copies.as_ref()),
            landscape: payload.landscape.as_ref().is_some_and(truthy),
            print_background: !matches!(payload.print_background, Some(Value::Bool(false))),
            preview: payload.preview.as_ref().is_some_and(truthy),
            margin_type,
            margins,
        })
    }
}

/// Non-empty strings, and numbers in their display form. Anything else is absent.
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Positive whole numbers are kept; anything else becomes 1.
fn copies_from(value: Option<&Value>) -> u32 {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.fract() == 0.0 && *n >= 1.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32)
        .unwrap_or(1)
}

/// Loose truthiness: `null`, `false`, `0` and `""` are false, anything else true.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
