// src/pipeline/preparer.rs
use super::readiness::ReadinessWait;
use crate::job::{ContentSource, PrintJob};
use log::debug;
use printdesk_margins::css_margin;
use printdesk_traits::{LoadRequest, PageStyle, RenderSurface, SurfaceError};
use std::sync::Arc;

/// Id of the style element carrying the injected `@page` rule.
pub const MARGIN_STYLE_ID: &str = "print-margins";

/// Loads a job's content into the render surface and applies its margins.
pub struct PagePreparer {
    surface: Arc<dyn RenderSurface>,
    user_agent: String,
    readiness: ReadinessWait,
}

impl PagePreparer {
    pub fn new(
        surface: Arc<dyn RenderSurface>,
        user_agent: impl Into<String>,
        readiness: ReadinessWait,
    ) -> Self {
        Self {
            surface,
            user_agent: user_agent.into(),
            readiness,
        }
    }

    /// Load, wait for the document to complete, then inject the margin rule.
    /// Stops at the first failing step.
    pub async fn prepare(&self, job: &PrintJob) -> Result<(), SurfaceError> {
        let request = load_request(&job.content, &self.user_agent);
        debug!("[PREPARE] Loading {}", job.describe());
        self.surface.load(&request).await?;

        self.readiness.wait(self.surface.as_ref()).await?;

        let style = margin_style(job);
        debug!("[PREPARE] Injecting `{}`", style.css);
        self.surface.inject_style(&style).await
    }
}

/// URLs are fetched under the client identifier; inline HTML becomes a
/// percent-encoded `data:` URI.
pub fn load_request(content: &ContentSource, user_agent: &str) -> LoadRequest {
    match content {
        ContentSource::Url(url) => LoadRequest {
            url: url.clone(),
            user_agent: Some(user_agent.to_string()),
        },
        ContentSource::Html(html) => LoadRequest {
            url: html_data_uri(html),
            user_agent: None,
        },
    }
}

pub fn html_data_uri(html: &str) -> String {
    format!("data:text/html;charset=utf-8,{}", urlencoding::encode(html))
}

pub fn margin_style(job: &PrintJob) -> PageStyle {
    let margin = css_margin(job.margin_type, job.margins.as_ref());
    PageStyle::new(MARGIN_STYLE_ID, format!("@page {{ margin: {} }}", margin))
}
