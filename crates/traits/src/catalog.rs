//! PrinterCatalog trait for enumerating the printers visible to the host.
//!
//! Printer discovery is platform specific. Embedders plug in whatever
//! source they have and may chain two of them with [`FallbackCatalog`].

use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;
use thiserror::Error;

/// Error type for printer enumeration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Printer source unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to query printers: {0}")]
    Query(String),
}

/// A printer as reported to API clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrinterInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Driver/source specific key-value details.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl PrinterInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

#[async_trait]
pub trait PrinterCatalog: Send + Sync {
    async fn list(&self) -> Result<Vec<PrinterInfo>, CatalogError>;

    /// Human-readable source name, used in log lines.
    fn name(&self) -> &'static str;
}

/// A catalog backed by a list held in memory.
///
/// Useful for fixed deployments and as a test double.
#[derive(Debug, Default)]
pub struct StaticPrinterCatalog {
    printers: RwLock<Vec<PrinterInfo>>,
}

impl StaticPrinterCatalog {
    pub fn new(printers: Vec<PrinterInfo>) -> Self {
        Self {
            printers: RwLock::new(printers),
        }
    }

    /// Add a printer, replacing any existing entry with the same name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Unavailable` if the internal lock is poisoned.
    pub fn add(&self, printer: PrinterInfo) -> Result<(), CatalogError> {
        let mut printers = self.printers.write().map_err(|_| poisoned())?;
        printers.retain(|p| p.name != printer.name);
        printers.push(printer);
        Ok(())
    }

    /// Remove a printer by name.
    ///
    /// Returns `None` if the lock is poisoned or the printer doesn't exist.
    pub fn remove(&self, name: &str) -> Option<PrinterInfo> {
        let mut printers = self.printers.write().ok()?;
        let index = printers.iter().position(|p| p.name == name)?;
        Some(printers.remove(index))
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.printers.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.printers.read().map(|p| p.is_empty()).unwrap_or(true)
    }
}

fn poisoned() -> CatalogError {
    CatalogError::Unavailable("printer list lock poisoned".to_string())
}

#[async_trait]
impl PrinterCatalog for StaticPrinterCatalog {
    async fn list(&self) -> Result<Vec<PrinterInfo>, CatalogError> {
        let printers = self.printers.read().map_err(|_| poisoned())?;
        Ok(printers.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Queries `primary` first and `fallback` when the primary fails or finds
/// nothing. When both fail the result is an empty list, not an error.
pub struct FallbackCatalog<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackCatalog<P, F>
where
    P: PrinterCatalog,
    F: PrinterCatalog,
{
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P, F> PrinterCatalog for FallbackCatalog<P, F>
where
    P: PrinterCatalog,
    F: PrinterCatalog,
{
    async fn list(&self) -> Result<Vec<PrinterInfo>, CatalogError> {
        match self.primary.list().await {
            Ok(printers) if !printers.is_empty() => return Ok(printers),
            Ok(_) => {}
            Err(e) => warn!("[CATALOG] {} printer source failed: {}", self.primary.name(), e),
        }

        match self.fallback.list().await {
            Ok(printers) => Ok(printers),
            Err(e) => {
                warn!("[CATALOG] {} printer source failed: {}", self.fallback.name(), e);
                Ok(Vec::new())
            }
        }
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
