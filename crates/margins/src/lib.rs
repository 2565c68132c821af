//! Margin handling for print jobs.
//!
//! A job carries a [`MarginType`] and, for custom margins, a [`MarginSpec`]
//! with four loosely-typed side values (`"16"`, `"12pt"`, `"0.5cm"`, ...).
//! Two independent projections are derived from them:
//!
//! - [`css_margin`]: the value used inside an injected `@page { margin: ... }`
//!   rule, which controls layout when printing straight to a device.
//! - [`pdf_margin_options`]: the discrete [`MarginKind`] plus point values
//!   used when the page is exported to PDF.
//!
//! Every function here is pure. Unitless magnitudes are pixels in both
//! projections.

mod calculator;
pub mod parsers;
mod types;

pub use calculator::{css_margin, normalize_for_css, pdf_margin_options, to_points};
pub use parsers::{LengthUnit, leading_number};
pub use types::{MarginKind, MarginSpec, MarginType, MarginValue, PdfMarginOptions, PointMargins};
