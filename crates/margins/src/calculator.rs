//! CSS and PDF margin projections.
use crate::parsers::{LengthUnit, leading_number, magnitude_with_unit};
use crate::types::{
    MarginKind, MarginSpec, MarginType, MarginValue, PdfMarginOptions, PointMargins,
};

const MINIMUM_CSS_MARGIN: &str = "0.5cm";
const DEFAULT_CSS_MARGIN: &str = "1cm";

/// Normalizes a single margin value for a CSS `@page` rule.
///
/// Empty input and `"0"` become `"0"`. Values containing a letter are taken
/// to carry their own unit and pass through untouched. Bare magnitudes get a
/// `px` suffix; anything unparseable becomes `"0"`.
pub fn normalize_for_css(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() || value == "0" {
        return "0".to_string();
    }
    if value.chars().any(|c| c.is_ascii_alphabetic()) {
        return value.to_string();
    }
    match leading_number(value) {
        Some(number) => format!("{}px", number),
        None => "0".to_string(),
    }
}

/// Converts a margin value to PDF points.
///
/// Accepts `<magnitude><unit>?` with units `px`, `pt`, `mm`, `cm` and `in`
/// (case-insensitive); a missing unit means pixels at 96 DPI. Input that does
/// not fit that shape is still read as pixels if it starts with a number,
/// otherwise the result is `0`.
pub fn to_points(value: &str) -> f64 {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty() {
        return 0.0;
    }

    let (number, unit) = match magnitude_with_unit(&value) {
        Ok((_, (magnitude, unit))) => {
            (leading_number(magnitude), unit.unwrap_or(LengthUnit::Px))
        }
        Err(_) => (leading_number(&value), LengthUnit::Px),
    };

    match number {
        Some(number) => number * unit.points_per_unit(),
        None => 0.0,
    }
}

/// The margin value for the injected `@page { margin: ... }` rule.
pub fn css_margin(margin_type: MarginType, margins: Option<&MarginSpec>) -> String {
    match margin_type {
        MarginType::None => "0".to_string(),
        MarginType::Minimum => MINIMUM_CSS_MARGIN.to_string(),
        MarginType::Custom => match margins.and_then(MarginSpec::sides) {
            Some(sides) => sides
                .iter()
                .map(|side| normalize_for_css(side.as_str()))
                .collect::<Vec<_>>()
                .join(" "),
            None => DEFAULT_CSS_MARGIN.to_string(),
        },
        MarginType::Default => DEFAULT_CSS_MARGIN.to_string(),
    }
}

/// The margin options for a PDF export.
pub fn pdf_margin_options(
    margin_type: MarginType,
    margins: Option<&MarginSpec>,
) -> PdfMarginOptions {
    match margin_type {
        MarginType::None => PdfMarginOptions::of_kind(MarginKind::None),
        MarginType::Minimum => PdfMarginOptions::of_kind(MarginKind::Minimum),
        MarginType::Custom => match margins.and_then(MarginSpec::sides) {
            Some([top, right, bottom, left]) => PdfMarginOptions {
                kind: MarginKind::Custom,
                points: Some(PointMargins {
                    top: side_points(top),
                    right: side_points(right),
                    bottom: side_points(bottom),
                    left: side_points(left),
                }),
            },
            None => PdfMarginOptions::of_kind(MarginKind::Default),
        },
        MarginType::Default => PdfMarginOptions::of_kind(MarginKind::Default),
    }
}

fn side_points(value: &MarginValue) -> f64 {
    to_points(value.as_str())
}
