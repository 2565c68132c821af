//! Margin request and result types.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Margin mode requested for a job.
///
/// Unknown names deserialize to [`MarginType::Default`], so a typo in a
/// request behaves like an omitted field rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarginType {
    None,
    Minimum,
    #[default]
    Default,
    Custom,
}

impl MarginType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "none" => MarginType::None,
            "minimum" => MarginType::Minimum,
            "custom" => MarginType::Custom,
            _ => MarginType::Default,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            MarginType::None => "none",
            MarginType::Minimum => "minimum",
            MarginType::Default => "default",
            MarginType::Custom => "custom",
        }
    }
}

impl fmt::Display for MarginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MarginType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(MarginType::from_name(&name))
    }
}

impl Serialize for MarginType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single side's margin as supplied by the caller: `"16"`, `"12pt"`, `16`.
///
/// Numbers are kept in their textual form so that CSS output reproduces
/// what the caller sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarginValue(String);

impl MarginValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MarginValue {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MarginValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<f64> for MarginValue {
    fn from(value: f64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for MarginValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => MarginValue(text),
            Raw::Number(number) => MarginValue::from(number),
        })
    }
}

impl Serialize for MarginValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Custom margins for the four page sides.
///
/// Sides are optional at the type level because payloads are loosely
/// validated. Only a set with all four sides is usable; anything else makes
/// a custom margin request fall back to the default margins. Missing sides
/// are never filled in with `0`: a set with only `top` and `bottom` yields
/// the default `"1cm"` and [`MarginKind::Default`], not zero side margins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginSpec {
    pub top: Option<MarginValue>,
    pub right: Option<MarginValue>,
    pub bottom: Option<MarginValue>,
    pub left: Option<MarginValue>,
}

impl MarginSpec {
    pub fn new(
        top: impl Into<MarginValue>,
        right: impl Into<MarginValue>,
        bottom: impl Into<MarginValue>,
        left: impl Into<MarginValue>,
    ) -> Self {
        Self {
            top: Some(top.into()),
            right: Some(right.into()),
            bottom: Some(bottom.into()),
            left: Some(left.into()),
        }
    }

    /// The four sides in top/right/bottom/left order, if all are present.
    pub fn sides(&self) -> Option<[&MarginValue; 4]> {
        Some([
            self.top.as_ref()?,
            self.right.as_ref()?,
            self.bottom.as_ref()?,
            self.left.as_ref()?,
        ])
    }

    pub fn is_complete(&self) -> bool {
        self.sides().is_some()
    }
}

/// Discrete margin mode understood by the PDF renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarginKind {
    None,
    Minimum,
    Default,
    Custom,
}

impl MarginKind {
    /// Numeric code used by Chromium-style `marginsType` options.
    pub const fn code(self) -> u8 {
        match self {
            MarginKind::None => 0,
            MarginKind::Minimum => 1,
            MarginKind::Default => 2,
            MarginKind::Custom => 3,
        }
    }
}

impl Serialize for MarginKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Margin values in PDF points (1/72").
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PointMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Margin part of a PDF render request.
///
/// `points` is only set for [`MarginKind::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PdfMarginOptions {
    #[serde(rename = "marginsType")]
    pub kind: MarginKind,
    #[serde(rename = "margins", skip_serializing_if = "Option::is_none")]
    pub points: Option<PointMargins>,
}

impl PdfMarginOptions {
    pub const fn of_kind(kind: MarginKind) -> Self {
        Self { kind, points: None }
    }
}

impl Default for PdfMarginOptions {
    fn default() -> Self {
        Self::of_kind(MarginKind::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn margin_type_names_fall_back_to_default() {
        assert_eq!(MarginType::from_name("none"), MarginType::None);
        assert_eq!(MarginType::from_name("minimum"), MarginType::Minimum);
        assert_eq!(MarginType::from_name("custom"), MarginType::Custom);
        assert_eq!(MarginType::from_name("default"), MarginType::Default);
        assert_eq!(MarginType::from_name("wide"), MarginType::Default);
        assert_eq!(MarginType::from_name("NONE"), MarginType::Default);

        let parsed: MarginType = serde_json::from_value(json!("bogus")).unwrap();
        assert_eq!(parsed, MarginType::Default);
    }

    #[test]
    fn margin_spec_accepts_strings_and_numbers() {
        let spec: MarginSpec = serde_json::from_value(json!({
            "top": "1cm",
            "right": 16,
            "bottom": 0.5,
            "left": "12pt"
        }))
        .unwrap();

        let sides = spec.sides().expect("all sides present");
        assert_eq!(sides[0].as_str(), "1cm");
        assert_eq!(sides[1].as_str(), "16");
        assert_eq!(sides[2].as_str(), "0.5");
        assert_eq!(sides[3].as_str(), "12pt");
    }

    #[test]
    fn margin_spec_with_missing_side_is_incomplete() {
        let spec: MarginSpec = serde_json::from_value(json!({ "top": "1cm" })).unwrap();
        assert!(!spec.is_complete());
        assert!(!MarginSpec::default().is_complete());
    }

    #[test]
    fn pdf_margin_options_serialize_like_chromium_options() {
        let options = PdfMarginOptions {
            kind: MarginKind::Custom,
            points: Some(PointMargins {
                top: 72.0,
                right: 0.0,
                bottom: 36.0,
                left: 0.0,
            }),
        };
        assert_eq!(
            serde_json::to_value(options).unwrap(),
            json!({
                "marginsType": 3,
                "margins": { "top": 72.0, "right": 0.0, "bottom": 36.0, "left": 0.0 }
            })
        );
        assert_eq!(
            serde_json::to_value(PdfMarginOptions::default()).unwrap(),
            json!({ "marginsType": 2 })
        );
    }
}
