//! Core type definitions
//!
//! Enumerated tags understood by the Lucid standard import format (shape
//! kinds, line types, stroke and endpoint styles), plus the small value types
//! shared by the models: colours and bounding boxes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{LucidError, Result};

/// Shape kinds supported by the standard import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeType {
    #[default]
    Rectangle,
    Circle,
    Cloud,
    Diamond,
    Cross,
    Hexagon,
    Octagon,
    #[serde(alias = "isocolesTriangle")]
    IsoscelesTriangle,
    RightTriangle,
}

impl ShapeType {
    pub const ALL: [ShapeType; 9] = [
        ShapeType::Rectangle,
        ShapeType::Circle,
        ShapeType::Cloud,
        ShapeType::Diamond,
        ShapeType::Cross,
        ShapeType::Hexagon,
        ShapeType::Octagon,
        ShapeType::IsoscelesTriangle,
        ShapeType::RightTriangle,
    ];

    /// Wire name of this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Circle => "circle",
            ShapeType::Cloud => "cloud",
            ShapeType::Diamond => "diamond",
            ShapeType::Cross => "cross",
            ShapeType::Hexagon => "hexagon",
            ShapeType::Octagon => "octagon",
            ShapeType::IsoscelesTriangle => "isoscelesTriangle",
            ShapeType::RightTriangle => "rightTriangle",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeType {
    type Err = LucidError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "isocolesTriangle" {
            return Ok(ShapeType::IsoscelesTriangle);
        }
        ShapeType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| LucidError::validation("type", format!("unknown shape type '{}'", s)))
    }
}

/// Routing style of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineType {
    #[default]
    Straight,
    Elbow,
    Curved,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Straight => "straight",
            LineType::Elbow => "elbow",
            LineType::Curved => "curved",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineType {
    type Err = LucidError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "straight" => Ok(LineType::Straight),
            "elbow" => Ok(LineType::Elbow),
            "curved" => Ok(LineType::Curved),
            _ => Err(LucidError::validation(
                "lineType",
                format!("unknown line type '{}'", s),
            )),
        }
    }
}

/// Dash pattern of a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Arrowhead drawn at a line endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndpointStyle {
    None,
    Aggregation,
    #[default]
    Arrow,
    HollowArrow,
    OpenArrow,
    Async1,
    Async2,
    ClosedSquare,
    OpenSquare,
    BpmnConditional,
    BpmnDefault,
    ClosedCircle,
    OpenCircle,
    Composition,
    ExactlyOne,
    Generalization,
    Many,
    Nesting,
    One,
    OneOrMore,
    ZeroOrMore,
    ZeroOrOne,
}

/// Which side of a line its label sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextSide {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Hexadecimal colour, `#RGB` or `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        let digits = value.strip_prefix('#').unwrap_or("");
        let well_formed = value.starts_with('#')
            && matches!(digits.len(), 3 | 6)
            && digits.chars().all(|c| c.is_ascii_hexdigit());
        if !well_formed {
            return Err(LucidError::validation(
                "color",
                format!("'{}' is not a #RGB or #RRGGBB colour", value),
            ));
        }
        Ok(Self(value))
    }

    pub fn white() -> Self {
        Self("#ffffff".to_string())
    }

    pub fn black() -> Self {
        Self("#000000".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Color {
    type Error = LucidError;

    fn try_from(value: String) -> Result<Self> {
        Color::new(value)
    }
}

impl TryFrom<&str> for Color {
    type Error = LucidError;

    fn try_from(value: &str) -> Result<Self> {
        Color::new(value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position and size of a shape, in page units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Check that every value is finite and the size is non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("x", self.x), ("y", self.y), ("w", self.w), ("h", self.h)] {
            if !value.is_finite() {
                return Err(LucidError::validation(
                    format!("boundingBox.{}", name),
                    format!("must be finite, got {}", value),
                ));
            }
        }
        if self.w < 0.0 {
            return Err(LucidError::validation("boundingBox.w", "must not be negative"));
        }
        if self.h < 0.0 {
            return Err(LucidError::validation("boundingBox.h", "must not be negative"));
        }
        Ok(())
    }

    /// Centre point of the box
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(0.0, 0.0, 50.0, 50.0)
    }
}

/// Check a caller-supplied identifier against the service's rules:
/// 1 to 36 characters from `[A-Za-z0-9-_.~]`
pub fn validate_id(field: &str, id: &str) -> Result<()> {
    if id.is_empty() || id.chars().count() > 36 {
        return Err(LucidError::validation(
            field,
            format!("identifier '{}' must be 1 to 36 characters long", id),
        ));
    }
    if let Some(bad) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~')))
    {
        return Err(LucidError::validation(
            field,
            format!("identifier '{}' contains invalid character '{}'", id, bad),
        ));
    }
    Ok(())
}

/// Check that `value` lies in `[0, max]`
pub(crate) fn validate_fraction(field: &str, value: f64, max: f64) -> Result<()> {
    if !(value.is_finite() && (0.0..=max).contains(&value)) {
        return Err(LucidError::validation(
            field,
            format!("must be between 0.0 and {:.1}, got {}", max, value),
        ));
    }
    Ok(())
}
