//! Fill and stroke styling for shapes and lines

use serde::{Deserialize, Serialize};

use crate::core::{Color, StrokeStyle};

/// Interior fill of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fill {
    Color { color: Color },
}

impl Fill {
    pub fn color(color: Color) -> Self {
        Fill::Color { color }
    }
}

impl Default for Fill {
    fn default() -> Self {
        Fill::color(Color::white())
    }
}

/// Outline of a shape or the body of a line
///
/// Unset fields are left to the service's defaults and omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StrokeStyle>,
}

impl Stroke {
    pub fn new(color: Color, width: u32, style: StrokeStyle) -> Self {
        Self {
            color: Some(color),
            width: Some(width),
            style: Some(style),
        }
    }

    /// Solid stroke of the given colour and width
    pub fn solid(color: Color, width: u32) -> Self {
        Self::new(color, width, StrokeStyle::Solid)
    }
}

/// Visual style of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default)]
    pub fill: Fill,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding: Option<u32>,
}

impl Style {
    /// Style with the given fill and stroke, no rounding
    pub fn new(fill: Color, stroke: Stroke) -> Self {
        Self {
            fill: Fill::color(fill),
            stroke: Some(stroke),
            rounding: None,
        }
    }

    pub fn with_rounding(mut self, rounding: u32) -> Self {
        self.rounding = Some(rounding);
        self
    }
}

impl Default for Style {
    /// White fill with a 1px solid black outline
    fn default() -> Self {
        Self {
            fill: Fill::default(),
            stroke: Some(Stroke::solid(Color::black(), 1)),
            rounding: None,
        }
    }
}
