//! Lines: connectors between shapes (or onto other lines)

use serde::{Deserialize, Serialize};

use super::Stroke;
use crate::core::{
    validate_fraction, validate_id, EndpointStyle, LineType, LucidError, Result, TextSide,
};

/// Relative attachment point on a shape, each axis in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor { x: 0.5, y: 0.5 };
}

impl Default for Anchor {
    fn default() -> Self {
        Self::CENTER
    }
}

/// One end of a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Endpoint {
    #[serde(rename_all = "camelCase")]
    ShapeEndpoint {
        #[serde(default)]
        style: EndpointStyle,
        shape_id: String,
        #[serde(default)]
        position: Anchor,
    },
    #[serde(rename_all = "camelCase")]
    LineEndpoint {
        #[serde(default)]
        style: EndpointStyle,
        line_id: String,
        position: f64,
    },
}

impl Endpoint {
    /// Attach to the centre of a shape
    pub fn shape(shape_id: impl Into<String>) -> Self {
        Endpoint::ShapeEndpoint {
            style: EndpointStyle::default(),
            shape_id: shape_id.into(),
            position: Anchor::CENTER,
        }
    }

    /// Attach to a point along another line, `position` in `[0, 1]`
    pub fn line(line_id: impl Into<String>, position: f64) -> Result<Self> {
        validate_fraction("position", position, 1.0)?;
        Ok(Endpoint::LineEndpoint {
            style: EndpointStyle::default(),
            line_id: line_id.into(),
            position,
        })
    }

    pub fn with_style(mut self, new_style: EndpointStyle) -> Self {
        match &mut self {
            Endpoint::ShapeEndpoint { style, .. } | Endpoint::LineEndpoint { style, .. } => {
                *style = new_style
            }
        }
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Result<Self> {
        validate_fraction("position.x", anchor.x, 1.0)?;
        validate_fraction("position.y", anchor.y, 1.0)?;
        match &mut self {
            Endpoint::ShapeEndpoint { position, .. } => *position = anchor,
            Endpoint::LineEndpoint { .. } => {
                return Err(LucidError::validation(
                    "position",
                    "anchors apply to shape endpoints only",
                ))
            }
        }
        Ok(self)
    }

    pub fn style(&self) -> EndpointStyle {
        match self {
            Endpoint::ShapeEndpoint { style, .. } | Endpoint::LineEndpoint { style, .. } => *style,
        }
    }

    pub fn shape_id(&self) -> Option<&str> {
        match self {
            Endpoint::ShapeEndpoint { shape_id, .. } => Some(shape_id),
            Endpoint::LineEndpoint { .. } => None,
        }
    }

    pub fn line_id(&self) -> Option<&str> {
        match self {
            Endpoint::LineEndpoint { line_id, .. } => Some(line_id),
            Endpoint::ShapeEndpoint { .. } => None,
        }
    }

    fn validate(&self, field: &str) -> Result<()> {
        match self {
            Endpoint::ShapeEndpoint {
                shape_id, position, ..
            } => {
                validate_id(&format!("{}.shapeId", field), shape_id)?;
                validate_fraction(&format!("{}.position.x", field), position.x, 1.0)?;
                validate_fraction(&format!("{}.position.y", field), position.y, 1.0)
            }
            Endpoint::LineEndpoint {
                line_id, position, ..
            } => {
                validate_id(&format!("{}.lineId", field), line_id)?;
                validate_fraction(&format!("{}.position", field), *position, 1.0)
            }
        }
    }
}

/// A label placed along a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineText {
    pub text: String,
    #[serde(default = "LineText::default_position")]
    pub position: f64,
    #[serde(default)]
    pub side: TextSide,
}

impl LineText {
    /// Label at the middle of the line
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: Self::default_position(),
            side: TextSide::Middle,
        }
    }

    /// Label at `position` in `[0, 1]` on the given side
    pub fn at(text: impl Into<String>, position: f64, side: TextSide) -> Result<Self> {
        validate_fraction("text.position", position, 1.0)?;
        Ok(Self {
            text: text.into(),
            position,
            side,
        })
    }

    fn default_position() -> f64 {
        0.5
    }
}

/// A connector between two endpoints
///
/// Like shapes, lines start without an identifier; pages assign
/// `line-<n>` on insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    #[serde(default)]
    id: String,
    #[serde(default)]
    pub line_type: LineType,
    pub endpoint1: Endpoint,
    pub endpoint2: Endpoint,
    #[serde(default)]
    pub stroke: Stroke,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<LineText>,
}

impl Line {
    pub fn new(endpoint1: Endpoint, endpoint2: Endpoint, line_type: LineType) -> Self {
        Self {
            id: String::new(),
            line_type,
            endpoint1,
            endpoint2,
            stroke: Stroke::default(),
            text: Vec::new(),
        }
    }

    /// Line from the centre of one shape to the centre of another
    pub fn between(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        line_type: LineType,
    ) -> Self {
        Self::new(Endpoint::shape(source_id), Endpoint::shape(target_id), line_type)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_id("id", &id)?;
        self.id = id;
        Ok(self)
    }

    /// Add a label at the middle of the line
    pub fn with_label(mut self, text: impl Into<String>) -> Self {
        self.text.push(LineText::new(text));
        self
    }

    pub fn with_text(mut self, text: LineText) -> Self {
        self.text.push(text);
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }

    pub(crate) fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    /// Shape the line starts from, if it starts on a shape
    pub fn source(&self) -> Option<&str> {
        self.endpoint1.shape_id()
    }

    /// Shape the line ends on, if it ends on a shape
    pub fn target(&self) -> Option<&str> {
        self.endpoint2.shape_id()
    }

    /// First label, if any
    pub fn label(&self) -> Option<&str> {
        self.text.first().map(|t| t.text.as_str())
    }

    /// Check the line in isolation; endpoint targets are checked by the page
    pub fn validate(&self) -> Result<()> {
        validate_id("id", &self.id)?;
        self.validate_fields()
    }

    /// Check everything except the identifier
    pub(crate) fn validate_fields(&self) -> Result<()> {
        self.endpoint1.validate("endpoint1")?;
        self.endpoint2.validate("endpoint2")?;
        for label in &self.text {
            validate_fraction("text.position", label.position, 1.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_between_defaults() {
        let line = Line::between("shape-1", "shape-2", LineType::Straight);
        assert!(!line.has_id());
        assert_eq!(line.source(), Some("shape-1"));
        assert_eq!(line.target(), Some("shape-2"));
        assert_eq!(line.endpoint1.style(), EndpointStyle::Arrow);
        assert!(line.label().is_none());
    }

    #[test]
    fn test_line_json_layout() {
        let line = Line::between("a", "b", LineType::Elbow)
            .with_id("line-1")
            .unwrap()
            .with_label("Yes");
        let value = serde_json::to_value(&line).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "line-1",
                "lineType": "elbow",
                "endpoint1": {"type": "shapeEndpoint", "style": "arrow", "shapeId": "a", "position": {"x": 0.5, "y": 0.5}},
                "endpoint2": {"type": "shapeEndpoint", "style": "arrow", "shapeId": "b", "position": {"x": 0.5, "y": 0.5}},
                "stroke": {},
                "text": [{"text": "Yes", "position": 0.5, "side": "middle"}]
            })
        );
        let back: Line = serde_json::from_value(value).unwrap();
        assert_eq!(back, line);
    }

    #[test]
    fn test_line_endpoint_json() {
        let endpoint = Endpoint::line("line-3", 0.25)
            .unwrap()
            .with_style(EndpointStyle::None);
        let value = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(
            value,
            json!({"type": "lineEndpoint", "style": "none", "lineId": "line-3", "position": 0.25})
        );
        assert_eq!(endpoint.line_id(), Some("line-3"));
        assert_eq!(endpoint.shape_id(), None);
    }

    #[test]
    fn test_position_ranges() {
        assert!(Endpoint::line("l", 1.5).is_err());
        assert!(LineText::at("x", -0.1, TextSide::Top).is_err());
        assert!(Endpoint::shape("s").with_anchor(Anchor { x: 1.0, y: 0.0 }).is_ok());
        let err = Endpoint::shape("s")
            .with_anchor(Anchor { x: 1.2, y: 0.0 })
            .unwrap_err();
        assert_eq!(err.field(), Some("position.x"));
    }

    #[test]
    fn test_validate_requires_id() {
        let line = Line::between("a", "b", LineType::Curved);
        assert_eq!(line.validate().unwrap_err().field(), Some("id"));
        assert!(line.with_id("l1").unwrap().validate().is_ok());
    }

    #[test]
    fn test_text_defaults_when_reading() {
        let label: LineText = serde_json::from_value(json!({"text": "No"})).unwrap();
        assert_eq!(label, LineText::new("No"));
    }
}
