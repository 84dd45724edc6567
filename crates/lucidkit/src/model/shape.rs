//! Shapes: positioned, typed diagram nodes

use serde::{Deserialize, Serialize};

use super::Style;
use crate::core::{validate_fraction, validate_id, BoundingBox, LucidError, Result, ShapeType};

pub const DEFAULT_WIDTH: f64 = 50.0;
pub const DEFAULT_HEIGHT: f64 = 50.0;

/// Inset of the arms of a cross, as fractions of the bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossIndent {
    pub x: f64,
    pub y: f64,
}

/// A shape on a page
///
/// The identifier is empty until the shape is given one explicitly with
/// [`Shape::with_id`] or is inserted into a page, which assigns the next free
/// `shape-<n>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(default)]
    id: String,
    #[serde(rename = "type")]
    pub kind: ShapeType,
    pub bounding_box: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(flatten)]
    pub indent: Option<CrossIndent>,
}

impl Shape {
    /// Create an unplaced shape of the given kind and geometry
    pub fn new(kind: ShapeType, bounding_box: BoundingBox) -> Result<Self> {
        bounding_box.validate()?;
        Ok(Self {
            id: String::new(),
            kind,
            bounding_box,
            text: None,
            style: Style::default(),
            opacity: None,
            note: None,
            indent: None,
        })
    }

    /// Create a shape from loose coordinates
    pub fn create(kind: ShapeType, x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        Self::new(kind, BoundingBox::new(x, y, width, height))
    }

    /// Circle whose bounding box is the diameter square
    pub fn circle(x: f64, y: f64, radius: f64) -> Result<Self> {
        let diameter = radius * 2.0;
        Self::create(ShapeType::Circle, x, y, diameter, diameter)
            .map_err(|_| LucidError::validation("radius", format!("invalid radius {}", radius)))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_id("id", &id)?;
        self.id = id;
        Ok(self)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Opacity in percent, 0 to 100
    pub fn with_opacity(mut self, opacity: u8) -> Result<Self> {
        if opacity > 100 {
            return Err(LucidError::validation(
                "opacity",
                format!("must be at most 100, got {}", opacity),
            ));
        }
        self.opacity = Some(opacity);
        Ok(self)
    }

    /// Arm inset for crosses, each value in `[0, 0.5]`
    pub fn with_indent(mut self, x: f64, y: f64) -> Result<Self> {
        self.indent = Some(CrossIndent { x, y });
        self.validate_indent()?;
        Ok(self)
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

    pub fn position(&self) -> (f64, f64) {
        (self.bounding_box.x, self.bounding_box.y)
    }

    /// Move the shape; geometry is checked again on serialization
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.bounding_box.x = x;
        self.bounding_box.y = y;
    }

    pub fn size(&self) -> (f64, f64) {
        (self.bounding_box.w, self.bounding_box.h)
    }

    /// Check every field, including that an identifier has been assigned
    pub fn validate(&self) -> Result<()> {
        validate_id("id", &self.id)?;
        self.validate_fields()
    }

    /// Check everything except the identifier
    pub(crate) fn validate_fields(&self) -> Result<()> {
        self.bounding_box.validate()?;
        if let Some(opacity) = self.opacity {
            if opacity > 100 {
                return Err(LucidError::validation(
                    "opacity",
                    format!("must be at most 100, got {}", opacity),
                ));
            }
        }
        self.validate_indent()
    }

    fn validate_indent(&self) -> Result<()> {
        let Some(indent) = self.indent else {
            return Ok(());
        };
        if self.kind != ShapeType::Cross {
            return Err(LucidError::validation(
                "indent",
                format!("only crosses take an indent, not {}", self.kind),
            ));
        }
        validate_fraction("x", indent.x, 0.5)?;
        validate_fraction("y", indent.y, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_shape_has_no_id() {
        let shape = Shape::create(ShapeType::Diamond, 10.0, 20.0, 80.0, 60.0).unwrap();
        assert!(!shape.has_id());
        assert_eq!(shape.position(), (10.0, 20.0));
        assert_eq!(shape.size(), (80.0, 60.0));
        assert!(shape.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_size() {
        let err = Shape::create(ShapeType::Rectangle, 0.0, 0.0, -5.0, 10.0).unwrap_err();
        assert_eq!(err.field(), Some("boundingBox.w"));
    }

    #[test]
    fn test_rejects_non_finite_position() {
        let err = Shape::create(ShapeType::Rectangle, f64::NAN, 0.0, 5.0, 10.0).unwrap_err();
        assert_eq!(err.field(), Some("boundingBox.x"));
    }

    #[test]
    fn test_circle_uses_diameter() {
        let circle = Shape::circle(100.0, 150.0, 30.0).unwrap();
        assert_eq!(circle.kind, ShapeType::Circle);
        assert_eq!(circle.bounding_box, BoundingBox::new(100.0, 150.0, 60.0, 60.0));
        assert_eq!(Shape::circle(0.0, 0.0, -1.0).unwrap_err().field(), Some("radius"));
    }

    #[test]
    fn test_with_id_validates() {
        let shape = Shape::create(ShapeType::Cloud, 0.0, 0.0, 60.0, 40.0).unwrap();
        assert!(shape.clone().with_id("bad id").is_err());
        let shape = shape.with_id("cloud.1").unwrap();
        assert_eq!(shape.id(), "cloud.1");
        assert!(shape.validate().is_ok());
    }

    #[test]
    fn test_opacity_range() {
        let shape = Shape::create(ShapeType::Hexagon, 0.0, 0.0, 50.0, 50.0).unwrap();
        assert!(shape.clone().with_opacity(100).is_ok());
        assert_eq!(shape.with_opacity(101).unwrap_err().field(), Some("opacity"));
    }

    #[test]
    fn test_cross_indent() {
        let cross = Shape::create(ShapeType::Cross, 0.0, 0.0, 50.0, 50.0).unwrap();
        assert!(cross.clone().with_indent(0.25, 0.5).is_ok());
        assert_eq!(cross.with_indent(0.6, 0.1).unwrap_err().field(), Some("x"));

        let square = Shape::create(ShapeType::Rectangle, 0.0, 0.0, 50.0, 50.0).unwrap();
        assert_eq!(square.with_indent(0.1, 0.1).unwrap_err().field(), Some("indent"));
    }

    #[test]
    fn test_shape_json_layout() {
        let shape = Shape::create(ShapeType::Cross, 1.0, 2.0, 30.0, 40.0)
            .unwrap()
            .with_id("shape-7")
            .unwrap()
            .with_text("X")
            .with_indent(0.2, 0.3)
            .unwrap();
        let value = serde_json::to_value(&shape).unwrap();
        assert_eq!(value["id"], "shape-7");
        assert_eq!(value["type"], "cross");
        assert_eq!(value["boundingBox"], json!({"x": 1.0, "y": 2.0, "w": 30.0, "h": 40.0}));
        assert_eq!(value["text"], "X");
        assert_eq!(value["x"], 0.2);
        assert_eq!(value["y"], 0.3);
        assert!(value.get("opacity").is_none());
        assert!(value.get("note").is_none());

        let back: Shape = serde_json::from_value(value).unwrap();
        assert_eq!(back, shape);
    }

    #[test]
    fn test_shape_without_indent_reads_back_as_none() {
        let shape = Shape::create(ShapeType::Octagon, 0.0, 0.0, 50.0, 50.0)
            .unwrap()
            .with_id("o")
            .unwrap();
        let json = serde_json::to_string(&shape).unwrap();
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert!(back.indent.is_none());
        assert_eq!(back, shape);
    }
}
