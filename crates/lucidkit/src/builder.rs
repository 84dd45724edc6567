//! Fluent construction of a page
//!
//! ```rust
//! use lucidkit::model::Document;
//!
//! let mut doc = Document::create("Approval");
//! doc.first_page_mut()
//!     .builder()
//!     .add_circle(50.0, 50.0, 30.0, "Start").unwrap()
//!     .add_rectangle(200.0, 40.0, 120.0, 80.0, "Review").unwrap()
//!     .connect_last_two(None).unwrap()
//!     .add_diamond(400.0, 40.0, 100.0, 100.0, "OK?").unwrap()
//!     .connect_last_two(Some("done")).unwrap()
//!     .build();
//!
//! assert_eq!(doc.first_page().shape_count(), 3);
//! assert_eq!(doc.first_page().line_count(), 2);
//! ```

use tracing::debug;

use crate::core::{BoundingBox, LineType, LucidError, Result, ShapeType};
use crate::layout::Layout;
use crate::model::{Page, Shape, ShapeRef};

/// Chains shape creation and connection against one page
///
/// The builder remembers the shapes added through it, in order, so
/// [`PageBuilder::connect_last_two`] can link the two most recent ones.
/// [`PageBuilder::build`] ends that bookkeeping and hands the page back; the
/// page itself can still be changed through its own methods afterwards.
#[derive(Debug)]
pub struct PageBuilder<'p> {
    page: &'p mut Page,
    added: Vec<ShapeRef>,
}

impl<'p> PageBuilder<'p> {
    pub fn new(page: &'p mut Page) -> Self {
        Self {
            page,
            added: Vec::new(),
        }
    }

    /// Add a shape of any kind; an empty `text` means no label
    pub fn add_shape(
        mut self,
        kind: ShapeType,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        text: &str,
    ) -> Result<Self> {
        let label = (!text.is_empty()).then_some(text);
        let handle = self.page.add_shape(kind, x, y, width, height, label)?;
        self.added.push(handle);
        Ok(self)
    }

    /// Add a pre-built shape
    pub fn add(mut self, shape: Shape) -> Result<Self> {
        let handle = self.page.insert_shape(shape)?;
        self.added.push(handle);
        Ok(self)
    }

    pub fn add_rectangle(self, x: f64, y: f64, width: f64, height: f64, text: &str) -> Result<Self> {
        self.add_shape(ShapeType::Rectangle, x, y, width, height, text)
    }

    /// Circle with its bounding box at `(x, y)`, `2 * radius` across
    pub fn add_circle(self, x: f64, y: f64, radius: f64, text: &str) -> Result<Self> {
        let mut shape = Shape::circle(x, y, radius)?;
        if !text.is_empty() {
            shape = shape.with_text(text);
        }
        self.add(shape)
    }

    pub fn add_diamond(self, x: f64, y: f64, width: f64, height: f64, text: &str) -> Result<Self> {
        self.add_shape(ShapeType::Diamond, x, y, width, height, text)
    }

    pub fn add_cloud(self, x: f64, y: f64, width: f64, height: f64, text: &str) -> Result<Self> {
        self.add_shape(ShapeType::Cloud, x, y, width, height, text)
    }

    pub fn add_hexagon(self, x: f64, y: f64, width: f64, height: f64, text: &str) -> Result<Self> {
        self.add_shape(ShapeType::Hexagon, x, y, width, height, text)
    }

    pub fn add_octagon(self, x: f64, y: f64, width: f64, height: f64, text: &str) -> Result<Self> {
        self.add_shape(ShapeType::Octagon, x, y, width, height, text)
    }

    pub fn add_cross(self, x: f64, y: f64, width: f64, height: f64, text: &str) -> Result<Self> {
        self.add_shape(ShapeType::Cross, x, y, width, height, text)
    }

    pub fn add_isosceles_triangle(
        self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        text: &str,
    ) -> Result<Self> {
        self.add_shape(ShapeType::IsoscelesTriangle, x, y, width, height, text)
    }

    pub fn add_right_triangle(
        self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        text: &str,
    ) -> Result<Self> {
        self.add_shape(ShapeType::RightTriangle, x, y, width, height, text)
    }

    /// Straight line from the second-to-last added shape to the last one
    pub fn connect_last_two(self, text: Option<&str>) -> Result<Self> {
        self.connect_last_two_with(LineType::Straight, text)
    }

    /// Connect the two most recently added shapes
    ///
    /// The target stays the most recent shape, so the next added shape and
    /// another call extend the chain from it.
    pub fn connect_last_two_with(mut self, line_type: LineType, text: Option<&str>) -> Result<Self> {
        let [.., source, target] = self.added.as_slice() else {
            return Err(LucidError::usage(format!(
                "connect_last_two needs two added shapes, have {}",
                self.added.len()
            )));
        };
        let (source, target) = (source.clone(), target.clone());
        let line = self
            .page
            .connect_shapes_with(&source, &target, line_type, text)?;
        debug!(line = %line.id(), source = %source.id(), target = %target.id(), "Chained shapes");
        Ok(self)
    }

    /// Re-arrange every shape on the page
    pub fn apply_layout(mut self, layout: &Layout) -> Result<Self> {
        layout.apply(self.page.shapes_mut())?;
        Ok(self)
    }

    /// Handles of the shapes added through this builder, oldest first
    pub fn added(&self) -> &[ShapeRef] {
        &self.added
    }

    pub fn last_added(&self) -> Option<&ShapeRef> {
        self.added.last()
    }

    /// Geometry of the most recently added shape
    pub fn last_bounds(&self) -> Option<BoundingBox> {
        let last = self.added.last()?;
        self.page.shape(last).map(|s| s.bounding_box)
    }

    /// Finish and hand back the page
    pub fn build(self) -> &'p mut Page {
        self.page
    }
}
