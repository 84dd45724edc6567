//! Pages: one canvas of shapes and the lines between them
//!
//! A page owns its shapes and lines exclusively and issues their identifiers
//! from a private [`IdGenerator`]. Adding a shape hands back a [`ShapeRef`]
//! that remembers which page issued it, so connecting shapes that live on
//! different pages fails even when their identifiers happen to coincide.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{Line, Shape};
use crate::builder::PageBuilder;
use crate::core::{
    validate_id, BoundingBox, IdGenerator, IdKind, LineType, LucidError, Result, ShapeType,
};

/// Handle to a shape on a specific page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeRef {
    id: String,
    scope: Uuid,
}

impl ShapeRef {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Handle to a line on a specific page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineRef {
    id: String,
    scope: Uuid,
}

impl LineRef {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// A single diagram canvas
///
/// A clone is a separate page: handles issued by the original do not
/// resolve on it.
#[derive(Debug, Serialize, Deserialize)]
#[serde(try_from = "PageRecord")]
pub struct Page {
    id: String,
    pub title: String,
    shapes: Vec<Shape>,
    lines: Vec<Line>,
    #[serde(skip)]
    ids: IdGenerator,
    #[serde(skip)]
    scope: Uuid,
}

/// Page as read from JSON, before validation
#[derive(Debug, Deserialize)]
pub struct PageRecord {
    id: String,
    title: String,
    #[serde(default)]
    shapes: Vec<Shape>,
    #[serde(default)]
    lines: Vec<Line>,
}

impl TryFrom<PageRecord> for Page {
    type Error = LucidError;

    fn try_from(record: PageRecord) -> Result<Self> {
        let mut page = Page::new(record.id, record.title)?;
        for shape in record.shapes {
            if !shape.has_id() {
                return Err(LucidError::validation("shapes.id", "every shape needs an id"));
            }
            page.insert_shape(shape)?;
        }
        for line in &record.lines {
            if !line.has_id() {
                return Err(LucidError::validation("lines.id", "every line needs an id"));
            }
            page.claim_id(line.id())?;
        }
        page.lines = record.lines;
        page.validate()?;
        Ok(page)
    }
}

impl Clone for Page {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            shapes: self.shapes.clone(),
            lines: self.lines.clone(),
            ids: self.ids.clone(),
            scope: Uuid::new_v4(),
        }
    }
}

impl PartialEq for Page {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.shapes == other.shapes
            && self.lines == other.lines
    }
}

impl Page {
    /// Create an empty page with a caller-chosen identifier
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_id("page.id", &id)?;
        Ok(Self {
            id,
            title: title.into(),
            shapes: Vec::new(),
            lines: Vec::new(),
            ids: IdGenerator::new(),
            scope: Uuid::new_v4(),
        })
    }

    /// Page whose identifier came from a document's generator
    pub(crate) fn generated(id: String, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            shapes: Vec::new(),
            lines: Vec::new(),
            ids: IdGenerator::new(),
            scope: Uuid::new_v4(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Mutable access for layout; identifiers stay read-only
    pub fn shapes_mut(&mut self) -> &mut [Shape] {
        &mut self.shapes
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Fluent builder over this page
    pub fn builder(&mut self) -> PageBuilder<'_> {
        PageBuilder::new(self)
    }

    /// Create a shape, give it the next free identifier and append it
    pub fn add_shape(
        &mut self,
        kind: ShapeType,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        text: Option<&str>,
    ) -> Result<ShapeRef> {
        let mut shape = Shape::new(kind, BoundingBox::new(x, y, width, height))?;
        shape.text = text.map(str::to_string);
        self.insert_shape(shape)
    }

    /// Append a pre-built shape, assigning an identifier if it has none
    pub fn insert_shape(&mut self, mut shape: Shape) -> Result<ShapeRef> {
        shape.validate_fields()?;
        if shape.has_id() {
            self.claim_id(shape.id())?;
        } else {
            shape.assign_id(self.ids.next_id(IdKind::Shape));
        }
        debug!(page = %self.id, shape = %shape.id(), kind = %shape.kind, "Added shape");
        let handle = self.shape_ref(shape.id());
        self.shapes.push(shape);
        Ok(handle)
    }

    /// Connect two shapes of this page with a plain straight line
    pub fn connect_shapes(&mut self, source: &ShapeRef, target: &ShapeRef) -> Result<LineRef> {
        self.connect_shapes_with(source, target, LineType::Straight, None)
    }

    /// Connect two shapes of this page
    ///
    /// Fails with a validation error if either handle was issued by another
    /// page or no longer resolves here.
    pub fn connect_shapes_with(
        &mut self,
        source: &ShapeRef,
        target: &ShapeRef,
        line_type: LineType,
        text: Option<&str>,
    ) -> Result<LineRef> {
        self.check_owned("source", source)?;
        self.check_owned("target", target)?;
        self.connect_by_id(source.id(), target.id(), line_type, text)
    }

    /// Connect two shapes of this page by raw identifier
    pub fn connect_by_id(
        &mut self,
        source_id: &str,
        target_id: &str,
        line_type: LineType,
        text: Option<&str>,
    ) -> Result<LineRef> {
        let mut line = Line::between(source_id, target_id, line_type);
        if let Some(text) = text {
            line = line.with_label(text);
        }
        self.insert_line(line)
    }

    /// Append a pre-built line, assigning an identifier if it has none
    ///
    /// Both endpoints must resolve to a shape or line already on this page.
    pub fn insert_line(&mut self, mut line: Line) -> Result<LineRef> {
        line.validate_fields()?;
        self.check_endpoints(&line)?;
        if line.has_id() {
            self.claim_id(line.id())?;
        } else {
            line.assign_id(self.ids.next_id(IdKind::Line));
        }
        debug!(
            page = %self.id,
            line = %line.id(),
            source = ?line.source(),
            target = ?line.target(),
            "Added line"
        );
        let handle = LineRef {
            id: line.id().to_string(),
            scope: self.scope,
        };
        self.lines.push(line);
        Ok(handle)
    }

    /// Whether the handle was issued by this page and still resolves
    pub fn owns(&self, shape: &ShapeRef) -> bool {
        shape.scope == self.scope && self.shape_by_id(shape.id()).is_some()
    }

    pub fn shape(&self, shape: &ShapeRef) -> Option<&Shape> {
        if shape.scope != self.scope {
            return None;
        }
        self.shape_by_id(shape.id())
    }

    pub fn shape_mut(&mut self, shape: &ShapeRef) -> Option<&mut Shape> {
        if shape.scope != self.scope {
            return None;
        }
        self.shapes.iter_mut().find(|s| s.id() == shape.id())
    }

    pub fn shape_by_id(&self, id: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn line(&self, line: &LineRef) -> Option<&Line> {
        if line.scope != self.scope {
            return None;
        }
        self.line_by_id(line.id())
    }

    pub fn line_by_id(&self, id: &str) -> Option<&Line> {
        self.lines.iter().find(|l| l.id() == id)
    }

    /// Handles for every shape, in insertion order
    pub fn shape_refs(&self) -> Vec<ShapeRef> {
        self.shapes.iter().map(|s| self.shape_ref(s.id())).collect()
    }

    /// Check every shape and line, that identifiers are unique and that
    /// every endpoint resolves
    pub fn validate(&self) -> Result<()> {
        validate_id("page.id", &self.id)?;
        let mut seen = HashSet::new();
        let ids = self
            .shapes
            .iter()
            .map(Shape::id)
            .chain(self.lines.iter().map(Line::id));
        for id in ids {
            if !seen.insert(id) {
                return Err(LucidError::validation(
                    "id",
                    format!("identifier '{}' is already used on page '{}'", id, self.id),
                ));
            }
        }
        for shape in &self.shapes {
            shape.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
            self.check_endpoints(line)?;
        }
        Ok(())
    }

    fn shape_ref(&self, id: &str) -> ShapeRef {
        ShapeRef {
            id: id.to_string(),
            scope: self.scope,
        }
    }

    fn claim_id(&mut self, id: &str) -> Result<()> {
        validate_id("id", id)?;
        if !self.ids.register(id) {
            return Err(LucidError::validation(
                "id",
                format!("identifier '{}' is already used on page '{}'", id, self.id),
            ));
        }
        Ok(())
    }

    fn check_owned(&self, role: &str, shape: &ShapeRef) -> Result<()> {
        if !self.owns(shape) {
            return Err(LucidError::validation(
                role,
                format!(
                    "shape '{}' does not belong to page '{}'",
                    shape.id(),
                    self.id
                ),
            ));
        }
        Ok(())
    }

    fn check_endpoints(&self, line: &Line) -> Result<()> {
        for (field, endpoint) in [("endpoint1", &line.endpoint1), ("endpoint2", &line.endpoint2)] {
            if let Some(shape_id) = endpoint.shape_id() {
                if self.shape_by_id(shape_id).is_none() {
                    return Err(LucidError::validation(
                        format!("{}.shapeId", field),
                        format!("no shape '{}' on page '{}'", shape_id, self.id),
                    ));
                }
            }
            if let Some(line_id) = endpoint.line_id() {
                if line_id == line.id() || self.line_by_id(line_id).is_none() {
                    return Err(LucidError::validation(
                        format!("{}.lineId", field),
                        format!("no line '{}' on page '{}'", line_id, self.id),
                    ));
                }
            }
        }
        Ok(())
    }
}
