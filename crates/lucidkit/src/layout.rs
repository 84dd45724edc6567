//! Layout helpers
//!
//! Each function repositions a slice of shapes in place. Only the `x`/`y`
//! of each bounding box changes; identifiers, kinds, sizes and text are left
//! alone. An empty slice is a no-op, but bad arguments are reported even
//! then.

use tracing::{span, trace, Level};

use crate::core::{LucidError, Result};
use crate::model::Shape;

/// A point on the canvas
pub type Point = (f64, f64);

fn check_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(LucidError::usage(format!(
            "{} must be a finite number, got {}",
            name, value
        )));
    }
    Ok(())
}

fn place(shape: &mut Shape, x: f64, y: f64) {
    trace!(shape = %shape.id(), x, y, "Positioned shape");
    shape.set_position(x, y);
}

/// Move each shape to its computed position, or none of them if any
/// position overflowed
fn place_all(shapes: &mut [Shape], positions: Vec<Point>) -> Result<()> {
    for &(x, y) in &positions {
        check_finite("position.x", x)?;
        check_finite("position.y", y)?;
    }
    for (shape, (x, y)) in shapes.iter_mut().zip(positions) {
        place(shape, x, y);
    }
    Ok(())
}

/// Row-major grid
///
/// Shape `i` lands in column `i % columns` and row `i / columns`, at
/// `origin + (column * spacing_x, row * spacing_y)`.
pub fn grid_layout(
    shapes: &mut [Shape],
    columns: usize,
    spacing_x: f64,
    spacing_y: f64,
    origin: Point,
) -> Result<()> {
    if columns == 0 {
        return Err(LucidError::usage("grid layout needs at least one column"));
    }
    check_finite("spacing_x", spacing_x)?;
    check_finite("spacing_y", spacing_y)?;
    check_finite("origin.x", origin.0)?;
    check_finite("origin.y", origin.1)?;

    let layout_span = span!(Level::DEBUG, "grid_layout", shapes = shapes.len(), columns);
    let _enter = layout_span.enter();

    let positions = (0..shapes.len())
        .map(|index| {
            let column = (index % columns) as f64;
            let row = (index / columns) as f64;
            (origin.0 + column * spacing_x, origin.1 + row * spacing_y)
        })
        .collect();
    place_all(shapes, positions)
}

/// One row at height `y`, starting at `start_x`, `spacing` apart
pub fn horizontal_layout(shapes: &mut [Shape], spacing: f64, start_x: f64, y: f64) -> Result<()> {
    check_finite("spacing", spacing)?;
    check_finite("start_x", start_x)?;
    check_finite("y", y)?;

    let layout_span = span!(Level::DEBUG, "horizontal_layout", shapes = shapes.len());
    let _enter = layout_span.enter();

    let positions = (0..shapes.len())
        .map(|index| (start_x + index as f64 * spacing, y))
        .collect();
    place_all(shapes, positions)
}

/// One column at `x`, starting at `start_y`, `spacing` apart
pub fn vertical_layout(shapes: &mut [Shape], spacing: f64, x: f64, start_y: f64) -> Result<()> {
    check_finite("spacing", spacing)?;
    check_finite("x", x)?;
    check_finite("start_y", start_y)?;

    let layout_span = span!(Level::DEBUG, "vertical_layout", shapes = shapes.len());
    let _enter = layout_span.enter();

    let positions = (0..shapes.len())
        .map(|index| (x, start_y + index as f64 * spacing))
        .collect();
    place_all(shapes, positions)
}

/// One row centred on `center`
///
/// `spacing` is the gap between neighbouring shapes, so shapes of different
/// widths never overlap. Every shape is vertically centred on `center.1`.
pub fn center_layout(shapes: &mut [Shape], center: Point, spacing: f64) -> Result<()> {
    check_finite("center.x", center.0)?;
    check_finite("center.y", center.1)?;
    check_finite("spacing", spacing)?;

    let layout_span = span!(Level::DEBUG, "center_layout", shapes = shapes.len());
    let _enter = layout_span.enter();

    if shapes.is_empty() {
        return Ok(());
    }

    let widths: f64 = shapes.iter().map(|s| s.bounding_box.w).sum();
    let total = widths + spacing * (shapes.len() - 1) as f64;
    let mut x = center.0 - total / 2.0;
    let mut positions = Vec::with_capacity(shapes.len());
    for shape in shapes.iter() {
        let (w, h) = shape.size();
        positions.push((x, center.1 - h / 2.0));
        x += w + spacing;
    }
    place_all(shapes, positions)
}

/// Centre one shape inside a `width` x `height` container at the origin
pub fn center_shape(shape: &mut Shape, container_width: f64, container_height: f64) -> Result<()> {
    check_finite("container_width", container_width)?;
    check_finite("container_height", container_height)?;
    let (w, h) = shape.size();
    let position = ((container_width - w) / 2.0, (container_height - h) / 2.0);
    place_all(std::slice::from_mut(shape), vec![position])
}

/// A layout pattern together with its parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Layout {
    Grid {
        columns: usize,
        spacing_x: f64,
        spacing_y: f64,
        origin: Point,
    },
    Horizontal {
        spacing: f64,
        start_x: f64,
        y: f64,
    },
    Vertical {
        spacing: f64,
        x: f64,
        start_y: f64,
    },
    Center {
        center: Point,
        spacing: f64,
    },
}

impl Layout {
    /// Three-column grid, 100 apart in both directions, starting at (50, 50)
    pub fn grid() -> Self {
        Layout::Grid {
            columns: 3,
            spacing_x: 100.0,
            spacing_y: 100.0,
            origin: (50.0, 50.0),
        }
    }

    pub fn horizontal(spacing: f64) -> Self {
        Layout::Horizontal {
            spacing,
            start_x: 50.0,
            y: 50.0,
        }
    }

    pub fn vertical(spacing: f64) -> Self {
        Layout::Vertical {
            spacing,
            x: 50.0,
            start_y: 50.0,
        }
    }

    pub fn center(center: Point, spacing: f64) -> Self {
        Layout::Center { center, spacing }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layout::Grid { .. } => "grid",
            Layout::Horizontal { .. } => "horizontal",
            Layout::Vertical { .. } => "vertical",
            Layout::Center { .. } => "center",
        }
    }

    pub fn apply(&self, shapes: &mut [Shape]) -> Result<()> {
        match *self {
            Layout::Grid {
                columns,
                spacing_x,
                spacing_y,
                origin,
            } => grid_layout(shapes, columns, spacing_x, spacing_y, origin),
            Layout::Horizontal {
                spacing,
                start_x,
                y,
            } => horizontal_layout(shapes, spacing, start_x, y),
            Layout::Vertical {
                spacing,
                x,
                start_y,
            } => vertical_layout(shapes, spacing, x, start_y),
            Layout::Center { center, spacing } => center_layout(shapes, center, spacing),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::grid()
    }
}
