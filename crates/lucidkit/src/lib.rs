//! Lucidkit - Build Lucidchart documents in Rust
//!
//! Typed documents, pages, shapes and lines that serialize to Lucid's
//! standard import JSON, plus layout helpers, a fluent page builder and a
//! blocking API client.
//!
//! # Quick Start
//!
//! ```rust
//! use lucidkit::prelude::*;
//!
//! let mut doc = Document::create("Onboarding");
//! let page = doc.first_page_mut();
//! let start = page
//!     .add_shape(ShapeType::Circle, 50.0, 50.0, 60.0, 60.0, Some("Start"))
//!     .unwrap();
//! let process = page
//!     .add_shape(ShapeType::Rectangle, 200.0, 40.0, 120.0, 80.0, Some("Process"))
//!     .unwrap();
//! page.connect_shapes(&start, &process).unwrap();
//!
//! let json = doc.to_json().unwrap();
//! assert!(json.contains("\"shape-1\""));
//! ```
//!
//! # Builder and Layout
//!
//! ```rust
//! use lucidkit::prelude::*;
//!
//! let mut doc = Document::create("Pipeline");
//! doc.first_page_mut()
//!     .builder()
//!     .add_rectangle(0.0, 0.0, 120.0, 60.0, "Fetch").unwrap()
//!     .add_rectangle(0.0, 0.0, 120.0, 60.0, "Build").unwrap()
//!     .connect_last_two(None).unwrap()
//!     .add_rectangle(0.0, 0.0, 120.0, 60.0, "Deploy").unwrap()
//!     .connect_last_two(None).unwrap()
//!     .apply_layout(&Layout::horizontal(200.0)).unwrap()
//!     .build();
//!
//! assert_eq!(doc.first_page().shapes()[2].position(), (450.0, 50.0));
//! ```

pub mod builder;
pub mod client;
pub mod core;
pub mod layout;
pub mod model;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::builder::PageBuilder;
    pub use crate::client::{ClientConfig, LucidchartClient};
    pub use crate::core::{
        BoundingBox, Color, EndpointStyle, LineType, LucidError, Result, ShapeType, StrokeStyle,
        TextSide,
    };
    pub use crate::layout::Layout;
    pub use crate::model::{
        Document, Endpoint, Line, LineRef, LineText, Page, Shape, ShapeRef, Stroke, Style,
    };
}
