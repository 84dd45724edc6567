//! Typed diagram tree: documents, pages, shapes and lines

mod document;
mod line;
mod page;
mod shape;
mod style;

pub use document::*;
pub use line::*;
pub use page::*;
pub use shape::*;
pub use style::*;
