//! Documents: the root of the diagram tree

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Page, PageRecord};
use crate::core::{IdGenerator, IdKind, LucidError, Result};

/// Version of the standard import format this crate writes
pub const FORMAT_VERSION: u32 = 1;

/// A diagram made of one or more pages
///
/// Documents own their pages exclusively. Page identifiers come from a
/// generator private to the document, so two documents never interfere.
///
/// # Example
///
/// ```rust
/// use lucidkit::model::Document;
/// use lucidkit::ShapeType;
///
/// let mut doc = Document::create("Flow");
/// let page = doc.first_page_mut();
/// let start = page
///     .add_shape(ShapeType::Circle, 50.0, 50.0, 60.0, 60.0, Some("Start"))
///     .unwrap();
/// let end = page
///     .add_shape(ShapeType::Rectangle, 200.0, 40.0, 120.0, 80.0, Some("End"))
///     .unwrap();
/// page.connect_shapes(&start, &end).unwrap();
///
/// let json = doc.to_json().unwrap();
/// assert_eq!(lucidkit::model::Document::from_json(&json).unwrap(), doc);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DocumentRecord")]
pub struct Document {
    pub version: u32,
    pub title: String,
    pages: Vec<Page>,
    #[serde(skip)]
    ids: IdGenerator,
}

/// Document as read from JSON, before validation
#[derive(Debug, Deserialize)]
pub struct DocumentRecord {
    #[serde(default = "default_version")]
    version: u32,
    title: String,
    #[serde(default)]
    pages: Vec<PageRecord>,
}

fn default_version() -> u32 {
    FORMAT_VERSION
}

impl TryFrom<DocumentRecord> for Document {
    type Error = LucidError;

    fn try_from(record: DocumentRecord) -> Result<Self> {
        let mut doc = Document {
            version: record.version,
            title: record.title,
            pages: Vec::with_capacity(record.pages.len()),
            ids: IdGenerator::new(),
        };
        for page in record.pages {
            doc.insert_page(Page::try_from(page)?)?;
        }
        doc.validate()?;
        Ok(doc)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.title == other.title && self.pages == other.pages
    }
}

impl Document {
    /// New document with one empty page titled like the document
    pub fn create(title: impl Into<String>) -> Self {
        let title = title.into();
        let mut doc = Document {
            version: FORMAT_VERSION,
            title: title.clone(),
            pages: Vec::new(),
            ids: IdGenerator::new(),
        };
        doc.add_page(title);
        doc
    }

    /// Append an empty page with the next free `page-<n>` identifier
    pub fn add_page(&mut self, title: impl Into<String>) -> &mut Page {
        let id = self.ids.next_id(IdKind::Page);
        debug!(page = %id, "Added page");
        self.push(Page::generated(id, title))
    }

    /// Append an existing page, keeping its identifier if it is free
    pub fn insert_page(&mut self, page: Page) -> Result<&mut Page> {
        if !self.ids.register(page.id()) {
            return Err(LucidError::validation(
                "page.id",
                format!("page identifier '{}' is already used", page.id()),
            ));
        }
        debug!(page = %page.id(), shapes = page.shape_count(), "Inserted page");
        Ok(self.push(page))
    }

    fn push(&mut self, page: Page) -> &mut Page {
        self.pages.push(page);
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn pages_mut(&mut self) -> &mut [Page] {
        &mut self.pages
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    pub fn page_by_id(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id() == id)
    }

    /// The page seeded by [`Document::create`]
    ///
    /// Documents are never empty, so this always exists.
    pub fn first_page(&self) -> &Page {
        &self.pages[0]
    }

    pub fn first_page_mut(&mut self) -> &mut Page {
        &mut self.pages[0]
    }

    pub fn shape_count(&self) -> usize {
        self.pages.iter().map(Page::shape_count).sum()
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(Page::line_count).sum()
    }

    /// Check the whole tree
    pub fn validate(&self) -> Result<()> {
        if self.pages.is_empty() {
            return Err(LucidError::validation(
                "pages",
                "a document needs at least one page",
            ));
        }
        let mut seen = HashSet::new();
        for page in &self.pages {
            if !seen.insert(page.id()) {
                return Err(LucidError::validation(
                    "page.id",
                    format!("page identifier '{}' is already used", page.id()),
                ));
            }
            page.validate()?;
        }
        Ok(())
    }

    /// Validate, then render as a JSON value
    pub fn to_value(&self) -> Result<serde_json::Value> {
        self.validate()?;
        Ok(serde_json::to_value(self)?)
    }

    /// Validate, then render as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        self.validate()?;
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a document
    ///
    /// Rule violations come back as [`LucidError::Validation`] rather than
    /// as an opaque JSON error.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: DocumentRecord = serde_json::from_str(json)?;
        Document::try_from(record)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let record: DocumentRecord = serde_json::from_value(value)?;
        Document::try_from(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ShapeType;
    use serde_json::json;

    #[test]
    fn test_create_seeds_one_page() {
        let doc = Document::create("Plan");
        assert_eq!(doc.pages().len(), 1);
        assert_eq!(doc.first_page().id(), "page-1");
        assert_eq!(doc.first_page().title, "Plan");
        assert_eq!(doc.version, FORMAT_VERSION);
    }

    #[test]
    fn test_add_page_assigns_next_id() {
        let mut doc = Document::create("Plan");
        let id = doc.add_page("Second").id().to_string();
        assert_eq!(id, "page-2");
        assert!(doc.page_by_id("page-2").is_some());
        assert!(doc.page(5).is_none());
    }

    #[test]
    fn test_insert_page_rejects_duplicate_id() {
        let mut doc = Document::create("Plan");
        let err = doc
            .insert_page(Page::new("page-1", "Clash").unwrap())
            .unwrap_err();
        assert_eq!(err.field(), Some("page.id"));

        doc.insert_page(Page::new("page-2", "Custom").unwrap())
            .unwrap();
        assert_eq!(doc.add_page("Third").id(), "page-3");
    }

    #[test]
    fn test_pages_keep_separate_shape_counters() {
        let mut doc = Document::create("Plan");
        doc.add_page("Second");
        let a = doc
            .page_mut(0)
            .unwrap()
            .add_shape(ShapeType::Circle, 0.0, 0.0, 10.0, 10.0, None)
            .unwrap();
        let b = doc
            .page_mut(1)
            .unwrap()
            .add_shape(ShapeType::Circle, 0.0, 0.0, 10.0, 10.0, None)
            .unwrap();
        assert_eq!(a.id(), b.id());
        assert_eq!(doc.shape_count(), 2);
    }

    #[test]
    fn test_json_top_level_keys() {
        let doc = Document::create("Plan");
        let value = doc.to_value().unwrap();
        assert_eq!(
            value,
            json!({
                "version": 1,
                "title": "Plan",
                "pages": [{"id": "page-1", "title": "Plan", "shapes": [], "lines": []}]
            })
        );
    }

    #[test]
    fn test_from_json_requires_a_page() {
        let err = Document::from_json(r#"{"title": "Empty", "pages": []}"#).unwrap_err();
        assert_eq!(err.field(), Some("pages"));
    }

    #[test]
    fn test_from_json_reports_validation_errors() {
        let json = json!({
            "title": "Bad",
            "pages": [{
                "id": "page-1",
                "title": "Bad",
                "shapes": [{
                    "id": "shape-1",
                    "type": "rectangle",
                    "boundingBox": {"x": 0.0, "y": 0.0, "w": -4.0, "h": 10.0}
                }]
            }]
        });
        let err = Document::from_value(json).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("boundingBox.w"));
    }

    #[test]
    fn test_from_json_rejects_unknown_shape_type() {
        let json = json!({
            "title": "Bad",
            "pages": [{
                "id": "page-1",
                "title": "Bad",
                "shapes": [{
                    "id": "shape-1",
                    "type": "star",
                    "boundingBox": {"x": 0.0, "y": 0.0, "w": 4.0, "h": 10.0}
                }]
            }]
        });
        assert!(Document::from_value(json).is_err());
    }

    #[test]
    fn test_duplicate_page_ids_in_json() {
        let json = json!({
            "title": "Twice",
            "pages": [
                {"id": "p", "title": "A"},
                {"id": "p", "title": "B"}
            ]
        });
        let err = Document::from_value(json).unwrap_err();
        assert_eq!(err.field(), Some("page.id"));
    }

    #[test]
    fn test_to_json_rejects_duplicate_page_ids() {
        let mut doc = Document::create("Plan");
        doc.add_page("Second");
        doc.pages_mut()[1] = Page::new("page-1", "Clash").unwrap();

        let err = doc.to_json().unwrap_err();
        assert_eq!(err.field(), Some("page.id"));
    }

    #[test]
    fn test_to_json_rejects_duplicate_shape_ids() {
        let mut doc = Document::create("Plan");
        let page = doc.first_page_mut();
        page.add_shape(ShapeType::Circle, 0.0, 0.0, 10.0, 10.0, None)
            .unwrap();
        page.add_shape(ShapeType::Diamond, 20.0, 0.0, 10.0, 10.0, None)
            .unwrap();
        let copy = page.shapes()[0].clone();
        page.shapes_mut()[1] = copy;

        assert_eq!(doc.to_json().unwrap_err().field(), Some("id"));
    }

    #[test]
    fn test_cloned_document_rejects_original_handles() {
        let mut doc = Document::create("Plan");
        let page = doc.first_page_mut();
        let a = page
            .add_shape(ShapeType::Circle, 0.0, 0.0, 10.0, 10.0, None)
            .unwrap();
        let b = page
            .add_shape(ShapeType::Circle, 20.0, 0.0, 10.0, 10.0, None)
            .unwrap();

        let mut other = doc.clone();
        assert_eq!(other, doc);
        assert!(other.first_page_mut().connect_shapes(&a, &b).is_err());
        assert_eq!(other.line_count(), 0);
    }
}
