//! The content store seam consumed by the capabilities.
//!
//! Ranking, embeddings and fuzzy course-name resolution live behind this
//! trait; capabilities only see ordered results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Per-document metadata, index-aligned with `SearchResults::documents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub course_title: String,
    pub lesson_number: Option<u32>,
}

/// Ordered search hits, or an error reported by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub documents: Vec<String>,
    pub metadata: Vec<ChunkMetadata>,
    pub error: Option<String>,
}

impl SearchResults {
    pub fn new(documents: Vec<String>, metadata: Vec<ChunkMetadata>) -> Self {
        Self { documents, metadata, error: None }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// A failed search: no hits, only the message.
    pub fn error(msg: impl Into<String>) -> Self {
        Self { error: Some(msg.into()), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document/metadata pairs in store order. Stops at the shorter side.
    pub fn hits(&self) -> impl Iterator<Item = (&str, &ChunkMetadata)> {
        self.documents
            .iter()
            .map(String::as_str)
            .zip(self.metadata.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonOutline {
    pub number: u32,
    pub title: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseOutline {
    pub title: String,
    pub link: Option<String>,
    pub instructor: Option<String>,
    pub lessons: Vec<LessonOutline>,
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Filtered content lookup. Failures come back in `SearchResults::error`.
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults;

    async fn lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String>;

    async fn course_link(&self, course_title: &str) -> Option<String>;

    async fn course_by_title(&self, course_title: &str) -> Option<CourseOutline>;

    async fn all_course_titles(&self) -> Vec<String>;
}
