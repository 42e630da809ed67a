//! In-memory course catalog.
//!
//! Loaded from a JSON file of courses and lessons; every lesson with content
//! is one searchable document. Matching is plain term overlap.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lectern_core::{
    ChunkMetadata, ContentStore, CourseOutline, LessonOutline, SearchResults,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogLesson {
    pub number: u32,
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCourse {
    pub title: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<CatalogLesson>,
}

impl CatalogCourse {
    fn outline(&self) -> CourseOutline {
        CourseOutline {
            title: self.title.clone(),
            link: self.link.clone(),
            instructor: self.instructor.clone(),
            lessons: self
                .lessons
                .iter()
                .map(|l| LessonOutline {
                    number: l.number,
                    title: l.title.clone(),
                    link: l.link.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    courses: Vec<CatalogCourse>,
}

pub struct MemoryCatalog {
    courses: Vec<CatalogCourse>,
    max_results: usize,
}

impl MemoryCatalog {
    pub fn from_courses(courses: Vec<CatalogCourse>, max_results: usize) -> Self {
        Self { courses, max_results }
    }

    /// Load a `{"courses": [...]}` JSON catalog.
    pub fn load<P: AsRef<Path>>(path: P, max_results: usize) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read catalog: {}", path.as_ref().display()))?;
        let file: CatalogFile =
            serde_json::from_str(&raw).with_context(|| "Failed to parse catalog JSON")?;
        tracing::info!(
            "Loaded {} course(s) from {}",
            file.courses.len(),
            path.as_ref().display()
        );
        Ok(Self::from_courses(file.courses, max_results))
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    /// Exact case-insensitive title first, then first substring match.
    fn resolve(&self, name: &str) -> Option<&CatalogCourse> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.courses
            .iter()
            .find(|c| c.title.to_lowercase() == needle)
            .or_else(|| {
                self.courses
                    .iter()
                    .find(|c| c.title.to_lowercase().contains(&needle))
            })
    }

    fn by_exact_title(&self, title: &str) -> Option<&CatalogCourse> {
        self.courses.iter().find(|c| c.title == title)
    }
}

#[async_trait]
impl ContentStore for MemoryCatalog {
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults {
        let scope: Vec<&CatalogCourse> = match course_name {
            Some(name) => match self.resolve(name) {
                Some(course) => vec![course],
                None => return SearchResults::error(format!("No course found matching '{name}'")),
            },
            None => self.courses.iter().collect(),
        };

        let terms: BTreeSet<String> = query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();

        let mut scored: Vec<(usize, String, ChunkMetadata)> = Vec::new();
        for course in scope {
            for lesson in &course.lessons {
                if lesson_number.is_some_and(|n| n != lesson.number) {
                    continue;
                }
                let Some(content) = lesson.content.as_deref().filter(|c| !c.is_empty()) else {
                    continue;
                };
                let haystack = content.to_lowercase();
                let score = terms.iter().filter(|t| haystack.contains(t.as_str())).count();
                if score > 0 {
                    scored.push((
                        score,
                        content.to_string(),
                        ChunkMetadata {
                            course_title: course.title.clone(),
                            lesson_number: Some(lesson.number),
                        },
                    ));
                }
            }
        }

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(self.max_results);
        let (documents, metadata) = scored.into_iter().map(|(_, doc, meta)| (doc, meta)).unzip();
        SearchResults::new(documents, metadata)
    }

    async fn lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String> {
        self.by_exact_title(course_title)?
            .lessons
            .iter()
            .find(|l| l.number == lesson_number)
            .and_then(|l| l.link.clone())
    }

    async fn course_link(&self, course_title: &str) -> Option<String> {
        self.by_exact_title(course_title)?.link.clone()
    }

    async fn course_by_title(&self, course_title: &str) -> Option<CourseOutline> {
        self.resolve(course_title).map(CatalogCourse::outline)
    }

    async fn all_course_titles(&self) -> Vec<String> {
        self.courses.iter().map(|c| c.title.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(number: u32, content: &str) -> CatalogLesson {
        CatalogLesson {
            number,
            title: format!("Lesson {number}"),
            link: None,
            content: Some(content.to_string()),
        }
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::from_courses(
            vec![
                CatalogCourse {
                    title: "MCP: Build Rich-Context AI Apps".to_string(),
                    link: None,
                    instructor: None,
                    lessons: vec![lesson(0, "servers expose tools"), lesson(1, "clients call tools")],
                },
                CatalogCourse {
                    title: "Computer Use".to_string(),
                    link: None,
                    instructor: None,
                    lessons: vec![lesson(1, "screenshots and tools and clicks")],
                },
            ],
            5,
        )
    }

    #[test]
    fn test_resolve_prefers_exact_match() {
        let cat = catalog();
        assert_eq!(cat.resolve("computer use").unwrap().title, "Computer Use");
        assert_eq!(cat.resolve("mcp").unwrap().title, "MCP: Build Rich-Context AI Apps");
        assert!(cat.resolve("  ").is_none());
        assert!(cat.resolve("Rust").is_none());
    }

    #[tokio::test]
    async fn test_search_ranks_by_term_overlap() {
        let res = catalog().search("tools clicks", None, None).await;
        assert!(res.error.is_none());
        assert_eq!(res.documents[0], "screenshots and tools and clicks");
        assert_eq!(res.documents.len(), 3);
    }

    #[tokio::test]
    async fn test_search_respects_filters() {
        let res = catalog().search("tools", Some("MCP"), Some(0)).await;
        assert_eq!(res.documents, vec!["servers expose tools".to_string()]);
        assert_eq!(res.metadata[0].lesson_number, Some(0));
    }

    #[tokio::test]
    async fn test_search_unknown_course_is_error() {
        let res = catalog().search("tools", Some("Rust"), None).await;
        assert_eq!(res.error.as_deref(), Some("No course found matching 'Rust'"));
        assert!(res.is_empty());
    }

    #[tokio::test]
    async fn test_search_truncates_to_max_results() {
        let mut cat = catalog();
        cat.max_results = 1;
        assert_eq!(cat.search("tools", None, None).await.documents.len(), 1);
    }
}
