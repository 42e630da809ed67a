//! Shared mock content store for the tool integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lectern_core::{ChunkMetadata, ContentStore, CourseOutline, SearchResults};
use std::collections::HashMap;
use std::sync::Mutex;

/// Recorded `search` call: (query, course_name, lesson_number).
pub type SearchCall = (String, Option<String>, Option<u32>);

/// A content store that returns pre-configured data and records searches.
#[derive(Default)]
pub struct MockStore {
    pub results: Mutex<SearchResults>,
    pub lesson_links: HashMap<(String, u32), String>,
    pub course_links: HashMap<String, String>,
    pub courses: Vec<CourseOutline>,
    pub calls: Mutex<Vec<SearchCall>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: SearchResults) -> Self {
        Self {
            results: Mutex::new(results),
            ..Self::default()
        }
    }

    pub fn set_results(&self, results: SearchResults) {
        *self.results.lock().unwrap() = results;
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentStore for MockStore {
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> SearchResults {
        self.calls.lock().unwrap().push((
            query.to_string(),
            course_name.map(str::to_string),
            lesson_number,
        ));
        self.results.lock().unwrap().clone()
    }

    async fn lesson_link(&self, course_title: &str, lesson_number: u32) -> Option<String> {
        self.lesson_links
            .get(&(course_title.to_string(), lesson_number))
            .cloned()
    }

    async fn course_link(&self, course_title: &str) -> Option<String> {
        self.course_links.get(course_title).cloned()
    }

    async fn course_by_title(&self, course_title: &str) -> Option<CourseOutline> {
        self.courses.iter().find(|c| c.title == course_title).cloned()
    }

    async fn all_course_titles(&self) -> Vec<String> {
        self.courses.iter().map(|c| c.title.clone()).collect()
    }
}

/// Build results from (document, course, lesson) triples.
pub fn hits(items: &[(&str, &str, Option<u32>)]) -> SearchResults {
    SearchResults::new(
        items.iter().map(|(doc, _, _)| doc.to_string()).collect(),
        items
            .iter()
            .map(|(_, course, lesson)| ChunkMetadata {
                course_title: course.to_string(),
                lesson_number: *lesson,
            })
            .collect(),
    )
}
