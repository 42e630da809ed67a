//! End-to-end: JSON catalog on disk → MemoryCatalog → ToolRegistry.

use lectern_core::{Citation, ContentStore};
use lectern_catalog::MemoryCatalog;
use lectern_tools::{ToolRegistry, OUTLINE_TOOL_NAME, SEARCH_TOOL_NAME};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

const CATALOG: &str = r#"{
  "courses": [
    {
      "title": "Prompt Compression and Query Optimization",
      "link": "https://example.com/pcqo",
      "instructor": "Richmond Alake",
      "lessons": [
        {"number": 0, "title": "Introduction", "link": "https://example.com/pcqo/0",
         "content": "This course covers vector search and prompt compression."},
        {"number": 1, "title": "Vector Search", "content": "Vector search finds nearby embeddings."}
      ]
    },
    {
      "title": "Building Towards Computer Use",
      "lessons": [
        {"number": 1, "title": "Overview", "content": "Computer use lets a model drive a desktop."}
      ]
    }
  ]
}"#;

fn write_catalog() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_load_catalog_from_disk() {
    let file = write_catalog();
    let catalog = MemoryCatalog::load(file.path(), 5).unwrap();
    assert_eq!(catalog.course_count(), 2);
    assert_eq!(
        catalog.all_course_titles().await,
        vec![
            "Prompt Compression and Query Optimization".to_string(),
            "Building Towards Computer Use".to_string(),
        ]
    );
    assert_eq!(
        catalog.lesson_link("Prompt Compression and Query Optimization", 1).await,
        None
    );
}

#[test]
fn test_load_rejects_malformed_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\"courses\": [").unwrap();
    assert!(MemoryCatalog::load(file.path(), 5).is_err());
    assert!(MemoryCatalog::load("/nonexistent/catalog.json", 5).is_err());
}

#[tokio::test]
async fn test_search_through_registry_with_link_fallback() {
    let file = write_catalog();
    let store = Arc::new(MemoryCatalog::load(file.path(), 5).unwrap());
    let registry = ToolRegistry::with_course_tools(store).unwrap();

    let out = registry
        .dispatch(
            SEARCH_TOOL_NAME,
            &json!({"query": "vector search", "course_name": "prompt compression"}),
        )
        .await;
    assert!(out
        .content
        .starts_with("[Prompt Compression and Query Optimization - Lesson "));

    let citations = registry.last_citations().await;
    assert_eq!(citations.len(), 2);
    // Lesson 0 has its own link, lesson 1 falls back to the course link
    assert!(citations.contains(&Citation::new(
        "Prompt Compression and Query Optimization - Lesson 0",
        Some("https://example.com/pcqo/0".to_string()),
    )));
    assert!(citations.contains(&Citation::new(
        "Prompt Compression and Query Optimization - Lesson 1",
        Some("https://example.com/pcqo".to_string()),
    )));
    registry.reset_citations().await;
}

#[tokio::test]
async fn test_unknown_course_message_reaches_engine() {
    let file = write_catalog();
    let store = Arc::new(MemoryCatalog::load(file.path(), 5).unwrap());
    let registry = ToolRegistry::with_course_tools(store).unwrap();

    let out = registry
        .dispatch(SEARCH_TOOL_NAME, &json!({"query": "x", "course_name": "Haskell"}))
        .await;
    assert_eq!(out.content, "No course found matching 'Haskell'");

    let out = registry
        .dispatch(OUTLINE_TOOL_NAME, &json!({"course_title": "Haskell"}))
        .await;
    assert_eq!(
        out.content,
        "Course 'Haskell' not found. Available courses: \
Prompt Compression and Query Optimization, Building Towards Computer Use"
    );
}

#[tokio::test]
async fn test_outline_through_registry() {
    let file = write_catalog();
    let store = Arc::new(MemoryCatalog::load(file.path(), 5).unwrap());
    let registry = ToolRegistry::with_course_tools(store).unwrap();

    let out = registry
        .dispatch(OUTLINE_TOOL_NAME, &json!({"course_title": "computer use"}))
        .await;
    assert!(out.content.contains("**Course:** Building Towards Computer Use"));
    assert!(out.content.contains("**Instructor:** Unknown instructor"));
    assert!(out.content.contains("**Course Link:** No link available"));
    assert_eq!(
        registry.last_citations().await,
        vec![Citation::new("Building Towards Computer Use", None)]
    );
}
