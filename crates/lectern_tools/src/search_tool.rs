use async_trait::async_trait;
use lectern_core::{
    Citation, ContentStore, ParamType, SearchResults, ToolDefinition, ToolHandler, ToolOutcome,
    ToolParam,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const SEARCH_TOOL_NAME: &str = "search_course_content";

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    course_name: Option<String>,
    lesson_number: Option<u32>,
}

/// Filtered content lookup over the course store.
///
/// Keeps one citation per formatted block of its most recent call.
pub struct CourseSearchTool {
    store: Arc<dyn ContentStore>,
    last_citations: Mutex<Vec<Citation>>,
}

impl CourseSearchTool {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            last_citations: Mutex::new(Vec::new()),
        }
    }

    /// Render hits in store order and build the parallel citation list.
    async fn format_results(&self, results: &SearchResults) -> (String, Vec<Citation>) {
        let mut blocks = Vec::with_capacity(results.documents.len());
        let mut citations = Vec::with_capacity(results.documents.len());

        for (doc, meta) in results.hits() {
            let mut label = meta.course_title.clone();
            if let Some(n) = meta.lesson_number {
                label.push_str(&format!(" - Lesson {n}"));
            }

            let lesson_link = match meta.lesson_number {
                Some(n) => non_empty(self.store.lesson_link(&meta.course_title, n).await),
                None => None,
            };
            let link = match lesson_link {
                Some(link) => Some(link),
                None => non_empty(self.store.course_link(&meta.course_title).await),
            };

            blocks.push(format!("[{label}]\n{doc}"));
            citations.push(Citation::new(label, link));
        }

        (blocks.join("\n\n"), citations)
    }
}

fn non_empty(link: Option<String>) -> Option<String> {
    link.filter(|l| !l.is_empty())
}

/// "No relevant content found" plus whichever filters were supplied.
pub fn no_content_message(course_name: Option<&str>, lesson_number: Option<u32>) -> String {
    let mut msg = String::from("No relevant content found");
    if let Some(course) = course_name {
        msg.push_str(&format!(" in course '{course}'"));
    }
    if let Some(n) = lesson_number {
        msg.push_str(&format!(" in lesson {n}"));
    }
    msg.push('.');
    msg
}

#[async_trait]
impl ToolHandler for CourseSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            SEARCH_TOOL_NAME,
            "Search course materials with smart course name matching and lesson filtering",
        )
        .param(ToolParam::required(
            "query",
            ParamType::String,
            "What to search for in the course content",
        ))
        .param(ToolParam::optional(
            "course_name",
            ParamType::String,
            "Course title (partial matches work, e.g. 'MCP', 'Introduction')",
        ))
        .param(ToolParam::optional(
            "lesson_number",
            ParamType::Integer,
            "Specific lesson number to search within (e.g. 1, 2, 3)",
        ))
    }

    async fn execute(&self, input: &Value) -> ToolOutcome {
        let mut citations = self.last_citations.lock().await;
        citations.clear();

        let args: SearchArgs = match self.definition().parse_args(input) {
            Ok(args) => args,
            Err(e) => return e.into(),
        };
        let course_name = args.course_name.as_deref().filter(|c| !c.is_empty());

        let results = self
            .store
            .search(&args.query, course_name, args.lesson_number)
            .await;

        if let Some(err) = results.error.as_ref().filter(|e| !e.is_empty()) {
            tracing::warn!("Content store search failed: {}", err);
            return ToolOutcome::transient_error(err.clone());
        }

        if results.is_empty() {
            return ToolOutcome::ok(no_content_message(course_name, args.lesson_number));
        }

        let (text, fresh) = self.format_results(&results).await;
        tracing::debug!("Search '{}' produced {} block(s)", args.query, fresh.len());
        *citations = fresh;
        ToolOutcome::ok(text)
    }

    async fn citations(&self) -> Vec<Citation> {
        self.last_citations.lock().await.clone()
    }

    async fn reset_citations(&self) {
        self.last_citations.lock().await.clear();
    }
}
