use async_trait::async_trait;
use lectern_core::{
    Citation, ContentStore, CourseOutline, ParamType, ToolDefinition, ToolHandler, ToolOutcome,
    ToolParam,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const OUTLINE_TOOL_NAME: &str = "get_course_outline";

const NO_LINK: &str = "No link available";
const UNKNOWN_INSTRUCTOR: &str = "Unknown instructor";

#[derive(Debug, Deserialize)]
struct OutlineArgs {
    course_title: String,
}

/// Course metadata lookup: title, instructor, link and the lesson list.
pub struct CourseOutlineTool {
    store: Arc<dyn ContentStore>,
    last_citations: Mutex<Vec<Citation>>,
}

impl CourseOutlineTool {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            last_citations: Mutex::new(Vec::new()),
        }
    }
}

/// Markdown outline handed back to the engine.
pub fn format_outline(course: &CourseOutline) -> String {
    let mut lines = vec![
        format!("**Course:** {}", course.title),
        format!(
            "**Instructor:** {}",
            course.instructor.as_deref().unwrap_or(UNKNOWN_INSTRUCTOR)
        ),
        format!("**Course Link:** {}", course.link.as_deref().unwrap_or(NO_LINK)),
        String::new(),
    ];

    if course.lessons.is_empty() {
        lines.push("**No lessons available**".to_string());
        return lines.join("\n");
    }

    lines.push("**Lessons:**".to_string());
    for lesson in &course.lessons {
        lines.push(format!("  {}. {}", lesson.number, lesson.title));
        if let Some(link) = lesson.link.as_deref().filter(|l| !l.is_empty() && *l != NO_LINK) {
            lines.push(format!("     Link: {link}"));
        }
    }
    lines.push(String::new());
    lines.push(format!("**Total Lessons:** {}", course.lessons.len()));
    lines.join("\n")
}

#[async_trait]
impl ToolHandler for CourseOutlineTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            OUTLINE_TOOL_NAME,
            "Get course outline with complete lesson list and metadata",
        )
        .param(ToolParam::required(
            "course_title",
            ParamType::String,
            "Course title (partial matches work, e.g. 'MCP', 'Introduction')",
        ))
    }

    async fn execute(&self, input: &Value) -> ToolOutcome {
        let mut citations = self.last_citations.lock().await;
        citations.clear();

        let args: OutlineArgs = match self.definition().parse_args(input) {
            Ok(args) => args,
            Err(e) => return e.into(),
        };

        match self.store.course_by_title(&args.course_title).await {
            Some(course) => {
                *citations = vec![Citation::new(course.title.clone(), course.link.clone())];
                ToolOutcome::ok(format_outline(&course))
            }
            None => {
                let titles = self.store.all_course_titles().await;
                tracing::debug!("Outline lookup missed '{}'", args.course_title);
                ToolOutcome::permanent_error(format!(
                    "Course '{}' not found. Available courses: {}",
                    args.course_title,
                    titles.join(", ")
                ))
            }
        }
    }

    async fn citations(&self) -> Vec<Citation> {
        self.last_citations.lock().await.clone()
    }

    async fn reset_citations(&self) {
        self.last_citations.lock().await.clear();
    }
}
