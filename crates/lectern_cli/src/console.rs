//! Line-oriented console: one input line is one turn.

use anyhow::Result;
use lectern_core::Citation;
use lectern_session::SessionStore;
use lectern_tools::{ToolRegistry, OUTLINE_TOOL_NAME, SEARCH_TOOL_NAME};
use serde_json::{json, Value};
use std::sync::Arc;

pub const HELP: &str = "Commands: /tools, /call <tool> <json>, /outline <course>, /history, /reset, /quit. \
Anything else is searched and recorded in the session.";

#[derive(Debug, PartialEq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct Console {
    registry: Arc<ToolRegistry>,
    sessions: Arc<SessionStore>,
    session_id: String,
}

impl Console {
    pub async fn new(registry: Arc<ToolRegistry>, sessions: Arc<SessionStore>) -> Self {
        let session_id = sessions.create_session().await;
        Self {
            registry,
            sessions,
            session_id,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn handle_line(&mut self, line: &str) -> Result<Reply> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Reply::Text(String::new()));
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        let text = match command {
            "/quit" | "/exit" => return Ok(Reply::Quit),
            "/help" => HELP.to_string(),
            "/tools" => serde_json::to_string_pretty(&self.registry.available_tools())?,
            "/history" => {
                let history = self.sessions.formatted_history(&self.session_id).await?;
                if history.is_empty() {
                    "(no history)".to_string()
                } else {
                    history
                }
            }
            "/reset" => {
                self.sessions.delete(&self.session_id).await;
                self.session_id = self.sessions.create_session().await;
                tracing::info!("Started session {}", self.session_id);
                "Session reset.".to_string()
            }
            "/outline" => {
                self.run_tool(OUTLINE_TOOL_NAME, json!({ "course_title": rest }))
                    .await
            }
            "/call" => {
                let (name, args) = match rest.split_once(char::is_whitespace) {
                    Some((n, a)) => (n, a.trim()),
                    None => (rest, ""),
                };
                if name.is_empty() {
                    return Ok(Reply::Text("Usage: /call <tool> <json>".to_string()));
                }
                let input: Value = if args.is_empty() {
                    json!({})
                } else {
                    match serde_json::from_str(args) {
                        Ok(v) => v,
                        Err(e) => return Ok(Reply::Text(format!("Invalid JSON arguments: {e}"))),
                    }
                };
                self.run_tool(name, input).await
            }
            _ if command.starts_with('/') => format!("Unknown command '{command}'. {HELP}"),
            _ => {
                let (answer, shown) = self
                    .run_turn(SEARCH_TOOL_NAME, json!({ "query": line }))
                    .await;
                self.sessions
                    .add_exchange(&self.session_id, line, &answer)
                    .await?;
                shown
            }
        };
        Ok(Reply::Text(text))
    }

    async fn run_tool(&self, name: &str, input: Value) -> String {
        self.run_turn(name, input).await.1
    }

    /// Dispatch, collect citations, then reset them for the next turn.
    /// Returns the tool text and the text shown to the user (with sources).
    async fn run_turn(&self, name: &str, input: Value) -> (String, String) {
        let outcome = self.registry.dispatch(name, &input).await;
        let citations = self.registry.last_citations().await;
        self.registry.reset_citations().await;

        let shown = if citations.is_empty() {
            outcome.content.clone()
        } else {
            format!("{}\n\n{}", outcome.content, render_citations(&citations))
        };
        (outcome.content, shown)
    }
}

pub fn render_citations(citations: &[Citation]) -> String {
    let mut lines = vec!["Sources:".to_string()];
    for c in citations {
        match &c.link {
            Some(link) => lines.push(format!("  - {} <{}>", c.label, link)),
            None => lines.push(format!("  - {}", c.label)),
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_catalog::{CatalogCourse, CatalogLesson, MemoryCatalog};

    async fn console(max_history: usize) -> Console {
        let catalog = MemoryCatalog::from_courses(
            vec![CatalogCourse {
                title: "Retrieval Basics".to_string(),
                link: Some("https://example.com/rb".to_string()),
                instructor: Some("Ada".to_string()),
                lessons: vec![CatalogLesson {
                    number: 1,
                    title: "Chunking".to_string(),
                    link: None,
                    content: Some("Chunking splits documents.".to_string()),
                }],
            }],
            5,
        );
        let registry = Arc::new(ToolRegistry::with_course_tools(Arc::new(catalog)).unwrap());
        let sessions = Arc::new(SessionStore::new(max_history));
        Console::new(registry, sessions).await
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(t) => t,
            Reply::Quit => panic!("unexpected quit"),
        }
    }

    #[tokio::test]
    async fn test_search_turn_is_recorded() {
        let mut c = console(2).await;
        let out = text(c.handle_line("chunking").await.unwrap());
        assert!(out.starts_with("[Retrieval Basics - Lesson 1]\nChunking splits documents."));
        assert!(out.ends_with("Sources:\n  - Retrieval Basics - Lesson 1 <https://example.com/rb>"));

        let history = text(c.handle_line("/history").await.unwrap());
        assert_eq!(
            history,
            "user: chunking\nassistant: [Retrieval Basics - Lesson 1]\nChunking splits documents."
        );
        assert!(!history.contains("Sources:"));
    }

    #[tokio::test]
    async fn test_citations_do_not_leak_between_turns() {
        let mut c = console(2).await;
        c.handle_line("chunking").await.unwrap();
        let out = text(c.handle_line("zebra").await.unwrap());
        assert_eq!(out, "No relevant content found.");
    }

    #[tokio::test]
    async fn test_call_and_outline_commands() {
        let mut c = console(2).await;
        let out = text(c.handle_line("/call get_course_outline {\"course_title\": \"retrieval\"}").await.unwrap());
        assert!(out.contains("**Course:** Retrieval Basics"));
        assert!(out.ends_with("  - Retrieval Basics <https://example.com/rb>"));

        let out = text(c.handle_line("/outline nothing").await.unwrap());
        assert!(out.starts_with("Course 'nothing' not found"));

        let out = text(c.handle_line("/call missing_tool {}").await.unwrap());
        assert_eq!(out, "Tool 'missing_tool' not found");

        let out = text(c.handle_line("/call search_course_content {oops").await.unwrap());
        assert!(out.starts_with("Invalid JSON arguments"));
    }

    #[tokio::test]
    async fn test_reset_starts_fresh_session() {
        let mut c = console(2).await;
        c.handle_line("chunking").await.unwrap();
        let old = c.session_id().to_string();
        c.handle_line("/reset").await.unwrap();
        assert_ne!(c.session_id(), old);
        assert_eq!(text(c.handle_line("/history").await.unwrap()), "(no history)");
    }

    #[tokio::test]
    async fn test_quit_and_tools() {
        let mut c = console(0).await;
        let tools = text(c.handle_line("/tools").await.unwrap());
        assert!(tools.contains("search_course_content"));
        assert!(tools.contains("\"input_schema\""));
        assert_eq!(c.handle_line("/quit").await.unwrap(), Reply::Quit);
    }
}
