use crate::outline_tool::CourseOutlineTool;
use crate::search_tool::CourseSearchTool;
use lectern_core::{
    Citation, ContentStore, LecternError, Tool, ToolDefinition, ToolHandler, ToolOutcome,
};
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// ToolRegistry
// ============================================================================

struct RegisteredTool {
    definition: ToolDefinition,
    handler: Box<dyn ToolHandler>,
}

/// Holds capabilities by name and routes engine tool calls to them.
///
/// Iteration follows registration order. Re-registering a name replaces the
/// earlier handler in its original slot.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the course search and outline tools, in that order.
    pub fn with_course_tools(store: Arc<dyn ContentStore>) -> Result<Self, LecternError> {
        let mut registry = Self::new();
        registry.register(Box::new(CourseSearchTool::new(store.clone())))?;
        registry.register(Box::new(CourseOutlineTool::new(store)))?;
        Ok(registry)
    }

    /// Register a tool handler. Overwrites any existing handler with the same name.
    pub fn register(&mut self, handler: Box<dyn ToolHandler>) -> Result<(), LecternError> {
        let definition = handler.definition();
        if definition.name.trim().is_empty() {
            return Err(LecternError::Configuration(
                "Tool must have a 'name' in its definition".to_string(),
            ));
        }

        let name = definition.name.clone();
        let entry = RegisteredTool { definition, handler };
        match self.index.get(&name) {
            Some(&slot) => {
                tracing::debug!("Replaced tool: {}", name);
                self.tools[slot] = entry;
            }
            None => {
                tracing::debug!("Registered tool: {}", name);
                self.index.insert(name, self.tools.len());
                self.tools.push(entry);
            }
        }
        Ok(())
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    /// Get the list of Tool schemas for the LLM, in registration order.
    pub fn available_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.definition.to_tool()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a tool call by name. Unknown names come back as text, not `Err`.
    pub async fn dispatch(&self, name: &str, input: &serde_json::Value) -> ToolOutcome {
        match self.index.get(name) {
            Some(&slot) => {
                tracing::debug!("Dispatching tool '{}'", name);
                self.tools[slot].handler.execute(input).await
            }
            None => {
                tracing::warn!("Engine requested unknown tool '{}'", name);
                ToolOutcome::permanent_error(format!("Tool '{}' not found", name))
            }
        }
    }

    /// Citations of the first tool (in registration order) that has any.
    ///
    /// Not a union: when two tools ran in the same turn only the
    /// earlier-registered one is reported.
    pub async fn last_citations(&self) -> Vec<Citation> {
        for tool in &self.tools {
            let citations = tool.handler.citations().await;
            if !citations.is_empty() {
                return citations;
            }
        }
        Vec::new()
    }

    /// Clear citation state on every tool. Call once per completed turn.
    pub async fn reset_citations(&self) {
        for tool in &self.tools {
            tool.handler.reset_citations().await;
        }
        tracing::debug!("Citations reset across {} tool(s)", self.tools.len());
    }
}
