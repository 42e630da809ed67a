pub mod outline_tool;
pub mod search_tool;
pub mod tool_registry;

pub use outline_tool::{CourseOutlineTool, OUTLINE_TOOL_NAME};
pub use search_tool::{CourseSearchTool, SEARCH_TOOL_NAME};
pub use tool_registry::ToolRegistry;
