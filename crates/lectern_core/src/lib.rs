pub mod config;
pub mod error;
pub mod store;
pub mod tools;

pub use config::LecternConfig;
pub use error::LecternError;
pub use store::{ChunkMetadata, ContentStore, CourseOutline, LessonOutline, SearchResults};
pub use tools::{
    Citation, ParamType, Tool, ToolDefinition, ToolErrorKind, ToolHandler, ToolInputSchema,
    ToolOutcome, ToolParam,
};
