pub mod catalog;

pub use catalog::{CatalogCourse, CatalogLesson, MemoryCatalog};
