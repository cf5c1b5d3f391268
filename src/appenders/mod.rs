//! Appender and sink implementations

pub mod console;
pub mod json;
pub mod memory;

pub use console::ConsoleAppender;
pub use json::JsonAppender;
pub use memory::MemoryStore;

pub use crate::core::Appender;
