pub mod module;
pub mod registry;

// Re-export commonly used types
pub use module::{InputMemory, ModuleKind, ModuleState};
pub use registry::ModuleRegistry;
