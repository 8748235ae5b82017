/// JSON package files.
pub mod file;
mod memory;

pub use file::{LoadError, load_package, save_package, write_package};
pub use memory::MemoryStore;
