pub mod memory_scene;
pub mod progress;

pub use memory_scene::*;
pub use progress::*;
