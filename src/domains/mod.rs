pub mod import;
pub mod scene;
pub mod trajectory;

pub use import::*;
pub use scene::*;
pub use trajectory::*;
