pub mod projection;

// Re-export main types
pub use projection::{Projection, SceneCamera, Viewport};
