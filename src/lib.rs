// src/lib.rs
//! Cairn scene editor core
//!
//! A hierarchical scene graph with parent-relative transforms, behaviors
//! attached to nodes, and click picking by ray casting against the actual
//! triangles of each node. The window shell and ImGui panels sit on top;
//! drawing goes through the [`RenderBackend`](gfx::rendering::RenderBackend)
//! trait.

pub mod app;
pub mod behavior;
pub mod config;
pub mod editor;
pub mod errors;
pub mod gfx;
pub mod input;
pub mod math;
pub mod prelude;
pub mod runtime;
pub mod ui;

// Re-export main types for convenience
pub use app::CairnApp;
pub use config::EditorConfig;
pub use errors::{CairnError, Result};
pub use runtime::Runtime;

/// Creates a windowed editor with the default configuration and no GPU
/// renderer.
pub fn default() -> anyhow::Result<CairnApp> {
    CairnApp::headless(EditorConfig::default())
}
