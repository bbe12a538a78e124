//! # User Interface Module
//!
//! Dear ImGui front end of the editor: the hierarchy tree, the inspector
//! and the scene controls.
//!
//! ## Architecture
//!
//! - [`UiManager`] - ImGui context, winit input glue and frame timing
//! - [`panel`] - The editor windows, drawn against a [`Runtime`]
//! - [`forms`] - Inspector text fields and their parsing
//!
//! ## Input Handling
//!
//! Window events go to the UI first. When a panel wants the mouse or the
//! keyboard, the event does not reach behaviors or viewport picking.
//!
//! [`Runtime`]: crate::runtime::Runtime

pub mod forms;
pub mod manager;
pub mod panel;

// Re-export main types
pub use forms::{InspectorForm, RenderForm, TransformForm};
pub use manager::UiManager;
pub use panel::editor_panels;
