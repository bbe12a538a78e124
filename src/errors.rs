//! Error Types
//!
//! The single error enum returned by fallible scene, loader and persistence
//! operations.
//!
//! Malformed inspector input and failed asset loads are recovered where they
//! happen (the commit is dropped, the payload goes inactive) and never reach
//! this type's callers as hard failures.

use thiserror::Error;

use crate::gfx::scene::NodeId;

/// The main error type for the editor core.
#[derive(Error, Debug)]
pub enum CairnError {
    // ========================================================================
    // Scene Graph Errors
    // ========================================================================
    /// Reparenting would make a node its own ancestor.
    #[error("cannot attach {child:?} under {parent:?}: it would create a cycle")]
    HierarchyCycle {
        /// Node being moved
        child: NodeId,
        /// Requested new parent
        parent: NodeId,
    },

    /// The node id does not refer to a live node.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    // ========================================================================
    // Behavior Errors
    // ========================================================================
    /// No factory is registered under this behavior name.
    #[error("unknown behavior kind: {0}")]
    UnknownBehavior(String),

    /// A behavior factory rejected its arguments.
    #[error("invalid arguments for behavior {kind}: {reason}")]
    BehaviorArgs {
        /// Behavior kind name
        kind: String,
        /// What was wrong
        reason: String,
    },

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// OBJ parsing error.
    #[error("failed to load mesh {path}: {source}")]
    MeshLoad {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    /// The OBJ file loaded but has nothing drawable in it.
    #[error("mesh {0} contains no triangles")]
    EmptyMesh(String),

    /// A `builtin:` asset path names nothing the crate generates.
    #[error("unknown builtin asset: {0}")]
    UnknownBuiltin(String),

    /// Image decoding error.
    #[error("failed to load texture {path}: {source}")]
    TextureLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, CairnError>`.
pub type Result<T> = std::result::Result<T, CairnError>;
