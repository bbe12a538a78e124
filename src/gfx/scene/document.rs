//! JSON scene files
//!
//! A scene file holds a list of top-level objects, each with its name,
//! transform, render paths, behaviors and nested children:
//!
//! ```json
//! {
//!   "objects": [
//!     {
//!       "name": "Crate",
//!       "transform": {
//!         "pos": { "x": 0.0, "y": 0.0, "z": 5.0 },
//!         "scale": { "x": 1.0, "y": 1.0, "z": 1.0 },
//!         "rot": { "x": 0.0, "y": 0.0, "z": 0.0 }
//!       },
//!       "render_component": { "object_path": "builtin:cube", "image_path": "builtin:checker" },
//!       "scripts": [ { "name": "Spin", "args": [0.0, 0.0, 1.0] } ],
//!       "children": []
//!     }
//!   ]
//! }
//! ```
//!
//! Flat files that link objects through `parent_name` instead of nesting
//! are read as well; each such object is attached under the first object
//! declared with that name.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::behavior::BehaviorRegistry;
use crate::errors::{CairnError, Result};
use crate::gfx::camera::Projection;
use crate::gfx::rendering::RenderBackend;
use crate::math::Vec3;

use super::render_component::RenderComponent;
use super::transform::Transform;
use super::{NodeId, Scene};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformDocument {
    pub pos: Vec3,
    pub scale: Vec3,
    pub rot: Vec3,
}

impl Default for TransformDocument {
    fn default() -> Self {
        Transform::identity().into()
    }
}

impl From<Transform> for TransformDocument {
    fn from(t: Transform) -> Self {
        Self {
            pos: t.position,
            scale: t.scale,
            rot: t.rotation,
        }
    }
}

impl From<&TransformDocument> for Transform {
    fn from(t: &TransformDocument) -> Self {
        Transform::new(t.pos, t.scale, t.rot)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderDocument {
    pub object_path: String,
    pub image_path: String,
}

/// A behavior by registry name plus its constructor arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorEntry {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub name: String,
    #[serde(default)]
    pub transform: TransformDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_component: Option<RenderDocument>,
    #[serde(default)]
    pub scripts: Vec<BehaviorEntry>,
    #[serde(default)]
    pub children: Vec<NodeDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
}

/// The active camera, by its position in depth-first order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraDocument {
    pub node_index: usize,
    #[serde(default)]
    pub projection: Projection,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub objects: Vec<NodeDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraDocument>,
}

impl SceneDocument {
    /// Snapshot of the live tree.
    pub fn capture(scene: &Scene) -> Self {
        let objects = scene
            .roots()
            .iter()
            .filter_map(|&root| capture_node(scene, root))
            .collect();

        let camera = scene.active_camera().and_then(|camera| {
            let node_index = scene.depth_first().iter().position(|&id| id == camera.node)?;
            Some(CameraDocument {
                node_index,
                projection: camera.projection,
            })
        });

        Self { objects, camera }
    }

    /// Adds the document's nodes to `scene` and returns the new top-level ids.
    ///
    /// Payloads are loaded through `backend`; a payload that fails to load
    /// stays inactive. An unknown behavior name or bad behavior arguments
    /// abort the whole load and leave `scene` as it was.
    pub fn instantiate(
        &self,
        scene: &mut Scene,
        registry: &BehaviorRegistry,
        backend: &mut dyn RenderBackend,
    ) -> Result<Vec<NodeId>> {
        let mut created = Vec::new();
        let mut roots = Vec::new();
        let mut result = Ok(());

        for object in &self.objects {
            match build_node(object, None, scene, registry, backend, &mut created) {
                Ok(id) => roots.push(id),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        if result.is_ok() {
            result = self.link_parent_names(scene, &roots);
        }

        if let Err(e) = result {
            for id in created.into_iter().rev() {
                if scene.contains(id) {
                    if let Err(e) = scene.destroy(id, backend) {
                        log::warn!("Rollback could not destroy {:?}: {}", id, e);
                    }
                }
            }
            return Err(e);
        }

        if let Some(camera) = self.camera {
            let order = scene.depth_first();
            let new_nodes: Vec<NodeId> = order.into_iter().filter(|id| created.contains(id)).collect();
            match new_nodes.get(camera.node_index) {
                Some(&node) => scene.set_active_camera(node, camera.projection)?,
                None => log::warn!("Scene camera index {} is out of range", camera.node_index),
            }
        }

        Ok(roots.into_iter().filter(|&id| scene.parent(id).is_none()).collect())
    }

    /// Attaches flat objects to the first object declared with their
    /// `parent_name`.
    fn link_parent_names(&self, scene: &mut Scene, roots: &[NodeId]) -> Result<()> {
        for (object, &id) in self.objects.iter().zip(roots) {
            let Some(parent_name) = object.parent_name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let parent = self
                .objects
                .iter()
                .zip(roots)
                .find(|(candidate, _)| candidate.name == parent_name)
                .map(|(_, &parent)| parent);
            match parent {
                Some(parent) => scene.add_child(parent, id, None)?,
                None => log::warn!("'{}' names missing parent '{}'", object.name, parent_name),
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let document = Self::from_json(&text)?;
        log::info!(
            "Read {} top-level objects from {}",
            document.objects.len(),
            path.as_ref().display()
        );
        Ok(document)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Saved scene to {}", path.as_ref().display());
        Ok(())
    }
}

fn capture_node(scene: &Scene, id: NodeId) -> Option<NodeDocument> {
    let node = scene.get(id)?;
    Some(NodeDocument {
        name: node.name.clone(),
        transform: (*node.transform()).into(),
        render_component: node.render.as_ref().map(|render| RenderDocument {
            object_path: render.object_path().to_string(),
            image_path: render.image_path().to_string(),
        }),
        scripts: node
            .behaviors()
            .map(|behavior| BehaviorEntry {
                name: behavior.kind().name().to_string(),
                args: behavior.args(),
            })
            .collect(),
        children: node
            .children()
            .iter()
            .filter_map(|&child| capture_node(scene, child))
            .collect(),
        parent_name: None,
    })
}

/// Builds `doc` and its subtree; every node made is pushed to `created`.
fn build_node(
    doc: &NodeDocument,
    parent: Option<NodeId>,
    scene: &mut Scene,
    registry: &BehaviorRegistry,
    backend: &mut dyn RenderBackend,
    created: &mut Vec<NodeId>,
) -> Result<NodeId> {
    let transform = Transform::from(&doc.transform);
    let id = match parent {
        Some(parent) => scene.spawn_child(parent, doc.name.clone(), transform)?,
        None => scene.spawn(doc.name.clone(), transform),
    };
    created.push(id);

    if let Some(render) = &doc.render_component {
        let component = RenderComponent::loaded(&render.object_path, &render.image_path, backend);
        scene.set_render_component(id, Some(component), backend)?;
    }

    for entry in &doc.scripts {
        let behavior = registry.create(&entry.name, &entry.args)?;
        scene.attach_behavior(id, behavior)?;
    }

    for child in &doc.children {
        build_node(child, Some(id), scene, registry, backend, created)?;
    }

    Ok(id)
}

/// Replaces everything in `scene` with the file at `path`.
pub fn load_scene(
    path: impl AsRef<Path>,
    scene: &mut Scene,
    registry: &BehaviorRegistry,
    backend: &mut dyn RenderBackend,
) -> Result<()> {
    let document = SceneDocument::load(path)?;
    let mut fresh = Scene::new();
    document.instantiate(&mut fresh, registry, backend)?;
    scene.clear(backend);
    *scene = fresh;
    Ok(())
}

/// Writes `scene` to `path`.
pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> Result<()> {
    SceneDocument::capture(scene).save(path)
}
