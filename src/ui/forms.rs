//! Inspector text fields
//!
//! The inspector edits plain strings and only turns them into scene values
//! when the user commits. Parsing lives here so it can be tested without an
//! ImGui frame.

use crate::gfx::scene::{Node, Transform};
use crate::math::Vec3;

/// Row labels of the transform form, in field order.
pub const TRANSFORM_ROWS: [&str; 3] = ["Position", "Scale", "Rotation"];

/// Nine editable numbers: position, scale and rotation, three each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformForm {
    pub fields: [String; 9],
}

impl TransformForm {
    pub fn from_transform(transform: &Transform) -> Self {
        let values = [transform.position, transform.scale, transform.rotation]
            .into_iter()
            .flat_map(Vec3::to_array);
        let mut fields: [String; 9] = Default::default();
        for (field, value) in fields.iter_mut().zip(values) {
            *field = format!("{}", value);
        }
        Self { fields }
    }

    /// The three fields of `row`.
    pub fn row_mut(&mut self, row: usize) -> &mut [String] {
        &mut self.fields[row * 3..row * 3 + 3]
    }

    /// All nine fields as a transform, or `None` if any one does not parse.
    pub fn parse(&self) -> Option<Transform> {
        let mut values = [0.0f32; 9];
        for (value, field) in values.iter_mut().zip(&self.fields) {
            *value = field.trim().parse().ok()?;
            if !value.is_finite() {
                return None;
            }
        }
        let vec = |i: usize| Vec3::new(values[i], values[i + 1], values[i + 2]);
        Some(Transform::new(vec(0), vec(3), vec(6)))
    }
}

/// Mesh and texture paths of a render payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderForm {
    pub object_path: String,
    pub image_path: String,
}

impl RenderForm {
    /// Paths as trimmed strings; both empty means "remove the payload".
    pub fn paths(&self) -> (String, String) {
        (
            self.object_path.trim().to_string(),
            self.image_path.trim().to_string(),
        )
    }

    pub fn is_empty(&self) -> bool {
        let (object, image) = self.paths();
        object.is_empty() && image.is_empty()
    }
}

/// Everything the inspector shows for the selected node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectorForm {
    pub name: String,
    pub transform: TransformForm,
    pub render: RenderForm,
    /// Name typed into the "Add Component" field.
    pub new_behavior: String,
}

impl InspectorForm {
    pub fn from_node(node: &Node) -> Self {
        let render = node
            .render
            .as_ref()
            .map(|render| RenderForm {
                object_path: render.object_path().to_string(),
                image_path: render.image_path().to_string(),
            })
            .unwrap_or_default();
        Self {
            name: node.name.clone(),
            transform: TransformForm::from_transform(node.transform()),
            render,
            new_behavior: String::new(),
        }
    }
}
