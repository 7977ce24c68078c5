use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

use crate::entities::shape::Shape;
use crate::render::types::Color;

//Below this the cross product of two unit vectors is treated as zero.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Handle of a node inside a [`SceneGraph`](crate::entities::entities::SceneGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Position, rotation, scale and pivot of one node plus its links into the hierarchy.
///
/// Rotation is stored as Euler angles in degrees and applied yaw (y), pitch (x), roll (z).
/// The links are plain ids, the owning [`SceneGraph`](crate::entities::entities::SceneGraph)
/// is the only place that rewires them.
#[derive(Debug, Clone)]
pub struct TransformNode {
    pub name: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub pivot: Vec3,
    pub shape: Shape,
    pub diffuse: Color,
    pub is_selectable: bool,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl TransformNode {
    pub fn new<S: Into<String>>(name: S, shape: Shape) -> Self {
        TransformNode {
            name: name.into(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            pivot: Vec3::ZERO,
            shape,
            diffuse: Color::GREY,
            is_selectable: true,
            parent: None,
            children: SmallVec::new(),
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.diffuse = color;
        self
    }

    pub fn with_selectable(mut self, selectable: bool) -> Self {
        self.is_selectable = selectable;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|c| *c != child);
    }

    pub fn rotate_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
    }

    pub fn translate_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }

    pub fn scale_matrix(&self) -> Mat4 {
        Mat4::from_scale(self.scale)
    }

    /// Translate * pivot * rotate * inverse pivot * scale. The order is fixed.
    pub fn local_matrix(&self) -> Mat4 {
        let pre = Mat4::from_translation(-self.pivot);
        let post = Mat4::from_translation(self.pivot);

        self.translate_matrix() * post * self.rotate_matrix() * pre * self.scale_matrix()
    }

    //Where the local origin lands relative to `position` once the pivoted rotation is applied.
    pub(crate) fn pivot_offset(&self) -> Vec3 {
        self.pivot - self.rotate_matrix().transform_point3(self.pivot)
    }
}

/// Rotation taking unit vector `from` onto unit vector `to`.
///
/// Parallel inputs give the identity, opposite inputs a half turn about an axis
/// perpendicular to `from`.
pub fn rotate_to_vector(from: Vec3, to: Vec3) -> Mat4 {
    let axis = from.cross(to);
    let cos = from.dot(to).clamp(-1.0, 1.0);

    if axis.length_squared() < PARALLEL_EPSILON * PARALLEL_EPSILON {
        if cos > 0.0 {
            return Mat4::IDENTITY;
        }
        let perpendicular = from.any_orthonormal_vector();
        return Mat4::from_quat(Quat::from_axis_angle(perpendicular, std::f32::consts::PI));
    }

    Mat4::from_quat(Quat::from_axis_angle(axis.normalize(), cos.acos()))
}
