use std::rc::Rc;

use glam::Vec3;

use crate::assets::model::Model;
use crate::entities::transform::{NodeId, TransformNode};

/// A loaded model riding along with a joint.
#[derive(Debug, Clone)]
pub struct MeshBinding {
    pub model: Rc<Model>,
    pub driver: NodeId,
    pub offset: Vec3,
}

impl MeshBinding {
    pub fn new(model: Rc<Model>, driver: NodeId, offset: Vec3) -> Self {
        MeshBinding { model, driver, offset }
    }

    /// Moves `node` to the driver's world position (plus offset) and copies its rotation.
    pub fn follow(&self, node: &mut TransformNode, driver_position: Vec3, driver_rotation: Vec3) {
        node.position = driver_position + self.offset;
        node.rotation = driver_rotation;
    }
}
