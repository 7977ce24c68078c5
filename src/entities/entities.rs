use std::rc::Rc;

use glam::{Mat4, Vec3};
use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::assets::model::Model;
use crate::entities::mesh::MeshBinding;
use crate::entities::ray::{self, Hit, Ray};
use crate::entities::shape::Shape;
use crate::entities::transform::{NodeId, TransformNode};
use crate::environment::config::GroundConfiguration;
use crate::environment::error::SceneError;
use crate::render::types::Color;

//Deepest hierarchy the ancestor walk follows before assuming a cycle.
const MAX_DEPTH: usize = 1024;

/// What a structural edit made stale. Anything keyed by these ids must be dropped or re-validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalidation {
    pub removed: NodeId,
    pub reparented: SmallVec<[NodeId; 4]>,
}

/// Ordered arena of every node in the scene.
///
/// Slot 0 always holds the ground plane, which can neither be selected nor removed.
pub struct SceneGraph {
    nodes: HashMap<NodeId, TransformNode>,
    order: Vec<NodeId>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new(ground: &GroundConfiguration) -> Self {
        let mut graph = SceneGraph { nodes: HashMap::new(), order: Vec::new(), next_id: 0 };

        let plane = TransformNode::new(
            "ground",
            Shape::Plane { normal: ground.normal, width: ground.width, height: ground.height },
        )
        .with_position(ground.position)
        .with_color(Color::DARK_GREEN)
        .with_selectable(false);

        graph.insert(plane);
        graph
    }

    pub fn ground(&self) -> NodeId {
        self.order[0]
    }

    pub fn insert(&mut self, node: TransformNode) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;

        self.nodes.insert(id, node);
        self.order.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&TransformNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut TransformNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes, ground plane included.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn ids(&self) -> &[NodeId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> + '_ {
        self.order.iter().filter_map(move |id| self.nodes.get(id).map(|node| (*id, node)))
    }

    pub fn joints(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> + '_ {
        self.iter().filter(|(_, node)| node.shape.is_joint())
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, node)| node.name == name).map(|(id, _)| id)
    }

    pub fn roots(&self) -> Vec<NodeId> {
        let ground = self.ground();
        self.iter().filter(|(id, node)| *id != ground && node.is_root()).map(|(id, _)| id).collect()
    }

    /// Makes `child` a child of `parent`, unlinking it from any previous parent first.
    ///
    /// The caller guarantees `parent` is not a descendant of `child`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::UnknownNode(child));
        }
        if child == self.ground() {
            return Err(SceneError::GroundPlane);
        }
        debug_assert!(!self.is_ancestor(child, parent), "reparenting would create a cycle");

        self.detach(child);

        if let Some(node) = self.nodes.get_mut(&parent) {
            node.push_child(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.set_parent(Some(parent));
        }
        Ok(())
    }

    /// Turns `child` into a root. Unknown ids are ignored.
    pub fn detach(&mut self, child: NodeId) {
        let old_parent = match self.nodes.get_mut(&child) {
            Some(node) => node.parent().map(|p| {
                node.set_parent(None);
                p
            }),
            None => None,
        };

        if let Some(node) = old_parent.and_then(|p| self.nodes.get_mut(&p)) {
            node.remove_child(child);
        }
    }

    /// True when `ancestor` is found walking up from `node` (a node is its own ancestor).
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        for _ in 0..MAX_DEPTH {
            match current {
                Some(id) if id == ancestor => return true,
                Some(id) => current = self.nodes.get(&id).and_then(|n| n.parent()),
                None => return false,
            }
        }
        false
    }

    /// Number of ancestors above `id`, `None` when unknown or deeper than the walk allows.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let mut current = self.nodes.get(&id)?.parent();
        for depth in 0..MAX_DEPTH {
            match current {
                Some(parent) => current = self.nodes.get(&parent)?.parent(),
                None => return Some(depth),
            }
        }
        None
    }

    pub fn local_matrix(&self, id: NodeId) -> Option<Mat4> {
        self.nodes.get(&id).map(|node| node.local_matrix())
    }

    /// Parent world matrix times local matrix, all the way up. Recomputed on every call.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.nodes.get(&id)?;
        match node.parent() {
            Some(parent) => Some(self.world_matrix(parent)? * node.local_matrix()),
            None => Some(node.local_matrix()),
        }
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_point3(Vec3::ZERO))
    }

    /// Solves the local position that puts the node's origin at world point `point`,
    /// keeping parent, rotation, pivot and scale as they are.
    pub fn set_world_position(&mut self, id: NodeId, point: Vec3) -> Result<(), SceneError> {
        let node = self.nodes.get(&id).ok_or(SceneError::UnknownNode(id))?;

        let parent_world = match node.parent() {
            Some(parent) => self.world_matrix(parent).ok_or(SceneError::UnknownNode(parent))?,
            None => Mat4::IDENTITY,
        };
        let inverse = ray::invert(&parent_world).ok_or(SceneError::NotInvertible(id))?;
        let position = inverse.transform_point3(point) - node.pivot_offset();

        if let Some(node) = self.nodes.get_mut(&id) {
            node.position = position;
        }
        Ok(())
    }

    pub fn intersect(&self, id: NodeId, ray: &Ray) -> Option<Hit> {
        let node = self.nodes.get(&id)?;
        node.shape.intersect(&self.world_matrix(id)?, ray)
    }

    /// Selectable node hit by `ray` whose origin is closest to `eye`.
    pub fn pick(&self, ray: &Ray, eye: Vec3) -> Option<NodeId> {
        let picked = self
            .iter()
            .filter(|(_, node)| node.is_selectable)
            .filter(|(id, _)| self.intersect(*id, ray).is_some())
            .filter_map(|(id, _)| Some((id, (self.world_position(id)? - eye).length())))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id);

        log::trace!("Picked {:?}", picked);
        picked
    }

    /// Adds a joint whose origin sits at world `point`, below `parent` when given.
    pub fn create_joint<S: Into<String>>(
        &mut self, name: S, radius: f32, point: Vec3, parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        if let Some(parent) = parent {
            let world = self.world_matrix(parent).ok_or(SceneError::UnknownNode(parent))?;
            ray::invert(&world).ok_or(SceneError::NotInvertible(parent))?;
        }

        let joint = TransformNode::new(name, Shape::Joint { radius }).with_color(Color::BLUE);
        let id = self.insert(joint);

        if let Some(parent) = parent {
            self.add_child(parent, id)?;
        }
        self.set_world_position(id, point)?;
        Ok(id)
    }

    /// Erases `id`. Its children move up to its parent, or become roots when it had none.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Invalidation, SceneError> {
        if id == self.ground() {
            return Err(SceneError::GroundPlane);
        }

        let node = self.nodes.get(&id).ok_or(SceneError::UnknownNode(id))?;
        let parent = node.parent();
        let children: SmallVec<[NodeId; 4]> = node.children().iter().copied().collect();

        match parent {
            Some(parent) => {
                for &child in &children {
                    self.add_child(parent, child)?;
                }
                self.detach(id);
            }
            None => {
                for &child in &children {
                    self.detach(child);
                }
            }
        }

        self.nodes.remove(&id);
        self.order.retain(|n| *n != id);

        log::debug!("Removed {:?}, reparented {:?} to {:?}", id, children, parent);
        Ok(Invalidation { removed: id, reparented: children })
    }

    /// Removes everything but the ground plane.
    pub fn clear(&mut self) {
        let ground = self.ground();
        self.nodes.retain(|id, _| *id == ground);
        self.order.truncate(1);
    }

    /// Adds a mesh node that follows `driver`. A joint carries at most one model.
    pub fn bind_mesh(
        &mut self, driver: NodeId, model: Rc<Model>, offset: Vec3,
    ) -> Result<NodeId, SceneError> {
        if !self.contains(driver) {
            return Err(SceneError::UnknownNode(driver));
        }
        if self.binding_of(driver).is_some() {
            return Err(SceneError::AlreadyBound(driver));
        }

        let name = model.name.clone();
        let binding = MeshBinding::new(model, driver, offset);
        let id = self.insert(
            TransformNode::new(name, Shape::Mesh(binding)).with_color(Color::LIGHT_GREY).with_selectable(false),
        );

        self.sync_bindings();
        Ok(id)
    }

    pub fn binding_of(&self, driver: NodeId) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| matches!(&node.shape, Shape::Mesh(b) if b.driver == driver))
            .map(|(id, _)| id)
    }

    pub fn unbind_all(&mut self) {
        let meshes: Vec<NodeId> =
            self.iter().filter(|(_, n)| matches!(n.shape, Shape::Mesh(_))).map(|(id, _)| id).collect();

        for id in meshes {
            if let Err(e) = self.remove_node(id) {
                log::error!("Could not unbind mesh {:?}. {}", id, e);
            }
        }
    }

    /// Moves every bound mesh onto its driving joint. Meshes whose driver is gone stay put.
    pub fn sync_bindings(&mut self) {
        let updates: Vec<(NodeId, MeshBinding, Vec3, Vec3)> = self
            .iter()
            .filter_map(|(id, node)| match &node.shape {
                Shape::Mesh(binding) => {
                    let driver = self.nodes.get(&binding.driver)?;
                    let position = self.world_position(binding.driver)?;
                    Some((id, binding.clone(), position, driver.rotation))
                }
                _ => None,
            })
            .collect();

        for (id, binding, position, rotation) in updates {
            if let Some(node) = self.nodes.get_mut(&id) {
                binding.follow(node, position, rotation);
            }
        }
    }
}
