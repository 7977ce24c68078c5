use std::error::Error;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

use glam::{Vec2, Vec3};

use crate::assets::hierarchy;
use crate::assets::model::{GltfLoader, MeshLoader};
use crate::entities::animation::Animator;
use crate::entities::entities::{Invalidation, SceneGraph};
use crate::entities::ray::{self, Ray};
use crate::entities::transform::NodeId;
use crate::environment::config::EditorConfiguration;
use crate::environment::error::{HierarchyError, SceneError};
use crate::event::{ElementState, Event, EventSubscriber, Key, MouseButton};
use crate::input::InputState;
use crate::render::camera::Camera;
use crate::render::renderer::{DrawBackend, SceneRenderer};
use crate::utils::{trailing_number, FileUtils};

/// Parent and children names of one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Family {
    pub name: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} family:", self.name)?;
        if let Some(parent) = &self.parent {
            write!(f, " parent: {}", parent)?;
        }
        if !self.children.is_empty() {
            write!(f, " children: {}", self.children.join(", "))?;
        }
        Ok(())
    }
}

/// One editing session: the scene, its keyframes and everything the mouse and keyboard drive.
pub struct Editor<C: Camera> {
    config: EditorConfiguration,
    camera: C,
    scene: SceneGraph,
    animator: Animator,
    input: InputState,
    loader: Box<dyn MeshLoader>,
    renderer: SceneRenderer,
    selected: Option<NodeId>,
    dragging: bool,
    last_point: Vec3,
    playing: bool,
    joint_number: u32,
}

impl<C: Camera> Editor<C> {
    pub fn new(config: EditorConfiguration, camera: C) -> Self {
        log::info!("Init Editor");

        Editor {
            scene: SceneGraph::new(&config.ground),
            animator: Animator::new(config.frame_rate),
            config,
            camera,
            input: InputState::new(),
            loader: Box::new(GltfLoader),
            renderer: SceneRenderer::default(),
            selected: None,
            dragging: false,
            last_point: Vec3::ZERO,
            playing: false,
            joint_number: 0,
        }
    }

    pub fn with_loader(mut self, loader: Box<dyn MeshLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn config(&self) -> &EditorConfiguration {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EditorConfiguration {
        &mut self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn joint_number(&self) -> u32 {
        self.joint_number
    }

    /// Selects `id` directly. Unknown or unselectable nodes clear the selection.
    pub fn select(&mut self, id: Option<NodeId>) {
        self.selected =
            id.filter(|id| self.scene.get(*id).map(|node| node.is_selectable).unwrap_or(false));
    }

    /// World-space ray from the near plane through `screen`.
    pub fn camera_ray(&self, screen: Vec2) -> Option<Ray> {
        let p = self.camera.screen_to_world(screen);
        let direction = (p - self.camera.position()).try_normalize()?;
        Some(Ray::new(p, direction))
    }

    /// Where `screen` meets the plane facing the camera through the selected node,
    /// or through the origin when nothing is selected.
    pub fn drag_plane_point(&self, screen: Vec2) -> Option<Vec3> {
        let ray = self.camera_ray(screen)?;
        let origin = self.selected.and_then(|id| self.scene.world_position(id)).unwrap_or(Vec3::ZERO);
        let normal = self.camera.z_axis().try_normalize()?;

        let t = ray::intersect_plane(&Ray::new(ray.origin - origin, ray.direction), normal)?;
        Some(ray.eval_point(t))
    }

    /// Picks the node under `screen` and starts dragging it. A miss clears the selection.
    pub fn select_at(&mut self, screen: Vec2) -> Option<NodeId> {
        self.selected = self.camera_ray(screen).and_then(|ray| self.scene.pick(&ray, self.camera.position()));

        if self.selected.is_some() {
            self.dragging = true;
            self.last_point = self.drag_plane_point(screen).unwrap_or(self.last_point);
        }

        log::debug!("Selected {:?}", self.selected);
        self.selected
    }

    /// Moves the selected node with the cursor, or rotates it while X, Y or Z is held.
    pub fn drag_to(&mut self, screen: Vec2) {
        let id = match self.selected {
            Some(id) if self.dragging => id,
            _ => return,
        };
        let point = match self.drag_plane_point(screen) {
            Some(point) => point,
            None => return,
        };

        match self.input.rotate_axis() {
            Some(axis) => {
                let amount = (point.x - self.last_point.x) * self.config.rotate_sensitivity;
                if let Some(node) = self.scene.get_mut(id) {
                    node.rotation += axis * amount;
                }
            }
            None => {
                let target = self.scene.world_position(id).unwrap_or(point) + (point - self.last_point);
                if let Err(e) = self.scene.set_world_position(id, target) {
                    log::warn!("Could not move {:?}. {}", id, e);
                }
            }
        }

        self.last_point = point;
    }

    pub fn release(&mut self) {
        self.dragging = false;
    }

    /// Creates a joint under the cursor, as a child of the selected node if there is one.
    pub fn create_joint_at(&mut self, screen: Vec2) -> Result<NodeId, SceneError> {
        let point = self.drag_plane_point(screen).ok_or(SceneError::MissedDragPlane)?;
        self.create_joint(point)
    }

    pub fn create_joint(&mut self, point: Vec3) -> Result<NodeId, SceneError> {
        let name = format!("joint{}", self.joint_number);
        if self.scene.find(&name).is_some() {
            return Err(SceneError::NameTaken(name));
        }
        let id = self.scene.create_joint(name, self.config.joint_radius, point, self.selected)?;
        self.joint_number = self.joint_number.saturating_add(1);

        log::debug!("Created {:?} at {} under {:?}", id, point, self.selected);
        Ok(id)
    }

    /// Deletes the selected joint. Keyframes and model bindings do not survive it.
    pub fn remove_selected(&mut self) -> Result<Invalidation, SceneError> {
        let id = self.selected.ok_or(SceneError::NothingSelected)?;
        let invalidation = self.scene.remove_node(id)?;

        self.animator.invalidate(&invalidation);
        self.playing = false;
        self.scene.unbind_all();
        self.selected = None;
        self.dragging = false;

        Ok(invalidation)
    }

    pub fn record_start(&mut self) -> Result<(), SceneError> {
        let id = self.selected.ok_or(SceneError::NothingSelected)?;
        self.animator.record_start(&self.scene, id)
    }

    pub fn record_end(&mut self) -> Result<(), SceneError> {
        let id = self.selected.ok_or(SceneError::NothingSelected)?;
        self.animator.record_end(&self.scene, id)
    }

    /// Starts a playback unless one is already running. Returns whether it started.
    pub fn play(&mut self, reverse: bool) -> bool {
        if self.playing {
            return false;
        }

        self.playing = true;
        self.animator.begin_playback(&mut self.scene, reverse, self.config.half_duration());
        self.scene.sync_bindings();
        true
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// One frame: advance the playback, then move bound models onto their joints.
    pub fn tick(&mut self) {
        if self.playing {
            self.playing = self.animator.advance_frame(&mut self.scene);
        }
        self.scene.sync_bindings();
    }

    pub fn draw(&self, backend: &mut dyn DrawBackend) {
        self.renderer.draw(&self.scene, self.selected, backend);
    }

    pub fn save(&self, path: &Path) -> Result<usize, HierarchyError> {
        hierarchy::save(&self.scene, path)
    }

    /// Replaces the scene with the joints in `path`. A file that fails to parse leaves
    /// the current scene untouched.
    pub fn load(&mut self, path: &Path) -> Result<usize, HierarchyError> {
        let records = hierarchy::load(path)?;
        let next_number =
            records.iter().filter_map(|r| trailing_number(&r.name)).max().map(|max| max.saturating_add(1));

        self.scene.clear();
        self.animator.clear();
        self.selected = None;
        self.dragging = false;
        self.playing = false;

        let created = hierarchy::apply(&records, &mut self.scene, self.config.joint_radius);

        if let Some(next) = next_number {
            self.joint_number = self.joint_number.max(next);
        }

        log::info!("Loaded {} joints from {}", created.len(), FileUtils::pts(path));
        Ok(created.len())
    }

    /// Loads a model and binds it to the selected joint.
    pub fn bind_model(&mut self, path: &Path) -> Result<NodeId, Box<dyn Error>> {
        let driver = self.selected.ok_or(SceneError::NothingSelected)?;
        if self.scene.binding_of(driver).is_some() {
            return Err(Box::new(SceneError::AlreadyBound(driver)));
        }

        let model = self.loader.load_model(path)?.scaled(self.config.model_scale);
        let id = self.scene.bind_mesh(driver, Rc::new(model), self.config.model_offset)?;

        log::info!("Bound {} to {:?}", FileUtils::file_name(path), driver);
        Ok(id)
    }

    pub fn family(&self, id: NodeId) -> Option<Family> {
        let node = self.scene.get(id)?;
        let name_of = |id: &NodeId| self.scene.get(*id).map(|n| n.name.clone());

        Some(Family {
            name: node.name.clone(),
            parent: node.parent().as_ref().and_then(name_of),
            children: node.children().iter().filter_map(name_of).collect(),
        })
    }

    fn on_key(&mut self, key: Key) -> bool {
        match key {
            Key::Key1 => report("record start", self.record_start()),
            Key::Key2 => report("record end", self.record_end()),
            Key::J => report("create joint", self.create_joint_at(self.input.mouse_position())),
            Key::Backspace | Key::Delete => report("remove joint", self.remove_selected()),
            Key::P => {
                self.play(false);
            }
            Key::R => {
                self.play(true);
            }
            Key::S => {
                let path = self.config.hierarchy_file.clone();
                report("save", self.save(&path));
            }
            Key::L => {
                let path = self.config.hierarchy_file.clone();
                report("load", self.load(&path));
            }
            Key::I => {
                if let Some(family) = self.selected.and_then(|id| self.family(id)) {
                    log::info!("{}", family);
                }
            }
            _ => return false,
        }
        true
    }
}

fn report<T, E: fmt::Display>(action: &str, result: Result<T, E>) {
    if let Err(e) = result {
        log::warn!("Could not {}. {}", action, e);
    }
}

impl<C: Camera> EventSubscriber for Editor<C> {
    fn on_event(&mut self, event: &Event) -> bool {
        self.input.on_event(event);

        match event {
            Event::KeyboardInput { keycode, state: ElementState::Pressed } => self.on_key(*keycode),
            Event::MouseInput { mousecode: MouseButton::Left, state, position } => {
                match state {
                    ElementState::Pressed => {
                        self.select_at(*position);
                    }
                    ElementState::Released => self.release(),
                }
                true
            }
            Event::CursorMoved { position } => {
                if self.dragging {
                    self.drag_to(*position);
                }
                self.dragging
            }
            Event::DroppedFile(path) => {
                if let Err(e) = self.bind_model(path) {
                    log::warn!("Could not bind {}. {}", FileUtils::pts(path), e);
                }
                true
            }
            Event::Resized { width, height } => {
                self.camera.resize(*width, *height);
                false
            }
            _ => false,
        }
    }
}
