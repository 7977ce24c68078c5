use glam::{Mat4, Vec2, Vec3};

use crate::event::{Event, EventSubscriber};

/// What the editor needs from a camera to turn the mouse into world-space rays.
pub trait Camera {
    /// Unprojects a pixel (origin top left) onto the near plane.
    fn screen_to_world(&self, screen: Vec2) -> Vec3;
    fn position(&self) -> Vec3;
    /// Camera-space +Z in world space, pointing away from what the camera looks at.
    fn z_axis(&self) -> Vec3;
    fn resize(&mut self, _width: u32, _height: u32) {}
}

pub struct PerspectiveCamera {
    position: Vec3,
    rotation: Vec3,
    fovy: f32,
    viewport: Vec2,
    near: f32,
    far: f32,
    view: Mat4,
    projection: Mat4,
}

impl EventSubscriber for PerspectiveCamera {
    fn on_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Resized { width, height } => {
                self.resize(*width, *height);
                false
            }
            _ => false,
        }
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        let mut camera = PerspectiveCamera {
            position: Vec3::new(0.0, 0.0, 10.0),
            rotation: Vec3::ZERO,
            fovy: 45.0,
            viewport: Vec2::new(1280.0, 720.0),
            near: 0.1,
            far: 100.0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.calc_view_projection();
        camera
    }
}

impl PerspectiveCamera {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        let mut camera = PerspectiveCamera { position, rotation, ..Default::default() };
        camera.calc_view_projection();
        camera
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    fn calc_view_projection(&mut self) {
        let aspect_ratio = if self.viewport.y > 0.0 { self.viewport.x / self.viewport.y } else { 1.0 };
        self.projection = Mat4::perspective_rh(self.fovy.to_radians(), aspect_ratio, self.near, self.far);
        self.view = self.transform().inverse();
    }

    //Camera to world.
    fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position) * self.rotate_matrix()
    }

    fn rotate_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.calc_view_projection();
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.calc_view_projection();
    }

    pub fn set_fovy(&mut self, fovy: f32) {
        self.fovy = fovy;
        self.calc_view_projection();
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }
}

impl Camera for PerspectiveCamera {
    fn screen_to_world(&self, screen: Vec2) -> Vec3 {
        let ndc = Vec3::new(
            2.0 * screen.x / self.viewport.x - 1.0,
            1.0 - 2.0 * screen.y / self.viewport.y,
            0.0,
        );
        self.view_projection().inverse().project_point3(ndc)
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn z_axis(&self) -> Vec3 {
        self.rotate_matrix().transform_vector3(Vec3::Z)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = Vec2::new(width as f32, height as f32);
        self.calc_view_projection();
    }
}
