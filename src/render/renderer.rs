use glam::{Mat4, Vec3};

use crate::assets::model::Model;
use crate::entities::entities::SceneGraph;
use crate::entities::shape::Shape;
use crate::entities::transform::{rotate_to_vector, NodeId, TransformNode};

use super::types::Color;

/// Draw calls the scene renderer issues. Transforms are full world matrices.
pub trait DrawBackend {
    fn draw_sphere(&mut self, transform: &Mat4, radius: f32, color: Color);
    fn draw_box(&mut self, transform: &Mat4, size: Vec3, color: Color);
    fn draw_cone(&mut self, transform: &Mat4, radius: f32, height: f32, color: Color);
    fn draw_plane(&mut self, transform: &Mat4, normal: Vec3, width: f32, height: f32, color: Color);
    fn draw_wireframe(&mut self, transform: &Mat4, model: &Model, color: Color);
    fn draw_line(&mut self, from: Vec3, to: Vec3, color: Color);
}

/// Red, green and blue lines along the x, y and z axes of `m`.
pub fn draw_axis(backend: &mut dyn DrawBackend, m: &Mat4, len: f32) {
    let origin = m.transform_point3(Vec3::ZERO);
    backend.draw_line(origin, m.transform_point3(Vec3::X * len), Color::RED);
    backend.draw_line(origin, m.transform_point3(Vec3::Y * len), Color::GREEN);
    backend.draw_line(origin, m.transform_point3(Vec3::Z * len), Color::BLUE);
}

pub struct SceneRenderer {
    pub axis_length: f32,
    pub bone_color: Color,
    pub selected_color: Color,
}

impl Default for SceneRenderer {
    fn default() -> Self {
        SceneRenderer { axis_length: 1.5, bone_color: Color::LIGHT_PINK, selected_color: Color::WHITE }
    }
}

impl SceneRenderer {
    /// Draws every node in scene order, the selected one highlighted.
    pub fn draw(&self, scene: &SceneGraph, selected: Option<NodeId>, backend: &mut dyn DrawBackend) {
        draw_axis(backend, &Mat4::IDENTITY, 1.0);

        for (id, node) in scene.iter() {
            let world = match scene.world_matrix(id) {
                Some(world) => world,
                None => continue,
            };
            let color = if selected == Some(id) { self.selected_color } else { node.diffuse };

            match &node.shape {
                Shape::Generic => continue,
                Shape::Sphere { radius } => backend.draw_sphere(&world, *radius, color),
                Shape::Joint { radius } => {
                    backend.draw_sphere(&world, *radius, color);
                    self.draw_bones(scene, node, &world, *radius, backend);
                }
                Shape::Cube { width, height, depth } => {
                    backend.draw_box(&world, Vec3::new(*width, *height, *depth), color)
                }
                Shape::Cone { radius, height } => backend.draw_cone(&world, *radius, *height, color),
                Shape::Plane { normal, width, height } => {
                    backend.draw_plane(&world, *normal, *width, *height, color);
                    continue;
                }
                Shape::Mesh(binding) => {
                    backend.draw_wireframe(&world, &binding.model, color);
                    continue;
                }
            }

            draw_axis(backend, &world, self.axis_length);
        }
    }

    //Wire pyramid from the joint toward each child, apex on the joint surface.
    fn draw_bones(
        &self, scene: &SceneGraph, node: &TransformNode, world: &Mat4, radius: f32,
        backend: &mut dyn DrawBackend,
    ) {
        let origin = world.transform_point3(Vec3::ZERO);

        for child_id in node.children() {
            let child = match scene.get(*child_id) {
                Some(child) => child,
                None => continue,
            };
            let child_radius = child.shape.radius().unwrap_or(0.0);
            let direction = match child.position.try_normalize() {
                Some(direction) => direction,
                None => continue,
            };
            let child_position = match scene.world_position(*child_id) {
                Some(position) => position,
                None => continue,
            };

            let base_w = child_radius / 2.5;
            let height = origin.distance(child_position) - child_radius;
            let m = *world * rotate_to_vector(Vec3::Y, direction);

            let base = [
                Vec3::new(base_w, height, base_w),
                Vec3::new(-base_w, height, base_w),
                Vec3::new(-base_w, height, -base_w),
                Vec3::new(base_w, height, -base_w),
            ]
            .map(|p| m.transform_point3(p));
            let apex = m.transform_point3(Vec3::new(0.0, radius, 0.0));

            for i in 0..4 {
                backend.draw_line(base[i], apex, self.bone_color);
                backend.draw_line(base[i], base[(i + 1) % 4], self.bone_color);
            }
        }
    }
}

/// Backend that only counts and logs what would be drawn. Used headless.
#[derive(Debug, Default)]
pub struct TraceBackend {
    pub spheres: usize,
    pub boxes: usize,
    pub cones: usize,
    pub planes: usize,
    pub wireframes: usize,
    pub lines: usize,
    pub colors: Vec<Color>,
}

impl TraceBackend {
    pub fn primitives(&self) -> usize {
        self.spheres + self.boxes + self.cones + self.planes + self.wireframes
    }
}

impl DrawBackend for TraceBackend {
    fn draw_sphere(&mut self, transform: &Mat4, radius: f32, color: Color) {
        log::trace!("sphere r={} at {}", radius, transform.transform_point3(Vec3::ZERO));
        self.spheres += 1;
        self.colors.push(color);
    }

    fn draw_box(&mut self, transform: &Mat4, size: Vec3, color: Color) {
        log::trace!("box {} at {}", size, transform.transform_point3(Vec3::ZERO));
        self.boxes += 1;
        self.colors.push(color);
    }

    fn draw_cone(&mut self, transform: &Mat4, radius: f32, height: f32, color: Color) {
        log::trace!("cone r={} h={} at {}", radius, height, transform.transform_point3(Vec3::ZERO));
        self.cones += 1;
        self.colors.push(color);
    }

    fn draw_plane(&mut self, transform: &Mat4, normal: Vec3, width: f32, height: f32, color: Color) {
        log::trace!("plane {}x{} n={} at {}", width, height, normal, transform.transform_point3(Vec3::ZERO));
        self.planes += 1;
        self.colors.push(color);
    }

    fn draw_wireframe(&mut self, transform: &Mat4, model: &Model, color: Color) {
        log::trace!("wireframe {} at {}", model.name, transform.transform_point3(Vec3::ZERO));
        self.wireframes += 1;
        self.colors.push(color);
    }

    fn draw_line(&mut self, _from: Vec3, _to: Vec3, _color: Color) {
        self.lines += 1;
    }
}
