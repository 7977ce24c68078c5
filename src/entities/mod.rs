pub mod animation;
pub mod entities;
pub mod mesh;
pub mod ray;
pub mod shape;
pub mod transform;
