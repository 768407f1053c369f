//! Geometry kernel used by the joint glyphs: vector math, analytic primitive
//! surfaces and their tessellation.

mod core;
mod mesh;
mod shape;
mod surface;

pub use core::{BBox, Point3, Tolerance, Vec3};
pub use mesh::{GeomMesh, MeshOptions, mesh_disc, mesh_surface};
pub use shape::{Primitive, Shape, ShapeColor};
pub use surface::{ConeSurface, CylinderSurface, SectionSurface, Surface, TorusSurface};

#[cfg(test)]
mod tests;
