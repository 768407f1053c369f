//! Compound shapes built from analytic primitives.
//!
//! A [`Shape`] records the exact constructor parameters of each primitive so
//! that hosts with their own geometry kernel can rebuild it, and can also be
//! tessellated into a [`GeomMesh`] for renderers that only take triangles.

use serde::{Deserialize, Serialize};

use super::core::{BBox, Point3, Vec3};
use super::mesh::{GeomMesh, MeshOptions, mesh_disc, mesh_surface};
use super::surface::{ConeSurface, CylinderSurface, SectionSurface, Surface, TorusSurface};

/// RGBA color tag attached to a shape, channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ShapeColor {
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Primitive {
    /// Ring around `axis`; the tube section spans `angle_start..angle_end` degrees.
    Torus {
        center: Point3,
        axis: Vec3,
        major_radius: f64,
        minor_radius: f64,
        angle_start: f64,
        angle_end: f64,
        segments: usize,
    },
    /// Truncated cone from `base` along `direction`.
    Cone {
        base: Point3,
        direction: Vec3,
        radius_start: f64,
        radius_end: f64,
        height: f64,
    },
    /// Cylinder from `base` along `direction`.
    Cylinder {
        base: Point3,
        direction: Vec3,
        radius: f64,
        height: f64,
    },
}

impl Primitive {
    /// Tessellates the primitive as a closed solid where the primitive is closed.
    pub fn to_mesh(&self, options: &MeshOptions) -> Result<GeomMesh, String> {
        match *self {
            Self::Torus {
                center,
                axis,
                major_radius,
                minor_radius,
                angle_start,
                angle_end,
                segments,
            } => {
                let x_axis = if axis.cross(Vec3::X).length() > 1e-9 {
                    Vec3::X
                } else {
                    Vec3::Y
                };
                let torus = TorusSurface::from_center_xaxis_normal(
                    center,
                    x_axis,
                    axis,
                    major_radius,
                    minor_radius,
                )?;
                let span = angle_end - angle_start;
                if !span.is_finite() || span <= 0.0 {
                    return Err("torus section angles must increase".to_string());
                }
                if span >= 360.0 {
                    Ok(mesh_surface(&torus, segments, options.tube_segments))
                } else {
                    let section =
                        SectionSurface::new(&torus, angle_start / 360.0, angle_end / 360.0);
                    Ok(mesh_surface(&section, segments, options.tube_segments))
                }
            }
            Self::Cone {
                base,
                direction,
                radius_start,
                radius_end,
                height,
            } => {
                let axis = scaled_axis(direction, height)?;
                let cone = ConeSurface::new(base, axis, radius_start, radius_end)?;
                let mut mesh =
                    mesh_surface(&cone, options.radial_segments, options.axial_segments + 1);
                if radius_start > 0.0 {
                    mesh.append(mesh_disc(
                        base,
                        -cone.axis_dir,
                        |u| cone.point_at(u, 0.0),
                        options.radial_segments,
                    ));
                }
                if radius_end > 0.0 {
                    mesh.append(mesh_disc(
                        base.add_vec(axis),
                        cone.axis_dir,
                        |u| cone.point_at(u, 1.0),
                        options.radial_segments,
                    ));
                }
                Ok(mesh)
            }
            Self::Cylinder {
                base,
                direction,
                radius,
                height,
            } => {
                let axis = scaled_axis(direction, height)?;
                let cylinder = CylinderSurface::new(base, axis, radius)?;
                let mut mesh =
                    mesh_surface(&cylinder, options.radial_segments, options.axial_segments + 1);
                mesh.append(mesh_disc(
                    base,
                    -cylinder.axis_dir,
                    |u| cylinder.point_at(u, 0.0),
                    options.radial_segments,
                ));
                mesh.append(mesh_disc(
                    base.add_vec(axis),
                    cylinder.axis_dir,
                    |u| cylinder.point_at(u, 1.0),
                    options.radial_segments,
                ));
                Ok(mesh)
            }
        }
    }

    /// Midpoint of the primitive's axis (the center for a torus).
    #[must_use]
    pub fn axis_midpoint(&self) -> Point3 {
        match *self {
            Self::Torus { center, .. } => center,
            Self::Cone {
                base,
                direction,
                height,
                ..
            }
            | Self::Cylinder {
                base,
                direction,
                height,
                ..
            } => base.add_vec(direction.normalized().unwrap_or(Vec3::ZERO) * (0.5 * height)),
        }
    }
}

fn scaled_axis(direction: Vec3, height: f64) -> Result<Vec3, String> {
    if !height.is_finite() || height <= 0.0 {
        return Err("primitive height must be finite and > 0".to_string());
    }
    direction
        .normalized()
        .map(|dir| dir * height)
        .ok_or_else(|| "primitive direction must be non-zero".to_string())
}

/// Compound of primitives with an optional display color.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Shape {
    pub primitives: Vec<Primitive>,
    pub color: Option<ShapeColor>,
}

impl Shape {
    /// The null shape: nothing to draw or pick.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn compound(primitives: Vec<Primitive>, color: ShapeColor) -> Self {
        Self {
            primitives,
            color: Some(color),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Concatenates the tessellation of every primitive.
    pub fn to_mesh(&self, options: &MeshOptions) -> Result<GeomMesh, String> {
        let mut mesh = GeomMesh::default();
        for primitive in &self.primitives {
            mesh.append(primitive.to_mesh(options)?);
        }
        Ok(mesh)
    }

    #[must_use]
    pub fn bounds(&self, options: &MeshOptions) -> Option<BBox> {
        self.to_mesh(options).ok().and_then(|mesh| mesh.bounds())
    }
}
