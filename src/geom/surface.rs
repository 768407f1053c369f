use std::f64::consts::TAU;

use super::core::{Point3, Vec3};

fn wrap_param(value: f64, start: f64, end: f64) -> f64 {
    let span = end - start;
    if !span.is_finite() || span == 0.0 {
        return start;
    }
    let mut t = (value - start) % span;
    if t < 0.0 {
        t += span;
    }
    start + t
}

fn orthogonal_unit_vector(reference: Vec3) -> Vec3 {
    let candidate = if reference.x.abs() < reference.y.abs() {
        Vec3::new(0.0, -reference.z, reference.y)
    } else {
        Vec3::new(-reference.z, 0.0, reference.x)
    };

    candidate.normalized().unwrap_or(Vec3::X)
}

fn frame_axes_from_xaxis_normal(x_axis: Vec3, normal: Vec3) -> (Vec3, Vec3, Vec3) {
    let z = normal.normalized().unwrap_or(Vec3::Z);
    let projected = x_axis.sub(z.mul_scalar(x_axis.dot(z)));
    let x = projected
        .normalized()
        .unwrap_or_else(|| orthogonal_unit_vector(z));
    let y = z.cross(x).normalized().unwrap_or(Vec3::Y);
    (x, y, z)
}

/// Parametric surface over the unit square.
pub trait Surface {
    fn point_at(&self, u: f64, v: f64) -> Point3;

    #[must_use]
    fn is_u_closed(&self) -> bool {
        false
    }

    #[must_use]
    fn is_v_closed(&self) -> bool {
        false
    }

    /// The `v = 0` row collapses to a single point.
    #[must_use]
    fn pole_v_start(&self) -> bool {
        false
    }

    /// The `v = 1` row collapses to a single point.
    #[must_use]
    fn pole_v_end(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderSurface {
    pub base: Point3,
    pub axis: Vec3,
    pub axis_dir: Vec3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius: f64,
}

impl CylinderSurface {
    /// `axis` spans the full height: the far rim sits at `base + axis`.
    pub fn new(base: Point3, axis: Vec3, radius: f64) -> Result<Self, String> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err("cylinder radius must be finite and > 0".to_string());
        }

        let axis_dir = axis
            .normalized()
            .ok_or_else(|| "cylinder axis must be non-zero".to_string())?;
        let x_axis = orthogonal_unit_vector(axis_dir);
        let y_axis = axis_dir.cross(x_axis).normalized().unwrap_or(Vec3::Y);

        Ok(Self {
            base,
            axis,
            axis_dir,
            x_axis,
            y_axis,
            radius,
        })
    }
}

impl Surface for CylinderSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let u = wrap_param(u, 0.0, 1.0);
        let angle = TAU * u;
        let radial = self
            .x_axis
            .mul_scalar(angle.cos())
            .add(self.y_axis.mul_scalar(angle.sin()))
            .mul_scalar(self.radius);

        self.base.add_vec(self.axis.mul_scalar(v)).add_vec(radial)
    }

    fn is_u_closed(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeSurface {
    pub base: Point3,
    pub axis: Vec3,
    pub axis_dir: Vec3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius0: f64,
    pub radius1: f64,
}

impl ConeSurface {
    /// `radius0` applies at `base`, `radius1` at `base + axis`.
    pub fn new(base: Point3, axis: Vec3, radius0: f64, radius1: f64) -> Result<Self, String> {
        if !radius0.is_finite() || radius0 < 0.0 || !radius1.is_finite() || radius1 < 0.0 {
            return Err("cone radii must be finite and >= 0".to_string());
        }
        if radius0 == 0.0 && radius1 == 0.0 {
            return Err("cone needs at least one non-zero radius".to_string());
        }

        let axis_dir = axis
            .normalized()
            .ok_or_else(|| "cone axis must be non-zero".to_string())?;
        let x_axis = orthogonal_unit_vector(axis_dir);
        let y_axis = axis_dir.cross(x_axis).normalized().unwrap_or(Vec3::Y);

        Ok(Self {
            base,
            axis,
            axis_dir,
            x_axis,
            y_axis,
            radius0,
            radius1,
        })
    }
}

impl Surface for ConeSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let u = wrap_param(u, 0.0, 1.0);
        let angle = TAU * u;
        let radius = self.radius0 + (self.radius1 - self.radius0) * v;
        let radial = self
            .x_axis
            .mul_scalar(angle.cos())
            .add(self.y_axis.mul_scalar(angle.sin()))
            .mul_scalar(radius);

        self.base.add_vec(self.axis.mul_scalar(v)).add_vec(radial)
    }

    fn is_u_closed(&self) -> bool {
        true
    }

    fn pole_v_start(&self) -> bool {
        self.radius0 == 0.0
    }

    fn pole_v_end(&self) -> bool {
        self.radius1 == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusSurface {
    pub center: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub z_axis: Vec3,
    pub major_radius: f64,
    pub minor_radius: f64,
}

impl TorusSurface {
    pub fn from_center_xaxis_normal(
        center: Point3,
        x_axis: Vec3,
        normal: Vec3,
        major_radius: f64,
        minor_radius: f64,
    ) -> Result<Self, String> {
        if !major_radius.is_finite() || major_radius <= 0.0 {
            return Err("torus major radius must be finite and > 0".to_string());
        }
        if !minor_radius.is_finite() || minor_radius <= 0.0 {
            return Err("torus minor radius must be finite and > 0".to_string());
        }

        let (x_axis, y_axis, z_axis) = frame_axes_from_xaxis_normal(x_axis, normal);
        Ok(Self {
            center,
            x_axis,
            y_axis,
            z_axis,
            major_radius,
            minor_radius,
        })
    }
}

impl Surface for TorusSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let u = wrap_param(u, 0.0, 1.0);
        let v = wrap_param(v, 0.0, 1.0);

        let theta = TAU * u;
        let phi = TAU * v;

        let radial = self
            .x_axis
            .mul_scalar(theta.cos())
            .add(self.y_axis.mul_scalar(theta.sin()));

        let tube = radial.mul_scalar(self.major_radius + self.minor_radius * phi.cos());
        let vertical = self.z_axis.mul_scalar(self.minor_radius * phi.sin());
        self.center.add_vec(tube.add(vertical))
    }

    fn is_u_closed(&self) -> bool {
        true
    }

    fn is_v_closed(&self) -> bool {
        true
    }
}

/// Restricts the `v` direction of a surface to `[v_min, v_max]`.
///
/// The trimmed surface is open in `v` even when the source wraps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSurface<'a, S: Surface + ?Sized> {
    surface: &'a S,
    v_min: f64,
    v_max: f64,
}

impl<'a, S: Surface + ?Sized> SectionSurface<'a, S> {
    #[must_use]
    pub fn new(surface: &'a S, v_min: f64, v_max: f64) -> Self {
        Self {
            surface,
            v_min,
            v_max,
        }
    }

    #[must_use]
    pub const fn v_range(&self) -> (f64, f64) {
        (self.v_min, self.v_max)
    }
}

impl<S: Surface + ?Sized> Surface for SectionSurface<'_, S> {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let v = self.v_min + (self.v_max - self.v_min) * v.clamp(0.0, 1.0);
        self.surface.point_at(u, v)
    }

    fn is_u_closed(&self) -> bool {
        self.surface.is_u_closed()
    }
}
