use serde::{Deserialize, Serialize};

use super::core::{BBox, Point3, Vec3};
use super::surface::Surface;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub normals: Option<Vec<[f64; 3]>>,
}

impl GeomMesh {
    /// Create a new mesh with positions and indices only.
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            normals: None,
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if self
            .normals
            .as_ref()
            .is_some_and(|normals| normals.len() != self.positions.len())
        {
            return Err("mesh normal buffer does not match vertex count".to_string());
        }
        Ok(())
    }

    /// Appends `other`, offsetting its indices past the current vertices.
    ///
    /// Normals are kept only when both meshes carry them.
    pub fn append(&mut self, other: GeomMesh) {
        let offset = self.positions.len() as u32;
        let was_empty = self.positions.is_empty();

        self.normals = match (self.normals.take(), other.normals) {
            (Some(mut own), Some(theirs)) => {
                own.extend(theirs);
                Some(own)
            }
            (None, Some(theirs)) if was_empty => Some(theirs),
            _ => None,
        };
        self.positions.extend(other.positions);
        self.indices
            .extend(other.indices.into_iter().map(|i| i + offset));
    }

    #[must_use]
    pub fn bounds(&self) -> Option<BBox> {
        let points: Vec<Point3> = self.positions.iter().copied().map(Point3::from).collect();
        BBox::from_points(&points)
    }
}

/// Tessellation density for glyph primitives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshOptions {
    /// Segments around cones and cylinders.
    pub radial_segments: usize,
    /// Segments around the tube of a torus.
    pub tube_segments: usize,
    /// Rows along the axis of cones and cylinders.
    pub axial_segments: usize,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            radial_segments: 32,
            tube_segments: 16,
            axial_segments: 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Row {
    Pole(u32),
    Ring(u32),
}

impl Row {
    fn index(self, u: usize) -> u32 {
        match self {
            Self::Pole(index) => index,
            Self::Ring(start) => start + u as u32,
        }
    }
}

/// Samples `surface` on a `u_count` x `v_count` grid and triangulates it.
///
/// Closed directions wrap instead of duplicating the seam; pole rows collapse
/// to one vertex and are closed with a triangle fan.
#[must_use]
pub fn mesh_surface(surface: &impl Surface, u_count: usize, v_count: usize) -> GeomMesh {
    let wrap_u = surface.is_u_closed();
    let wrap_v = surface.is_v_closed();
    let u_count = if wrap_u { u_count.max(3) } else { u_count.max(2) };
    let v_count = if wrap_v { v_count.max(3) } else { v_count.max(2) };

    let u_param = |i: usize| {
        if wrap_u {
            i as f64 / u_count as f64
        } else {
            i as f64 / (u_count - 1) as f64
        }
    };
    let v_param = |j: usize| {
        if wrap_v {
            j as f64 / v_count as f64
        } else {
            j as f64 / (v_count - 1) as f64
        }
    };

    let mut positions = Vec::with_capacity(u_count * v_count);
    let mut rows = Vec::with_capacity(v_count);
    for j in 0..v_count {
        let v = v_param(j);
        let is_pole = !wrap_v
            && ((j == 0 && surface.pole_v_start()) || (j + 1 == v_count && surface.pole_v_end()));
        if is_pole {
            rows.push(Row::Pole(positions.len() as u32));
            positions.push(surface.point_at(0.0, v).to_array());
        } else {
            rows.push(Row::Ring(positions.len() as u32));
            positions.extend((0..u_count).map(|i| surface.point_at(u_param(i), v).to_array()));
        }
    }

    let quad_u = if wrap_u { u_count } else { u_count - 1 };
    let quad_v = if wrap_v { v_count } else { v_count - 1 };
    let mut indices = Vec::with_capacity(quad_u * quad_v * 6);

    for j in 0..quad_v {
        let row0 = rows[j];
        let row1 = rows[(j + 1) % v_count];
        for u in 0..quad_u {
            let u1 = if wrap_u { (u + 1) % u_count } else { u + 1 };
            let i0 = row0.index(u);
            let i1 = row0.index(u1);
            let i2 = row1.index(u);
            let i3 = row1.index(u1);

            if !matches!(row0, Row::Pole(_)) {
                indices.extend_from_slice(&[i0, i1, i2]);
            }
            if !matches!(row1, Row::Pole(_)) {
                indices.extend_from_slice(&[i2, i1, i3]);
            }
        }
    }

    let normals = compute_smooth_normals(&positions, &indices);
    GeomMesh {
        positions,
        indices,
        normals: Some(normals),
    }
}

/// Flat disc of `segments` triangles closing a circular rim.
///
/// The fan faces along `normal`.
#[must_use]
pub fn mesh_disc(
    center: Point3,
    normal: Vec3,
    rim: impl Fn(f64) -> Point3,
    segments: usize,
) -> GeomMesh {
    let segments = segments.max(3);
    let mut positions = Vec::with_capacity(segments + 1);
    positions.push(center.to_array());
    positions.extend((0..segments).map(|i| rim(i as f64 / segments as f64).to_array()));

    let mut indices = Vec::with_capacity(segments * 3);
    for i in 0..segments {
        let a = 1 + i as u32;
        let b = 1 + ((i + 1) % segments) as u32;
        let tri_normal = Point3::from(positions[a as usize])
            .sub_point(center)
            .cross(Point3::from(positions[b as usize]).sub_point(center));
        if tri_normal.dot(normal) >= 0.0 {
            indices.extend_from_slice(&[0, a, b]);
        } else {
            indices.extend_from_slice(&[0, b, a]);
        }
    }

    let flat = normal.normalized().unwrap_or(Vec3::Z).to_array();
    GeomMesh {
        normals: Some(vec![flat; positions.len()]),
        positions,
        indices,
    }
}

fn compute_smooth_normals(positions: &[[f64; 3]], indices: &[u32]) -> Vec<[f64; 3]> {
    let mut accum = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let a = Point3::from(positions[tri[0] as usize]);
        let b = Point3::from(positions[tri[1] as usize]);
        let c = Point3::from(positions[tri[2] as usize]);
        let face = b.sub_point(a).cross(c.sub_point(a));
        for &i in tri {
            accum[i as usize] = accum[i as usize].add(face);
        }
    }

    accum
        .into_iter()
        .map(|n| n.normalized().unwrap_or(Vec3::Z).to_array())
        .collect()
}
