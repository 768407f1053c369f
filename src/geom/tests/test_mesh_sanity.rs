use std::collections::HashMap;

use crate::geom::{
    ConeSurface, CylinderSurface, GeomMesh, Point3, TorusSurface, Vec3, mesh_disc, mesh_surface,
};

fn edge_use_counts(mesh: &GeomMesh) -> HashMap<(u32, u32), usize> {
    let mut counts = HashMap::new();
    for tri in mesh.indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    counts
}

#[test]
fn cylinder_mesh_wraps_the_seam() {
    let cyl = CylinderSurface::new(Point3::ORIGIN, Vec3::new(0.0, 0.0, 2.0), 1.0).unwrap();
    let mesh = mesh_surface(&cyl, 16, 2);

    mesh.validate().expect("mesh validate");
    assert_eq!(mesh.vertex_count(), 32);
    assert_eq!(mesh.triangle_count(), 32);

    let open = edge_use_counts(&mesh).values().filter(|&&n| n == 1).count();
    assert_eq!(open, 32);
}

#[test]
fn cone_apex_collapses_to_one_vertex() {
    let cone = ConeSurface::new(Point3::ORIGIN, Vec3::new(0.0, 0.0, 2.0), 0.0, 1.0).unwrap();
    let mesh = mesh_surface(&cone, 16, 2);

    mesh.validate().expect("mesh validate");
    assert_eq!(mesh.vertex_count(), 17);
    assert_eq!(mesh.triangle_count(), 16);
    assert_eq!(mesh.positions[0], [0.0, 0.0, 0.0]);
}

#[test]
fn torus_mesh_is_closed() {
    let torus =
        TorusSurface::from_center_xaxis_normal(Point3::ORIGIN, Vec3::X, Vec3::Z, 7.0, 1.0).unwrap();
    let mesh = mesh_surface(&torus, 240, 16);

    mesh.validate().expect("mesh validate");
    assert_eq!(mesh.vertex_count(), 240 * 16);
    assert_eq!(mesh.triangle_count(), 240 * 16 * 2);
    assert!(edge_use_counts(&mesh).values().all(|&n| n == 2));
}

#[test]
fn disc_faces_along_requested_normal() {
    let rim = |u: f64| {
        let angle = std::f64::consts::TAU * u;
        Point3::new(angle.cos(), angle.sin(), 0.0)
    };
    for normal in [Vec3::Z, -Vec3::Z] {
        let mesh = mesh_disc(Point3::ORIGIN, normal, rim, 12);
        mesh.validate().expect("mesh validate");
        assert_eq!(mesh.triangle_count(), 12);
        for tri in mesh.indices.chunks_exact(3) {
            let a = Point3::from(mesh.positions[tri[0] as usize]);
            let b = Point3::from(mesh.positions[tri[1] as usize]);
            let c = Point3::from(mesh.positions[tri[2] as usize]);
            let face = b.sub_point(a).cross(c.sub_point(a));
            assert!(face.dot(normal) > 0.0);
        }
    }
}

#[test]
fn geom_mesh_validate_rejects_bad_buffers() {
    let mesh = GeomMesh::new(vec![[0.0, 0.0, 0.0]], vec![0]);
    assert!(mesh.validate().is_err());

    let mesh = GeomMesh::new(vec![[0.0, 0.0, 0.0]], vec![0, 1, 0]);
    assert!(mesh.validate().is_err());

    let mesh = GeomMesh::new(vec![[f64::NAN, 0.0, 0.0]], vec![0, 0, 0]);
    assert!(mesh.validate().is_err());
}

#[test]
fn append_offsets_indices() {
    let mut a = GeomMesh::new(vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], vec![0, 1, 2]);
    let b = GeomMesh::new(vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]], vec![0, 1, 2]);
    a.append(b);

    assert_eq!(a.vertex_count(), 6);
    assert_eq!(a.indices, vec![0, 1, 2, 3, 4, 5]);
    a.validate().expect("mesh validate");

    let bounds = a.bounds().unwrap();
    assert_eq!(bounds.max, Point3::new(1.0, 1.0, 1.0));
}
