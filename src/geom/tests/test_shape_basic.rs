use crate::geom::{MeshOptions, Point3, Primitive, Shape, ShapeColor, Tolerance, Vec3};

fn unit_cylinder() -> Primitive {
    Primitive::Cylinder {
        base: Point3::ORIGIN,
        direction: Vec3::Z,
        radius: 1.0,
        height: 2.0,
    }
}

#[test]
fn cylinder_primitive_is_capped() {
    let mesh = unit_cylinder().to_mesh(&MeshOptions::default()).unwrap();
    mesh.validate().expect("mesh validate");

    // 32 x 2 side rings plus two 33-vertex caps.
    assert_eq!(mesh.vertex_count(), 64 + 2 * 33);
    assert_eq!(mesh.triangle_count(), 64 + 2 * 32);

    let bbox = mesh.bounds().unwrap();
    let tol = Tolerance::DEFAULT;
    assert!(tol.approx_eq_point3(bbox.min, Point3::new(-1.0, -1.0, 0.0)));
    assert!(tol.approx_eq_point3(bbox.max, Point3::new(1.0, 1.0, 2.0)));
}

#[test]
fn pointed_cone_has_only_the_wide_cap() {
    let cone = Primitive::Cone {
        base: Point3::new(0.0, 0.0, 1.0),
        direction: Vec3::new(0.0, 0.0, -3.0),
        radius_start: 0.0,
        radius_end: 1.0,
        height: 2.0,
    };
    let options = MeshOptions {
        radial_segments: 8,
        ..MeshOptions::default()
    };
    let mesh = cone.to_mesh(&options).unwrap();
    mesh.validate().expect("mesh validate");

    assert_eq!(mesh.vertex_count(), 9 + 9);
    assert_eq!(mesh.triangle_count(), 8 + 8);

    let bbox = mesh.bounds().unwrap();
    assert!((bbox.max.z - 1.0).abs() < 1e-12);
    assert!((bbox.min.z + 1.0).abs() < 1e-12);
}

#[test]
fn half_tube_torus_stays_outside_the_ring() {
    let torus = Primitive::Torus {
        center: Point3::ORIGIN,
        axis: Vec3::Z,
        major_radius: 5.0,
        minor_radius: 1.0,
        angle_start: -90.0,
        angle_end: 90.0,
        segments: 24,
    };
    let mesh = torus.to_mesh(&MeshOptions::default()).unwrap();
    mesh.validate().expect("mesh validate");

    for p in &mesh.positions {
        let radial = p[0].hypot(p[1]);
        assert!(radial >= 5.0 - 1e-9, "vertex {p:?} inside the ring");
    }
}

#[test]
fn full_turn_torus_uses_segment_count_around_the_ring() {
    let torus = Primitive::Torus {
        center: Point3::new(1.0, 1.0, 1.0),
        axis: Vec3::Z,
        major_radius: 7.0,
        minor_radius: 1.0,
        angle_start: -180.0,
        angle_end: 180.0,
        segments: 240,
    };
    let options = MeshOptions::default();
    let mesh = torus.to_mesh(&options).unwrap();

    assert_eq!(mesh.vertex_count(), 240 * options.tube_segments);
    assert_eq!(mesh.triangle_count(), 2 * 240 * options.tube_segments);
}

#[test]
fn degenerate_primitives_are_rejected() {
    let options = MeshOptions::default();

    let flat = Primitive::Cone {
        base: Point3::ORIGIN,
        direction: Vec3::Z,
        radius_start: 0.0,
        radius_end: 1.0,
        height: 0.0,
    };
    assert!(flat.to_mesh(&options).is_err());

    let no_direction = Primitive::Cylinder {
        base: Point3::ORIGIN,
        direction: Vec3::ZERO,
        radius: 1.0,
        height: 1.0,
    };
    assert!(no_direction.to_mesh(&options).is_err());

    let reversed = Primitive::Torus {
        center: Point3::ORIGIN,
        axis: Vec3::Z,
        major_radius: 2.0,
        minor_radius: 1.0,
        angle_start: 90.0,
        angle_end: -90.0,
        segments: 12,
    };
    assert!(reversed.to_mesh(&options).is_err());
}

#[test]
fn compound_concatenates_and_empty_has_no_bounds() {
    let options = MeshOptions::default();
    let single = unit_cylinder().to_mesh(&options).unwrap();

    let shape = Shape::compound(
        vec![unit_cylinder(), unit_cylinder()],
        ShapeColor::new(1.0, 0.0, 0.0, 1.0),
    );
    let mesh = shape.to_mesh(&options).unwrap();
    assert_eq!(mesh.vertex_count(), 2 * single.vertex_count());
    assert_eq!(mesh.triangle_count(), 2 * single.triangle_count());
    mesh.validate().expect("mesh validate");

    let empty = Shape::empty();
    assert!(empty.is_empty());
    assert!(empty.to_mesh(&options).unwrap().is_empty());
    assert!(empty.bounds(&options).is_none());
}

#[test]
fn axis_midpoint_follows_direction() {
    let cone = Primitive::Cone {
        base: Point3::new(1.0, 0.0, 0.0),
        direction: Vec3::new(0.0, 2.0, 0.0),
        radius_start: 0.0,
        radius_end: 1.0,
        height: 4.0,
    };
    assert_eq!(cone.axis_midpoint(), Point3::new(1.0, 2.0, 0.0));
}
