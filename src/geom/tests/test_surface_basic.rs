use crate::geom::{
    ConeSurface, CylinderSurface, Point3, SectionSurface, Surface, Tolerance, TorusSurface, Vec3,
};

#[test]
fn cylinder_seam_is_closed_and_axis_spans_height() {
    let cyl = CylinderSurface::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0), 1.0)
        .unwrap();

    let tol = Tolerance::DEFAULT;
    assert!(tol.approx_eq_point3(cyl.point_at(0.0, 0.3), cyl.point_at(1.0, 0.3)));

    let top = cyl.point_at(0.0, 1.0);
    assert!(tol.approx_eq_f64(top.z, 2.0));
    assert!(tol.approx_eq_f64((top.x * top.x + top.y * top.y).sqrt(), 1.0));
}

#[test]
fn cylinder_rejects_degenerate_inputs() {
    assert!(CylinderSurface::new(Point3::ORIGIN, Vec3::Z, 0.0).is_err());
    assert!(CylinderSurface::new(Point3::ORIGIN, Vec3::ZERO, 1.0).is_err());
    assert!(CylinderSurface::new(Point3::ORIGIN, Vec3::Z, f64::NAN).is_err());
}

#[test]
fn cone_tip_is_collapsed() {
    let cone = ConeSurface::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0), 0.0, 1.0)
        .unwrap();

    let tol = Tolerance::DEFAULT;
    assert!(cone.pole_v_start());
    assert!(!cone.pole_v_end());
    assert!(tol.approx_eq_point3(cone.point_at(0.0, 0.0), cone.point_at(0.25, 0.0)));
    assert!(tol.approx_eq_point3(cone.point_at(0.0, 0.0), Point3::ORIGIN));
}

#[test]
fn cone_needs_a_non_zero_radius() {
    assert!(ConeSurface::new(Point3::ORIGIN, Vec3::Z, 0.0, 0.0).is_err());
    assert!(ConeSurface::new(Point3::ORIGIN, Vec3::Z, -1.0, 1.0).is_err());
}

#[test]
fn torus_outer_equator_sits_at_major_plus_minor() {
    let torus = TorusSurface::from_center_xaxis_normal(
        Point3::new(1.0, 2.0, 3.0),
        Vec3::X,
        Vec3::Z,
        7.0,
        1.0,
    )
    .unwrap();

    let tol = Tolerance::DEFAULT;
    assert!(tol.approx_eq_point3(torus.point_at(0.0, 0.0), Point3::new(9.0, 2.0, 3.0)));
    assert!(tol.approx_eq_point3(torus.point_at(0.0, 0.5), Point3::new(7.0, 2.0, 3.0)));
    assert!(tol.approx_eq_point3(torus.point_at(0.25, 0.25), Point3::new(1.0, 9.0, 4.0)));
}

#[test]
fn section_surface_maps_v_into_range_and_opens_it() {
    let torus =
        TorusSurface::from_center_xaxis_normal(Point3::ORIGIN, Vec3::X, Vec3::Z, 5.0, 1.0).unwrap();
    let section = SectionSurface::new(&torus, 0.0, 0.5);

    let tol = Tolerance::DEFAULT;
    assert!(!section.is_v_closed());
    assert!(section.is_u_closed());
    assert_eq!(section.v_range(), (0.0, 0.5));
    assert!(tol.approx_eq_point3(section.point_at(0.0, 1.0), torus.point_at(0.0, 0.5)));
}
