mod test_mesh_sanity;
mod test_shape_basic;
mod test_surface_basic;
