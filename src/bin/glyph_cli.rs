#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("glyph_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use dap_engine::geom::{GeomMesh, MeshOptions, Point3, Primitive, Shape};
    use dap_engine::joint::{GlyphBuild, JointSpec, build_glyph};
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"glyph_cli (dap-engine)

USAGE:
  glyph_cli rotational <x> <y> <z> [--volume <v>]... [options]
  glyph_cli translational <x1> <y1> <z1> <x2> <y2> <z2> [options]

OPTIONS:
  --volume <v>       Volume of an attached body (rotational; at most two, omit for ground)
  --obj <path>       Write the tessellated glyph as OBJ
  --snap <path>      Write the snapshot to a file instead of stdout
  --overwrite        Overwrite existing output files
  -h, --help         Show this help
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        let (name, spec) = match command.as_str() {
            "rotational" => ("rotational", JointSpec::rotational(args.point()?)),
            "translational" => {
                let start = args.point()?;
                let end = args.point()?;
                ("translational", JointSpec::translational(start, end))
            }
            "-h" | "--help" | "help" => {
                print_usage();
                return Ok(());
            }
            other => return Err(format!("unknown command `{other}`\n\n{USAGE}")),
        };

        let mut volumes: Vec<f64> = Vec::new();
        let mut obj_path: Option<PathBuf> = None;
        let mut snap_path: Option<PathBuf> = None;
        let mut overwrite = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--volume" => volumes.push(parse_number("--volume", &args.value("--volume")?)?),
                "--obj" => obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => overwrite = true,
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }
        if volumes.len() > 2 {
            return Err(format!("a joint has two bodies, got {} volumes", volumes.len()));
        }
        let spec = spec.with_volumes(volumes.first().copied(), volumes.get(1).copied());

        let build = build_glyph(&spec);
        let options = MeshOptions::default();
        let mesh = build.shape.to_mesh(&options)?;
        let snapshot = snapshot(name, &build, &mesh);

        if let Some(path) = snap_path.as_deref() {
            write_text_file(path, &snapshot, overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{snapshot}");
        }

        if let Some(path) = obj_path.as_deref() {
            write_obj_file(path, &mesh, name, overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        match build.diagnostic.as_ref() {
            Some(diagnostic) => eprintln!("{name}: {diagnostic}"),
            None => eprintln!(
                "{name}: primitives={} vertices={} triangles={}",
                build.shape.primitives.len(),
                mesh.vertex_count(),
                mesh.triangle_count()
            ),
        }

        Ok(())
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn parse_number(what: &str, text: &str) -> Result<f64, String> {
        let value: f64 = text
            .parse()
            .map_err(|e| format!("{what}: `{text}` is not a number ({e})"))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("{what}: `{text}` is not finite"))
        }
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        refuse_existing(path, overwrite)?;
        fs::write(path, normalize_snapshot_text(text))
            .map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn write_obj_file(
        path: &Path,
        mesh: &GeomMesh,
        name: &str,
        overwrite: bool,
    ) -> Result<(), String> {
        mesh.validate().map_err(|e| format!("mesh validation failed: {e}"))?;
        refuse_existing(path, overwrite)?;

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# dap-engine glyph_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {name}").map_err(|e| format!("write obj: {e}"))?;

        for p in mesh.positions.iter().copied() {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
        }

        if let Some(normals) = mesh.normals.as_ref() {
            for n in normals.iter().copied() {
                writeln!(w, "vn {} {} {}", n[0], n[1], n[2])
                    .map_err(|e| format!("write obj: {e}"))?;
            }
        }

        let has_normals = mesh.normals.is_some();
        for tri in mesh.indices.chunks_exact(3) {
            let a = tri[0] + 1;
            let b = tri[1] + 1;
            let c = tri[2] + 1;

            if has_normals {
                writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")
            } else {
                writeln!(w, "f {a} {b} {c}")
            }
            .map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    fn refuse_existing(path: &Path, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        Ok(())
    }

    fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        if q == 0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.SNAPSHOT_DECIMALS$}");
    }

    fn write_values_line(out: &mut String, prefix: &str, values: &[f64]) {
        let _ = write!(out, "{prefix}");
        for &value in values {
            out.push(' ');
            write_f64(out, value);
        }
        out.push('\n');
    }

    fn write_primitive(out: &mut String, primitive: &Primitive) {
        match *primitive {
            Primitive::Torus {
                center,
                axis,
                major_radius,
                minor_radius,
                angle_start,
                angle_end,
                segments,
            } => {
                let _ = writeln!(out, "torus segments {segments}");
                write_values_line(out, "  center", &center.to_array());
                write_values_line(out, "  axis", &axis.to_array());
                write_values_line(out, "  radii", &[major_radius, minor_radius]);
                write_values_line(out, "  angles", &[angle_start, angle_end]);
            }
            Primitive::Cone {
                base,
                direction,
                radius_start,
                radius_end,
                height,
            } => {
                let _ = writeln!(out, "cone");
                write_values_line(out, "  base", &base.to_array());
                write_values_line(out, "  direction", &direction.to_array());
                write_values_line(out, "  radii", &[radius_start, radius_end]);
                write_values_line(out, "  height", &[height]);
            }
            Primitive::Cylinder {
                base,
                direction,
                radius,
                height,
            } => {
                let _ = writeln!(out, "cylinder");
                write_values_line(out, "  base", &base.to_array());
                write_values_line(out, "  direction", &direction.to_array());
                write_values_line(out, "  radius", &[radius]);
                write_values_line(out, "  height", &[height]);
            }
        }
    }

    fn write_shape(out: &mut String, shape: &Shape) {
        match shape.color {
            Some(color) => write_values_line(out, "color", &color.to_array()),
            None => out.push_str("color none\n"),
        }
        let _ = writeln!(out, "primitives {}", shape.primitives.len());
        for primitive in &shape.primitives {
            write_primitive(out, primitive);
        }
    }

    fn write_mesh_summary(out: &mut String, mesh: &GeomMesh) {
        let _ = writeln!(out, "mesh.vertex_count {}", mesh.vertex_count());
        let _ = writeln!(out, "mesh.triangle_count {}", mesh.triangle_count());
        match mesh.bounds() {
            Some(bbox) => {
                write_values_line(out, "mesh.bounds.min", &bbox.min.to_array());
                write_values_line(out, "mesh.bounds.max", &bbox.max.to_array());
            }
            None => out.push_str("mesh.bounds none\n"),
        }
    }

    fn snapshot(kind: &str, build: &GlyphBuild, mesh: &GeomMesh) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# dap-engine glyph v1");
        let _ = writeln!(out, "joint {kind}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        if let Some(diagnostic) = build.diagnostic.as_ref() {
            let _ = writeln!(out, "diagnostic {diagnostic}");
        }
        write_shape(&mut out, &build.shape);
        write_mesh_summary(&mut out, mesh);
        normalize_snapshot_text(&out)
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next().ok_or_else(|| format!("missing value for {flag}"))
        }

        /// Consumes three coordinates.
        fn point(&mut self) -> Result<Point3, String> {
            let mut coords = [0.0; 3];
            for (coord, axis) in coords.iter_mut().zip(["x", "y", "z"]) {
                let text = self
                    .next()
                    .ok_or_else(|| format!("missing {axis} coordinate\n\n{USAGE}"))?;
                *coord = parse_number(axis, &text)?;
            }
            Ok(Point3::from(coords))
        }
    }
}
