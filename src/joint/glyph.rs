//! Marker solids for joints.
//!
//! Rotational joints get a ring with two arrowheads, sized from the volume of
//! the attached bodies. Translational joints get a double-headed arrow
//! spanning the two reference points. An incompletely defined joint yields an
//! empty shape.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{JointKind, JointSpec};
use crate::geom::{Point3, Primitive, Shape, ShapeColor, Tolerance, Vec3};

/// Constants that size and color the glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphSettings {
    /// Average body volume that maps to a glyph scale of 1.
    pub scale_param: f64,
    /// Volume used when both bodies are ground.
    pub fallback_volume: f64,
    /// Angular segments of the rotation ring.
    pub torus_segments: usize,
    /// Reference points closer than this are treated as coincident.
    pub min_point_distance: f64,
    pub rotational_color: ShapeColor,
    pub translational_color: ShapeColor,
}

impl GlyphSettings {
    pub const SCALE_PARAM: f64 = 50_000.0;
    pub const FALLBACK_VOLUME: f64 = 100_000.0;
    pub const TORUS_SEGMENTS: usize = 240;
    /// Translucent gold.
    pub const ROTATIONAL_COLOR: ShapeColor =
        ShapeColor::new(1.0, 0.843_137_264_251_709, 0.0, 0.600_000_023_841_857_9);
    /// Red with zero alpha: pickable but not drawn.
    pub const TRANSLATIONAL_COLOR: ShapeColor = ShapeColor::new(1.0, 0.0, 0.0, 0.0);

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.scale_param.is_finite() || self.scale_param <= 0.0 {
            return Err(SettingsError::ScaleParam(self.scale_param));
        }
        if !self.fallback_volume.is_finite() || self.fallback_volume <= 0.0 {
            return Err(SettingsError::FallbackVolume(self.fallback_volume));
        }
        if self.torus_segments < 3 {
            return Err(SettingsError::TorusSegments(self.torus_segments));
        }
        if !self.min_point_distance.is_finite() || self.min_point_distance < 0.0 {
            return Err(SettingsError::MinPointDistance(self.min_point_distance));
        }
        Ok(())
    }
}

impl Default for GlyphSettings {
    fn default() -> Self {
        Self {
            scale_param: Self::SCALE_PARAM,
            fallback_volume: Self::FALLBACK_VOLUME,
            torus_segments: Self::TORUS_SEGMENTS,
            min_point_distance: Tolerance::LOOSE.eps,
            rotational_color: Self::ROTATIONAL_COLOR,
            translational_color: Self::TRANSLATIONAL_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("glyph scale parameter must be finite and > 0, got {0}")]
    ScaleParam(f64),
    #[error("fallback volume must be finite and > 0, got {0}")]
    FallbackVolume(f64),
    #[error("torus needs at least 3 segments, got {0}")]
    TorusSegments(usize),
    #[error("minimum point distance must be finite and >= 0, got {0}")]
    MinPointDistance(f64),
}

/// Non-fatal problems found while building a glyph.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum GlyphDiagnostic {
    #[error("the selected 2 points either coincide, or are too close together (distance {distance})")]
    PointsTooClose { distance: f64 },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GlyphBuild {
    pub shape: Shape,
    pub diagnostic: Option<GlyphDiagnostic>,
}

impl GlyphBuild {
    fn from_shape(shape: Shape) -> Self {
        Self {
            shape,
            diagnostic: None,
        }
    }
}

/// Builds the glyph for `spec` with the default settings.
#[must_use]
pub fn build_glyph(spec: &JointSpec) -> GlyphBuild {
    build_glyph_with(spec, &GlyphSettings::default())
}

#[must_use]
pub fn build_glyph_with(spec: &JointSpec, settings: &GlyphSettings) -> GlyphBuild {
    match (spec.kind, spec.point1, spec.point2) {
        (JointKind::Rotational, Some(center), _) => {
            let volume = average_volume(spec.body1_volume, spec.body2_volume, settings);
            let scale = volume / settings.scale_param;
            if !scale.is_finite() || scale <= 0.0 {
                log::debug!("rotational glyph skipped: volume {volume} gives scale {scale}");
                return GlyphBuild::default();
            }
            log::debug!("rotational glyph at {center:?}, average volume {volume}");
            GlyphBuild::from_shape(rotation_glyph(center, scale, settings))
        }
        (JointKind::Translational, Some(start), Some(end)) => {
            let distance = start.distance_to(end);
            if distance > settings.min_point_distance {
                log::debug!("translational glyph from {start:?} to {end:?}");
                GlyphBuild::from_shape(translation_glyph(start, end, distance, settings))
            } else {
                let diagnostic = GlyphDiagnostic::PointsTooClose { distance };
                log::debug!("translational glyph skipped: {diagnostic}");
                GlyphBuild {
                    shape: Shape::empty(),
                    diagnostic: Some(diagnostic),
                }
            }
        }
        _ => GlyphBuild::default(),
    }
}

/// Mean of the volumes present; ground bodies do not count.
#[must_use]
pub fn average_volume(body1: Option<f64>, body2: Option<f64>, settings: &GlyphSettings) -> f64 {
    let present: Vec<f64> = [body1, body2].into_iter().flatten().collect();
    if present.is_empty() {
        settings.fallback_volume
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    }
}

fn rotation_glyph(center: Point3, scale: f64, settings: &GlyphSettings) -> Shape {
    let ring_radius = 7.0 * scale;
    let tube_radius = scale;

    let arrow = |base: Point3, direction: Vec3| Primitive::Cone {
        base,
        direction,
        radius_start: 0.0,
        radius_end: 2.0 * tube_radius,
        height: 5.0 * tube_radius,
    };

    let (sin60, cos60) = (PI / 3.0).sin_cos();
    let (sin30, cos30) = (PI / 6.0).sin_cos();

    let torus = Primitive::Torus {
        center,
        axis: Vec3::Z,
        major_radius: ring_radius,
        minor_radius: tube_radius,
        angle_start: -180.0,
        angle_end: 180.0,
        segments: settings.torus_segments,
    };
    let first = arrow(
        center.add_vec(Vec3::new(ring_radius, -5.0 * tube_radius, 0.0)),
        Vec3::Y,
    );
    let second = arrow(
        Point3::new(
            center.x - ring_radius * cos60 + 5.0 * tube_radius * cos30,
            center.y - ring_radius * sin60 - 5.0 * tube_radius * sin30,
            0.0,
        ),
        Vec3::new(-cos30, sin30, 0.0),
    );

    Shape::compound(vec![torus, first, second], settings.rotational_color)
}

fn translation_glyph(start: Point3, end: Point3, length: f64, settings: &GlyphSettings) -> Shape {
    let direction = end.sub_point(start) / length;

    let shaft = Primitive::Cylinder {
        base: start.add_vec(direction * (0.25 * length)),
        direction,
        radius: 0.05 * length,
        height: 0.5 * length,
    };
    let head = |tip: Point3, direction: Vec3| Primitive::Cone {
        base: tip,
        direction,
        radius_start: 0.0,
        radius_end: 0.1 * length,
        height: 0.25 * length,
    };

    Shape::compound(
        vec![shaft, head(start, direction), head(end, -direction)],
        settings.translational_color,
    )
}
