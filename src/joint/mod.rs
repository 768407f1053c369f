//! Relative-movement joints between two bodies.
//!
//! A [`JointDefinition`] is what the host's property editor stores: labels of
//! the attached bodies and reference points, a definition mode and optional
//! driver data. Before each recompute it is resolved against the host document
//! into an immutable [`JointSpec`], which is all the glyph builder sees.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::Point3;

pub mod glyph;

pub use glyph::{
    GlyphBuild, GlyphDiagnostic, GlyphSettings, SettingsError, build_glyph, build_glyph_with,
};

/// Body label that stands for the fixed world.
pub const GROUND_LABEL: &str = "Ground";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointKind {
    Rotational,
    Translational,
}

impl JointKind {
    pub const ALL: [Self; 2] = [Self::Rotational, Self::Translational];

    /// Name shown in the host's property editor.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Rotational => "Rotation",
            Self::Translational => "Linear Movement",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Definition modes the task panel offers for this kind.
    #[must_use]
    pub fn definition_modes(self) -> &'static [DefinitionMode] {
        match self {
            Self::Rotational => &[
                DefinitionMode::OnePointTwoBodies,
                DefinitionMode::AlternativeOnePoint,
            ],
            Self::Translational => &[DefinitionMode::TwoPointsTwoBodies],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefinitionMode {
    OnePointTwoBodies,
    AlternativeOnePoint,
    TwoPointsTwoBodies,
}

impl DefinitionMode {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::OnePointTwoBodies => "1 Point + 2 Bodies",
            Self::AlternativeOnePoint => "alt def mode",
            Self::TwoPointsTwoBodies => "2 Points + 2 Bodies",
        }
    }

    #[must_use]
    pub fn helper_text(self) -> &'static str {
        match self {
            Self::OnePointTwoBodies => {
                "Choose a point (by picking an LCS) and the two bodies attached to the point."
            }
            Self::AlternativeOnePoint => "Alternative definition mode description",
            Self::TwoPointsTwoBodies => {
                "Choose two points (by picking two LCS's) and two bodies, (each point must be attached to its own body)"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DriverError {
    #[error("driver parameter `{0}` must be finite")]
    NonFinite(&'static str),
    #[error("driver start time {start} must be before end time {end}")]
    EmptyInterval { start: f64, end: f64 },
}

/// Prescribed motion for a driven joint. Only carried and checked here;
/// the solver evaluates it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DriverFunction {
    #[default]
    NotApplicable,
    TypeA {
        t_end: f64,
        c1: f64,
        c2: f64,
        c3: f64,
    },
    TypeB {
        t_start: f64,
        t_end: f64,
        initial_value: f64,
        end_value: f64,
    },
    TypeC {
        t_start: f64,
        t_end: f64,
        initial_value: f64,
        end_derivative: f64,
    },
}

impl DriverFunction {
    pub fn validate(&self) -> Result<(), DriverError> {
        let params: Vec<(&'static str, f64)> = match *self {
            Self::NotApplicable => Vec::new(),
            Self::TypeA { t_end, c1, c2, c3 } => {
                vec![("t_end", t_end), ("c1", c1), ("c2", c2), ("c3", c3)]
            }
            Self::TypeB {
                t_start,
                t_end,
                initial_value,
                end_value,
            } => vec![
                ("t_start", t_start),
                ("t_end", t_end),
                ("initial_value", initial_value),
                ("end_value", end_value),
            ],
            Self::TypeC {
                t_start,
                t_end,
                initial_value,
                end_derivative,
            } => vec![
                ("t_start", t_start),
                ("t_end", t_end),
                ("initial_value", initial_value),
                ("end_derivative", end_derivative),
            ],
        };

        if let Some((name, _)) = params.iter().find(|(_, value)| !value.is_finite()) {
            return Err(DriverError::NonFinite(*name));
        }

        match *self {
            Self::TypeB { t_start, t_end, .. } | Self::TypeC { t_start, t_end, .. }
                if t_start >= t_end =>
            {
                Err(DriverError::EmptyInterval {
                    start: t_start,
                    end: t_end,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Host-side view of the document the joint lives in.
pub trait DocumentLookup {
    /// Placement of the local coordinate system with this label.
    fn point_position(&self, label: &str) -> Option<Point3>;
    /// Solid volume of the body with this label.
    fn body_volume(&self, label: &str) -> Option<f64>;
}

/// In-memory document, keyed by label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default)]
    pub points: BTreeMap<String, Point3>,
    #[serde(default)]
    pub bodies: BTreeMap<String, f64>,
}

impl MapDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_point(mut self, label: impl Into<String>, position: Point3) -> Self {
        self.points.insert(label.into(), position);
        self
    }

    #[must_use]
    pub fn with_body(mut self, label: impl Into<String>, volume: f64) -> Self {
        self.bodies.insert(label.into(), volume);
        self
    }
}

impl DocumentLookup for MapDocument {
    fn point_position(&self, label: &str) -> Option<Point3> {
        self.points.get(label).copied()
    }

    fn body_volume(&self, label: &str) -> Option<f64> {
        self.bodies.get(label).copied()
    }
}

/// Joint properties as edited in the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointDefinition {
    pub kind: JointKind,
    pub definition_mode: DefinitionMode,
    #[serde(default)]
    pub body1: Option<String>,
    #[serde(default)]
    pub body2: Option<String>,
    #[serde(default)]
    pub point1: Option<String>,
    #[serde(default)]
    pub point2: Option<String>,
    #[serde(default)]
    pub driver_on: bool,
    #[serde(default)]
    pub driver: DriverFunction,
}

impl JointDefinition {
    #[must_use]
    pub fn new(kind: JointKind) -> Self {
        Self {
            kind,
            definition_mode: kind.definition_modes()[0],
            body1: None,
            body2: None,
            point1: None,
            point2: None,
            driver_on: false,
            driver: DriverFunction::NotApplicable,
        }
    }

    /// Looks up positions and volumes for the current labels.
    ///
    /// Unset or unknown point labels resolve to no point; ground, unset or
    /// unknown body labels resolve to no volume.
    #[must_use]
    pub fn resolve(&self, doc: &impl DocumentLookup) -> JointSpec {
        let point = |label: &Option<String>| {
            label
                .as_deref()
                .filter(|label| !label.is_empty())
                .and_then(|label| doc.point_position(label))
        };
        let volume = |label: &Option<String>| {
            label
                .as_deref()
                .filter(|label| !label.is_empty() && *label != GROUND_LABEL)
                .and_then(|label| doc.body_volume(label))
        };

        JointSpec {
            kind: self.kind,
            point1: point(&self.point1),
            point2: point(&self.point2),
            body1_volume: volume(&self.body1),
            body2_volume: volume(&self.body2),
        }
    }
}

/// Everything the glyph builder needs, captured fresh before each build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    pub kind: JointKind,
    #[serde(default)]
    pub point1: Option<Point3>,
    #[serde(default)]
    pub point2: Option<Point3>,
    /// `None` means the body is ground.
    #[serde(default)]
    pub body1_volume: Option<f64>,
    #[serde(default)]
    pub body2_volume: Option<f64>,
}

impl JointSpec {
    #[must_use]
    pub fn rotational(point: Point3) -> Self {
        Self {
            kind: JointKind::Rotational,
            point1: Some(point),
            point2: None,
            body1_volume: None,
            body2_volume: None,
        }
    }

    #[must_use]
    pub fn translational(point1: Point3, point2: Point3) -> Self {
        Self {
            kind: JointKind::Translational,
            point1: Some(point1),
            point2: Some(point2),
            body1_volume: None,
            body2_volume: None,
        }
    }

    #[must_use]
    pub fn with_volumes(mut self, body1: Option<f64>, body2: Option<f64>) -> Self {
        self.body1_volume = body1;
        self.body2_volume = body2;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_treats_ground_and_unset_labels_as_absent() {
        let doc = MapDocument::new()
            .with_point("LCS", Point3::new(1.0, 2.0, 3.0))
            .with_body("Crank", 250.0);

        let mut joint = JointDefinition::new(JointKind::Rotational);
        joint.body1 = Some(GROUND_LABEL.to_string());
        joint.body2 = Some("Crank".to_string());
        joint.point1 = Some("LCS".to_string());
        joint.point2 = Some(String::new());

        let spec = joint.resolve(&doc);
        assert_eq!(spec.kind, JointKind::Rotational);
        assert_eq!(spec.point1, Some(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(spec.point2, None);
        assert_eq!(spec.body1_volume, None);
        assert_eq!(spec.body2_volume, Some(250.0));
    }

    #[test]
    fn resolve_ignores_labels_missing_from_document() {
        let mut joint = JointDefinition::new(JointKind::Translational);
        joint.point1 = Some("Gone".to_string());
        joint.body1 = Some("Gone".to_string());

        let spec = joint.resolve(&MapDocument::new());
        assert_eq!(spec.point1, None);
        assert_eq!(spec.body1_volume, None);
    }

    #[test]
    fn kind_names_round_trip_and_default_mode_matches_kind() {
        for kind in JointKind::ALL {
            assert_eq!(JointKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(JointKind::from_name("Screw"), None);

        let joint = JointDefinition::new(JointKind::Translational);
        assert_eq!(joint.definition_mode, DefinitionMode::TwoPointsTwoBodies);
        assert!(joint.definition_mode.helper_text().starts_with("Choose two points"));
    }

    #[test]
    fn driver_validation() {
        assert!(DriverFunction::NotApplicable.validate().is_ok());
        assert!(
            DriverFunction::TypeA {
                t_end: 2.0,
                c1: 0.1,
                c2: 0.0,
                c3: 1.0
            }
            .validate()
            .is_ok()
        );

        let reversed = DriverFunction::TypeB {
            t_start: 3.0,
            t_end: 1.0,
            initial_value: 0.0,
            end_value: 1.0,
        };
        assert_eq!(
            reversed.validate(),
            Err(DriverError::EmptyInterval {
                start: 3.0,
                end: 1.0
            })
        );

        let nan = DriverFunction::TypeC {
            t_start: 0.0,
            t_end: 1.0,
            initial_value: f64::NAN,
            end_derivative: 0.0,
        };
        assert_eq!(nan.validate(), Err(DriverError::NonFinite("initial_value")));
    }
}
