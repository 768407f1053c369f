//! Solver output for one simulation run and the series extracted from it.
//!
//! Kinematic tables are indexed `[time][body or point][component]`. Label
//! maps resolve a document label to its index in the matching table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod extract;

pub use extract::{PlotTarget, QuantityKind, SeriesSet, TargetKind, extract_series};

/// `[time][index][component]`
pub type VectorTable = Vec<Vec<Vec<f64>>>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResultStoreError {
    #[error("reported time {index} ({value}) is not finite")]
    NonFiniteTime { index: usize, value: f64 },
    #[error("reported times must increase strictly: {previous} then {current} at index {index}")]
    TimesNotIncreasing {
        index: usize,
        previous: f64,
        current: f64,
    },
    #[error("table `{table}` has {rows} rows for {times} reported times")]
    RowCount {
        table: &'static str,
        rows: usize,
        times: usize,
    },
    #[error("energy series `{series}` has {len} values for {times} reported times")]
    EnergyLength {
        series: &'static str,
        len: usize,
        times: usize,
    },
    #[error("label `{label}` appears twice in `{map}`")]
    DuplicateLabel { map: &'static str, label: String },
}

/// Label to table index, in the order the solver reported the labels.
///
/// Crosses the boundary as a list of `[label, index]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelMap(Vec<(String, usize)>);

impl LabelMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<usize> {
        self.0
            .iter()
            .find(|(key, _)| key == label)
            .map(|&(_, index)| index)
    }

    /// Sets the index of `label`, keeping its position when already present.
    pub fn insert(&mut self, label: impl Into<String>, index: usize) {
        let label = label.into();
        match self.0.iter_mut().find(|(key, _)| *key == label) {
            Some(entry) => entry.1 = index,
            None => self.0.push((label, index)),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(label, _)| label.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn duplicate(&self) -> Option<&str> {
        self.0
            .iter()
            .enumerate()
            .find(|(i, (label, _))| self.0[..*i].iter().any(|(seen, _)| seen == label))
            .map(|(_, (label, _))| label.as_str())
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for LabelMap {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (label, index) in iter {
            map.insert(label, index);
        }
        map
    }
}

impl<S: Into<String>, const N: usize> From<[(S, usize); N]> for LabelMap {
    fn from(entries: [(S, usize); N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Potential, kinetic and total energy per reported time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergySeries {
    #[serde(default)]
    pub potential: Vec<f64>,
    #[serde(default)]
    pub kinetic: Vec<f64>,
    #[serde(default)]
    pub total: Vec<f64>,
}

impl EnergySeries {
    /// `(name, values)` in plotting order.
    #[must_use]
    pub fn named(&self) -> [(&'static str, &[f64]); 3] {
        [
            ("Potential Energy", self.potential.as_slice()),
            ("Kinetic Energy", self.kinetic.as_slice()),
            ("Total Energy", self.total.as_slice()),
        ]
    }
}

/// Raw result tables of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultStore {
    pub reported_times: Vec<f64>,
    pub object_to_moving_body: LabelMap,
    pub object_to_point: LabelMap,
    pub body_positions: VectorTable,
    pub body_velocities: VectorTable,
    pub point_positions: VectorTable,
    pub point_velocities: VectorTable,
    pub energy: EnergySeries,
}

impl ResultStore {
    /// Validates `store` and returns it.
    ///
    /// Empty tables are accepted; a run without tracked points has no point
    /// rows at all.
    pub fn new(store: ResultStore) -> Result<Self, ResultStoreError> {
        store.validate()?;
        Ok(store)
    }

    pub fn validate(&self) -> Result<(), ResultStoreError> {
        for (index, &value) in self.reported_times.iter().enumerate() {
            if !value.is_finite() {
                return Err(ResultStoreError::NonFiniteTime { index, value });
            }
        }
        if let Some((index, pair)) = self
            .reported_times
            .windows(2)
            .enumerate()
            .find(|(_, pair)| pair[1] <= pair[0])
        {
            return Err(ResultStoreError::TimesNotIncreasing {
                index: index + 1,
                previous: pair[0],
                current: pair[1],
            });
        }

        let maps = [
            ("object_to_moving_body", &self.object_to_moving_body),
            ("object_to_point", &self.object_to_point),
        ];
        for (map, labels) in maps {
            if let Some(label) = labels.duplicate() {
                return Err(ResultStoreError::DuplicateLabel {
                    map,
                    label: label.to_owned(),
                });
            }
        }

        let times = self.reported_times.len();
        let tables = [
            ("body_positions", &self.body_positions),
            ("body_velocities", &self.body_velocities),
            ("point_positions", &self.point_positions),
            ("point_velocities", &self.point_velocities),
        ];
        for (table, rows) in tables {
            if !rows.is_empty() && rows.len() != times {
                return Err(ResultStoreError::RowCount {
                    table,
                    rows: rows.len(),
                    times,
                });
            }
        }

        for (series, values) in self.energy.named() {
            if !values.is_empty() && values.len() != times {
                return Err(ResultStoreError::EnergyLength {
                    series,
                    len: values.len(),
                    times,
                });
            }
        }
        Ok(())
    }

    /// Labels that can be plotted: moving bodies first, then points, each in
    /// solver order.
    #[must_use]
    pub fn plottable_labels(&self) -> Vec<String> {
        self.object_to_moving_body
            .labels()
            .chain(self.object_to_point.labels())
            .map(str::to_owned)
            .collect()
    }

    /// Finds `label` in the body map, then in the point map.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Option<PlotTarget> {
        if let Some(index) = self.object_to_moving_body.get(label) {
            return Some(PlotTarget::new(label, TargetKind::MovingBody, index));
        }
        self.object_to_point
            .get(label)
            .map(|index| PlotTarget::new(label, TargetKind::TrackedPoint, index))
    }

    pub(crate) fn table(&self, target: TargetKind, quantity: QuantityKind) -> &VectorTable {
        match (target, quantity) {
            (TargetKind::MovingBody, QuantityKind::Velocity) => &self.body_velocities,
            (TargetKind::MovingBody, _) => &self.body_positions,
            (TargetKind::TrackedPoint, QuantityKind::Velocity) => &self.point_velocities,
            (TargetKind::TrackedPoint, _) => &self.point_positions,
        }
    }
}
