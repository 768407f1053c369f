use serde::{Deserialize, Serialize};

use super::ResultStore;

/// Quantity a plot reads per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityKind {
    Displacement,
    Velocity,
    PathTrace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    MovingBody,
    TrackedPoint,
}

/// A label resolved to its row in one of the result tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotTarget {
    pub label: String,
    pub kind: TargetKind,
    pub index: usize,
}

impl PlotTarget {
    #[must_use]
    pub fn new(label: impl Into<String>, kind: TargetKind, index: usize) -> Self {
        Self {
            label: label.into(),
            kind,
            index,
        }
    }
}

/// In-plane components per target, one value per reported time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSet {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<Vec<f64>>,
}

impl SeriesSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Extracts the x and y components of `quantity` for every label in `targets`.
///
/// Output order follows `targets`. A label the run does not know, a row index
/// past the end of the table, or a vector with fewer than two components
/// yields empty series for that target instead of an error.
///
/// Targets are labels rather than [`PlotTarget`]s: each label is resolved
/// against `results`, so kind and index always come from the loaded run.
#[must_use]
pub fn extract_series<S: AsRef<str> + Sync>(
    targets: &[S],
    quantity: QuantityKind,
    results: &ResultStore,
) -> SeriesSet {
    let extract_one = |label: &S| -> (Vec<f64>, Vec<f64>) {
        let label = label.as_ref();
        match results.resolve(label) {
            Some(target) => series_for(&target, quantity, results).unwrap_or_else(|| {
                log::debug!("`{label}` has no complete {quantity:?} rows; plotting nothing");
                (Vec::new(), Vec::new())
            }),
            None => {
                log::debug!("`{label}` is neither a moving body nor a tracked point");
                (Vec::new(), Vec::new())
            }
        }
    };

    #[cfg(feature = "parallel")]
    let pairs: Vec<(Vec<f64>, Vec<f64>)> = {
        use rayon::prelude::*;
        targets.par_iter().map(extract_one).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let pairs: Vec<(Vec<f64>, Vec<f64>)> = targets.iter().map(extract_one).collect();

    let (x, y) = pairs.into_iter().unzip();
    SeriesSet { x, y }
}

fn series_for(
    target: &PlotTarget,
    quantity: QuantityKind,
    results: &ResultStore,
) -> Option<(Vec<f64>, Vec<f64>)> {
    let table = results.table(target.kind, quantity);
    let times = results.reported_times.len();
    if table.len() < times {
        return None;
    }

    let mut x = Vec::with_capacity(times);
    let mut y = Vec::with_capacity(times);
    for row in table.iter().take(times) {
        match row.get(target.index)?.as_slice() {
            [first, second, ..] => {
                x.push(*first);
                y.push(*second);
            }
            _ => return None,
        }
    }
    Some((x, y))
}
