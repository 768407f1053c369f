//! Figure layouts for simulation results.
//!
//! Planning is renderer independent: [`plan_figures`] describes figures,
//! axes and traces, and the host draws them with whatever plotting library it
//! has.

use serde::{Deserialize, Serialize};

use crate::results::{QuantityKind, ResultStore, extract_series};

mod panel;

pub use panel::{PanelRow, PlotPanel};

const TIME_LABEL: &str = "Time [s]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotItem {
    Displacement,
    Velocity,
    PathTrace,
    Energy,
}

/// Plot items in the order the selector lists them.
pub const PLOT_ITEMS: [PlotItem; 4] = [
    PlotItem::Displacement,
    PlotItem::Velocity,
    PlotItem::PathTrace,
    PlotItem::Energy,
];

impl PlotItem {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Displacement => "Displacement",
            Self::Velocity => "Velocity",
            Self::PathTrace => "Path Trace",
            Self::Energy => "Energy",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        PLOT_ITEMS.into_iter().find(|item| item.name() == name)
    }

    /// Whether the item is plotted per selected body or point.
    #[must_use]
    pub fn uses_targets(self) -> bool {
        !matches!(self, Self::Energy)
    }

    fn quantity(self) -> Option<QuantityKind> {
        match self {
            Self::Displacement => Some(QuantityKind::Displacement),
            Self::Velocity => Some(QuantityKind::Velocity),
            Self::PathTrace => Some(QuantityKind::PathTrace),
            Self::Energy => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceStyle {
    Line,
    Scatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub style: TraceStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    /// Legend drawn in the lower left corner.
    pub legend: bool,
    pub traces: Vec<Trace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub name: String,
    /// Stacked top to bottom.
    pub axes: Vec<Axes>,
}

/// Lays out the figures for `item`.
///
/// `targets` pairs each label with its legend text. Energy ignores them and
/// plots the three run-wide series.
#[must_use]
pub fn plan_figures(
    item: PlotItem,
    targets: &[(String, String)],
    results: &ResultStore,
) -> Vec<Figure> {
    let Some(quantity) = item.quantity() else {
        return energy_figures(results);
    };

    let labels: Vec<&str> = targets.iter().map(|(label, _)| label.as_str()).collect();
    let series = extract_series(&labels, quantity, results);
    log::debug!("planning {} for {} targets", item.name(), labels.len());

    let times = vec![results.reported_times.clone(); series.len()];

    match item {
        PlotItem::PathTrace => vec![Figure {
            name: item.name().to_string(),
            axes: vec![Axes {
                legend: true,
                traces: traces(TraceStyle::Scatter, targets, &series.x, &series.y),
                ..Axes::default()
            }],
        }],
        _ => vec![Figure {
            name: item.name().to_string(),
            axes: vec![
                Axes {
                    title: Some(item.name().to_string()),
                    y_label: Some("x [units?]".to_string()),
                    legend: true,
                    traces: traces(TraceStyle::Line, targets, &times, &series.x),
                    ..Axes::default()
                },
                Axes {
                    x_label: Some(TIME_LABEL.to_string()),
                    y_label: Some("y [units?]".to_string()),
                    legend: true,
                    traces: traces(TraceStyle::Line, targets, &times, &series.y),
                    ..Axes::default()
                },
            ],
        }],
    }
}

/// One trace per target, labelled with its legend.
fn traces(
    style: TraceStyle,
    targets: &[(String, String)],
    xs: &[Vec<f64>],
    ys: &[Vec<f64>],
) -> Vec<Trace> {
    targets
        .iter()
        .zip(xs.iter().zip(ys))
        .map(|((_, legend), (x, y))| Trace {
            style,
            label: Some(legend.clone()),
            x: x.clone(),
            y: y.clone(),
        })
        .collect()
}

fn energy_figures(results: &ResultStore) -> Vec<Figure> {
    results
        .energy
        .named()
        .into_iter()
        .map(|(name, values)| Figure {
            name: name.to_string(),
            axes: vec![Axes {
                title: Some(name.to_string()),
                x_label: Some(TIME_LABEL.to_string()),
                y_label: Some(format!("{name} [units?]")),
                legend: false,
                traces: vec![Trace {
                    style: TraceStyle::Line,
                    label: None,
                    x: results.reported_times.clone(),
                    y: values.to_vec(),
                }],
            }],
        })
        .collect()
}
