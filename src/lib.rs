#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod joint;
pub mod plot;
pub mod results;

use std::collections::BTreeSet;
use std::fmt;

use geom::{GeomMesh, MeshOptions, Shape};
use joint::{
    GlyphSettings, JointDefinition, JointSpec, MapDocument, SettingsError, build_glyph_with,
};
use plot::{Figure, PLOT_ITEMS, PanelRow, PlotItem, PlotPanel};
use results::{ResultStore, ResultStoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start rayon thread pool: {err}")))
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkbenchError {
    #[error("no simulation results are loaded")]
    NoResults,
    #[error("unknown plot item `{0}`")]
    UnknownPlotItem(String),
    #[error(transparent)]
    Results(#[from] ResultStoreError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Tunables a host may pass to [`Workbench::configure`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    pub glyph: GlyphSettings,
    pub mesh: MeshOptions,
}

/// A built glyph as handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphExport {
    pub shape: Shape,
    pub mesh: GeomMesh,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

/// Joint glyphs and result plotting for one document.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct Workbench {
    config: WorkbenchConfig,
    results: Option<ResultStore>,
    panel: Option<PlotPanel>,
    /// Joints whose current build is degenerate and already reported.
    reported_degenerate: BTreeSet<String>,
}

#[wasm_bindgen]
impl Workbench {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Workbench {
        Workbench::default()
    }

    /// Replaces glyph settings and tessellation options.
    #[wasm_bindgen]
    pub fn configure(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: WorkbenchConfig =
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?;
        self.apply_config(config).map_err(to_js_error)
    }

    /// Loads the results of a finished run and resets the plot panel.
    #[wasm_bindgen]
    pub fn load_results(&mut self, results: JsValue) -> Result<(), JsValue> {
        let store: ResultStore =
            serde_wasm_bindgen::from_value(results).map_err(to_js_error)?;
        self.load_store(store).map_err(to_js_error)
    }

    /// Body labels followed by point labels of the loaded run.
    #[wasm_bindgen]
    pub fn plottable_items(&self) -> Result<JsValue, JsValue> {
        let panel = self.panel().map_err(to_js_error)?;
        to_js_value(&panel.plottables())
    }

    /// Names of the plot items, in selector order.
    #[wasm_bindgen]
    pub fn plot_items() -> Result<JsValue, JsValue> {
        let names: Vec<&str> = PLOT_ITEMS.iter().map(|item| item.name()).collect();
        to_js_value(&names)
    }

    /// Selects a plot item by name; returns whether it plots per target.
    #[wasm_bindgen]
    pub fn select_plot_item(&mut self, name: &str) -> Result<bool, JsValue> {
        self.select_by_name(name).map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn add_target(&mut self, index: usize) -> bool {
        self.panel.as_mut().is_some_and(|panel| panel.add(index))
    }

    #[wasm_bindgen]
    pub fn remove_target(&mut self, row: usize) -> bool {
        self.panel
            .as_mut()
            .is_some_and(|panel| panel.remove(row).is_some())
    }

    #[wasm_bindgen]
    pub fn set_legend(&mut self, row: usize, legend: &str) -> bool {
        self.panel
            .as_mut()
            .is_some_and(|panel| panel.set_legend(row, legend))
    }

    /// Current target table as `{ label, legend }` rows.
    #[wasm_bindgen]
    pub fn targets(&self) -> Result<JsValue, JsValue> {
        let rows: &[PanelRow] = self.panel.as_ref().map(PlotPanel::rows).unwrap_or_default();
        to_js_value(&rows)
    }

    /// Figures for the selected plot item and targets.
    #[wasm_bindgen]
    pub fn plot(&self) -> Result<JsValue, JsValue> {
        let figures = self.figures().map_err(to_js_error)?;
        to_js_value(&figures)
    }

    /// Builds the glyph for the resolved joint `joint_id`.
    ///
    /// A degenerate joint reports its diagnostic once until a build of the
    /// same joint succeeds again.
    #[wasm_bindgen]
    pub fn build_joint_glyph(
        &mut self,
        joint_id: &str,
        spec: JsValue,
    ) -> Result<JsValue, JsValue> {
        let spec: JointSpec = serde_wasm_bindgen::from_value(spec).map_err(to_js_error)?;
        to_js_value(&self.glyph(joint_id, &spec))
    }

    /// Drops the diagnostic memory of a deleted joint.
    #[wasm_bindgen]
    pub fn forget_joint(&mut self, joint_id: &str) {
        self.reported_degenerate.remove(joint_id);
    }

    /// Resolves joint properties against a document snapshot.
    #[wasm_bindgen]
    pub fn resolve_joint(definition: JsValue, document: JsValue) -> Result<JsValue, JsValue> {
        let definition: JointDefinition =
            serde_wasm_bindgen::from_value(definition).map_err(to_js_error)?;
        let document: MapDocument =
            serde_wasm_bindgen::from_value(document).map_err(to_js_error)?;
        definition.driver.validate().map_err(to_js_error)?;
        to_js_value(&definition.resolve(&document))
    }
}

impl Workbench {
    pub fn apply_config(&mut self, config: WorkbenchConfig) -> Result<(), WorkbenchError> {
        config.glyph.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn load_store(&mut self, store: ResultStore) -> Result<(), WorkbenchError> {
        let store = ResultStore::new(store)?;
        log::debug!(
            "loaded {} reported times, {} plottable labels",
            store.reported_times.len(),
            store.object_to_moving_body.len() + store.object_to_point.len()
        );
        self.panel = Some(PlotPanel::new(&store));
        self.results = Some(store);
        Ok(())
    }

    pub fn panel(&self) -> Result<&PlotPanel, WorkbenchError> {
        self.panel.as_ref().ok_or(WorkbenchError::NoResults)
    }

    pub fn panel_mut(&mut self) -> Result<&mut PlotPanel, WorkbenchError> {
        self.panel.as_mut().ok_or(WorkbenchError::NoResults)
    }

    pub fn select_by_name(&mut self, name: &str) -> Result<bool, WorkbenchError> {
        let item = PlotItem::from_name(name)
            .ok_or_else(|| WorkbenchError::UnknownPlotItem(name.to_owned()))?;
        self.panel_mut()?.select(item);
        Ok(item.uses_targets())
    }

    pub fn figures(&self) -> Result<Vec<Figure>, WorkbenchError> {
        let results = self.results.as_ref().ok_or(WorkbenchError::NoResults)?;
        Ok(self.panel()?.plot(results))
    }

    /// Builds and tessellates the glyph of `joint_id`. Never fails; a shape
    /// that cannot be tessellated is exported empty.
    pub fn glyph(&mut self, joint_id: &str, spec: &JointSpec) -> GlyphExport {
        let build = build_glyph_with(spec, &self.config.glyph);
        let (shape, mesh) = match build.shape.to_mesh(&self.config.mesh) {
            Ok(mesh) => (build.shape, mesh),
            Err(err) => {
                log::warn!("glyph of `{joint_id}` not tessellated: {err}");
                (Shape::empty(), GeomMesh::default())
            }
        };

        let diagnostic = match build.diagnostic {
            Some(diagnostic) => {
                if self.reported_degenerate.insert(joint_id.to_owned()) {
                    log::warn!("{joint_id}: {diagnostic}");
                    Some(diagnostic.to_string())
                } else {
                    None
                }
            }
            None => {
                self.reported_degenerate.remove(joint_id);
                None
            }
        };
        GlyphExport {
            shape,
            mesh,
            diagnostic,
        }
    }
}

fn to_js_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point3;
    use crate::joint::JointKind;
    use crate::results::LabelMap;

    fn run() -> ResultStore {
        ResultStore {
            reported_times: vec![0.0, 1.0, 2.0],
            object_to_moving_body: LabelMap::from([("Body1", 0)]),
            body_positions: vec![
                vec![vec![0.0, 0.0, 0.0]],
                vec![vec![1.0, 2.0, 0.0]],
                vec![vec![3.0, 4.0, 0.0]],
            ],
            ..ResultStore::default()
        }
    }

    #[test]
    fn plotting_needs_loaded_results() {
        let mut bench = Workbench::new();
        assert_eq!(bench.figures(), Err(WorkbenchError::NoResults));
        assert!(!bench.add_target(0));

        bench.load_store(run()).unwrap();
        assert!(bench.add_target(0));
        let figures = bench.figures().unwrap();
        assert_eq!(figures[0].axes[0].traces[0].y, [0.0, 1.0, 3.0]);
    }

    #[test]
    fn selecting_unknown_item_fails() {
        let mut bench = Workbench::new();
        bench.load_store(run()).unwrap();
        assert_eq!(
            bench.select_by_name("Acceleration"),
            Err(WorkbenchError::UnknownPlotItem("Acceleration".to_string()))
        );
        assert_eq!(bench.select_by_name("Energy"), Ok(false));
    }

    #[test]
    fn invalid_run_is_not_loaded() {
        let mut bench = Workbench::new();
        let mut bad = run();
        bad.reported_times.reverse();
        assert!(matches!(
            bench.load_store(bad),
            Err(WorkbenchError::Results(ResultStoreError::TimesNotIncreasing { .. }))
        ));
        assert!(bench.panel().is_err());
    }

    #[test]
    fn glyph_export_carries_mesh_and_diagnostic() {
        let mut bench = Workbench::new();

        let ok = bench.glyph("Hinge", &JointSpec::rotational(Point3::ORIGIN));
        assert!(!ok.mesh.is_empty());
        assert!(ok.diagnostic.is_none());

        let collapsed = JointSpec::translational(Point3::ORIGIN, Point3::ORIGIN);
        let degenerate = bench.glyph("Slider", &collapsed);
        assert!(degenerate.mesh.is_empty());
        assert!(degenerate.diagnostic.unwrap().contains("too close"));

        let again = bench.glyph("Slider", &collapsed);
        assert!(again.diagnostic.is_none());
    }

    #[test]
    fn zero_volume_body_gives_empty_glyph() {
        let doc = MapDocument::new()
            .with_point("P", Point3::ORIGIN)
            .with_body("Sketchy", 0.0);
        let mut joint = JointDefinition::new(JointKind::Rotational);
        joint.body1 = Some("Sketchy".to_string());
        joint.point1 = Some("P".to_string());
        let spec = joint.resolve(&doc);
        assert_eq!(spec.body1_volume, Some(0.0));

        let mut bench = Workbench::new();
        let export = bench.glyph("Hinge", &spec);
        assert!(export.shape.is_empty());
        assert!(export.mesh.is_empty());
        assert!(export.diagnostic.is_none());
    }

    #[test]
    fn degenerate_reports_are_kept_per_joint() {
        let mut bench = Workbench::new();
        let collapsed = JointSpec::translational(Point3::ORIGIN, Point3::ORIGIN);
        let apart = JointSpec::translational(Point3::ORIGIN, Point3::new(0.0, 0.0, 1.0));

        assert!(bench.glyph("Slider", &collapsed).diagnostic.is_some());
        assert!(bench.glyph("Guide", &collapsed).diagnostic.is_some());
        assert!(bench.glyph("Slider", &collapsed).diagnostic.is_none());

        // Fixed, then broken again at the same coordinates.
        assert!(bench.glyph("Slider", &apart).diagnostic.is_none());
        assert!(bench.glyph("Slider", &collapsed).diagnostic.is_some());

        bench.forget_joint("Guide");
        assert!(bench.glyph("Guide", &collapsed).diagnostic.is_some());
    }

    #[test]
    fn degenerate_memory_is_bounded_by_joints() {
        let mut bench = Workbench::new();
        let mut reported = 0;
        for step in 0..1000 {
            let p = Point3::new(f64::from(step), 0.0, 0.0);
            if bench.glyph("Slider", &JointSpec::translational(p, p)).diagnostic.is_some() {
                reported += 1;
            }
        }
        assert_eq!(reported, 1);
        assert_eq!(bench.reported_degenerate.len(), 1);

        let apart = JointSpec::translational(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0));
        bench.glyph("Slider", &apart);
        assert!(bench.reported_degenerate.is_empty());
    }

    #[test]
    fn config_is_validated() {
        let mut bench = Workbench::new();
        let mut config = WorkbenchConfig::default();
        config.glyph.fallback_volume = -1.0;
        assert_eq!(
            bench.apply_config(config),
            Err(WorkbenchError::Settings(SettingsError::FallbackVolume(-1.0)))
        );
    }
}
