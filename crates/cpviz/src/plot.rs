#![forbid(unsafe_code)]

//! The plot handle.
//!
//! [`create_plot`] validates its inputs, builds the scales, lays out one
//! cell per variable and lets every layer draw once. The returned [`Plot`]
//! then owns all per-instance state:
//!
//! - scales and cell geometry, mutated only by [`Plot::resize`];
//! - the scene and its node registry;
//! - the highlight coordinator, driven by pointer and table events;
//! - the viewport subscription, released by [`Plot::teardown`] or on drop.
//!
//! Every mutating entry point takes `&mut self`, so a resize can never
//! start while another one (or a hover) is still updating the scene.

use crate::axes::{draw_axes, title_shape};
use crate::data::{Dataset, Observation, ProfilePoint};
use crate::error::{PlotError, Result};
use crate::highlight::{HighlightCoordinator, HighlightState, HighlightTarget, HoverSource};
use crate::layers::{CellContext, LayerCompositor, LayerGroups, LayerKind, NodeRegistry};
use crate::legend::Legend;
use crate::options::{PlotOptions, ResolvedOptions};
use crate::resize::{ResizeController, ResizeDecision};
use crate::scale::ScaleManager;
use crate::table::{TableEvent, TableModel};
use crate::tooltip::Tooltip;
use cpviz_core::event::{PointerEvent, PointerKind};
use cpviz_core::geometry::Size;
use cpviz_core::viewport::{Container, Subscription};
use cpviz_layout::{CellGeometry, ChartFrame, FontClass, GridLayout, Typography};
use cpviz_render::hit::HitIndex;
use cpviz_render::svg::SvgExporter;
use cpviz_render::{Node, NodeId, Paint, Rgba, Scene};
use cpviz_style::parse_color;

const TITLE_COLOR: Rgba = Rgba::BLACK;

/// Build a plot inside `container`.
///
/// Fails with [`PlotError::Configuration`] when the container or the
/// `variables` option is missing, and with [`PlotError::JoinInconsistency`]
/// when a profile has no observation row. A variable whose values are
/// neither numeric nor textual only loses its own cell; see
/// [`Plot::cell_errors`].
pub fn create_plot(
    container: Option<&Container>,
    profiles: Vec<ProfilePoint>,
    observations: Vec<Observation>,
    options: &PlotOptions,
) -> Result<Plot> {
    let _span = tracing::debug_span!("cpviz.plot.build").entered();
    let container = container
        .ok_or_else(|| PlotError::Configuration("a container is required".into()))?;
    let options = options.resolve()?;
    let dataset = Dataset::new(profiles, observations)?;
    Ok(Plot::build(container, dataset, options))
}

/// Scene nodes of one grid cell.
#[derive(Debug, Clone)]
struct Cell {
    variable: String,
    group: NodeId,
    /// Plot-area group, offset by the margins and title band.
    plot: NodeId,
    title: NodeId,
    /// `None` for a cell aborted by a type mismatch.
    axes: Option<NodeId>,
    layers: LayerGroups,
}

/// A constructed plot.
#[derive(Debug)]
pub struct Plot {
    options: ResolvedOptions,
    dataset: Dataset,
    layout: GridLayout,
    geometry: CellGeometry,
    typography: Typography,
    scales: ScaleManager,
    scene: Scene,
    registry: NodeRegistry,
    cells: Vec<Cell>,
    legend: Option<Legend>,
    legend_group: NodeId,
    table: Option<TableModel>,
    highlight: HighlightCoordinator,
    resizer: ResizeController,
    hit_index: Option<HitIndex>,
    tooltip: Option<Tooltip>,
    cell_errors: Vec<PlotError>,
    subscription: Option<Subscription>,
    decimals: usize,
}

impl Plot {
    fn build(container: &Container, dataset: Dataset, options: ResolvedOptions) -> Self {
        let color_variable = options.color.clone().filter(|c| dataset.has_column(c));
        let line_color = match (&options.color, &color_variable) {
            (Some(literal), None) => match parse_color(literal) {
                Ok(rgba) => Some(rgba),
                Err(err) => {
                    tracing::warn!(
                        color = %literal,
                        error = %err,
                        "color is neither a column nor a color, using the default"
                    );
                    None
                }
            },
            _ => None,
        };

        let frame = ChartFrame::for_chart(
            Size::new(options.width, options.height),
            options.add_table,
            color_variable.is_some(),
        );
        let layout = GridLayout::default()
            .margin(options.margin)
            .rug_size(options.rugs.size);
        let geometry =
            layout.compute_grid(options.variables.len(), frame.plot_width, frame.chart.height);
        tracing::debug!(
            variables = options.variables.len(),
            rows = geometry.rows,
            cols = geometry.cols,
            "grid computed"
        );

        let (scales, cell_errors) = ScaleManager::build(
            &dataset,
            &options.variables,
            &options.categorical_order,
            color_variable.as_deref(),
            options.no_colors,
            options.default_color,
            &geometry,
        );
        let typography = options.typography.clone();

        let mut scene = Scene::new();
        let mut registry = NodeRegistry::new();
        let chart = scene.push_group(NodeId::ROOT, "chart");
        let compositor = LayerCompositor::new(&options);
        let mut cells = Vec::with_capacity(options.variables.len());
        for (index, variable) in options.variables.iter().enumerate() {
            let origin = geometry.cell_origin(index).unwrap_or_default();
            let group = scene.push(chart, Node::group("cell").translate(origin));
            let title = scene.push(
                group,
                Node::new(
                    "title",
                    title_shape(variable, &geometry, typography.size(FontClass::Titles)),
                )
                .paint(Paint::default().with_fill(TITLE_COLOR)),
            );
            let plot = scene.push(group, Node::group("plot").translate(geometry.plot_offset()));
            let mut cell = Cell {
                variable: variable.clone(),
                group,
                plot,
                title,
                axes: None,
                layers: LayerGroups::new(),
            };

            if let Some(x) = scales.variable(variable) {
                let axes = scene.push_group(plot, "axes");
                draw_axes(
                    &mut scene,
                    axes,
                    x,
                    scales.outcome(),
                    &geometry,
                    typography.size(FontClass::Axes),
                );
                let cx = CellContext {
                    dataset: &dataset,
                    options: &options,
                    color: scales.color(),
                    color_variable: color_variable.as_deref(),
                    line_color,
                    variable,
                    variable_index: index,
                    points: dataset.profiles_for(variable).collect(),
                    x,
                    y: scales.outcome(),
                    geometry: &geometry,
                };
                cell.layers = compositor.draw_cell(&cx, &mut scene, &mut registry, plot);
                cell.axes = Some(axes);
            }
            cells.push(cell);
        }

        let legend_group = scene.push_group(chart, "legend");
        let legend = color_variable
            .as_deref()
            .map(|name| Legend::from_scale(name, scales.color()));
        if let Some(legend) = &legend {
            legend.draw(
                &mut scene,
                legend_group,
                &frame,
                typography.size(FontClass::Legend),
            );
        }

        let table = options.add_table.then(|| TableModel::from_dataset(&dataset));
        let resizer = ResizeController::new(frame, options.add_table, legend.is_some());
        tracing::debug!(
            nodes = scene.len(),
            drawn = registry.len(),
            aborted = cell_errors.len(),
            "plot built"
        );

        Self {
            decimals: dataset.outcome_decimals(),
            subscription: Some(container.signal().subscribe()),
            options,
            dataset,
            layout,
            geometry,
            typography,
            scales,
            scene,
            registry,
            cells,
            legend,
            legend_group,
            table,
            highlight: HighlightCoordinator::new(),
            resizer,
            hit_index: None,
            tooltip: None,
            cell_errors,
        }
    }

    // -----------------------------------------------------------------------
    // Resize
    // -----------------------------------------------------------------------

    /// Lay the plot out for a `width` x `height` viewport. Returns `false`
    /// when the chart size moved by at most one pixel in each dimension.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let _span = tracing::debug_span!("cpviz.plot.resize", width, height).entered();
        match self.resizer.evaluate(Size::new(width, height)) {
            ResizeDecision::Skip => false,
            ResizeDecision::Apply(frame) => {
                self.relayout(frame);
                true
            }
        }
    }

    /// Apply the latest size reported by the container, if any.
    pub fn poll_viewport(&mut self) -> bool {
        let Some(size) = self
            .subscription
            .as_ref()
            .and_then(Subscription::take_pending)
        else {
            return false;
        };
        self.resize(size.width, size.height)
    }

    /// Re-place everything for `frame`. Domains, paints and highlight state
    /// are untouched.
    fn relayout(&mut self, frame: ChartFrame) {
        self.geometry = self.layout.compute_grid(
            self.options.variables.len(),
            frame.plot_width,
            frame.chart.height,
        );
        self.scales.rescale(&self.geometry);
        self.typography.resize_for_cell_width(self.geometry.cell_width);
        let title_size = self.typography.size(FontClass::Titles);
        let axes_size = self.typography.size(FontClass::Axes);

        for (index, cell) in self.cells.iter().enumerate() {
            let origin = self.geometry.cell_origin(index).unwrap_or_default();
            self.scene.set_translate(cell.group, origin);
            self.scene.set_translate(cell.plot, self.geometry.plot_offset());
            self.scene.set_shape(
                cell.title,
                title_shape(&cell.variable, &self.geometry, title_size),
            );
            if let (Some(axes), Some(x)) = (cell.axes, self.scales.variable(&cell.variable)) {
                draw_axes(
                    &mut self.scene,
                    axes,
                    x,
                    self.scales.outcome(),
                    &self.geometry,
                    axes_size,
                );
            }
        }
        self.registry.update_positions(
            &mut self.scene,
            &self.scales,
            &self.options.variables,
            &self.geometry,
        );
        if let Some(legend) = &self.legend {
            legend.draw(
                &mut self.scene,
                self.legend_group,
                &frame,
                self.typography.size(FontClass::Legend),
            );
        }

        self.hit_index = None;
        self.tooltip = None;
        self.resizer.commit(frame);
        tracing::debug!(
            width = frame.chart.width,
            height = frame.chart.height,
            cell_width = self.geometry.cell_width,
            "relayout"
        );
    }

    // -----------------------------------------------------------------------
    // Interaction
    // -----------------------------------------------------------------------

    /// Highlight `target`. Returns whether the scene changed.
    pub fn hover_enter(&mut self, target: HighlightTarget, source: HoverSource) -> bool {
        let changed = self.highlight.enter(
            target,
            source,
            &mut self.scene,
            &self.registry,
            &self.dataset,
        );
        if changed {
            self.hit_index = None;
        }
        changed
    }

    /// Clear the highlight. Returns whether the scene changed.
    pub fn hover_leave(&mut self) -> bool {
        let changed = self.highlight.leave(&mut self.scene);
        if changed {
            self.hit_index = None;
        }
        changed
    }

    /// Pointer input over the chart surface (chart coordinates).
    ///
    /// Hovering a drawn entity highlights it and sets the tooltip; moving
    /// off every entity, or leaving the surface, clears both. Returns
    /// whether the highlight changed.
    pub fn pointer_event(&mut self, event: PointerEvent) -> bool {
        if event.kind == PointerKind::Left {
            self.tooltip = None;
            return self.hover_leave();
        }
        let index = self
            .hit_index
            .get_or_insert_with(|| HitIndex::with_defaults(&self.scene));
        let Some(hit) = index.hit_test(event.position) else {
            self.tooltip = None;
            return self.hover_leave();
        };
        let Some(placed) = self.registry.lookup(hit.data) else {
            return false;
        };
        let Some(target) = self.dataset.target(hit.tag).cloned() else {
            return false;
        };
        let source = HoverSource::Layer(placed.kind.layer());
        self.tooltip = match (&placed.datum, self.options.variables.get(placed.variable)) {
            (Some(datum), Some(variable)) => {
                Tooltip::for_datum(datum, variable, &self.dataset, self.decimals)
                    .map(|t| t.at(event.position, self.typography.size(FontClass::Tooltips)))
            }
            _ => None,
        };
        self.hover_enter(target, source)
    }

    /// Row hover from the companion table.
    pub fn handle_table_event(&mut self, event: TableEvent) -> bool {
        match event {
            TableEvent::RowEnter(key) => {
                self.hover_enter(HighlightTarget::Entity(key), HoverSource::TableRow)
            }
            TableEvent::RowLeave(_) => self.hover_leave(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    pub fn scales(&self) -> &ScaleManager {
        &self.scales
    }

    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    /// Frame of the current layout.
    pub fn frame(&self) -> &ChartFrame {
        self.resizer.frame()
    }

    pub fn highlight_state(&self) -> &HighlightState {
        self.highlight.state()
    }

    /// The companion table, when `add_table` is set.
    pub fn table(&self) -> Option<&TableModel> {
        self.table.as_ref()
    }

    pub fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Tooltip for the entity under the pointer.
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Errors of cells that could not be built.
    pub fn cell_errors(&self) -> &[PlotError] {
        &self.cell_errors
    }

    /// Layer sub-groups of the cell of `variable`. Empty for an aborted cell.
    pub fn layer_groups(&self, variable: &str) -> &[(LayerKind, NodeId)] {
        self.cells
            .iter()
            .find(|c| c.variable == variable)
            .map(|c| c.layers.as_slice())
            .unwrap_or_default()
    }

    /// Whether the plot still listens to its container.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }

    /// Serialize the current scene.
    pub fn to_svg(&self) -> String {
        SvgExporter::new(self.frame().chart).export(&self.scene)
    }

    /// Unsubscribe from the container and drop every drawn node.
    pub fn teardown(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.scene.clear();
        tracing::debug!("plot torn down");
    }
}
