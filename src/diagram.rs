use crate::config::LayoutConfig;
use crate::family::{FamilyGraph, Person};
use crate::layout::{
    ConnectorEnd, DiagramConnector, DiagramLogic, DiagramRow, FadeTransition, Point, Rect, Size,
};
use crate::theme::Theme;

type Callback = Box<dyn Fn()>;

/// Top-level composite: owns the layout logic, arranges the rows into the
/// diagram rectangle, exposes the zoom scale and the draw order, and fires
/// the update/populate notifications.
pub struct Diagram {
    logic: DiagramLogic,
    theme: Theme,
    scale: f32,
    total_size: Size,
    selected_id: Option<String>,
    populating: bool,
    on_updated: Vec<Callback>,
    on_populated: Vec<Callback>,
    on_node_click: Option<Box<dyn Fn(&Person)>>,
}

impl Diagram {
    pub fn new(theme: Theme, config: LayoutConfig) -> Self {
        Self::with_logic(theme, DiagramLogic::new(config))
    }

    pub fn with_logic(theme: Theme, logic: DiagramLogic) -> Self {
        Self {
            logic,
            theme,
            scale: 1.0,
            total_size: Size::default(),
            selected_id: None,
            populating: false,
            on_updated: Vec::new(),
            on_populated: Vec::new(),
            on_node_click: None,
        }
    }

    pub fn logic(&self) -> &DiagramLogic {
        &self.logic
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn rows(&self) -> &[DiagramRow] {
        self.logic.rows()
    }

    pub fn connectors(&self) -> &[DiagramConnector] {
        self.logic.connectors()
    }

    pub fn node_count(&self) -> usize {
        self.logic.node_count()
    }

    pub fn total_size(&self) -> Size {
        self.total_size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn display_year(&self) -> i32 {
        self.logic.display_year()
    }

    pub fn minimum_year(&self) -> i32 {
        self.logic.minimum_year()
    }

    pub fn on_updated(&mut self, callback: Callback) {
        self.on_updated.push(callback);
    }

    pub fn on_populated(&mut self, callback: Callback) {
        self.on_populated.push(callback);
    }

    pub fn on_node_click(&mut self, callback: Box<dyn Fn(&Person)>) {
        self.on_node_click = Some(callback);
    }

    /// Full repopulate: relayout around the graph's current person, then
    /// request the staggered fade-in. Re-entrant calls from notification
    /// callbacks are ignored while a populate is in flight.
    pub fn rebuild(&mut self, graph: &FamilyGraph) {
        if self.populating {
            return;
        }
        self.populating = true;
        self.logic.rebuild(graph);
        self.arrange();
        self.request_populate_fades();
        self.fire(true);
        self.populating = false;
    }

    /// Measure-then-arrange over the current rows: stack rows vertically,
    /// center each against the widest, and record the total extent. Safe to
    /// re-run on resize without touching the graph reduction.
    pub fn arrange(&mut self) {
        let config = self.logic.config().clone();
        let row_space = config.diagram.row_space;
        let node_space = config.diagram.node_space;

        let mut width = 0.0f32;
        let mut height = 0.0f32;
        let row_count = self.logic.rows().len();
        for row in self.logic.rows_mut() {
            let size = row.measure(&self.theme, &config.node, node_space);
            width = width.max(size.width);
            height += size.height;
        }
        if row_count > 1 {
            height += row_space * (row_count as f32 - 1.0);
        }

        let mut y = 0.0f32;
        for row in self.logic.rows_mut() {
            row.arrange(node_space);
            row.location = Point::new((width - row.size.width) / 2.0, y);
            y += row.size.height + row_space;
        }
        self.total_size = Size::new(width, height);
    }

    // The repopulate animation: everything starts invisible, pauses, then
    // fades in row by row.
    fn request_populate_fades(&mut self) {
        let config = self.logic.config().diagram.clone();
        for (index, row) in self.logic.rows_mut().iter_mut().enumerate() {
            let delay = config.populate_pause_ms + index as f32 * config.row_fade_stagger_ms;
            for group in row.groups_mut() {
                for node in group.nodes_mut() {
                    node.request_fade(FadeTransition {
                        from: 0.0,
                        to: node.opacity,
                        delay_ms: delay,
                        duration_ms: config.node_fade_in_ms,
                    });
                }
            }
        }
        for connector in self.logic.connectors_mut() {
            let delay =
                config.populate_pause_ms + connector.start.row as f32 * config.row_fade_stagger_ms;
            connector.request_fade(FadeTransition {
                from: 0.0,
                to: connector.opacity,
                delay_ms: delay,
                duration_ms: config.node_fade_in_ms,
            });
        }
    }

    /// Year filter pass-through; cheap, no relayout.
    pub fn set_display_year(&mut self, year: i32) {
        if year == self.logic.display_year() {
            return;
        }
        self.logic.set_display_year(year);
        self.fire(false);
    }

    /// Presentation zoom. Measured sizes are untouched; the renderer applies
    /// the factor as a uniform transform.
    pub fn set_scale(&mut self, factor: f32) {
        if factor > 0.0 && factor != self.scale {
            self.scale = factor;
            self.fire(false);
        }
    }

    /// Collect and clear every pending fade request, row order first, then
    /// connectors. The presentation layer plays these against its clock.
    pub fn take_pending_fades(&mut self) -> Vec<FadeTransition> {
        let mut fades = Vec::new();
        for row in self.logic.rows_mut() {
            for group in row.groups_mut() {
                for node in group.nodes_mut() {
                    if let Some(fade) = node.take_pending_fade() {
                        fades.push(fade);
                    }
                }
            }
        }
        for connector in self.logic.connectors_mut() {
            if let Some(fade) = connector.take_pending_fade() {
                fades.push(fade);
            }
        }
        fades
    }

    /// Child connectors draw first so parent-child lines never occlude the
    /// marriage indicators painted by spouse connectors.
    pub fn connectors_in_draw_order(&self) -> Vec<&DiagramConnector> {
        let mut ordered: Vec<&DiagramConnector> = Vec::new();
        ordered.extend(
            self.logic
                .connectors()
                .iter()
                .filter(|c| c.is_child_connector()),
        );
        ordered.extend(
            self.logic
                .connectors()
                .iter()
                .filter(|c| !c.is_child_connector()),
        );
        ordered
    }

    fn bounds_of_end(&self, end: ConnectorEnd) -> Option<Rect> {
        let rows = self.logic.rows();
        let row = rows.get(end.row)?;
        let group = row.groups().get(end.group)?;
        let node = group.nodes().get(end.node)?;
        let origin = row
            .location
            .offset(group.location)
            .offset(node.location);
        Some(Rect::from_point_size(origin, node.scaled_size()))
    }

    /// Unscaled diagram-space bounds of a displayed person.
    pub fn bounds_of(&self, person_id: &str) -> Option<Rect> {
        self.bounds_of_end(self.logic.lookup(person_id)?)
    }

    pub fn primary_bounds(&self) -> Option<Rect> {
        let primary = self.primary_node_id()?;
        self.bounds_of(&primary)
    }

    fn primary_node_id(&self) -> Option<String> {
        let row = self.logic.rows().get(self.logic.primary_row_index())?;
        for group in row.groups() {
            for node in group.nodes() {
                if node.node_type == crate::layout::NodeType::Primary {
                    return Some(node.person.id.clone());
                }
            }
        }
        None
    }

    /// Remember a non-primary node the host selected, typically right
    /// before promoting it to primary and rebuilding.
    pub fn set_selected(&mut self, person_id: Option<&str>) {
        self.selected_id = person_id.map(str::to_string);
    }

    pub fn selected_bounds(&self) -> Option<Rect> {
        self.bounds_of(self.selected_id.as_deref()?)
    }

    /// Hit-test a point in rendered (scaled) coordinates and invoke the
    /// node-click callback with the person under it.
    pub fn activate_node_at(&self, point: Point) -> Option<&Person> {
        let unscaled = Point::new(point.x / self.scale, point.y / self.scale);
        for row in self.logic.rows() {
            for group in row.groups() {
                for node in group.nodes() {
                    let origin = row.location.offset(group.location).offset(node.location);
                    let rect = Rect::from_point_size(origin, node.scaled_size());
                    if rect.contains(unscaled) {
                        if let Some(callback) = &self.on_node_click {
                            callback(&node.person);
                        }
                        return Some(&node.person);
                    }
                }
            }
        }
        None
    }

    fn fire(&self, populated: bool) {
        for callback in &self.on_updated {
            callback();
        }
        if populated {
            for callback in &self.on_populated {
                callback();
            }
        }
    }
}
